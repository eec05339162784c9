use shared::domain::{InputKind, QuestionDefinition, QuestionId};

use crate::error::ProgressError;

/// Ordered, immutable list of questions. Ids run from 1 with no gaps.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<QuestionDefinition>,
}

impl Catalog {
    pub fn new(questions: Vec<QuestionDefinition>) -> Result<Self, ProgressError> {
        if questions.is_empty() {
            return Err(ProgressError::EmptyCatalog);
        }
        for (position, question) in questions.iter().enumerate() {
            if question.id.index() != position || question.id.0 == 0 {
                return Err(ProgressError::MisnumberedCatalog {
                    position,
                    found: question.id.0,
                });
            }
        }
        Ok(Self { questions })
    }

    /// The application questionnaire.
    pub fn standard() -> Result<Self, ProgressError> {
        let questions = vec![
            question(1, "Before we start, what is your Full name?", InputKind::Text)
                .placeholder("Full Name"),
            question(
                2,
                "What's your email address? This is how we'll contact you.",
                InputKind::Email,
            )
            .placeholder("Email Address"),
            question(3, "Which country are you from? 🏡🏡🏡", InputKind::Text)
                .placeholder("Country"),
            question(4, "What is your phone number?", InputKind::Tel).placeholder("Phone Number"),
            question(
                5,
                "What languages and frameworks are you familiar with? Select all the languages you know.",
                InputKind::Text,
            )
            .placeholder("Languages and Frameworks"),
            question(
                6,
                "How would you describe your current level of coding experience?",
                InputKind::Text,
            )
            .placeholder("Coding Experience"),
            question(
                7,
                "What is your current annual compensation? (Optional)",
                InputKind::Text,
            )
            .disclaimer(
                "The information provided regarding salary will be kept confidential and will not \
                 be used as a determining factor for acceptance into the bootcamp. It will be used \
                 exclusively for career advancement guidance.",
            )
            .placeholder("Annual Compensation"),
            question(
                8,
                "Certifying Statement: This question is required. * I hereby acknowledge that this \
                 application form was completed by me (the individual seeking to enroll in Metana) \
                 and I did not receive help from any external sources. The responses submitted are \
                 entirely my own and based on my own reasoning. Also, I opt in to receive \
                 communication messages from Metana about my application.",
                InputKind::Checkbox,
            ),
            question(9, "LinkedIn URL (optional)", InputKind::Url)
                .disclaimer(
                    "Here's a snippet link to make your life easy - linkedin.com (It'll open in a \
                     new tab) 🚀",
                )
                .placeholder("LinkedIn URL"),
        ];
        Self::new(questions.into_iter().map(QuestionDefinition::from).collect())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&QuestionDefinition> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    /// Checks a client-supplied id against the catalog bounds.
    pub fn resolve(&self, raw: i64) -> Result<QuestionId, ProgressError> {
        if raw < 1 || raw as u64 > self.len() as u64 {
            return Err(ProgressError::InvalidQuestionId {
                id: raw,
                max: self.len(),
            });
        }
        Ok(QuestionId(raw as u32))
    }

    /// Clamps any id into `1..=len`. Used for backward navigation, which
    /// never fails.
    pub fn clamp(&self, raw: i64) -> QuestionId {
        QuestionId(raw.clamp(1, self.len() as i64) as u32)
    }
}

struct QuestionBuilder(QuestionDefinition);

fn question(id: u32, prompt: &str, input_kind: InputKind) -> QuestionBuilder {
    QuestionBuilder(QuestionDefinition {
        id: QuestionId(id),
        prompt: prompt.to_string(),
        input_kind,
        disclaimer: None,
        placeholder: None,
    })
}

impl QuestionBuilder {
    fn placeholder(mut self, text: &str) -> Self {
        self.0.placeholder = Some(text.to_string());
        self
    }

    fn disclaimer(mut self, text: &str) -> Self {
        self.0.disclaimer = Some(text.to_string());
        self
    }
}

impl From<QuestionBuilder> for QuestionDefinition {
    fn from(builder: QuestionBuilder) -> Self {
        builder.0
    }
}
