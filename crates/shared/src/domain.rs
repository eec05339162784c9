use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 1-based position of a question in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub u32);

impl QuestionId {
    pub fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque token handed to the browser in the `session_id` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Tel,
    Url,
    Checkbox,
}

impl InputKind {
    /// Value of the HTML `type` attribute for this kind of input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Checkbox => "checkbox",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: QuestionId,
    pub prompt: String,
    pub input_kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub value: String,
}

/// Answers recorded for one respondent. `answers[i]` always belongs to
/// question `i + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub answers: Vec<AnswerRecord>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn empty(session_id: SessionId) -> Self {
        Self {
            session_id,
            answers: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn answer_for(&self, question_id: QuestionId) -> Option<&str> {
        self.answers
            .get(question_id.index())
            .filter(|record| record.question_id == question_id)
            .map(|record| record.value.as_str())
    }
}
