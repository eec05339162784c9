use serde::{Deserialize, Serialize};

use crate::domain::{QuestionDefinition, SessionId, SessionState};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Body of `POST /submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitForm {
    pub question_id: i64,
    pub answer: String,
}

/// Body of `POST /back`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackForm {
    pub question_id: i64,
}

/// What the respondent should see next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Step {
    Question(QuestionDefinition),
    Complete,
}

impl Step {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A step together with the session snapshot needed to render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepView {
    pub step: Step,
    pub session: SessionState,
    pub total_questions: usize,
}

/// Result of recording an answer. `session_issued` is set when the
/// session token was minted during this request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub session_id: SessionId,
    pub session_issued: bool,
    pub view: StepView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputKind, QuestionId};

    #[test]
    fn step_serializes_with_tag() {
        let step = Step::Question(QuestionDefinition {
            id: QuestionId(2),
            prompt: "Email?".into(),
            input_kind: InputKind::Email,
            disclaimer: None,
            placeholder: None,
        });
        let json = serde_json::to_value(&step).expect("json");
        assert_eq!(json["type"], "question");
        assert_eq!(json["payload"]["id"], 2);
        assert_eq!(json["payload"]["input_kind"], "email");

        let done = serde_json::to_value(Step::Complete).expect("json");
        assert_eq!(done["type"], "complete");
    }
}
