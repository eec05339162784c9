//! Question sequencing for the questionnaire wizard.
//!
//! A session's state is the number of answers it holds, `0..=N` for a
//! catalog of `N` questions. State `N` is terminal.

use std::sync::Arc;

use shared::{
    domain::{AnswerRecord, QuestionDefinition, SessionId, SessionState},
    protocol::{Step, StepView, SubmitOutcome},
};
use storage::SessionStore;
use tracing::{debug, info};

pub mod catalog;
pub mod error;

pub use catalog::Catalog;
pub use error::ProgressError;

#[derive(Clone)]
pub struct ProgressEngine {
    catalog: Arc<Catalog>,
    store: Arc<dyn SessionStore>,
}

impl ProgressEngine {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn SessionStore>) -> Self {
        Self { catalog, store }
    }

    /// Next unanswered question, or `Complete` once every question has an
    /// answer.
    pub fn current_question(&self, session: &SessionState) -> Step {
        match self.catalog.at(session.answered()) {
            Some(question) => Step::Question(question.clone()),
            None => Step::Complete,
        }
    }

    /// Records `value` for `question_id` and persists the updated snapshot.
    ///
    /// Answered questions are edited in place. Otherwise the id must be
    /// the next expected one.
    pub async fn record_answer(
        &self,
        mut session: SessionState,
        question_id: i64,
        value: impl Into<String>,
    ) -> Result<(SessionState, Step), ProgressError> {
        let step = apply_answer(&self.catalog, &mut session, question_id, value.into())?;
        self.store.put(&session.session_id, session.clone()).await?;
        Ok((session, step))
    }

    /// Question shown when the respondent steps back from `question_id`.
    /// Reads only; stored answers are left untouched.
    pub fn previous_question(&self, question_id: i64) -> &QuestionDefinition {
        let previous = self.catalog.clamp(question_id.saturating_sub(1));
        &self.catalog.questions()[previous.index()]
    }

    pub async fn load_session(
        &self,
        session_id: Option<&SessionId>,
    ) -> Result<SessionState, ProgressError> {
        match session_id {
            Some(id) => Ok(self.store.get(id).await?),
            None => Ok(SessionState::empty(SessionId::generate())),
        }
    }

    pub async fn start(&self, session_id: Option<&SessionId>) -> Result<StepView, ProgressError> {
        let session = self.load_session(session_id).await?;
        let step = self.current_question(&session);
        debug!(answered = session.answered(), complete = step.is_complete(), "start");
        Ok(self.view(step, session))
    }

    pub async fn submit(
        &self,
        session_id: Option<&SessionId>,
        question_id: i64,
        answer: impl Into<String>,
    ) -> Result<SubmitOutcome, ProgressError> {
        let (session, session_issued) = self.resolve_session(session_id).await?;
        let (session, step) = self.record_answer(session, question_id, answer).await?;

        info!(
            session_id = %session.session_id,
            question_id,
            answered = session.answered(),
            complete = step.is_complete(),
            "answer recorded"
        );

        Ok(SubmitOutcome {
            session_id: session.session_id.clone(),
            session_issued,
            view: self.view(step, session),
        })
    }

    pub async fn back(
        &self,
        session_id: Option<&SessionId>,
        question_id: i64,
    ) -> Result<StepView, ProgressError> {
        let session = self.load_session(session_id).await?;
        let question = self.previous_question(question_id).clone();
        debug!(question_id, previous = %question.id, "back");
        Ok(self.view(Step::Question(question), session))
    }

    /// Reuses a presented token only if the store holds a live session for
    /// it, so clients cannot pick their own session ids. The snapshot comes
    /// from the same lookup that decides issuance.
    async fn resolve_session(
        &self,
        presented: Option<&SessionId>,
    ) -> Result<(SessionState, bool), ProgressError> {
        if let Some(id) = presented {
            if let Some(session) = self.store.find(id).await? {
                return Ok((session, false));
            }
        }
        let issued = SessionId::generate();
        debug!(session_id = %issued, "issued session id");
        Ok((SessionState::empty(issued), true))
    }

    fn view(&self, step: Step, session: SessionState) -> StepView {
        StepView {
            step,
            session,
            total_questions: self.catalog.len(),
        }
    }
}

/// Applies one answer to a session snapshot and returns the step that
/// follows it.
pub fn apply_answer(
    catalog: &Catalog,
    session: &mut SessionState,
    question_id: i64,
    value: String,
) -> Result<Step, ProgressError> {
    let question_id = catalog.resolve(question_id)?;
    let answered = session.answered();

    if question_id.index() < answered {
        session.answers[question_id.index()].value = value;
    } else if question_id.index() == answered {
        session.answers.push(AnswerRecord { question_id, value });
    } else {
        return Err(ProgressError::OutOfSequence {
            expected: answered as u32 + 1,
            got: question_id.0,
        });
    }

    match catalog.at(question_id.index() + 1) {
        Some(next) => Ok(Step::Question(next.clone())),
        None => Ok(Step::Complete),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
