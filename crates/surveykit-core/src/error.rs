//! Error types.
//!
//! Three layers: [`ValidationError`] for local rule failures that never
//! reach the network, [`RemoteError`] for everything the persistence
//! collaborator reports, and [`SurveyError`] which the builder, collector
//! and evaluator return.

use thiserror::Error;

use crate::model::{QuestionId, ResponseId};
use crate::registry::AnswerShape;

/// A local invariant failed before any remote call was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("survey title is empty")]
    EmptyTitle,

    #[error("survey description is empty")]
    EmptyDescription,

    /// Positions are zero-based.
    #[error("question {} has no text", .position + 1)]
    EmptyQuestionText { position: usize },

    #[error("question {} needs at least one option", .position + 1)]
    MissingOptions { position: usize },

    #[error("option {} of question {} has no text", .option_position + 1, .position + 1)]
    EmptyOptionText {
        position: usize,
        option_position: usize,
    },

    #[error("required question '{question_id}' has no answer")]
    MissingRequiredAnswer { question_id: QuestionId },

    #[error("evaluation text is empty")]
    EmptyEvaluation,
}

/// A non-success outcome from the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The target is already in a state the request cannot change,
    /// e.g. a response that already carries an evaluation.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Returns `true` if the call never reached a verdict from the store.
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Timeout(_) | RemoteError::Transport(_))
    }

    /// The message suitable for showing to the user.
    pub fn message(&self) -> String {
        match self {
            RemoteError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors returned by the builder, collector and evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("question '{question_id}' has no option '{option_id}'")]
    UnknownOption {
        question_id: QuestionId,
        option_id: String,
    },

    #[error("question '{question_id}' expects {expected}, got {found}")]
    ShapeMismatch {
        question_id: QuestionId,
        expected: AnswerShape,
        found: AnswerShape,
    },

    #[error("question '{0}' does not take options")]
    NotOptionBearing(QuestionId),

    #[error("position {position} out of range (len {len})")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("response already submitted")]
    AlreadySubmitted,

    #[error("response '{0}' already has an evaluation")]
    AlreadyEvaluated(ResponseId),

    #[error("no survey available: {0}")]
    NoSurveyAvailable(String),
}

impl SurveyError {
    /// Returns `true` for caller mistakes (wrong id, wrong value shape,
    /// operating on a finished session) as opposed to user-correctable
    /// validation failures or remote outcomes.
    pub fn is_logic_error(&self) -> bool {
        matches!(
            self,
            SurveyError::UnknownQuestion(_)
                | SurveyError::UnknownOption { .. }
                | SurveyError::ShapeMismatch { .. }
                | SurveyError::NotOptionBearing(_)
                | SurveyError::PositionOutOfRange { .. }
                | SurveyError::AlreadySubmitted
        )
    }
}
