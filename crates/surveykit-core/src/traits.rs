//! Seams to the outside world: the persistence collaborator and the
//! result-reporting sink.
//!
//! `SurveyStore` is implemented by `surveykit-client` over HTTP and by
//! [`crate::memory::MemoryStore`] in-process.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::model::{
    Dashboard, NewResponse, ResponseDetail, ResponseId, SurveyDefinition, SurveyId,
};

// ---------------------------------------------------------------------------
// Persistence collaborator
// ---------------------------------------------------------------------------

/// Remote persistence for surveys and responses.
///
/// Every call is a single round trip with a pass/fail outcome. Retries and
/// authentication are the implementor's business.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch one survey definition for answering.
    async fn fetch_survey(&self, id: &str) -> Result<SurveyDefinition, RemoteError>;

    /// Persist a new survey atomically and return its id.
    async fn create_survey(&self, survey: &SurveyDefinition) -> Result<SurveyId, RemoteError>;

    /// Delete a survey (administrative).
    async fn delete_survey(&self, id: &str) -> Result<(), RemoteError>;

    /// All surveys, for the administrator's manager view.
    async fn list_surveys(&self) -> Result<Vec<SurveyDefinition>, RemoteError>;

    /// The caller's assigned and completed surveys.
    async fn dashboard(&self) -> Result<Dashboard, RemoteError>;

    /// Persist a response atomically and return its id.
    async fn submit_response(&self, response: &NewResponse) -> Result<ResponseId, RemoteError>;

    /// The caller's own responses, denormalised for display.
    async fn my_responses(&self) -> Result<Vec<ResponseDetail>, RemoteError>;

    /// Responses of one user, for administrator review.
    async fn user_responses(&self, user_id: &str) -> Result<Vec<ResponseDetail>, RemoteError>;

    /// Attach an evaluation; fails with [`RemoteError::Conflict`] if the
    /// response already has one.
    async fn attach_evaluation(&self, response_id: &str, text: &str) -> Result<(), RemoteError>;
}

// ---------------------------------------------------------------------------
// Result-reporting sink
// ---------------------------------------------------------------------------

/// Receives user-facing outcome messages from remote operations.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// No-op notifier.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn success(&self, _: &str) {}
    fn failure(&self, _: &str) {}
}

/// Notifier that forwards messages to `tracing`.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn failure(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
