//! Administrator evaluations on submitted responses.
//!
//! An evaluation is free text attached once; there is no way to change or
//! remove it through this interface.

use std::sync::Arc;

use crate::error::{RemoteError, SurveyError, ValidationError};
use crate::model::{Response, ResponseDetail};
use crate::traits::{Notifier, SurveyStore};

/// Attaches evaluations through the injected store.
pub struct Evaluator {
    store: Arc<dyn SurveyStore>,
    notifier: Arc<dyn Notifier>,
}

impl Evaluator {
    pub fn new(store: Arc<dyn SurveyStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Attach `text` to `response` and record it locally on success.
    ///
    /// Fails without a remote call if the text is blank or the response is
    /// already evaluated.
    pub async fn attach_evaluation(
        &self,
        response: &mut Response,
        text: &str,
    ) -> Result<(), SurveyError> {
        if response.evaluation.is_some() {
            return Err(SurveyError::AlreadyEvaluated(response.id.clone()));
        }
        self.attach_evaluation_by_id(&response.id, text).await?;
        response.evaluation = Some(text.to_string());
        Ok(())
    }

    /// Attach `text` to the response with the given id.
    ///
    /// The store rejects a second evaluation; that conflict is reported as
    /// [`SurveyError::AlreadyEvaluated`].
    pub async fn attach_evaluation_by_id(
        &self,
        response_id: &str,
        text: &str,
    ) -> Result<(), SurveyError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyEvaluation.into());
        }

        match self.store.attach_evaluation(response_id, text).await {
            Ok(()) => {
                tracing::info!(response = response_id, "evaluation saved");
                self.notifier.success("Evaluation saved successfully");
                Ok(())
            }
            Err(RemoteError::Conflict(_)) => {
                tracing::warn!(response = response_id, "response already evaluated");
                self.notifier.failure("Response already has an evaluation");
                Err(SurveyError::AlreadyEvaluated(response_id.to_string()))
            }
            Err(e) => {
                tracing::warn!(response = response_id, "evaluation failed: {e}");
                self.notifier
                    .failure(&format!("Failed to save evaluation: {}", e.message()));
                Err(e.into())
            }
        }
    }

    /// Responses that still await an evaluation.
    pub fn pending(responses: &[ResponseDetail]) -> Vec<&ResponseDetail> {
        responses.iter().filter(|r| r.evaluation.is_none()).collect()
    }
}
