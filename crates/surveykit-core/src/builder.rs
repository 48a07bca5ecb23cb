//! Survey authoring session.
//!
//! [`SurveyBuilder`] owns a [`SurveyDraft`] and publishes it through the
//! injected [`SurveyStore`]. Publishing is all-or-nothing: on any failure
//! the draft is left exactly as it was.

use std::sync::Arc;

use crate::draft::{QuestionField, SurveyDraft};
use crate::error::SurveyError;
use crate::model::{OptionId, QuestionId, SurveyId};
use crate::traits::{Notifier, SurveyStore};

/// Mutable authoring session producing a survey definition.
pub struct SurveyBuilder {
    draft: SurveyDraft,
    store: Arc<dyn SurveyStore>,
    notifier: Arc<dyn Notifier>,
}

impl SurveyBuilder {
    /// Start a session with a blank draft.
    pub fn new(store: Arc<dyn SurveyStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_draft(SurveyDraft::new(), store, notifier)
    }

    /// Resume a session from an existing draft (e.g. one loaded from a file).
    pub fn with_draft(
        draft: SurveyDraft,
        store: Arc<dyn SurveyStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            draft,
            store,
            notifier,
        }
    }

    /// The draft being edited.
    pub fn draft(&self) -> &SurveyDraft {
        &self.draft
    }

    /// Overwrite title and description.
    pub fn set_meta(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.draft.set_meta(title, description);
    }

    /// Append a blank text question and return its id.
    pub fn add_question(&mut self) -> QuestionId {
        let id = self.draft.add_question();
        tracing::debug!(question = %id, "added question");
        id
    }

    /// Remove the question at `position` and return its id.
    pub fn remove_question(&mut self, position: usize) -> Result<QuestionId, SurveyError> {
        let id = self.draft.remove_question(position)?;
        tracing::debug!(question = %id, position, "removed question");
        Ok(id)
    }

    /// Overwrite one field of the question at `position`.
    pub fn set_question_field(
        &mut self,
        position: usize,
        field: QuestionField,
    ) -> Result<(), SurveyError> {
        self.draft.set_question_field(position, field)
    }

    /// Append an empty option to the question at `position`.
    pub fn add_option(&mut self, position: usize) -> Result<OptionId, SurveyError> {
        self.draft.add_option(position)
    }

    /// Overwrite option text by position.
    pub fn set_option(
        &mut self,
        position: usize,
        option_position: usize,
        text: impl Into<String>,
    ) -> Result<(), SurveyError> {
        self.draft.set_option(position, option_position, text)
    }

    /// Remove an option by position and return its id.
    pub fn remove_option(
        &mut self,
        position: usize,
        option_position: usize,
    ) -> Result<OptionId, SurveyError> {
        self.draft.remove_option(position, option_position)
    }

    /// Validate the draft and hand it to the store.
    ///
    /// On success the draft resets to a single blank question and the
    /// created survey id is returned. Validation failures never reach the
    /// store.
    pub async fn publish(&mut self) -> Result<SurveyId, SurveyError> {
        let survey = self.draft.validate()?;

        match self.store.create_survey(&survey).await {
            Ok(id) => {
                tracing::info!(survey = %id, questions = survey.questions.len(), "published survey");
                self.notifier.success("Survey created successfully");
                self.draft = SurveyDraft::new();
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(store = self.store.name(), "publish failed: {e}");
                self.notifier
                    .failure(&format!("Failed to create survey: {}", e.message()));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RemoteError, ValidationError};
    use crate::memory::MemoryStore;
    use crate::registry::QuestionType;
    use crate::traits::testing::RecordingNotifier;

    fn session() -> (Arc<MemoryStore>, Arc<RecordingNotifier>, SurveyBuilder) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let builder = SurveyBuilder::new(store.clone(), notifier.clone());
        (store, notifier, builder)
    }

    fn fill(builder: &mut SurveyBuilder) {
        builder.set_meta("Retro", "Sprint 12");
        builder
            .set_question_field(0, QuestionField::Text("What went well?".into()))
            .unwrap();
        builder.add_question();
        builder
            .set_question_field(1, QuestionField::Text("Pick one".into()))
            .unwrap();
        builder
            .set_question_field(1, QuestionField::Type(QuestionType::Radio))
            .unwrap();
        builder.add_option(1).unwrap();
        builder.set_option(1, 0, "Keep").unwrap();
        builder.add_option(1).unwrap();
        builder.set_option(1, 1, "Drop").unwrap();
    }

    #[tokio::test]
    async fn publish_persists_and_resets() {
        let (store, notifier, mut builder) = session();
        fill(&mut builder);
        let draft_id = builder.draft().id().to_string();

        let id = builder.publish().await.unwrap();

        assert_eq!(id, draft_id);
        let stored = store.surveys();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].questions[1].options.len(), 2);
        assert_eq!(builder.draft().len(), 1);
        assert!(builder.draft().title().is_empty());
        assert_ne!(builder.draft().id(), draft_id);
        assert_eq!(notifier.successes().len(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_fails_first_rule_without_remote_call() {
        let (store, _notifier, mut builder) = session();
        let before = builder.draft().clone();

        let err = builder.publish().await.unwrap_err();

        assert_eq!(err, SurveyError::Validation(ValidationError::EmptyTitle));
        assert_eq!(builder.draft(), &before);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn emptied_draft_publishes_without_questions() {
        let (store, _notifier, mut builder) = session();
        builder.set_meta("Announcement", "Read only");
        builder.remove_question(0).unwrap();

        builder.publish().await.unwrap();

        let stored = store.surveys();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].questions.is_empty());
    }

    #[tokio::test]
    async fn remote_failure_leaves_draft_intact() {
        let (store, notifier, mut builder) = session();
        fill(&mut builder);
        let before = builder.draft().clone();
        store.fail_next(RemoteError::Transport("connection reset".into()));

        let err = builder.publish().await.unwrap_err();

        assert!(matches!(err, SurveyError::Remote(RemoteError::Transport(_))));
        assert_eq!(builder.draft(), &before);
        assert!(store.surveys().is_empty());
        assert_eq!(notifier.failures().len(), 1);

        builder.publish().await.unwrap();
        assert_eq!(store.surveys().len(), 1);
    }
}
