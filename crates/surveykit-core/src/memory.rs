//! In-process survey store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::RemoteError;
use crate::model::{
    Dashboard, NewResponse, Response, ResponseDetail, ResponseId, SurveyDefinition, SurveyId,
};
use crate::traits::SurveyStore;

const DEFAULT_RESPONDENT: &str = "local-user";

#[derive(Default)]
struct State {
    surveys: Vec<SurveyDefinition>,
    due_dates: HashMap<SurveyId, DateTime<Utc>>,
    responses: Vec<Response>,
    fail_next: Option<RemoteError>,
}

/// A [`SurveyStore`] that keeps everything in memory.
///
/// Acts on behalf of a single respondent (see [`MemoryStore::with_respondent`])
/// and enforces the same rules a real backend does: unique survey ids, one
/// response per respondent and survey, one evaluation per response.
pub struct MemoryStore {
    respondent: String,
    state: Mutex<State>,
    call_count: AtomicU32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            respondent: DEFAULT_RESPONDENT.to_string(),
            state: Mutex::new(State::default()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Act as the given respondent for submissions and `my_responses`.
    pub fn with_respondent(mut self, respondent: &str) -> Self {
        self.respondent = respondent.to_string();
        self
    }

    /// Pre-load a published survey.
    pub fn with_survey(self, survey: SurveyDefinition) -> Self {
        self.lock().surveys.push(survey);
        self
    }

    /// Set the due date shown on the dashboard for a survey.
    pub fn assign(&self, survey_id: &str, due: DateTime<Utc>) {
        self.lock().due_dates.insert(survey_id.to_string(), due);
    }

    /// Make the next call fail with `error` without touching any state.
    pub fn fail_next(&self, error: RemoteError) {
        self.lock().fail_next = Some(error);
    }

    /// Number of trait calls made so far, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn surveys(&self) -> Vec<SurveyDefinition> {
        self.lock().surveys.clone()
    }

    pub fn response(&self, id: &str) -> Option<Response> {
        self.lock().responses.iter().find(|r| r.id == id).cloned()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.lock().responses.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call and take any injected failure.
    fn begin(&self) -> Result<std::sync::MutexGuard<'_, State>, RemoteError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock();
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    fn details_for(state: &State, respondent: &str) -> Vec<ResponseDetail> {
        state
            .responses
            .iter()
            .filter(|r| r.respondent_id == respondent)
            .filter_map(|r| {
                state
                    .surveys
                    .iter()
                    .find(|s| s.id == r.survey_id)
                    .map(|s| ResponseDetail::join(r, s))
            })
            .collect()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_survey(&self, id: &str) -> Result<SurveyDefinition, RemoteError> {
        let state = self.begin()?;
        state
            .surveys
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("survey {id}")))
    }

    async fn create_survey(&self, survey: &SurveyDefinition) -> Result<SurveyId, RemoteError> {
        let mut state = self.begin()?;
        if state.surveys.iter().any(|s| s.id == survey.id) {
            return Err(RemoteError::Conflict(format!("survey {} exists", survey.id)));
        }
        state.surveys.push(survey.clone());
        Ok(survey.id.clone())
    }

    async fn delete_survey(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.begin()?;
        let before = state.surveys.len();
        state.surveys.retain(|s| s.id != id);
        if state.surveys.len() == before {
            return Err(RemoteError::NotFound(format!("survey {id}")));
        }
        state.due_dates.remove(id);
        Ok(())
    }

    async fn list_surveys(&self) -> Result<Vec<SurveyDefinition>, RemoteError> {
        let state = self.begin()?;
        Ok(state.surveys.clone())
    }

    async fn dashboard(&self) -> Result<Dashboard, RemoteError> {
        let state = self.begin()?;
        let mut dashboard = Dashboard::default();

        for survey in &state.surveys {
            let mut summary = survey.summary();
            let own = state
                .responses
                .iter()
                .find(|r| r.survey_id == survey.id && r.respondent_id == self.respondent);
            match own {
                Some(response) => {
                    summary.completed_at = Some(response.submitted_at);
                    summary.evaluation = response.evaluation.clone();
                    dashboard.completed.push(summary);
                }
                None => {
                    summary.due_date = state.due_dates.get(&survey.id).copied();
                    dashboard.assigned.push(summary);
                }
            }
        }

        Ok(dashboard)
    }

    async fn submit_response(&self, response: &NewResponse) -> Result<ResponseId, RemoteError> {
        let mut state = self.begin()?;

        let survey = state
            .surveys
            .iter()
            .find(|s| s.id == response.survey_id)
            .ok_or_else(|| RemoteError::NotFound(format!("survey {}", response.survey_id)))?;

        if let Some(stray) = response
            .answers
            .iter()
            .find(|a| survey.question(&a.question_id).is_none())
        {
            return Err(RemoteError::Rejected {
                status: 400,
                message: format!("unknown question {}", stray.question_id),
            });
        }

        if state
            .responses
            .iter()
            .any(|r| r.survey_id == response.survey_id && r.respondent_id == self.respondent)
        {
            return Err(RemoteError::Conflict(format!(
                "survey {} already answered",
                response.survey_id
            )));
        }

        let id = Uuid::new_v4().to_string();
        state.responses.push(Response {
            id: id.clone(),
            survey_id: response.survey_id.clone(),
            respondent_id: self.respondent.clone(),
            answers: response.answers.clone(),
            submitted_at: Utc::now(),
            evaluation: None,
        });
        Ok(id)
    }

    async fn my_responses(&self) -> Result<Vec<ResponseDetail>, RemoteError> {
        let state = self.begin()?;
        Ok(Self::details_for(&state, &self.respondent))
    }

    async fn user_responses(&self, user_id: &str) -> Result<Vec<ResponseDetail>, RemoteError> {
        let state = self.begin()?;
        Ok(Self::details_for(&state, user_id))
    }

    async fn attach_evaluation(&self, response_id: &str, text: &str) -> Result<(), RemoteError> {
        let mut state = self.begin()?;
        let response = state
            .responses
            .iter_mut()
            .find(|r| r.id == response_id)
            .ok_or_else(|| RemoteError::NotFound(format!("response {response_id}")))?;

        if response.evaluation.is_some() {
            return Err(RemoteError::Conflict(format!(
                "response {response_id} already evaluated"
            )));
        }
        response.evaluation = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, AnswerValue, Question};
    use crate::registry::QuestionType;

    fn survey(id: &str) -> SurveyDefinition {
        SurveyDefinition {
            id: id.into(),
            title: "Onboarding".into(),
            description: "First week".into(),
            questions: vec![Question {
                id: "q1".into(),
                text: "How was it?".into(),
                question_type: QuestionType::Text,
                required: true,
                options: vec![],
            }],
        }
    }

    fn answer(text: &str) -> NewResponse {
        NewResponse {
            survey_id: "s1".into(),
            answers: vec![Answer {
                question_id: "q1".into(),
                value: AnswerValue::text(text),
            }],
        }
    }

    #[tokio::test]
    async fn dashboard_partitions_by_own_responses() {
        let store = MemoryStore::new()
            .with_respondent("alice")
            .with_survey(survey("s1"))
            .with_survey(survey("s2"));
        let due = Utc::now();
        store.assign("s2", due);

        store.submit_response(&answer("fine")).await.unwrap();

        let dashboard = store.dashboard().await.unwrap();
        assert_eq!(dashboard.completed.len(), 1);
        assert_eq!(dashboard.completed[0].id, "s1");
        assert!(dashboard.completed[0].completed_at.is_some());
        assert_eq!(dashboard.assigned.len(), 1);
        assert_eq!(dashboard.assigned[0].due_date, Some(due));
    }

    #[tokio::test]
    async fn second_submission_conflicts() {
        let store = MemoryStore::new().with_survey(survey("s1"));
        store.submit_response(&answer("one")).await.unwrap();
        let err = store.submit_response(&answer("two")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Conflict(_)));
        assert_eq!(store.responses().len(), 1);
    }

    #[tokio::test]
    async fn unknown_question_is_rejected() {
        let store = MemoryStore::new().with_survey(survey("s1"));
        let mut bad = answer("x");
        bad.answers[0].question_id = "nope".into();
        let err = store.submit_response(&bad).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let store = MemoryStore::new().with_survey(survey("s1"));
        store.fail_next(RemoteError::Transport("down".into()));

        assert!(store.fetch_survey("s1").await.is_err());
        assert!(store.fetch_survey("s1").await.is_ok());
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn evaluation_is_one_shot() {
        let store = MemoryStore::new().with_survey(survey("s1"));
        let id = store.submit_response(&answer("ok")).await.unwrap();

        store.attach_evaluation(&id, "well done").await.unwrap();
        let err = store.attach_evaluation(&id, "again").await.unwrap_err();
        assert!(matches!(err, RemoteError::Conflict(_)));
        assert_eq!(
            store.response(&id).unwrap().evaluation.as_deref(),
            Some("well done")
        );
    }

    #[tokio::test]
    async fn delete_missing_survey_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_survey("ghost").await.unwrap_err();
        assert!(matches!(err, RemoteError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_responses_are_joined_with_question_text() {
        let store = MemoryStore::new()
            .with_respondent("bob")
            .with_survey(survey("s1"));
        store.submit_response(&answer("great")).await.unwrap();

        let details = store.user_responses("bob").await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].answers[0].question_text, "How was it?");
        assert!(store.user_responses("carol").await.unwrap().is_empty());
    }
}
