//! REST implementation of the survey store.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use surveykit_core::error::RemoteError;
use surveykit_core::model::{
    Dashboard, NewResponse, ResponseDetail, ResponseId, SurveyDefinition, SurveyId,
};
use surveykit_core::traits::SurveyStore;

use crate::config::SurveykitConfig;

const USER_AGENT: &str = concat!("surveykit/", env!("CARGO_PKG_VERSION"));

/// Survey store backed by the survey backend's HTTP API.
pub struct HttpSurveyStore {
    base_url: String,
    api_token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSurveyStore {
    pub fn new(config: &SurveykitConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or(USER_AGENT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and map every non-success outcome to a `RemoteError`.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RemoteError> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                RemoteError::Transport(format!(
                    "survey backend not reachable at {}",
                    self.base_url
                ))
            } else {
                RemoteError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status < 400 {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        Err(match status {
            401 | 403 => RemoteError::Forbidden(message),
            404 => RemoteError::NotFound(message),
            409 => RemoteError::Conflict(message),
            _ => RemoteError::Rejected { status, message },
        })
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
        let status = response.status().as_u16();
        response.json().await.map_err(|e| RemoteError::Rejected {
            status,
            message: format!("failed to parse response: {e}"),
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct CreatedBody {
    id: IdValue,
}

/// Backends disagree on whether ids are numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Str(String),
    Num(u64),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Str(s) => s,
            IdValue::Num(n) => n.to_string(),
        }
    }
}

#[derive(Serialize)]
struct EvaluationBody<'a> {
    evaluation: &'a str,
}

#[async_trait]
impl SurveyStore for HttpSurveyStore {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn fetch_survey(&self, id: &str) -> Result<SurveyDefinition, RemoteError> {
        let response = self
            .send(self.client.get(self.url(&format!("/api/surveys/{id}"))))
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, survey), fields(title = %survey.title))]
    async fn create_survey(&self, survey: &SurveyDefinition) -> Result<SurveyId, RemoteError> {
        let response = self
            .send(self.client.post(self.url("/api/admin/surveys")).json(survey))
            .await?;
        let created: CreatedBody = Self::json(response).await?;
        Ok(created.id.into_string())
    }

    #[instrument(skip(self))]
    async fn delete_survey(&self, id: &str) -> Result<(), RemoteError> {
        self.send(self.client.delete(self.url(&format!("/api/admin/surveys/{id}"))))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_surveys(&self) -> Result<Vec<SurveyDefinition>, RemoteError> {
        let response = self
            .send(self.client.get(self.url("/api/admin/surveys")))
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn dashboard(&self) -> Result<Dashboard, RemoteError> {
        let response = self
            .send(self.client.get(self.url("/api/surveys/dashboard")))
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, response), fields(survey = %response.survey_id))]
    async fn submit_response(&self, response: &NewResponse) -> Result<ResponseId, RemoteError> {
        let reply = self
            .send(self.client.post(self.url("/api/responses")).json(response))
            .await?;
        let created: CreatedBody = Self::json(reply).await?;
        Ok(created.id.into_string())
    }

    #[instrument(skip(self))]
    async fn my_responses(&self) -> Result<Vec<ResponseDetail>, RemoteError> {
        let response = self
            .send(self.client.get(self.url("/api/responses/my-answers")))
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn user_responses(&self, user_id: &str) -> Result<Vec<ResponseDetail>, RemoteError> {
        let response = self
            .send(
                self.client
                    .get(self.url(&format!("/api/admin/users/{user_id}/responses"))),
            )
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, text))]
    async fn attach_evaluation(&self, response_id: &str, text: &str) -> Result<(), RemoteError> {
        self.send(
            self.client
                .post(self.url(&format!("/api/admin/responses/{response_id}/evaluate")))
                .json(&EvaluationBody { evaluation: text }),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveykit_core::model::{Answer, AnswerValue};
    use surveykit_core::QuestionType;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> HttpSurveyStore {
        HttpSurveyStore::new(&SurveykitConfig {
            base_url: server.uri(),
            api_token: Some("test-token".into()),
            ..Default::default()
        })
        .unwrap()
    }

    fn survey_json() -> serde_json::Value {
        serde_json::json!({
            "id": "s1",
            "title": "Team pulse",
            "description": "Monthly",
            "questions": [
                {"id": "q1", "text": "Mood?", "type": "radio", "required": true,
                 "options": [{"id": "a", "text": "Good"}, {"id": "b", "text": "Bad"}]},
                {"id": "q2", "text": "Notes", "type": "textarea", "required": false}
            ]
        })
    }

    #[tokio::test]
    async fn fetch_survey_sends_token_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/surveys/s1"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(survey_json()))
            .mount(&server)
            .await;

        let survey = store(&server).fetch_survey("s1").await.unwrap();
        assert_eq!(survey.questions.len(), 2);
        assert_eq!(survey.questions[0].question_type, QuestionType::Radio);
        assert_eq!(survey.questions[0].options[1].text, "Bad");
        assert!(survey.questions[1].options.is_empty());
    }

    #[tokio::test]
    async fn status_codes_map_to_remote_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/surveys/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such survey"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/surveys/secret"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let store = store(&server);
        assert_eq!(
            store.fetch_survey("missing").await.unwrap_err(),
            RemoteError::NotFound("no such survey".into())
        );
        assert!(matches!(
            store.fetch_survey("secret").await.unwrap_err(),
            RemoteError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/responses"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"message": "Survey is closed"})),
            )
            .mount(&server)
            .await;

        let err = store(&server)
            .submit_response(&NewResponse {
                survey_id: "s1".into(),
                answers: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RemoteError::Rejected {
                status: 422,
                message: "Survey is closed".into()
            }
        );
    }

    #[tokio::test]
    async fn submit_posts_ordered_answers() {
        let server = MockServer::start().await;
        let expected = serde_json::json!({
            "surveyId": "s1",
            "answers": [
                {"questionId": "q1", "value": "a"},
                {"questionId": "q3", "value": ["x", "y"]}
            ]
        });
        Mock::given(method("POST"))
            .and(path("/api/responses"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 42})))
            .mount(&server)
            .await;

        let id = store(&server)
            .submit_response(&NewResponse {
                survey_id: "s1".into(),
                answers: vec![
                    Answer {
                        question_id: "q1".into(),
                        value: AnswerValue::choice("a"),
                    },
                    Answer {
                        question_id: "q3".into(),
                        value: AnswerValue::choices(["y", "x"]),
                    },
                ],
            })
            .await
            .unwrap();
        assert_eq!(id, "42");
    }

    #[tokio::test]
    async fn evaluation_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/responses/r1/evaluate"))
            .and(body_json(serde_json::json!({"evaluation": "Solid"})))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(serde_json::json!({"message": "already evaluated"})),
            )
            .mount(&server)
            .await;

        let err = store(&server)
            .attach_evaluation("r1", "Solid")
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::Conflict("already evaluated".into()));
    }

    #[tokio::test]
    async fn dashboard_parses_partitions() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "assigned": [{"id": "s1", "title": "Pulse", "description": "d",
                          "questionCount": 3, "dueDate": "2026-11-01T00:00:00Z"}],
            "completed": [{"id": "s2", "title": "Intro", "questionCount": 1,
                           "completedAt": "2026-10-01T12:00:00Z", "evaluation": "Nice"}]
        });
        Mock::given(method("GET"))
            .and(path("/api/surveys/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let dashboard = store(&server).dashboard().await.unwrap();
        assert_eq!(dashboard.assigned[0].question_count, 3);
        assert!(dashboard.assigned[0].due_date.is_some());
        assert_eq!(dashboard.completed[0].evaluation.as_deref(), Some("Nice"));
    }

    #[tokio::test]
    async fn delete_and_create() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/surveys/s1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/admin/surveys"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "s9"})))
            .mount(&server)
            .await;

        let store = store(&server);
        store.delete_survey("s1").await.unwrap();

        let survey: SurveyDefinition = serde_json::from_value(survey_json()).unwrap();
        assert_eq!(store.create_survey(&survey).await.unwrap(), "s9");
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_failure() {
        let store = HttpSurveyStore::new(&SurveykitConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let err = store.list_surveys().await.unwrap_err();
        assert!(err.is_transport(), "got {err:?}");
    }
}
