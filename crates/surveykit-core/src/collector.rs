//! Response collection for one survey session.
//!
//! The collector accumulates an [`AnswerMap`] against a fetched
//! [`SurveyDefinition`], checks each answer's shape through the registry,
//! and turns the map into an ordered submission. Once a submission
//! succeeds the session is closed.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{RemoteError, SurveyError, ValidationError};
use crate::model::{
    Answer, AnswerMap, AnswerValue, NewResponse, Question, QuestionId, ResponseId,
    SurveyDefinition,
};
use crate::registry::{AnswerShape, QuestionType};
use crate::traits::{Notifier, SurveyStore};

/// Single-respondent answering session.
pub struct ResponseCollector {
    survey: SurveyDefinition,
    answers: AnswerMap,
    submitted: bool,
    store: Arc<dyn SurveyStore>,
    notifier: Arc<dyn Notifier>,
}

impl ResponseCollector {
    pub fn new(
        survey: SurveyDefinition,
        store: Arc<dyn SurveyStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            survey,
            answers: AnswerMap::new(),
            submitted: false,
            store,
            notifier,
        }
    }

    /// Fetch the survey and start a session for it.
    ///
    /// A missing or forbidden survey becomes [`SurveyError::NoSurveyAvailable`].
    pub async fn open(
        survey_id: &str,
        store: Arc<dyn SurveyStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SurveyError> {
        match store.fetch_survey(survey_id).await {
            Ok(survey) => Ok(Self::new(survey, store, notifier)),
            Err(e @ (RemoteError::NotFound(_) | RemoteError::Forbidden(_))) => {
                notifier.failure("Survey not found or you don't have permission to access it");
                Err(SurveyError::NoSurveyAvailable(e.to_string()))
            }
            Err(e) => {
                notifier.failure("Failed to fetch survey");
                Err(e.into())
            }
        }
    }

    pub fn survey(&self) -> &SurveyDefinition {
        &self.survey
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Record an answer, replacing any previous one for the question.
    ///
    /// A string given for a radio/select question is taken as the option id.
    pub fn set_answer(
        &mut self,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<(), SurveyError> {
        self.ensure_open()?;
        let question = self.question(question_id)?;
        let expected = question.question_type.answer_shape();

        let found = value.shape();
        let value = value
            .conform(expected)
            .ok_or_else(|| SurveyError::ShapeMismatch {
                question_id: question_id.to_string(),
                expected,
                found,
            })?;

        match &value {
            AnswerValue::Choice(id) => check_option(question, id)?,
            AnswerValue::Choices(ids) => {
                for id in ids {
                    check_option(question, id)?;
                }
            }
            AnswerValue::Text(_) => {}
        }

        tracing::debug!(question = question_id, "answer set");
        self.answers.insert(question_id.to_string(), value);
        Ok(())
    }

    /// Add `option_id` to a checkbox answer, or remove it if present.
    pub fn toggle_checkbox_option(
        &mut self,
        question_id: &str,
        option_id: &str,
    ) -> Result<(), SurveyError> {
        self.ensure_open()?;
        let question = self.question(question_id)?;
        if question.question_type != QuestionType::Checkbox {
            return Err(SurveyError::ShapeMismatch {
                question_id: question_id.to_string(),
                expected: question.question_type.answer_shape(),
                found: AnswerShape::IdentifierSet,
            });
        }
        check_option(question, option_id)?;

        let entry = self
            .answers
            .entry(question_id.to_string())
            .or_insert_with(|| AnswerValue::Choices(BTreeSet::new()));
        if let AnswerValue::Choices(selected) = entry {
            if !selected.remove(option_id) {
                selected.insert(option_id.to_string());
            }
        }
        Ok(())
    }

    /// Required questions whose answer is missing or blank, in survey order.
    ///
    /// Checkbox questions never appear here, even when marked required.
    pub fn missing_required(&self) -> Vec<QuestionId> {
        self.survey
            .questions
            .iter()
            .filter(|q| {
                !q.question_type
                    .validate(q.required, &q.options, self.answers.get(&q.id))
            })
            .map(|q| q.id.clone())
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        !self.submitted && self.missing_required().is_empty()
    }

    /// The submission payload: answers in survey order, untouched questions
    /// omitted.
    pub fn build_response(&self) -> NewResponse {
        let answers = self
            .survey
            .questions
            .iter()
            .filter_map(|q| {
                self.answers.get(&q.id).map(|value| Answer {
                    question_id: q.id.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        NewResponse {
            survey_id: self.survey.id.clone(),
            answers,
        }
    }

    /// Submit the response through the store.
    ///
    /// On failure the session stays open and every answer is kept, so the
    /// call can simply be repeated.
    pub async fn submit(&mut self) -> Result<ResponseId, SurveyError> {
        self.ensure_open()?;
        if let Some(question_id) = self.missing_required().into_iter().next() {
            return Err(ValidationError::MissingRequiredAnswer { question_id }.into());
        }

        let payload = self.build_response();
        match self.store.submit_response(&payload).await {
            Ok(id) => {
                tracing::info!(survey = %self.survey.id, response = %id, "response submitted");
                self.submitted = true;
                self.notifier.success("Survey submitted successfully!");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(survey = %self.survey.id, "submit failed: {e}");
                self.notifier.failure(&e.message());
                Err(e.into())
            }
        }
    }

    fn ensure_open(&self) -> Result<(), SurveyError> {
        if self.submitted {
            Err(SurveyError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    fn question(&self, question_id: &str) -> Result<&Question, SurveyError> {
        self.survey
            .question(question_id)
            .ok_or_else(|| SurveyError::UnknownQuestion(question_id.to_string()))
    }
}

fn check_option(question: &Question, option_id: &str) -> Result<(), SurveyError> {
    if question.has_option(option_id) {
        Ok(())
    } else {
        Err(SurveyError::UnknownOption {
            question_id: question.id.clone(),
            option_id: option_id.to_string(),
        })
    }
}
