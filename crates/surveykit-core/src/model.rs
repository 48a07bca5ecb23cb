//! Core data model types for surveykit.
//!
//! These are the types that travel between the authoring side, the
//! respondent side and the persistence collaborator: survey definitions,
//! answers, responses and the dashboard summaries built from them.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::{AnswerShape, QuestionType};

/// Identifier of a survey definition.
pub type SurveyId = String;
/// Identifier of a question, unique within its survey.
pub type QuestionId = String;
/// Identifier of an option, unique within its question.
pub type OptionId = String;
/// Identifier of a submitted response.
pub type ResponseId = String;

/// One selectable choice of a radio, checkbox or select question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub text: String,
}

/// A single question of a survey definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default = "default_true")]
    pub required: bool,
    /// Empty unless `question_type` is option-bearing.
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Look up one of this question's options by id.
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.option(option_id).is_some()
    }
}

fn default_true() -> bool {
    true
}

/// Immutable snapshot of a published survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDefinition {
    pub id: SurveyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Presentation order; also the order of `Response::answers`.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl SurveyDefinition {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Summary entry for list views.
    pub fn summary(&self) -> SurveySummary {
        SurveySummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            question_count: self.questions.len(),
            due_date: None,
            completed_at: None,
            evaluation: None,
        }
    }
}

/// A respondent's answer to one question.
///
/// On the wire a text answer and a single choice are both plain strings, so
/// deserialization cannot tell them apart and yields [`AnswerValue::Text`].
/// Use [`AnswerValue::conform`] to reinterpret a value for a known shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(BTreeSet<OptionId>),
    #[serde(skip_deserializing)]
    Choice(OptionId),
}

impl AnswerValue {
    pub fn text(s: impl Into<String>) -> Self {
        AnswerValue::Text(s.into())
    }

    pub fn choice(id: impl Into<OptionId>) -> Self {
        AnswerValue::Choice(id.into())
    }

    pub fn choices<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OptionId>,
    {
        AnswerValue::Choices(ids.into_iter().map(Into::into).collect())
    }

    /// The shape this value has.
    pub fn shape(&self) -> AnswerShape {
        match self {
            AnswerValue::Text(_) => AnswerShape::Text,
            AnswerValue::Choice(_) => AnswerShape::Identifier,
            AnswerValue::Choices(_) => AnswerShape::IdentifierSet,
        }
    }

    /// Reinterpret a loosely-typed value (as read from JSON or TOML) for the
    /// given shape. Returns `None` when no sensible conversion exists.
    pub fn conform(self, shape: AnswerShape) -> Option<AnswerValue> {
        match (self, shape) {
            (AnswerValue::Text(s), AnswerShape::Text) => Some(AnswerValue::Text(s)),
            (AnswerValue::Text(s), AnswerShape::Identifier)
            | (AnswerValue::Choice(s), AnswerShape::Identifier) => Some(AnswerValue::Choice(s)),
            (AnswerValue::Choices(set), AnswerShape::IdentifierSet) => {
                Some(AnswerValue::Choices(set))
            }
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(s) | AnswerValue::Choice(s) => write!(f, "{s}"),
            AnswerValue::Choices(set) => {
                let joined: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

/// In-progress respondent input, keyed by question id.
///
/// A key is present only once the respondent touched the question.
pub type AnswerMap = HashMap<QuestionId, AnswerValue>;

/// One entry of a response's ordered answer sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

/// Payload of a response submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResponse {
    pub survey_id: SurveyId,
    /// Aligned to the definition's question order.
    pub answers: Vec<Answer>,
}

/// A persisted response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: ResponseId,
    pub survey_id: SurveyId,
    pub respondent_id: String,
    pub answers: Vec<Answer>,
    pub submitted_at: DateTime<Utc>,
    /// Set at most once; never cleared.
    #[serde(default)]
    pub evaluation: Option<String>,
}

/// Survey summary used by dashboards and denormalised response views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub id: SurveyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub question_count: usize,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub evaluation: Option<String>,
}

/// The respondent's dashboard, partitioned into open and finished surveys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub assigned: Vec<SurveySummary>,
    #[serde(default)]
    pub completed: Vec<SurveySummary>,
}

/// An answer joined with the text of the question it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    pub question_id: QuestionId,
    pub question_text: String,
    pub value: AnswerValue,
}

/// A response joined with its survey and question texts, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetail {
    pub id: ResponseId,
    pub survey: SurveySummary,
    #[serde(default)]
    pub answers: Vec<AnswerDetail>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub evaluation: Option<String>,
}

impl ResponseDetail {
    /// Build the display view of `response` from the definition it answers.
    ///
    /// Answers whose question no longer exists in `survey` are dropped.
    pub fn join(response: &Response, survey: &SurveyDefinition) -> Self {
        let answers = response
            .answers
            .iter()
            .filter_map(|a| {
                survey.question(&a.question_id).map(|q| AnswerDetail {
                    question_id: a.question_id.clone(),
                    question_text: q.text.clone(),
                    value: a.value.clone(),
                })
            })
            .collect();

        let mut summary = survey.summary();
        summary.completed_at = Some(response.submitted_at);
        summary.evaluation = response.evaluation.clone();

        Self {
            id: response.id.clone(),
            survey: summary,
            answers,
            submitted_at: response.submitted_at,
            evaluation: response.evaluation.clone(),
        }
    }
}
