//! TOML survey and answer file parser.
//!
//! Loads authored surveys into a [`SurveyDraft`] (through the draft's own
//! editing operations, so a file can express nothing the builder could
//! not), lints drafts for suspicious but publishable content, and reads
//! answer files against a published definition.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::draft::{QuestionField, SurveyDraft};
use crate::model::{AnswerMap, AnswerValue, SurveyDefinition};
use crate::registry::QuestionType;

/// Intermediate TOML structure for survey files.
#[derive(Debug, Deserialize)]
struct TomlSurveyFile {
    survey: TomlSurveyHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlSurveyHeader {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    text: String,
    #[serde(rename = "type", default = "default_type_str")]
    question_type: String,
    #[serde(default = "default_true")]
    required: bool,
    #[serde(default)]
    options: Vec<String>,
}

fn default_type_str() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

/// Intermediate TOML structure for answer files.
#[derive(Debug, Deserialize)]
struct TomlAnswerFile {
    #[serde(default)]
    answers: HashMap<String, TomlAnswer>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlAnswer {
    Single(String),
    Many(Vec<String>),
}

/// Parse a survey file into a draft.
pub fn parse_survey(path: &Path) -> Result<SurveyDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read survey file: {}", path.display()))?;

    parse_survey_str(&content, path)
}

/// Parse a TOML string into a draft (useful for testing).
pub fn parse_survey_str(content: &str, source_path: &Path) -> Result<SurveyDraft> {
    let parsed: TomlSurveyFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut draft = SurveyDraft::empty();
    draft.set_meta(parsed.survey.title, parsed.survey.description);

    for (position, q) in parsed.questions.into_iter().enumerate() {
        let question_type: QuestionType = q
            .question_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!("question {}: {e}", position + 1))?;

        if !question_type.has_options() && !q.options.is_empty() {
            anyhow::bail!(
                "question {}: options given for a {question_type} question",
                position + 1
            );
        }

        draft.add_question();
        draft.set_question_field(position, QuestionField::Text(q.text))?;
        draft.set_question_field(position, QuestionField::Type(question_type))?;
        draft.set_question_field(position, QuestionField::Required(q.required))?;
        for (option_position, text) in q.options.into_iter().enumerate() {
            draft.add_option(position)?;
            draft.set_option(position, option_position, text)?;
        }
    }

    Ok(draft)
}

/// Recursively load all `.toml` survey files from a directory.
pub fn load_survey_directory(dir: &Path) -> Result<Vec<SurveyDraft>> {
    let mut drafts = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            drafts.extend(load_survey_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_survey(&path) {
                Ok(draft) => drafts.push(draft),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(drafts)
}

/// A non-fatal issue found in a draft.
#[derive(Debug, Clone)]
pub struct LintWarning {
    /// Zero-based question position (if applicable).
    pub position: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check a draft for content that publishes but is probably unintended.
pub fn lint_draft(draft: &SurveyDraft) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    for (position, question) in draft.questions().enumerate() {
        let ty = question.question_type();

        if !ty.has_options() && question.option_count() > 0 {
            warnings.push(LintWarning {
                position: Some(position),
                message: format!(
                    "{} option(s) will be dropped: {ty} questions take no options",
                    question.option_count()
                ),
            });
        }

        if ty == QuestionType::Checkbox && question.required() {
            warnings.push(LintWarning {
                position: Some(position),
                message: "required has no effect on checkbox questions".into(),
            });
        }

        let mut seen = HashSet::new();
        for option in question.options() {
            let key = option.text.trim().to_lowercase();
            if !key.is_empty() && !seen.insert(key) {
                warnings.push(LintWarning {
                    position: Some(position),
                    message: format!("duplicate option text: {}", option.text.trim()),
                });
            }
        }
    }

    warnings
}

/// Parse an answer file against a published survey.
pub fn parse_answers(path: &Path, survey: &SurveyDefinition) -> Result<AnswerMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer file: {}", path.display()))?;

    parse_answers_str(&content, survey)
}

/// Parse answer TOML; each value is interpreted for its question's shape.
///
/// Option references may be given by id or by option text.
pub fn parse_answers_str(content: &str, survey: &SurveyDefinition) -> Result<AnswerMap> {
    let parsed: TomlAnswerFile = toml::from_str(content).context("failed to parse answers")?;

    let mut answers = AnswerMap::new();
    for (question_id, raw) in parsed.answers {
        let question = survey
            .question(&question_id)
            .with_context(|| format!("unknown question in answer file: {question_id}"))?;

        let resolve = |reference: String| -> String {
            question
                .options
                .iter()
                .find(|o| o.id == reference || o.text == reference)
                .map(|o| o.id.clone())
                .unwrap_or(reference)
        };

        let value = match raw {
            TomlAnswer::Single(s) if question.question_type.has_options() => {
                AnswerValue::Text(resolve(s))
            }
            TomlAnswer::Single(s) => AnswerValue::Text(s),
            TomlAnswer::Many(items) => {
                AnswerValue::Choices(items.into_iter().map(resolve).collect::<BTreeSet<_>>())
            }
        };

        let shape = question.question_type.answer_shape();
        let value = value.conform(shape).with_context(|| {
            format!("question {question_id}: expected {shape} for a {} question", question.question_type)
        })?;
        answers.insert(question_id, value);
    }

    Ok(answers)
}
