//! Question type registry.
//!
//! The closed set of question variants and, for each one, the answer shape
//! it expects, how the presentation layer should render it, and the rule
//! that decides whether an answer satisfies it. Every consumer dispatches
//! through [`QuestionType::spec`], so adding a variant fails to compile
//! until the table below covers it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, QuestionOption};

/// The kinds of question a survey can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Radio,
    Checkbox,
    Select,
}

/// Shape of a valid answer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerShape {
    /// A single free-form string.
    Text,
    /// Exactly one option identifier.
    Identifier,
    /// Zero or more option identifiers.
    IdentifierSet,
}

impl fmt::Display for AnswerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerShape::Text => write!(f, "text"),
            AnswerShape::Identifier => write!(f, "single option"),
            AnswerShape::IdentifierSet => write!(f, "option set"),
        }
    }
}

/// Widget hint for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderKind {
    SingleLineInput,
    MultiLineInput,
    RadioGroup,
    CheckboxGroup,
    Dropdown,
}

/// Answer predicate: `(required, options, value) -> satisfied`.
///
/// `value` is `None` when the respondent has not touched the question.
pub type Validator = fn(bool, &[QuestionOption], Option<&AnswerValue>) -> bool;

/// Registry entry for one question type.
#[derive(Debug, Clone, Copy)]
pub struct TypeSpec {
    pub answer_shape: AnswerShape,
    pub render_kind: RenderKind,
    pub validate: Validator,
}

impl QuestionType {
    /// Every variant, in the order authoring tools should offer them.
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Text,
        QuestionType::Textarea,
        QuestionType::Radio,
        QuestionType::Checkbox,
        QuestionType::Select,
    ];

    /// The registry lookup.
    pub fn spec(self) -> TypeSpec {
        match self {
            QuestionType::Text => TypeSpec {
                answer_shape: AnswerShape::Text,
                render_kind: RenderKind::SingleLineInput,
                validate: validate_text,
            },
            QuestionType::Textarea => TypeSpec {
                answer_shape: AnswerShape::Text,
                render_kind: RenderKind::MultiLineInput,
                validate: validate_text,
            },
            QuestionType::Radio => TypeSpec {
                answer_shape: AnswerShape::Identifier,
                render_kind: RenderKind::RadioGroup,
                validate: validate_single_choice,
            },
            QuestionType::Checkbox => TypeSpec {
                answer_shape: AnswerShape::IdentifierSet,
                render_kind: RenderKind::CheckboxGroup,
                validate: validate_multi_choice,
            },
            QuestionType::Select => TypeSpec {
                answer_shape: AnswerShape::Identifier,
                render_kind: RenderKind::Dropdown,
                validate: validate_single_choice,
            },
        }
    }

    pub fn answer_shape(self) -> AnswerShape {
        self.spec().answer_shape
    }

    pub fn render_kind(self) -> RenderKind {
        self.spec().render_kind
    }

    /// Whether questions of this type carry a list of options.
    pub fn has_options(self) -> bool {
        !matches!(self.answer_shape(), AnswerShape::Text)
    }

    /// Whether `value` satisfies a question of this type.
    pub fn validate(
        self,
        required: bool,
        options: &[QuestionOption],
        value: Option<&AnswerValue>,
    ) -> bool {
        (self.spec().validate)(required, options, value)
    }
}

fn validate_text(required: bool, _options: &[QuestionOption], value: Option<&AnswerValue>) -> bool {
    match value {
        None => !required,
        Some(AnswerValue::Text(s)) => !required || !s.trim().is_empty(),
        Some(_) => false,
    }
}

fn validate_single_choice(
    required: bool,
    options: &[QuestionOption],
    value: Option<&AnswerValue>,
) -> bool {
    match value {
        None => !required,
        Some(AnswerValue::Choice(id)) => options.iter().any(|o| &o.id == id),
        Some(_) => false,
    }
}

// `required` has no effect on checkbox groups; an empty selection passes.
fn validate_multi_choice(
    _required: bool,
    options: &[QuestionOption],
    value: Option<&AnswerValue>,
) -> bool {
    match value {
        None => true,
        Some(AnswerValue::Choices(ids)) => ids.iter().all(|id| options.iter().any(|o| &o.id == id)),
        Some(_) => false,
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Text => write!(f, "text"),
            QuestionType::Textarea => write!(f, "textarea"),
            QuestionType::Radio => write!(f, "radio"),
            QuestionType::Checkbox => write!(f, "checkbox"),
            QuestionType::Select => write!(f, "select"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(QuestionType::Text),
            "textarea" => Ok(QuestionType::Textarea),
            "radio" => Ok(QuestionType::Radio),
            "checkbox" => Ok(QuestionType::Checkbox),
            "select" => Ok(QuestionType::Select),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}
