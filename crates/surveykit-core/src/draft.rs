//! Editable survey draft.
//!
//! Questions and their options live in id-keyed arenas with a separate
//! order vector. Positional operations resolve a position to an id once and
//! then work by id, so removing an entry never changes the identity of its
//! neighbours.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{SurveyError, ValidationError};
use crate::model::{OptionId, Question, QuestionId, QuestionOption, SurveyDefinition, SurveyId};
use crate::registry::QuestionType;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// One field of a question that the author can overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionField {
    Text(String),
    Type(QuestionType),
    Required(bool),
}

/// A question under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftQuestion {
    id: QuestionId,
    text: String,
    question_type: QuestionType,
    required: bool,
    option_order: Vec<OptionId>,
    options: HashMap<OptionId, String>,
}

impl DraftQuestion {
    fn blank() -> Self {
        Self {
            id: new_id(),
            text: String::new(),
            question_type: QuestionType::Text,
            required: true,
            option_order: Vec::new(),
            options: HashMap::new(),
        }
    }

    /// Stable id, kept across removals of other questions.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Question text as typed, untrimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current question type.
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    /// Whether an answer is required.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Number of options, including latent ones.
    pub fn option_count(&self) -> usize {
        self.option_order.len()
    }

    /// Options in display order. May be non-empty for a text question if
    /// the author switched its type after adding options.
    pub fn options(&self) -> Vec<QuestionOption> {
        self.option_order
            .iter()
            .map(|id| QuestionOption {
                id: id.clone(),
                text: self.options.get(id).cloned().unwrap_or_default(),
            })
            .collect()
    }

    fn option_id_at(&self, position: usize) -> Result<OptionId, SurveyError> {
        self.option_order
            .get(position)
            .cloned()
            .ok_or(SurveyError::PositionOutOfRange {
                position,
                len: self.option_order.len(),
            })
    }

    fn to_question(&self) -> Question {
        let options = if self.question_type.has_options() {
            self.options()
        } else {
            Vec::new()
        };
        Question {
            id: self.id.clone(),
            text: self.text.trim().to_string(),
            question_type: self.question_type,
            required: self.required,
            options,
        }
    }
}

/// An in-progress survey definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyDraft {
    id: SurveyId,
    title: String,
    description: String,
    order: Vec<QuestionId>,
    questions: HashMap<QuestionId, DraftQuestion>,
}

impl Default for SurveyDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyDraft {
    /// A blank draft holding a single default question.
    pub fn new() -> Self {
        let mut draft = Self::empty();
        draft.add_question();
        draft
    }

    /// A blank draft with no questions.
    pub fn empty() -> Self {
        Self {
            id: new_id(),
            title: String::new(),
            description: String::new(),
            order: Vec::new(),
            questions: HashMap::new(),
        }
    }

    /// Id the survey will be published under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title as typed, untrimmed.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description as typed, untrimmed.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when every question has been removed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Questions in presentation order.
    pub fn questions(&self) -> impl Iterator<Item = &DraftQuestion> {
        self.order.iter().filter_map(|id| self.questions.get(id))
    }

    /// The question at `position`, if any.
    pub fn question(&self, position: usize) -> Option<&DraftQuestion> {
        self.order.get(position).and_then(|id| self.questions.get(id))
    }

    /// Current position of the question with `id`.
    pub fn question_position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|q| q == id)
    }

    /// Overwrite title and description. Checked only at publish.
    pub fn set_meta(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.title = title.into();
        self.description = description.into();
    }

    /// Append a blank text question and return its id.
    pub fn add_question(&mut self) -> QuestionId {
        let question = DraftQuestion::blank();
        let id = question.id.clone();
        self.order.push(id.clone());
        self.questions.insert(id.clone(), question);
        id
    }

    /// Remove the question at `position` and return its id.
    pub fn remove_question(&mut self, position: usize) -> Result<QuestionId, SurveyError> {
        let id = self.question_id_at(position)?;
        self.remove_question_by_id(&id)?;
        Ok(id)
    }

    /// Remove the question with `id`.
    pub fn remove_question_by_id(&mut self, id: &str) -> Result<(), SurveyError> {
        if self.questions.remove(id).is_none() {
            return Err(SurveyError::UnknownQuestion(id.to_string()));
        }
        self.order.retain(|q| q != id);
        Ok(())
    }

    /// Overwrite one field of the question at `position`.
    ///
    /// Changing the type never touches the question's options.
    pub fn set_question_field(
        &mut self,
        position: usize,
        field: QuestionField,
    ) -> Result<(), SurveyError> {
        let question = self.question_mut_at(position)?;
        match field {
            QuestionField::Text(text) => question.text = text,
            QuestionField::Type(ty) => question.question_type = ty,
            QuestionField::Required(required) => question.required = required,
        }
        Ok(())
    }

    /// Append an empty option to the question at `position`.
    pub fn add_option(&mut self, position: usize) -> Result<OptionId, SurveyError> {
        let question = self.question_mut_at(position)?;
        if !question.question_type.has_options() {
            return Err(SurveyError::NotOptionBearing(question.id.clone()));
        }
        let id = new_id();
        question.option_order.push(id.clone());
        question.options.insert(id.clone(), String::new());
        Ok(id)
    }

    /// Overwrite the text of an option by position.
    pub fn set_option(
        &mut self,
        position: usize,
        option_position: usize,
        text: impl Into<String>,
    ) -> Result<(), SurveyError> {
        let question = self.question_mut_at(position)?;
        let id = question.option_id_at(option_position)?;
        question.options.insert(id, text.into());
        Ok(())
    }

    /// Remove an option by position and return its id.
    pub fn remove_option(
        &mut self,
        position: usize,
        option_position: usize,
    ) -> Result<OptionId, SurveyError> {
        let question = self.question_mut_at(position)?;
        let id = question.option_id_at(option_position)?;
        question.options.remove(&id);
        question.option_order.retain(|o| o != &id);
        Ok(id)
    }

    /// Check every publish rule and produce the immutable definition.
    ///
    /// Rules are checked in a fixed order and the first failure is returned:
    /// title, description, question texts, then options of option-bearing
    /// questions. A draft with no questions passes.
    pub fn validate(&self) -> Result<SurveyDefinition, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        for (position, question) in self.questions().enumerate() {
            if question.text.trim().is_empty() {
                return Err(ValidationError::EmptyQuestionText { position });
            }
        }

        for (position, question) in self.questions().enumerate() {
            if !question.question_type.has_options() {
                continue;
            }
            if question.option_order.is_empty() {
                return Err(ValidationError::MissingOptions { position });
            }
            for (option_position, option) in question.options().iter().enumerate() {
                if option.text.trim().is_empty() {
                    return Err(ValidationError::EmptyOptionText {
                        position,
                        option_position,
                    });
                }
            }
        }

        Ok(SurveyDefinition {
            id: self.id.clone(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            questions: self.questions().map(DraftQuestion::to_question).collect(),
        })
    }

    fn question_id_at(&self, position: usize) -> Result<QuestionId, SurveyError> {
        self.order
            .get(position)
            .cloned()
            .ok_or(SurveyError::PositionOutOfRange {
                position,
                len: self.order.len(),
            })
    }

    fn question_mut_at(&mut self, position: usize) -> Result<&mut DraftQuestion, SurveyError> {
        let id = self.question_id_at(position)?;
        self.questions
            .get_mut(&id)
            .ok_or(SurveyError::UnknownQuestion(id))
    }
}
