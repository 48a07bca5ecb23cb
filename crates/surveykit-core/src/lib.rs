//! surveykit-core — Survey definition, authoring and response-validation engine.
//!
//! This crate defines the question type registry, the survey data model,
//! the authoring builder, the response collector and evaluation
//! attachment. Persistence is reached only through the [`traits::SurveyStore`]
//! collaborator.

pub mod builder;
pub mod collector;
pub mod draft;
pub mod error;
pub mod evaluation;
pub mod memory;
pub mod model;
pub mod parser;
pub mod registry;
pub mod traits;

pub use builder::SurveyBuilder;
pub use collector::ResponseCollector;
pub use draft::{QuestionField, SurveyDraft};
pub use error::{RemoteError, SurveyError, ValidationError};
pub use evaluation::Evaluator;
pub use memory::MemoryStore;
pub use registry::{AnswerShape, QuestionType, RenderKind};
pub use traits::{NoopNotifier, Notifier, SurveyStore, TracingNotifier};
