//! surveykit-client — HTTP survey store.
//!
//! Implements the `SurveyStore` collaborator against the survey backend's
//! REST API, and loads the client configuration.

pub mod config;
pub mod http;

pub use config::{load_config_from, SurveykitConfig};
pub use http::HttpSurveyStore;
