pub mod answer;
pub mod dashboard;
pub mod evaluate;
pub mod init;
pub mod manage;
pub mod preview;
pub mod responses;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use surveykit_client::HttpSurveyStore;
use surveykit_core::model::{AnswerValue, Question};
use surveykit_core::{Notifier, ResponseCollector, SurveyStore};

/// Prints outcome messages for the person at the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn failure(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Build the HTTP store from the config at `config_path` (or the default locations).
pub fn connect(config_path: Option<&Path>) -> Result<Arc<dyn SurveyStore>> {
    let config = surveykit_client::load_config_from(config_path)?;
    tracing::debug!(?config, "loaded config");
    Ok(Arc::new(HttpSurveyStore::new(&config)?))
}

pub fn notifier() -> Arc<dyn Notifier> {
    Arc::new(ConsoleNotifier)
}

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render an answer for display, showing option texts instead of ids.
pub fn describe_answer(question: &Question, value: &AnswerValue) -> String {
    let option_text = |id: &str| {
        question
            .option(id)
            .map(|o| o.text.clone())
            .unwrap_or_else(|| id.to_string())
    };
    match value {
        AnswerValue::Text(s) if question.question_type.has_options() => option_text(s),
        AnswerValue::Text(s) => s.clone(),
        AnswerValue::Choice(id) => option_text(id),
        AnswerValue::Choices(ids) => ids
            .iter()
            .map(|id| option_text(id))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Print the answers a collector would submit, in survey order.
pub fn print_answers(collector: &ResponseCollector) {
    let survey = collector.survey();
    for (position, question) in survey.questions.iter().enumerate() {
        let answer = collector
            .answer(&question.id)
            .map(|v| describe_answer(question, v))
            .unwrap_or_else(|| "(no answer)".to_string());
        println!("  {}. {}: {answer}", position + 1, question.text);
    }
}

/// Load an answer file and apply every entry to the collector.
pub fn fill_answers(collector: &mut ResponseCollector, path: &Path) -> Result<()> {
    let answers = surveykit_core::parser::parse_answers(path, collector.survey())?;
    for (question_id, value) in answers {
        collector
            .set_answer(&question_id, value)
            .with_context(|| format!("invalid answer in {}", path.display()))?;
    }
    Ok(())
}
