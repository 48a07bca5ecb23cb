//! The `surveykit preview` command.
//!
//! Runs the full author-then-answer flow against an in-memory store, so a
//! survey file and an answer file can be checked without a backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use surveykit_core::{MemoryStore, Notifier, ResponseCollector, SurveyBuilder, TracingNotifier};

use super::{fill_answers, notifier, print_answers};

pub async fn execute(
    survey_path: PathBuf,
    answers_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let draft = surveykit_core::parser::parse_survey(&survey_path)?;
    let store = Arc::new(MemoryStore::new());
    // With --json, stdout carries only the response; outcomes go to the log.
    let sink: Arc<dyn Notifier> = if json {
        Arc::new(TracingNotifier)
    } else {
        notifier()
    };

    let mut builder = SurveyBuilder::with_draft(draft, store.clone(), sink.clone());
    let survey_id = builder
        .publish()
        .await
        .with_context(|| format!("cannot publish {}", survey_path.display()))?;

    let mut collector = ResponseCollector::open(&survey_id, store.clone(), sink).await?;
    if let Some(path) = &answers_path {
        fill_answers(&mut collector, path)?;
    }

    if !json {
        println!(
            "Survey: {} ({} questions)",
            collector.survey().title,
            collector.survey().questions.len()
        );
        print_answers(&collector);
    }

    let missing = collector.missing_required();
    if !missing.is_empty() {
        if json {
            anyhow::bail!("{} required question(s) unanswered", missing.len());
        }
        println!("\n{} required question(s) unanswered.", missing.len());
        return Ok(());
    }

    let response_id = collector.submit().await?;
    if let Some(response) = store.response(&response_id) {
        if !json {
            println!();
        }
        println!("{}", serde_json::to_string_pretty(&response.answers)?);
    }

    Ok(())
}
