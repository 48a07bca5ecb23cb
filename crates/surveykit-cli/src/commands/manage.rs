//! The `surveykit publish`, `delete` and `list` commands.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use surveykit_core::SurveyBuilder;

use super::{connect, notifier};

pub async fn publish(survey_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let draft = surveykit_core::parser::parse_survey(&survey_path)?;
    for w in surveykit_core::parser::lint_draft(&draft) {
        let prefix = w
            .position
            .map(|p| format!("[question {}] ", p + 1))
            .unwrap_or_default();
        println!("{prefix}WARNING: {}", w.message);
    }

    let store = connect(config_path.as_deref())?;
    let mut builder = SurveyBuilder::with_draft(draft, store, notifier());
    let id = builder.publish().await?;
    println!("Survey id: {id}");
    Ok(())
}

pub async fn delete(id: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    store.delete_survey(&id).await?;
    println!("Deleted survey {id}");
    Ok(())
}

pub async fn list(config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    let surveys = store.list_surveys().await?;

    if surveys.is_empty() {
        println!("No surveys published yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Description", "Questions"]);
    for survey in &surveys {
        table.add_row(vec![
            Cell::new(&survey.id),
            Cell::new(&survey.title),
            Cell::new(&survey.description),
            Cell::new(survey.questions.len()),
        ]);
    }
    println!("{table}");

    Ok(())
}
