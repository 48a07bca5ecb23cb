//! The `surveykit answer` command.

use std::path::PathBuf;

use anyhow::Result;
use surveykit_core::ResponseCollector;

use super::{connect, fill_answers, notifier, print_answers};

pub async fn execute(
    survey_id: String,
    answers_path: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    let mut collector = ResponseCollector::open(&survey_id, store, notifier()).await?;

    println!("Survey: {}", collector.survey().title);
    fill_answers(&mut collector, &answers_path)?;
    print_answers(&collector);

    let response_id = collector.submit().await?;
    println!("Response id: {response_id}");
    Ok(())
}
