//! The `surveykit evaluate` command.

use std::path::PathBuf;

use anyhow::Result;
use surveykit_core::Evaluator;

use super::{connect, notifier};

pub async fn execute(response_id: String, text: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    Evaluator::new(store, notifier())
        .attach_evaluation_by_id(&response_id, &text)
        .await?;
    Ok(())
}
