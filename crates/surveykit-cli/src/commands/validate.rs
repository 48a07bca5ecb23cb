//! The `surveykit validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(survey_path: PathBuf) -> Result<()> {
    let drafts = if survey_path.is_dir() {
        surveykit_core::parser::load_survey_directory(&survey_path)?
    } else {
        vec![surveykit_core::parser::parse_survey(&survey_path)?]
    };

    let mut total_warnings = 0;
    let mut invalid = 0;

    for draft in &drafts {
        println!("Survey: {} ({} questions)", draft.title(), draft.len());

        if let Err(e) = draft.validate() {
            println!("  INVALID: {e}");
            invalid += 1;
        }

        let warnings = surveykit_core::parser::lint_draft(draft);
        for w in &warnings {
            let prefix = w
                .position
                .map(|p| format!("  [question {}]", p + 1))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} survey(s) failed validation");
    }

    if total_warnings == 0 {
        println!("All surveys valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
