//! The `surveykit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create surveykit.toml
    if std::path::Path::new("surveykit.toml").exists() {
        println!("surveykit.toml already exists, skipping.");
    } else {
        std::fs::write("surveykit.toml", SAMPLE_CONFIG)?;
        println!("Created surveykit.toml");
    }

    // Create example survey
    std::fs::create_dir_all("surveys")?;
    let example_path = std::path::Path::new("surveys/example.toml");
    if example_path.exists() {
        println!("surveys/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SURVEY)?;
        println!("Created surveys/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit surveykit.toml with your backend URL and token");
    println!("  2. Run: surveykit validate --survey surveys/example.toml");
    println!("  3. Run: surveykit publish --survey surveys/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# surveykit configuration

base_url = "http://localhost:5000"
api_token = "${SURVEYKIT_TOKEN}"
timeout_secs = 30
"#;

const EXAMPLE_SURVEY: &str = r#"[survey]
title = "Team Pulse"
description = "A short monthly check-in"

[[questions]]
text = "How was your month?"
type = "radio"
options = ["Great", "Fine", "Rough"]

[[questions]]
text = "Which meetings were useful?"
type = "checkbox"
required = false
options = ["Standup", "Planning", "Retro"]

[[questions]]
text = "Which team are you on?"
type = "select"
options = ["Engineering", "Design", "Operations"]

[[questions]]
text = "Anything else you want to share?"
type = "textarea"
required = false
"#;
