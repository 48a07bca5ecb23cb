//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn surveykit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("surveykit").unwrap()
}

const PULSE: &str = r#"
[survey]
title = "Team Pulse"
description = "Monthly check-in"

[[questions]]
text = "How are you feeling?"
type = "radio"
options = ["Great", "Okay", "Rough"]

[[questions]]
text = "Which rituals help?"
type = "checkbox"
required = false
options = ["Standup", "Retro"]

[[questions]]
text = "Anything else?"
type = "textarea"
required = false
"#;

fn write_survey(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn validate_valid_survey() {
    let dir = TempDir::new().unwrap();
    let path = write_survey(&dir, "pulse.toml", PULSE);

    surveykit()
        .arg("validate")
        .arg("--survey")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("All surveys valid"));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();
    write_survey(&dir, "pulse.toml", PULSE);
    write_survey(
        &dir,
        "exit.toml",
        "[survey]\ntitle = \"Exit\"\ndescription = \"Bye\"\n\n[[questions]]\ntext = \"Why?\"\n",
    );

    surveykit()
        .arg("validate")
        .arg("--survey")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Team Pulse"))
        .stdout(predicate::str::contains("Exit"));
}

#[test]
fn validate_nonexistent_file() {
    surveykit()
        .arg("validate")
        .arg("--survey")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_reports_first_failing_rule() {
    let dir = TempDir::new().unwrap();
    let path = write_survey(
        &dir,
        "untitled.toml",
        "[survey]\ntitle = \"  \"\n\n[[questions]]\ntext = \"\"\n",
    );

    surveykit()
        .arg("validate")
        .arg("--survey")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("survey title is empty"))
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn validate_warns_on_required_checkbox() {
    let dir = TempDir::new().unwrap();
    let path = write_survey(
        &dir,
        "tools.toml",
        "[survey]\ntitle = \"Tools\"\ndescription = \"d\"\n\n[[questions]]\ntext = \"Pick\"\ntype = \"checkbox\"\noptions = [\"Git\"]\n",
    );

    surveykit()
        .arg("validate")
        .arg("--survey")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[question 1] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    surveykit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created surveykit.toml"))
        .stdout(predicate::str::contains("Created surveys/example.toml"));

    assert!(dir.path().join("surveykit.toml").exists());
    assert!(dir.path().join("surveys/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    surveykit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    surveykit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_validate_example() {
    let dir = TempDir::new().unwrap();

    surveykit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    surveykit()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--survey")
        .arg("surveys")
        .assert()
        .success()
        .stdout(predicate::str::contains("All surveys valid"));
}

#[test]
fn preview_lists_unanswered_required_questions() {
    let dir = TempDir::new().unwrap();
    let survey = write_survey(&dir, "pulse.toml", PULSE);
    let answers = dir.path().join("answers.toml");
    std::fs::write(&answers, "[answers]\n").unwrap();

    surveykit()
        .arg("preview")
        .arg("--survey")
        .arg(&survey)
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Survey: Team Pulse (3 questions)"))
        .stdout(predicate::str::contains("(no answer)"))
        .stdout(predicate::str::contains("1 required question(s) unanswered"));
}

#[test]
fn preview_without_required_questions_submits() {
    let dir = TempDir::new().unwrap();
    let survey = write_survey(
        &dir,
        "optional.toml",
        "[survey]\ntitle = \"Feedback\"\ndescription = \"Optional\"\n\n[[questions]]\ntext = \"Thoughts?\"\nrequired = false\n",
    );

    surveykit()
        .arg("preview")
        .arg("--survey")
        .arg(&survey)
        .assert()
        .success()
        .stdout(predicate::str::contains("Survey created successfully"))
        .stdout(predicate::str::contains("Survey submitted successfully!"));
}

#[test]
fn preview_json_prints_only_the_answers() {
    let dir = TempDir::new().unwrap();
    let survey = write_survey(
        &dir,
        "optional.toml",
        "[survey]\ntitle = \"Feedback\"\ndescription = \"Optional\"\n\n[[questions]]\ntext = \"Thoughts?\"\nrequired = false\n",
    );

    surveykit()
        .arg("preview")
        .arg("--survey")
        .arg(&survey)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("Survey created successfully").not())
        .stdout(predicate::str::contains("Survey:").not());
}

#[test]
fn preview_rejects_unknown_answer_question() {
    let dir = TempDir::new().unwrap();
    let survey = write_survey(&dir, "pulse.toml", PULSE);
    let answers = dir.path().join("answers.toml");
    std::fs::write(&answers, "[answers]\nghost = \"boo\"\n").unwrap();

    surveykit()
        .arg("preview")
        .arg("--survey")
        .arg(&survey)
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown question in answer file"));
}

#[test]
fn publish_to_unreachable_backend_fails() {
    let dir = TempDir::new().unwrap();
    let survey = write_survey(&dir, "pulse.toml", PULSE);
    let config = dir.path().join("surveykit.toml");
    std::fs::write(&config, "base_url = \"http://127.0.0.1:9\"\ntimeout_secs = 2\n").unwrap();

    surveykit()
        .env_remove("SURVEYKIT_BASE_URL")
        .arg("publish")
        .arg("--survey")
        .arg(&survey)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn missing_config_file_fails() {
    surveykit()
        .arg("list")
        .arg("--config")
        .arg("/definitely/not/here.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
