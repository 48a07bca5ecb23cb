//! The `surveykit my-answers` and `responses` commands.

use std::path::PathBuf;

use anyhow::Result;
use surveykit_core::model::ResponseDetail;
use surveykit_core::Evaluator;

use super::connect;

pub async fn mine(config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    let responses = store.my_responses().await?;

    if responses.is_empty() {
        println!("You have not answered any surveys yet.");
        return Ok(());
    }
    for detail in &responses {
        print_detail(detail);
    }
    Ok(())
}

pub async fn for_user(user: String, pending_only: bool, config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    let responses = store.user_responses(&user).await?;

    let shown: Vec<&ResponseDetail> = if pending_only {
        Evaluator::pending(&responses)
    } else {
        responses.iter().collect()
    };

    println!(
        "{} response(s) for {user}, {} awaiting evaluation",
        responses.len(),
        Evaluator::pending(&responses).len()
    );
    for detail in shown {
        print_detail(detail);
    }
    Ok(())
}

fn print_detail(detail: &ResponseDetail) {
    println!(
        "\n{} [{}] submitted {}",
        detail.survey.title,
        detail.id,
        detail.submitted_at.format("%Y-%m-%d %H:%M")
    );
    for answer in &detail.answers {
        println!("  {}: {}", answer.question_text, answer.value);
    }
    match &detail.evaluation {
        Some(text) => println!("  Evaluation: {text}"),
        None => println!("  Evaluation: pending"),
    }
}
