//! The `surveykit dashboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{connect, format_date};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    let dashboard = store.dashboard().await?;

    println!("Assigned surveys ({})", dashboard.assigned.len());
    if !dashboard.assigned.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Id", "Title", "Questions", "Due"]);
        for s in &dashboard.assigned {
            table.add_row(vec![
                Cell::new(&s.id),
                Cell::new(&s.title),
                Cell::new(s.question_count),
                Cell::new(format_date(s.due_date)),
            ]);
        }
        println!("{table}");
    }

    println!("\nCompleted surveys ({})", dashboard.completed.len());
    if !dashboard.completed.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Id", "Title", "Completed", "Evaluation"]);
        for s in &dashboard.completed {
            table.add_row(vec![
                Cell::new(&s.id),
                Cell::new(&s.title),
                Cell::new(format_date(s.completed_at)),
                Cell::new(s.evaluation.as_deref().unwrap_or("Pending")),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}
