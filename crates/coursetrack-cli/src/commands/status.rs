//! The `coursetrack status` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use coursetrack_core::eligibility::Outstanding;
use coursetrack_core::metrics::{Metrics, ModuleStatus};
use coursetrack_core::progress::PASS_MARK_PERCENT;

use super::open_session;

#[derive(Serialize)]
struct StatusReport<'a> {
    course: &'a str,
    version: &'a str,
    est_minutes: u32,
    metrics: Metrics,
    modules: Vec<ModuleStatus>,
    can_issue_certificate: bool,
    certificate_issued: bool,
    outstanding: Outstanding,
}

pub fn execute(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let session = open_session(config_path)?;
    let catalog = session.catalog();
    let metrics = session.metrics();
    let record = session.record();

    if json {
        let report = StatusReport {
            course: &catalog.title,
            version: &catalog.version,
            est_minutes: catalog.est_minutes(),
            metrics,
            modules: session.module_statuses(),
            can_issue_certificate: session.can_issue_certificate(),
            certificate_issued: record.certificate_issued,
            outstanding: session.outstanding(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} (v{}, ~{} min)",
        catalog.title,
        catalog.version,
        catalog.est_minutes()
    );
    println!(
        "Overall progress: {}% | Lessons: {}/{} | Quizzes passed: {}/{} | Pass mark {}%",
        metrics.overall_percent,
        metrics.done_lessons,
        metrics.total_lessons,
        metrics.passed_quizzes,
        metrics.total_quizzes,
        PASS_MARK_PERCENT,
    );

    print_modules(&session.module_statuses());

    if record.certificate_issued {
        let date = record
            .date_issued
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!("Certificate issued on {date}.");
    } else if session.can_issue_certificate() {
        println!("All lessons and quizzes complete. Run `coursetrack certificate` to issue.");
    } else {
        let left = session.outstanding();
        println!(
            "Certificate locked: {} lesson(s) and {} quiz(zes) outstanding.",
            left.lessons.len(),
            left.quizzes.len()
        );
    }

    Ok(())
}

fn print_modules(statuses: &[ModuleStatus]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Module", "Title", "Lessons", "Quiz", "Status"]);

    for status in statuses {
        let quiz = match status.quiz_score {
            Some(score) => format!("{}/{} ({}%)", score.correct, score.total, score.percent()),
            None => "-".to_string(),
        };
        let state = if status.is_complete() {
            "Complete"
        } else if status.quiz_passed {
            "Quiz passed"
        } else {
            "Quiz pending"
        };
        table.add_row(vec![
            Cell::new(&status.module_id),
            Cell::new(&status.title),
            Cell::new(format!(
                "{}/{}",
                status.completed_lessons, status.total_lessons
            )),
            Cell::new(quiz),
            Cell::new(state),
        ]);
    }

    println!("{table}");
}
