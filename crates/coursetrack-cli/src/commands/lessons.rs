//! The `coursetrack lessons`, `show-lesson` and `complete` commands.

use std::path::PathBuf;

use anyhow::Result;

use super::open_session;

pub fn list(config_path: Option<PathBuf>, module_filter: Option<String>) -> Result<()> {
    let session = open_session(config_path)?;
    let catalog = session.catalog();

    if let Some(id) = &module_filter {
        anyhow::ensure!(catalog.module(id).is_some(), "unknown module: {id}");
    } else {
        println!(
            "{}: {} modules, {} lessons, ~{} min",
            catalog.title,
            catalog.modules.len(),
            catalog.lesson_count(),
            catalog.est_minutes()
        );
        println!();
    }

    for module in &catalog.modules {
        if module_filter.as_ref().is_some_and(|id| *id != module.id) {
            continue;
        }
        println!("{} [{}] (~{} min)", module.title, module.id, module.est_minutes);
        for (idx, lesson) in module.lessons.iter().enumerate() {
            let mark = if session.record().is_lesson_completed(&lesson.id) {
                "x"
            } else {
                " "
            };
            println!(
                "  [{mark}] {}. {} ({}, ~{} min)",
                idx + 1,
                lesson.title,
                lesson.id,
                lesson.duration_min
            );
        }
        let quiz = if session.record().is_quiz_passed(&module.id) {
            "passed"
        } else {
            "pending"
        };
        println!("  Quiz: {quiz}");
        println!();
    }

    Ok(())
}

pub fn show(config_path: Option<PathBuf>, lesson_id: String) -> Result<()> {
    let session = open_session(config_path)?;
    let (module, lesson) = session
        .catalog()
        .lesson(&lesson_id)
        .ok_or_else(|| anyhow::anyhow!("unknown lesson: {lesson_id}"))?;

    println!("{} / {} (~{} min)", module.title, lesson.title, lesson.duration_min);
    println!();
    println!("{}", lesson.content.trim_end());
    println!();
    if session.record().is_lesson_completed(&lesson.id) {
        println!("Done.");
    } else {
        println!("Run `coursetrack complete {}` when finished.", lesson.id);
    }

    Ok(())
}

pub fn complete(config_path: Option<PathBuf>, lesson_id: String) -> Result<()> {
    let mut session = open_session(config_path)?;
    session.complete_lesson(&lesson_id)?;

    let metrics = session.metrics();
    println!(
        "Marked {lesson_id} as done. Lessons: {}/{} ({}% overall)",
        metrics.done_lessons, metrics.total_lessons, metrics.overall_percent
    );
    Ok(())
}
