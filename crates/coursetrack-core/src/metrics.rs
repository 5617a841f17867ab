//! Aggregate progress metrics derived from the catalog and a progress record.
//!
//! Everything here is a pure function of its inputs and can be recomputed
//! after every change.

use serde::{Deserialize, Serialize};

use crate::model::Catalog;
use crate::progress::{ProgressRecord, QuizScore};

/// Course-wide completion figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Lessons across all modules.
    pub total_lessons: usize,
    /// Completed lesson entries in the record.
    pub done_lessons: usize,
    /// One quiz per module.
    pub total_quizzes: usize,
    /// Modules whose quiz has a passing score.
    pub passed_quizzes: usize,
    /// Lessons and passed quizzes over everything, 0..=100.
    pub overall_percent: u32,
}

/// Progress through a single module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStatus {
    pub module_id: String,
    pub title: String,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    /// Latest quiz score, if the quiz was ever submitted.
    pub quiz_score: Option<QuizScore>,
    pub quiz_passed: bool,
}

impl ModuleStatus {
    /// All lessons done and the quiz passed.
    pub fn is_complete(&self) -> bool {
        self.quiz_passed && self.completed_lessons == self.total_lessons
    }
}

/// `round(100 * num / den)` with halves rounded up, capped at 100. Zero when `den` is zero.
pub fn percent(num: usize, den: usize) -> u32 {
    if den == 0 {
        return 0;
    }
    let num = num as u64;
    let den = den as u64;
    let rounded = (num * 200 + den) / (2 * den);
    rounded.min(100) as u32
}

/// Compute course-wide metrics.
pub fn compute_metrics(catalog: &Catalog, progress: &ProgressRecord) -> Metrics {
    let total_lessons = catalog.lesson_count();
    let done_lessons = progress.completed_lessons.len();
    let total_quizzes = catalog.modules.len();
    let passed_quizzes = catalog
        .modules
        .iter()
        .filter(|m| progress.is_quiz_passed(&m.id))
        .count();

    let overall_percent = percent(
        done_lessons + passed_quizzes,
        total_lessons + total_quizzes,
    );

    Metrics {
        total_lessons,
        done_lessons,
        total_quizzes,
        passed_quizzes,
        overall_percent,
    }
}

/// Per-module progress, in catalog order.
pub fn module_statuses(catalog: &Catalog, progress: &ProgressRecord) -> Vec<ModuleStatus> {
    catalog
        .modules
        .iter()
        .map(|m| {
            let quiz_score = progress.quiz_score(&m.id);
            ModuleStatus {
                module_id: m.id.clone(),
                title: m.title.clone(),
                completed_lessons: m
                    .lessons
                    .iter()
                    .filter(|l| progress.is_lesson_completed(&l.id))
                    .count(),
                total_lessons: m.lessons.len(),
                quiz_score,
                quiz_passed: quiz_score.is_some_and(|s| s.is_passing()),
            }
        })
        .collect()
}
