//! Certificate eligibility.
//!
//! Course completion and the holder-name requirement are separate checks:
//! the first is about the learner's progress, the second about what the
//! front end has collected.

use serde::Serialize;

use crate::model::Catalog;
use crate::progress::ProgressRecord;

/// True iff every catalog lesson is completed and every module quiz is passed.
pub fn can_issue_certificate(catalog: &Catalog, progress: &ProgressRecord) -> bool {
    catalog
        .lessons()
        .all(|l| progress.is_lesson_completed(&l.id))
        && catalog.modules.iter().all(|m| progress.is_quiz_passed(&m.id))
}

/// A holder name must contain something other than whitespace.
pub fn has_holder_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// What still stands between the learner and a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outstanding {
    /// Lesson ids not yet completed, in course order.
    pub lessons: Vec<String>,
    /// Module ids whose quiz is missing or below the pass mark.
    pub quizzes: Vec<String>,
}

impl Outstanding {
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty() && self.quizzes.is_empty()
    }
}

pub fn outstanding(catalog: &Catalog, progress: &ProgressRecord) -> Outstanding {
    Outstanding {
        lessons: catalog
            .lessons()
            .filter(|l| !progress.is_lesson_completed(&l.id))
            .map(|l| l.id.clone())
            .collect(),
        quizzes: catalog
            .modules
            .iter()
            .filter(|m| !progress.is_quiz_passed(&m.id))
            .map(|m| m.id.clone())
            .collect(),
    }
}
