//! The learner's progress record and its partial-update patch.
//!
//! `ProgressRecord` is the only mutable state in the system. It is persisted
//! as a single JSON object; the field names on disk are camelCase.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed pass mark for every module quiz, in percent.
pub const PASS_MARK_PERCENT: u32 = 70;

/// Result of one quiz submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: u32,
    pub total: u32,
}

impl QuizScore {
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    /// `correct / total >= 0.70`, computed in integers. An empty quiz never passes.
    pub fn is_passing(&self) -> bool {
        self.total > 0
            && u64::from(self.correct) * 100 >= u64::from(self.total) * u64::from(PASS_MARK_PERCENT)
    }

    /// Rounded percentage of correct answers.
    pub fn percent(&self) -> u32 {
        crate::metrics::percent(self.correct as usize, self.total as usize)
    }
}

/// Persisted learner progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Completed lesson ids. Stored as `{ "<id>": true }`; absence means not completed.
    #[serde(with = "completed_set")]
    pub completed_lessons: BTreeSet<String>,
    /// Latest quiz score per module id.
    pub quiz_scores: BTreeMap<String, QuizScore>,
    pub certificate_issued: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_company: Option<String>,
    /// Date of the first issuance. Never overwritten once set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<NaiveDate>,
}

impl ProgressRecord {
    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    pub fn quiz_score(&self, module_id: &str) -> Option<QuizScore> {
        self.quiz_scores.get(module_id).copied()
    }

    /// Whether the module has a recorded, passing quiz score.
    pub fn is_quiz_passed(&self, module_id: &str) -> bool {
        self.quiz_score(module_id).is_some_and(|s| s.is_passing())
    }

    /// Shallow merge: every field set in `patch` replaces the whole field here.
    pub fn merged(mut self, patch: ProgressPatch) -> Self {
        if let Some(lessons) = patch.completed_lessons {
            self.completed_lessons = lessons;
        }
        if let Some(scores) = patch.quiz_scores {
            self.quiz_scores = scores;
        }
        if let Some(issued) = patch.certificate_issued {
            self.certificate_issued = issued;
        }
        if let Some(name) = patch.holder_name {
            self.holder_name = Some(name);
        }
        if let Some(company) = patch.holder_company {
            self.holder_company = Some(company);
        }
        if let Some(date) = patch.date_issued {
            self.date_issued = Some(date);
        }
        self
    }
}

/// A partial progress record for [`ProgressStore::update`](crate::store::ProgressStore::update).
///
/// The merge is shallow. Setting `completed_lessons` or `quiz_scores` replaces
/// the entire map, so callers that want to add one entry must read the current
/// map, insert into it, and pass the full result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPatch {
    pub completed_lessons: Option<BTreeSet<String>>,
    pub quiz_scores: Option<BTreeMap<String, QuizScore>>,
    pub certificate_issued: Option<bool>,
    pub holder_name: Option<String>,
    pub holder_company: Option<String>,
    pub date_issued: Option<NaiveDate>,
}

impl ProgressPatch {
    pub fn completed_lessons(mut self, lessons: BTreeSet<String>) -> Self {
        self.completed_lessons = Some(lessons);
        self
    }

    pub fn quiz_scores(mut self, scores: BTreeMap<String, QuizScore>) -> Self {
        self.quiz_scores = Some(scores);
        self
    }

    pub fn certificate_issued(mut self, issued: bool) -> Self {
        self.certificate_issued = Some(issued);
        self
    }

    pub fn holder_name(mut self, name: impl Into<String>) -> Self {
        self.holder_name = Some(name.into());
        self
    }

    pub fn holder_company(mut self, company: impl Into<String>) -> Self {
        self.holder_company = Some(company.into());
        self
    }

    pub fn date_issued(mut self, date: NaiveDate) -> Self {
        self.date_issued = Some(date);
        self
    }
}

/// A patch that sets every field the record has.
impl From<ProgressRecord> for ProgressPatch {
    fn from(record: ProgressRecord) -> Self {
        Self {
            completed_lessons: Some(record.completed_lessons),
            quiz_scores: Some(record.quiz_scores),
            certificate_issued: Some(record.certificate_issued),
            holder_name: record.holder_name,
            holder_company: record.holder_company,
            date_issued: record.date_issued,
        }
    }
}

/// `completedLessons` on disk is a map of id to `true`. Entries stored as
/// `false` read back as absent.
mod completed_set {
    use std::collections::{BTreeMap, BTreeSet};

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(set: &BTreeSet<String>, ser: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<&str, bool> = set.iter().map(|id| (id.as_str(), true)).collect();
        map.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeSet<String>, D::Error> {
        let map = BTreeMap::<String, bool>::deserialize(de)?;
        Ok(map
            .into_iter()
            .filter_map(|(id, done)| done.then_some(id))
            .collect())
    }
}
