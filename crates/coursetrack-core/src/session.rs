//! Course session: the single owner of a learner's progress.
//!
//! A session ties one catalog to one progress store for the lifetime of a
//! front end. All learner actions go through it; derived views (metrics,
//! eligibility) are computed from the current record on request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::certificate::{self, CertificatePayload};
use crate::eligibility::{self, Outstanding};
use crate::error::CourseError;
use crate::metrics::{self, Metrics, ModuleStatus};
use crate::model::Catalog;
use crate::progress::{ProgressPatch, ProgressRecord, QuizScore};
use crate::quiz;
use crate::store::ProgressStore;

/// Sent to the completion hook after each successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub holder_name: String,
    pub holder_company: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub course_version: String,
    /// The record as persisted right after issuance.
    pub progress: ProgressRecord,
}

/// Receiver for completion events, e.g. an external training record system.
///
/// Called synchronously, once per issuance. The session neither waits on the
/// outcome nor retries.
pub trait CompletionHook {
    fn on_complete(&self, event: &CompletionEvent);
}

/// Completion hook that does nothing.
pub struct NoopHook;

impl CompletionHook for NoopHook {
    fn on_complete(&self, _: &CompletionEvent) {}
}

impl<F> CompletionHook for F
where
    F: Fn(&CompletionEvent),
{
    fn on_complete(&self, event: &CompletionEvent) {
        self(event)
    }
}

/// A learner's session over one course.
pub struct CourseSession {
    catalog: Catalog,
    store: ProgressStore,
    hook: Box<dyn CompletionHook>,
}

impl CourseSession {
    /// Start a session from whatever the store holds.
    ///
    /// A record marked as issued but without an issue date gets today's date.
    pub fn open(catalog: Catalog, store: ProgressStore) -> Self {
        let mut session = Self {
            catalog,
            store,
            hook: Box::new(NoopHook),
        };

        let record = session.store.record();
        if record.certificate_issued && record.date_issued.is_none() {
            tracing::info!("backfilling missing certificate issue date");
            session
                .store
                .update(ProgressPatch::default().date_issued(Utc::now().date_naive()));
        }

        session
    }

    /// Replace the completion hook.
    pub fn with_hook(mut self, hook: impl CompletionHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn record(&self) -> &ProgressRecord {
        self.store.record()
    }

    /// Whether progress is currently reaching durable storage.
    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }

    pub fn metrics(&self) -> Metrics {
        metrics::compute_metrics(&self.catalog, self.store.record())
    }

    pub fn module_statuses(&self) -> Vec<ModuleStatus> {
        metrics::module_statuses(&self.catalog, self.store.record())
    }

    pub fn can_issue_certificate(&self) -> bool {
        eligibility::can_issue_certificate(&self.catalog, self.store.record())
    }

    pub fn outstanding(&self) -> Outstanding {
        eligibility::outstanding(&self.catalog, self.store.record())
    }

    /// Mark a lesson as done.
    pub fn complete_lesson(&mut self, lesson_id: &str) -> Result<ProgressRecord, CourseError> {
        if self.catalog.lesson(lesson_id).is_none() {
            return Err(CourseError::UnknownLesson(lesson_id.to_string()));
        }
        if self.store.record().is_lesson_completed(lesson_id) {
            tracing::debug!(lesson_id, "lesson already completed");
            return Ok(self.store.record().clone());
        }

        let mut lessons = self.store.record().completed_lessons.clone();
        lessons.insert(lesson_id.to_string());
        tracing::info!(lesson_id, "lesson completed");
        Ok(self
            .store
            .update(ProgressPatch::default().completed_lessons(lessons)))
    }

    /// Score a quiz submission and record it, replacing any earlier score.
    pub fn submit_quiz(
        &mut self,
        module_id: &str,
        selections: &[Option<usize>],
    ) -> Result<QuizScore, CourseError> {
        let module = self
            .catalog
            .module(module_id)
            .ok_or_else(|| CourseError::UnknownModule(module_id.to_string()))?;
        let score = quiz::evaluate(&module.quiz, selections);

        let mut scores = self.store.record().quiz_scores.clone();
        scores.insert(module_id.to_string(), score);
        self.store
            .update(ProgressPatch::default().quiz_scores(scores));

        tracing::info!(
            module_id,
            correct = score.correct,
            total = score.total,
            passed = score.is_passing(),
            "quiz submitted"
        );
        Ok(score)
    }

    /// Save holder details ahead of issuance.
    pub fn save_holder_details(&mut self, name: &str, company: Option<&str>) -> ProgressRecord {
        let mut patch = ProgressPatch::default().holder_name(name.trim());
        if let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) {
            patch = patch.holder_company(company);
        }
        self.store.update(patch)
    }

    /// Issue a certificate now. See [`issue_certificate_at`](Self::issue_certificate_at).
    pub fn issue_certificate(
        &mut self,
        holder_name: &str,
        holder_company: Option<&str>,
    ) -> Result<CertificatePayload, CourseError> {
        self.issue_certificate_at(holder_name, holder_company, Utc::now())
    }

    /// Check the gate and the holder name, issue, persist and notify the hook.
    pub fn issue_certificate_at(
        &mut self,
        holder_name: &str,
        holder_company: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<CertificatePayload, CourseError> {
        let left = self.outstanding();
        if !left.is_empty() {
            return Err(CourseError::NotEligible {
                lessons: left.lessons.len(),
                quizzes: left.quizzes.len(),
            });
        }
        if !eligibility::has_holder_name(holder_name) {
            return Err(CourseError::MissingHolderName);
        }

        let (record, payload) = certificate::issue(
            &self.catalog,
            self.store.record(),
            holder_name,
            holder_company,
            now,
        );
        let progress = self.store.update(record.into());

        tracing::info!(reference = %payload.reference, "certificate issued");
        self.hook.on_complete(&CompletionEvent {
            holder_name: payload.holder_name.clone(),
            holder_company: payload.holder_company.clone(),
            issued_at: payload.issued_at,
            course_version: payload.course_version.clone(),
            progress,
        });

        Ok(payload)
    }

    /// Clear all progress. Irreversible; confirming with the learner is up to the caller.
    pub fn reset(&mut self) -> ProgressRecord {
        self.store.reset()
    }
}
