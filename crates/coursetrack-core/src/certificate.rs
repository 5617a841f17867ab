//! Certificate issuance.
//!
//! [`issue`] trusts its caller: it must only be called once
//! [`can_issue_certificate`](crate::eligibility::can_issue_certificate) holds and
//! the holder name passed [`has_holder_name`](crate::eligibility::has_holder_name).
//! [`CourseSession::issue_certificate`](crate::session::CourseSession::issue_certificate)
//! performs both checks before getting here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Catalog;
use crate::progress::{ProgressPatch, ProgressRecord};

/// Everything needed to render a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificatePayload {
    /// Unique per issuance, e.g. `BAI-3F9A0C12D4E7`.
    pub reference: String,
    pub holder_name: String,
    #[serde(default)]
    pub holder_company: Option<String>,
    /// Moment of this issuance.
    pub issued_at: DateTime<Utc>,
    /// Date of the first issuance, as stored in the progress record.
    pub date_issued: NaiveDate,
    pub course_title: String,
    pub course_version: String,
}

/// Stamp `progress` with issuance metadata and build the certificate payload.
///
/// `date_issued` is only set when the record has none yet, so re-issuing
/// (for example under a corrected name) keeps the original date. Without a
/// company argument the one already on the record is printed.
pub fn issue(
    catalog: &Catalog,
    progress: &ProgressRecord,
    holder_name: &str,
    holder_company: Option<&str>,
    now: DateTime<Utc>,
) -> (ProgressRecord, CertificatePayload) {
    let holder_name = holder_name.trim().to_string();
    let holder_company = holder_company
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| progress.holder_company.clone());
    let date_issued = progress.date_issued.unwrap_or_else(|| now.date_naive());

    let mut patch = ProgressPatch::default()
        .certificate_issued(true)
        .holder_name(holder_name.clone())
        .date_issued(date_issued);
    if let Some(company) = &holder_company {
        patch = patch.holder_company(company.clone());
    }
    let record = progress.clone().merged(patch);

    let payload = CertificatePayload {
        reference: reference_code(&catalog.reference_prefix),
        holder_name,
        holder_company,
        issued_at: now,
        date_issued,
        course_title: catalog.title.clone(),
        course_version: catalog.version.clone(),
    };

    (record, payload)
}

/// `<prefix>-<12 hex digits>` drawn from a random UUID.
pub fn reference_code(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{prefix}-{}", &id[..12])
}

impl CertificatePayload {
    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("CERTIFICATE OF COMPLETION\n\n");
        out.push_str(&format!("  {}\n", self.holder_name));
        if let Some(company) = &self.holder_company {
            out.push_str(&format!("  {company}\n"));
        }
        out.push_str(&format!(
            "\nhas successfully completed {} (v{})\n",
            self.course_title, self.course_version
        ));
        out.push_str(&format!("\nIssued on {}\n", self.date_issued));
        out.push_str(&format!("Reference: {}\n", self.reference));
        out
    }

    /// Markdown rendering, suitable for pasting into documents.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("## Certificate of Completion\n\n");
        md.push_str(&format!("**{}**", self.holder_name));
        if let Some(company) = &self.holder_company {
            md.push_str(&format!(" ({company})"));
        }
        md.push_str(&format!(
            "\n\nhas successfully completed *{}*.\n\n",
            self.course_title
        ));
        md.push_str("| Field | Value |\n");
        md.push_str("|-------|-------|\n");
        md.push_str(&format!("| Issued on | {} |\n", self.date_issued));
        md.push_str(&format!("| Course version | {} |\n", self.course_version));
        md.push_str(&format!("| Reference | {} |\n", self.reference));
        md
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::fixtures::catalog;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn first_issuance_stamps_record() {
        let cat = catalog(&[1]);
        let (record, payload) = issue(
            &cat,
            &ProgressRecord::default(),
            "  Ada Lovelace ",
            Some("Analytical Engines Ltd"),
            at(2025, 3, 14),
        );

        assert!(record.certificate_issued);
        assert_eq!(record.holder_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(record.holder_company.as_deref(), Some("Analytical Engines Ltd"));
        assert_eq!(record.date_issued, NaiveDate::from_ymd_opt(2025, 3, 14));

        assert_eq!(payload.holder_name, "Ada Lovelace");
        assert_eq!(payload.course_version, "1.0.0");
        assert_eq!(payload.course_title, "Test Course");
        assert_eq!(payload.issued_at, at(2025, 3, 14));
        assert!(payload.reference.starts_with("TST-"));
    }

    #[test]
    fn reissue_keeps_original_date() {
        let cat = catalog(&[1]);
        let (first, _) = issue(&cat, &ProgressRecord::default(), "Ada", None, at(2025, 3, 14));
        let (second, payload) = issue(&cat, &first, "Ada King", None, at(2025, 6, 1));

        assert_eq!(second.date_issued, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(second.holder_name.as_deref(), Some("Ada King"));
        assert_eq!(payload.date_issued, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(payload.issued_at, at(2025, 6, 1));
    }

    #[test]
    fn blank_company_is_dropped() {
        let cat = catalog(&[1]);
        let (record, payload) =
            issue(&cat, &ProgressRecord::default(), "Ada", Some("  "), at(2025, 1, 1));
        assert!(record.holder_company.is_none());
        assert!(payload.holder_company.is_none());
    }

    #[test]
    fn stored_company_is_printed_when_none_given() {
        let cat = catalog(&[1]);
        let draft = ProgressRecord::default()
            .merged(ProgressPatch::default().holder_company("Acme".to_string()));

        let (record, payload) = issue(&cat, &draft, "Ada", None, at(2025, 1, 1));
        assert_eq!(payload.holder_company.as_deref(), Some("Acme"));
        assert_eq!(record.holder_company, payload.holder_company);
    }

    #[test]
    fn references_are_unique() {
        let a = reference_code("BAI");
        let b = reference_code("BAI");
        assert_ne!(a, b);
        assert_eq!(a.len(), "BAI-".len() + 12);
        assert!(a[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn renderings_include_holder_and_reference() {
        let cat = catalog(&[1]);
        let (_, payload) = issue(
            &cat,
            &ProgressRecord::default(),
            "Ada",
            Some("Acme"),
            at(2025, 3, 14),
        );

        let text = payload.to_text();
        assert!(text.contains("Ada"));
        assert!(text.contains("Acme"));
        assert!(text.contains("Issued on 2025-03-14"));
        assert!(text.contains(&payload.reference));

        let md = payload.to_markdown();
        assert!(md.contains("**Ada** (Acme)"));
        assert!(md.contains("| Course version | 1.0.0 |"));
    }
}
