//! Branching rules between sections.
//!
//! Some answers make later sections unnecessary:
//! - "No" to sputum collection makes sputum collection not required.
//! - "No" to a chest X-ray makes both X-ray sections not required.
//!
//! An answer only counts once the section holding it is completed. The
//! certificate outcome and its dates are derived here too.

use crate::application::Application;
use crate::constants::{
    CERTIFICATE_VALIDITY_MONTHS, CLOSE_CONTACT_CERTIFICATE_VALIDITY_MONTHS, SPUTUM_SAMPLE_COUNT,
};
use crate::sections::fields::sample_key;
use crate::sections::{SectionKind, SectionStatus};
use crate::validation::parts_to_date;
use chrono::{Datelike, Days, Months, NaiveDate};
use pets_types::YesOrNo;
use serde::Serialize;
use std::fmt;

/// Whether the applicant is getting a TB clearance certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CertificateOutcome {
    Issued,
    NotIssued,
}

/// Branch answers that affect the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchFlags {
    pub sputum_required: Option<bool>,
    pub chest_xray_taken: Option<bool>,
    pub certificate_outcome: Option<CertificateOutcome>,
}

fn completed_answer(app: &Application, kind: SectionKind, key: &str) -> Option<bool> {
    if !app.status(kind).is_completed() {
        return None;
    }
    app.text(kind, key)
        .and_then(|answer| answer.parse::<YesOrNo>().ok())
        .map(YesOrNo::is_yes)
}

impl BranchFlags {
    pub fn from_application(app: &Application) -> Self {
        let certificate_outcome = app
            .text(SectionKind::TbCertificate, "willIssueCertificate")
            .and_then(|answer| answer.parse::<YesOrNo>().ok())
            .map(|answer| {
                if answer.is_yes() {
                    CertificateOutcome::Issued
                } else {
                    CertificateOutcome::NotIssued
                }
            });
        Self {
            sputum_required: completed_answer(app, SectionKind::SputumDecision, "isSputumRequired"),
            chest_xray_taken: completed_answer(app, SectionKind::Medical, "chestXrayTaken"),
            certificate_outcome,
        }
    }

    /// True when an earlier answer rules `kind` out.
    pub fn forces_not_required(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::SputumCollection => self.sputum_required == Some(false),
            SectionKind::ChestXray | SectionKind::RadiologicalOutcome => {
                self.chest_xray_taken == Some(false)
            }
            _ => false,
        }
    }
}

/// Brings stored statuses in line with the branch answers.
///
/// Ruled-out sections become `NotRequired`. A `NotRequired` section whose branch
/// has been reversed goes back to `NotYetStarted`, or `InProgress` if it holds
/// data.
pub fn apply_branches(app: &mut Application) {
    let flags = BranchFlags::from_application(app);
    for kind in SectionKind::ALL {
        let current = app.status(kind);
        let next = if flags.forces_not_required(kind) {
            SectionStatus::NotRequired
        } else if current == SectionStatus::NotRequired {
            let has_data = app
                .section_ref(kind)
                .is_some_and(|section| section.data.values().any(|value| !value.is_blank()));
            if has_data {
                SectionStatus::InProgress
            } else {
                SectionStatus::NotYetStarted
            }
        } else {
            current
        };
        if next != current {
            tracing::debug!(section = %kind, from = ?current, to = ?next, "branch changed section status");
            app.set_status(kind, next);
        }
    }
}

// ============================================================================
// CERTIFICATE
// ============================================================================

/// Certificate expiry: six months after issue, or three after close contact with TB.
///
/// A day past the end of the target month rolls into the next month, so
/// 31 August plus six months is 3 March (2 March in a leap year).
///
/// Returns `None` only for dates at the edge of the calendar.
pub fn certificate_expiry(issue_date: NaiveDate, close_contact_with_tb: bool) -> Option<NaiveDate> {
    let months = if close_contact_with_tb {
        CLOSE_CONTACT_CERTIFICATE_VALIDITY_MONTHS
    } else {
        CERTIFICATE_VALIDITY_MONTHS
    };
    issue_date
        .with_day(1)?
        .checked_add_months(Months::new(months))?
        .checked_add_days(Days::new(u64::from(issue_date.day0())))
}

/// Issue date used when none is entered.
///
/// The X-ray date if an X-ray was taken, otherwise the medical screening date,
/// otherwise `today`.
pub fn default_certificate_issue_date(app: &Application, today: NaiveDate) -> NaiveDate {
    let date_of = |kind: SectionKind, key: &str| {
        app.section_ref(kind)
            .and_then(|section| section.date(key))
            .and_then(parts_to_date)
    };
    let xray_taken = app.text(SectionKind::Medical, "chestXrayTaken") == Some("Yes");
    xray_taken
        .then(|| date_of(SectionKind::ChestXray, "dateXrayTaken"))
        .flatten()
        .or_else(|| date_of(SectionKind::Medical, "completionDate"))
        .unwrap_or(today)
}

/// Issue date entered on the certificate form, or the default.
pub fn certificate_issue_date(app: &Application, today: NaiveDate) -> NaiveDate {
    app.section_ref(SectionKind::TbCertificate)
        .and_then(|section| section.date("certificateIssueDate"))
        .and_then(parts_to_date)
        .unwrap_or_else(|| default_certificate_issue_date(app, today))
}

/// Summary shown once the certificate decision is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CertificateSummary {
    Issued {
        certificate_number: String,
        issue_date: NaiveDate,
        expiry_date: NaiveDate,
    },
    NotIssued {
        reason: String,
        physician_name: String,
        comments: Option<String>,
    },
}

/// Builds the certificate summary, if the certificate section has enough answers.
pub fn certificate_summary(app: &Application, today: NaiveDate) -> Option<CertificateSummary> {
    let section = app.section_ref(SectionKind::TbCertificate)?;
    let answer: YesOrNo = section.text("willIssueCertificate")?.parse().ok()?;
    let comments = section.text("physicianComments").map(str::to_owned);

    if answer.is_yes() {
        let issue_date = certificate_issue_date(app, today);
        let close_contact = app.text(SectionKind::Medical, "closeContactWithTb") == Some("Yes");
        Some(CertificateSummary::Issued {
            certificate_number: section.text("certificateNumber")?.to_owned(),
            issue_date,
            expiry_date: certificate_expiry(issue_date, close_contact)?,
        })
    } else {
        Some(CertificateSummary::NotIssued {
            reason: section.text("reasonNotIssued")?.to_owned(),
            physician_name: section.text("declaringPhysicianName")?.to_owned(),
            comments,
        })
    }
}

// ============================================================================
// SPUTUM
// ============================================================================

/// Overall sputum result shown on the summary pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SputumOutcome {
    Positive,
    Negative,
    NotProvided,
}

impl fmt::Display for SputumOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SputumOutcome::Positive => "Positive",
            SputumOutcome::Negative => "Negative",
            SputumOutcome::NotProvided => "Not provided",
        })
    }
}

/// Positive if any smear or culture result is positive, negative if any result
/// is entered, otherwise not provided.
pub fn sputum_outcome(app: &Application) -> SputumOutcome {
    let Some(section) = app.section_ref(SectionKind::SputumCollection) else {
        return SputumOutcome::NotProvided;
    };
    let results: Vec<&str> = (1..=SPUTUM_SAMPLE_COUNT)
        .flat_map(|n| [sample_key(n, "SmearResult"), sample_key(n, "CultureResult")])
        .filter_map(|key| section.text(&key))
        .filter(|result| *result != "Not yet entered")
        .collect();

    if results.iter().any(|result| *result == "Positive") {
        SputumOutcome::Positive
    } else if results.is_empty() {
        SputumOutcome::NotProvided
    } else {
        SputumOutcome::Negative
    }
}
