//! Save transitions for a single section.
//!
//! Both save actions merge the submitted fields over the stored data. "Save and
//! continue" validates the merged form first and leaves the section untouched on
//! failure; "save progress" never validates.

use crate::constants::{
    SPUTUM_RESULTS_PAGE, SPUTUM_SAMPLE_COUNT, TB_CERTIFICATE_SUMMARY_PAGE, TRACKER_PAGE,
};
use crate::sections::fields::{
    fields_for, sample_key, validate_fields, FieldError,
};
use crate::sections::{FieldMap, Section, SectionKind, SectionStatus};
use crate::PetsError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two ways a form can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveAction {
    SaveProgress,
    SaveAndContinue,
}

impl SaveAction {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveAction::SaveProgress => "save-progress",
            SaveAction::SaveAndContinue => "save-and-continue",
        }
    }
}

impl fmt::Display for SaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveAction {
    type Err = PetsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save-progress" => Ok(SaveAction::SaveProgress),
            "save-and-continue" => Ok(SaveAction::SaveAndContinue),
            other => Err(PetsError::InvalidInput(format!("unknown save action: {other}"))),
        }
    }
}

/// Field errors from a rejected "save and continue".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    /// One entry per failed field, in page order.
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Messages for the error summary box, in page order.
    pub fn summary(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// A successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub section: Section,
    pub next_page: String,
}

/// Applies a save to `current`.
///
/// # Arguments
///
/// * `kind` - Section being saved.
/// * `current` - Stored section state.
/// * `action` - How the form was submitted.
/// * `fields` - Submitted fields; these replace stored values with the same key.
/// * `today` - Reference date for date rules.
///
/// # Returns
///
/// The new section state and the page to go to next. The version is always
/// incremented by one.
///
/// # Errors
///
/// Returns [`ValidationErrors`] when "save and continue" fails validation. The
/// stored section must then be left as it was.
pub fn apply_save(
    kind: SectionKind,
    current: &Section,
    action: SaveAction,
    fields: FieldMap,
    today: NaiveDate,
) -> Result<Saved, ValidationErrors> {
    let mut data = current.data.clone();
    data.extend(fields);
    let specs = fields_for(kind);

    let (status, next_page) = match action {
        SaveAction::SaveProgress => {
            let still_valid = validate_fields(&specs, &data, today).is_empty();
            let status = if current.status.is_completed() && still_valid {
                SectionStatus::Completed
            } else {
                SectionStatus::InProgress
            };
            (status, TRACKER_PAGE.to_owned())
        }
        SaveAction::SaveAndContinue => {
            let errors = validate_fields(&specs, &data, today);
            if !errors.is_empty() {
                return Err(ValidationErrors { errors });
            }
            (SectionStatus::Completed, continue_page(kind, &data))
        }
    };

    Ok(Saved {
        section: Section {
            status,
            data,
            version: current.version + 1,
        },
        next_page,
    })
}

/// Page after a successful "save and continue".
fn continue_page(kind: SectionKind, data: &FieldMap) -> String {
    match kind {
        SectionKind::TbCertificate => TB_CERTIFICATE_SUMMARY_PAGE.to_owned(),
        SectionKind::SputumCollection if !all_sputum_results_entered(data) => {
            SPUTUM_RESULTS_PAGE.to_owned()
        }
        other => other.check_page().to_owned(),
    }
}

/// True when every sample has both a smear and a culture result.
pub fn all_sputum_results_entered(data: &FieldMap) -> bool {
    (1..=SPUTUM_SAMPLE_COUNT).all(|n| {
        ["SmearResult", "CultureResult"].iter().all(|suffix| {
            data.get(&sample_key(n, suffix))
                .is_some_and(|value| !value.is_blank())
        })
    })
}
