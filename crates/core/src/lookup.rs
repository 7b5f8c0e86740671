//! Finding an applicant before a new application is started.
//!
//! The clinic searches by passport first. When nothing matches, it must confirm
//! it holds the applicant's written consent before the applicant details form
//! opens.

use crate::application::Application;
use crate::constants::GET_WRITTEN_CONSENT_PAGE;
use crate::section_state::ValidationErrors;
use crate::sections::fields::{applicant_search, validate_fields, written_consent, FieldSpec};
use crate::sections::{FieldMap, FieldValue, SectionKind};
use chrono::Utc;

fn check(specs: &[FieldSpec], pairs: &[(&str, &str)]) -> Result<(), ValidationErrors> {
    let form: FieldMap = pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), FieldValue::from(*value)))
        .collect();
    let errors = validate_fields(specs, &form, Utc::now().date_naive());
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Page to go to after the written-consent question.
///
/// # Errors
///
/// Returns a field error on `consent` unless the answer is "Yes" or "No".
pub fn consent_next_page(consent: &str) -> Result<&'static str, ValidationErrors> {
    check(&written_consent(), &[("consent", consent)])?;
    if consent.trim() == "Yes" {
        Ok(SectionKind::ApplicantDetails.entry_page())
    } else {
        Ok(GET_WRITTEN_CONSENT_PAGE)
    }
}

/// Checks the passport search form.
///
/// # Errors
///
/// Returns the field errors for a blank or badly formed passport number or country.
pub fn validate_search(passport_number: &str, country_of_issue: &str) -> Result<(), ValidationErrors> {
    check(
        &applicant_search(),
        &[
            ("passportNumber", passport_number),
            ("countryOfIssue", country_of_issue),
        ],
    )
}

/// True when the application's applicant details hold this passport.
///
/// Comparison ignores case and surrounding whitespace.
pub fn matches_passport(app: &Application, passport_number: &str, country_of_issue: &str) -> bool {
    let same = |key: &str, wanted: &str| {
        app.text(SectionKind::ApplicantDetails, key)
            .is_some_and(|stored| stored.eq_ignore_ascii_case(wanted.trim()))
    };
    same("passportNumber", passport_number) && same("countryOfIssue", country_of_issue)
}
