//! Field rules per section.
//!
//! Each section's form is described by an ordered list of [`FieldSpec`]s. The order
//! is the order of the fields on the page, which is also the order of the error
//! summary.

use super::{FieldMap, FieldValue, SectionKind};
use crate::constants::{MAX_FREE_TEXT_WORDS, SPUTUM_SAMPLE_COUNT};
use crate::validation::{validate_date, validate_word_limit, DateMessages, DateRule, Pattern};
use chrono::NaiveDate;
use serde::Serialize;

pub const YES_NO: &[&str] = &["Yes", "No"];
pub const SEX_OPTIONS: &[&str] = &["Female", "Male"];
pub const VISA_CATEGORIES: &[&str] = &["Work", "Study", "Family reunion", "Other", "Do not know"];
pub const PREGNANT_OPTIONS: &[&str] = &["Yes", "No", "Don't know", "N/A"];
pub const MENSTRUAL_PERIOD_OPTIONS: &[&str] = &["Yes", "No", "N/A"];
pub const XRAY_RESULTS: &[&str] = &["Chest X-ray normal", "Non-TB abnormality", "Old or active TB"];
pub const COLLECTION_METHODS: &[&str] = &["Coughed up", "Induced", "Gastric lavage", "Not known"];
pub const SPUTUM_RESULTS: &[&str] = &["Positive", "Negative", "Inconclusive", "Not yet entered"];
pub const XRAY_NOT_TAKEN_REASONS: &[&str] = &["Child", "Pregnant", "Other"];
pub const NOT_ISSUED_REASONS: &[&str] = &[
    "Confirmed or suspected TB",
    "Testing postponed",
    "Visa applicant has withdrawn their TB screening",
];

/// What a field accepts.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Free text, optionally restricted to a character set and a word limit.
    Text {
        pattern: Option<Pattern>,
        max_words: Option<usize>,
    },
    /// One of a fixed set of radio or select answers.
    Choice(&'static [&'static str]),
    Date {
        rule: DateRule,
        messages: DateMessages,
    },
    /// Checkbox group or comma-separated text; any items accepted.
    List,
    /// Digits only, no greater than `max`.
    WholeNumber { max: u32 },
}

/// Rules for one form field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: String,
    /// Name used in pattern and word-limit messages.
    pub label: String,
    pub rule: FieldRule,
    pub required: bool,
    /// Message shown when a required field is blank.
    pub missing_message: String,
    /// The field only applies when each listed field holds the given answer.
    pub only_when: Vec<(&'static str, &'static str)>,
}

impl FieldSpec {
    fn new(key: impl Into<String>, label: impl Into<String>, rule: FieldRule) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            rule,
            required: false,
            missing_message: String::new(),
            only_when: Vec::new(),
        }
    }

    fn text(key: &str, label: &str, pattern: Pattern) -> Self {
        Self::new(
            key,
            label,
            FieldRule::Text {
                pattern: Some(pattern),
                max_words: None,
            },
        )
    }

    fn free_text(key: &str, label: &str) -> Self {
        Self::new(
            key,
            label,
            FieldRule::Text {
                pattern: None,
                max_words: Some(MAX_FREE_TEXT_WORDS),
            },
        )
    }

    fn file_name(key: &str, label: &str) -> Self {
        Self::new(
            key,
            label,
            FieldRule::Text {
                pattern: None,
                max_words: None,
            },
        )
    }

    fn choice(key: &str, label: &str, options: &'static [&'static str]) -> Self {
        Self::new(key, label, FieldRule::Choice(options))
    }

    fn date(key: &str, rule: DateRule, messages: DateMessages) -> Self {
        let missing = messages.empty.clone();
        let label = messages.name.clone();
        Self::new(key, label, FieldRule::Date { rule, messages }).required(missing)
    }

    fn list(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldRule::List)
    }

    fn whole_number(key: &str, label: &str, max: u32) -> Self {
        Self::new(key, label, FieldRule::WholeNumber { max })
    }

    fn required(mut self, missing_message: impl Into<String>) -> Self {
        self.required = true;
        self.missing_message = missing_message.into();
        self
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn only_when(mut self, key: &'static str, equals: &'static str) -> Self {
        self.only_when.push((key, equals));
        self
    }

    /// Whether the field applies given the other answers in `data`.
    pub fn is_active(&self, data: &FieldMap) -> bool {
        self.only_when.iter().all(|(key, equals)| {
            data.get(*key)
                .and_then(FieldValue::as_text)
                .is_some_and(|answer| answer.trim() == *equals)
        })
    }

    /// Validates a present, non-blank value.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message for the first failed rule.
    pub fn check(&self, value: &FieldValue, today: NaiveDate) -> Result<(), String> {
        match (&self.rule, value) {
            (FieldRule::Text { pattern, max_words }, FieldValue::Text(text)) => {
                let text = text.trim();
                if let Some(pattern) = pattern {
                    pattern.validate(text, &self.label)?;
                }
                if let Some(limit) = max_words {
                    validate_word_limit(text, *limit, &self.label)?;
                }
                Ok(())
            }
            (FieldRule::Choice(options), FieldValue::Text(answer)) => {
                if options.contains(&answer.trim()) {
                    Ok(())
                } else {
                    Err(self.choice_message())
                }
            }
            (FieldRule::Date { rule, messages }, FieldValue::Date(parts)) => {
                validate_date(parts, *rule, messages, today).map(|_| ())
            }
            (FieldRule::List, FieldValue::List(_) | FieldValue::Text(_)) => Ok(()),
            (FieldRule::WholeNumber { max }, FieldValue::Text(text)) => {
                let text = text.trim();
                if !Pattern::NumbersOnly.is_match(text) {
                    return Err(format!("{} must be a number.", self.label));
                }
                match text.parse::<u32>() {
                    Ok(n) if n <= *max => Ok(()),
                    _ => Err(format!("{} must be {max} or less.", self.label)),
                }
            }
            _ => Err(format!("{} has the wrong type of answer", self.label)),
        }
    }

    fn choice_message(&self) -> String {
        if self.missing_message.is_empty() {
            format!("Select a valid option for {}", self.label)
        } else {
            self.missing_message.clone()
        }
    }
}

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validates `data` against `specs`, in field order.
///
/// Inactive conditional fields are skipped entirely.
pub fn validate_fields(specs: &[FieldSpec], data: &FieldMap, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for spec in specs.iter().filter(|spec| spec.is_active(data)) {
        let message = match data.get(&spec.key) {
            Some(value) if !value.is_blank() => spec.check(value, today).err(),
            _ if spec.required => Some(spec.missing_message.clone()),
            _ => None,
        };
        if let Some(message) = message {
            errors.push(FieldError {
                field: spec.key.clone(),
                message,
            });
        }
    }
    errors
}

// ============================================================================
// SECTION FORMS
// ============================================================================

const SELECT_A_COUNTRY: &str = "Select a country.";

const MAX_AGE_YEARS: u32 = 150;

fn numbers_only_date(name: &str, prefix: &str) -> DateMessages {
    DateMessages::standard(name)
        .with_invalid_chars(format!("{prefix} day, month and year must contain only numbers"))
}

/// Ordered field rules for `kind`.
pub fn fields_for(kind: SectionKind) -> Vec<FieldSpec> {
    match kind {
        SectionKind::ApplicantDetails => applicant_details(),
        SectionKind::Travel => travel_information(),
        SectionKind::Medical => medical_screening(),
        SectionKind::ChestXray => chest_xray(),
        SectionKind::RadiologicalOutcome => radiological_outcome(),
        SectionKind::SputumDecision => sputum_decision(),
        SectionKind::SputumCollection => sputum_collection(),
        SectionKind::TbCertificate => tb_certificate(),
    }
}

/// The written-consent question asked before a new application is started.
pub fn written_consent() -> Vec<FieldSpec> {
    vec![FieldSpec::choice("consent", "Written consent", YES_NO)
        .required("Select yes if you have the visa applicant's written consent for TB screening")]
}

/// The passport search form.
pub fn applicant_search() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("passportNumber", "Passport number", Pattern::LettersAndNumbers)
            .required("Enter the applicant's passport number."),
        FieldSpec::text("countryOfIssue", "Country of issue", Pattern::LettersSpacesAndPunctuation)
            .required(SELECT_A_COUNTRY),
    ]
}

fn applicant_details() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("fullName", "Full name", Pattern::LettersAndSpaces)
            .required("Enter the applicant's full name."),
        FieldSpec::choice("sex", "Sex", SEX_OPTIONS).required("Select the applicant's sex."),
        FieldSpec::text("countryOfNationality", "Country of nationality", Pattern::LettersSpacesAndPunctuation)
            .required(SELECT_A_COUNTRY),
        FieldSpec::date(
            "dateOfBirth",
            DateRule::TodayOrPast,
            DateMessages::standard("Date of birth")
                .with_must_be_past("Date of birth date must be in the past"),
        ),
        FieldSpec::text("passportNumber", "Passport number", Pattern::LettersAndNumbers)
            .required("Enter the applicant's passport number."),
        FieldSpec::text("countryOfIssue", "Country of issue", Pattern::LettersSpacesAndPunctuation)
            .required(SELECT_A_COUNTRY),
        FieldSpec::date(
            "passportIssueDate",
            DateRule::TodayOrPast,
            numbers_only_date("Passport issue date", "Passport issue"),
        ),
        FieldSpec::date(
            "passportExpiryDate",
            DateRule::Future,
            numbers_only_date("Passport expiry date", "Passport expiry"),
        ),
        FieldSpec::text("applicantHomeAddress1", "Home address", Pattern::LettersNumbersSpacesAndPunctuation)
            .required("Enter the first line of the applicant's home address."),
        FieldSpec::text("applicantHomeAddress2", "Home address", Pattern::LettersNumbersSpacesAndPunctuation),
        FieldSpec::text("applicantHomeAddress3", "Home address", Pattern::LettersNumbersSpacesAndPunctuation),
        FieldSpec::text("townOrCity", "Town name", Pattern::LettersSpacesAndPunctuation)
            .required("Enter the town or city of the applicant's home address."),
        FieldSpec::text("provinceOrState", "Province/state name", Pattern::LettersSpacesAndPunctuation)
            .required("Enter the province or state of the applicant's home address."),
        FieldSpec::text("country", "Country", Pattern::LettersSpacesAndPunctuation)
            .required(SELECT_A_COUNTRY),
        FieldSpec::text("postcode", "Postcode", Pattern::LettersNumbersAndSpaces),
        FieldSpec::file_name("applicantPhotoFileName", "Applicant photo"),
    ]
}

fn travel_information() -> Vec<FieldSpec> {
    vec![
        FieldSpec::choice("visaCategory", "Visa category", VISA_CATEGORIES)
            .required("Select visa category"),
        FieldSpec::text("ukAddressLine1", "Address line 1", Pattern::LettersNumbersSpacesAndPunctuation),
        FieldSpec::text("ukAddressLine2", "Address line 2", Pattern::LettersNumbersSpacesAndPunctuation),
        FieldSpec::text("ukAddressLine3", "Address line 3", Pattern::LettersNumbersSpacesAndPunctuation),
        FieldSpec::text("ukAddressTownOrCity", "Town name", Pattern::LettersSpacesAndPunctuation),
        FieldSpec::text("ukAddressPostcode", "Postcode", Pattern::LettersNumbersAndSpaces),
        FieldSpec::text("ukMobileNumber", "UK mobile number", Pattern::NumbersOnly),
        FieldSpec::text("ukEmailAddress", "Email", Pattern::Email),
    ]
}

fn medical_screening() -> Vec<FieldSpec> {
    vec![
        FieldSpec::whole_number("age", "Age", MAX_AGE_YEARS).required("Enter applicant's age in years."),
        FieldSpec::choice("tbSymptoms", "TB symptoms", YES_NO)
            .required("Select whether the applicant has any TB symptoms."),
        FieldSpec::list("tbSymptomsList", "TB symptoms"),
        FieldSpec::free_text("otherSymptomsDetail", "Other symptoms"),
        FieldSpec::list("underElevenConditions", "Conditions under 11"),
        FieldSpec::choice("previousTb", "Previous TB", YES_NO)
            .required("Select whether the applicant has ever had tuberculosis."),
        FieldSpec::free_text("previousTbDetail", "Previous TB details"),
        FieldSpec::choice("closeContactWithTb", "Close contact with TB", YES_NO).required(
            "Select whether the applicant has had close contact with any person with active pulmonary tuberculosis within the past year.",
        ),
        FieldSpec::free_text("closeContactWithTbDetail", "Close contact details"),
        FieldSpec::choice("pregnant", "Pregnant", PREGNANT_OPTIONS)
            .required("Select whether the applicant is pregnant."),
        FieldSpec::choice("menstrualPeriods", "Menstrual periods", MENSTRUAL_PERIOD_OPTIONS)
            .required("Select whether the applicant has menstrual periods."),
        FieldSpec::free_text("physicalExamNotes", "Physical examination notes"),
        FieldSpec::choice("chestXrayTaken", "Chest X-ray taken", YES_NO)
            .required("Select whether the applicant has had a chest X-ray."),
        FieldSpec::choice("reasonXrayWasNotTaken", "Reason X-ray not taken", XRAY_NOT_TAKEN_REASONS)
            .required("Select the reason why the chest X-ray was not taken.")
            .only_when("chestXrayTaken", "No"),
        FieldSpec::free_text("xrayWasNotTakenFurtherDetails", "Further details")
            .required("Enter reason X-ray not taken.")
            .only_when("chestXrayTaken", "No")
            .only_when("reasonXrayWasNotTaken", "Other"),
        FieldSpec::date(
            "completionDate",
            DateRule::TodayOrPast,
            DateMessages::standard("The date the medical screening took place"),
        ),
    ]
}

fn chest_xray() -> Vec<FieldSpec> {
    vec![
        FieldSpec::file_name("posteroAnteriorXrayFileName", "Postero-anterior X-ray")
            .required("Select a postero-anterior X-ray image file"),
        FieldSpec::file_name("apicalLordoticXrayFileName", "Apical lordotic X-ray"),
        FieldSpec::file_name("lateralDecubitusXrayFileName", "Lateral decubitus X-ray"),
        FieldSpec::date(
            "dateXrayTaken",
            DateRule::TodayOrPast,
            DateMessages::standard("The date the X-ray was taken")
                .with_empty("Enter the date the X-ray was taken"),
        ),
    ]
}

fn radiological_outcome() -> Vec<FieldSpec> {
    vec![
        FieldSpec::choice("xrayResult", "X-ray result", XRAY_RESULTS)
            .required("Select radiological outcome"),
        FieldSpec::free_text("xrayResultDetail", "X-ray result details"),
        FieldSpec::list("xrayMinorFindings", "Minor findings"),
        FieldSpec::list("xrayAssociatedMinorFindings", "Associated minor findings"),
        FieldSpec::list("xrayActiveTbFindings", "Active TB findings"),
    ]
}

fn sputum_decision() -> Vec<FieldSpec> {
    vec![FieldSpec::choice("isSputumRequired", "Sputum required", YES_NO)
        .required("Select yes if sputum collection is required")]
}

/// Key of a per-sample sputum field, e.g. `sample2CollectionMethod`.
pub fn sample_key(sample: u8, suffix: &str) -> String {
    format!("sample{sample}{suffix}")
}

fn sputum_collection() -> Vec<FieldSpec> {
    let mut specs = Vec::new();
    for n in 1..=SPUTUM_SAMPLE_COUNT {
        specs.push(FieldSpec::date(
            &sample_key(n, "Date"),
            DateRule::TodayOrPast,
            numbers_only_date(&format!("Sputum sample {n} date"), &format!("Sputum sample {n}"))
                .with_empty(format!("Enter the date sample {n} was taken on")),
        ));
        specs.push(
            FieldSpec::choice(
                &sample_key(n, "CollectionMethod"),
                &format!("Sputum sample {n} collection method"),
                COLLECTION_METHODS,
            )
            .required(format!("Enter Sputum sample {n} collection method")),
        );
    }
    for n in 1..=SPUTUM_SAMPLE_COUNT {
        specs.push(FieldSpec::choice(
            &sample_key(n, "SmearResult"),
            &format!("Sputum sample {n} smear result"),
            SPUTUM_RESULTS,
        ));
        specs.push(FieldSpec::choice(
            &sample_key(n, "CultureResult"),
            &format!("Sputum sample {n} culture result"),
            SPUTUM_RESULTS,
        ));
    }
    specs
}

fn tb_certificate() -> Vec<FieldSpec> {
    vec![
        FieldSpec::choice("willIssueCertificate", "Issue certificate", YES_NO)
            .required("Select yes if you will issue a TB clearance certificate"),
        FieldSpec::date(
            "certificateIssueDate",
            DateRule::TodayOrPast,
            numbers_only_date("TB clearance certificate date", "TB clearance certificate"),
        )
        .optional()
        .only_when("willIssueCertificate", "Yes"),
        FieldSpec::text("certificateNumber", "TB clearance certificate number", Pattern::LettersAndNumbers)
            .required("Enter the TB clearance certificate number")
            .only_when("willIssueCertificate", "Yes"),
        FieldSpec::choice("reasonNotIssued", "Reason not issued", NOT_ISSUED_REASONS)
            .required("Select why you are not issuing a certificate")
            .only_when("willIssueCertificate", "No"),
        FieldSpec::text("declaringPhysicianName", "Physician name", Pattern::LettersSpacesAndPunctuation)
            .required("Enter the declaring physician's name")
            .only_when("willIssueCertificate", "No"),
        FieldSpec::free_text("physicianComments", "Physician comments"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pets_types::DateParts;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn data(pairs: &[(&str, FieldValue)]) -> FieldMap {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    #[test]
    fn empty_sputum_collection_form_gives_six_errors_in_order() {
        let errors = validate_fields(&fields_for(SectionKind::SputumCollection), &FieldMap::new(), today());
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Enter the date sample 1 was taken on",
                "Enter Sputum sample 1 collection method",
                "Enter the date sample 2 was taken on",
                "Enter Sputum sample 2 collection method",
                "Enter the date sample 3 was taken on",
                "Enter Sputum sample 3 collection method",
            ]
        );
    }

    #[test]
    fn sputum_date_checks_use_sample_wording() {
        let form = data(&[(
            "sample1Date",
            FieldValue::Date(DateParts::new("32", "13", "2024")),
        )]);
        let errors = validate_fields(&fields_for(SectionKind::SputumCollection), &form, today());
        assert_eq!(errors[0].field, "sample1Date");
        assert_eq!(errors[0].message, "Sputum sample 1 date must be a real date");

        let form = data(&[(
            "sample1Date",
            FieldValue::Date(DateParts::new("2", "6", "2025")),
        )]);
        let errors = validate_fields(&fields_for(SectionKind::SputumCollection), &form, today());
        assert_eq!(
            errors[0].message,
            "Sputum sample 1 date must be today or in the past"
        );
    }

    #[test]
    fn certificate_fields_follow_the_answer() {
        let specs = fields_for(SectionKind::TbCertificate);

        let errors = validate_fields(&specs, &data(&[("willIssueCertificate", "No".into())]), today());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["reasonNotIssued", "declaringPhysicianName"]);

        let errors = validate_fields(&specs, &data(&[("willIssueCertificate", "Yes".into())]), today());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["certificateNumber"]);
    }

    #[test]
    fn inactive_fields_are_not_validated() {
        let specs = fields_for(SectionKind::TbCertificate);
        let form = data(&[
            ("willIssueCertificate", "Yes".into()),
            ("certificateNumber", "ABC123".into()),
            ("declaringPhysicianName", "Dr 42".into()),
        ]);
        assert!(validate_fields(&specs, &form, today()).is_empty());
    }

    #[test]
    fn choices_outside_the_options_are_rejected() {
        let specs = fields_for(SectionKind::Travel);
        let errors = validate_fields(&specs, &data(&[("visaCategory", "Tourism".into())]), today());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Select visa category");
    }

    #[test]
    fn optional_contact_details_are_checked_when_given() {
        let specs = fields_for(SectionKind::Travel);
        let form = data(&[
            ("visaCategory", "Work".into()),
            ("ukMobileNumber", "07700 900".into()),
            ("ukEmailAddress", "not-an-email".into()),
        ]);
        let messages: Vec<String> = validate_fields(&specs, &form, today())
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "UK mobile number must contain only numbers".to_string(),
                "Email must be in correct format".to_string(),
            ]
        );
    }

    #[test]
    fn passport_expiry_must_be_in_the_future() {
        let specs = fields_for(SectionKind::ApplicantDetails);
        let form = data(&[(
            "passportExpiryDate",
            FieldValue::Date(DateParts::new("1", "6", "2025")),
        )]);
        let errors = validate_fields(&specs, &form, today());
        let expiry = errors
            .iter()
            .find(|e| e.field == "passportExpiryDate")
            .unwrap();
        assert_eq!(expiry.message, "Passport expiry date must be in the future");
    }

    #[test]
    fn long_free_text_is_rejected() {
        let specs = fields_for(SectionKind::RadiologicalOutcome);
        let notes = vec!["word"; 151].join(" ");
        let form = data(&[
            ("xrayResult", "Chest X-ray normal".into()),
            ("xrayResultDetail", FieldValue::Text(notes)),
        ]);
        let errors = validate_fields(&specs, &form, today());
        assert_eq!(
            errors[0].message,
            "X-ray result details must be 150 words or fewer"
        );
    }

    #[test]
    fn applicant_details_messages_match_the_form() {
        let errors = validate_fields(&fields_for(SectionKind::ApplicantDetails), &FieldMap::new(), today());
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages[0], "Enter the applicant's full name.");
        assert_eq!(messages[1], "Select the applicant's sex.");
        assert_eq!(messages[2], "Select a country.");
        assert!(messages.contains(&"Enter the applicant's passport number."));
        assert!(messages.contains(&"Enter the first line of the applicant's home address."));
    }

    fn medical_form(age: &str, xray: &str) -> FieldMap {
        data(&[
            ("age", age.into()),
            ("tbSymptoms", "No".into()),
            ("previousTb", "No".into()),
            ("closeContactWithTb", "No".into()),
            ("pregnant", "No".into()),
            ("menstrualPeriods", "N/A".into()),
            ("chestXrayTaken", xray.into()),
            ("completionDate", FieldValue::Date(DateParts::new("10", "5", "2025"))),
        ])
    }

    #[test]
    fn age_must_be_a_plausible_whole_number() {
        let specs = fields_for(SectionKind::Medical);
        assert!(validate_fields(&specs, &medical_form("30", "Yes"), today()).is_empty());

        let errors = validate_fields(&specs, &medical_form("thirty", "Yes"), today());
        assert_eq!(errors[0].field, "age");
        assert_eq!(errors[0].message, "Age must be a number.");

        let errors = validate_fields(&specs, &medical_form("5000000000", "Yes"), today());
        assert_eq!(errors[0].field, "age");
        assert_eq!(errors[0].message, "Age must be 150 or less.");

        let errors = validate_fields(&specs, &FieldMap::new(), today());
        assert_eq!(errors[0].message, "Enter applicant's age in years.");
    }

    #[test]
    fn xray_not_taken_needs_a_reason() {
        let specs = fields_for(SectionKind::Medical);
        let mut form = medical_form("8", "No");
        let errors = validate_fields(&specs, &form, today());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "reasonXrayWasNotTaken");
        assert_eq!(errors[0].message, "Select the reason why the chest X-ray was not taken.");

        form.insert("reasonXrayWasNotTaken".into(), "Other".into());
        let errors = validate_fields(&specs, &form, today());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Enter reason X-ray not taken.");

        form.insert("reasonXrayWasNotTaken".into(), "Child".into());
        assert!(validate_fields(&specs, &form, today()).is_empty());

        // A stale reason is ignored once the X-ray has been taken.
        form.insert("chestXrayTaken".into(), "Yes".into());
        form.insert("reasonXrayWasNotTaken".into(), "Other".into());
        assert!(validate_fields(&specs, &form, today()).is_empty());
    }

    #[test]
    fn third_uk_address_line_is_checked() {
        let specs = fields_for(SectionKind::Travel);
        let form = data(&[
            ("visaCategory", "Work".into()),
            ("ukAddressLine3", "Flat 3 <b>".into()),
        ]);
        let errors = validate_fields(&specs, &form, today());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "ukAddressLine3");
        assert_eq!(
            errors[0].message,
            "Address line 3 must contain only letters, numbers, spaces and punctuation"
        );
    }

    #[test]
    fn search_and_consent_forms() {
        let errors = validate_fields(&applicant_search(), &FieldMap::new(), today());
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Enter the applicant's passport number.", "Select a country."]
        );

        let errors = validate_fields(&written_consent(), &data(&[("consent", "Maybe".into())]), today());
        assert_eq!(
            errors[0].message,
            "Select yes if you have the visa applicant's written consent for TB screening"
        );
    }
}
