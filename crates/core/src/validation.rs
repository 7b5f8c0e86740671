//! Input validation utilities.
//!
//! Field-level checks used by section transitions:
//! - calendar dates entered as separate day, month and year boxes
//! - free-text word limits
//! - character patterns for names, numbers and contact details
//!
//! Every check returns the user-facing message on failure. "Today" is always
//! passed in by the caller so results are deterministic.

use chrono::NaiveDate;
use pets_types::DateParts;
use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// DATES
// ============================================================================

/// Which side of today a date must fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    Any,
    /// Today or earlier.
    TodayOrPast,
    /// Strictly after today.
    Future,
}

/// Messages for one date field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMessages {
    /// Human name used in the "must include a ..." message.
    pub name: String,
    pub empty: String,
    pub invalid_chars: String,
    pub invalid_date: String,
    pub must_be_past: String,
    pub must_be_future: String,
}

impl DateMessages {
    /// Standard GOV.UK wording derived from the field's name.
    pub fn standard(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            empty: format!("{name} must include a day, month and year"),
            invalid_chars: format!("{name} day, month and year must contain only numbers"),
            invalid_date: format!("{name} must be a real date"),
            must_be_past: format!("{name} must be today or in the past"),
            must_be_future: format!("{name} must be in the future"),
            name,
        }
    }

    pub fn with_empty(mut self, message: impl Into<String>) -> Self {
        self.empty = message.into();
        self
    }

    pub fn with_invalid_chars(mut self, message: impl Into<String>) -> Self {
        self.invalid_chars = message.into();
        self
    }

    pub fn with_must_be_past(mut self, message: impl Into<String>) -> Self {
        self.must_be_past = message.into();
        self
    }
}

/// Validates a date entered as separate boxes.
///
/// Checks run in a fixed order and the first failure wins:
/// all blank, some blank, non-digits, not a real date, then the [`DateRule`].
/// Years must be after 1900 and before 2100.
///
/// # Errors
///
/// Returns the message for the first failed check.
pub fn validate_date(
    parts: &DateParts,
    rule: DateRule,
    messages: &DateMessages,
    today: NaiveDate,
) -> Result<NaiveDate, String> {
    let missing = parts.missing_parts();
    if missing.len() == 3 {
        return Err(messages.empty.clone());
    }
    if !missing.is_empty() {
        let missing_text = if missing.len() == 1 {
            missing[0].to_string()
        } else {
            format!("{} and {}", missing[0], missing[1])
        };
        return Err(format!("{} must include a {missing_text}", messages.name));
    }

    let (day, month, year) = (parts.day.trim(), parts.month.trim(), parts.year.trim());
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !(digits_only(day) && digits_only(month) && digits_only(year)) {
        return Err(messages.invalid_chars.clone());
    }

    let date = real_date(day, month, year).ok_or_else(|| messages.invalid_date.clone())?;

    match rule {
        DateRule::TodayOrPast if date > today => Err(messages.must_be_past.clone()),
        DateRule::Future if date <= today => Err(messages.must_be_future.clone()),
        _ => Ok(date),
    }
}

fn real_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    if year <= 1900 || year >= 2100 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Converts already-validated parts into a date, if they form one.
pub fn parts_to_date(parts: &DateParts) -> Option<NaiveDate> {
    real_date(parts.day.trim(), parts.month.trim(), parts.year.trim())
}

// ============================================================================
// WORD COUNT
// ============================================================================

/// Number of whitespace-separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Live hint shown under a limited free-text field.
pub fn word_count_message(text: &str, limit: usize) -> String {
    let words = count_words(text);
    if words <= limit {
        let remaining = limit - words;
        let noun = if remaining == 1 { "word" } else { "words" };
        format!("You have {remaining} {noun} remaining")
    } else {
        let over = words - limit;
        let noun = if over == 1 { "word" } else { "words" };
        format!("You have {over} {noun} too many")
    }
}

/// Validates a free-text field against its word limit.
///
/// # Errors
///
/// Returns `"{label} must be {limit} words or fewer"` when over the limit.
pub fn validate_word_limit(text: &str, limit: usize, label: &str) -> Result<(), String> {
    if count_words(text) > limit {
        return Err(format!("{label} must be {limit} words or fewer"));
    }
    Ok(())
}

// ============================================================================
// CHARACTER PATTERNS
// ============================================================================

/// Allowed character sets for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    LettersAndNumbers,
    LettersAndSpaces,
    LettersNumbersAndSpaces,
    LettersSpacesAndPunctuation,
    LettersNumbersSpacesAndPunctuation,
    NumbersOnly,
    Email,
}

static LETTERS_AND_NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9]+$"));
static LETTERS_AND_SPACES: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z\s]+$"));
static LETTERS_NUMBERS_AND_SPACES: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9\s]+$"));
static LETTERS_SPACES_AND_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z\s,\-/()']+$"));
static LETTERS_NUMBERS_SPACES_AND_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9\s,\-/()']+$"));
static NUMBERS_ONLY: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d+$"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[\w\-.]+@([\w-]+\.)+[\w-]{2,}$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("validation patterns are valid regex literals")
}

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Pattern::LettersAndNumbers => &*LETTERS_AND_NUMBERS,
            Pattern::LettersAndSpaces => &*LETTERS_AND_SPACES,
            Pattern::LettersNumbersAndSpaces => &*LETTERS_NUMBERS_AND_SPACES,
            Pattern::LettersSpacesAndPunctuation => &*LETTERS_SPACES_AND_PUNCTUATION,
            Pattern::LettersNumbersSpacesAndPunctuation => {
                &*LETTERS_NUMBERS_SPACES_AND_PUNCTUATION
            }
            Pattern::NumbersOnly => &*NUMBERS_ONLY,
            Pattern::Email => &*EMAIL,
        }
    }

    pub fn is_match(self, value: &str) -> bool {
        self.regex().is_match(value)
    }

    /// Completes the sentence "{label} must contain only ...".
    pub fn description(self) -> &'static str {
        match self {
            Pattern::LettersAndNumbers => "letters and numbers",
            Pattern::LettersAndSpaces => "letters and spaces",
            Pattern::LettersNumbersAndSpaces => "letters, numbers and spaces",
            Pattern::LettersSpacesAndPunctuation => "letters, spaces and punctuation",
            Pattern::LettersNumbersSpacesAndPunctuation => {
                "letters, numbers, spaces and punctuation"
            }
            Pattern::NumbersOnly => "numbers",
            Pattern::Email => "a valid email address",
        }
    }

    /// Validates `value`.
    ///
    /// # Errors
    ///
    /// Returns the pattern message for `label`. Email uses
    /// "{label} must be in correct format".
    pub fn validate(self, value: &str, label: &str) -> Result<(), String> {
        if self.is_match(value) {
            return Ok(());
        }
        match self {
            Pattern::Email => Err(format!("{label} must be in correct format")),
            _ => Err(format!("{label} must contain only {}", self.description())),
        }
    }
}
