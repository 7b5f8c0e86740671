//! Validated primitive types shared across the PETS crates.
//!
//! These types enforce simple invariants at construction time so that the
//! core never has to re-check them:
//! - [`NonEmptyText`] for trimmed, non-blank strings
//! - [`YesOrNo`] for the radio answers that drive workflow branching
//! - [`DateParts`] for the three free-text boxes of a GOV.UK date input

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not one of the accepted answers
    #[error("unrecognised answer: {0}")]
    UnrecognisedAnswer(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// YES / NO ANSWERS
// ============================================================================

/// A Yes/No radio answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum YesOrNo {
    Yes,
    No,
}

impl YesOrNo {
    pub fn as_str(self) -> &'static str {
        match self {
            YesOrNo::Yes => "Yes",
            YesOrNo::No => "No",
        }
    }

    pub fn is_yes(self) -> bool {
        matches!(self, YesOrNo::Yes)
    }
}

impl fmt::Display for YesOrNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesOrNo {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" => Ok(YesOrNo::Yes),
            "No" => Ok(YesOrNo::No),
            "" => Err(TextError::Empty),
            other => Err(TextError::UnrecognisedAnswer(other.to_owned())),
        }
    }
}

// ============================================================================
// DATE PARTS
// ============================================================================

/// The raw day, month and year boxes of a date input.
///
/// Components are kept as entered; validation into a calendar date happens in
/// the core so that the exact error message can depend on which parts are
/// missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateParts {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub year: String,
}

impl DateParts {
    pub fn new(day: impl Into<String>, month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            month: month.into(),
            year: year.into(),
        }
    }

    /// True when every box is blank.
    pub fn is_empty(&self) -> bool {
        self.day.trim().is_empty() && self.month.trim().is_empty() && self.year.trim().is_empty()
    }

    /// Names of the blank boxes, in day, month, year order.
    pub fn missing_parts(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.day.trim().is_empty() {
            missing.push("day");
        }
        if self.month.trim().is_empty() {
            missing.push("month");
        }
        if self.year.trim().is_empty() {
            missing.push("year");
        }
        missing
    }
}
