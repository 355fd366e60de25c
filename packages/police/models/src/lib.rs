#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data model for the UK Police public data API.
//!
//! Raw API payloads ([`CrimeCategory`], [`PoliceForce`], [`CrimeRecord`])
//! deserialize directly from the `data.police.uk` JSON responses. The
//! derived [`ResolutionSummary`] is what gets tabulated for the user.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Category slug to display label, as fetched for one reference month.
///
/// Keyed by slug so a response that repeats a slug keeps only the last
/// label seen.
pub type CategoryMap = BTreeMap<String, String>;

/// Force id to display label.
pub type ForceMap = BTreeMap<String, String>;

/// Errors raised while validating user-supplied query parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The picked date lies after today.
    #[error("Please Select a Date Before or Equal to Today ({date} is after {today})")]
    FutureDate {
        /// The date the user picked.
        date: NaiveDate,
        /// The date it was validated against.
        today: NaiveDate,
    },

    /// A month string was not of the form `YYYY-MM`.
    #[error("invalid month {value:?}: expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input.
        value: String,
    },
}

/// A calendar month scoping category and crime queries.
///
/// Rendered as `YYYY-MM`, which is the format every `date=` query
/// parameter of the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ReferenceMonth {
    year: i32,
    month: u32,
}

impl ReferenceMonth {
    /// Creates a reference month.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMonth`] if `month` is not in 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth {
                value: format!("{year:04}-{month:02}"),
            });
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month of the year, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReferenceMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth {
            value: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl From<ReferenceMonth> for String {
    fn from(month: ReferenceMonth) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for ReferenceMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One entry of `GET /crime-categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeCategory {
    /// Stable slug, e.g. `"burglary"`. The API calls this field `url`.
    #[serde(rename = "url")]
    pub slug: String,
    /// Human-readable label, e.g. `"Burglary"`.
    pub name: String,
}

/// One entry of `GET /forces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliceForce {
    /// Stable force identifier, e.g. `"metropolitan"`.
    pub id: String,
    /// Human-readable label, e.g. `"Metropolitan Police Service"`.
    pub name: String,
}

/// The latest outcome recorded against a crime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeStatus {
    /// Outcome description, e.g. `"Investigation complete; no suspect identified"`.
    pub category: Option<String>,
    /// Month the outcome was recorded, `YYYY-MM`.
    pub date: Option<String>,
}

/// One entry of `GET /crimes-no-location`.
///
/// Only the fields the workflow reads are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// API-internal numeric identifier.
    #[serde(default)]
    pub id: Option<u64>,
    /// 64-character persistent identifier. Empty for some record types.
    #[serde(default)]
    pub persistent_id: Option<String>,
    /// Category slug the record was filed under.
    #[serde(default)]
    pub category: Option<String>,
    /// Month the crime was recorded, `YYYY-MM`.
    #[serde(default)]
    pub month: Option<String>,
    /// Free-text context supplied by the force.
    #[serde(default)]
    pub context: Option<String>,
    /// Latest outcome, absent when none has been recorded yet.
    #[serde(default)]
    pub outcome_status: Option<OutcomeStatus>,
}

/// Months elapsed between a crime's recorded month and its outcome.
///
/// Serializes as a bare number, or `null` when unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthsToResolution {
    /// Outcome data was present and both months parsed.
    Months(u32),
    /// No outcome yet, or one of the months was malformed.
    Unavailable,
}

impl MonthsToResolution {
    /// Returns the month count, if available.
    #[must_use]
    pub const fn as_months(self) -> Option<u32> {
        match self {
            Self::Months(months) => Some(months),
            Self::Unavailable => None,
        }
    }

    /// Returns `true` if no month count could be computed.
    #[must_use]
    pub const fn is_unavailable(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl fmt::Display for MonthsToResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Months(months) => write!(f, "{months}"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// A crime record reduced to its investigation outcome and resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionSummary {
    /// Outcome category, absent when no outcome has been recorded.
    pub investigation_outcome: Option<String>,
    /// Outcome month, `YYYY-MM`.
    pub outcome_date: Option<String>,
    /// Months between the record month and the outcome month.
    pub months_to_resolution: MonthsToResolution,
}
