//! Reference date validation.

use chrono::NaiveDate;
use police_data_models::{ReferenceMonth, ValidationError};

/// Returns `true` if `candidate` is on or before `today`.
#[must_use]
pub fn is_valid_date(candidate: NaiveDate, today: NaiveDate) -> bool {
    candidate <= today
}

/// Validates a picked date and returns the month it falls in.
///
/// # Errors
///
/// Returns [`ValidationError::FutureDate`] if `candidate` is after `today`.
pub fn validate_date(
    candidate: NaiveDate,
    today: NaiveDate,
) -> Result<ReferenceMonth, ValidationError> {
    if !is_valid_date(candidate, today) {
        return Err(ValidationError::FutureDate {
            date: candidate,
            today,
        });
    }
    Ok(ReferenceMonth::from_date(candidate))
}
