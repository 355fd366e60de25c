//! Derivation of [`ResolutionSummary`] rows from raw crime records.
//!
//! Months to resolution compares only the month-of-year components of the
//! record month and the outcome month, so it ignores the year.

use police_data_models::{CrimeRecord, MonthsToResolution, ResolutionSummary};

/// Returns the month component of a `YYYY-MM` string.
///
/// The component is the second `-`-separated token parsed as an integer.
#[must_use]
pub fn month_component(s: &str) -> Option<u32> {
    s.split('-').nth(1)?.trim().parse().ok()
}

/// Reduces one record to its outcome and months to resolution.
#[must_use]
pub fn summarize(record: &CrimeRecord) -> ResolutionSummary {
    let outcome = record.outcome_status.as_ref();
    let investigation_outcome = outcome.and_then(|o| o.category.clone());
    let outcome_date = outcome.and_then(|o| o.date.clone());

    let months_to_resolution = match (
        outcome_date.as_deref().and_then(month_component),
        record.month.as_deref().and_then(month_component),
    ) {
        (Some(outcome_month), Some(record_month)) => {
            MonthsToResolution::Months(outcome_month.abs_diff(record_month))
        }
        _ => MonthsToResolution::Unavailable,
    };

    ResolutionSummary {
        investigation_outcome,
        outcome_date,
        months_to_resolution,
    }
}

/// Summarizes every record, preserving order.
#[must_use]
pub fn summarize_all(records: &[CrimeRecord]) -> Vec<ResolutionSummary> {
    records.iter().map(summarize).collect()
}

#[cfg(test)]
mod tests {
    use police_data_models::OutcomeStatus;

    use super::*;

    fn record(month: &str, outcome: Option<(&str, &str)>) -> CrimeRecord {
        CrimeRecord {
            month: Some(month.to_string()),
            outcome_status: outcome.map(|(category, date)| OutcomeStatus {
                category: Some(category.to_string()),
                date: Some(date.to_string()),
            }),
            ..CrimeRecord::default()
        }
    }

    #[test]
    fn parses_month_component() {
        assert_eq!(month_component("2024-05"), Some(5));
        assert_eq!(month_component("2024-12"), Some(12));
        assert_eq!(month_component("2024"), None);
        assert_eq!(month_component("2024-xx"), None);
    }

    #[test]
    fn charged_two_months_later() {
        let summary = summarize(&record("2024-03", Some(("Charged", "2024-05"))));
        assert_eq!(
            summary,
            ResolutionSummary {
                investigation_outcome: Some("Charged".to_string()),
                outcome_date: Some("2024-05".to_string()),
                months_to_resolution: MonthsToResolution::Months(2),
            }
        );
    }

    #[test]
    fn missing_outcome_is_unavailable() {
        let summary = summarize(&record("2024-03", None));
        assert_eq!(summary.investigation_outcome, None);
        assert_eq!(summary.outcome_date, None);
        assert!(summary.months_to_resolution.is_unavailable());
    }

    #[test]
    fn outcome_without_date_is_unavailable() {
        let mut rec = record("2024-03", None);
        rec.outcome_status = Some(OutcomeStatus {
            category: Some("Under investigation".to_string()),
            date: None,
        });
        let summary = summarize(&rec);
        assert_eq!(
            summary.investigation_outcome.as_deref(),
            Some("Under investigation")
        );
        assert!(summary.months_to_resolution.is_unavailable());
    }

    #[test]
    fn difference_is_absolute_and_ignores_year() {
        let summary = summarize(&record("2023-11", Some(("Charged", "2024-02"))));
        assert_eq!(summary.months_to_resolution, MonthsToResolution::Months(9));
    }

    #[test]
    fn mixed_records_keep_length_and_mark_missing() {
        let records = vec![
            record("2024-01", Some(("Charged", "2024-01"))),
            record("2024-01", None),
            record("2024-01", Some(("Caution", "2024-04"))),
            record("2024-01", None),
            record("2024-01", None),
        ];
        let summaries = summarize_all(&records);
        assert_eq!(summaries.len(), 5);
        for (rec, summary) in records.iter().zip(&summaries) {
            if rec.outcome_status.is_some() {
                assert!(summary.months_to_resolution.as_months().is_some());
            } else {
                assert!(summary.months_to_resolution.is_unavailable());
            }
        }
    }
}
