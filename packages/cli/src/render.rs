//! Terminal rendering of query state: banners, menus, and the results table.

use police_data_formatting::to_sentence_case;
use police_data_models::ResolutionSummary;
use police_data_workflow::{Banner, BannerKind, QueryState};

const OUTCOME_WIDTH: usize = 52;
const MONTH_WIDTH: usize = 14;

/// One-line description of where the session is.
#[must_use]
pub fn status_line(state: &QueryState) -> String {
    let mut line = format!("{} | month {}", to_sentence_case(state.step().as_ref()), state.month());
    if let Some(category) = state.selected_category_label() {
        line.push_str(&format!(" | {category}"));
    }
    if let Some(force) = state.selected_force_label() {
        line.push_str(&format!(" | {force}"));
    }
    line
}

/// Renders a banner as `[kind] Title: message`.
#[must_use]
pub fn format_banner(banner: Banner) -> String {
    let kind = match banner.kind() {
        BannerKind::Success => "info",
        BannerKind::Warning => "warn",
        BannerKind::Error => "error",
    };
    format!("[{kind}] {}: {}", banner.title(), banner.message())
}

/// Renders results as a fixed-width table, header first.
#[must_use]
pub fn format_results_table(results: &[ResolutionSummary]) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len() + 2);
    lines.push(format!(
        "{:<OUTCOME_WIDTH$} {:<MONTH_WIDTH$} MONTHS TO RESOLUTION",
        "INVESTIGATION OUTCOME", "OUTCOME MONTH"
    ));
    lines.push("-".repeat(OUTCOME_WIDTH + MONTH_WIDTH + 22));
    for summary in results {
        lines.push(format!(
            "{:<OUTCOME_WIDTH$} {:<MONTH_WIDTH$} {}",
            summary.investigation_outcome.as_deref().unwrap_or("-"),
            summary.outcome_date.as_deref().unwrap_or("-"),
            summary.months_to_resolution,
        ));
    }
    lines
}

/// Prints banners, then the results table if there is one to show.
pub fn print_state(state: &QueryState) {
    let banners = state.banners();
    for banner in &banners {
        println!("{}", format_banner(*banner));
    }
    if let Some(results) = state.displayed_results().filter(|r| !r.is_empty()) {
        println!();
        for line in format_results_table(results) {
            println!("{line}");
        }
    }
}

/// Prints a key/label listing such as categories or forces.
pub fn print_labels<'a>(heading: &str, entries: impl IntoIterator<Item = (&'a String, &'a String)>) {
    println!("{heading:<32} NAME");
    println!("{}", "-".repeat(64));
    for (key, label) in entries {
        println!("{key:<32} {label}");
    }
}

#[cfg(test)]
mod tests {
    use police_data_models::MonthsToResolution;

    use super::*;

    #[test]
    fn table_marks_missing_values() {
        let lines = format_results_table(&[
            ResolutionSummary {
                investigation_outcome: Some("Charged".to_string()),
                outcome_date: Some("2024-05".to_string()),
                months_to_resolution: MonthsToResolution::Months(2),
            },
            ResolutionSummary {
                investigation_outcome: None,
                outcome_date: None,
                months_to_resolution: MonthsToResolution::Unavailable,
            },
        ]);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("INVESTIGATION OUTCOME"));
        assert!(lines[2].starts_with("Charged"));
        assert!(lines[2].trim_end().ends_with('2'));
        assert!(lines[3].starts_with('-'));
        assert!(lines[3].ends_with("Unavailable"));
    }

    #[test]
    fn banner_rendering_includes_title_and_message() {
        assert_eq!(
            format_banner(Banner::SearchResults(3)),
            "[info] Info: 3 Search Results"
        );
        assert_eq!(
            format_banner(Banner::SiteError),
            "[error] Site Error: Error Accessing API, please try again later"
        );
    }

    #[test]
    fn status_starts_with_sentence_cased_step() {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let state = QueryState::new(today);
        assert_eq!(status_line(&state), "Idle | month 2024-06");
    }
}
