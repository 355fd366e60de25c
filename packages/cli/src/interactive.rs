//! Menu-driven crime query wizard.
//!
//! Walks the user through picking a month, a crime category, and a police
//! force, then runs the search. Only actions the current state allows are
//! offered.

use chrono::NaiveDate;
use dialoguer::{Input, Select};
use police_data_api::HostClient;
use police_data_cli_utils::{LoadingIndicator, MultiProgress};
use police_data_formatting::format_date;
use police_data_workflow::{QueryState, Workflow};

use crate::render;

/// Actions offered in the wizard menu.
#[derive(Clone, Copy)]
enum WizardAction {
    SelectDate,
    SearchCategories,
    SelectCategory,
    SelectForce,
    Search,
    Quit,
}

impl WizardAction {
    const ALL: &[Self] = &[
        Self::SelectDate,
        Self::SearchCategories,
        Self::SelectCategory,
        Self::SelectForce,
        Self::Search,
        Self::Quit,
    ];

    #[must_use]
    const fn label(self) -> &'static str {
        match self {
            Self::SelectDate => "Select a date",
            Self::SearchCategories => "Search crime categories",
            Self::SelectCategory => "Please select a crime category",
            Self::SelectForce => "Please select a force",
            Self::Search => "Search",
            Self::Quit => "Quit",
        }
    }

    fn available(self, state: &QueryState) -> bool {
        match self {
            Self::SelectDate | Self::Quit => true,
            Self::SearchCategories => state.can_search_categories(),
            Self::SelectCategory => !state.categories().is_empty(),
            Self::SelectForce => !state.forces().is_empty(),
            Self::Search => state.can_search(),
        }
    }
}

/// Runs the wizard until the user quits.
///
/// # Errors
///
/// Returns an error if terminal interaction fails.
pub async fn run<H: HostClient>(
    multi: &MultiProgress,
    host: H,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workflow = Workflow::mount(host, today);

    println!("UK Police Data");
    println!();

    loop {
        println!("{}", render::status_line(workflow.state()));

        let actions: Vec<WizardAction> = WizardAction::ALL
            .iter()
            .copied()
            .filter(|a| a.available(workflow.state()))
            .collect();
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let outcome = match actions[idx] {
            WizardAction::SelectDate => select_date(&mut workflow, today).await?,
            WizardAction::SearchCategories => {
                let spinner = LoadingIndicator::start(multi, "Searching crime categories...");
                let result = workflow.search_categories().await;
                spinner.finish();
                result
            }
            WizardAction::SelectCategory => select_category(multi, &mut workflow).await?,
            WizardAction::SelectForce => select_force(&mut workflow).await?,
            WizardAction::Search => {
                let spinner = LoadingIndicator::start(multi, "Searching...");
                let result = workflow.search().await;
                spinner.finish();
                match format_date(&chrono::Utc::now().to_rfc3339()) {
                    Ok(at) => println!("Searched at {at}"),
                    Err(e) => log::warn!("Could not format search time: {e}"),
                }
                result
            }
            WizardAction::Quit => return Ok(()),
        };

        if let Err(e) = outcome {
            println!("{e}");
        }

        render::print_state(workflow.state());
        println!();
    }
}

type StepResult = Result<(), police_data_workflow::WorkflowError>;

async fn select_date<H: HostClient>(
    workflow: &mut Workflow<H>,
    today: NaiveDate,
) -> Result<StepResult, Box<dyn std::error::Error>> {
    let raw: String = Input::new()
        .with_prompt("Select a date (YYYY-MM-DD)")
        .default(workflow.state().date().to_string())
        .interact_text()?;

    let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") else {
        println!("{raw:?} is not a date in YYYY-MM-DD form");
        return Ok(Ok(()));
    };

    let result = workflow.select_date(date, today).await;
    if let Some(e) = workflow.state().date_error() {
        println!("{e}");
    }
    Ok(result)
}

async fn select_category<H: HostClient>(
    multi: &MultiProgress,
    workflow: &mut Workflow<H>,
) -> Result<StepResult, Box<dyn std::error::Error>> {
    let (slugs, labels): (Vec<String>, Vec<String>) = workflow
        .state()
        .categories()
        .iter()
        .map(|(slug, label)| (slug.clone(), label.clone()))
        .unzip();
    let current = workflow
        .state()
        .selected_category()
        .and_then(|s| slugs.iter().position(|slug| slug == s))
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Please Select a Crime Category")
        .items(&labels)
        .default(current)
        .max_length(20)
        .interact()?;

    let spinner = LoadingIndicator::start(multi, "Loading police forces...");
    let result = workflow.select_category(&slugs[idx]).await;
    spinner.finish();

    if let Some(label) = workflow.state().selected_category_label() {
        println!("Selected category: {label}");
    }
    Ok(result)
}

async fn select_force<H: HostClient>(
    workflow: &mut Workflow<H>,
) -> Result<StepResult, Box<dyn std::error::Error>> {
    let (ids, labels): (Vec<String>, Vec<String>) = workflow
        .state()
        .forces()
        .iter()
        .map(|(id, label)| (id.clone(), label.clone()))
        .unzip();
    let current = workflow
        .state()
        .selected_force()
        .and_then(|s| ids.iter().position(|id| id == s))
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Please Select a Force")
        .items(&labels)
        .default(current)
        .max_length(20)
        .interact()?;

    let result = workflow.select_force(&ids[idx]).await;
    if let Some(label) = workflow.state().selected_force_label() {
        println!("Selected force: {label}");
    }
    Ok(result)
}
