#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for querying UK police crime data.
//!
//! Without a subcommand, runs an interactive wizard. The subcommands run
//! the same workflow non-interactively for scripting.
//!
//! Uses `indicatif-log-bridge` (via [`police_data_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and loading spinners never fight for the terminal.

mod interactive;
mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use police_data_api::client::ReqwestHost;
use police_data_api::config::ApiConfig;
use police_data_api::fetch_forces;
use police_data_cli_utils::{LoadingIndicator, MultiProgress};
use police_data_models::ReferenceMonth;
use police_data_workflow::{Banner, Workflow};

#[derive(Parser)]
#[command(name = "police_data", about = "UK police crime data query tool")]
struct Cli {
    /// API base URL (overrides `POLICE_API_BASE_URL`)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List crime categories valid for a month
    Categories {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<ReferenceMonth>,
    },
    /// List police forces
    Forces,
    /// Search crimes and tabulate months to resolution
    Search {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<ReferenceMonth>,
        /// Crime category slug (e.g., "burglary")
        #[arg(long)]
        category: String,
        /// Police force id (e.g., "leicestershire")
        #[arg(long)]
        force: String,
        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = police_data_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = ApiConfig::load()?;
    config.apply_overrides(cli.base_url, None)?;
    log::debug!("Using API at {}", config.base_url);
    let host = ReqwestHost::new(&config)?;

    let today = chrono::Local::now().date_naive();

    match cli.command {
        None => interactive::run(&multi, host, today).await,
        Some(Commands::Categories { month }) => list_categories(&multi, host, today, month).await,
        Some(Commands::Forces) => list_forces(&multi, &host).await,
        Some(Commands::Search {
            month,
            category,
            force,
            json,
        }) => search(&multi, host, today, month, &category, &force, json).await,
    }
}

/// Picks the first day of `month`, or `today` when no month was given.
fn reference_date(month: Option<ReferenceMonth>, today: NaiveDate) -> NaiveDate {
    month
        .and_then(|m| NaiveDate::from_ymd_opt(m.year(), m.month(), 1))
        .unwrap_or(today)
}

/// Turns a raised banner into a process error for scripted use.
fn fail_on(banners: &[Banner], banner: Banner) -> Result<(), Box<dyn std::error::Error>> {
    if banners.contains(&banner) {
        return Err(banner.message().into());
    }
    Ok(())
}

async fn list_categories(
    multi: &MultiProgress,
    host: ReqwestHost,
    today: NaiveDate,
    month: Option<ReferenceMonth>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workflow = Workflow::mount(host, today);
    workflow
        .select_date(reference_date(month, today), today)
        .await?;

    let spinner = LoadingIndicator::start(multi, "Searching crime categories...");
    let result = workflow.search_categories().await;
    spinner.finish();
    result?;

    fail_on(&workflow.state().banners(), Banner::SiteError)?;
    render::print_labels("SLUG", workflow.state().categories());
    Ok(())
}

async fn list_forces(
    multi: &MultiProgress,
    host: &ReqwestHost,
) -> Result<(), Box<dyn std::error::Error>> {
    let spinner = LoadingIndicator::start(multi, "Loading police forces...");
    let forces = fetch_forces(host).await;
    spinner.finish();

    render::print_labels("ID", &forces?);
    Ok(())
}

async fn search(
    multi: &MultiProgress,
    host: ReqwestHost,
    today: NaiveDate,
    month: Option<ReferenceMonth>,
    category: &str,
    force: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workflow = Workflow::mount(host, today);
    workflow
        .select_date(reference_date(month, today), today)
        .await?;

    let spinner = LoadingIndicator::start(multi, "Searching...");
    let result = async {
        workflow.search_categories().await?;
        fail_on(&workflow.state().banners(), Banner::SiteError)?;
        workflow.select_category(category).await?;
        fail_on(&workflow.state().banners(), Banner::SiteError)?;
        workflow.select_force(force).await?;
        workflow.search().await?;
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .await;
    spinner.finish();
    result?;

    let state = workflow.state();
    if json {
        let results = state.displayed_results().unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        render::print_state(state);
    }
    fail_on(&state.banners(), Banner::NoData)
}
