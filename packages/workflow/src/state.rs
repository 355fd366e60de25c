//! Query session state and its reducer.
//!
//! Every user action and every fetch completion is an [`Event`]. Feeding
//! an event to [`reduce`] mutates the [`QueryState`] and may return an
//! [`Effect`] describing the single request the host must now issue.
//!
//! Each effect carries a [`RequestId`]. The state remembers the one
//! request it is waiting on; completions for any other id are stale and
//! are dropped, so a slow response to an abandoned selection can never
//! overwrite newer state.

use std::fmt;

use chrono::NaiveDate;
use police_data_api::{ApiError, CrimeQuery};
use police_data_models::{
    CategoryMap, CrimeRecord, ForceMap, ReferenceMonth, ResolutionSummary, ValidationError,
};
use strum_macros::{AsRefStr, Display};

use crate::resolution::summarize_all;
use crate::validation::validate_date;

/// Position of the workflow in its four-step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    /// Nothing fetched yet.
    Idle,
    /// Category list requested.
    CategoriesLoading,
    /// Categories available for selection.
    CategoriesReady,
    /// Force list requested after a category change.
    ForcesLoading,
    /// Forces available for selection.
    ForcesReady,
    /// Crime search requested.
    SearchLoading,
    /// Search returned at least one record.
    SearchSucceeded,
    /// Search returned zero records.
    SearchEmpty,
    /// Search request failed.
    SearchFailed,
}

/// The three fetches the workflow performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// `GET /crime-categories`.
    Categories,
    /// `GET /forces`.
    Forces,
    /// `GET /crimes-no-location`.
    Search,
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    request: RequestId,
    stage: Stage,
}

/// Severity of a [`Banner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Informational.
    Success,
    /// Non-error notice.
    Warning,
    /// Something went wrong.
    Error,
}

/// A notification shown above or below the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// A search returned this many results.
    SearchResults(usize),
    /// A search succeeded with no results.
    NoResults,
    /// The last search request failed.
    NoData,
    /// A category or force fetch failed. Stays up for the rest of the session.
    SiteError,
}

impl Banner {
    /// Severity of the banner.
    #[must_use]
    pub const fn kind(self) -> BannerKind {
        match self {
            Self::SearchResults(_) => BannerKind::Success,
            Self::NoResults => BannerKind::Warning,
            Self::NoData | Self::SiteError => BannerKind::Error,
        }
    }

    /// Short heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::SearchResults(_) => "Info",
            Self::NoResults => "No Results",
            Self::NoData => "No Data",
            Self::SiteError => "Site Error",
        }
    }

    /// Body text.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::SearchResults(n) => format!("{n} Search Results"),
            Self::NoResults => "No search results found for this criteria".to_string(),
            Self::NoData => "No data available for this date".to_string(),
            Self::SiteError => "Error Accessing API, please try again later".to_string(),
        }
    }
}

/// Errors for events the current state cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// The picked date is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A request is in flight that this event cannot supersede.
    #[error("{stage} request already in progress")]
    Busy {
        /// The stage being waited on.
        stage: Stage,
    },

    /// The slug is not in the fetched category list.
    #[error("unknown crime category {slug:?}")]
    UnknownCategory {
        /// Rejected slug.
        slug: String,
    },

    /// The id is not in the fetched force list.
    #[error("unknown police force {id:?}")]
    UnknownForce {
        /// Rejected id.
        id: String,
    },

    /// A search needs both a category and a force.
    #[error("select a crime category and a police force before searching")]
    MissingSelection,
}

/// Something that happened: a user action or a fetch completion.
#[derive(Debug)]
pub enum Event {
    /// The user picked a reference date.
    DateSelected {
        /// Picked date.
        date: NaiveDate,
        /// Current date the pick is validated against.
        today: NaiveDate,
    },
    /// The user asked for the category list.
    CategoriesRequested,
    /// A category fetch finished.
    CategoriesLoaded {
        /// Request being answered.
        request: RequestId,
        /// Fetched categories or the failure.
        result: Result<CategoryMap, ApiError>,
    },
    /// The user picked a category by slug.
    CategorySelected(String),
    /// A force fetch finished.
    ForcesLoaded {
        /// Request being answered.
        request: RequestId,
        /// Fetched forces or the failure.
        result: Result<ForceMap, ApiError>,
    },
    /// The user picked a force by id.
    ForceSelected(String),
    /// The user asked to run the search.
    SearchRequested,
    /// A crime search finished.
    SearchCompleted {
        /// Request being answered.
        request: RequestId,
        /// Raw records or the failure.
        result: Result<Vec<CrimeRecord>, ApiError>,
    },
}

/// A request the host must issue and answer with the matching completion
/// [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch categories for a month.
    FetchCategories {
        /// Id to echo in [`Event::CategoriesLoaded`].
        request: RequestId,
        /// Month to fetch for.
        month: ReferenceMonth,
    },
    /// Fetch the force list.
    FetchForces {
        /// Id to echo in [`Event::ForcesLoaded`].
        request: RequestId,
    },
    /// Run a crime search.
    SearchCrimes {
        /// Id to echo in [`Event::SearchCompleted`].
        request: RequestId,
        /// Search parameters.
        query: CrimeQuery,
    },
}

impl Effect {
    /// The id the completion event must carry.
    #[must_use]
    pub const fn request(&self) -> RequestId {
        match self {
            Self::FetchCategories { request, .. }
            | Self::FetchForces { request }
            | Self::SearchCrimes { request, .. } => *request,
        }
    }
}

/// Everything the presentation layer needs for one query session.
///
/// Created when the widget mounts and dropped when it unmounts. Only
/// [`reduce`] mutates it.
#[derive(Debug, Clone)]
pub struct QueryState {
    step: Step,
    date: NaiveDate,
    date_error: Option<ValidationError>,
    month: ReferenceMonth,
    categories: CategoryMap,
    selected_category: Option<String>,
    forces_loaded_for: Option<String>,
    forces: ForceMap,
    selected_force: Option<String>,
    results: Option<Vec<ResolutionSummary>>,
    site_error: bool,
    search_failed: bool,
    pending: Option<Pending>,
    resume_step: Step,
    next_request: u64,
}

impl QueryState {
    /// Creates a fresh session with `today` picked.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: Step::Idle,
            date: today,
            date_error: None,
            month: ReferenceMonth::from_date(today),
            categories: CategoryMap::new(),
            selected_category: None,
            forces_loaded_for: None,
            forces: ForceMap::new(),
            selected_force: None,
            results: None,
            site_error: false,
            search_failed: false,
            pending: None,
            resume_step: Step::Idle,
            next_request: 0,
        }
    }

    /// Current position in the step sequence.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// The last date picked, valid or not.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Month of the last valid date picked.
    #[must_use]
    pub const fn month(&self) -> ReferenceMonth {
        self.month
    }

    /// Inline validation problem with the picked date, if any.
    #[must_use]
    pub const fn date_error(&self) -> Option<&ValidationError> {
        self.date_error.as_ref()
    }

    /// Categories fetched for the current month.
    #[must_use]
    pub const fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    /// Forces from the last successful fetch.
    #[must_use]
    pub const fn forces(&self) -> &ForceMap {
        &self.forces
    }

    /// Slug of the selected category.
    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Id of the selected force.
    #[must_use]
    pub fn selected_force(&self) -> Option<&str> {
        self.selected_force.as_deref()
    }

    /// Display label of the selected category.
    #[must_use]
    pub fn selected_category_label(&self) -> Option<&str> {
        self.categories
            .get(self.selected_category.as_deref()?)
            .map(String::as_str)
    }

    /// Display label of the selected force.
    #[must_use]
    pub fn selected_force_label(&self) -> Option<&str> {
        self.forces
            .get(self.selected_force.as_deref()?)
            .map(String::as_str)
    }

    /// Results of the last search, whether or not they are displayable.
    #[must_use]
    pub fn results(&self) -> Option<&[ResolutionSummary]> {
        self.results.as_deref()
    }

    /// Results to show: only while both a category and a force are selected.
    #[must_use]
    pub fn displayed_results(&self) -> Option<&[ResolutionSummary]> {
        if self.selected_category.is_none() || self.selected_force.is_none() {
            return None;
        }
        self.results()
    }

    /// Returns `true` while a request for `stage` is in flight.
    #[must_use]
    pub fn is_loading(&self, stage: Stage) -> bool {
        self.pending.is_some_and(|p| p.stage == stage)
    }

    /// The request currently awaited, if any.
    #[must_use]
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending.map(|p| p.request)
    }

    /// Whether the category search action should be enabled.
    #[must_use]
    pub const fn can_search_categories(&self) -> bool {
        self.date_error.is_none() && self.pending.is_none()
    }

    /// Whether the crime search action should be shown.
    #[must_use]
    pub const fn can_search(&self) -> bool {
        self.selected_category.is_some() && self.selected_force.is_some()
    }

    /// Banners to show, in display order.
    #[must_use]
    pub fn banners(&self) -> Vec<Banner> {
        let mut banners = Vec::new();
        match self.displayed_results() {
            Some([]) => banners.push(Banner::NoResults),
            Some(results) => banners.push(Banner::SearchResults(results.len())),
            None => {}
        }
        if self.search_failed {
            banners.push(Banner::NoData);
        }
        if self.site_error {
            banners.push(Banner::SiteError);
        }
        banners
    }

    fn issue(&mut self, stage: Stage, loading: Step) -> RequestId {
        self.next_request += 1;
        let request = RequestId(self.next_request);
        if let Some(previous) = self.pending.replace(Pending { request, stage }) {
            log::debug!(
                "Cancelling {} request {} in favour of {stage} request {request}",
                previous.stage,
                previous.request
            );
        }
        self.resume_step = match self.step {
            Step::CategoriesLoading | Step::ForcesLoading | Step::SearchLoading => {
                self.resume_step
            }
            step => step,
        };
        self.transition(loading);
        request
    }

    /// Clears the pending slot if `request` is the one being awaited.
    fn settle(&mut self, stage: Stage, request: RequestId) -> bool {
        match self.pending {
            Some(p) if p.stage == stage && p.request == request => {
                self.pending = None;
                true
            }
            _ => {
                log::warn!("Discarding stale {stage} response {request}");
                false
            }
        }
    }

    /// Drops everything fetched for the previous month, along with any
    /// request still in flight.
    fn discard_month(&mut self) {
        if let Some(p) = self.pending.take() {
            log::debug!("Month changed; abandoning {} request {}", p.stage, p.request);
        }
        self.categories.clear();
        self.selected_category = None;
        self.forces_loaded_for = None;
        self.resume_step = Step::Idle;
        self.transition(Step::Idle);
    }

    fn busy_with(&self, stages: &[Stage]) -> Result<(), WorkflowError> {
        match self.pending {
            Some(p) if stages.contains(&p.stage) => Err(WorkflowError::Busy { stage: p.stage }),
            _ => Ok(()),
        }
    }

    fn transition(&mut self, to: Step) {
        if self.step != to {
            log::debug!("{} -> {to}", self.step);
            self.step = to;
        }
    }
}

/// Applies `event` to `state`, returning the request to issue next, if any.
///
/// # Errors
///
/// Returns [`WorkflowError`] if the event is not acceptable in the
/// current state. The state is left unchanged in that case.
pub fn reduce(state: &mut QueryState, event: Event) -> Result<Option<Effect>, WorkflowError> {
    match event {
        Event::DateSelected { date, today } => {
            state.date = date;
            match validate_date(date, today) {
                Ok(month) => {
                    state.date_error = None;
                    if month != state.month {
                        state.month = month;
                        state.discard_month();
                    }
                }
                Err(e) => state.date_error = Some(e),
            }
            if state.is_loading(Stage::Categories) {
                log::debug!("Date changed; abandoning category fetch");
                state.pending = None;
                state.transition(state.resume_step);
            }
            Ok(None)
        }
        Event::CategoriesRequested => {
            if let Some(e) = &state.date_error {
                return Err(e.clone().into());
            }
            state.busy_with(&[Stage::Categories, Stage::Forces, Stage::Search])?;
            let request = state.issue(Stage::Categories, Step::CategoriesLoading);
            Ok(Some(Effect::FetchCategories {
                request,
                month: state.month,
            }))
        }
        Event::CategoriesLoaded { request, result } => {
            if !state.settle(Stage::Categories, request) {
                return Ok(None);
            }
            match result {
                Ok(categories) => {
                    state.categories = categories;
                    state.selected_category = None;
                    state.transition(Step::CategoriesReady);
                }
                Err(e) => {
                    log::warn!("Category fetch failed: {e}");
                    state.site_error = true;
                    state.transition(state.resume_step);
                }
            }
            Ok(None)
        }
        Event::CategorySelected(slug) => {
            state.busy_with(&[Stage::Categories])?;
            if !state.categories.contains_key(&slug) {
                return Err(WorkflowError::UnknownCategory { slug });
            }
            let current = Some(slug.as_str());
            let settled = state.forces_loaded_for.as_deref() == current;
            if state.selected_category.as_deref() == current
                && (settled || state.is_loading(Stage::Forces))
            {
                return Ok(None);
            }
            state.selected_category = Some(slug);
            let request = state.issue(Stage::Forces, Step::ForcesLoading);
            Ok(Some(Effect::FetchForces { request }))
        }
        Event::ForcesLoaded { request, result } => {
            if !state.settle(Stage::Forces, request) {
                return Ok(None);
            }
            match result {
                Ok(forces) => {
                    if state
                        .selected_force
                        .as_ref()
                        .is_some_and(|id| !forces.contains_key(id))
                    {
                        state.selected_force = None;
                    }
                    state.forces = forces;
                    state.forces_loaded_for.clone_from(&state.selected_category);
                    state.transition(Step::ForcesReady);
                }
                Err(e) => {
                    log::warn!("Force fetch failed: {e}");
                    state.site_error = true;
                    state.forces_loaded_for = None;
                    let fallback = if state.forces.is_empty() {
                        Step::CategoriesReady
                    } else {
                        Step::ForcesReady
                    };
                    state.transition(fallback);
                }
            }
            Ok(None)
        }
        Event::ForceSelected(id) => {
            state.busy_with(&[Stage::Categories, Stage::Forces])?;
            if !state.forces.contains_key(&id) {
                return Err(WorkflowError::UnknownForce { id });
            }
            if state.selected_force.as_deref() == Some(id.as_str()) {
                return Ok(None);
            }
            if let Some(p) = state.pending.take() {
                log::debug!("Force changed; abandoning search {}", p.request);
            }
            state.selected_force = Some(id);
            state.transition(Step::ForcesReady);
            Ok(None)
        }
        Event::SearchRequested => {
            if let Some(e) = &state.date_error {
                return Err(e.clone().into());
            }
            state.busy_with(&[Stage::Categories, Stage::Forces, Stage::Search])?;
            let (Some(category), Some(force)) =
                (state.selected_category.clone(), state.selected_force.clone())
            else {
                return Err(WorkflowError::MissingSelection);
            };
            state.search_failed = false;
            let request = state.issue(Stage::Search, Step::SearchLoading);
            Ok(Some(Effect::SearchCrimes {
                request,
                query: CrimeQuery {
                    month: state.month,
                    category,
                    force,
                },
            }))
        }
        Event::SearchCompleted { request, result } => {
            if !state.settle(Stage::Search, request) {
                return Ok(None);
            }
            match result {
                Ok(records) => {
                    let summaries = summarize_all(&records);
                    let step = if summaries.is_empty() {
                        Step::SearchEmpty
                    } else {
                        Step::SearchSucceeded
                    };
                    state.results = Some(summaries);
                    state.transition(step);
                }
                Err(e) => {
                    log::warn!("Crime search failed: {e}");
                    state.results = None;
                    state.search_failed = true;
                    state.transition(Step::SearchFailed);
                }
            }
            Ok(None)
        }
    }
}
