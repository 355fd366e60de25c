//! Async driver that runs the reducer's effects against a [`HostClient`].
//!
//! The driver handles one user action at a time: it reduces the action,
//! awaits whatever request that produced, and reduces the completion
//! before returning.

use chrono::NaiveDate;
use police_data_api::{HostClient, PanelSize, fetch_categories, fetch_forces, search_crimes};

use crate::state::{Effect, Event, QueryState, WorkflowError, reduce};

/// Executes one effect and returns the completion event for it.
pub async fn execute(host: &dyn HostClient, effect: Effect) -> Event {
    match effect {
        Effect::FetchCategories { request, month } => Event::CategoriesLoaded {
            request,
            result: fetch_categories(host, month).await,
        },
        Effect::FetchForces { request } => Event::ForcesLoaded {
            request,
            result: fetch_forces(host).await,
        },
        Effect::SearchCrimes { request, query } => Event::SearchCompleted {
            request,
            result: search_crimes(host, &query).await,
        },
    }
}

/// A mounted query session bound to a host.
pub struct Workflow<H: HostClient> {
    host: H,
    state: QueryState,
}

impl<H: HostClient> Workflow<H> {
    /// Mounts a new session: asks the host for a full-width 550px panel
    /// and starts with `today` picked.
    #[must_use]
    pub fn mount(host: H, today: NaiveDate) -> Self {
        host.resize(&PanelSize::default());
        Self {
            host,
            state: QueryState::new(today),
        }
    }

    /// The session state after the last completed action.
    #[must_use]
    pub const fn state(&self) -> &QueryState {
        &self.state
    }

    /// The host this session talks to.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Reduces `event` and runs any resulting requests to completion.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] if the state rejects the event.
    pub async fn dispatch(&mut self, event: Event) -> Result<(), WorkflowError> {
        let mut next = reduce(&mut self.state, event)?;
        while let Some(effect) = next {
            let completion = execute(&self.host, effect).await;
            next = reduce(&mut self.state, completion)?;
        }
        Ok(())
    }

    /// Picks a reference date, validated against `today`.
    ///
    /// # Errors
    ///
    /// Currently infallible: an invalid date is recorded on the state
    /// rather than returned.
    pub async fn select_date(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), WorkflowError> {
        self.dispatch(Event::DateSelected { date, today }).await
    }

    /// Fetches categories for the selected month.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] if the picked date is invalid or a request
    /// is already in flight. API failures surface as banners.
    pub async fn search_categories(&mut self) -> Result<(), WorkflowError> {
        self.dispatch(Event::CategoriesRequested).await
    }

    /// Selects a category, fetching forces if it changed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownCategory`] for a slug that was not
    /// fetched.
    pub async fn select_category(&mut self, slug: &str) -> Result<(), WorkflowError> {
        self.dispatch(Event::CategorySelected(slug.to_string())).await
    }

    /// Selects a force.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownForce`] for an id that was not
    /// fetched.
    pub async fn select_force(&mut self, id: &str) -> Result<(), WorkflowError> {
        self.dispatch(Event::ForceSelected(id.to_string())).await
    }

    /// Runs the crime search for the current selections.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::MissingSelection`] unless both a category
    /// and a force are selected.
    pub async fn search(&mut self) -> Result<(), WorkflowError> {
        self.dispatch(Event::SearchRequested).await
    }
}
