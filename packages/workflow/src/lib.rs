#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime query workflow over the UK Police data API.
//!
//! A session walks four steps: pick a reference month, fetch and pick a
//! crime category, fetch and pick a police force, then search crimes and
//! tabulate how long each took to reach an outcome.
//!
//! The session is a plain [`QueryState`] value changed only through
//! [`reduce`]. [`Workflow`] wraps a state and a
//! [`HostClient`](police_data_api::HostClient) and runs the requests the
//! reducer asks for.

pub mod resolution;
pub mod state;
pub mod validation;
pub mod workflow;

pub use resolution::{month_component, summarize, summarize_all};
pub use state::{
    Banner, BannerKind, Effect, Event, QueryState, RequestId, Stage, Step, WorkflowError, reduce,
};
pub use validation::{is_valid_date, validate_date};
pub use workflow::{Workflow, execute};
