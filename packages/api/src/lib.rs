#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the UK Police public data API (`data.police.uk`).
//!
//! All outbound traffic goes through the [`HostClient`] trait so the
//! query workflow can run against the real API ([`client::ReqwestHost`])
//! or an in-memory stand-in in tests. The three endpoints the workflow
//! needs live in [`endpoints`].
//!
//! Requests are never retried: a failure is reported once and the user
//! decides whether to try again.

pub mod client;
pub mod config;
pub mod endpoints;

use async_trait::async_trait;

pub use endpoints::{CrimeQuery, fetch_categories, fetch_forces, search_crimes};

/// Errors that can occur while talking to the police data API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The body was not valid JSON, or an item had the wrong shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was valid JSON but not the expected structure.
    #[error("Unexpected response: {message}")]
    Parse {
        /// Description of what was wrong.
        message: String,
    },
}

/// Dimensions requested from the host panel when the widget mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSize {
    /// CSS width, e.g. `"100%"`.
    pub width: String,
    /// CSS height, e.g. `"550px"`.
    pub height: String,
}

impl Default for PanelSize {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "550px".to_string(),
        }
    }
}

/// The host environment a query workflow runs inside.
///
/// Abstracts outbound HTTP and panel lifecycle signalling.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Issues a `GET` for `path` (relative to the API base URL) with the
    /// given query parameters and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or a
    /// body that is not JSON.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, ApiError>;

    /// Asks the host to resize the panel hosting the workflow.
    fn resize(&self, size: &PanelSize);
}
