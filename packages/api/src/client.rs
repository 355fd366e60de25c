//! [`HostClient`] backed by a real `reqwest` connection pool.

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::{ApiError, HostClient, PanelSize};

/// Sends requests to the live API described by an [`ApiConfig`].
#[derive(Debug, Clone)]
pub struct ReqwestHost {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestHost {
    /// Builds a client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HostClient for ReqwestHost {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint_url(path);
        log::debug!("GET {url} {query:?}");

        let resp = self.client.get(&url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn resize(&self, size: &PanelSize) {
        log::debug!("Panel resize requested: {} x {}", size.width, size.height);
    }
}
