use std::{cmp, time::Duration};

use url::Url;

use crate::error::Result;

const DEFAULT_TIMEOUT_SECS: i64 = 30;

/// Connection parameters shared by both client variants.
///
/// Built through [`ClientConfig::builder`]; no network call is made until
/// the first operation on a client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the HyScores service.
    ///
    /// Endpoint paths are joined onto this URL with standard relative
    /// resolution, so the trailing slash matters: joining `scores` onto
    /// `http://host/api/` yields `http://host/api/scores`, while joining
    /// it onto `http://host/api` yields `http://host/scores`.
    pub base_url: Url,
    /// Application identifier sent with every request, distinguishing
    /// which application's score namespace is accessed.
    pub app: String,
    /// Per-request timeout covering the full round trip.
    pub timeout: Duration,
    /// Optional `user-agent` header applied to every outbound request.
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn builder(base_url: impl Into<String>, app: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: base_url.into(),
            app: app.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
    base_url: String,
    app: String,
    timeout_secs: i64,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the per-request timeout in seconds. Negative values clamp to 0.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout_secs(mut self, secs: i64) -> Self {
        self.timeout_secs = secs;

        self
    }

    /// Set the `user-agent` header sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());

        self
    }

    /// Finalize the configuration.
    ///
    /// Fails with [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the
    /// base URL does not parse as an absolute URL.
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = Url::parse(&self.base_url)?;
        let timeout_secs = cmp::max(self.timeout_secs, 0);

        Ok(ClientConfig {
            base_url,
            app: self.app,
            timeout: Duration::from_secs(timeout_secs as u64),
            user_agent: self.user_agent,
        })
    }
}
