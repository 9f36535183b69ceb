//! Blocking HyScores client.
//!
//! Same contract as the async [`Client`](crate::Client): the business
//! logic lives there once, and this variant drives it to completion on a
//! privately owned current-thread tokio runtime. Each call blocks until
//! the transport answers or the configured timeout elapses.
//!
//! Must not be used from within an async context; `block_on` would panic
//! there. Use the async client instead.

use serde_json::{Map, Value};
use tokio::runtime::{Builder, Runtime};

use crate::{config::ClientConfig, error::Result};

/// Blocking HyScores client.
///
/// Not thread-safe by contract: the token is plain mutable state, reuse
/// the client across sequential calls on one thread.
pub struct Client {
    inner: crate::Client,
    rt: Runtime,
}

impl Client {
    /// Create a blocking client from the given configuration.
    ///
    /// Spawns the runtime that will drive every request; no network call
    /// occurs here.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        let inner = crate::Client::new(config)?;

        Ok(Self { inner, rt })
    }

    /// The currently stored authentication token, if any.
    pub fn token(&self) -> Option<&str> {
        self.inner.token()
    }

    /// Store a token directly, bypassing [`login`](Self::login).
    ///
    /// Every subsequent gated request carries the new value in its token
    /// header.
    pub fn set_token(&mut self, token: impl Into<Box<str>>) {
        self.inner.set_token(token);
    }

    /// Replace the `user-agent` header sent with every outbound request.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.inner.set_user_agent(user_agent);
    }

    /// Register a new user. See [`Client::register`](crate::Client::register).
    pub fn register(&self, username: &str, password: &str) -> Result<bool> {
        self.rt.block_on(self.inner.register(username, password))
    }

    /// Authenticate and store the issued token.
    /// See [`Client::login`](crate::Client::login).
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.rt.block_on(self.inner.login(username, password))
    }

    /// Clear the stored token. Gated; no network call is made.
    pub fn logout(&mut self) -> Result<()> {
        self.inner.logout()
    }

    /// Fetch all scores of the configured application.
    pub fn get_scores(&self) -> Result<Vec<Value>> {
        self.rt.block_on(self.inner.get_scores())
    }

    /// Fetch the score entry for a single nickname.
    pub fn get_score(&self, nickname: &str) -> Result<Map<String, Value>> {
        self.rt.block_on(self.inner.get_score(nickname))
    }

    /// Submit a score for a nickname, returning the service's verdict.
    pub fn post_score(&self, nickname: &str, score: i64) -> Result<bool> {
        self.rt.block_on(self.inner.post_score(nickname, score))
    }

    /// Release the client, dropping its connection pool and shutting down
    /// the owned runtime.
    pub fn close(self) {
        let Self { inner, rt } = self;

        inner.close();
        rt.shutdown_background();
    }
}
