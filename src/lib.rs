//! Client library for the HyScores score-tracking service.
//!
//! HyScores keeps a numeric score per nickname, namespaced by an
//! application identifier. This crate registers users, authenticates them
//! and reads/writes scores over HTTP, in two flavors with an identical
//! contract: the async [`Client`] and the [`blocking::Client`].
//!
//! Every operation apart from [`register`](Client::register) and
//! [`login`](Client::login) requires a previously stored token and fails
//! with [`Error::TokenUnavailable`] before any network call otherwise.
//! The client performs no retries, no caching and no token persistence;
//! transport failures propagate to the caller as-is.
//!
//! # Example
//!
//! ```rust,no_run
//! use hyscores_client::{Client, ClientConfig};
//!
//! # async fn example() -> hyscores_client::Result<()> {
//! let config = ClientConfig::builder("https://hyscores.example.com/", "my-game")
//!     .user_agent("my-game/1.0")
//!     .build()?;
//!
//! let mut client = Client::new(config)?;
//!
//! client.login("username", "password").await?;
//! client.post_score("sadam", 36).await?;
//!
//! for score in client.get_scores().await? {
//!     println!("{score}");
//! }
//!
//! client.logout()?;
//! client.close();
//! # Ok(())
//! # }
//! ```
//!
//! Note that endpoint paths are joined onto the base URL with standard
//! relative resolution, so a missing trailing slash drops the last path
//! segment of the base URL. See [`ClientConfig::base_url`].

pub mod blocking;

mod api;
mod client;
mod config;
mod error;

pub use self::{
    client::Client,
    config::{ClientConfig, ClientConfigBuilder},
    error::{Error, Result},
};

pub use url::Url;
