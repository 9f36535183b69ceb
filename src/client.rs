use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT},
    Method, Request,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Builder, Client as HyperClient},
    rt::TokioExecutor,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    api,
    config::ClientConfig,
    error::{Error, Result},
};

#[cfg(feature = "ring")]
use rustls::crypto::ring::default_provider;

#[cfg(all(feature = "aws", not(feature = "ring")))]
use rustls::crypto::aws_lc_rs::default_provider;

#[cfg(not(any(feature = "ring", feature = "aws")))]
compile_error!("either the `ring` or the `aws` feature must be enabled");

/// Credentials attached to a single request.
enum Auth<'a> {
    Basic { username: &'a str, password: &'a str },
    Token(&'a str),
}

/// Asynchronous HyScores client.
///
/// Owns its connection pool; each operation issues exactly one HTTP round
/// trip (except [`logout`](Self::logout), which issues none) and suspends
/// while awaiting the response. Dropping an in-flight future leaves the
/// stored token unchanged.
///
/// The client is not meant to be shared across tasks: the token is plain
/// mutable state and mutating operations take `&mut self`.
pub struct Client {
    config: ClientConfig,
    token: Option<Box<str>>,
    http: HyperClient<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl Client {
    /// Create a client from the given configuration.
    ///
    /// No network call occurs here; connections are established lazily on
    /// the first operation.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let https = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(default_provider())?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        let http = Builder::new(TokioExecutor::new()).build(https);

        Ok(Self {
            config,
            token: None,
            http,
        })
    }

    /// The currently stored authentication token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Store a token directly, bypassing [`login`](Self::login).
    ///
    /// Every subsequent gated request carries the new value in its token
    /// header. Intended for test and setup scenarios; regular callers
    /// obtain their token through `login`.
    pub fn set_token(&mut self, token: impl Into<Box<str>>) {
        self.token = Some(token.into());
    }

    /// Replace the `user-agent` header sent with every outbound request.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.config.user_agent = Some(user_agent.into());
    }

    /// Register a new user.
    ///
    /// Returns the service's boolean verdict; a response without a
    /// `result` field counts as `false`. A rejected registration is a
    /// business outcome, not an error.
    pub async fn register(&self, username: &str, password: &str) -> Result<bool> {
        let req = self.request(
            Method::POST,
            api::REGISTER,
            &api::AppBody {
                app: &self.config.app,
            },
            Auth::Basic { username, password },
        )?;

        let bytes = self.roundtrip(req).await?;

        api::parse_register(&bytes)
    }

    /// Authenticate and store the issued token.
    ///
    /// This is the only operation that sets the token on the happy path.
    /// Fails with [`Error::Auth`] when the response carries no usable
    /// token; the stored token is untouched in that case.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let req = self.request(
            Method::POST,
            api::LOGIN,
            &api::AppBody {
                app: &self.config.app,
            },
            Auth::Basic { username, password },
        )?;

        let bytes = self.roundtrip(req).await?;
        let token = api::parse_login(&bytes)?;

        debug!("logged in");
        self.token = Some(token);

        Ok(())
    }

    /// Clear the stored token. No network call is made.
    ///
    /// Gated like every other token-requiring operation: logging out
    /// without a stored token fails with [`Error::TokenUnavailable`].
    pub fn logout(&mut self) -> Result<()> {
        self.require_token()?;
        self.token = None;

        Ok(())
    }

    /// Fetch all scores of the configured application.
    ///
    /// The elements are passed through verbatim; their shape is whatever
    /// the service answered with.
    pub async fn get_scores(&self) -> Result<Vec<Value>> {
        let token = self.require_token()?;

        let req = self.request(
            Method::GET,
            api::SCORES,
            &api::AppBody {
                app: &self.config.app,
            },
            Auth::Token(token),
        )?;

        let bytes = self.roundtrip(req).await?;

        api::parse_scores(&bytes)
    }

    /// Fetch the score entry for a single nickname.
    ///
    /// Fails with [`Error::InvalidName`] when the service answers with a
    /// non-object `result`, its way of reporting an unknown nickname.
    pub async fn get_score(&self, nickname: &str) -> Result<Map<String, Value>> {
        let token = self.require_token()?;

        let req = self.request(
            Method::GET,
            api::SCORE,
            &api::NicknameBody {
                app: &self.config.app,
                nickname,
            },
            Auth::Token(token),
        )?;

        let bytes = self.roundtrip(req).await?;

        api::parse_score(&bytes)
    }

    /// Submit a score for a nickname, returning the service's verdict.
    pub async fn post_score(&self, nickname: &str, score: i64) -> Result<bool> {
        let token = self.require_token()?;

        let req = self.request(
            Method::POST,
            api::SCORE,
            &api::ScoreBody {
                app: &self.config.app,
                nickname,
                score,
            },
            Auth::Token(token),
        )?;

        let bytes = self.roundtrip(req).await?;

        api::parse_posted(&bytes)
    }

    /// Release the client, dropping its connection pool.
    pub fn close(self) {
        drop(self);
    }

    /// Precondition of every gated operation, checked before a request is
    /// even built. An empty token counts as unset.
    fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(Error::TokenUnavailable)
    }

    fn request<B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
        auth: Auth<'_>,
    ) -> Result<Request<Full<Bytes>>> {
        let url = self.config.base_url.join(endpoint)?;
        let json = serde_json::to_vec(body)?;

        trace!(%url, ?method, "sending request");

        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, json.len());

        if let Some(user_agent) = self.config.user_agent.as_deref() {
            builder = builder.header(USER_AGENT, user_agent);
        }

        match auth {
            Auth::Basic { username, password } => {
                let credentials = BASE64.encode(format!("{username}:{password}"));
                builder = builder.header(AUTHORIZATION, format!("Basic {credentials}"));
            }
            Auth::Token(token) => builder = builder.header(api::TOKEN_HEADER, token),
        }

        Ok(builder.body(Full::from(json))?)
    }

    /// One full round trip under the configured timeout, yielding the raw
    /// body bytes of a successful response.
    async fn roundtrip(&self, req: Request<Full<Bytes>>) -> Result<Bytes> {
        let fut = async {
            let response = self.http.request(req).await?;
            let (parts, incoming) = response.into_parts();
            let bytes = incoming.collect().await?.to_bytes();

            Ok::<_, Error>((parts.status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(self.config.timeout, fut)
            .await
            .map_err(|_| Error::Timeout)??;

        trace!(%status, len = bytes.len(), "received response");

        if status.is_success() {
            Ok(bytes)
        } else {
            Err(Error::Status { status, body: bytes })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        let config = ClientConfig::builder("http://example.com", "hyscores")
            .build()
            .unwrap();

        Client::new(config).unwrap()
    }

    #[tokio::test]
    async fn gated_operations_fail_without_token() {
        let mut client = client();

        assert!(matches!(
            client.get_scores().await,
            Err(Error::TokenUnavailable)
        ));
        assert!(matches!(
            client.get_score("sadam").await,
            Err(Error::TokenUnavailable)
        ));
        assert!(matches!(
            client.post_score("sadam", 36).await,
            Err(Error::TokenUnavailable)
        ));
        assert!(matches!(client.logout(), Err(Error::TokenUnavailable)));
    }

    #[test]
    fn set_token_then_logout_clears_it() {
        let mut client = client();

        client.set_token("T");
        assert_eq!(client.token(), Some("T"));

        client.logout().unwrap();
        assert_eq!(client.token(), None);

        assert!(matches!(client.logout(), Err(Error::TokenUnavailable)));
    }

    #[test]
    fn empty_token_counts_as_unset() {
        let mut client = client();

        client.set_token("");
        assert!(matches!(client.logout(), Err(Error::TokenUnavailable)));
    }
}
