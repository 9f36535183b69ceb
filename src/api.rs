//! Endpoint names, request bodies and response-shape interpretation.
//!
//! Every response of the service is a JSON envelope `{"result": ...}`; the
//! functions here turn the `result` field into the value each operation
//! promises. Both client variants share this module so the wire contract
//! exists exactly once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub(crate) const REGISTER: &str = "register";
pub(crate) const LOGIN: &str = "login";
pub(crate) const SCORES: &str = "scores";
pub(crate) const SCORE: &str = "score";

/// Fixed custom header carrying the raw token on gated requests.
pub(crate) const TOKEN_HEADER: &str = "x-access-tokens";

#[derive(Serialize)]
pub(crate) struct AppBody<'a> {
    pub app: &'a str,
}

#[derive(Serialize)]
pub(crate) struct NicknameBody<'a> {
    pub app: &'a str,
    pub nickname: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ScoreBody<'a> {
    pub app: &'a str,
    pub nickname: &'a str,
    pub score: i64,
}

/// Envelope for operations where a missing `result` is a malformed body.
#[derive(Deserialize)]
struct Envelope<T> {
    result: T,
}

/// `{"result": bool}`; an absent `result` counts as `false`, the service
/// reports a failed registration as a business outcome, not an error.
pub(crate) fn parse_register(bytes: &[u8]) -> Result<bool> {
    #[derive(Deserialize)]
    struct RegisterResponse {
        #[serde(default)]
        result: bool,
    }

    let RegisterResponse { result } = serde_json::from_slice(bytes)?;

    Ok(result)
}

/// `{"result": {"token": string}}`; anything else is [`Error::Auth`].
pub(crate) fn parse_login(bytes: &[u8]) -> Result<Box<str>> {
    #[derive(Deserialize)]
    struct LoginResponse {
        #[serde(default)]
        result: Value,
    }

    let LoginResponse { result } = serde_json::from_slice(bytes)?;

    match result.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => Ok(Box::from(token)),
        _ => Err(Error::Auth),
    }
}

/// `{"result": [...]}`, passed through verbatim.
pub(crate) fn parse_scores(bytes: &[u8]) -> Result<Vec<Value>> {
    let Envelope { result } = serde_json::from_slice(bytes)?;

    Ok(result)
}

/// `{"result": object}`; a non-object `result` means the service could not
/// resolve the nickname and becomes [`Error::InvalidName`].
pub(crate) fn parse_score(bytes: &[u8]) -> Result<Map<String, Value>> {
    let Envelope { result } = serde_json::from_slice::<Envelope<Value>>(bytes)?;

    match result {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidName(other)),
    }
}

/// `{"result": bool}`, passed through verbatim.
pub(crate) fn parse_posted(bytes: &[u8]) -> Result<bool> {
    let Envelope { result } = serde_json::from_slice(bytes)?;

    Ok(result)
}
