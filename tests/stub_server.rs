//! End-to-end tests of both client variants against an in-process HTTP
//! stub of the HyScores service.

use std::{convert::Infallible, net::SocketAddr};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Incoming,
    header::{AUTHORIZATION, USER_AGENT},
    server::conn::http1,
    service::service_fn,
    Method, Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use hyscores_client::{blocking, Client, ClientConfig, Error};

const APP: &str = "hyscores";
const USERNAME: &str = "asda";
const PASSWORD: &str = "352354300n00";
const TOKEN: &str = "324234efs42bt9ffon032r0frnd0fn";
const TEST_USER_AGENT: &str = "hyscores-client tests";

// base64 of "asda:352354300n00"
const BASIC_AUTH: &str = "Basic YXNkYTozNTIzNTQzMDBuMDA=";

fn json_response(status: StatusCode, value: Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::from(value.to_string()))
        .unwrap()
}

async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, incoming) = req.into_parts();
    let bytes = incoming.collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    let user_agent = parts.headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let authorization = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = parts
        .headers
        .get("x-access-tokens")
        .and_then(|v| v.to_str().ok());

    if user_agent != Some(TEST_USER_AGENT) || body["app"] != APP {
        return Ok(json_response(
            StatusCode::BAD_REQUEST,
            json!({"result": "bad request"}),
        ));
    }

    let response = match (&parts.method, parts.uri.path()) {
        (&Method::POST, "/register") => {
            if authorization == Some(BASIC_AUTH) {
                json_response(StatusCode::OK, json!({"result": true}))
            } else {
                json_response(StatusCode::OK, json!({}))
            }
        }
        (&Method::POST, "/login") => {
            if authorization == Some(BASIC_AUTH) {
                json_response(StatusCode::OK, json!({"result": {"token": TOKEN}}))
            } else {
                json_response(StatusCode::OK, json!({"result": null}))
            }
        }
        _ if token != Some(TOKEN) => json_response(
            StatusCode::UNAUTHORIZED,
            json!({"result": "unauthorized"}),
        ),
        (&Method::GET, "/scores") => json_response(StatusCode::OK, json!({"result": []})),
        (&Method::GET, "/score") => {
            if body["nickname"] == "sadam" {
                json_response(StatusCode::OK, json!({"result": {"sadam": 36}}))
            } else {
                json_response(StatusCode::OK, json!({"result": "Invalid Name"}))
            }
        }
        (&Method::POST, "/score") => json_response(StatusCode::OK, json!({"result": true})),
        _ => json_response(StatusCode::NOT_FOUND, json!({"result": "not found"})),
    };

    Ok(response)
}

async fn serve(listener: TcpListener) {
    loop {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };

        tokio::spawn(async move {
            let _ = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service_fn(route))
                .await;
        });
    }
}

/// Bind the stub on an ephemeral port and serve it on the current runtime.
async fn spawn_stub() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve(listener));

    addr
}

/// Serve the stub from a dedicated thread with its own runtime, for tests
/// of the blocking client which must run outside any async context.
fn spawn_stub_thread() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();

            serve(listener).await;
        });
    });

    rx.recv().unwrap()
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::builder(format!("http://{addr}/"), APP)
        .timeout_secs(5)
        .user_agent(TEST_USER_AGENT)
        .build()
        .unwrap()
}

#[tokio::test]
async fn async_end_to_end() {
    let addr = spawn_stub().await;
    let mut client = Client::new(config(addr)).unwrap();

    assert!(matches!(
        client.get_scores().await,
        Err(Error::TokenUnavailable)
    ));

    assert!(client.register(USERNAME, PASSWORD).await.unwrap());

    client.login(USERNAME, PASSWORD).await.unwrap();
    assert_eq!(client.token(), Some(TOKEN));

    let scores = client.get_scores().await.unwrap();
    assert!(scores.is_empty());

    let score = client.get_score("sadam").await.unwrap();
    assert_eq!(score["sadam"], 36);

    assert!(matches!(
        client.get_score("your mom").await,
        Err(Error::InvalidName(_))
    ));

    assert!(client.post_score("sadam", 36).await.unwrap());

    client.logout().unwrap();
    assert_eq!(client.token(), None);
    assert!(matches!(
        client.get_scores().await,
        Err(Error::TokenUnavailable)
    ));

    client.close();
}

#[tokio::test]
async fn login_with_bad_credentials_fails_and_leaves_token_unset() {
    let addr = spawn_stub().await;
    let mut client = Client::new(config(addr)).unwrap();

    assert!(matches!(
        client.login(USERNAME, "wrong").await,
        Err(Error::Auth)
    ));
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn register_without_result_field_is_false() {
    let addr = spawn_stub().await;
    let client = Client::new(config(addr)).unwrap();

    // the stub answers `{}` for unknown credentials
    assert!(!client.register(USERNAME, "wrong").await.unwrap());
}

#[tokio::test]
async fn stale_token_surfaces_as_status_error() {
    let addr = spawn_stub().await;
    let mut client = Client::new(config(addr)).unwrap();

    client.set_token("expired");

    match client.get_scores().await {
        Err(Error::Status { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
        res => panic!("expected status error, got {res:?}"),
    }
}

#[tokio::test]
async fn zero_timeout_elapses_before_the_response() {
    let addr = spawn_stub().await;

    let config = ClientConfig::builder(format!("http://{addr}/"), APP)
        .timeout_secs(-1) // clamps to 0
        .user_agent(TEST_USER_AGENT)
        .build()
        .unwrap();

    let client = Client::new(config).unwrap();

    assert!(matches!(
        client.register(USERNAME, PASSWORD).await,
        Err(Error::Timeout)
    ));
}

#[test]
fn blocking_end_to_end() {
    let addr = spawn_stub_thread();
    let mut client = blocking::Client::new(config(addr)).unwrap();

    assert!(matches!(client.get_scores(), Err(Error::TokenUnavailable)));

    assert!(client.register(USERNAME, PASSWORD).unwrap());

    client.login(USERNAME, PASSWORD).unwrap();
    assert_eq!(client.token(), Some(TOKEN));

    assert!(client.get_scores().unwrap().is_empty());

    let score = client.get_score("sadam").unwrap();
    assert_eq!(score["sadam"], 36);

    assert!(matches!(
        client.get_score("your mom"),
        Err(Error::InvalidName(_))
    ));

    assert!(client.post_score("sadam", 36).unwrap());

    client.logout().unwrap();
    assert_eq!(client.token(), None);

    client.close();
}
