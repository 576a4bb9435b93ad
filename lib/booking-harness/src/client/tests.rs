use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, Uri};
use axum::routing::{any, get};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::*;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Echo {
    method: String,
    path: String,
    query: Option<String>,
    cookie: Option<String>,
    body: String,
}

async fn echo(
    method: axum::http::Method,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> axum::Json<Echo> {
    let cookie = headers
        .get(http::header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    axum::Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        cookie,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> (axum::http::StatusCode, String) {
    let status = axum::http::StatusCode::from_u16(code)
        .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    (status, format!("status {code}"))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_millis(300)).await;
    "done"
}

struct EchoServer {
    port: u16,
    handle: JoinHandle<()>,
}

impl EchoServer {
    async fn start() -> Self {
        let app = Router::new()
            .route("/echo", any(echo))
            .route("/echo/{*rest}", any(echo))
            .route("/status/{code}", any(status))
            .route("/slow", get(slow));
        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { port, handle }
    }

    fn client(&self) -> RestClient {
        RestClient::builder()
            .with_port(self.port)
            .build()
            .expect("client")
    }
}

impl Drop for EchoServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn load_everything(client: &mut RestClient) -> &mut RestClient {
    client
        .with_token("abc123")
        .with_path_param("id", 1)
        .with_query_param("firstname", "Jim")
        .with_body(r#"{"firstname":"Jim"}"#)
}

#[tokio::test]
async fn should_reset_state_after_success() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let echo: Echo = load_everything(&mut client)
        .execute_as(Method::PUT, "/echo/{id}", StatusCode::OK)
        .await
        .expect("echo");
    assert_eq!(echo.path, "/echo/1");
    assert_eq!(echo.cookie.as_deref(), Some("token=abc123"));
    assert!(client.request_state().is_empty());

    let echo: Echo = client
        .get("/echo")
        .await
        .expect("echo")
        .as_json()
        .expect("decoded");
    assert_eq!(
        echo,
        Echo {
            method: "GET".to_string(),
            path: "/echo".to_string(),
            query: None,
            cookie: None,
            body: String::new(),
        }
    );
}

#[tokio::test]
async fn should_reset_state_after_unexpected_status() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let error = load_everything(&mut client)
        .with_path_param("code", 404)
        .get("/status/{code}")
        .await
        .expect_err("unexpected status");

    insta::assert_snapshot!(
        error.to_string().replace(&format!(":{}/", server.port), ":PORT/"),
        @"GET http://127.0.0.1:PORT/status/404?firstname=Jim: expected status 200, got 404 Not Found: status 404"
    );
    assert_eq!(error.actual_status(), Some(StatusCode::NOT_FOUND));
    assert!(client.request_state().is_empty());
}

#[tokio::test]
async fn should_reset_state_after_transport_error() {
    let mut client = RestClient::builder()
        .with_port(1)
        .with_request_timeout(Duration::from_secs(2))
        .build()
        .expect("client");

    let error = load_everything(&mut client)
        .get("/booking/{id}")
        .await
        .expect_err("nothing listens on port 1");

    assert!(matches!(error, ApiClientError::TransportError(_)));
    assert!(client.request_state().is_empty());
}

#[tokio::test]
async fn should_reset_state_after_invalid_argument() {
    let server = EchoServer::start().await;
    let mut client = server.client();
    let null_body: Option<Echo> = None;

    let error = client
        .with_token("abc123")
        .with_query_param("firstname", "Jim")
        .with_json_body(&null_body)
        .expect_err("null body");

    assert!(matches!(error, ApiClientError::InvalidArgument { .. }));
    assert!(client.request_state().is_empty());
}

#[tokio::test]
async fn should_reset_state_after_unresolved_path() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let error = client
        .with_query_param("firstname", "Jim")
        .get("/echo/{id}")
        .await
        .expect_err("missing id");

    assert!(matches!(error, ApiClientError::PathUnresolved { .. }));
    assert!(client.request_state().is_empty());
}

#[test]
fn should_reset_state_when_call_is_dropped() {
    let mut client = RestClient::builder().build().expect("client");

    let call = load_everything(&mut client).delete("/booking/{id}");
    drop(call);

    assert!(client.request_state().is_empty());
}

#[test]
fn should_reset_state_when_execute_future_is_dropped() {
    let mut client = RestClient::builder().build().expect("client");

    let future =
        load_everything(&mut client).execute(Method::DELETE, "/booking/{id}", StatusCode::CREATED);
    drop(future);

    assert!(client.request_state().is_empty());
}

#[tokio::test]
async fn should_substitute_last_path_binding() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let echo: Echo = client
        .with_path_param("id", "A")
        .with_path_param("id", "B")
        .execute_as(Method::GET, "/echo/{id}", StatusCode::OK)
        .await
        .expect("echo");

    assert_eq!(echo.path, "/echo/B");
}

#[tokio::test]
async fn should_bind_several_path_params() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let echo: Echo = client
        .with_path_params([("kind", "booking"), ("id", "12")])
        .execute_as(Method::GET, "/echo/{kind}/{id}", StatusCode::OK)
        .await
        .expect("echo");

    assert_eq!(echo.path, "/echo/booking/12");
}

#[tokio::test]
async fn should_send_repeated_query_params() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let echo: Echo = client
        .with_query_param("firstname", "Jim")
        .with_query_param("firstname", "Sally")
        .execute_as(Method::GET, "/echo", StatusCode::OK)
        .await
        .expect("echo");

    assert_eq!(echo.query.as_deref(), Some("firstname=Jim&firstname=Sally"));
}

#[tokio::test]
async fn should_report_slow_responses() {
    let server = EchoServer::start().await;
    let mut client = RestClient::builder()
        .with_port(server.port)
        .with_max_response_time(Some(Duration::from_millis(50)))
        .build()
        .expect("client");

    let error = client.get("/slow").await.expect_err("too slow");
    assert!(matches!(error, ApiClientError::SlowResponse { .. }));
    assert_eq!(error.actual_status(), Some(StatusCode::OK));

    let result = client.get("/slow").without_time_limit().await.expect("no limit");
    assert_eq!(result.as_text(), "done");
}

#[tokio::test]
async fn should_report_decode_errors() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let error = client
        .with_path_param("code", 200)
        .execute_as::<Echo>(Method::GET, "/status/{code}", StatusCode::OK)
        .await
        .expect_err("not json");

    match error {
        ApiClientError::DecodeError { body, .. } => assert_eq!(body, "status 200"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn should_send_without_status_check() {
    let server = EchoServer::start().await;
    let mut client = server.client();

    let result = client
        .with_path_param("code", 405)
        .send(Method::DELETE, "/status/{code}")
        .await
        .expect("any status");

    assert_eq!(result.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn should_fork_with_empty_state() {
    let server = EchoServer::start().await;
    let mut client = server.client();
    client.with_token("abc123");

    let mut fork = client.fork();

    assert!(fork.request_state().is_empty());
    assert_eq!(fork.base_uri(), client.base_uri());
    assert!(client.request_state().has_token());
    let echo: Echo = fork
        .execute_as(Method::GET, "/echo", StatusCode::OK)
        .await
        .expect("echo");
    assert_eq!(echo.cookie, None);
}
