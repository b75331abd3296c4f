//! In-process stand-in for the qBittorrent WebUI.
//!
//! Binds to a random local port, records every request it receives and
//! answers from a table of canned responses keyed by path. Unknown paths get
//! `200 Ok.` like most mutating WebUI endpoints.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: String,
}

#[derive(Default)]
struct Inner {
    requests: Vec<Recorded>,
    routes: HashMap<String, Canned>,
}

type Shared = Arc<Mutex<Inner>>;

pub struct MockWebUi {
    pub url: String,
    state: Shared,
}

impl MockWebUi {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state: Shared = Arc::default();

        let app = Router::new().fallback(record).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Canned answer for `/api/v2/{endpoint}`
    pub async fn respond(&self, endpoint: &str, status: u16, body: &str) {
        self.respond_with_headers(endpoint, status, &[], body).await;
    }

    pub async fn respond_with_headers(
        &self,
        endpoint: &str,
        status: u16,
        headers: &[(&str, &str)],
        body: &str,
    ) {
        let canned = Canned {
            status: StatusCode::from_u16(status).unwrap(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        };
        self.state
            .lock()
            .await
            .routes
            .insert(format!("/api/v2/{endpoint}"), canned);
    }

    /// Login endpoint handing out `SID=<sid>`
    pub async fn accept_login(&self, sid: &str) {
        let cookie = format!("SID={sid}; HttpOnly; path=/");
        self.respond_with_headers("auth/login", 200, &[("set-cookie", &cookie)], "Ok.")
            .await;
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.state.lock().await.requests.clone()
    }

    pub async fn last_request(&self) -> Recorded {
        self.requests().await.pop().expect("no request recorded")
    }
}

async fn record(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut inner = state.lock().await;
    inner.requests.push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match inner.routes.get(uri.path()) {
        Some(canned) => {
            let mut response = Response::builder().status(canned.status);
            for (k, v) in &canned.headers {
                response = response.header(k.as_str(), v.as_str());
            }
            response.body(Body::from(canned.body.clone())).unwrap()
        }
        None => (StatusCode::OK, "Ok.").into_response(),
    }
}

/// Route `tracing` output through the test harness when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
