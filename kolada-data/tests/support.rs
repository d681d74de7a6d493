//! Canned HTTP server for exercising `HttpGateway` end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::runtime::Runtime;

/// Path prefix the server mounts the API under.
const API_ROOT: &str = "/v2";

#[derive(Default)]
struct Routes {
    responses: HashMap<String, (StatusCode, String)>,
    hits: Vec<String>,
}

type SharedRoutes = Arc<Mutex<Routes>>;

/// Local server answering registered paths with canned bodies.
///
/// The server runs on its own multi-threaded runtime so that the blocking
/// gateway under test can be driven from a plain test thread.
pub struct CannedServer {
    base_url: String,
    routes: SharedRoutes,
    _runtime: Runtime,
}

impl CannedServer {
    /// Bind to an ephemeral port and start serving.
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("test runtime should build");
        let routes = SharedRoutes::default();
        let app = Router::new()
            .fallback(respond)
            .with_state(Arc::clone(&routes));
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind listener");
        let addr = listener.local_addr().expect("listener addr");
        runtime.spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("serve canned responses");
        });
        Self {
            base_url: format!("http://{addr}{API_ROOT}"),
            routes,
            _runtime: runtime,
        }
    }

    /// API root to hand to the gateway.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `suffix` below the API root.
    pub fn url(&self, suffix: &str) -> String {
        format!("{}/{suffix}", self.base_url)
    }

    /// Answer `suffix` with `body` and status 200.
    pub fn respond(&self, suffix: &str, body: &Value) -> &Self {
        self.respond_raw(suffix, 200, &body.to_string())
    }

    /// Answer `suffix` with a raw body and status.
    pub fn respond_raw(&self, suffix: &str, status: u16, body: &str) -> &Self {
        let code = StatusCode::from_u16(status).expect("valid status code");
        self.routes
            .lock()
            .expect("routes lock")
            .responses
            .insert(format!("{API_ROOT}/{suffix}"), (code, body.to_owned()));
        self
    }

    /// Paths requested so far, relative to the API root, in request order.
    pub fn hits(&self) -> Vec<String> {
        self.routes
            .lock()
            .expect("routes lock")
            .hits
            .iter()
            .map(|path| {
                path.strip_prefix(&format!("{API_ROOT}/"))
                    .unwrap_or(path.as_str())
                    .to_owned()
            })
            .collect()
    }
}

async fn respond(State(routes): State<SharedRoutes>, uri: Uri) -> Response {
    let key = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), ToString::to_string);
    let mut guard = routes.lock().expect("routes lock");
    guard.hits.push(key.clone());
    match guard.responses.get(&key) {
        Some((status, body)) => (
            *status,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
