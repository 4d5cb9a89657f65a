//! HTTP server implementation

use axum::{
    Router,
    routing::{get, post},
};
use dashboard_application::{RequestConfig, RunQueriesUseCase};
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tracing::info;

use super::handlers;

/// Shared application state
pub struct AppState {
    pub use_case: Arc<RunQueriesUseCase>,
    pub request: RequestConfig,
}

impl AppState {
    pub fn new(use_case: Arc<RunQueriesUseCase>, request: RequestConfig) -> Self {
        Self { use_case, request }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

/// Build the router: `/search`, `/health`, and static files for every other path.
///
/// Methods other than POST on `/search` are answered with 405.
pub fn router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/search", post(handlers::search))
        .route("/health", get(handlers::health))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .with_state(state)
}

/// Dashboard HTTP server
pub struct DashboardServer;

impl DashboardServer {
    /// Bind the listening socket
    pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })
    }

    /// Serve `app` on `listener` until `shutdown` is cancelled
    pub async fn serve(
        listener: TcpListener,
        app: Router,
        shutdown: CancellationToken,
    ) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            info!("Dashboard server listening on http://{}", addr);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;

        info!("Dashboard server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_application::{QueryError, QueryRegistry, QueryTask, fn_query};
    use dashboard_domain::{DateFormat, ResultSet};
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn constant(key: &'static str, value: i64, calls: Arc<AtomicUsize>) -> Arc<dyn QueryTask> {
        Arc::new(fn_query(move |_cancel, _range| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, QueryError>(ResultSet::single(key, value)) }
        }))
    }

    fn hydra_registry(calls: &Arc<AtomicUsize>) -> QueryRegistry {
        let name: Arc<dyn QueryTask> = {
            let calls = Arc::clone(calls);
            Arc::new(fn_query(move |_cancel, _range| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, QueryError>(ResultSet::single("Name", "Hydra")) }
            }))
        };
        QueryRegistry::from_tasks([
            ("Name", name),
            ("Heads", constant("Heads", 8, Arc::clone(calls))),
        ])
    }

    struct TestServer {
        addr: SocketAddr,
        shutdown: CancellationToken,
        _static_dir: tempfile::TempDir,
    }

    impl TestServer {
        async fn start(registry: QueryRegistry, request: RequestConfig) -> Self {
            let static_dir = tempfile::TempDir::new().unwrap();
            std::fs::write(static_dir.path().join("index.html"), "<h1>dashboard</h1>").unwrap();

            let use_case = Arc::new(RunQueriesUseCase::new(Arc::new(registry)));
            let app = router(Arc::new(AppState::new(use_case, request)), static_dir.path());

            let listener = DashboardServer::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let shutdown = CancellationToken::new();
            tokio::spawn(DashboardServer::serve(listener, app, shutdown.clone()));

            Self {
                addr,
                shutdown,
                _static_dir: static_dir,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("http://{}{}", self.addr, path)
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            self.shutdown.cancel();
        }
    }

    const JANUARY: &str = r#"{"begin": "20240101", "end": "20240131"}"#;

    #[tokio::test]
    async fn test_search_json() {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::start(hydra_registry(&calls), RequestConfig::default()).await;

        let response = reqwest::Client::new()
            .post(server.url("/search"))
            .header("Accept", "application/json")
            .body(JANUARY)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        assert_eq!(response.text().await.unwrap(), r#"{"Heads":8,"Name":"Hydra"}"#);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_text_dump_without_accept() {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::start(hydra_registry(&calls), RequestConfig::default()).await;

        let response = reqwest::Client::new()
            .post(server.url("/search"))
            .body(JANUARY)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert!(
            response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
        assert_eq!(
            response.text().await.unwrap(),
            "ResultSet {\n    Heads: 8,\n    Name: \"Hydra\",\n}\n"
        );
    }

    #[tokio::test]
    async fn test_search_epoch_format() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = RequestConfig::default().with_date_format(DateFormat::Epoch);
        let server = TestServer::start(hydra_registry(&calls), request).await;

        let response = reqwest::Client::new()
            .post(server.url("/search"))
            .header("Accept", "application/json")
            .body(r#"{"Begin": 1704067200, "End": 1706659200}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_before_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::start(hydra_registry(&calls), RequestConfig::default()).await;
        let client = reqwest::Client::new();

        for body in ["", "not json", r#"{"begin": "20240101"}"#, r#"{"begin": "2024-01-01", "end": "20240131"}"#] {
            let response = client
                .post(server.url("/search"))
                .body(body)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 400, "body: {:?}", body);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_rejects_other_methods() {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::start(hydra_registry(&calls), RequestConfig::default()).await;

        let response = reqwest::get(server.url("/search")).await.unwrap();

        assert_eq!(response.status(), 405);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health_lists_queries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::start(hydra_registry(&calls), RequestConfig::default()).await;

        let body: serde_json::Value = reqwest::get(server.url("/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["count"], 2);
        assert_eq!(body["queries"], serde_json::json!(["Heads", "Name"]));
    }

    #[tokio::test]
    async fn test_static_files_served_from_root() {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::start(hydra_registry(&calls), RequestConfig::default()).await;

        let index = reqwest::get(server.url("/")).await.unwrap();
        assert_eq!(index.status(), 200);
        assert_eq!(index.text().await.unwrap(), "<h1>dashboard</h1>");

        let missing = reqwest::get(server.url("/missing.js")).await.unwrap();
        assert_eq!(missing.status(), 404);
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_results() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stuck: Arc<dyn QueryTask> = Arc::new(fn_query(|_cancel, _range| async {
            std::future::pending::<Result<ResultSet, QueryError>>().await
        }));
        let registry = QueryRegistry::from_tasks([
            ("Heads", constant("Heads", 8, Arc::clone(&calls))),
            ("stuck", stuck),
        ]);
        let request = RequestConfig::default().with_timeout(Duration::from_millis(200));
        let server = TestServer::start(registry, request).await;

        let response = tokio::time::timeout(
            Duration::from_secs(5),
            reqwest::Client::new()
                .post(server.url("/search"))
                .header("Accept", "application/json")
                .body(JANUARY)
                .send(),
        )
        .await
        .expect("deadline should end the request")
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), r#"{"Heads":8}"#);
    }
}
