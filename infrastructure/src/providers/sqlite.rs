//! SQLite data provider
//!
//! Runs named scalar queries against a local database. Every query receives
//! the request's range as two positional parameters:
//!
//! - `?1`: begin, formatted `YYYY-MM-DD`
//! - `?2`: end, formatted `YYYY-MM-DD`
//!
//! The first column of the first row becomes the task's only result, keyed
//! by the query name. Each invocation opens its own read-only connection on
//! the blocking pool, so sibling queries run in parallel and a cancelled
//! statement is stopped without holding up the next request.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashboard_application::{Provider, ProviderError, QueryError, QueryList, QueryTask};
use dashboard_domain::{DateRange, ResultSet, ResultValue};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, ErrorCode, OpenFlags, ToSql};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::FileSqliteProviderConfig;

const BIND_DATE_FORMAT: &str = "%Y-%m-%d";

/// VM instructions between cancellation checks of a running statement
const CANCEL_CHECK_OPS: i32 = 1000;

/// Provider backed by a SQLite database file
pub struct SqliteProvider {
    id: String,
    path: Arc<PathBuf>,
    queries: BTreeMap<String, String>,
    logged_in: AtomicBool,
}

impl SqliteProvider {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: Arc::new(path.into()),
            queries: BTreeMap::new(),
            logged_in: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &FileSqliteProviderConfig) -> Self {
        let mut provider = Self::new(config.id.clone(), config.path.clone());
        provider.queries = config.queries.clone();
        provider
    }

    /// Add a named query
    pub fn with_query(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.queries.insert(name.into(), sql.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_read_only(path: &Path) -> rusqlite::Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
}

#[async_trait]
impl Provider for SqliteProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn login(&self) -> Result<(), ProviderError> {
        if self.logged_in.load(Ordering::Acquire) {
            return Ok(());
        }

        info!(provider = %self.id, "Logging into {}", self.path.display());
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || open_read_only(&path).map(drop))
            .await
            .map_err(|e| ProviderError::LoginFailed(e.to_string()))?
            .map_err(|e| {
                ProviderError::LoginFailed(format!("{}: {}", self.path.display(), e))
            })?;

        self.logged_in.store(true, Ordering::Release);
        Ok(())
    }

    async fn register(&self) -> Result<QueryList, ProviderError> {
        if !self.logged_in.load(Ordering::Acquire) {
            return Err(ProviderError::NotLoggedIn);
        }

        let path = Arc::clone(&self.path);
        let queries = self.queries.clone();
        tokio::task::spawn_blocking(move || prepare_all(&path, &queries))
            .await
            .map_err(|e| ProviderError::RegistrationFailed(e.to_string()))??;

        let mut list = QueryList::new();
        for (name, sql) in &self.queries {
            debug!(provider = %self.id, query = %name, "Registering query");
            let task: Arc<dyn QueryTask> = Arc::new(SqliteQuery {
                name: name.clone(),
                sql: sql.clone(),
                path: Arc::clone(&self.path),
            });
            list.insert(name.clone(), task);
        }
        Ok(list)
    }
}

/// Compile every statement once so SQL errors surface at startup.
fn prepare_all(path: &Path, queries: &BTreeMap<String, String>) -> Result<(), ProviderError> {
    let connection = open_read_only(path)
        .map_err(|e| ProviderError::RegistrationFailed(format!("{}: {}", path.display(), e)))?;

    for (name, sql) in queries {
        let statement = connection
            .prepare(sql)
            .map_err(|e| ProviderError::RegistrationFailed(format!("{}: {}", name, e)))?;
        if statement.parameter_count() > 2 {
            return Err(ProviderError::RegistrationFailed(format!(
                "{}: expects {} parameters, at most 2 (begin, end) are bound",
                name,
                statement.parameter_count()
            )));
        }
    }
    Ok(())
}

/// One registered SQL query
struct SqliteQuery {
    name: String,
    sql: String,
    path: Arc<PathBuf>,
}

#[async_trait]
impl QueryTask for SqliteQuery {
    async fn execute(
        &self,
        cancel: &CancellationToken,
        range: &DateRange,
    ) -> Result<ResultSet, QueryError> {
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }

        let path = Arc::clone(&self.path);
        let sql = self.sql.clone();
        let begin = range.begin().format(BIND_DATE_FORMAT).to_string();
        let end = range.end().format(BIND_DATE_FORMAT).to_string();
        let stop = cancel.clone();

        let handle =
            tokio::task::spawn_blocking(move || run_query(&path, &sql, &begin, &end, stop));

        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(QueryError::Cancelled),
            joined = handle => joined.map_err(|e| QueryError::Other(e.to_string()))??,
        };

        Ok(ResultSet::single(self.name.clone(), value))
    }
}

/// Open a private connection and evaluate `sql` on it, aborting the
/// statement from inside SQLite once `cancel` fires.
fn run_query(
    path: &Path,
    sql: &str,
    begin: &str,
    end: &str,
    cancel: CancellationToken,
) -> Result<ResultValue, QueryError> {
    let connection = open_read_only(path).map_err(backend)?;
    // Checked from within sqlite3_step, so a cancel that lands before the
    // first step still stops the statement.
    connection.progress_handler(CANCEL_CHECK_OPS, Some(move || cancel.is_cancelled()));
    query_scalar(&connection, sql, begin, end)
}

fn backend(e: rusqlite::Error) -> QueryError {
    match e.sqlite_error_code() {
        Some(ErrorCode::OperationInterrupted) => QueryError::Cancelled,
        _ => QueryError::Backend(e.to_string()),
    }
}

fn query_scalar(
    connection: &Connection,
    sql: &str,
    begin: &str,
    end: &str,
) -> Result<ResultValue, QueryError> {
    let mut statement = connection.prepare(sql).map_err(backend)?;
    let params: Vec<&dyn ToSql> = [&begin as &dyn ToSql, &end as &dyn ToSql]
        .into_iter()
        .take(statement.parameter_count())
        .collect();

    let mut rows = statement.query(params.as_slice()).map_err(backend)?;
    let row = rows.next().map_err(backend)?.ok_or(QueryError::NoRows)?;
    let value: SqlValue = row.get(0).map_err(backend)?;

    match value {
        SqlValue::Integer(i) => Ok(ResultValue::Integer(i)),
        SqlValue::Real(f) => Ok(ResultValue::Float(f)),
        SqlValue::Text(s) => Ok(ResultValue::Text(s)),
        SqlValue::Null => Err(QueryError::UnsupportedValue("NULL".into())),
        SqlValue::Blob(b) => Err(QueryError::UnsupportedValue(format!(
            "blob of {} bytes",
            b.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn seed_database() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("articles.db");
        let connection = Connection::open(&path).unwrap();
        connection
            .execute_batch(
                "CREATE TABLE articles (id INTEGER PRIMARY KEY, title TEXT, updated_at TEXT, score REAL);
                 INSERT INTO articles (title, updated_at, score) VALUES
                   ('a', '2024-01-05', 1.5),
                   ('b', '2024-01-20', 2.5),
                   ('c', '2024-03-01', 4.0);",
            )
            .unwrap();
        (dir, path)
    }

    fn january() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    async fn registered(provider: &SqliteProvider) -> QueryList {
        provider.login().await.unwrap();
        provider.register().await.unwrap()
    }

    #[tokio::test]
    async fn test_count_query_binds_range() {
        let (_dir, path) = seed_database();
        let provider = SqliteProvider::new("articles", &path).with_query(
            "simpleQuery",
            "SELECT COUNT(*) FROM articles WHERE updated_at > ?1 AND updated_at < ?2",
        );

        let queries = registered(&provider).await;
        let result = queries["simpleQuery"]
            .execute(&CancellationToken::new(), &january())
            .await
            .unwrap();

        assert_eq!(result, ResultSet::single("simpleQuery", 2));
    }

    #[tokio::test]
    async fn test_value_kinds() {
        let (_dir, path) = seed_database();
        let provider = SqliteProvider::new("articles", &path)
            .with_query("latest", "SELECT MAX(title) FROM articles")
            .with_query("avg", "SELECT AVG(score) FROM articles WHERE updated_at >= ?1")
            .with_query("nothing", "SELECT title FROM articles WHERE 0")
            .with_query("null", "SELECT NULL");

        let queries = registered(&provider).await;
        let token = CancellationToken::new();

        let latest = queries["latest"].execute(&token, &january()).await.unwrap();
        assert_eq!(latest.get("latest"), Some(&ResultValue::from("c")));

        let avg = queries["avg"].execute(&token, &january()).await.unwrap();
        assert!(matches!(avg.get("avg"), Some(ResultValue::Float(_))));

        let nothing = queries["nothing"].execute(&token, &january()).await;
        assert!(matches!(nothing, Err(QueryError::NoRows)));

        let null = queries["null"].execute(&token, &january()).await;
        assert!(matches!(null, Err(QueryError::UnsupportedValue(_))));
    }

    #[tokio::test]
    async fn test_login_fails_for_missing_database() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new("missing", dir.path().join("nope.db"));

        let err = provider.login().await.unwrap_err();
        assert!(matches!(err, ProviderError::LoginFailed(_)));
    }

    #[tokio::test]
    async fn test_register_requires_login() {
        let (_dir, path) = seed_database();
        let provider = SqliteProvider::new("articles", &path);

        let Err(err) = provider.register().await else {
            panic!("register must fail before login");
        };
        assert!(matches!(err, ProviderError::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_sql() {
        let (_dir, path) = seed_database();
        let provider =
            SqliteProvider::new("articles", &path).with_query("broken", "SELEKT * FROM articles");
        provider.login().await.unwrap();

        let Err(err) = provider.register().await else {
            panic!("invalid SQL must fail registration");
        };
        assert!(err.to_string().contains("broken"));
    }

    #[tokio::test]
    async fn test_register_rejects_extra_parameters() {
        let (_dir, path) = seed_database();
        let provider =
            SqliteProvider::new("articles", &path).with_query("three", "SELECT ?1, ?2, ?3");
        provider.login().await.unwrap();

        assert!(provider.register().await.is_err());
    }

    #[tokio::test]
    async fn test_cancelled_scope_short_circuits() {
        let (_dir, path) = seed_database();
        let provider =
            SqliteProvider::new("articles", &path).with_query("count", "SELECT COUNT(*) FROM articles");
        let queries = registered(&provider).await;
        let token = CancellationToken::new();
        token.cancel();

        let result = queries["count"].execute(&token, &january()).await;
        assert!(matches!(result, Err(QueryError::Cancelled)));
    }

    /// Counts far enough to run for many seconds unless stopped
    const SLOW_SQL: &str = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 2000000000) SELECT COUNT(*) FROM c";

    fn spawn_query(
        queries: &QueryList,
        name: &str,
        token: &CancellationToken,
    ) -> tokio::task::JoinHandle<Result<ResultSet, QueryError>> {
        let task = Arc::clone(&queries[name]);
        let token = token.clone();
        tokio::spawn(async move { task.execute(&token, &january()).await })
    }

    #[tokio::test]
    async fn test_sibling_queries_run_in_parallel() {
        let (_dir, path) = seed_database();
        let provider = SqliteProvider::new("articles", &path)
            .with_query("slow", SLOW_SQL)
            .with_query("count", "SELECT COUNT(*) FROM articles");
        let queries = registered(&provider).await;

        let slow_token = CancellationToken::new();
        let slow = spawn_query(&queries, "slow", &slow_token);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let count = tokio::time::timeout(
            Duration::from_secs(2),
            queries["count"].execute(&CancellationToken::new(), &january()),
        )
        .await
        .expect("count must not wait for the slow query")
        .unwrap();
        assert_eq!(count, ResultSet::single("count", 3));
        assert!(!slow.is_finished());

        slow_token.cancel();
        let slow = tokio::time::timeout(Duration::from_secs(2), slow)
            .await
            .expect("cancel must end the slow query")
            .unwrap();
        assert!(matches!(slow, Err(QueryError::Cancelled)));
    }

    #[tokio::test]
    async fn test_next_request_not_delayed_by_cancelled_query() {
        let (_dir, path) = seed_database();
        let provider = SqliteProvider::new("articles", &path)
            .with_query("slow", SLOW_SQL)
            .with_query("count", "SELECT COUNT(*) FROM articles");
        let queries = registered(&provider).await;

        let first = CancellationToken::new();
        let slow = spawn_query(&queries, "slow", &first);
        tokio::time::sleep(Duration::from_millis(50)).await;
        first.cancel();
        assert!(matches!(slow.await.unwrap(), Err(QueryError::Cancelled)));

        for name in ["count", "slow"] {
            let second = CancellationToken::new();
            let handle = spawn_query(&queries, name, &second);
            if name == "slow" {
                tokio::time::sleep(Duration::from_millis(50)).await;
                second.cancel();
            }
            let result = tokio::time::timeout(Duration::from_secs(2), handle)
                .await
                .expect("follow-up query must not queue behind the cancelled one")
                .unwrap();
            match name {
                "count" => assert_eq!(result.unwrap(), ResultSet::single("count", 3)),
                _ => assert!(matches!(result, Err(QueryError::Cancelled))),
            }
        }
    }

    #[test]
    fn test_cancel_stops_running_statement() {
        let (_dir, path) = seed_database();
        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                token.cancel();
            })
        };

        let started = Instant::now();
        let result = run_query(&path, SLOW_SQL, "2024-01-01", "2024-01-31", token);
        canceller.join().unwrap();

        assert!(matches!(result, Err(QueryError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_cancel_before_first_step_stops_statement() {
        let (_dir, path) = seed_database();
        let token = CancellationToken::new();
        token.cancel();

        let result = run_query(&path, SLOW_SQL, "2024-01-01", "2024-01-31", token);
        assert!(matches!(result, Err(QueryError::Cancelled)));
    }

    #[tokio::test]
    async fn test_from_config() {
        let (_dir, path) = seed_database();
        let config = FileSqliteProviderConfig {
            id: "cfg".to_string(),
            path: path.clone(),
            queries: BTreeMap::from([("count".to_string(), "SELECT COUNT(*) FROM articles".to_string())]),
        };
        let provider = SqliteProvider::from_config(&config);

        assert_eq!(provider.id(), "cfg");
        assert_eq!(provider.path(), path.as_path());
        let queries = registered(&provider).await;
        assert!(queries.contains_key("count"));
    }
}
