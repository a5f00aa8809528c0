//! Neo4j connection management and shared graph client.

use std::future::Future;
use std::time::Duration;

use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

use crate::cypher::CypherQuery;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Neo4j {operation} timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },

    #[error("Invalid {kind} identifier: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration for connecting to Neo4j.
///
/// Loaded from the `[neo4j]` config section or `ONTOKG__NEO4J__*`
/// environment variables.
#[derive(Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Database name; the server default when unset.
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,

    /// Bound on pool creation plus the connectivity ping.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Bound on each query, from submission to the last row.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_query_timeout() -> u64 {
    30
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
            connect_timeout_secs: default_connect_timeout(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

impl std::fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("fetch_size", &self.fetch_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .finish()
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Each query borrows its own pooled connection for the duration of that
/// query only. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    query_timeout: Duration,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    ///
    /// The driver pools lazily, so a `RETURN 1` ping is issued to surface an
    /// unreachable server or rejected credentials here rather than on first use.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size);
        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let graph = bounded("connect", connect_timeout, Graph::connect(neo_config))
            .await?
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        bounded(
            "connect",
            connect_timeout,
            graph.run(Query::new("RETURN 1".to_string())),
        )
        .await?
        .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self {
            graph,
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        })
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: CypherQuery) -> Result<Vec<neo4rs::Row>, GraphError> {
        tracing::debug!(cypher = %query.text(), "Executing Cypher query");
        let query = query.into_query();
        bounded("query", self.query_timeout, async {
            let mut stream = self.graph.execute(query).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next().await? {
                rows.push(row);
            }
            Ok::<_, GraphError>(rows)
        })
        .await?
    }

    /// Release the connection pool.
    pub fn close(self) {
        tracing::info!("Closing Neo4j connection pool");
        drop(self.graph);
    }
}

/// Run `fut` with an upper bound of `limit`.
async fn bounded<F: Future>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<F::Output, GraphError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| GraphError::Timeout {
            operation,
            seconds: limit.as_secs(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.user, "neo4j");
        assert!(config.password.is_empty());
        assert_eq!(config.database, None);
        assert_eq!(config.max_connections, 16);
        assert_eq!(config.fetch_size, 256);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.query_timeout_secs, 30);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: GraphConfig = serde_json::from_value(serde_json::json!({
            "uri": "neo4j+s://graph.example.com",
            "password": "s3cret",
            "query_timeout_secs": 5
        }))
        .unwrap();
        assert_eq!(config.uri, "neo4j+s://graph.example.com");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.query_timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = GraphConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_bounded_expires() {
        let result = bounded(
            "query",
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_secs(5)),
        )
        .await;
        assert!(matches!(
            result,
            Err(GraphError::Timeout {
                operation: "query",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_bounded_passes_output_through() {
        let result = bounded("query", Duration::from_secs(1), async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }
}
