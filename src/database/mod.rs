use serde::Deserialize;
use snafu::ResultExt;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use url::Url;

/// Helper trait for executing arbitrary SurrealQL queries.
pub mod query;

mod error;

pub use error::*;
pub use query::{Bindings, Sql};

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

/// Handle to a connected SurrealDB instance. Cheap to clone.
pub type Database = Surreal<Any>;

const DEFAULT_PROJECT: &str = "bittube-io";

/// Opens a connection described by `config` and verifies that it is usable.
///
/// The connection is probed with an empty transaction that is cancelled right
/// away, so an unreachable or unauthorized backend fails here instead of on
/// the first request.
#[tracing::instrument(skip(config), fields(url = %config.url))]
pub async fn connect(config: &DatabaseConfig) -> Result<Database> {
    let database = surrealdb::engine::any::connect(config.url.as_str())
        .await
        .context(ConnectSnafu {
            url: config.url.clone(),
        })?;

    if let Some(credentials) = &config.credentials {
        database
            .signin(credentials.auth(&config.namespace, &config.database))
            .await
            .context(SignInSnafu {
                username: credentials.username.clone(),
            })?;
    }

    database
        .use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .context(SelectDatabaseSnafu {
            namespace: config.namespace.clone(),
            database: config.database.clone(),
        })?;

    probe(&database).await?;

    tracing::info!(
        namespace = %config.namespace,
        database = %config.database,
        "connected to the document store"
    );

    Ok(database)
}

/// Opens and immediately rolls back a no-op transaction.
pub async fn probe(database: &Database) -> Result<()> {
    database
        .sql("BEGIN TRANSACTION; CANCEL TRANSACTION;")
        .execute()
        .await
        .context(ProbeSnafu)?;
    Ok(())
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "surreal_url")]
    pub url: Url,
    #[serde(rename = "surreal_namespace", default = "default_project")]
    pub namespace: String,
    #[serde(rename = "surreal_database", default = "default_project")]
    pub database: String,
    #[serde(flatten)]
    pub credentials: Option<DatabaseCredentials>,
}

impl DatabaseConfig {
    /// Configuration for a private, in-process database.
    pub fn in_memory() -> Self {
        Self {
            url: Url::parse("mem://").expect("static url is valid"),
            namespace: default_project(),
            database: default_project(),
            credentials: None,
        }
    }
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseCredentials {
    #[serde(rename = "surreal_username")]
    pub username: String,
    #[serde(rename = "surreal_password")]
    pub password: String,
}

impl DatabaseCredentials {
    fn auth<'a>(
        &'a self, namespace: &'a str, database: &'a str,
    ) -> impl auth::Credentials<auth::Signin, auth::Jwt> + 'a {
        auth::Database {
            namespace,
            database,
            username: &self.username,
            password: &self.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_to_in_memory_database() {
        let database = connect(&DatabaseConfig::in_memory()).await;
        assert!(database.is_ok(), "{:?}", database.err());
    }

    #[tokio::test]
    async fn probe_succeeds_on_live_connection() {
        let database = connect(&DatabaseConfig::in_memory()).await.unwrap();
        assert!(probe(&database).await.is_ok());
    }

    #[tokio::test]
    async fn probe_failure_is_reported_as_probe_error() {
        let unconnected = Database::init();

        let err = probe(&unconnected).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Probe { .. }), "{err}");
        assert!(err.to_string().starts_with("connectivity probe failed"));
    }

    #[tokio::test]
    async fn unknown_scheme_fails_to_connect() {
        let config = DatabaseConfig {
            url: Url::parse("nope://localhost").unwrap(),
            ..DatabaseConfig::in_memory()
        };

        let result = connect(&config).await;
        assert!(matches!(result, Err(DatabaseError::Connect { .. })));
    }
}
