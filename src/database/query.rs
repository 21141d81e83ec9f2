use derive_new::new;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use surrealdb::opt::QueryResult;

use super::*;

/// Runs raw SurrealQL against a [Database]. Parameters are bound with
/// [Bindings::bind] from any serializable value.
///
/// # Example
/// ```ignore
/// let videos: Vec<Video> = database.sql("SELECT * FROM Video WHERE CreatedByID = $user")
///     .bind(("user", "anonymous"))
///     .fetch_first()
///     .await?;
/// ```
pub trait Sql<'a> {
    fn sql(&'a self, query: &str) -> Bindings<'a>;
}

impl<'a> Sql<'a> for Database {
    fn sql(&'a self, query: &str) -> Bindings<'a> {
        Bindings::new(self.query(query))
    }
}

#[derive(Debug, new)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, Any>,
}

impl Bindings<'_> {
    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        let query = self.query;
        self.query = query.bind(params);
        self
    }

    /// Execute the query and return a [surrealdb::Response], failing if any statement failed.
    pub async fn execute(self) -> Result<surrealdb::Response, DatabaseQueryError> {
        let response = self
            .query
            .await
            .context(MalformedQuerySnafu)?
            .check()
            .context(MalformedQuerySnafu)?;
        tracing::trace!(?response, "executed query");
        Ok(response)
    }

    /// Execute the query and return the first result as a deserialized value.
    pub async fn fetch_first<T: DeserializeOwned>(self) -> Result<T, DatabaseQueryError>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        let result = statements.take::<T>(0).context(DeserializeSnafu)?;
        Ok(result)
    }
}
