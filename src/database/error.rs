use snafu::{Location, Snafu};
use url::Url;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{url}` at {location}: {source}"))]
    Connect {
        url: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot sign in to the database as `{username}`: {source}"))]
    SignIn {
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot select database [{namespace}/{database}]: {source}"))]
    SelectDatabase {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("connectivity probe failed: {source}"))]
    Probe {
        source: DatabaseQueryError,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DatabaseQueryError {
    #[snafu(display("failed to query the database: {source}"))]
    MalformedQuery { source: surrealdb::Error },

    #[snafu(display("failed to deserialize the database response: {source}"))]
    Deserialize { source: surrealdb::Error },
}
