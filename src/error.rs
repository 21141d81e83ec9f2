use std::net::SocketAddr;

use snafu::{Location, Snafu};

use crate::config::SESSION_SECRET_LEN;
use crate::database::DatabaseError;
use crate::storage::StorageError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApplicationError {
    /// could not read the configuration from the environment
    ConfigLoad {
        source: envy::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not reach the video database
    ConnectDatabase {
        source: DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not set up the media bucket
    ConfigureStorage {
        source: StorageError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "SESSION_SECRET must be at least {SESSION_SECRET_LEN} bytes long, got {length}"
    ))]
    SessionSecret {
        length: usize,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not load the page templates
    Templates {
        source: tera::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not serve the application
    WebServer {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not bind to the given address, check if it's already in use
    BindAddress {
        address: SocketAddr,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not initialize the logger
    InitializeLogger {
        source: tracing::subscriber::SetGlobalDefaultError,
        #[snafu(implicit)]
        location: Location,
    },
}
