use snafu::{Location, Snafu};

use crate::database::DatabaseQueryError;
use crate::model::VideoId;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("videostore: no video with id {id}"))]
    NotFound {
        id: VideoId,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("videostore: could not {operation}: {source}"))]
    StoreUnavailable {
        operation: &'static str,
        source: DatabaseQueryError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("videostore: could not {operation}: record key `{key}` is not an integer id"))]
    MalformedKey {
        operation: &'static str,
        key: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Whether the backend, rather than the request, is at fault.
    pub fn is_unavailable(&self) -> bool {
        !self.is_not_found()
    }
}
