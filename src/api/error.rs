use std::num::ParseIntError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use snafu::Snafu;

use super::form::FormError;
use crate::store::StoreError;

/// Anything that stops a request from completing.
///
/// Every variant is reported as `500 Internal Server Error` with its message
/// as the body, not-found lookups included.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AppError {
    #[snafu(display("could not list videos: {source}"))]
    ListVideos { source: StoreError },

    #[snafu(display("bad video id `{id}`: {source}"))]
    BadVideoId { id: String, source: ParseIntError },

    #[snafu(display("could not find video: {source}"))]
    FindVideo { source: StoreError },

    #[snafu(display("could not parse video from form: {source}"))]
    ParseForm { source: FormError },

    #[snafu(display("could not save video: {source}"))]
    SaveVideo { source: StoreError },

    #[snafu(display("could not update video: {source}"))]
    UpdateVideo { source: StoreError },

    #[snafu(display("could not delete video: {source}"))]
    DeleteVideo { source: StoreError },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        tracing::error!(status = status.as_u16(), %message, error = ?self, "handler error");

        (status, message).into_response()
    }
}
