use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

mod error;
mod form;
mod state;
pub mod templates;
mod videos;

pub use error::*;
pub use form::*;
pub use state::*;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Every route of the site. Anything unrouted is looked up in `static_dir`.
pub fn create_router(app: App, static_dir: impl AsRef<Path>, max_upload_bytes: usize) -> Router {
    let uploads = ServiceBuilder::new()
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes));

    let catalog = Router::new()
        .route("/videos", get(videos::list).post(videos::create))
        .route("/videos/mine", get(videos::list_mine))
        .route("/videos/add", get(videos::add_form))
        .route("/videos/:id", get(videos::detail).post(videos::update))
        .route("/videos/:id/edit", get(videos::edit_form))
        .route("/videos/:id/delete", post(videos::delete))
        .layer(uploads);

    Router::new()
        .route("/", get(videos::root))
        .route("/_ah/health", get(videos::health))
        .route("/logout", post(videos::logout))
        .merge(catalog)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
