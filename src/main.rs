use std::sync::Arc;

use bittube::api::{self, App};
use bittube::config::Config;
use bittube::error::{
    ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, TemplatesSnafu, WebServerSnafu,
};
use bittube::logger;
use bittube::store::{DocumentStore, VideoStore};
use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let store = DocumentStore::connect(&config.database)
        .await
        .context(ConnectDatabaseSnafu)?;
    let videos: Arc<dyn VideoStore> = Arc::new(store);

    let media = config.storage.media()?;
    if media.is_none() {
        tracing::warn!("media storage is disabled, file uploads will be rejected");
    }

    let key = config.session.key()?;
    let engine = api::templates::engine().context(TemplatesSnafu)?;

    let app = App::new(videos.clone(), media, engine, key);
    let router = api::create_router(app, &config.static_dir, config.max_upload_bytes);

    if config.oauth.is_enabled() {
        tracing::info!(
            redirect_url = config.oauth.redirect_url(),
            scopes = ?config.oauth.scopes(),
            "oauth sign-in configured"
        );
    } else {
        tracing::info!("oauth sign-in not configured, videos are added anonymously");
    }

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!(address = %config.host, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(WebServerSnafu)?;

    videos.close().await;
    tracing::info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "could not listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
}
