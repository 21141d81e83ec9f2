use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use axum_template::engine::Engine;
use derive_new::new;
use tera::Tera;

use crate::storage::MediaStorage;
use crate::store::VideoStore;

pub type AppEngine = Engine<Tera>;

/// Everything a request handler may need, handed to the router once.
#[derive(Clone, new)]
pub struct App {
    pub videos: Arc<dyn VideoStore>,
    pub media: Option<Arc<dyn MediaStorage>>,
    pub engine: AppEngine,
    pub key: Key,
}

impl App {
    pub fn videos(&self) -> &dyn VideoStore {
        self.videos.as_ref()
    }

    pub fn media(&self) -> Option<&dyn MediaStorage> {
        self.media.as_deref()
    }
}

impl FromRef<App> for AppEngine {
    fn from_ref(app: &App) -> Self {
        app.engine.clone()
    }
}

impl FromRef<App> for Key {
    fn from_ref(app: &App) -> Self {
        app.key.clone()
    }
}
