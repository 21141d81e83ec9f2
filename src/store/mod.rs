//! Persistence contract for the video catalog.
//!
//! Handlers only ever see `Arc<dyn VideoStore>`; which backend sits behind it
//! is decided once at startup.

use async_trait::async_trait;

use crate::model::{Video, VideoId};

mod document;
mod error;

pub use document::DocumentStore;
pub use error::*;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Access to a database of videos, safe to share between requests.
///
/// The store is the only authority on [VideoId]s: whatever id a caller puts
/// on a new [Video] is ignored, and ids read back are always taken from the
/// storage key.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Returns every video, ordered by title.
    async fn list_videos(&self) -> Result<Vec<Video>>;

    /// Returns the videos created by `user_id`, ordered by title.
    ///
    /// An empty `user_id` applies no filter at all.
    async fn list_videos_created_by(&self, user_id: &str) -> Result<Vec<Video>>;

    /// Retrieves a video by its id.
    async fn get_video(&self, id: VideoId) -> Result<Video>;

    /// Saves `video` under a freshly assigned id and returns that id.
    async fn add_video(&self, video: &Video) -> Result<VideoId>;

    /// Replaces the whole record stored at `video.id`.
    async fn update_video(&self, video: &Video) -> Result<()>;

    /// Removes the video with the given id.
    async fn delete_video(&self, id: VideoId) -> Result<()>;

    /// Releases whatever the store holds on to.
    async fn close(&self);
}
