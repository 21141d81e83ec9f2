use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use surrealdb::sql::{Id, Thing};

use super::*;
use crate::database::{self, Database, DatabaseConfig, DatabaseError, Sql};

/// Table every video document lives in.
const TABLE: &str = "Video";

/// Table holding one counter document per keyed table.
const COUNTERS: &str = "counter";

/// [VideoStore] backed by a SurrealDB document database.
///
/// Every video is stored as the document `Video:<id>`. Ids come from the
/// counter document `counter:Video`, which the database increments
/// atomically, so no two videos are ever handed the same key.
///
/// Deleting an id that does not exist succeeds silently, while updating one
/// fails with [StoreError::NotFound].
#[derive(Debug, Clone)]
pub struct DocumentStore {
    database: Database,
}

impl DocumentStore {
    /// Connects to the database and checks that it answers.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        database::connect(config).await.map(Self::new)
    }

    /// Wraps an already connected database.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    async fn next_id(&self) -> Result<VideoId> {
        let counter: Option<Counter> = self
            .database
            .sql("UPDATE type::thing($counters, $table) SET value = (value OR 0) + 1 RETURN AFTER")
            .bind(("counters", COUNTERS))
            .bind(("table", TABLE))
            .fetch_first()
            .await
            .context(StoreUnavailableSnafu {
                operation: "allocate Video id",
            })?;

        let counter = counter.context(MalformedKeySnafu {
            operation: "allocate Video id",
            key: format!("{COUNTERS}:{TABLE}"),
        })?;

        Ok(counter.value)
    }

    async fn find(&self, id: VideoId, operation: &'static str) -> Result<Option<VideoDocument>> {
        self.database
            .sql("SELECT * FROM type::thing($table, $id)")
            .bind(("table", TABLE))
            .bind(("id", id))
            .fetch_first()
            .await
            .context(StoreUnavailableSnafu { operation })
    }

    async fn list(&self, query: &str, user_id: &str) -> Result<Vec<Video>> {
        let documents: Vec<VideoDocument> = self
            .database
            .sql(query)
            .bind(("table", TABLE))
            .bind(("user", user_id))
            .fetch_first()
            .await
            .context(StoreUnavailableSnafu {
                operation: "list videos",
            })?;

        // the key is not part of the stored value, restore it from the record id
        documents
            .into_iter()
            .map(|document| {
                let id = document.key("list videos")?;
                Ok(document.into_video(id))
            })
            .collect()
    }
}

#[async_trait]
impl VideoStore for DocumentStore {
    #[tracing::instrument(skip(self))]
    async fn list_videos(&self) -> Result<Vec<Video>> {
        self.list("SELECT * FROM type::table($table) ORDER BY Title ASC", "")
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn list_videos_created_by(&self, user_id: &str) -> Result<Vec<Video>> {
        if user_id.is_empty() {
            return self.list_videos().await;
        }

        self.list(
            "SELECT * FROM type::table($table) WHERE CreatedByID = $user ORDER BY Title ASC",
            user_id,
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_video(&self, id: VideoId) -> Result<Video> {
        let document = self
            .find(id, "get Video")
            .await?
            .context(NotFoundSnafu { id })?;

        Ok(document.into_video(id))
    }

    #[tracing::instrument(skip_all, fields(title = %video.title))]
    async fn add_video(&self, video: &Video) -> Result<VideoId> {
        let id = self.next_id().await?;

        self.database
            .sql("CREATE type::thing($table, $id) CONTENT $content RETURN NONE")
            .bind(("table", TABLE))
            .bind(("id", id))
            .bind(("content", VideoDocument::from_video(video)))
            .execute()
            .await
            .context(StoreUnavailableSnafu {
                operation: "put Video",
            })?;

        tracing::info!(video_id = id, "added video");
        Ok(id)
    }

    #[tracing::instrument(skip_all, fields(video_id = video.id))]
    async fn update_video(&self, video: &Video) -> Result<()> {
        let id = video.id;
        self.find(id, "update Video")
            .await?
            .context(NotFoundSnafu { id })?;

        self.database
            .sql("UPDATE type::thing($table, $id) CONTENT $content RETURN NONE")
            .bind(("table", TABLE))
            .bind(("id", id))
            .bind(("content", VideoDocument::from_video(video)))
            .execute()
            .await
            .context(StoreUnavailableSnafu {
                operation: "update Video",
            })?;

        tracing::info!("updated video");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_video(&self, id: VideoId) -> Result<()> {
        self.database
            .sql("DELETE type::thing($table, $id)")
            .bind(("table", TABLE))
            .bind(("id", id))
            .execute()
            .await
            .context(StoreUnavailableSnafu {
                operation: "delete Video",
            })?;

        tracing::info!("deleted video");
        Ok(())
    }

    async fn close(&self) {
        if let Err(err) = self.database.invalidate().await {
            tracing::warn!(%err, "failed to close the database session");
        }
    }
}

#[derive(Debug, Deserialize)]
struct Counter {
    value: VideoId,
}

/// A video as it is laid out in the database.
#[derive(Debug, Default, Deserialize, Serialize)]
struct VideoDocument {
    #[serde(skip_serializing)]
    id: Option<Thing>,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Author", default)]
    author: String,
    #[serde(rename = "PublishedDate", default)]
    published_date: String,
    #[serde(rename = "VideoURL", default)]
    video_url: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "CreatedBy", default)]
    created_by: String,
    #[serde(rename = "CreatedByID", default)]
    created_by_id: String,
}

impl VideoDocument {
    fn from_video(video: &Video) -> Self {
        let created_by = match video.is_anonymous() {
            true => String::new(),
            false => video.created_by.clone(),
        };

        Self {
            id: None,
            title: video.title.clone(),
            author: video.author.clone(),
            published_date: video.published_date.clone(),
            video_url: video.video_url.clone(),
            description: video.description.clone(),
            created_by,
            created_by_id: video.created_by_id.clone(),
        }
    }

    fn into_video(self, id: VideoId) -> Video {
        Video {
            id,
            title: self.title,
            author: self.author,
            published_date: self.published_date,
            video_url: self.video_url,
            description: self.description,
            created_by: self.created_by,
            created_by_id: self.created_by_id,
        }
    }

    fn key(&self, operation: &'static str) -> Result<VideoId> {
        match &self.id {
            Some(Thing {
                id: Id::Number(id), ..
            }) => Ok(*id),
            other => MalformedKeySnafu {
                operation,
                key: other.as_ref().map(Thing::to_string).unwrap_or_default(),
            }
            .fail(),
        }
    }
}
