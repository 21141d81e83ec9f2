//! Object storage for uploaded media files.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use serde::Deserialize;
use snafu::{Location, ResultExt, Snafu};

/// Objects are immutable once written.
const CACHE_CONTROL: &str = "public, max-age=86400";

const PUBLIC_URL: &str = "https://storage.googleapis.com";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    #[snafu(display("could not configure bucket `{bucket}`: {source}"))]
    Configure {
        bucket: String,
        source: object_store::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("could not write `{name}` to bucket `{bucket}`: {source}"))]
    Upload {
        bucket: String,
        name: String,
        source: object_store::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

/// A file received from a client, ready to be stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    /// Random object name that keeps the extension of the uploaded file.
    pub fn object_name(&self) -> String {
        let id = uuid::Uuid::new_v4();
        match extension(&self.file_name) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        }
    }
}

fn extension(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    base.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Somewhere to put uploaded media so that it can be served back publicly.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores the upload and returns the public URL it can be fetched from.
    async fn upload(&self, upload: Upload) -> Result<String, StorageError>;
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Gcs,
    Memory,
    #[serde(rename = "none")]
    Disabled,
}

/// [MediaStorage] writing publicly readable objects into a single bucket.
///
/// The bucket itself must grant public read access; objects are addressed as
/// `https://storage.googleapis.com/<bucket>/<object>`.
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    store: Arc<dyn ObjectStore>,
}

impl Bucket {
    /// Bucket on Google Cloud Storage, authenticated from the environment.
    pub fn gcs(name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(&name)
            .build()
            .context(ConfigureSnafu {
                bucket: name.clone(),
            })?;

        Ok(Self::new(name, Arc::new(store)))
    }

    /// Bucket that only lives as long as the process.
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self::new(name.into(), Arc::new(InMemory::new()))
    }

    pub fn new(name: String, store: Arc<dyn ObjectStore>) -> Self {
        Self { name, store }
    }

    pub fn public_url(&self, object: &str) -> String {
        format!("{PUBLIC_URL}/{}/{object}", self.name)
    }
}

#[async_trait]
impl MediaStorage for Bucket {
    #[tracing::instrument(skip_all, fields(bucket = %self.name, file_name = %upload.file_name))]
    async fn upload(&self, upload: Upload) -> Result<String, StorageError> {
        let name = upload.object_name();
        let size = upload.data.len();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::CacheControl, CACHE_CONTROL.into());
        if let Some(content_type) = upload.content_type {
            attributes.insert(Attribute::ContentType, content_type.into());
        }

        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&Path::from(name.as_str()), PutPayload::from(upload.data), options)
            .await
            .context(UploadSnafu {
                bucket: self.name.clone(),
                name: name.clone(),
            })?;

        tracing::info!(object = %name, size_bytes = size, "uploaded media");
        Ok(self.public_url(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str) -> Upload {
        Upload {
            file_name: file_name.to_string(),
            content_type: Some("video/mp4".to_string()),
            data: Bytes::from_static(b"not really a video"),
        }
    }

    #[test]
    fn object_name_keeps_extension() {
        let name = upload("holiday.mp4").object_name();
        assert!(name.ends_with(".mp4"), "{name}");
        assert_eq!(name.len(), 36 + ".mp4".len());
    }

    #[test]
    fn object_name_without_extension_is_bare_uuid() {
        assert_eq!(upload("clip").object_name().len(), 36);
    }

    #[test]
    fn object_names_are_unique() {
        let upload = upload("a.webm");
        assert_ne!(upload.object_name(), upload.object_name());
    }

    #[test]
    fn extension_ignores_directories() {
        assert_eq!(extension("dir.d/clip"), None);
        assert_eq!(extension("C:\\videos\\clip.mov"), Some("mov"));
        assert_eq!(extension("trailing."), None);
    }

    #[tokio::test]
    async fn upload_writes_object_and_returns_public_url() {
        let bucket = Bucket::in_memory("bittube-test");

        let url = bucket.upload(upload("clip.mp4")).await.unwrap();

        let prefix = "https://storage.googleapis.com/bittube-test/";
        assert!(url.starts_with(prefix), "{url}");

        let object = Path::from(&url[prefix.len()..]);
        let stored = bucket.store.get(&object).await.unwrap();
        assert_eq!(stored.bytes().await.unwrap(), Bytes::from_static(b"not really a video"));
    }
}
