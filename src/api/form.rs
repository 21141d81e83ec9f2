use axum::extract::multipart::{Multipart, MultipartError};
use snafu::{OptionExt, ResultExt, Snafu};

use crate::model::Video;
use crate::session::Profile;
use crate::storage::{MediaStorage, StorageError, Upload};

/// Name of the form field carrying an optional media file.
pub const FILE_FIELD: &str = "video";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FormError {
    #[snafu(display("malformed form data: {source}"))]
    Multipart { source: MultipartError },

    #[snafu(display("could not upload file: storage bucket is missing, check the configuration"))]
    MissingStorage,

    #[snafu(display("could not upload file: {source}"))]
    UploadFile { source: StorageError },
}

/// The fields of the edit form, as submitted.
#[derive(Debug, Clone, Default)]
pub struct VideoForm {
    pub title: String,
    pub author: String,
    pub published_date: String,
    pub video_url: String,
    pub description: String,
    pub created_by: String,
    pub created_by_id: String,
    pub file: Option<Upload>,
}

impl VideoForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, FormError> {
        let mut form = VideoForm::default();

        while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.context(MultipartSnafu)?;

                // browsers send an empty part when no file was picked
                if !file_name.is_empty() || !data.is_empty() {
                    form.file = Some(Upload {
                        file_name,
                        content_type,
                        data,
                    });
                }
                continue;
            }

            let value = field.text().await.context(MultipartSnafu)?;
            match name.as_str() {
                "title" => form.title = value,
                "author" => form.author = value,
                "publishedDate" => form.published_date = value,
                "videoURL" => form.video_url = value,
                "description" => form.description = value,
                "createdBy" => form.created_by = value,
                "createdByID" => form.created_by_id = value,
                _ => tracing::debug!(field = %name, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Turns the form into a [Video], uploading the attached file if there is one.
    ///
    /// An uploaded file takes precedence over the `videoURL` field. When the form
    /// does not name a creator, the signed-in user is used, or nobody at all.
    pub async fn into_video(
        self,
        media: Option<&dyn MediaStorage>,
        profile: Option<&Profile>,
    ) -> Result<Video, FormError> {
        let mut video_url = self.video_url;

        if let Some(upload) = self.file {
            let media = media.context(MissingStorageSnafu)?;
            video_url = media.upload(upload).await.context(UploadFileSnafu)?;
        }

        let mut video = Video::new(
            self.title,
            self.author,
            self.published_date,
            video_url,
            self.description,
        );
        video.set_creator(self.created_by_id, self.created_by);

        if video.created_by_id.is_empty() {
            assign_creator(&mut video, profile);
        }

        Ok(video)
    }
}

/// Credits `video` to the signed-in user, or marks it anonymous.
pub fn assign_creator(video: &mut Video, profile: Option<&Profile>) {
    match profile {
        Some(profile) => video.set_creator(profile.id.clone(), profile.display_name.clone()),
        None => video.set_creator_anonymous(),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::storage::Bucket;

    fn form() -> VideoForm {
        VideoForm {
            title: "Elephants Dream".into(),
            author: "Orange".into(),
            published_date: "2006-03-24".into(),
            video_url: "https://example.com/dream.mp4".into(),
            description: "Two characters in a surreal machine".into(),
            ..VideoForm::default()
        }
    }

    fn file() -> Upload {
        Upload {
            file_name: "dream.webm".into(),
            content_type: Some("video/webm".into()),
            data: Bytes::from_static(b"webm bytes"),
        }
    }

    #[tokio::test]
    async fn anonymous_without_creator_or_session() {
        let video = form().into_video(None, None).await.unwrap();

        assert_eq!(video.created_by_id, "anonymous");
        assert_eq!(video.created_by, "");
        assert_eq!(video.video_url, "https://example.com/dream.mp4");
    }

    #[tokio::test]
    async fn creator_from_session_profile() {
        let profile = Profile::new("user-3".into(), "Emo".into());
        let video = form().into_video(None, Some(&profile)).await.unwrap();

        assert_eq!(video.created_by_id, "user-3");
        assert_eq!(video.created_by, "Emo");
    }

    #[tokio::test]
    async fn creator_from_form_wins_over_session() {
        let profile = Profile::new("user-3".into(), "Emo".into());
        let form = VideoForm {
            created_by: "Proog".into(),
            created_by_id: "user-9".into(),
            ..form()
        };

        let video = form.into_video(None, Some(&profile)).await.unwrap();

        assert_eq!(video.created_by_id, "user-9");
        assert_eq!(video.created_by, "Proog");
    }

    #[tokio::test]
    async fn uploaded_file_replaces_url() {
        let bucket = Bucket::in_memory("bittube-test");
        let form = VideoForm {
            file: Some(file()),
            ..form()
        };

        let video = form.into_video(Some(&bucket), None).await.unwrap();

        assert!(video
            .video_url
            .starts_with("https://storage.googleapis.com/bittube-test/"));
        assert!(video.video_url.ends_with(".webm"));
    }

    #[tokio::test]
    async fn upload_without_storage_fails() {
        let form = VideoForm {
            file: Some(file()),
            ..form()
        };

        let err = form.into_video(None, None).await.unwrap_err();
        assert!(matches!(err, FormError::MissingStorage));
    }

    #[tokio::test]
    async fn anonymous_creator_from_form_has_no_name() {
        let form = VideoForm {
            created_by: "Mallory".into(),
            created_by_id: "anonymous".into(),
            ..form()
        };

        let video = form.into_video(None, None).await.unwrap();

        assert_eq!(video.created_by_id, "anonymous");
        assert_eq!(video.created_by, "");
        assert_eq!(video.created_by_display_name(), "Anonymous");
    }

    #[test]
    fn assign_creator_marks_anonymous_without_profile() {
        let mut video = Video::default();
        assign_creator(&mut video, None);

        assert!(video.is_anonymous());
        assert_eq!(video.created_by_display_name(), "Anonymous");
    }
}
