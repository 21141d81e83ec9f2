use super::*;

/// Creator id used for videos that were added without a signed-in user.
pub const ANONYMOUS_ID: &str = "anonymous";

const ANONYMOUS_NAME: &str = "Anonymous";

/// Surrogate key of a [Video]. `0` means the video has not been stored yet.
pub type VideoId = i64;

/// Metadata about a single video in the catalog.
///
/// Field names are serialized in their stored form (`Title`, `VideoURL`, ...)
/// so templates and storage agree on one naming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct Video {
    #[new(default)]
    #[serde(rename = "ID", default)]
    pub id: VideoId,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "PublishedDate")]
    pub published_date: String,
    #[serde(rename = "VideoURL")]
    pub video_url: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[new(default)]
    #[serde(rename = "CreatedBy")]
    pub created_by: String,
    #[new(default)]
    #[serde(rename = "CreatedByID")]
    pub created_by_id: String,
}

impl Video {
    /// Name to show for the creator of this video.
    pub fn created_by_display_name(&self) -> &str {
        if self.is_anonymous() {
            return ANONYMOUS_NAME;
        }
        &self.created_by
    }

    /// Marks the video as created by nobody in particular.
    pub fn set_creator_anonymous(&mut self) {
        self.created_by.clear();
        self.created_by_id = ANONYMOUS_ID.to_string();
    }

    /// Credits the video to `id`. The anonymous id never carries a name.
    pub fn set_creator(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.created_by_id = id.into();
        self.created_by = name.into();

        if self.is_anonymous() {
            self.created_by.clear();
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.created_by_id == ANONYMOUS_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> Video {
        let mut video = Video::new(
            "Big Buck Bunny".into(),
            "Blender Foundation".into(),
            "2008-05-20".into(),
            "https://example.com/bunny.mp4".into(),
            "A giant rabbit".into(),
        );
        video.set_creator("user-1", "Sacha");
        video
    }

    #[test]
    fn anonymous_creator_clears_name() {
        let mut video = video();
        video.set_creator_anonymous();

        assert_eq!(video.created_by, "");
        assert_eq!(video.created_by_id, "anonymous");
        assert!(video.is_anonymous());
    }

    #[test]
    fn anonymous_creator_displays_fixed_label() {
        let mut video = video();
        video.set_creator_anonymous();

        assert_eq!(video.created_by_display_name(), "Anonymous");
    }

    #[test]
    fn named_creator_displays_their_name() {
        assert_eq!(video().created_by_display_name(), "Sacha");
    }

    #[test]
    fn anonymous_label_depends_on_id_not_name() {
        let mut video = video();
        video.created_by_id = ANONYMOUS_ID.to_string();

        assert_eq!(video.created_by_display_name(), "Anonymous");
    }

    #[test]
    fn anonymous_id_drops_supplied_name() {
        let mut video = video();
        video.set_creator(ANONYMOUS_ID, "Mallory");

        assert_eq!(video.created_by, "");
        assert!(video.is_anonymous());
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let value = serde_json::to_value(video()).unwrap();

        assert_eq!(value["Title"], "Big Buck Bunny");
        assert_eq!(value["VideoURL"], "https://example.com/bunny.mp4");
        assert_eq!(value["CreatedByID"], "user-1");
        assert_eq!(value["ID"], 0);
    }
}
