use derive_new::new;
use serde::{Deserialize, Serialize};

/// Caller-chosen identifier of a video, also used as the numeric record id.
pub type VideoId = i64;

/// Longest name the `video` table accepts.
pub const MAX_NAME_LENGTH: usize = 100;

/// A stored video, serialized as exactly `{id, name, views, likes}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Video {
    pub id: VideoId,
    pub name: String,
    pub views: i64,
    pub likes: i64,
}

/// Every field a video needs before it can be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct NewVideo {
    pub name: String,
    pub views: i64,
    pub likes: i64,
}

/// A partial update. Fields left as `None` are not serialized, so merging
/// the patch into a record leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.views.is_none() && self.likes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_video_as_flat_record() {
        let video = Video::new(1, "a".to_string(), 0, 5);
        let value = serde_json::to_value(&video).unwrap();

        assert_eq!(value, json!({ "id": 1, "name": "a", "views": 0, "likes": 5 }));
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = VideoPatch::default();

        assert!(patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
    }

    #[test]
    fn patch_only_serializes_supplied_fields() {
        let patch = VideoPatch {
            likes: Some(5),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "likes": 5 }));
    }
}
