use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Loading media elements occasionally report a bogus size (0x0 with WebRTC in
// Safari), anything smaller than this is ignored.
const MEDIA_INFO_HEIGHT_CUTOFF: u32 = 50;
const MEDIA_INFO_WIDTH_CUTOFF: u32 = MEDIA_INFO_HEIGHT_CUTOFF;

static EVENT_CONTENT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^media-source://frigate/(?P<client>[^/]+)/event/(?P<kind>clips|snapshots)/(?P<camera>[^/]+)/(?:[^/]*/)*(?P<event>[^/]+)$",
    )
    .expect("valid event content id pattern")
});

/// A node of the browse-media tree resolved by the backend query.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MediaNode {
    pub title: String,
    #[serde(default)]
    pub media_class: String,
    #[serde(default)]
    pub media_content_type: String,
    pub media_content_id: String,
    #[serde(default)]
    pub can_play: bool,
    #[serde(default)]
    pub can_expand: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<Arc<MediaNode>>>,
}

impl MediaNode {
    pub fn leaf(title: &str, media_content_id: &str) -> Self {
        Self {
            title: title.to_string(),
            media_content_id: media_content_id.to_string(),
            can_play: true,
            ..Self::default()
        }
    }

    pub fn folder(title: &str, children: Vec<Arc<MediaNode>>) -> Self {
        Self {
            title: title.to_string(),
            can_expand: true,
            children: Some(children),
            ..Self::default()
        }
    }

    /// Frigate event id encoded in the content id, if this node is an event.
    pub fn event_id(&self) -> Option<&str> {
        EVENT_CONTENT_ID
            .captures(&self.media_content_id)
            .and_then(|captures| captures.name("event"))
            .map(|event| event.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Clips,
    Snapshots,
}

impl Default for MediaType {
    fn default() -> Self {
        Self::Clips
    }
}

/// Dimensions of the most recently shown media.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct MediaShowInfo {
    pub width: u32,
    pub height: u32,
}

impl MediaShowInfo {
    pub fn is_valid(&self) -> bool {
        self.height >= MEDIA_INFO_HEIGHT_CUTOFF && self.width >= MEDIA_INFO_WIDTH_CUTOFF
    }
}

/// Parameters the gallery, viewer and live thumbnails pass to the backend
/// query resolver.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BrowseMediaQuery {
    pub media_type: MediaType,
    pub client_id: String,
    pub camera_name: String,
    pub label: Option<String>,
    pub zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_event_id_from_content_id() {
        let clip = MediaNode::leaf(
            "Person",
            "media-source://frigate/frigate/event/clips/front_door/person/1641417418.421954-abcdef",
        );
        assert_eq!(clip.event_id(), Some("1641417418.421954-abcdef"));

        let zoned = MediaNode::leaf(
            "Car",
            "media-source://frigate/frigate/event/snapshots/driveway/car/street/1641417418.4-xyz",
        );
        assert_eq!(zoned.event_id(), Some("1641417418.4-xyz"));
    }

    #[test]
    fn non_event_nodes_have_no_event_id() {
        let recording = MediaNode::leaf("Rec", "media-source://frigate/frigate/recordings/2022-01");
        assert_eq!(recording.event_id(), None);
        assert_eq!(MediaNode::default().event_id(), None);
    }

    #[test]
    fn tiny_dimensions_are_not_valid_media() {
        assert!(!MediaShowInfo { width: 0, height: 0 }.is_valid());
        assert!(!MediaShowInfo { width: 640, height: 10 }.is_valid());
        assert!(MediaShowInfo { width: 640, height: 480 }.is_valid());
    }

    #[test]
    fn browse_media_json_deserializes() {
        let node: MediaNode = serde_json::from_str(
            r#"{
                "title": "Clips",
                "media_content_id": "media-source://frigate/frigate/event-search/clips",
                "can_expand": true,
                "children": [
                    {"title": "A", "media_content_id": "a", "can_play": true}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(node.children.as_ref().map(Vec::len), Some(1));
        assert!(node.children.unwrap()[0].can_play);
    }
}
