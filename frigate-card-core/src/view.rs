use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::media::MediaNode;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Live,
    Clips,
    Snapshots,
    Clip,
    ClipSpecific,
    Snapshot,
    SnapshotSpecific,
    Image,
}

impl ViewKind {
    pub const ALL: [ViewKind; 8] = [
        ViewKind::Live,
        ViewKind::Clips,
        ViewKind::Snapshots,
        ViewKind::Clip,
        ViewKind::ClipSpecific,
        ViewKind::Snapshot,
        ViewKind::SnapshotSpecific,
        ViewKind::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Live => "live",
            ViewKind::Clips => "clips",
            ViewKind::Snapshots => "snapshots",
            ViewKind::Clip => "clip",
            ViewKind::ClipSpecific => "clip-specific",
            ViewKind::Snapshot => "snapshot",
            ViewKind::SnapshotSpecific => "snapshot-specific",
            ViewKind::Image => "image",
        }
    }
}

impl Default for ViewKind {
    fn default() -> Self {
        Self::Live
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// What the card is currently displaying.  A navigation always produces a new
/// `View`, existing values are never modified.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct View {
    pub view: ViewKind,
    pub target: Option<Arc<MediaNode>>,
    pub child_index: Option<usize>,
}

impl View {
    pub fn new(view: ViewKind) -> Self {
        Self {
            view,
            target: None,
            child_index: None,
        }
    }

    pub fn with_target(view: ViewKind, target: Arc<MediaNode>, child_index: Option<usize>) -> Self {
        Self {
            view,
            target: Some(target),
            child_index,
        }
    }

    pub fn is(&self, kind: ViewKind) -> bool {
        self.view == kind
    }

    pub fn is_gallery_view(&self) -> bool {
        matches!(self.view, ViewKind::Clips | ViewKind::Snapshots)
    }

    /// Anything that shows a piece of media rather than the gallery.
    pub fn is_media_view(&self) -> bool {
        !self.is_gallery_view()
    }

    pub fn is_viewer_view(&self) -> bool {
        matches!(
            self.view,
            ViewKind::Clip
                | ViewKind::ClipSpecific
                | ViewKind::Snapshot
                | ViewKind::SnapshotSpecific
        )
    }

    pub fn is_clip_related_view(&self) -> bool {
        matches!(
            self.view,
            ViewKind::Clip | ViewKind::Clips | ViewKind::ClipSpecific
        )
    }

    pub fn is_snapshot_related_view(&self) -> bool {
        matches!(
            self.view,
            ViewKind::Snapshot | ViewKind::Snapshots | ViewKind::SnapshotSpecific
        )
    }

    /// The single media item this view addresses.  Resolved on every call, an
    /// out of range child index resolves to nothing.
    pub fn media(&self) -> Option<&Arc<MediaNode>> {
        let target = self.target.as_ref()?;
        match (&target.children, self.child_index) {
            (Some(children), Some(index)) => children.get(index),
            _ => Some(target),
        }
    }
}
