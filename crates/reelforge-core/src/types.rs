//! Core data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted unit of content.
///
/// A `Reel` is only constructed after both the video and the thumbnail
/// URL are resolved; no partial record ever reaches the store. Field
/// names are serialized in camelCase for frontend compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reel {
    /// Opaque stable identifier (render job id or storage UUID);
    /// assigned once, never reused.
    pub id: String,
    /// Derived display string, e.g. `"Lionel Messi - AI History Reel"`.
    pub title: String,
    /// The free-text name supplied by the requester.
    pub subject: String,
    /// Public URL of the finished video.
    pub video_url: String,
    /// Public URL of the representative image.
    pub thumbnail_url: String,
    /// The generated narration text.
    pub script: String,
    /// Set once, at successful completion of the generation run.
    pub created_at: DateTime<Utc>,
}

impl Reel {
    /// Build the display title for a subject.
    pub fn title_for(subject: &str) -> String {
        format!("{subject} - AI History Reel")
    }
}
