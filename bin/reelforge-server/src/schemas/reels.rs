//! DTOs for the reel CRUD endpoints.

use reelforge_core::Reel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /reels/generate`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateReelRequest {
    /// The person the reel is about.  `celebrity` is accepted as an
    /// alias for older frontend builds.
    #[serde(alias = "celebrity")]
    pub subject: String,
}

/// One finished reel, as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReelResponse {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub script: String,
    pub created_at: String,
}

impl From<Reel> for ReelResponse {
    fn from(reel: Reel) -> Self {
        Self {
            id: reel.id,
            title: reel.title,
            subject: reel.subject,
            video_url: reel.video_url,
            thumbnail_url: reel.thumbnail_url,
            script: reel.script,
            created_at: reel.created_at.to_rfc3339(),
        }
    }
}

/// Body of `GET /reels`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReelListResponse {
    pub reels: Vec<ReelResponse>,
}

/// Body of a successful `DELETE /reels/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteReelResponse {
    pub message: String,
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generate_request_accepts_celebrity_alias() {
        let req: GenerateReelRequest =
            serde_json::from_str(r#"{"celebrity": "Serena Williams"}"#).unwrap();
        assert_eq!(req.subject, "Serena Williams");

        let req: GenerateReelRequest =
            serde_json::from_str(r#"{"subject": "Usain Bolt"}"#).unwrap();
        assert_eq!(req.subject, "Usain Bolt");
    }

    #[test]
    fn reel_response_serialises_camel_case() {
        let reel = Reel {
            id: "r-1".to_owned(),
            title: "Pele - AI History Reel".to_owned(),
            subject: "Pele".to_owned(),
            video_url: "https://cdn/v.mp4".to_owned(),
            thumbnail_url: "https://img/t.jpg".to_owned(),
            script: "s".to_owned(),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(ReelResponse::from(reel)).unwrap();
        assert!(json.get("videoUrl").is_some());
        assert!(json.get("thumbnailUrl").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
