use crate::routes::{health, media, reels, render};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "reelforge-server",
    description = "reelforge-server API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(reels::ReelsApi::openapi());
    root.merge(media::MediaApi::openapi());
    root.merge(render::RenderApi::openapi());
    root
}
