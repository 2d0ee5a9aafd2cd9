//! Request / response DTOs for the HTTP surface.

pub mod media;
pub mod reels;
pub mod render;
