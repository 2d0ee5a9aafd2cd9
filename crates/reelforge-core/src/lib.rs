//! reelforge-core – the reel generation pipeline.
//!
//! A "reel" is a short auto-generated video for a subject (a celebrity
//! name): a generated narration script, synthesized speech, a looked-up
//! image, and a composed video, persisted as one record once every
//! artifact has been produced.
//!
//! This crate owns everything between the HTTP boundary and the upstream
//! services:
//! - [`clients`] – the script / speech / image / artifact-store clients
//! - [`render`] – the two video-render strategies and the status poller
//! - [`pipeline`] – the orchestrator that sequences one generation run
//! - [`store`] – the injected reel record store abstraction
//! - [`artifact`] – drop-guarded temporary artifacts

pub mod artifact;
pub mod clients;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::PipelineError;
pub use pipeline::ReelPipeline;
pub use types::Reel;
