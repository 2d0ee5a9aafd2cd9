//! Local ffmpeg video assembly.
//!
//! Downloads the image, loops it over the narration audio with ffmpeg
//! (vertical 720x1280, libx264/aac), uploads the composed bytes to the
//! artifact store, and returns the public URL. Everything this renderer
//! materialises on disk is drop-guarded; the caller's audio file is
//! left untouched.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ffmpeg_sidecar::{command::FfmpegCommand, event::FfmpegEvent};
use tokio::task;
use tracing::{debug, error, info};

use crate::artifact::TempArtifact;
use crate::clients::ArtifactStore;
use crate::error::PipelineError;
use crate::render::{AudioRef, RenderRequest, RenderedVideo, VideoRenderer};

/// Synchronous image+audio→video composition via ffmpeg.
pub struct FfmpegAssembler {
    http: reqwest::Client,
    artifacts: Arc<dyn ArtifactStore>,
}

impl FfmpegAssembler {
    pub fn new(http: reqwest::Client, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { http, artifacts }
    }

    /// Fetch a remote asset into a drop-guarded temp file.
    async fn download_to_temp(
        &self,
        url: &str,
        suffix: &str,
    ) -> Result<TempArtifact, PipelineError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::from_transport("asset download", e, PipelineError::Render))?;

        if !resp.status().is_success() {
            return Err(PipelineError::Render(format!(
                "failed to fetch asset {url}: {}",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| PipelineError::Render(format!("failed to read asset {url}: {e}")))?;
        debug!(url, bytes = bytes.len(), "asset downloaded");
        TempArtifact::from_bytes(&bytes, suffix)
    }
}

/// Run ffmpeg on a blocking thread: loop `image` for `duration_secs`
/// seconds over `audio`, writing mp4 to `output`. Returns the composed
/// bytes.
fn compose(
    image: PathBuf,
    audio: PathBuf,
    output: PathBuf,
    duration_secs: f64,
) -> anyhow::Result<Vec<u8>> {
    let duration = format!("{duration_secs}");
    let mut ffmpeg_errors: Vec<String> = Vec::new();

    FfmpegCommand::new()
        .hide_banner()
        .overwrite()
        .args(["-loop", "1"])
        .input(
            image
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("non-utf8 image path"))?,
        )
        .input(
            audio
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("non-utf8 audio path"))?,
        )
        .args([
            "-c:v",
            "libx264",
            "-t",
            &duration,
            "-pix_fmt",
            "yuv420p",
            "-vf",
            "scale=720:1280",
            "-c:a",
            "aac",
            "-shortest",
        ])
        .output(
            output
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("non-utf8 output path"))?,
        )
        .spawn()?
        .iter()?
        .for_each(|event| match event {
            FfmpegEvent::Log(level, msg) => debug!("[ffmpeg {level:?}] {msg}"),
            FfmpegEvent::Error(e) => {
                error!("ffmpeg error: {e}");
                ffmpeg_errors.push(e);
            }
            FfmpegEvent::Done => info!(output = %output.display(), "ffmpeg finished composing"),
            _ => {}
        });

    let bytes = std::fs::read(&output)?;
    ensure_composed(&ffmpeg_errors, &bytes)?;
    Ok(bytes)
}

/// A run that reported errors is fatal even when ffmpeg wrote partial
/// output; truncated bytes must never reach the artifact store.
fn ensure_composed(errors: &[String], bytes: &[u8]) -> anyhow::Result<()> {
    if !errors.is_empty() {
        anyhow::bail!("ffmpeg reported errors: {}", errors.join("; "));
    }
    if bytes.is_empty() {
        anyhow::bail!("ffmpeg produced an empty file");
    }
    Ok(())
}

#[async_trait]
impl VideoRenderer for FfmpegAssembler {
    fn requires_public_audio(&self) -> bool {
        false
    }

    async fn render(&self, request: RenderRequest<'_>) -> Result<RenderedVideo, PipelineError> {
        // Guards must outlive the ffmpeg run; the downloaded-audio guard
        // is None when the caller supplied its own file.
        let image = self.download_to_temp(request.image_url, ".jpg").await?;
        let downloaded_audio;
        let audio_path = match request.audio {
            AudioRef::LocalFile(path) => path.to_path_buf(),
            AudioRef::PublicUrl(url) => {
                downloaded_audio = self.download_to_temp(url, ".mp3").await?;
                downloaded_audio.path().to_path_buf()
            }
        };

        let output = TempArtifact::empty(".mp4")?;
        let image_path = image.path().to_path_buf();
        let output_path = output.path().to_path_buf();
        let duration_secs = request.duration_secs;

        let video_bytes =
            task::spawn_blocking(move || compose(image_path, audio_path, output_path, duration_secs))
                .await
                .map_err(|e| PipelineError::Render(format!("assembly task panicked: {e}")))?
                .map_err(|e| PipelineError::Render(e.to_string()))?;

        info!(bytes = video_bytes.len(), "video composed; uploading");
        let stored = self
            .artifacts
            .store(video_bytes.into(), "video/mp4")
            .await?;

        Ok(RenderedVideo {
            id: stored.id,
            video_url: stored.public_url,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reported_errors_fail_even_with_partial_output() {
        let errors = vec!["encoder 'libx264' not found".to_owned()];
        let err = ensure_composed(&errors, b"partial-mp4-bytes").unwrap_err();
        assert!(err.to_string().contains("libx264"));
    }

    #[test]
    fn empty_output_fails() {
        assert!(ensure_composed(&[], b"").is_err());
    }

    #[test]
    fn clean_run_with_output_passes() {
        assert!(ensure_composed(&[], b"mp4-bytes").is_ok());
    }
}
