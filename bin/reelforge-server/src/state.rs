//! Shared application state injected into every Axum handler.

use std::sync::Arc;
use std::time::Duration;

use reelforge_core::clients::cohere::{CohereConfig, CohereScript};
use reelforge_core::clients::elevenlabs::{ElevenLabsConfig, ElevenLabsSpeech};
use reelforge_core::clients::supabase::{SupabaseConfig, SupabaseStorage};
use reelforge_core::clients::wikimedia::{WikimediaConfig, WikimediaImages};
use reelforge_core::clients::{ArtifactStore, ImageResolver, ScriptGenerator, SpeechSynthesizer};
use reelforge_core::render::local::FfmpegAssembler;
use reelforge_core::render::shotstack::{ShotstackConfig, ShotstackRender};
use reelforge_core::render::VideoRenderer;
use reelforge_core::store::ReelStore;
use reelforge_core::ReelPipeline;

use crate::config::{Config, RenderStrategy};

/// State shared across all HTTP handlers.
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent reel record store.
    pub store: Arc<dyn ReelStore>,
    /// The end-to-end generation pipeline.
    pub pipeline: ReelPipeline,
    /// Individual upstream clients for the standalone endpoints.
    pub script: Arc<dyn ScriptGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub images: Arc<dyn ImageResolver>,
    /// Local ffmpeg assembly, always available for `/reels/assemble`.
    pub assembler: Arc<FfmpegAssembler>,
    /// Remote render client; `None` under the local strategy.
    pub shotstack: Option<Arc<ShotstackRender>>,
}

impl AppState {
    /// Wire all upstream clients and the pipeline from `config`.
    pub fn build(config: Config, store: Arc<dyn ReelStore>) -> anyhow::Result<Arc<Self>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        let mut cohere = CohereConfig::new(config.cohere_api_key.clone());
        if let Some(url) = &config.cohere_api_url {
            cohere.api_url = url.clone();
        }
        let script: Arc<dyn ScriptGenerator> =
            Arc::new(CohereScript::new(http.clone(), cohere));

        let mut elevenlabs = ElevenLabsConfig::new(config.elevenlabs_api_key.clone());
        if let Some(url) = &config.elevenlabs_api_url {
            elevenlabs.api_url = url.clone();
        }
        if let Some(voice) = &config.elevenlabs_voice_id {
            elevenlabs.voice_id = voice.clone();
        }
        let speech: Arc<dyn SpeechSynthesizer> =
            Arc::new(ElevenLabsSpeech::new(http.clone(), elevenlabs));

        let mut wikimedia = WikimediaConfig::default();
        if let Some(url) = &config.wikipedia_api_url {
            wikimedia.api_url = url.clone();
        }
        let images: Arc<dyn ImageResolver> =
            Arc::new(WikimediaImages::new(http.clone(), wikimedia));

        let artifacts: Arc<dyn ArtifactStore> = Arc::new(SupabaseStorage::new(
            http.clone(),
            SupabaseConfig {
                base_url: config.supabase_url.clone(),
                api_key: config.supabase_key.clone(),
                bucket: config.supabase_bucket.clone(),
            },
        ));

        let assembler = Arc::new(FfmpegAssembler::new(http.clone(), Arc::clone(&artifacts)));

        let shotstack = match config.render_strategy {
            RenderStrategy::Remote => {
                let mut shotstack_cfg = ShotstackConfig::new(config.shotstack_api_key.clone());
                if let Some(url) = &config.shotstack_api_url {
                    shotstack_cfg.api_url = url.clone();
                }
                Some(Arc::new(ShotstackRender::new(
                    http,
                    shotstack_cfg,
                    Duration::from_millis(config.render_poll_interval_ms),
                    config.render_poll_max_attempts,
                )))
            }
            RenderStrategy::Local => None,
        };

        let renderer: Arc<dyn VideoRenderer> = match &shotstack {
            Some(remote) => Arc::clone(remote) as Arc<dyn VideoRenderer>,
            None => Arc::clone(&assembler) as Arc<dyn VideoRenderer>,
        };

        let pipeline = ReelPipeline::new(
            Arc::clone(&script),
            Arc::clone(&speech),
            Arc::clone(&images),
            renderer,
            artifacts,
            Arc::clone(&store),
            config.target_duration_secs,
        );

        Ok(Arc::new(Self {
            config: Arc::new(config),
            store,
            pipeline,
            script,
            speech,
            images,
            assembler,
            shotstack,
        }))
    }
}
