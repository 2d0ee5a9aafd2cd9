//! End-to-end pipeline tests against mock collaborators.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::clients::{
    ArtifactStore, ImageResolver, ScriptGenerator, SpeechSynthesizer, StoredArtifact,
};
use crate::error::PipelineError;
use crate::pipeline::ReelPipeline;
use crate::render::{AudioRef, RenderRequest, RenderedVideo, VideoRenderer};
use crate::store::{ReelStore, StoreError};
use crate::types::Reel;

// ── Mock collaborators ───────────────────────────────────────────────────────

struct MockScript {
    result: Result<String, String>,
}

#[async_trait]
impl ScriptGenerator for MockScript {
    async fn generate_script(&self, _subject: &str) -> Result<String, PipelineError> {
        self.result
            .clone()
            .map_err(PipelineError::ScriptGeneration)
    }
}

struct MockSpeech {
    fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Bytes, PipelineError> {
        if self.fail {
            Err(PipelineError::SpeechSynthesis(
                "speech service returned 500".to_owned(),
            ))
        } else {
            Ok(Bytes::from_static(b"mp3-bytes-mp3-bytes"))
        }
    }
}

struct MockImages {
    url: Option<String>,
}

#[async_trait]
impl ImageResolver for MockImages {
    async fn resolve_image(&self, _subject: &str) -> Result<Option<String>, PipelineError> {
        Ok(self.url.clone())
    }
}

struct MockArtifacts {
    uploads: AtomicU32,
}

#[async_trait]
impl ArtifactStore for MockArtifacts {
    async fn store(
        &self,
        _bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredArtifact, PipelineError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(StoredArtifact {
            id: format!("artifact-{n}"),
            path: format!("artifact-{n}.{}", if content_type == "video/mp4" { "mp4" } else { "mp3" }),
            public_url: format!("https://store/public/artifact-{n}"),
        })
    }
}

struct MockRenderer {
    needs_url: bool,
    fail: bool,
    /// Local audio path observed during the render call, so tests can
    /// verify the temp file is gone once `generate` returns.
    seen_audio: Mutex<Option<PathBuf>>,
}

impl MockRenderer {
    fn new(needs_url: bool, fail: bool) -> Self {
        Self {
            needs_url,
            fail,
            seen_audio: Mutex::new(None),
        }
    }
}

#[async_trait]
impl VideoRenderer for MockRenderer {
    fn requires_public_audio(&self) -> bool {
        self.needs_url
    }

    async fn render(&self, request: RenderRequest<'_>) -> Result<RenderedVideo, PipelineError> {
        // The pipeline must hand over the reference kind we asked for.
        match (&request.audio, self.needs_url) {
            (AudioRef::PublicUrl(_), true) | (AudioRef::LocalFile(_), false) => {}
            _ => panic!("pipeline supplied the wrong audio reference kind"),
        }
        if let AudioRef::LocalFile(path) = request.audio {
            assert!(path.exists(), "audio temp file must exist during render");
            *self.seen_audio.lock().unwrap() = Some(path.to_path_buf());
        }
        if self.fail {
            return Err(PipelineError::Render("boom".to_owned()));
        }
        Ok(RenderedVideo {
            id: "render-1".to_owned(),
            video_url: "https://cdn/render-1.mp4".to_owned(),
        })
    }
}

#[derive(Default)]
struct MemoryStore {
    reels: Mutex<Vec<Reel>>,
    fail_insert: bool,
}

#[async_trait]
impl ReelStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Reel>, StoreError> {
        let mut reels = self.reels.lock().unwrap().clone();
        reels.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reels)
    }

    async fn get(&self, id: &str) -> Result<Option<Reel>, StoreError> {
        Ok(self.reels.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, reel: &Reel) -> Result<(), StoreError> {
        if self.fail_insert {
            return Err(StoreError("disk full".to_owned()));
        }
        self.reels.lock().unwrap().push(reel.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut reels = self.reels.lock().unwrap();
        let before = reels.len();
        reels.retain(|r| r.id != id);
        Ok(reels.len() < before)
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    artifacts: Arc<MockArtifacts>,
    renderer: Arc<MockRenderer>,
    pipeline: ReelPipeline,
}

impl Fixture {
    /// The local audio temp path seen by the renderer, if any; it must
    /// never outlive the `generate` call that created it.
    fn rendered_audio_path(&self) -> Option<PathBuf> {
        self.renderer.seen_audio.lock().unwrap().clone()
    }
}

fn fixture(
    script: MockScript,
    speech: MockSpeech,
    images: MockImages,
    renderer: MockRenderer,
    store: MemoryStore,
) -> Fixture {
    let store = Arc::new(store);
    let renderer = Arc::new(renderer);
    let artifacts = Arc::new(MockArtifacts {
        uploads: AtomicU32::new(0),
    });
    let pipeline = ReelPipeline::new(
        Arc::new(script),
        Arc::new(speech),
        Arc::new(images),
        Arc::clone(&renderer) as Arc<dyn VideoRenderer>,
        Arc::clone(&artifacts) as Arc<dyn ArtifactStore>,
        Arc::clone(&store) as Arc<dyn ReelStore>,
        15.0,
    );
    Fixture {
        store,
        artifacts,
        renderer,
        pipeline,
    }
}

fn all_success() -> Fixture {
    fixture(
        MockScript {
            result: Ok("A short script about greatness.".to_owned()),
        },
        MockSpeech { fail: false },
        MockImages {
            url: Some("https://img/messi.jpg".to_owned()),
        },
        MockRenderer::new(false, false),
        MemoryStore::default(),
    )
}

// ── Generation tests ─────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_produces_complete_reel_and_lists_it_first() {
    let fx = all_success();

    let reel = fx.pipeline.generate("Lionel Messi").await.expect("generate");
    assert_eq!(reel.subject, "Lionel Messi");
    assert_eq!(reel.title, "Lionel Messi - AI History Reel");
    assert!(!reel.video_url.is_empty());
    assert!(!reel.thumbnail_url.is_empty());
    assert!(!reel.script.is_empty());

    let listed = fx.store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], reel);

    let audio_path = fx.rendered_audio_path().expect("renderer saw local audio");
    assert!(
        !audio_path.exists(),
        "audio temp file must be released once generate returns"
    );
}

#[tokio::test]
async fn generate_rejects_empty_subject_before_any_call() {
    let fx = all_success();
    let err = fx.pipeline.generate("   ").await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(fx.store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn generate_fails_with_image_not_found_and_inserts_nothing() {
    let fx = fixture(
        MockScript {
            result: Ok("script".to_owned()),
        },
        MockSpeech { fail: false },
        MockImages { url: None },
        MockRenderer::new(false, false),
        MemoryStore::default(),
    );

    let err = fx.pipeline.generate("Nobody Famous").await.unwrap_err();
    assert!(matches!(err, PipelineError::ImageNotFound { .. }));
    assert!(fx.store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn generate_surfaces_speech_failure_and_inserts_nothing() {
    let fx = fixture(
        MockScript {
            result: Ok("script".to_owned()),
        },
        MockSpeech { fail: true },
        MockImages {
            url: Some("https://img/x.jpg".to_owned()),
        },
        MockRenderer::new(false, false),
        MemoryStore::default(),
    );

    let err = fx.pipeline.generate("Somebody").await.unwrap_err();
    assert!(matches!(err, PipelineError::SpeechSynthesis(_)));
    assert!(fx.store.list().await.unwrap().is_empty());
    // Speech failed before any artifact existed; nothing was uploaded.
    assert_eq!(fx.artifacts.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generate_treats_whitespace_script_as_failure() {
    let fx = fixture(
        MockScript {
            result: Ok("   \n  ".to_owned()),
        },
        MockSpeech { fail: false },
        MockImages {
            url: Some("https://img/x.jpg".to_owned()),
        },
        MockRenderer::new(false, false),
        MemoryStore::default(),
    );

    let err = fx.pipeline.generate("Somebody").await.unwrap_err();
    assert!(matches!(err, PipelineError::ScriptGeneration(_)));
}

#[tokio::test]
async fn generate_uploads_audio_when_renderer_requires_public_url() {
    let fx = fixture(
        MockScript {
            result: Ok("script".to_owned()),
        },
        MockSpeech { fail: false },
        MockImages {
            url: Some("https://img/x.jpg".to_owned()),
        },
        MockRenderer::new(true, false),
        MemoryStore::default(),
    );

    fx.pipeline.generate("Somebody").await.expect("generate");
    assert_eq!(fx.artifacts.uploads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn generate_render_failure_inserts_nothing() {
    let fx = fixture(
        MockScript {
            result: Ok("script".to_owned()),
        },
        MockSpeech { fail: false },
        MockImages {
            url: Some("https://img/x.jpg".to_owned()),
        },
        MockRenderer::new(false, true),
        MemoryStore::default(),
    );

    let err = fx.pipeline.generate("Somebody").await.unwrap_err();
    assert!(matches!(err, PipelineError::Render(_)));
    assert!(fx.store.list().await.unwrap().is_empty());

    // The pipeline-owned audio temp file is released on the failure
    // path too, not just on success.
    let audio_path = fx.rendered_audio_path().expect("renderer saw local audio");
    assert!(
        !audio_path.exists(),
        "audio temp file must be released after a failed generate"
    );
}

#[tokio::test]
async fn generate_persistence_failure_is_typed_and_not_rolled_back() {
    let fx = fixture(
        MockScript {
            result: Ok("script".to_owned()),
        },
        MockSpeech { fail: false },
        MockImages {
            url: Some("https://img/x.jpg".to_owned()),
        },
        MockRenderer::new(true, false),
        MemoryStore {
            fail_insert: true,
            ..MemoryStore::default()
        },
    );

    let err = fx.pipeline.generate("Somebody").await.unwrap_err();
    assert!(matches!(err, PipelineError::Persistence(_)));
    // The audio upload happened and stays in storage (accepted orphan).
    assert_eq!(fx.artifacts.uploads.load(Ordering::SeqCst), 1);
}

// ── Store contract tests (against the in-memory reference impl) ──────────────

fn reel(id: &str, created_at: chrono::DateTime<chrono::Utc>) -> Reel {
    Reel {
        id: id.to_owned(),
        title: Reel::title_for("X"),
        subject: "X".to_owned(),
        video_url: "https://cdn/v.mp4".to_owned(),
        thumbnail_url: "https://img/t.jpg".to_owned(),
        script: "s".to_owned(),
        created_at,
    }
}

#[tokio::test]
async fn delete_missing_id_signals_not_found_and_leaves_store_unchanged() {
    let store = MemoryStore::default();
    let now = chrono::Utc::now();
    store.insert(&reel("a", now)).await.unwrap();

    assert!(!store.delete("missing").await.unwrap());
    assert_eq!(store.list().await.unwrap().len(), 1);

    assert!(store.delete("a").await.unwrap());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_newest_first() {
    let store = MemoryStore::default();
    let now = chrono::Utc::now();
    store.insert(&reel("old", now - chrono::Duration::hours(1))).await.unwrap();
    store.insert(&reel("new", now)).await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed[0].id, "new");
    assert_eq!(listed[1].id, "old");
}
