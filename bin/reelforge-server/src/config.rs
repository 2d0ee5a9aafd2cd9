//! Server configuration, loaded from environment variables at startup.

use std::fmt;

/// Which video composition strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// ffmpeg on this machine; audio stays in a local temp file.
    Local,
    /// Remote render service; audio must be uploaded first.
    Remote,
}

impl RenderStrategy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "local" => Some(RenderStrategy::Local),
            "remote" => Some(RenderStrategy::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Local => write!(f, "local"),
            RenderStrategy::Remote => write!(f, "remote"),
        }
    }
}

/// Runtime configuration for reelforge-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set (upstream API keys excepted).
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// SQLite (or other) database URL (default: `"sqlite://reels.db"`).
    /// Supports any sqlx-compatible connection string.
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS allow-list; `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (default: on).
    pub enable_swagger: bool,

    /// `local` (ffmpeg) or `remote` (render service).
    pub render_strategy: RenderStrategy,

    /// Target reel length in seconds.
    pub target_duration_secs: f64,

    /// Sleep between render status polls, in milliseconds.
    pub render_poll_interval_ms: u64,

    /// Status-query budget before a render counts as timed out.
    pub render_poll_max_attempts: u32,

    /// Transport timeout applied to every upstream HTTP call, seconds.
    pub upstream_timeout_secs: u64,

    // ── Upstream credentials ─────────────────────────────────────────────────
    pub cohere_api_key: String,
    pub cohere_api_url: Option<String>,

    pub elevenlabs_api_key: String,
    pub elevenlabs_api_url: Option<String>,
    pub elevenlabs_voice_id: Option<String>,

    pub wikipedia_api_url: Option<String>,

    pub shotstack_api_key: String,
    pub shotstack_api_url: Option<String>,

    pub supabase_url: String,
    pub supabase_key: String,
    pub supabase_bucket: String,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let render_strategy = match std::env::var("REEL_RENDER_STRATEGY") {
            Ok(raw) => RenderStrategy::parse(&raw).unwrap_or_else(|| {
                eprintln!(
                    "WARN: REEL_RENDER_STRATEGY='{raw}' is not 'local' or 'remote'; \
                     falling back to 'local'"
                );
                RenderStrategy::Local
            }),
            Err(_) => RenderStrategy::Local,
        };

        Self {
            bind_address: env_or("REEL_BIND", "0.0.0.0:3000"),
            database_url: env_or("REEL_DATABASE_URL", "sqlite://reels.db"),
            log_level: env_or("REEL_LOG", "info"),
            log_json: env_bool("REEL_LOG_JSON", false),
            cors_allowed_origins: std::env::var("REEL_CORS_ORIGINS").ok(),
            enable_swagger: env_bool("REEL_ENABLE_SWAGGER", true),
            render_strategy,
            target_duration_secs: parse_env("REEL_TARGET_DURATION_SECS", 15.0),
            render_poll_interval_ms: parse_env("REEL_RENDER_POLL_INTERVAL_MS", 5000),
            render_poll_max_attempts: parse_env("REEL_RENDER_POLL_MAX_ATTEMPTS", 60),
            upstream_timeout_secs: parse_env("REEL_UPSTREAM_TIMEOUT_SECS", 30),

            cohere_api_key: env_or("COHERE_API_KEY", ""),
            cohere_api_url: std::env::var("COHERE_API_URL").ok(),
            elevenlabs_api_key: env_or("ELEVENLABS_API_KEY", ""),
            elevenlabs_api_url: std::env::var("ELEVENLABS_API_URL").ok(),
            elevenlabs_voice_id: std::env::var("ELEVENLABS_VOICE_ID").ok(),
            wikipedia_api_url: std::env::var("WIKIPEDIA_API_URL").ok(),
            shotstack_api_key: env_or("SHOTSTACK_API_KEY", ""),
            shotstack_api_url: std::env::var("SHOTSTACK_API_URL").ok(),
            supabase_url: env_or("SUPABASE_URL", ""),
            supabase_key: env_or("SUPABASE_KEY", ""),
            supabase_bucket: env_or("SUPABASE_BUCKET", "reels"),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
