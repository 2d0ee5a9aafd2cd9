//! Render status poller.
//!
//! Drives a [`RenderJob`] through its state machine:
//! `queued → rendering → done` (success) or `→ failed`, with a
//! synthetic `timed-out` terminal imposed by the poller itself once the
//! attempt budget is exhausted. The transition rule lives in the pure
//! [`poll_decision`] function; [`await_render`] merely feeds it one
//! status query per attempt with a fixed sleep in between. Polling is
//! sequential and single-flight per render id — one outstanding status
//! query at a time — and read-only, so dropping the future cancels
//! cleanly with no side effects.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::render::{RenderJob, RenderStatus};

/// Anything that can answer "what is the state of render job X?".
#[async_trait]
pub trait RenderStatusSource: Send + Sync {
    async fn render_status(&self, render_id: &str) -> Result<RenderJob, PipelineError>;
}

/// Outcome of one poll attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Terminal success: the result URL is available.
    Finished(String),
    /// Terminal failure reported by the render service.
    Failed,
    /// The attempt budget is exhausted without a terminal state.
    TimedOut,
    /// Not terminal yet; sleep and poll again.
    Continue,
}

/// Pure transition function of (job status, attempt index) — `attempt`
/// is zero-based, so the decision after the final allowed query sees
/// `attempt == max_attempts - 1`.
pub fn poll_decision(job: &RenderJob, attempt: u32, max_attempts: u32) -> PollOutcome {
    let exhausted = attempt + 1 >= max_attempts;
    match job.status {
        // `done` without a URL means the vendor is still publishing the
        // asset; keep polling rather than returning a dead link.
        RenderStatus::Done => match &job.result_url {
            Some(url) => PollOutcome::Finished(url.clone()),
            None if exhausted => PollOutcome::TimedOut,
            None => PollOutcome::Continue,
        },
        RenderStatus::Failed => PollOutcome::Failed,
        RenderStatus::Queued | RenderStatus::Rendering if exhausted => PollOutcome::TimedOut,
        RenderStatus::Queued | RenderStatus::Rendering => PollOutcome::Continue,
    }
}

/// Poll `source` until the job reaches a terminal state.
///
/// Issues at most `max_attempts` status queries, sleeping `interval`
/// between consecutive attempts. Returns the result URL on success;
/// [`PipelineError::RenderFailed`] the moment the service reports
/// failure; [`PipelineError::RenderTimeout`] once the budget is spent.
pub async fn await_render<S: RenderStatusSource + ?Sized>(
    source: &S,
    render_id: &str,
    max_attempts: u32,
    interval: Duration,
) -> Result<String, PipelineError> {
    for attempt in 0..max_attempts {
        let job = source.render_status(render_id).await?;
        debug!(render_id, attempt, status = job.status.as_str(), "render status polled");

        match poll_decision(&job, attempt, max_attempts) {
            PollOutcome::Finished(url) => {
                info!(render_id, attempts = attempt + 1, "render finished");
                return Ok(url);
            }
            PollOutcome::Failed => {
                return Err(PipelineError::RenderFailed {
                    render_id: render_id.to_owned(),
                });
            }
            PollOutcome::TimedOut => break,
            PollOutcome::Continue => tokio::time::sleep(interval).await,
        }
    }

    Err(PipelineError::RenderTimeout {
        render_id: render_id.to_owned(),
        max_attempts,
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Replays a scripted sequence of statuses, repeating the last one
    /// forever, and counts how many queries were issued.
    struct ScriptedSource {
        script: Mutex<Vec<RenderJob>>,
        queries: AtomicU32,
    }

    impl ScriptedSource {
        fn new(script: Vec<RenderJob>) -> Self {
            Self {
                script: Mutex::new(script),
                queries: AtomicU32::new(0),
            }
        }

        fn query_count(&self) -> u32 {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderStatusSource for ScriptedSource {
        async fn render_status(&self, _render_id: &str) -> Result<RenderJob, PipelineError> {
            let n = self.queries.fetch_add(1, Ordering::SeqCst) as usize;
            let script = self.script.lock().unwrap();
            let idx = n.min(script.len() - 1);
            Ok(script[idx].clone())
        }
    }

    fn job(status: RenderStatus, url: Option<&str>) -> RenderJob {
        RenderJob {
            render_id: "r-1".to_owned(),
            status,
            result_url: url.map(str::to_owned),
        }
    }

    #[test]
    fn decision_finishes_on_done_with_url() {
        let outcome = poll_decision(&job(RenderStatus::Done, Some("https://v/x.mp4")), 0, 10);
        assert_eq!(outcome, PollOutcome::Finished("https://v/x.mp4".to_owned()));
    }

    #[test]
    fn decision_fails_immediately_on_failed() {
        assert_eq!(poll_decision(&job(RenderStatus::Failed, None), 0, 10), PollOutcome::Failed);
    }

    #[test]
    fn decision_continues_while_budget_remains() {
        assert_eq!(poll_decision(&job(RenderStatus::Queued, None), 3, 10), PollOutcome::Continue);
        assert_eq!(
            poll_decision(&job(RenderStatus::Rendering, None), 8, 10),
            PollOutcome::Continue
        );
    }

    #[test]
    fn decision_times_out_on_last_attempt() {
        assert_eq!(
            poll_decision(&job(RenderStatus::Rendering, None), 9, 10),
            PollOutcome::TimedOut
        );
    }

    #[test]
    fn done_without_url_keeps_polling() {
        assert_eq!(poll_decision(&job(RenderStatus::Done, None), 0, 10), PollOutcome::Continue);
        assert_eq!(poll_decision(&job(RenderStatus::Done, None), 9, 10), PollOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn await_render_returns_url_and_stops_querying() {
        let source = ScriptedSource::new(vec![
            job(RenderStatus::Queued, None),
            job(RenderStatus::Rendering, None),
            job(RenderStatus::Done, Some("https://v/out.mp4")),
        ]);

        let url = await_render(&source, "r-1", 10, Duration::from_secs(5))
            .await
            .expect("render should finish");
        assert_eq!(url, "https://v/out.mp4");
        // No further queries after the success exit.
        assert_eq!(source.query_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn await_render_times_out_after_exactly_max_attempts_queries() {
        let source = ScriptedSource::new(vec![job(RenderStatus::Rendering, None)]);

        let err = await_render(&source, "r-1", 4, Duration::from_secs(5))
            .await
            .expect_err("render should time out");
        assert!(matches!(
            err,
            PipelineError::RenderTimeout { max_attempts: 4, .. }
        ));
        assert_eq!(source.query_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn await_render_fails_fast_on_failed_status() {
        let source = ScriptedSource::new(vec![
            job(RenderStatus::Queued, None),
            job(RenderStatus::Failed, None),
        ]);

        let err = await_render(&source, "r-1", 10, Duration::from_secs(5))
            .await
            .expect_err("render should fail");
        assert!(matches!(err, PipelineError::RenderFailed { .. }));
        assert_eq!(source.query_count(), 2);
    }
}
