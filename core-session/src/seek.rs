//! # Seek Policy Guard
//!
//! Gates user seek requests against the furthest position the session
//! has actually played. With forward seeking disallowed, seeks into
//! unplayed territory are clamped back to the high-water mark while
//! already-played ground can still be re-crossed freely. Backward
//! restrictions reject the request outright.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::PlaybackEngine;
use tracing::debug;

use crate::error::Result;

/// Outcome of a policy-checked seek request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOutcome {
    /// The seek was applied at the requested position.
    Applied,
    /// Forward seeking is disallowed and the target was past the
    /// high-water mark; playback was clamped back to the mark instead.
    ForwardDenied { clamped_to: Duration },
    /// Backward seeking is disabled; nothing was applied.
    BackwardDenied,
}

/// Tracks the session high-water mark and applies seek policy.
///
/// The mark only ever moves forward. It is fed from every observed
/// playback position and from every applied seek, and resets to zero
/// when a new media item is loaded.
pub struct SeekPolicyGuard {
    engine: Arc<dyn PlaybackEngine>,
    high_water_mark: Duration,
    allow_forward: bool,
    allow_backward: bool,
}

impl SeekPolicyGuard {
    pub fn new(engine: Arc<dyn PlaybackEngine>) -> Self {
        Self {
            engine,
            high_water_mark: Duration::ZERO,
            allow_forward: true,
            allow_backward: true,
        }
    }

    /// The furthest position this session has played.
    pub fn high_water_mark(&self) -> Duration {
        self.high_water_mark
    }

    /// Update trick-play permissions from a config swap.
    pub fn set_policy(&mut self, allow_forward: bool, allow_backward: bool) {
        self.allow_forward = allow_forward;
        self.allow_backward = allow_backward;
    }

    /// Feed an observed playback position into the mark.
    pub fn observe(&mut self, position: Duration) {
        if position > self.high_water_mark {
            self.high_water_mark = position;
        }
    }

    /// Reset the mark for a new media item.
    pub fn reset(&mut self) {
        self.high_water_mark = Duration::ZERO;
    }

    /// Apply a user seek request, subject to policy.
    pub async fn request_seek(&mut self, target: Duration) -> Result<SeekOutcome> {
        let current = self.engine.position().await?;
        self.observe(current);

        if !self.allow_forward && target > self.high_water_mark {
            debug!(
                ?target,
                mark = ?self.high_water_mark,
                "seek past high-water mark, clamping"
            );
            let clamped_to = self.high_water_mark;
            self.engine.seek_to(clamped_to).await?;
            return Ok(SeekOutcome::ForwardDenied { clamped_to });
        }

        if target < current && !self.allow_backward {
            debug!(?target, "backward seeking disabled");
            return Ok(SeekOutcome::BackwardDenied);
        }

        self.engine.seek_to(target).await?;
        self.observe(target);
        Ok(SeekOutcome::Applied)
    }

    /// Seek without policy checks. Used for internal repositioning such
    /// as restoring position after a surface handoff.
    pub async fn force_seek(&mut self, target: Duration) -> Result<()> {
        self.engine.seek_to(target).await?;
        self.observe(target);
        Ok(())
    }
}

impl std::fmt::Debug for SeekPolicyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeekPolicyGuard")
            .field("high_water_mark", &self.high_water_mark)
            .field("allow_forward", &self.allow_forward)
            .field("allow_backward", &self.allow_backward)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{
        EngineEvent, RepeatMode, ResolvedSource, VideoSize, VideoSurface,
    };
    use parking_lot::Mutex;
    use tokio::sync::broadcast;

    struct ScriptedEngine {
        position: Mutex<Duration>,
        seeks: Mutex<Vec<Duration>>,
        events: broadcast::Sender<EngineEvent>,
    }

    impl ScriptedEngine {
        fn at(position: Duration) -> Self {
            let (events, _) = broadcast::channel(8);
            Self {
                position: Mutex::new(position),
                seeks: Mutex::new(Vec::new()),
                events,
            }
        }

        fn seeks(&self) -> Vec<Duration> {
            self.seeks.lock().clone()
        }
    }

    #[async_trait]
    impl PlaybackEngine for ScriptedEngine {
        async fn set_media(
            &self,
            _source: ResolvedSource,
            _start: Duration,
        ) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn prepare(&self) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn play(&self) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn pause(&self) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn stop(&self) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn release(&self) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn seek_to(&self, position: Duration) -> bridge_traits::Result<()> {
            self.seeks.lock().push(position);
            *self.position.lock() = position;
            Ok(())
        }
        async fn position(&self) -> bridge_traits::Result<Duration> {
            Ok(*self.position.lock())
        }
        async fn play_when_ready(&self) -> bridge_traits::Result<bool> {
            Ok(false)
        }
        async fn set_max_video_size(&self, _size: VideoSize) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn set_volume(&self, _volume: f32) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn set_repeat_mode(&self, _mode: RepeatMode) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn set_output(
            &self,
            _surface: Option<Arc<dyn VideoSurface>>,
        ) -> bridge_traits::Result<()> {
            Ok(())
        }
        fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
            self.events.subscribe()
        }
    }

    #[tokio::test]
    async fn forward_seek_past_mark_is_clamped() {
        let engine = Arc::new(ScriptedEngine::at(Duration::from_secs(5)));
        let mut guard = SeekPolicyGuard::new(engine.clone());
        guard.set_policy(false, true);

        let outcome = guard.request_seek(Duration::from_secs(30)).await.unwrap();
        assert_eq!(
            outcome,
            SeekOutcome::ForwardDenied {
                clamped_to: Duration::from_secs(5)
            }
        );
        assert_eq!(engine.seeks(), vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn unrestricted_forward_seek_is_applied() {
        let engine = Arc::new(ScriptedEngine::at(Duration::from_secs(5)));
        let mut guard = SeekPolicyGuard::new(engine.clone());

        let outcome = guard.request_seek(Duration::from_secs(30)).await.unwrap();
        assert_eq!(outcome, SeekOutcome::Applied);
        assert_eq!(engine.seeks(), vec![Duration::from_secs(30)]);
        assert_eq!(guard.high_water_mark(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn backward_seek_is_applied() {
        let engine = Arc::new(ScriptedEngine::at(Duration::from_secs(20)));
        let mut guard = SeekPolicyGuard::new(engine.clone());

        let outcome = guard.request_seek(Duration::from_secs(3)).await.unwrap();
        assert_eq!(outcome, SeekOutcome::Applied);
        assert_eq!(engine.seeks(), vec![Duration::from_secs(3)]);
    }

    #[tokio::test]
    async fn forward_seek_within_played_region_is_applied() {
        let engine = Arc::new(ScriptedEngine::at(Duration::from_secs(40)));
        let mut guard = SeekPolicyGuard::new(engine.clone());
        guard.set_policy(false, true);

        // Establish a mark at 40s, jump back, then forward inside it.
        guard.request_seek(Duration::from_secs(10)).await.unwrap();
        let outcome = guard.request_seek(Duration::from_secs(35)).await.unwrap();
        assert_eq!(outcome, SeekOutcome::Applied);
        assert_eq!(guard.high_water_mark(), Duration::from_secs(40));
    }

    #[tokio::test]
    async fn mark_survives_backward_jumps() {
        let engine = Arc::new(ScriptedEngine::at(Duration::from_secs(60)));
        let mut guard = SeekPolicyGuard::new(engine.clone());
        guard.set_policy(false, true);

        guard.request_seek(Duration::ZERO).await.unwrap();
        assert_eq!(guard.high_water_mark(), Duration::from_secs(60));

        // Past the mark is still denied after the jump back.
        let outcome = guard.request_seek(Duration::from_secs(90)).await.unwrap();
        assert_eq!(
            outcome,
            SeekOutcome::ForwardDenied {
                clamped_to: Duration::from_secs(60)
            }
        );
    }

    #[tokio::test]
    async fn disabled_backward_seeking_is_rejected_without_engine_call() {
        let engine = Arc::new(ScriptedEngine::at(Duration::from_secs(20)));
        let mut guard = SeekPolicyGuard::new(engine.clone());
        guard.set_policy(true, false);

        let outcome = guard.request_seek(Duration::from_secs(1)).await.unwrap();
        assert_eq!(outcome, SeekOutcome::BackwardDenied);
        assert!(engine.seeks().is_empty());
    }

    #[tokio::test]
    async fn reset_clears_the_mark() {
        let engine = Arc::new(ScriptedEngine::at(Duration::from_secs(50)));
        let mut guard = SeekPolicyGuard::new(engine.clone());
        guard.observe(Duration::from_secs(50));
        guard.reset();
        assert_eq!(guard.high_water_mark(), Duration::ZERO);
    }

    #[tokio::test]
    async fn force_seek_bypasses_policy_and_raises_mark() {
        let engine = Arc::new(ScriptedEngine::at(Duration::ZERO));
        let mut guard = SeekPolicyGuard::new(engine.clone());
        guard.set_policy(false, false);

        guard.force_seek(Duration::from_secs(120)).await.unwrap();
        assert_eq!(engine.seeks(), vec![Duration::from_secs(120)]);
        assert_eq!(guard.high_water_mark(), Duration::from_secs(120));
    }
}
