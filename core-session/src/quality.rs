//! # Adaptive Quality Policy
//!
//! Position-based video quality tiers. A session that has played past
//! the upgrade threshold is allowed the high tier; earlier positions
//! are capped to the low tier. The controller re-evaluates the policy
//! on a fixed cadence while playback is active.

use std::time::Duration;

use bridge_traits::VideoSize;
use serde::{Deserialize, Serialize};

/// Quality tiers and the cadence at which the controller re-evaluates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPolicy {
    /// Position at which playback is considered established enough for
    /// the high tier.
    pub upgrade_position: Duration,
    /// Maximum video size before the upgrade position is reached.
    pub low_tier: VideoSize,
    /// Maximum video size afterwards.
    pub high_tier: VideoSize,
    /// How often the active tier is re-evaluated while playing.
    pub interval: Duration,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            upgrade_position: Duration::from_millis(15_000),
            low_tier: VideoSize::new(426, 240),
            high_tier: VideoSize::new(960, 540),
            interval: Duration::from_millis(10_000),
        }
    }
}

impl QualityPolicy {
    /// The maximum video size allowed at the given playback position.
    pub fn tier_for(&self, position: Duration) -> VideoSize {
        if position >= self.upgrade_position {
            self.high_tier
        } else {
            self.low_tier
        }
    }
}
