//! Video surface bridge trait.
//!
//! A surface is a render target the engine's video output is attached to,
//! together with the control overlay drawn over it. The session controller
//! owns which surface is live and what its overlay shows; the host owns the
//! widget itself. All setters are synchronous posts into the host's UI
//! machinery and must not block.

use crate::engine::RepeatMode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stable identity of a surface instance, used to detect redundant attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// How video is scaled inside the surface bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    Fit,
    Fill,
    Zoom,
    FixedWidth,
    FixedHeight,
}

/// Which repeat modes the overlay's repeat toggle cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatToggleModes {
    /// Toggle disabled.
    None,
    /// Cycle through none / one / all.
    OneAndAll,
}

impl RepeatToggleModes {
    /// Modes exposed when the repeat button is configured visible.
    pub fn contains(&self, mode: RepeatMode) -> bool {
        match self {
            RepeatToggleModes::None => mode == RepeatMode::None,
            RepeatToggleModes::OneAndAll => true,
        }
    }
}

/// Half of the surface a gesture landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapZone {
    Left,
    Right,
}

/// Gestures the surface reports when a gesture handler is installed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture")]
pub enum SurfaceGesture {
    /// Double tap: left half seeks backward, right half seeks forward.
    DoubleTap { zone: TapZone },
    /// Vertical drag: left half is reserved for brightness, right half for
    /// volume. Both are no-ops unless the host wires real adjusters.
    Scroll { zone: TapZone, delta: f32 },
}

/// Callback a surface invokes for each recognized gesture.
pub type GestureHandler = Arc<dyn Fn(SurfaceGesture) + Send + Sync>;

/// Callback a surface invokes when its full-screen toggle is pressed, with
/// `true` for entering full screen.
pub type FullScreenHandler = Arc<dyn Fn(bool) + Send + Sync>;

/// A render target plus its control overlay.
pub trait VideoSurface: Send + Sync {
    /// Stable identity for redundant-attach detection.
    fn id(&self) -> SurfaceId;

    /// Whether the underlying render target can accept engine output right
    /// now. Attaching to a not-ready surface fails and is retried on the
    /// next attach request.
    fn is_ready(&self) -> bool;

    /// Show or hide the whole control overlay.
    fn set_use_controller(&self, enabled: bool);

    /// Bring the overlay up immediately (it still auto-hides per timeout).
    fn show_controller(&self);

    // Affordance visibility, one setter per configured control.
    fn set_show_speed_and_pitch_overlay(&self, visible: bool);
    fn set_show_subtitle_button(&self, visible: bool);
    fn set_show_time_text(&self, visible: bool);
    fn set_show_buffering(&self, visible: bool);
    fn set_show_forward_increment_button(&self, visible: bool);
    fn set_show_backward_increment_button(&self, visible: bool);
    fn set_show_next_track_button(&self, visible: bool);
    fn set_show_previous_track_button(&self, visible: bool);
    fn set_repeat_toggle_modes(&self, modes: RepeatToggleModes);

    /// Auto-hide timeout in milliseconds; non-positive keeps the overlay
    /// visible indefinitely.
    fn set_controller_show_timeout_ms(&self, timeout_ms: i64);

    /// Whether the overlay shows automatically on playback state changes.
    fn set_controller_auto_show(&self, auto_show: bool);

    fn set_resize_mode(&self, mode: ResizeMode);

    /// Install or clear the gesture handler.
    fn set_gesture_handler(&self, handler: Option<GestureHandler>);

    /// Install or clear the full-screen toggle handler.
    fn set_full_screen_handler(&self, handler: Option<FullScreenHandler>);
}
