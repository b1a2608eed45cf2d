//! # Session Configuration
//!
//! Controller affordance flags and session-wide parameters. The
//! controller config can be swapped at runtime; session params are
//! fixed when the session starts.

use std::time::Duration;

use bridge_traits::{RepeatMode, ResizeMode};
use serde::{Deserialize, Serialize};

use crate::quality::QualityPolicy;

/// Runtime-swappable configuration for the playback surface chrome.
///
/// Every flag maps onto a [`bridge_traits::VideoSurface`] setter; applying a
/// new config pushes the whole set to the active surface at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Show the playback speed and pitch overlay control.
    pub show_speed_and_pitch_overlay: bool,
    /// Show the subtitle selection button.
    pub show_subtitle_button: bool,
    /// Show the current position and total duration text.
    pub show_time_text: bool,
    /// Show a spinner while the engine is buffering.
    pub show_buffering_progress: bool,
    /// Show the seek-forward increment button.
    pub show_forward_increment_button: bool,
    /// Show the seek-backward increment button.
    pub show_backward_increment_button: bool,
    /// Show the previous-track button.
    pub show_previous_track_button: bool,
    /// Show the next-track button.
    pub show_next_track_button: bool,
    /// Show the repeat mode toggle button.
    pub show_repeat_mode_button: bool,
    /// Show the fullscreen toggle button.
    pub show_full_screen_button: bool,
    /// Enable double-tap seek gestures on the surface.
    pub gesture_enabled: bool,
    /// Allow user seeks past the furthest position already played.
    pub allow_forward_seeking: bool,
    /// Allow user seeks backward.
    pub allow_backward_seeking: bool,
    /// Whether controls appear automatically on playback state changes.
    pub controller_auto_show: bool,
    /// How long the controls stay visible before auto-hiding, in ms.
    /// Zero or negative means they never auto-hide.
    pub controller_show_time_ms: i64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            show_speed_and_pitch_overlay: false,
            show_subtitle_button: true,
            show_time_text: true,
            show_buffering_progress: false,
            show_forward_increment_button: false,
            show_backward_increment_button: false,
            show_previous_track_button: true,
            show_next_track_button: true,
            show_repeat_mode_button: false,
            show_full_screen_button: true,
            gesture_enabled: false,
            allow_forward_seeking: true,
            allow_backward_seeking: true,
            controller_auto_show: true,
            controller_show_time_ms: 5_000,
        }
    }
}

/// Parameters fixed for the lifetime of one session.
#[derive(Clone)]
pub struct SessionParams {
    /// Seek distance for the backward increment button.
    pub seek_back_increment: Duration,
    /// Seek distance for the forward increment button.
    pub seek_forward_increment: Duration,
    /// Initial repeat mode.
    pub repeat_mode: RepeatMode,
    /// How video is fitted into the surface bounds.
    pub resize_mode: ResizeMode,
    /// Start playback as soon as the first item is prepared.
    pub auto_play: bool,
    /// React to host lifecycle transitions (pause/resume/stop).
    pub handle_lifecycle: bool,
    /// Enter picture-in-picture when the host is backgrounded mid-playback.
    pub enable_pip: bool,
    /// Enter picture-in-picture on back-press while resumed. Only
    /// honored when `enable_pip` is also set.
    pub enable_pip_when_back_pressed: bool,
    /// Let the engine manage platform audio focus.
    pub handle_audio_focus: bool,
    /// Whether the surface shows on-screen controls at all.
    pub use_controller: bool,
    /// Initial volume, `0.0..=1.0`.
    pub volume: f32,
    /// Adaptive quality tiers and cadence.
    pub quality: QualityPolicy,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            seek_back_increment: Duration::from_millis(10_000),
            seek_forward_increment: Duration::from_millis(10_000),
            repeat_mode: RepeatMode::None,
            resize_mode: ResizeMode::Fill,
            auto_play: true,
            handle_lifecycle: true,
            enable_pip: false,
            enable_pip_when_back_pressed: false,
            handle_audio_focus: true,
            use_controller: true,
            volume: 1.0,
            quality: QualityPolicy::default(),
        }
    }
}

impl std::fmt::Debug for SessionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionParams")
            .field("seek_back_increment", &self.seek_back_increment)
            .field("seek_forward_increment", &self.seek_forward_increment)
            .field("repeat_mode", &self.repeat_mode)
            .field("resize_mode", &self.resize_mode)
            .field("auto_play", &self.auto_play)
            .field("handle_lifecycle", &self.handle_lifecycle)
            .field("enable_pip", &self.enable_pip)
            .field(
                "enable_pip_when_back_pressed",
                &self.enable_pip_when_back_pressed,
            )
            .field("use_controller", &self.use_controller)
            .field("volume", &self.volume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_config_defaults() {
        let config = ControllerConfig::default();
        assert!(config.show_subtitle_button);
        assert!(config.show_time_text);
        assert!(config.show_previous_track_button);
        assert!(config.show_next_track_button);
        assert!(config.show_full_screen_button);
        assert!(!config.show_repeat_mode_button);
        assert!(!config.gesture_enabled);
        assert_eq!(config.controller_show_time_ms, 5_000);
        assert!(config.allow_forward_seeking);
    }

    #[test]
    fn controller_config_roundtrips_through_json() {
        let config = ControllerConfig {
            allow_forward_seeking: false,
            show_repeat_mode_button: true,
            ..ControllerConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{"show_full_screen_button": true}"#).unwrap();
        assert!(config.show_full_screen_button);
        assert!(config.controller_auto_show);
    }

    #[test]
    fn session_params_defaults() {
        let params = SessionParams::default();
        assert_eq!(params.seek_forward_increment, Duration::from_millis(10_000));
        assert!(params.auto_play);
        assert!(params.handle_lifecycle);
        assert!(!params.enable_pip);
        assert_eq!(params.volume, 1.0);
    }
}
