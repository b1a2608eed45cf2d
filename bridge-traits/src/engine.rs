//! Playback engine bridge trait and supporting types.
//!
//! The engine is the external decode/buffer/render pipeline. This layer never
//! looks inside it; it issues transport calls, constrains track selection,
//! moves the video output between surfaces, and listens to the engine's
//! change-notification stream.

use crate::error::Result;
use crate::media::ResolvedSource;
use crate::surface::VideoSurface;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Maximum video resolution constraint applied to track selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Content repeat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    None,
    One,
    All,
}

/// Change notifications delivered by the engine.
///
/// The engine may decode and render on its own threads, but notifications are
/// consumed on the session's single control sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    /// Playback transitioned between actively playing and not playing
    /// (paused, stopped, or buffering-idle).
    IsPlayingChanged { is_playing: bool },
    /// The selected track set changed.
    TracksChanged,
    /// The engine volume changed.
    VolumeChanged { volume: f32 },
    /// Opaque engine-level failure. Terminal for the session; retry policy
    /// for decode/network failures belongs to the engine, not this layer.
    Failure { message: String },
}

/// External transport interface of the playback engine.
///
/// All control calls are serialized through the session's control sequence
/// and are expected to be fast and non-blocking; results arrive through the
/// [`EngineEvent`] stream.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Load a resolved source, positioning playback at `start_position`.
    async fn set_media(&self, source: ResolvedSource, start_position: Duration) -> Result<()>;

    /// Prepare the loaded source for playback.
    async fn prepare(&self) -> Result<()>;

    /// Begin or resume playback.
    async fn play(&self) -> Result<()>;

    /// Pause playback, keeping the session loaded.
    async fn pause(&self) -> Result<()>;

    /// Stop playback and reset to idle.
    async fn stop(&self) -> Result<()>;

    /// Release all engine resources. The instance is unusable afterwards.
    async fn release(&self) -> Result<()>;

    /// Seek to an absolute position.
    async fn seek_to(&self, position: Duration) -> Result<()>;

    /// Current playback position.
    async fn position(&self) -> Result<Duration>;

    /// Whether playback will progress when the engine is ready.
    async fn play_when_ready(&self) -> Result<bool>;

    /// Constrain video track selection to at most `max` resolution.
    async fn set_max_video_size(&self, max: VideoSize) -> Result<()>;

    /// Set playback volume in `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Set the content repeat mode.
    async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<()>;

    /// Bind the engine's video output to `surface`, or detach it entirely
    /// with `None`. At most one surface is bound at any time; rebinding must
    /// not interrupt the decode pipeline.
    async fn set_output(&self, surface: Option<Arc<dyn VideoSurface>>) -> Result<()>;

    /// Subscribe to the engine's change-notification stream.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}

/// Optional upstream media cache layer.
///
/// The cache handle is an explicitly-injected dependency with process-scoped
/// lifecycle: opened at process start, closed at process shutdown. Sessions
/// only thread the handle into the engine build; they never open or close it.
pub trait MediaCache: Send + Sync {
    fn open(&self) -> Result<()>;
    fn close(&self) -> Result<()>;
    fn is_open(&self) -> bool;
}

/// Session-level settings supplied when building an engine instance.
#[derive(Clone)]
pub struct EngineSettings {
    /// Seek-back increment for transport controls.
    pub seek_back_increment: Duration,
    /// Seek-forward increment for transport controls.
    pub seek_forward_increment: Duration,
    /// Whether the engine should negotiate audio focus with the host.
    pub handle_audio_focus: bool,
    /// Upstream cache layer to read through, if the process opened one.
    pub cache: Option<Arc<dyn MediaCache>>,
    /// Track constraint applied before the first tick of the quality loop.
    pub initial_max_video_size: Option<VideoSize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seek_back_increment: Duration::from_millis(10_000),
            seek_forward_increment: Duration::from_millis(10_000),
            handle_audio_focus: true,
            cache: None,
            initial_max_video_size: None,
        }
    }
}

impl fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSettings")
            .field("seek_back_increment", &self.seek_back_increment)
            .field("seek_forward_increment", &self.seek_forward_increment)
            .field("handle_audio_focus", &self.handle_audio_focus)
            .field("cache", &self.cache.as_ref().map(|c| c.is_open()))
            .field("initial_max_video_size", &self.initial_max_video_size)
            .finish()
    }
}

/// Builds engine instances for new sessions.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn build(&self, settings: EngineSettings) -> Result<Arc<dyn PlaybackEngine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_settings_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.seek_back_increment, Duration::from_millis(10_000));
        assert_eq!(
            settings.seek_forward_increment,
            Duration::from_millis(10_000)
        );
        assert!(settings.handle_audio_focus);
        assert!(settings.cache.is_none());
        assert!(settings.initial_max_video_size.is_none());
    }

    #[test]
    fn video_size_display() {
        assert_eq!(VideoSize::new(960, 540).to_string(), "960x540");
    }

    #[test]
    fn engine_event_serialization() {
        let event = EngineEvent::IsPlayingChanged { is_playing: true };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("IsPlayingChanged"));

        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
