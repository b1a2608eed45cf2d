//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback session control layer
//! and its external collaborators. The session controller never decodes,
//! renders, or talks to the window system itself; it drives a
//! [`PlaybackEngine`](engine::PlaybackEngine) through transport calls, moves
//! video output between [`VideoSurface`](surface::VideoSurface) instances, and
//! asks the [`HostShell`](host::HostShell) for picture-in-picture and display
//! mode transitions.
//!
//! ## Traits
//!
//! ### Playback
//! - [`PlaybackEngine`](engine::PlaybackEngine) - Transport controls and state
//!   notifications of the external decode/render pipeline
//! - [`EngineFactory`](engine::EngineFactory) - Builds an engine instance from
//!   session-level settings (seek increments, audio focus, cache)
//! - [`MediaResolver`](media::MediaResolver) - DRM-aware resolution of a
//!   [`MediaItem`](media::MediaItem) into a playable source
//! - [`MediaCache`](engine::MediaCache) - Optional upstream cache layer with
//!   process-scoped lifecycle
//!
//! ### Host Integration
//! - [`HostShell`](host::HostShell) - PIP entry, display mode, media session
//!   registration, transient user notices
//! - [`VideoSurface`](surface::VideoSurface) - A render target with a control
//!   overlay whose affordances the session configures
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so implementations can be
//! shared across async tasks. Control calls are expected to be fast and
//! non-blocking; engines deliver results asynchronously through their event
//! stream.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should convert platform-specific errors to
//! `BridgeError` with actionable messages.

pub mod engine;
pub mod error;
pub mod host;
pub mod media;
pub mod surface;

pub use error::{BridgeError, Result};

// Re-export commonly used types
pub use engine::{
    EngineEvent, EngineFactory, EngineSettings, MediaCache, PlaybackEngine, RepeatMode, VideoSize,
};
pub use host::{Advisory, HostShell, LifecycleEvent, MediaSessionHandle, PipParams};
pub use media::{DrmConfig, MediaItem, MediaResolver, ResolvedSource};
pub use surface::{
    FullScreenHandler, GestureHandler, RepeatToggleModes, ResizeMode, SurfaceGesture, SurfaceId,
    TapZone, VideoSurface,
};
