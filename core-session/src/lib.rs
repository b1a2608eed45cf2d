//! # Playback Session Module
//!
//! The playback session controller and its policy components.
//!
//! ## Overview
//!
//! This module handles:
//! - Seek policy enforcement against the session high-water mark
//! - Position-based adaptive quality constraints
//! - Live surface handoff (inline/fullscreen) with state preservation
//! - Host lifecycle coordination, including picture-in-picture entry
//! - The session actor multiplexing commands, engine events, and timers

pub mod config;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod quality;
pub mod seek;
pub mod surface;

pub use config::{ControllerConfig, SessionParams};
pub use controller::{PlaybackSession, SessionDeps, SessionHandle, SessionSnapshot};
pub use error::{Result, SessionError};
pub use lifecycle::{LifecycleDirective, SessionLifecycleCoordinator, PIP_DEBOUNCE};
pub use quality::QualityPolicy;
pub use seek::{SeekOutcome, SeekPolicyGuard};
pub use surface::SurfaceMigrationManager;
