//! # Surface Migration Manager
//!
//! Owns the binding between the playback engine and the video surface
//! showing its output. Handles live handoff between surfaces (inline to
//! fullscreen and back) while preserving playback position, and pushes
//! controller configuration onto whichever surface is active.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{
    FullScreenHandler, GestureHandler, HostShell, PlaybackEngine, RepeatToggleModes, SurfaceId,
    VideoSurface,
};
use tracing::{debug, info, warn};

use crate::config::{ControllerConfig, SessionParams};
use crate::error::{Result, SessionError};
use crate::seek::SeekPolicyGuard;

/// Manages which surface the engine renders into.
pub struct SurfaceMigrationManager {
    engine: Arc<dyn PlaybackEngine>,
    host: Arc<dyn HostShell>,
    active: Option<Arc<dyn VideoSurface>>,
    /// Surface to return to when fullscreen is dismissed.
    inline: Option<Arc<dyn VideoSurface>>,
    full_screen: bool,
    gesture_handler: Option<GestureHandler>,
    full_screen_handler: Option<FullScreenHandler>,
}

impl SurfaceMigrationManager {
    pub fn new(engine: Arc<dyn PlaybackEngine>, host: Arc<dyn HostShell>) -> Self {
        Self {
            engine,
            host,
            active: None,
            inline: None,
            full_screen: false,
            gesture_handler: None,
            full_screen_handler: None,
        }
    }

    /// Install the callbacks wired onto every surface this manager
    /// configures. Must be called before the first attach.
    pub fn set_handlers(
        &mut self,
        gesture: Option<GestureHandler>,
        full_screen: Option<FullScreenHandler>,
    ) {
        self.gesture_handler = gesture;
        self.full_screen_handler = full_screen;
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn active_surface_id(&self) -> Option<SurfaceId> {
        self.active.as_ref().map(|s| s.id())
    }

    /// Attach a surface as the engine's render target.
    ///
    /// Re-attaching the surface that is already active is a no-op, so
    /// hosts can call this on every layout pass without churn.
    pub async fn attach(
        &mut self,
        surface: Arc<dyn VideoSurface>,
        config: &ControllerConfig,
        params: &SessionParams,
    ) -> Result<()> {
        if self.active.as_ref().map(|s| s.id()) == Some(surface.id()) {
            debug!(surface = ?surface.id(), "surface already attached");
            return Ok(());
        }
        if !surface.is_ready() {
            return Err(SessionError::SurfaceNotReady(format!(
                "surface {:?} has no backing output",
                surface.id()
            )));
        }

        self.apply_to(&surface, config, params);
        self.engine.set_output(Some(surface.clone())).await?;

        info!(surface = ?surface.id(), "surface attached");
        if !self.full_screen {
            self.inline = Some(surface.clone());
        }
        self.active = Some(surface);
        Ok(())
    }

    /// Detach the active surface, leaving the engine without output.
    pub async fn detach(&mut self) -> Result<()> {
        if self.active.take().is_some() {
            self.engine.set_output(None).await?;
        }
        Ok(())
    }

    /// Bring the on-screen controls up on the active surface.
    pub fn show_controller(&self) {
        if let Some(surface) = &self.active {
            surface.show_controller();
        }
    }

    /// Push the controller config onto the active surface.
    pub fn apply_config(&self, config: &ControllerConfig, params: &SessionParams) {
        if let Some(surface) = &self.active {
            self.apply_to(surface, config, params);
        }
    }

    /// Hand playback off to a fullscreen surface, preserving position.
    pub async fn migrate_to_full_screen(
        &mut self,
        target: Arc<dyn VideoSurface>,
        config: &ControllerConfig,
        params: &SessionParams,
        guard: &mut SeekPolicyGuard,
    ) -> Result<()> {
        if self.full_screen {
            warn!("already fullscreen, ignoring migration request");
            return Ok(());
        }
        let resume_at = self.snapshot_position().await;

        self.host.set_full_screen(true)?;
        self.full_screen = true;

        if let Err(e) = self.attach(target, config, params).await {
            // Roll back so the host chrome matches the surface we kept.
            self.full_screen = false;
            let _ = self.host.set_full_screen(false);
            return Err(e);
        }
        self.restore_position(resume_at, guard).await;
        info!("entered fullscreen");
        Ok(())
    }

    /// Return playback to the inline surface, preserving position.
    pub async fn dismiss_full_screen(
        &mut self,
        config: &ControllerConfig,
        params: &SessionParams,
        guard: &mut SeekPolicyGuard,
    ) -> Result<()> {
        if !self.full_screen {
            return Ok(());
        }
        let resume_at = self.snapshot_position().await;

        self.host.set_full_screen(false)?;
        self.full_screen = false;

        let reattach = if let Some(inline) = self.inline.clone() {
            self.attach(inline, config, params).await
        } else {
            self.detach().await
        };
        if let Err(e) = reattach {
            // Roll back so the host chrome matches the surface we kept.
            self.full_screen = true;
            let _ = self.host.set_full_screen(true);
            return Err(e);
        }
        self.restore_position(resume_at, guard).await;
        info!("exited fullscreen");
        Ok(())
    }

    async fn snapshot_position(&self) -> (Option<Duration>, bool) {
        let position = match self.engine.position().await {
            Ok(position) => Some(position),
            Err(e) => {
                warn!(error = %e, "could not snapshot position before handoff");
                None
            }
        };
        let was_playing = self.engine.play_when_ready().await.unwrap_or(false);
        (position, was_playing)
    }

    async fn restore_position(
        &self,
        resume_at: (Option<Duration>, bool),
        guard: &mut SeekPolicyGuard,
    ) {
        let (position, was_playing) = resume_at;
        if let Some(position) = position {
            if let Err(e) = guard.force_seek(position).await {
                warn!(error = %e, "could not restore position after handoff");
            }
        }
        if was_playing {
            if let Err(e) = self.engine.play().await {
                warn!(error = %e, "could not resume playback after handoff");
            }
        }
    }

    fn apply_to(
        &self,
        surface: &Arc<dyn VideoSurface>,
        config: &ControllerConfig,
        params: &SessionParams,
    ) {
        surface.set_use_controller(params.use_controller);
        surface.set_show_speed_and_pitch_overlay(config.show_speed_and_pitch_overlay);
        surface.set_show_subtitle_button(config.show_subtitle_button);
        surface.set_show_time_text(config.show_time_text);
        surface.set_show_buffering(config.show_buffering_progress);
        surface.set_show_forward_increment_button(config.show_forward_increment_button);
        surface.set_show_backward_increment_button(config.show_backward_increment_button);
        // Track switching is host chrome; it disappears in the PIP
        // window where the controls collapse to transport only.
        let in_pip = self.host.is_in_pip();
        surface.set_show_previous_track_button(config.show_previous_track_button && !in_pip);
        surface.set_show_next_track_button(config.show_next_track_button && !in_pip);
        let toggle_modes = if config.show_repeat_mode_button {
            RepeatToggleModes::OneAndAll
        } else {
            RepeatToggleModes::None
        };
        surface.set_repeat_toggle_modes(toggle_modes);
        surface.set_controller_show_timeout_ms(config.controller_show_time_ms);
        surface.set_controller_auto_show(config.controller_auto_show);
        surface.set_resize_mode(params.resize_mode);
        if params.use_controller {
            surface.show_controller();
        }

        let gestures = if config.gesture_enabled {
            self.gesture_handler.clone()
        } else {
            None
        };
        surface.set_gesture_handler(gestures);

        let full_screen = if config.show_full_screen_button {
            self.full_screen_handler.clone()
        } else {
            None
        };
        surface.set_full_screen_handler(full_screen);
    }
}

impl std::fmt::Debug for SurfaceMigrationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceMigrationManager")
            .field("active", &self.active_surface_id())
            .field("full_screen", &self.full_screen)
            .finish()
    }
}
