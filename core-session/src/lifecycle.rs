//! # Session Lifecycle Coordinator
//!
//! Translates host lifecycle transitions into transport directives.
//! Entering picture-in-picture fires a spurious pause/stop pair on some
//! hosts, so PIP entry arms a short debounce window; a stop arriving
//! inside that window while the host is in PIP is treated as part of
//! the transition and ignored.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{HostShell, LifecycleEvent, PipParams};
use tokio::time::Instant;
use tracing::debug;

/// Debounce window for the pause/stop pair raised by PIP entry.
pub const PIP_DEBOUNCE: Duration = Duration::from_millis(500);

/// What the session actor should do in response to a lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleDirective {
    PauseEngine,
    PlayEngine,
    StopEngine,
    EnterPip(PipParams),
    ArmQuality,
    DisarmQuality,
    ShowController,
}

/// Reacts to host lifecycle events on behalf of the session actor.
pub struct SessionLifecycleCoordinator {
    host: Arc<dyn HostShell>,
    handle_lifecycle: bool,
    enable_pip: bool,
    enable_pip_when_back_pressed: bool,
    pip_title: Option<String>,
    pip_debounce_deadline: Option<Instant>,
}

impl SessionLifecycleCoordinator {
    pub fn new(
        host: Arc<dyn HostShell>,
        handle_lifecycle: bool,
        enable_pip: bool,
        enable_pip_when_back_pressed: bool,
        pip_title: Option<String>,
    ) -> Self {
        Self {
            host,
            handle_lifecycle,
            enable_pip,
            enable_pip_when_back_pressed,
            pip_title,
            pip_debounce_deadline: None,
        }
    }

    /// Map a lifecycle event to transport directives.
    ///
    /// `play_when_ready` is the engine's current play intent, read by
    /// the actor just before dispatching here.
    pub fn on_event(
        &mut self,
        event: LifecycleEvent,
        play_when_ready: bool,
    ) -> Vec<LifecycleDirective> {
        match event {
            LifecycleEvent::Pause => self.on_pause(play_when_ready),
            LifecycleEvent::Resume => self.on_resume(play_when_ready),
            LifecycleEvent::Stop => self.on_stop(),
        }
    }

    fn on_pause(&mut self, play_when_ready: bool) -> Vec<LifecycleDirective> {
        let mut out = Vec::new();
        if self.handle_lifecycle {
            out.push(LifecycleDirective::PauseEngine);
            out.push(LifecycleDirective::DisarmQuality);
        }
        if self.enable_pip && play_when_ready && self.host.pip_supported() {
            // The window absorbs the stop that PIP entry raises on
            // some hosts.
            self.pip_debounce_deadline = Some(Instant::now() + PIP_DEBOUNCE);
            if self.host.is_at_least_resumed() {
                let params = PipParams {
                    title: self.pip_title.clone(),
                    ..PipParams::default()
                };
                out.push(LifecycleDirective::EnterPip(params));
            }
        }
        out
    }

    /// React to a host back-press.
    ///
    /// When PIP-on-back is enabled, a back-press while the host is
    /// resumed shrinks playback into the PIP window rather than leaving
    /// the player, and playback keeps running either way.
    pub fn on_back_pressed(&mut self) -> Vec<LifecycleDirective> {
        if !(self.enable_pip && self.enable_pip_when_back_pressed) {
            return Vec::new();
        }
        let mut out = Vec::new();
        if self.host.is_at_least_resumed() && self.host.pip_supported() {
            let params = PipParams {
                title: self.pip_title.clone(),
                ..PipParams::default()
            };
            out.push(LifecycleDirective::EnterPip(params));
        }
        out.push(LifecycleDirective::PlayEngine);
        out
    }

    fn on_resume(&mut self, play_when_ready: bool) -> Vec<LifecycleDirective> {
        let mut out = Vec::new();
        if self.handle_lifecycle {
            out.push(LifecycleDirective::PlayEngine);
            out.push(LifecycleDirective::ArmQuality);
        }
        if self.enable_pip && play_when_ready {
            out.push(LifecycleDirective::ShowController);
        }
        out
    }

    fn on_stop(&mut self) -> Vec<LifecycleDirective> {
        let in_debounce = self
            .pip_debounce_deadline
            .is_some_and(|deadline| Instant::now() < deadline);
        if self.enable_pip && self.host.is_in_pip() && in_debounce {
            debug!("stop during picture-in-picture transition, ignoring");
            return Vec::new();
        }
        vec![
            LifecycleDirective::StopEngine,
            LifecycleDirective::DisarmQuality,
        ]
    }
}

impl std::fmt::Debug for SessionLifecycleCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycleCoordinator")
            .field("handle_lifecycle", &self.handle_lifecycle)
            .field("enable_pip", &self.enable_pip)
            .field("debounce_armed", &self.pip_debounce_deadline.is_some())
            .finish()
    }
}
