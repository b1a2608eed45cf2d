//! # Playback Session Controller
//!
//! Top-level composition of the session layer. One actor task owns all
//! mutable session state and multiplexes user commands, engine
//! notifications, the position reporter, and the adaptive-quality
//! deadline through a single `select!` loop. Engine calls are awaited
//! inside the actor, so they retire in arrival order.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{
    EngineEvent, EngineFactory, EngineSettings, FullScreenHandler, GestureHandler, HostShell,
    LifecycleEvent, MediaCache, MediaItem, MediaResolver, MediaSessionHandle, PlaybackEngine,
    RepeatMode, SurfaceGesture, TapZone, VideoSurface,
};
use core_runtime::{EventBus, EventStream, SeekDirection, SessionEvent, DEFAULT_EVENT_BUFFER_SIZE};
use futures::future;
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, sleep_until, Instant, Interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{ControllerConfig, SessionParams};
use crate::error::{Result, SessionError};
use crate::lifecycle::{LifecycleDirective, SessionLifecycleCoordinator};
use crate::seek::{SeekOutcome, SeekPolicyGuard};
use crate::surface::SurfaceMigrationManager;

/// Command channel depth. Commands are small; backpressure past this
/// point means the actor is wedged on an engine call.
const COMMAND_BUFFER: usize = 32;

/// Cadence of the position reporter.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// Public Surface
// ============================================================================

/// External collaborators the session is built from.
pub struct SessionDeps {
    pub engine_factory: Arc<dyn EngineFactory>,
    pub resolver: Arc<dyn MediaResolver>,
    pub host: Arc<dyn HostShell>,
    pub cache: Option<Arc<dyn MediaCache>>,
}

/// Point-in-time view of the session for synchronous host queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub position_ms: u64,
    pub is_playing: bool,
    pub is_full_screen: bool,
}

/// Cloneable command sender for a running session.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| SessionError::SessionClosed)
    }

    /// Replace the playlist. Items are resolved in order; the first
    /// one that resolves is loaded.
    pub async fn set_media_items(&self, items: Vec<MediaItem>) -> Result<()> {
        self.send(Command::SetMediaItems(items)).await
    }

    /// Swap the controller config and re-apply it to the active surface.
    pub async fn set_config(&self, config: ControllerConfig) -> Result<()> {
        self.send(Command::SetConfig(config)).await
    }

    /// Request a policy-checked seek.
    pub async fn request_seek(&self, target: Duration) -> Result<()> {
        self.send(Command::RequestSeek(target)).await
    }

    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(Command::SetVolume(volume)).await
    }

    pub async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<()> {
        self.send(Command::SetRepeatMode(mode)).await
    }

    /// Bind a surface as the engine's render target.
    pub async fn attach_surface(&self, surface: Arc<dyn VideoSurface>) -> Result<()> {
        self.send(Command::AttachSurface(surface)).await
    }

    /// Hand playback off to a fullscreen surface.
    pub async fn enter_full_screen(&self, surface: Arc<dyn VideoSurface>) -> Result<()> {
        self.send(Command::EnterFullScreen(surface)).await
    }

    /// Return playback to the inline surface.
    pub async fn exit_full_screen(&self) -> Result<()> {
        self.send(Command::ExitFullScreen).await
    }

    /// Forward a host lifecycle transition.
    pub async fn lifecycle(&self, event: LifecycleEvent) -> Result<()> {
        self.send(Command::Lifecycle(event)).await
    }

    /// Forward a host back-press. With PIP-on-back enabled this shrinks
    /// playback into the PIP window instead of leaving the player.
    pub async fn back_pressed(&self) -> Result<()> {
        self.send(Command::BackPressed).await
    }
}

/// A running playback session.
pub struct PlaybackSession {
    handle: SessionHandle,
    engine: Arc<dyn PlaybackEngine>,
    bus: EventBus,
    snapshot: Arc<Mutex<SessionSnapshot>>,
    cancel: CancellationToken,
    actor: tokio::task::JoinHandle<()>,
}

impl PlaybackSession {
    /// Build the engine, spawn the session actor, and return the
    /// running session.
    pub async fn start(
        deps: SessionDeps,
        params: SessionParams,
        config: ControllerConfig,
    ) -> Result<Self> {
        let settings = EngineSettings {
            seek_back_increment: params.seek_back_increment,
            seek_forward_increment: params.seek_forward_increment,
            handle_audio_focus: params.handle_audio_focus,
            cache: deps.cache.clone(),
            initial_max_video_size: Some(params.quality.low_tier),
        };
        let engine = deps.engine_factory.build(settings).await?;
        engine.set_volume(params.volume.clamp(0.0, 1.0)).await?;
        engine.set_repeat_mode(params.repeat_mode).await?;

        let bus = EventBus::new(DEFAULT_EVENT_BUFFER_SIZE);
        let snapshot = Arc::new(Mutex::new(SessionSnapshot::default()));
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

        let mut surfaces = SurfaceMigrationManager::new(engine.clone(), deps.host.clone());
        let gesture_tx = tx.clone();
        let gesture: GestureHandler = Arc::new(move |gesture| {
            let _ = gesture_tx.try_send(Command::Gesture(gesture));
        });
        let toggle_tx = tx.clone();
        let full_screen: FullScreenHandler = Arc::new(move |entering| {
            let _ = toggle_tx.try_send(Command::FullScreenToggled(entering));
        });
        surfaces.set_handlers(Some(gesture), Some(full_screen));

        let lifecycle = SessionLifecycleCoordinator::new(
            deps.host.clone(),
            params.handle_lifecycle,
            params.enable_pip,
            params.enable_pip_when_back_pressed,
            None,
        );

        let actor = SessionActor {
            engine: engine.clone(),
            engine_events: Some(engine.subscribe()),
            resolver: deps.resolver,
            host: deps.host,
            guard: SeekPolicyGuard::new(engine.clone()),
            surfaces,
            lifecycle,
            media_session: None,
            params,
            config,
            bus: bus.clone(),
            snapshot: snapshot.clone(),
            commands: rx,
            cancel: cancel.clone(),
            reporter: interval(REPORT_INTERVAL),
            quality_deadline: None,
            last_reported: None,
        };
        let actor = tokio::spawn(actor.run());

        info!("playback session started");
        Ok(Self {
            handle: SessionHandle { tx },
            engine,
            bus,
            snapshot,
            cancel,
            actor,
        })
    }

    /// A cloneable command sender for this session.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Subscribe to session events.
    pub fn events(&self) -> EventStream {
        EventStream::new(self.bus.subscribe())
    }

    /// The underlying engine, for hosts that install their own
    /// listeners once the instance is ready.
    pub fn engine(&self) -> Arc<dyn PlaybackEngine> {
        self.engine.clone()
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        *self.snapshot.lock()
    }

    /// Tear the session down and release the engine.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if self.actor.await.is_err() {
            warn!("session actor panicked during shutdown");
        }
    }
}

// ============================================================================
// Actor
// ============================================================================

enum Command {
    SetMediaItems(Vec<MediaItem>),
    SetConfig(ControllerConfig),
    RequestSeek(Duration),
    SetVolume(f32),
    SetRepeatMode(RepeatMode),
    AttachSurface(Arc<dyn VideoSurface>),
    EnterFullScreen(Arc<dyn VideoSurface>),
    ExitFullScreen,
    Lifecycle(LifecycleEvent),
    BackPressed,
    Gesture(SurfaceGesture),
    FullScreenToggled(bool),
}

struct SessionActor {
    engine: Arc<dyn PlaybackEngine>,
    engine_events: Option<broadcast::Receiver<EngineEvent>>,
    resolver: Arc<dyn MediaResolver>,
    host: Arc<dyn HostShell>,
    guard: SeekPolicyGuard,
    surfaces: SurfaceMigrationManager,
    lifecycle: SessionLifecycleCoordinator,
    media_session: Option<Box<dyn MediaSessionHandle>>,
    params: SessionParams,
    config: ControllerConfig,
    bus: EventBus,
    snapshot: Arc<Mutex<SessionSnapshot>>,
    commands: mpsc::Receiver<Command>,
    cancel: CancellationToken,
    reporter: Interval,
    quality_deadline: Option<Instant>,
    last_reported: Option<u64>,
}

/// Sleeps until `deadline`, or forever when there is none.
async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Receives the next engine event, or waits forever once the engine's
/// event channel has closed.
async fn next_engine_event(
    rx: &mut Option<broadcast::Receiver<EngineEvent>>,
) -> std::result::Result<EngineEvent, broadcast::error::RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => future::pending().await,
    }
}

impl SessionActor {
    async fn run(mut self) {
        self.guard.set_policy(
            self.config.allow_forward_seeking,
            self.config.allow_backward_seeking,
        );
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                event = next_engine_event(&mut self.engine_events) => match event {
                    Ok(event) => self.handle_engine_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "engine event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        self.engine_events = None;
                    }
                },
                _ = self.reporter.tick() => self.report_position().await,
                _ = sleep_until_opt(self.quality_deadline) => self.quality_tick().await,
            }
        }
        self.teardown().await;
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetMediaItems(items) => self.load_media(items).await,
            Command::SetConfig(config) => {
                self.config = config;
                self.guard.set_policy(
                    self.config.allow_forward_seeking,
                    self.config.allow_backward_seeking,
                );
                self.surfaces.apply_config(&self.config, &self.params);
                debug!("controller config replaced");
            }
            Command::RequestSeek(target) => self.seek(target).await,
            Command::SetVolume(volume) => {
                if let Err(e) = self.engine.set_volume(volume.clamp(0.0, 1.0)).await {
                    warn!(error = %e, "set_volume failed");
                }
            }
            Command::SetRepeatMode(mode) => {
                if let Err(e) = self.engine.set_repeat_mode(mode).await {
                    warn!(error = %e, "set_repeat_mode failed");
                }
            }
            Command::AttachSurface(surface) => {
                if let Err(e) = self
                    .surfaces
                    .attach(surface, &self.config, &self.params)
                    .await
                {
                    warn!(error = %e, "surface attach failed");
                    let _ = self.bus.emit(SessionEvent::SurfaceAttachFailed {
                        reason: e.to_string(),
                    });
                }
            }
            Command::EnterFullScreen(surface) => {
                match self
                    .surfaces
                    .migrate_to_full_screen(surface, &self.config, &self.params, &mut self.guard)
                    .await
                {
                    Ok(()) => {
                        self.snapshot.lock().is_full_screen = true;
                        let _ = self.bus.emit(SessionEvent::FullScreenEntered);
                    }
                    Err(e) => {
                        warn!(error = %e, "fullscreen migration failed");
                        let _ = self.bus.emit(SessionEvent::SurfaceAttachFailed {
                            reason: e.to_string(),
                        });
                    }
                }
            }
            Command::ExitFullScreen => {
                match self
                    .surfaces
                    .dismiss_full_screen(&self.config, &self.params, &mut self.guard)
                    .await
                {
                    Ok(()) => {
                        self.snapshot.lock().is_full_screen = false;
                        let _ = self.bus.emit(SessionEvent::FullScreenExited);
                    }
                    Err(e) => {
                        warn!(error = %e, "fullscreen dismissal failed");
                        let _ = self.bus.emit(SessionEvent::SurfaceAttachFailed {
                            reason: e.to_string(),
                        });
                    }
                }
            }
            Command::Lifecycle(event) => self.handle_lifecycle(event).await,
            Command::BackPressed => self.handle_back_pressed().await,
            Command::Gesture(gesture) => self.handle_gesture(gesture).await,
            Command::FullScreenToggled(entering) => {
                let _ = self
                    .bus
                    .emit(SessionEvent::FullScreenRequested { entering });
            }
        }
    }

    async fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::IsPlayingChanged { is_playing } => {
                self.snapshot.lock().is_playing = is_playing;
                if is_playing {
                    self.arm_quality();
                } else {
                    self.quality_deadline = None;
                }
            }
            EngineEvent::TracksChanged => {
                let _ = self.bus.emit(SessionEvent::TracksChanged);
            }
            EngineEvent::VolumeChanged { volume } => {
                let _ = self.bus.emit(SessionEvent::VolumeChanged { volume });
            }
            EngineEvent::Failure { message } => {
                warn!(%message, "engine failure");
                self.quality_deadline = None;
                if let Err(e) = self.engine.stop().await {
                    warn!(error = %e, "stop after failure failed");
                }
                let _ = self.bus.emit(SessionEvent::Error {
                    message,
                    terminal: true,
                });
            }
        }
    }

    async fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        let play_when_ready = self.engine.play_when_ready().await.unwrap_or(false);
        let directives = self.lifecycle.on_event(event, play_when_ready);
        self.apply_directives(directives).await;
    }

    async fn handle_back_pressed(&mut self) {
        let directives = self.lifecycle.on_back_pressed();
        self.apply_directives(directives).await;
    }

    async fn apply_directives(&mut self, directives: Vec<LifecycleDirective>) {
        for directive in directives {
            match directive {
                LifecycleDirective::PauseEngine => {
                    if let Err(e) = self.engine.pause().await {
                        warn!(error = %e, "lifecycle pause failed");
                    }
                }
                LifecycleDirective::PlayEngine => {
                    if let Err(e) = self.engine.play().await {
                        warn!(error = %e, "lifecycle play failed");
                    }
                }
                LifecycleDirective::StopEngine => {
                    if let Err(e) = self.engine.stop().await {
                        warn!(error = %e, "lifecycle stop failed");
                    }
                }
                LifecycleDirective::EnterPip(params) => {
                    if let Err(e) = self.host.enter_pip(params) {
                        warn!(error = %e, "picture-in-picture entry failed");
                    } else {
                        // The PIP window drops the track-switch chrome.
                        self.surfaces.apply_config(&self.config, &self.params);
                    }
                }
                LifecycleDirective::ArmQuality => self.arm_quality(),
                LifecycleDirective::DisarmQuality => self.quality_deadline = None,
                LifecycleDirective::ShowController => self.surfaces.show_controller(),
            }
        }
    }

    async fn handle_gesture(&mut self, gesture: SurfaceGesture) {
        match gesture {
            SurfaceGesture::DoubleTap { zone } => {
                let current = match self.engine.position().await {
                    Ok(position) => position,
                    Err(e) => {
                        warn!(error = %e, "position read failed for gesture seek");
                        return;
                    }
                };
                // Double-tap jumps by the controller show time, the
                // same interval the overlay stays visible for.
                let step = Duration::from_millis(self.config.controller_show_time_ms.max(0) as u64);
                let target = match zone {
                    TapZone::Left => current.saturating_sub(step),
                    TapZone::Right => current + step,
                };
                self.seek(target).await;
            }
            // Scroll is reserved for brightness/volume chrome on the
            // host side; nothing to do here.
            SurfaceGesture::Scroll { .. } => {}
        }
    }

    async fn seek(&mut self, target: Duration) {
        match self.guard.request_seek(target).await {
            Ok(SeekOutcome::Applied) => {}
            Ok(SeekOutcome::ForwardDenied { clamped_to }) => {
                debug!(?target, ?clamped_to, "forward seek denied");
                self.host.notify(bridge_traits::Advisory::SeekForwardDenied);
                let _ = self.bus.emit(SessionEvent::SeekDenied {
                    direction: SeekDirection::Forward,
                });
            }
            Ok(SeekOutcome::BackwardDenied) => {
                debug!(?target, "backward seek denied");
                self.host
                    .notify(bridge_traits::Advisory::SeekBackwardDenied);
                let _ = self.bus.emit(SessionEvent::SeekDenied {
                    direction: SeekDirection::Backward,
                });
            }
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    async fn load_media(&mut self, items: Vec<MediaItem>) {
        if let Some(mut session) = self.media_session.take() {
            session.release();
        }
        let label = media_session_label();
        match self.host.create_media_session(&label) {
            Ok(session) => self.media_session = Some(session),
            Err(e) => warn!(error = %e, "media session creation failed"),
        }

        let mut resolved = None;
        let mut last_error = String::from("no items supplied");
        for item in &items {
            match self.resolver.resolve(item).await {
                Ok(source) => {
                    resolved = Some((source, item.start_position()));
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "media item resolution failed");
                    last_error = e.to_string();
                }
            }
        }
        let Some((source, start_position)) = resolved else {
            let _ = self.bus.emit(SessionEvent::Error {
                message: format!("no media item could be resolved: {last_error}"),
                terminal: false,
            });
            return;
        };

        self.guard.reset();
        self.last_reported = None;
        let uri = source.uri.clone();
        let loaded = async {
            self.engine.set_media(source, start_position).await?;
            self.engine.prepare().await?;
            if self.params.auto_play {
                self.engine.play().await?;
            }
            Ok::<_, bridge_traits::BridgeError>(())
        }
        .await;
        match loaded {
            Ok(()) => {
                info!(%uri, "media loaded");
                let _ = self.bus.emit(SessionEvent::MediaLoaded { uri });
            }
            Err(e) => {
                warn!(error = %e, "media load failed");
                let _ = self.bus.emit(SessionEvent::Error {
                    message: e.to_string(),
                    terminal: true,
                });
            }
        }
    }

    /// Arm the adaptive-quality loop. The first tick fires immediately;
    /// arming an armed loop is a no-op.
    fn arm_quality(&mut self) {
        if self.quality_deadline.is_none() {
            self.quality_deadline = Some(Instant::now());
        }
    }

    async fn quality_tick(&mut self) {
        let interval = self.params.quality.interval;
        self.quality_deadline = Some(Instant::now() + interval);

        let position = match self.engine.position().await {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "position read failed in quality tick");
                return;
            }
        };
        self.guard.observe(position);
        let tier = self.params.quality.tier_for(position);
        debug!(%tier, ?position, "applying quality tier");
        if let Err(e) = self.engine.set_max_video_size(tier).await {
            warn!(error = %e, "quality constraint failed");
        }
    }

    async fn report_position(&mut self) {
        let position = match self.engine.position().await {
            Ok(position) => position,
            Err(_) => return,
        };
        self.guard.observe(position);
        let position_ms = position.as_millis() as u64;
        self.snapshot.lock().position_ms = position_ms;
        if self.last_reported != Some(position_ms) {
            self.last_reported = Some(position_ms);
            let _ = self.bus.emit(SessionEvent::PositionChanged { position_ms });
        }
    }

    async fn teardown(&mut self) {
        self.quality_deadline = None;
        if let Some(mut session) = self.media_session.take() {
            session.release();
        }
        if let Err(e) = self.engine.release().await {
            warn!(error = %e, "engine release failed");
        }
        debug!("session actor stopped");
    }
}

fn media_session_label() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("playback-session-{}", &id[..8])
}
