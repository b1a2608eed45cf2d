//! # Session Event Bus
//!
//! Event-driven notification channel between a playback session and its host,
//! built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The session controller publishes [`SessionEvent`]s — position reports,
//! seek-policy advisories, full-screen transitions, and failures — and any
//! number of host-side subscribers consume them independently:
//!
//! ```text
//! ┌──────────────────┐    emit     ┌───────────┐
//! │ Session          ├────────────>│           │    subscribe   ┌────────────┐
//! │ Controller       │             │ EventBus  ├───────────────>│ Host UI    │
//! └──────────────────┘             │ (broadcast│                └────────────┘
//!                                  │  channel) │    subscribe   ┌────────────┐
//!                                  │           ├───────────────>│ Analytics  │
//!                                  └───────────┘                └────────────┘
//! ```
//!
//! ## Error Handling
//!
//! `tokio::sync::broadcast` produces two receive errors:
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind by `n` events.
//!   Non-fatal; the subscriber keeps receiving new events.
//! - **`RecvError::Closed`**: the session is gone. Treat as shutdown.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, SessionEvent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new(64);
//! let mut sub = bus.subscribe();
//!
//! bus.emit(SessionEvent::PositionChanged { position_ms: 1000 }).ok();
//! assert_eq!(
//!     sub.recv().await.unwrap(),
//!     SessionEvent::PositionChanged { position_ms: 1000 }
//! );
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Position reports arrive at most once per second, so a small buffer is
/// enough headroom for bursty subscribers.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Direction of a denied seek request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekDirection {
    Forward,
    Backward,
}

/// Events a playback session publishes to its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// Playback position changed. Fires at most once per second, and only
    /// when the value differs from the previous report.
    PositionChanged { position_ms: u64 },
    /// A user seek was denied by policy. The position was clamped (forward)
    /// or left unchanged (backward).
    SeekDenied { direction: SeekDirection },
    /// A surface's full-screen toggle was pressed; the host should supply the
    /// corresponding surface via `enter_full_screen` / `exit_full_screen`.
    FullScreenRequested { entering: bool },
    /// The session finished migrating output to the full-screen surface.
    FullScreenEntered,
    /// The session restored output to the inline surface.
    FullScreenExited,
    /// An attach request found the target surface not ready. The previous
    /// surface stays active; the request is retried on the next attach.
    SurfaceAttachFailed { reason: String },
    /// A media item resolved and loaded into the engine.
    MediaLoaded { uri: String },
    /// The engine's selected track set changed.
    TracksChanged,
    /// The engine volume changed.
    VolumeChanged { volume: f32 },
    /// Resolution or engine failure. `terminal` is `true` for engine-level
    /// failures that leave the session stopped.
    Error { message: String, terminal: bool },
}

impl SessionEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            SessionEvent::PositionChanged { .. } => "Playback position changed",
            SessionEvent::SeekDenied { .. } => "Seek denied by policy",
            SessionEvent::FullScreenRequested { .. } => "Full-screen toggle requested",
            SessionEvent::FullScreenEntered => "Entered full screen",
            SessionEvent::FullScreenExited => "Exited full screen",
            SessionEvent::SurfaceAttachFailed { .. } => "Surface attach deferred",
            SessionEvent::MediaLoaded { .. } => "Media item loaded",
            SessionEvent::TracksChanged => "Track selection changed",
            SessionEvent::VolumeChanged { .. } => "Volume changed",
            SessionEvent::Error { .. } => "Session error",
        }
    }

    /// Returns `true` for events that represent a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, SessionEvent::Error { .. })
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central bus for publishing and subscribing to [`SessionEvent`]s.
///
/// Cloning the bus clones the sender; each `subscribe()` creates an
/// independent receiver. Slow subscribers receive `RecvError::Lagged` without
/// blocking fast ones.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when there are none.
    pub fn emit(&self, event: SessionEvent) -> Result<usize, SendError<SessionEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&SessionEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` wrapper with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, SessionEvent};
///
/// let bus = EventBus::new(64);
/// let positions = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, SessionEvent::PositionChanged { .. }));
/// ```
pub struct EventStream {
    receiver: Receiver<SessionEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<SessionEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter; only matching events are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&SessionEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event passing the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events, `RecvError::Closed` once the session is gone.
    pub async fn recv(&mut self) -> Result<SessionEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking. Returns `None` when no
    /// matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<SessionEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };
                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
