//! # Core Runtime
//!
//! Shared runtime infrastructure for the playback session control layer:
//! the typed session event bus and the logging/tracing bootstrap.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Result, RuntimeError};
pub use events::{EventBus, EventStream, SeekDirection, SessionEvent, DEFAULT_EVENT_BUFFER_SIZE};
pub use logging::{init_logging, LogFormat, LoggingConfig};
