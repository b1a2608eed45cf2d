//! Host shell bridge trait.
//!
//! The host shell is the application process around the session: it delivers
//! lifecycle events, owns picture-in-picture and display mode transitions,
//! registers media sessions with the platform, and renders transient notices.

use crate::error::Result;

/// Host lifecycle signals forwarded into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The host lost foreground focus (ON_PAUSE).
    Pause,
    /// The host regained foreground focus (ON_RESUME).
    Resume,
    /// The host is no longer visible (ON_STOP).
    Stop,
}

/// Hints supplied with a picture-in-picture entry request.
#[derive(Debug, Clone, PartialEq)]
pub struct PipParams {
    /// Desired aspect ratio as width / height.
    pub aspect_ratio: (u32, u32),
    /// Title shown by the host's PIP chrome.
    pub title: Option<String>,
}

impl Default for PipParams {
    fn default() -> Self {
        Self {
            aspect_ratio: (16, 9),
            title: None,
        }
    }
}

/// Transient user-visible notices emitted by session policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    SeekForwardDenied,
    SeekBackwardDenied,
}

impl Advisory {
    /// Default display text for hosts without their own copy.
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::SeekForwardDenied => "Cannot seek forward",
            Advisory::SeekBackwardDenied => "Cannot seek backward",
        }
    }
}

/// A platform media-session registration scoped to one loaded item list.
///
/// Released and re-created whenever the session's media items change.
pub trait MediaSessionHandle: Send {
    /// The label the session was registered under.
    fn label(&self) -> &str;

    /// Release the registration. Called before the handle is dropped.
    fn release(&mut self);
}

/// Host application shell.
///
/// All methods are fast queries or fire-and-forget posts into the host's
/// event loop; none may block.
pub trait HostShell: Send + Sync {
    /// Whether the platform supports picture-in-picture at all.
    fn pip_supported(&self) -> bool;

    /// Whether the host is currently displayed in PIP mode.
    fn is_in_pip(&self) -> bool;

    /// Whether the host lifecycle is in a resumed-or-later state. PIP entry
    /// is only legal from such a state.
    fn is_at_least_resumed(&self) -> bool;

    /// Request entry into picture-in-picture mode.
    fn enter_pip(&self, params: PipParams) -> Result<()>;

    /// Request full-screen/landscape display mode (`true`) or restoration of
    /// the prior orientation and system chrome (`false`).
    fn set_full_screen(&self, full_screen: bool) -> Result<()>;

    /// Render a transient notice (toast/snackbar equivalent).
    fn notify(&self, advisory: Advisory);

    /// Register a media session under `label` with the platform.
    fn create_media_session(&self, label: &str) -> Result<Box<dyn MediaSessionHandle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pip_params_default_aspect() {
        let params = PipParams::default();
        assert_eq!(params.aspect_ratio, (16, 9));
        assert!(params.title.is_none());
    }

    #[test]
    fn advisory_messages() {
        assert_eq!(Advisory::SeekForwardDenied.message(), "Cannot seek forward");
        assert_eq!(
            Advisory::SeekBackwardDenied.message(),
            "Cannot seek backward"
        );
    }
}
