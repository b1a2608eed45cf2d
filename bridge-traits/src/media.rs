//! Media item model and source resolution.
//!
//! A [`MediaItem`] describes where a media asset comes from; a
//! [`MediaResolver`] turns it into a [`ResolvedSource`] the engine can load.
//! Resolution is where DRM license wiring happens, which is why it lives
//! behind a bridge trait rather than in the session controller.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Mime type for MPEG-DASH manifests.
pub const MIME_TYPE_DASH: &str = "application/dash+xml";
/// Mime type for HLS playlists.
pub const MIME_TYPE_HLS: &str = "application/x-mpegURL";
/// Mime type for plain MP4 video.
pub const MIME_TYPE_VIDEO_MP4: &str = "video/mp4";

/// DRM descriptor attached to protected network media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrmConfig {
    /// License server the resolver should acquire a license from.
    pub license_url: String,
    /// Content identifier presented to the license server.
    pub content_id: String,
}

/// Where a media asset comes from.
///
/// Each variant carries exactly one source-specific locator plus the common
/// description fields. `mime_type` may be empty, meaning "infer from the
/// locator"; `start_position` is the offset playback begins at once the item
/// is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum MediaItem {
    /// A media item bundled as an application resource.
    RawResource {
        resource_id: u32,
        #[serde(default)]
        metadata: HashMap<String, String>,
        #[serde(default)]
        mime_type: String,
        #[serde(default)]
        start_position: Duration,
    },
    /// A media item in the application's asset directory.
    AssetFile {
        path: PathBuf,
        #[serde(default)]
        metadata: HashMap<String, String>,
        #[serde(default)]
        mime_type: String,
        #[serde(default)]
        start_position: Duration,
    },
    /// A media item in device internal / external storage.
    DeviceStorage {
        uri: String,
        #[serde(default)]
        metadata: HashMap<String, String>,
        #[serde(default)]
        mime_type: String,
        #[serde(default)]
        start_position: Duration,
    },
    /// A media item fetched over the network, optionally DRM-protected.
    Network {
        url: String,
        #[serde(default)]
        drm: Option<DrmConfig>,
        #[serde(default)]
        metadata: HashMap<String, String>,
        #[serde(default)]
        mime_type: String,
        #[serde(default)]
        start_position: Duration,
    },
}

impl MediaItem {
    /// Free-form key/value description of the item.
    pub fn metadata(&self) -> &HashMap<String, String> {
        match self {
            MediaItem::RawResource { metadata, .. }
            | MediaItem::AssetFile { metadata, .. }
            | MediaItem::DeviceStorage { metadata, .. }
            | MediaItem::Network { metadata, .. } => metadata,
        }
    }

    /// Declared mime type. Empty means "infer".
    pub fn mime_type(&self) -> &str {
        match self {
            MediaItem::RawResource { mime_type, .. }
            | MediaItem::AssetFile { mime_type, .. }
            | MediaItem::DeviceStorage { mime_type, .. }
            | MediaItem::Network { mime_type, .. } => mime_type,
        }
    }

    /// Offset at which playback begins once the item is loaded.
    pub fn start_position(&self) -> Duration {
        match self {
            MediaItem::RawResource { start_position, .. }
            | MediaItem::AssetFile { start_position, .. }
            | MediaItem::DeviceStorage { start_position, .. }
            | MediaItem::Network { start_position, .. } => *start_position,
        }
    }

    /// Returns `true` if resolving this item requires network access.
    pub fn is_remote(&self) -> bool {
        matches!(self, MediaItem::Network { .. })
    }

    /// DRM descriptor, present only on protected network items.
    pub fn drm(&self) -> Option<&DrmConfig> {
        match self {
            MediaItem::Network { drm, .. } => drm.as_ref(),
            _ => None,
        }
    }
}

/// A resolved, engine-loadable source produced by a [`MediaResolver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSource {
    /// Locator the engine understands (file path, content URI, manifest URL).
    pub uri: String,
    /// Resolved mime type, if the resolver determined one.
    pub mime_type: Option<String>,
    /// DRM descriptor the engine should honor while loading.
    pub drm: Option<DrmConfig>,
}

impl ResolvedSource {
    /// Construct a plain, unprotected source.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
            drm: None,
        }
    }

    /// Attach a mime type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Attach a DRM descriptor.
    pub fn with_drm(mut self, drm: DrmConfig) -> Self {
        self.drm = Some(drm);
        self
    }
}

/// Resolves a [`MediaItem`] into a playable source.
///
/// DRM-protected items are resolved here: implementations talk to the license
/// infrastructure and hand back a source the engine can load directly. The
/// session controller tries items in list order and plays the first one that
/// resolves.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolve one item. Returns [`BridgeError::Unresolvable`] when the item
    /// has no playable source and [`BridgeError::Drm`] when license
    /// acquisition fails.
    ///
    /// [`BridgeError::Unresolvable`]: crate::error::BridgeError::Unresolvable
    /// [`BridgeError::Drm`]: crate::error::BridgeError::Drm
    async fn resolve(&self, item: &MediaItem) -> Result<ResolvedSource>;
}
