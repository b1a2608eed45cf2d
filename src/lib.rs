//! Workspace facade crate.
//!
//! This crate exists so host applications can depend on `psc-workspace` and
//! reach every layer of the playback session control stack (`bridge-traits`,
//! `core-runtime`, `core-session`) without wiring each crate individually.

pub use bridge_traits;
pub use core_runtime;
pub use core_session;
