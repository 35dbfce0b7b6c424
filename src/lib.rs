//! MudraCast - gesture event distribution library
//!
//! Core components for broadcasting per-frame hand/gesture state to
//! external consumer processes over the network, so that visualization,
//! sound-synthesis, or control applications can react without being linked
//! into the recognition engine.
//!
//! Two transports are provided:
//!
//! - [`streaming::StreamServer`]: TCP, arbitrarily many clients, one ASCII
//!   event line per snapshot
//! - [`streaming::OscServer`]: UDP, one OSC message per snapshot to a fixed
//!   destination
//!
//! Both are driven synchronously through a [`streaming::ServerRegistry`]
//! once per processed frame; there are no internal threads and no call
//! blocks.

pub mod config;
pub mod error;
pub mod mock;
pub mod streaming;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, ServerConfig};
pub use error::{Error, Result};
pub use types::GestureSnapshot;
