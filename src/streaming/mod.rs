//! Broadcast servers and wire encoders for gesture events.

pub mod osc_server;
pub mod packet;
pub mod registry;
pub mod server;
pub mod stream_server;

pub use osc_server::OscServer;
pub use packet::OscPacket;
pub use registry::{ServerId, ServerRegistry};
pub use server::BroadcastServer;
pub use stream_server::StreamServer;
