//! UDP OSC sender for gesture events.
//!
//! Sends one OSC-encoded message per snapshot to a fixed destination,
//! typically a sound-synthesis or visualization process. Unlike the TCP
//! stream server there is exactly one destination and no notion of "other
//! clients to keep serving", so a resolve or send failure propagates to the
//! caller instead of being tolerated per client. The server stays started;
//! the caller may retry on the next frame.
//!
//! # Message Layout
//!
//! Address `/gesture_event`, arguments in declared order:
//!
//! | # | Type  | Field                      |
//! |---|-------|----------------------------|
//! | 0 | int32 | timestamp (truncated)      |
//! | 1 | int32 | object id                  |
//! | 2 | int32 | tracked (0/1)              |
//! | 3 | int32 | recognized (0/1)           |
//! | 4 | string| posture                    |
//! | 5 | float | center X                   |
//! | 6 | float | center Y                   |
//! | 7 | float | scale                      |
//! | 8 | float | orientation (reserved, 0)  |

use crate::error::{Error, Result};
use crate::streaming::packet::OscPacket;
use crate::streaming::server::{make_nonblocking, BroadcastServer};
use crate::types::GestureSnapshot;
use log::info;
use std::net::{ToSocketAddrs, UdpSocket};

/// OSC address pattern for gesture events
pub const GESTURE_EVENT_ADDRESS: &str = "/gesture_event";

/// Default destination port (SuperCollider convention)
pub const DEFAULT_OSC_PORT: u16 = 57120;

/// UDP broadcast server sending OSC-encoded gesture events
pub struct OscServer {
    host: String,
    port: u16,
    socket: Option<UdpSocket>,
    stopped: bool,
}

impl OscServer {
    /// Create a server that will send to `host:port` once started
    ///
    /// `host` is a dotted quad or a resolvable name; resolution happens per
    /// send, so a destination that comes up later still works.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            socket: None,
            stopped: false,
        }
    }

    /// Encode one snapshot as a `/gesture_event` OSC message
    pub fn encode(snapshot: &GestureSnapshot) -> Result<OscPacket> {
        let mut packet = OscPacket::new();
        packet.set_address(GESTURE_EVENT_ADDRESS)?;
        packet.add_int(snapshot.timestamp_us as i32);
        packet.add_int(snapshot.object_id);
        packet.add_int(snapshot.tracked as i32);
        packet.add_int(snapshot.recognized as i32);
        packet.add_string(&snapshot.posture);
        packet.add_float(snapshot.center_x);
        packet.add_float(snapshot.center_y);
        packet.add_float(snapshot.scale);
        packet.add_float(0.0); // orientation: reserved, not produced upstream
        Ok(packet)
    }
}

impl BroadcastServer for OscServer {
    fn start(&mut self) -> Result<()> {
        if self.socket.is_some() {
            return Err(Error::AlreadyStarted);
        }
        if self.stopped {
            return Err(Error::Stopped);
        }
        // No local bind to a fixed port is needed; we only send
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(|e| Error::ServerStart {
            step: "create",
            source: e,
        })?;
        make_nonblocking(&socket)?;
        info!("OSC server sending to {}:{}", self.host, self.port);
        self.socket = Some(socket);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.socket.is_none() {
            return Err(Error::NotStarted);
        }
        self.socket = None;
        self.stopped = true;
        info!("OSC server stopped");
        Ok(())
    }

    fn send(&mut self, snapshot: &GestureSnapshot) -> Result<()> {
        let socket = self.socket.as_ref().ok_or(Error::NotStarted)?;
        let mut packet = Self::encode(snapshot)?;

        let dest = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| Error::Send(format!("resolving {}:{}: {}", self.host, self.port, e)))?
            .next()
            .ok_or_else(|| Error::Send(format!("no address for {}:{}", self.host, self.port)))?;

        socket
            .send_to(packet.bytes(), dest)
            .map_err(|e| Error::Send(format!("sending to {}: {}", dest, e)))?;
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.socket.is_some()
    }
}
