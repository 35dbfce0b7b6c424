//! Multi-client TCP broadcaster for gesture event lines.
//!
//! Accepts arbitrarily many clients on a listening port and pushes one
//! formatted ASCII line to each of them per snapshot.
//!
//! # Wire Format
//!
//! One line per event, terminated by `\r\n` and followed by a single NUL
//! byte (legacy clients frame on the NUL):
//!
//! ```text
//! <VERSION> <timestamp> <objectId>: <tracked>, <recognized>, "<posture>" (<centerX>, <centerY>) [<scale>, <orientation>]
//! ```
//!
//! Example: `1.2 123456 0: 1, 1, "Lback" (0.250000, 0.750000) [0.900000, 0.000000]`
//!
//! # Client Lifecycle
//!
//! Clients connect at any time; at most one pending connection is accepted
//! per `send` call. A client whose peer has gone away (broken pipe, reset,
//! unreachable) is evicted; transient failures (full send buffer, partial
//! write) are logged and the client is kept, so one slow consumer never
//! stops delivery to the others.

use crate::error::{Error, Result};
use crate::streaming::server::{make_nonblocking, BroadcastServer};
use crate::types::GestureSnapshot;
use log::{info, warn};
use std::io::{ErrorKind, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};

/// Protocol version prefixed to every event line
pub const PROTOCOL_VERSION: &str = "1.2";

/// Default cap on simultaneously connected clients
pub const DEFAULT_MAX_CLIENTS: usize = 10;

/// TCP broadcast server for gesture event lines
pub struct StreamServer {
    port: u16,
    max_clients: usize,
    listener: Option<TcpListener>,
    clients: Vec<TcpStream>,
    stopped: bool,
}

impl StreamServer {
    /// Create a server that will listen on `port` once started
    ///
    /// `max_clients` caps the number of simultaneously connected clients;
    /// connections beyond the cap are accepted and immediately closed.
    pub fn new(port: u16, max_clients: usize) -> Self {
        Self {
            port,
            max_clients,
            listener: None,
            clients: Vec::new(),
            stopped: false,
        }
    }

    /// Local address of the listening socket
    ///
    /// Mainly useful when bound to port 0 (ephemeral port in tests).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        let listener = self.listener.as_ref().ok_or(Error::NotStarted)?;
        Ok(listener.local_addr()?)
    }

    /// Number of currently connected clients
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Accept at most one pending client connection (non-blocking)
    fn poll_accept(&mut self) {
        let accepted = match self.listener.as_ref() {
            Some(listener) => listener.accept(),
            None => return,
        };
        match accepted {
            Ok((stream, addr)) => {
                if self.clients.len() >= self.max_clients {
                    warn!(
                        "Refusing client {}: limit of {} clients reached",
                        addr, self.max_clients
                    );
                    return;
                }
                if let Err(e) = make_nonblocking(&stream) {
                    warn!("Dropping client {}: {}", addr, e);
                    return;
                }
                info!("Client connected: {}", addr);
                self.clients.push(stream);
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                // No pending connection
            }
            Err(e) => warn!("Accept error: {}", e),
        }
    }
}

impl BroadcastServer for StreamServer {
    fn start(&mut self) -> Result<()> {
        if self.listener.is_some() {
            return Err(Error::AlreadyStarted);
        }
        if self.stopped {
            return Err(Error::Stopped);
        }
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, self.port))
            .map_err(|e| Error::ServerStart {
                step: "bind",
                source: e,
            })?;
        make_nonblocking(&listener)?;
        info!("Stream server listening on {}", listener.local_addr()?);
        self.listener = Some(listener);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.listener.is_none() {
            return Err(Error::NotStarted);
        }
        self.listener = None;
        let dropped = self.clients.len();
        self.clients.clear();
        self.stopped = true;
        info!("Stream server stopped ({} clients dropped)", dropped);
        Ok(())
    }

    fn send(&mut self, snapshot: &GestureSnapshot) -> Result<()> {
        if self.listener.is_none() {
            return Err(Error::NotStarted);
        }
        self.poll_accept();

        if self.clients.is_empty() {
            return Ok(());
        }

        let mut message = format_event_line(snapshot).into_bytes();
        message.push(0);

        // Every broken client found in this pass is evicted. The failure of
        // one client never aborts delivery to the remaining clients.
        self.clients.retain_mut(|client| {
            let peer = client
                .peer_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "<unknown>".to_string());
            match client.write(&message) {
                Ok(n) if n == message.len() => true,
                Ok(n) => {
                    warn!(
                        "Partial write to {} ({}/{} bytes), keeping client",
                        peer,
                        n,
                        message.len()
                    );
                    true
                }
                Err(e) if peer_gone(e.kind()) => {
                    info!("Client {} gone ({}), evicting", peer, e);
                    false
                }
                Err(e) => {
                    warn!("Send to {} failed ({}), keeping client", peer, e);
                    true
                }
            }
        });
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.listener.is_some()
    }
}

/// Format one snapshot as a protocol event line (without the trailing NUL)
pub fn format_event_line(snapshot: &GestureSnapshot) -> String {
    format!(
        "{} {} {}: {}, {}, \"{}\" ({:.6}, {:.6}) [{:.6}, {:.6}]\r\n",
        PROTOCOL_VERSION,
        snapshot.timestamp_us,
        snapshot.object_id,
        snapshot.tracked as i32,
        snapshot.recognized as i32,
        snapshot.posture,
        snapshot.center_x,
        snapshot.center_y,
        snapshot.scale,
        0.0_f32, // orientation: reserved, not produced upstream
    )
}

/// Error kinds meaning the peer is gone for good
fn peer_gone(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
            | ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> GestureSnapshot {
        GestureSnapshot {
            object_id: 0,
            tracked: true,
            recognized: true,
            center_x: 0.25,
            center_y: 0.75,
            scale: 0.9,
            posture: "Lback".to_string(),
            timestamp_us: 123456,
        }
    }

    #[test]
    fn test_event_line_format() {
        assert_eq!(
            format_event_line(&snapshot()),
            "1.2 123456 0: 1, 1, \"Lback\" (0.250000, 0.750000) [0.900000, 0.000000]\r\n"
        );
    }

    #[test]
    fn test_event_line_untracked() {
        let snap = GestureSnapshot::lost(2, -1);
        assert_eq!(
            format_event_line(&snap),
            "1.2 -1 2: 0, 0, \"\" (0.000000, 0.000000) [0.000000, 0.000000]\r\n"
        );
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut server = StreamServer::new(0, DEFAULT_MAX_CLIENTS);
        assert!(!server.is_started());
        assert!(matches!(server.stop(), Err(Error::NotStarted)));
        assert!(matches!(server.send(&snapshot()), Err(Error::NotStarted)));

        server.start().unwrap();
        assert!(server.is_started());
        assert!(matches!(server.start(), Err(Error::AlreadyStarted)));

        server.stop().unwrap();
        assert!(!server.is_started());
        assert!(matches!(server.stop(), Err(Error::NotStarted)));
        // A stopped server cannot be reused
        assert!(matches!(server.start(), Err(Error::Stopped)));
    }

    #[test]
    fn test_send_without_clients() {
        let mut server = StreamServer::new(0, DEFAULT_MAX_CLIENTS);
        server.start().unwrap();
        server.send(&snapshot()).unwrap();
        assert_eq!(server.client_count(), 0);
        server.stop().unwrap();
    }

    #[test]
    fn test_peer_gone_classification() {
        assert!(peer_gone(ErrorKind::BrokenPipe));
        assert!(peer_gone(ErrorKind::ConnectionReset));
        assert!(peer_gone(ErrorKind::ConnectionAborted));
        assert!(peer_gone(ErrorKind::TimedOut));
        assert!(!peer_gone(ErrorKind::WouldBlock));
        assert!(!peer_gone(ErrorKind::Interrupted));
    }
}
