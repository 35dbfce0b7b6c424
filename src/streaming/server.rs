//! Broadcast server capability trait and shared socket setup.
//!
//! Both transport variants ([`StreamServer`](crate::streaming::StreamServer)
//! and [`OscServer`](crate::streaming::OscServer)) implement the same small
//! capability set and share the non-blocking setup helper. There is no
//! internal thread, timer, or event loop: all activity happens synchronously
//! inside the owner's call, once per processed frame, and every descriptor
//! is non-blocking so no call can suspend the frame-processing thread.

use crate::error::{Error, Result};
use crate::types::GestureSnapshot;
use std::io;
use std::net::{TcpListener, TcpStream, UdpSocket};

/// Capability set implemented by both broadcast transports
///
/// Lifecycle: `start` acquires OS resources, `send` may be called any number
/// of times while started, `stop` releases everything. A stopped server
/// cannot be reused; construct a fresh instance to restart. The types do not
/// implement `Clone`, so a started server cannot be duplicated.
pub trait BroadcastServer {
    /// Acquire OS resources and begin accepting/sending
    ///
    /// Fails with [`Error::AlreadyStarted`] on a running server and
    /// [`Error::Stopped`] on one that was already stopped.
    fn start(&mut self) -> Result<()>;

    /// Release all OS resources
    ///
    /// Fails with [`Error::NotStarted`] if the server is not running.
    /// Immediate and synchronous; there is no in-flight I/O to wait for.
    fn stop(&mut self) -> Result<()>;

    /// Broadcast one snapshot to the server's current consumers
    fn send(&mut self, snapshot: &GestureSnapshot) -> Result<()>;

    /// Whether `start` has succeeded and `stop` has not been called
    fn is_started(&self) -> bool;
}

/// Sockets that can be switched to non-blocking mode
pub(crate) trait Nonblocking {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()>;
}

impl Nonblocking for TcpListener {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        TcpListener::set_nonblocking(self, nonblocking)
    }
}

impl Nonblocking for TcpStream {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        TcpStream::set_nonblocking(self, nonblocking)
    }
}

impl Nonblocking for UdpSocket {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        UdpSocket::set_nonblocking(self, nonblocking)
    }
}

/// Switch a freshly created socket to non-blocking mode
///
/// Used identically by both server variants for every descriptor they
/// create. Operations that cannot complete immediately then return
/// `WouldBlock` instead of suspending the caller.
pub(crate) fn make_nonblocking<S: Nonblocking>(sock: &S) -> Result<()> {
    sock.set_nonblocking(true).map_err(|e| Error::ServerStart {
        step: "non-blocking",
        source: e,
    })
}
