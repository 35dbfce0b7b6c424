//! Owned registry fanning snapshots out to active broadcast servers.
//!
//! The engine's control layer holds one registry and calls
//! [`ServerRegistry::broadcast`] once per processed frame per tracked
//! object. Servers are constructed from their configuration and registered
//! only after a successful start; a send failure on one server is logged
//! and never stops delivery through the others.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::streaming::osc_server::OscServer;
use crate::streaming::server::BroadcastServer;
use crate::streaming::stream_server::StreamServer;
use crate::types::GestureSnapshot;
use log::{error, info};

/// Handle identifying a registered server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerId(u64);

/// Registry of active broadcast servers
#[derive(Default)]
pub struct ServerRegistry {
    servers: Vec<(ServerId, Box<dyn BroadcastServer>)>,
    next_id: u64,
}

impl ServerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct, start, and register a server from its configuration
    ///
    /// The server is registered only if `start` succeeds; a start failure
    /// propagates to whatever initiated the configuration and nothing is
    /// registered.
    pub fn start_server(&mut self, config: &ServerConfig) -> Result<ServerId> {
        let mut server: Box<dyn BroadcastServer> = match config {
            ServerConfig::Stream { port, max_clients } => {
                Box::new(StreamServer::new(*port, *max_clients))
            }
            ServerConfig::Osc { host, port } => Box::new(OscServer::new(host.clone(), *port)),
        };
        server.start()?;
        let id = ServerId(self.next_id);
        self.next_id += 1;
        self.servers.push((id, server));
        info!("Registered {} server (id {})", config.kind(), id.0);
        Ok(id)
    }

    /// Stop and deregister one server
    pub fn stop_server(&mut self, id: ServerId) -> Result<()> {
        let pos = self
            .servers
            .iter()
            .position(|(sid, _)| *sid == id)
            .ok_or_else(|| Error::InvalidParameter(format!("no server with id {}", id.0)))?;
        let (_, mut server) = self.servers.remove(pos);
        server.stop()
    }

    /// Fan one snapshot out to every registered server
    ///
    /// Per-server failures are logged; the remaining servers still receive
    /// the snapshot and the failing server stays registered so the caller
    /// can retry on the next frame.
    pub fn broadcast(&mut self, snapshot: &GestureSnapshot) {
        for (id, server) in &mut self.servers {
            if let Err(e) = server.send(snapshot) {
                error!("Broadcast on server {} failed: {}", id.0, e);
            }
        }
    }

    /// Stop every registered server and clear the registry
    pub fn stop_all(&mut self) {
        for (id, server) in &mut self.servers {
            if let Err(e) = server.stop() {
                error!("Stopping server {} failed: {}", id.0, e);
            }
        }
        self.servers.clear();
    }

    /// Number of registered servers
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether the registry holds no servers
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl Drop for ServerRegistry {
    fn drop(&mut self) {
        self.stop_all();
    }
}
