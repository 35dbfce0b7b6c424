//! Configuration for the MudraCast daemon
//!
//! Loads configuration from a TOML file: the frame source rate, the set of
//! broadcast servers started at boot, and logging.

use crate::error::Result;
use crate::streaming::osc_server::DEFAULT_OSC_PORT;
use crate::streaming::stream_server::DEFAULT_MAX_CLIENTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub engine: EngineConfig,
    /// Broadcast servers started at boot
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    pub logging: LoggingConfig,
}

/// Frame source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Frames per second produced by the gesture source
    pub frame_rate: f64,
    /// Seed for the synthetic gesture source (0 = random each run)
    #[serde(default)]
    pub seed: u64,
}

/// One broadcast server to start at boot
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerConfig {
    /// TCP text-line broadcaster
    Stream {
        /// Listening port
        port: u16,
        /// Cap on simultaneously connected clients
        #[serde(default = "default_max_clients")]
        max_clients: usize,
    },
    /// UDP OSC sender
    Osc {
        /// Destination host (dotted quad or resolvable name)
        host: String,
        /// Destination port
        #[serde(default = "default_osc_port")]
        port: u16,
    },
}

impl ServerConfig {
    /// Transport name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            ServerConfig::Stream { .. } => "stream",
            ServerConfig::Osc { .. } => "osc",
        }
    }
}

fn default_max_clients() -> usize {
    DEFAULT_MAX_CLIENTS
}

fn default_osc_port() -> u16 {
    DEFAULT_OSC_PORT
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use mudra_cast::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("mudracast.toml")?;
    /// # Ok::<(), mudra_cast::Error>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration: 30 fps source, one stream server on 7045 and
    /// one OSC destination on localhost
    ///
    /// Suitable for testing and development. Deployments should use a
    /// proper TOML configuration file.
    pub fn defaults() -> Self {
        Self {
            engine: EngineConfig {
                frame_rate: 30.0,
                seed: 42,
            },
            servers: vec![
                ServerConfig::Stream {
                    port: 7045,
                    max_clients: DEFAULT_MAX_CLIENTS,
                },
                ServerConfig::Osc {
                    host: "127.0.0.1".to_string(),
                    port: DEFAULT_OSC_PORT,
                },
            ],
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::defaults();
        assert_eq!(config.engine.frame_rate, 30.0);
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers[0].kind(), "stream");
        assert_eq!(config.servers[1].kind(), "osc");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::defaults();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        // Should contain all sections
        assert!(toml_string.contains("[engine]"));
        assert!(toml_string.contains("[[servers]]"));
        assert!(toml_string.contains("[logging]"));

        // Should contain key values
        assert!(toml_string.contains("frame_rate = 30.0"));
        assert!(toml_string.contains("port = 7045"));
        assert!(toml_string.contains("port = 57120"));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[engine]
frame_rate = 25.0
seed = 7

[[servers]]
type = "stream"
port = 7045
max_clients = 4

[[servers]]
type = "osc"
host = "synth.local"
port = 9000

[logging]
level = "debug"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.engine.frame_rate, 25.0);
        assert_eq!(config.engine.seed, 7);
        assert_eq!(config.logging.level, "debug");
        match &config.servers[0] {
            ServerConfig::Stream { port, max_clients } => {
                assert_eq!(*port, 7045);
                assert_eq!(*max_clients, 4);
            }
            other => panic!("expected stream server, got {:?}", other),
        }
        match &config.servers[1] {
            ServerConfig::Osc { host, port } => {
                assert_eq!(host, "synth.local");
                assert_eq!(*port, 9000);
            }
            other => panic!("expected osc server, got {:?}", other),
        }
    }

    #[test]
    fn test_server_defaults_apply_when_omitted() {
        let toml_content = r#"
[engine]
frame_rate = 30.0

[[servers]]
type = "stream"
port = 7045

[[servers]]
type = "osc"
host = "127.0.0.1"

[logging]
level = "info"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        match &config.servers[0] {
            ServerConfig::Stream { max_clients, .. } => {
                assert_eq!(*max_clients, DEFAULT_MAX_CLIENTS)
            }
            other => panic!("expected stream server, got {:?}", other),
        }
        match &config.servers[1] {
            ServerConfig::Osc { port, .. } => assert_eq!(*port, DEFAULT_OSC_PORT),
            other => panic!("expected osc server, got {:?}", other),
        }
        assert_eq!(config.engine.seed, 0);
    }
}
