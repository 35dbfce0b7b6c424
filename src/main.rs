//! MudraCast - gesture event broadcast daemon
//!
//! Fans per-frame hand/gesture state out to external consumer processes:
//!
//! - **TCP (default port 7045)**: one ASCII event line per snapshot to
//!   every connected client (visualization, control applications)
//! - **UDP OSC (default port 57120)**: one `/gesture_event` message per
//!   snapshot to a fixed destination (sound-synthesis tools)
//!
//! The daemon drives a synthetic gesture source at the configured frame
//! rate. A real recognition engine replaces it by linking against the
//! library and feeding its own snapshots to the registry.

use mudra_cast::config::AppConfig;
use mudra_cast::error::{Error, Result};
use mudra_cast::mock::MockGestureSource;
use mudra_cast::streaming::ServerRegistry;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `mudra-cast <path>` (positional)
/// - `mudra-cast --config <path>` (flag-based)
/// - `mudra-cast -c <path>` (short flag)
///
/// Defaults to `mudracast.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "mudracast.toml".to_string()
}

fn main() -> Result<()> {
    // Get config path from args or default
    let config_path = parse_config_path();
    let config = AppConfig::from_file(&config_path)?;

    // Initialize logger (RUST_LOG overrides the configured level)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("MudraCast v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!("Using config: {}", config_path);

    if !(config.engine.frame_rate.is_finite() && config.engine.frame_rate > 0.0) {
        return Err(Error::Config(format!(
            "frame_rate must be positive, got {}",
            config.engine.frame_rate
        )));
    }
    if config.servers.is_empty() {
        log::warn!("No broadcast servers configured; events will go nowhere");
    }

    // Start every configured server; a start failure aborts boot
    let mut registry = ServerRegistry::new();
    for server_config in &config.servers {
        registry.start_server(server_config)?;
    }

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);

    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let frame_interval = Duration::from_secs_f64(1.0 / config.engine.frame_rate);
    let mut source = MockGestureSource::new(config.engine.frame_rate, config.engine.seed);

    log::info!(
        "Broadcasting at {:.1} fps through {} servers. Press Ctrl-C to stop.",
        config.engine.frame_rate,
        registry.len()
    );

    // Frame loop: one snapshot per frame, fanned out to every server
    while running.load(Ordering::Relaxed) {
        let snapshot = source.next_snapshot();
        registry.broadcast(&snapshot);
        thread::sleep(frame_interval);
    }

    log::info!("Shutting down...");
    registry.stop_all();
    log::info!("MudraCast stopped");
    Ok(())
}
