//! Synthetic gesture source for engine-free operation
//!
//! Stands in for the recognition engine: produces one plausible
//! [`GestureSnapshot`] per frame. The simulated hand follows a smooth
//! closed path across the normalized image plane while the recognized
//! posture cycles through a fixed vocabulary, with short recognition gaps
//! at each posture change and occasional tracking dropouts so downstream
//! consumers see realistic lose/reacquire transitions.

use crate::types::GestureSnapshot;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Posture vocabulary cycled by the mock source
const POSTURES: &[&str] = &["open", "closed", "Lback", "sidepoint", "victory"];

/// Seconds each posture is held before cycling to the next
const POSTURE_HOLD_SECS: f64 = 2.0;

/// Fraction of each posture phase spent unrecognized (hand in transition)
const TRANSITION_FRACTION: f64 = 0.15;

/// Per-frame probability of a tracking dropout
const DROPOUT_PROBABILITY: f64 = 0.008;

/// Deterministic synthetic gesture source
///
/// With a non-zero seed, the produced snapshot sequence is fully
/// reproducible.
pub struct MockGestureSource {
    frame: u64,
    frame_rate: f64,
    rng: SmallRng,
}

impl MockGestureSource {
    /// Create a new source running at `frame_rate` frames per second
    ///
    /// If seed is 0, uses random entropy for non-deterministic dropouts.
    /// Otherwise, uses the provided seed for reproducible results.
    pub fn new(frame_rate: f64, seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self {
            frame: 0,
            frame_rate,
            rng,
        }
    }

    /// Produce the snapshot for the next frame
    pub fn next_snapshot(&mut self) -> GestureSnapshot {
        let t = self.frame as f64 / self.frame_rate;
        self.frame += 1;
        let timestamp_us = (t * 1_000_000.0) as i64;

        if self.rng.gen_bool(DROPOUT_PROBABILITY) {
            return GestureSnapshot::lost(0, timestamp_us);
        }

        // Closed Lissajous path inside the unit square
        let center_x = 0.5 + 0.35 * (0.7 * t).sin();
        let center_y = 0.5 + 0.35 * (0.5 * t).cos();
        let scale = 1.0 + 0.25 * (0.3 * t).sin();

        let phase = t / POSTURE_HOLD_SECS;
        let recognized = phase.fract() >= TRANSITION_FRACTION;
        let posture = if recognized {
            POSTURES[(phase as usize) % POSTURES.len()].to_string()
        } else {
            String::new()
        };

        GestureSnapshot {
            object_id: 0,
            tracked: true,
            recognized,
            center_x: center_x as f32,
            center_y: center_y as f32,
            scale: scale as f32,
            posture,
            timestamp_us,
        }
    }
}
