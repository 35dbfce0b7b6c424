//! Core data types for gesture events.
//!
//! The key type is [`GestureSnapshot`]: the immutable per-object state
//! record handed to the broadcast layer once per processed video frame.

/// Immutable gesture state for one tracked object at one point in time
///
/// Produced by the recognition engine once per processed frame and fanned
/// out read-only to every broadcast server. `posture` is expected to be
/// non-empty only while `recognized` is set; the broadcast layer forwards
/// whatever it is given without enforcing this.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSnapshot {
    /// Tracked entity id (0 = primary hand)
    pub object_id: i32,
    /// Whether spatial tracking is currently active for this object
    pub tracked: bool,
    /// Whether a posture classification is currently valid
    pub recognized: bool,
    /// Normalized image-plane X position, [0,1]
    pub center_x: f32,
    /// Normalized image-plane Y position, [0,1]
    pub center_y: f32,
    /// Relative size of the tracked region
    pub scale: f32,
    /// Recognized posture name ("" if none)
    pub posture: String,
    /// Microsecond reference time
    pub timestamp_us: i64,
}

impl GestureSnapshot {
    /// Snapshot for an object that is currently not tracked
    pub fn lost(object_id: i32, timestamp_us: i64) -> Self {
        Self {
            object_id,
            tracked: false,
            recognized: false,
            center_x: 0.0,
            center_y: 0.0,
            scale: 0.0,
            posture: String::new(),
            timestamp_us,
        }
    }
}
