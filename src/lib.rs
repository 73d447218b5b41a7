//! Spot Kick - a penalty shootout goalkeeper game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball flight, hand collisions, shootout state)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences and shootout tuning
//! - `audio`: Procedural Web Audio effects (browser only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick in milliseconds (~60 Hz)
    pub const TICK_MS: u32 = 16;
    /// Fixed simulation tick in seconds
    pub const SIM_DT: f32 = TICK_MS as f32 / 1000.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Goal mouth in play-area pixels
    pub const GOAL_LEFT: f32 = 150.0;
    pub const GOAL_RIGHT: f32 = 650.0;
    pub const GOAL_TOP: f32 = 60.0;
    pub const GOAL_BOTTOM: f32 = 280.0;

    /// Launch depth. Negative is far from the goal plane at z = 0.
    pub const INITIAL_Z: f32 = -2000.0;
    /// Base downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.05;
    /// Default shot speed (pixels/tick)
    pub const DEFAULT_SPEED: f32 = 25.0;

    /// Effect phase advance per tick
    pub const PHASE_STEP: f32 = 0.1;
    /// Curve acceleration at unit curve and unit depth factor
    pub const CURVE_STRENGTH: f32 = 0.04;
    /// Baseline visual roll per tick (radians)
    pub const BASE_ROLL: f32 = 0.05;

    /// Ball diameter at launch depth and at the goal plane
    pub const BALL_MIN_SIZE: f32 = 16.0;
    pub const BALL_MAX_SIZE: f32 = 70.0;
    /// Extra slack past the play area before a ball counts as gone
    pub const BOUNDS_MARGIN: f32 = 200.0;

    /// Save deflection: depth rebound multiplier and lateral spread
    pub const SAVE_REBOUND: f32 = -1.5;
    pub const SAVE_SPREAD_X: f32 = 5.0;
    pub const SAVE_LIFT_MIN: f32 = 5.0;
    pub const SAVE_LIFT_MAX: f32 = 10.0;

    /// Goalkeeper glove size and spacing from pointer
    pub const HAND_WIDTH: f32 = 100.0;
    pub const HAND_HEIGHT: f32 = 120.0;
    pub const HAND_SPREAD: f32 = 60.0;
    /// Fraction of the remaining distance a hand covers each tick
    pub const HAND_FOLLOW_RATE: f32 = 0.25;
    pub const HAND_FOLLOW_DECAY: f32 = 0.9;
    pub const HAND_FOLLOW_MIN: f32 = 0.1;
}

/// Convert a millisecond delay into whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    ms.div_ceil(consts::TICK_MS).max(1)
}

/// Depth progress from launch (0.0) to the goal plane (1.0), clamped
#[inline]
pub fn depth_progress(z: f32) -> f32 {
    let launch = consts::INITIAL_Z.abs();
    ((launch - z.abs()) / launch).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks_rounds_up() {
        assert_eq!(ms_to_ticks(3000), 188);
        assert_eq!(ms_to_ticks(16), 1);
        assert_eq!(ms_to_ticks(0), 1);
    }

    #[test]
    fn test_depth_progress() {
        assert_eq!(depth_progress(consts::INITIAL_Z), 0.0);
        assert_eq!(depth_progress(0.0), 1.0);
        assert!((depth_progress(-1000.0) - 0.5).abs() < 1e-6);
        assert_eq!(depth_progress(-5000.0), 0.0);
    }
}
