//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod goalkeeper;
pub mod state;
pub mod tick;

pub use ball::{
    Ball, BallEffect, BallInfo, BallSnapshot, DEFAULT_DIRECTION, ResolvedShot, ShotOptions,
    predicted_drop,
};
pub use collision::{Contact, Hand, HandRect, check_collisions, detect_collision};
pub use goalkeeper::{Goalkeeper, Hands};
pub use state::{
    Field, Frame, GameEvent, GamePhase, GameState, GoalRect, Scores, ShootoutConfig, ShotOutcome,
};
pub use tick::{
    TickInput, advance_round, end_game, generate_shot, pause_game, reset_game, resume_game,
    schedule_next_shot, start_game, take_shot, tick,
};
