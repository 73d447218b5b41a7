//! Fixed timestep simulation tick
//!
//! Drives the shootout: keeper movement, the shot timer, ball flight,
//! glove collisions, and exactly-once outcome scoring.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::ball::{ShotOptions, predicted_drop};
use super::collision::check_collisions;
use super::state::{Field, GameEvent, GamePhase, GameState, ShotOutcome};
use crate::consts::*;
use crate::ms_to_ticks;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in play-area coordinates
    pub pointer: Option<Vec2>,
    /// Start from the menu
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// New game from the game-over screen or pause menu
    pub restart: bool,
    /// Keeper tracks the ball on its own
    pub autoplay: bool,
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if input.restart && matches!(state.phase, GamePhase::GameOver | GamePhase::Paused) {
        reset_game(state);
        start_game(state);
    } else if input.start && state.phase == GamePhase::Menu {
        start_game(state);
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => pause_game(state),
            GamePhase::Paused => resume_game(state),
            _ => {}
        }
    }

    if !state.is_playing() {
        return;
    }

    state.time_ticks += 1;

    let target = if input.autoplay {
        Some(autoplay_target(state))
    } else {
        input.pointer
    };
    if let Some(target) = target {
        state.goalkeeper.set_target(target);
    }
    state.goalkeeper.update(&state.field);

    if let Some(remaining) = state.kick_deadline {
        if remaining <= 1 {
            state.kick_deadline = None;
            state.kick_pending = false;
            take_shot(state);
        } else {
            state.kick_deadline = Some(remaining - 1);
        }
    }

    if state.ball.is_active() && state.ball.update(&state.field) {
        if let Some((hand, contact)) =
            check_collisions(&mut state.ball, &state.goalkeeper, &mut state.rng)
        {
            log::debug!("{hand:?} glove contact at {:?}", contact.point);
            state.events.push(GameEvent::Deflected {
                hand,
                point: contact.point,
            });
        }
    }

    if !state.ball.is_active() && !state.ball.is_processed() {
        process_shot_result(state);
    }
}

/// Score a finished shot once, then queue the next one
fn process_shot_result(state: &mut GameState) {
    state.ball.mark_processed();

    let outcome = if state.ball.is_stopped() {
        ShotOutcome::Save
    } else if state.ball.is_scored() {
        ShotOutcome::Goal
    } else {
        ShotOutcome::Miss
    };

    match outcome {
        ShotOutcome::Save => {
            state.saves += 1;
            state.scores.home += 1;
        }
        ShotOutcome::Goal => state.scores.away += 1,
        ShotOutcome::Miss => {}
    }

    log::info!(
        "Round {} shot {}: {:?} ({} - {})",
        state.current_round,
        state.current_shot,
        outcome,
        state.scores.home,
        state.scores.away
    );
    state.events.push(GameEvent::Outcome {
        round: state.current_round,
        shot: state.current_shot,
        outcome,
    });

    state.ball.reset();
    schedule_next_shot(state);
}

/// Begin play from the menu
pub fn start_game(state: &mut GameState) {
    state.phase = GamePhase::Playing;
    log::info!("Shootout started (seed {})", state.seed);
    schedule_next_shot(state);
}

/// Freeze play. The shot timer is disarmed along with the loop.
pub fn pause_game(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::Paused;
    state.kick_deadline = None;
    state.events.push(GameEvent::Paused);
    log::info!("Paused");
}

/// Unfreeze play. Re-arms a pending kick without counting a new shot;
/// never re-arms while a ball is in flight or a timer is already armed.
pub fn resume_game(state: &mut GameState) {
    if state.phase != GamePhase::Paused {
        return;
    }
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::Resumed);
    log::info!("Resumed");

    if state.ball.is_active() || state.kick_deadline.is_some() {
        return;
    }
    if state.kick_pending {
        state.kick_deadline = Some(ms_to_ticks(state.config.time_between_shots_ms));
    } else {
        schedule_next_shot(state);
    }
}

/// Stop everything and report the final score
pub fn end_game(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.kick_deadline = None;
    state.kick_pending = false;
    state.ball.reset();

    log::info!(
        "Final score: {} - {} ({} saves)",
        state.scores.home,
        state.scores.away,
        state.saves
    );
    state.events.push(GameEvent::GameOver {
        scores: state.scores,
        saves: state.saves,
    });
}

/// Back to the menu with fresh counters. The RNG keeps running.
pub fn reset_game(state: &mut GameState) {
    let config = state.config;
    state.phase = GamePhase::Menu;
    state.current_round = 1;
    state.current_shot = 0;
    state.total_shots = config.shots_per_round;
    state.scores = Default::default();
    state.saves = 0;
    state.difficulty = config.initial_difficulty;
    state.time_ticks = 0;
    state.kick_deadline = None;
    state.kick_pending = false;
    state.ball.reset();
    state.ball.mark_processed();
    state.goalkeeper.reset(&state.field);
}

/// Announce the next shot and arm the kick timer, or close out the round
pub fn schedule_next_shot(state: &mut GameState) {
    if state.current_shot >= state.total_shots {
        advance_round(state);
        return;
    }

    state.current_shot += 1;
    state.kick_deadline = Some(ms_to_ticks(state.config.time_between_shots_ms));
    state.kick_pending = true;
    state.events.push(GameEvent::ShotScheduled {
        round: state.current_round,
        shot: state.current_shot,
    });
}

/// Next round with higher difficulty, or game over after the last one
pub fn advance_round(state: &mut GameState) {
    if state.current_round >= state.config.max_rounds {
        end_game(state);
        return;
    }

    state.current_round += 1;
    state.current_shot = 0;
    state.difficulty += state.config.difficulty_increment;
    state.goalkeeper.slow_down();

    log::info!(
        "Round {} (difficulty {:.2})",
        state.current_round,
        state.difficulty
    );
    state.events.push(GameEvent::RoundAdvanced {
        round: state.current_round,
        difficulty: state.difficulty,
    });

    schedule_next_shot(state);
}

/// Kick the ball with fresh random parameters
pub fn take_shot(state: &mut GameState) {
    state.ball.reset();

    let options = generate_shot(state.difficulty, &state.field, &mut state.rng);
    state.ball.shoot(&options, &state.field, &mut state.rng);
    let speed = state.ball.velocity.length();

    state.events.push(GameEvent::Kick {
        round: state.current_round,
        shot: state.current_shot,
        speed,
    });
}

/// Random shot aimed somewhere inside the goal. Speed and swerve scale with
/// difficulty; aim is lifted by the expected gravity drop.
pub fn generate_shot<R: Rng>(difficulty: f32, field: &Field, rng: &mut R) -> ShotOptions {
    let difficulty = if difficulty.is_finite() {
        difficulty.max(0.0)
    } else {
        0.0
    };
    let speed = 20.0 + difficulty * 10.0;

    let goal = field.goal;
    let target = Vec2::new(
        goal.left + rng.random::<f32>() * goal.width(),
        // Favor the middle band vertically
        goal.top + rng.random_range(0.3..0.7) * goal.height(),
    );
    let start = Vec2::new(
        field.width / 2.0 + (rng.random::<f32>() - 0.5) * 100.0,
        field.height * 0.8,
    );

    let depth = -INITIAL_Z;
    let planar = target - start;
    let velocity_z = speed * depth / Vec3::new(planar.x, planar.y, depth).length();
    let drop = predicted_drop(INITIAL_Z, velocity_z);

    let curve = Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-0.5..=0.5)) * difficulty;
    let wobble = Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * 1.5 * difficulty;
    let spin = rng.random_range(-0.3..=0.3) * difficulty;

    log::debug!(
        "Shot: speed {speed:.1} target {target:?} curve {curve:?} wobble {wobble:?} spin {spin:.2}"
    );

    ShotOptions::new()
        .speed(speed)
        .direction(Vec3::new(planar.x, planar.y - drop, depth))
        .curve(curve)
        .wobble(wobble)
        .spin(spin)
        .start_position(start.extend(INITIAL_Z))
}

/// Where a self-driving keeper should put its gloves: the ball's projected
/// crossing point, or the middle of the goal when nothing is in flight.
fn autoplay_target(state: &GameState) -> Vec2 {
    let ball = &state.ball;
    if !ball.is_active() || ball.is_stopped() || ball.velocity.z <= 0.0 {
        return state.field.goal.center();
    }

    let ticks_left = -ball.position.z / ball.velocity.z;
    let drift = ball.velocity.truncate() * ticks_left;
    let fall = Vec2::new(0.0, predicted_drop(ball.position.z, ball.velocity.z));
    ball.position.truncate() + drift + fall
}
