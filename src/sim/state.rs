//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallSnapshot};
use super::collision::Hand;
use super::goalkeeper::{Goalkeeper, Hands};
use crate::consts::*;

/// Goal mouth in play-area coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for GoalRect {
    fn default() -> Self {
        Self {
            left: GOAL_LEFT,
            right: GOAL_RIGHT,
            top: GOAL_TOP,
            bottom: GOAL_BOTTOM,
        }
    }
}

impl GoalRect {
    /// Inclusive on all edges
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

/// Play area bounds plus goal geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    pub goal: GoalRect,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            goal: GoalRect::default(),
        }
    }
}

/// Shootout rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootoutConfig {
    pub shots_per_round: u32,
    pub max_rounds: u32,
    /// Delay between one outcome and the next kick
    pub time_between_shots_ms: u32,
    pub initial_difficulty: f32,
    pub difficulty_increment: f32,
}

impl Default for ShootoutConfig {
    fn default() -> Self {
        Self {
            shots_per_round: 9,
            max_rounds: 3,
            time_between_shots_ms: 3000,
            initial_difficulty: 0.5,
            difficulty_increment: 0.2,
        }
    }
}

/// Current phase of the shootout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    Menu,
    /// Shots are being taken
    Playing,
    /// Loop and shot timer frozen
    Paused,
    /// All rounds done
    GameOver,
}

/// Home is the keeper, away is the shooter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub home: u32,
    pub away: u32,
}

/// How a single shot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Save,
    Goal,
    /// Wide, over, or across the line outside the goal
    Miss,
}

/// Things that happened during a tick, for audio/HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    ShotScheduled { round: u32, shot: u32 },
    Kick { round: u32, shot: u32, speed: f32 },
    Deflected { hand: Hand, point: Vec2 },
    Outcome { round: u32, shot: u32, outcome: ShotOutcome },
    RoundAdvanced { round: u32, difficulty: f32 },
    GameOver { scores: Scores, saves: u32 },
    Paused,
    Resumed,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub field: Field,
    pub hands: Hands,
    pub ball: BallSnapshot,
}

/// Complete shootout state. Owns its ball, keeper and RNG.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub config: ShootoutConfig,
    pub field: Field,
    pub phase: GamePhase,
    /// 1-based
    pub current_round: u32,
    /// 0 before the first kick of a round, then 1..=total_shots
    pub current_shot: u32,
    pub total_shots: u32,
    pub scores: Scores,
    pub saves: u32,
    pub difficulty: f32,
    /// Ticks spent in `Playing`
    pub time_ticks: u64,
    pub ball: Ball,
    pub goalkeeper: Goalkeeper,
    /// Ticks until the announced shot is kicked; `None` when disarmed
    pub(crate) kick_deadline: Option<u32>,
    /// A shot has been announced but not kicked yet
    pub(crate) kick_pending: bool,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default rules and field
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, ShootoutConfig::default(), Field::default())
    }

    pub fn with_config(seed: u64, config: ShootoutConfig, field: Field) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            field,
            phase: GamePhase::Menu,
            current_round: 1,
            current_shot: 0,
            total_shots: config.shots_per_round,
            scores: Scores::default(),
            saves: 0,
            difficulty: config.initial_difficulty,
            time_ticks: 0,
            ball: Ball::new(),
            goalkeeper: Goalkeeper::new(&field),
            kick_deadline: None,
            kick_pending: false,
            events: Vec::new(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Ticks remaining before the next kick, if the shot timer is armed
    pub fn kick_deadline(&self) -> Option<u32> {
        self.kick_deadline
    }

    pub fn frame(&self) -> Frame {
        Frame {
            field: self.field,
            hands: self.goalkeeper.hands(),
            ball: self.ball.snapshot(),
        }
    }
}
