//! Ball vs glove collision
//!
//! Gloves are axis-aligned rectangles; the ball is a circle in the screen
//! plane. Closest-point test: clamp the ball center into the rectangle and
//! compare the distance to the radius.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallInfo};
use super::goalkeeper::Goalkeeper;

/// Center-based axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandRect {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl HandRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            width,
            height,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Point on (or inside) the rectangle nearest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.max(self.min()).min(self.max())
    }
}

/// Where the ball touched a glove
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub point: Vec2,
    /// Distance from contact point to ball center
    pub distance: f32,
}

/// Which glove made the save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

/// Circle vs rectangle. `None` for an idle ball or no overlap.
pub fn detect_collision(ball: &BallInfo, hand: &HandRect) -> Option<Contact> {
    if !ball.is_active {
        return None;
    }

    let closest = hand.closest_point(ball.center);
    let distance_sq = (ball.center - closest).length_squared();

    if distance_sq < ball.radius * ball.radius {
        Some(Contact {
            point: closest,
            distance: distance_sq.sqrt(),
        })
    } else {
        None
    }
}

/// Test left glove then right glove; the first hit saves the ball.
pub fn check_collisions<R: Rng>(
    ball: &mut Ball,
    goalkeeper: &Goalkeeper,
    rng: &mut R,
) -> Option<(Hand, Contact)> {
    let info = ball.info();
    let hands = goalkeeper.hands();

    let hit = detect_collision(&info, &hands.left)
        .map(|c| (Hand::Left, c))
        .or_else(|| detect_collision(&info, &hands.right).map(|c| (Hand::Right, c)))?;

    ball.save(hit.1.point, rng);
    Some(hit)
}
