//! Goalkeeper gloves
//!
//! Two glove rectangles follow a pointer target with per-tick smoothing.
//! The target is clamped so both gloves stay inside the play area.

use glam::Vec2;

use super::collision::HandRect;
use super::state::Field;
use crate::consts::*;

/// Both glove rectangles for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hands {
    pub left: HandRect,
    pub right: HandRect,
}

#[derive(Debug, Clone)]
pub struct Goalkeeper {
    /// Point between the two gloves the keeper is moving toward
    target: Vec2,
    /// Current point between the gloves
    position: Vec2,
    pub hand_size: Vec2,
    /// Horizontal distance from the midpoint to each glove center
    pub spread: f32,
    /// Fraction of remaining distance covered per tick (0-1]
    follow_rate: f32,
}

impl Goalkeeper {
    pub fn new(field: &Field) -> Self {
        let center = field.goal.center();
        Self {
            target: center,
            position: center,
            hand_size: Vec2::new(HAND_WIDTH, HAND_HEIGHT),
            spread: HAND_SPREAD,
            follow_rate: HAND_FOLLOW_RATE,
        }
    }

    /// Keep both gloves fully on screen
    fn clamp_target(&self, target: Vec2, field: &Field) -> Vec2 {
        let half = self.hand_size / 2.0;
        let min = Vec2::new(self.spread + half.x, half.y);
        let max = Vec2::new(field.width - self.spread - half.x, field.height - half.y);
        target.max(min).min(max)
    }

    /// Set where the pointer is (play-area coordinates)
    pub fn set_target(&mut self, pointer: Vec2) {
        self.target = pointer;
    }

    /// Move one tick toward the target
    pub fn update(&mut self, field: &Field) {
        let target = self.clamp_target(self.target, field);
        self.position += (target - self.position) * self.follow_rate;
    }

    /// Jump straight to a pointer position (clamped)
    pub fn snap_to(&mut self, pointer: Vec2, field: &Field) {
        self.target = pointer;
        self.position = self.clamp_target(pointer, field);
    }

    /// Make the gloves lag more; used as rounds get harder
    pub fn slow_down(&mut self) {
        self.follow_rate = (self.follow_rate * HAND_FOLLOW_DECAY).max(HAND_FOLLOW_MIN);
    }

    pub fn follow_rate(&self) -> f32 {
        self.follow_rate
    }

    /// Back to center with the starting follow rate
    pub fn reset(&mut self, field: &Field) {
        *self = Self::new(field);
    }

    pub fn hands(&self) -> Hands {
        let size = self.hand_size;
        let offset = Vec2::new(self.spread, 0.0);
        let left = self.position - offset;
        let right = self.position + offset;
        Hands {
            left: HandRect::new(left.x, left.y, size.x, size.y),
            right: HandRect::new(right.x, right.y, size.x, size.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hands_straddle_position() {
        let field = Field::default();
        let mut keeper = Goalkeeper::new(&field);
        keeper.snap_to(Vec2::new(400.0, 200.0), &field);

        let hands = keeper.hands();
        assert_eq!(hands.left.center, Vec2::new(400.0 - HAND_SPREAD, 200.0));
        assert_eq!(hands.right.center, Vec2::new(400.0 + HAND_SPREAD, 200.0));
        assert_eq!(hands.left.width, HAND_WIDTH);
        assert_eq!(hands.right.height, HAND_HEIGHT);
    }

    #[test]
    fn test_follow_is_smoothed() {
        let field = Field::default();
        let mut keeper = Goalkeeper::new(&field);
        keeper.snap_to(Vec2::new(400.0, 200.0), &field);
        keeper.set_target(Vec2::new(500.0, 200.0));

        keeper.update(&field);
        let x = (keeper.hands().left.center.x + keeper.hands().right.center.x) / 2.0;
        assert!((x - (400.0 + 100.0 * HAND_FOLLOW_RATE)).abs() < 1e-3);

        for _ in 0..200 {
            keeper.update(&field);
        }
        let x = (keeper.hands().left.center.x + keeper.hands().right.center.x) / 2.0;
        assert!((x - 500.0).abs() < 0.5);
    }

    #[test]
    fn test_gloves_stay_on_screen() {
        let field = Field::default();
        let mut keeper = Goalkeeper::new(&field);
        keeper.snap_to(Vec2::new(-500.0, 5000.0), &field);

        let hands = keeper.hands();
        assert!(hands.left.min().x >= 0.0);
        assert!(hands.left.max().y <= field.height);
        keeper.snap_to(Vec2::new(5000.0, -500.0), &field);
        let hands = keeper.hands();
        assert!(hands.right.max().x <= field.width);
        assert!(hands.right.min().y >= 0.0);
    }

    #[test]
    fn test_slow_down_has_floor() {
        let field = Field::default();
        let mut keeper = Goalkeeper::new(&field);
        keeper.slow_down();
        assert!((keeper.follow_rate() - HAND_FOLLOW_RATE * HAND_FOLLOW_DECAY).abs() < 1e-6);

        for _ in 0..100 {
            keeper.slow_down();
        }
        assert_eq!(keeper.follow_rate(), HAND_FOLLOW_MIN);

        keeper.reset(&field);
        assert_eq!(keeper.follow_rate(), HAND_FOLLOW_RATE);
    }
}
