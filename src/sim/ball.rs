//! Ball flight: launch, per-tick trajectory, goal-line and bounds tests
//!
//! The ball lives in play-area pixel space (x right, y down) plus a depth axis
//! `z`. It is launched at `INITIAL_Z` and travels toward the goal plane at
//! `z = 0`. Curve, wobble and depth-scaled gravity shape the path.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Field;
use crate::consts::*;
use crate::depth_progress;

/// Launch direction used when none is given or the given one is degenerate
pub const DEFAULT_DIRECTION: Vec3 = Vec3::new(0.0, -0.2, 1.0);

/// Per-shot trajectory modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BallEffect {
    /// Lateral/vertical acceleration, scaled by distance travelled
    pub curve: Vec2,
    /// Amplitude of the sinusoidal position offset
    pub wobble: Vec2,
    /// Visual spin rate (radians/tick)
    pub spin: f32,
    /// Oscillation phase, advanced a fixed step per tick
    pub phase: f32,
}

/// Launch parameters. Every field is independently overridable; unset fields
/// resolve to defaults at `shoot` time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotOptions {
    pub speed: Option<f32>,
    pub direction: Option<Vec3>,
    pub curve: Option<Vec2>,
    pub wobble: Option<Vec2>,
    pub spin: Option<f32>,
    pub start_position: Option<Vec3>,
}

impl ShotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn direction(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn curve(mut self, curve: Vec2) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn wobble(mut self, wobble: Vec2) -> Self {
        self.wobble = Some(wobble);
        self
    }

    pub fn spin(mut self, spin: f32) -> Self {
        self.spin = Some(spin);
        self
    }

    pub fn start_position(mut self, start: Vec3) -> Self {
        self.start_position = Some(start);
        self
    }

    /// Resolve to concrete launch values.
    ///
    /// Invalid speed or a zero/non-finite direction is replaced with the
    /// default rather than allowed to poison the trajectory with NaN.
    pub fn resolve<R: Rng>(&self, field: &Field, rng: &mut R) -> ResolvedShot {
        let speed = match self.speed {
            Some(s) if s.is_finite() && s > 0.0 => s,
            Some(s) => {
                log::warn!("Rejected shot speed {s}, using {DEFAULT_SPEED}");
                DEFAULT_SPEED
            }
            None => DEFAULT_SPEED,
        };

        let direction = match self.direction {
            Some(d) => d.try_normalize().unwrap_or_else(|| {
                log::warn!("Rejected degenerate shot direction {d:?}");
                DEFAULT_DIRECTION.normalize()
            }),
            None => DEFAULT_DIRECTION.normalize(),
        };

        let effect = BallEffect {
            curve: self.curve.unwrap_or_else(|| {
                Vec2::new(rng.random_range(-0.3..=0.3), rng.random_range(-0.1..=0.1))
            }),
            wobble: self
                .wobble
                .unwrap_or_else(|| Vec2::new(rng.random_range(0.0..=0.5), rng.random_range(0.0..=0.5))),
            spin: self.spin.unwrap_or_else(|| rng.random_range(-0.1..=0.1)),
            phase: 0.0,
        };

        let start = self
            .start_position
            .unwrap_or_else(|| Vec3::new(field.width / 2.0, field.height / 1.2, INITIAL_Z));

        ResolvedShot {
            speed,
            direction,
            effect,
            start,
        }
    }
}

/// Concrete launch values after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedShot {
    pub speed: f32,
    /// Unit vector
    pub direction: Vec3,
    pub effect: BallEffect,
    pub start: Vec3,
}

/// What the collision test needs to know about the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallInfo {
    pub center: Vec2,
    pub radius: f32,
    pub is_active: bool,
}

/// Renderable view of the ball for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallSnapshot {
    pub position: Vec2,
    pub depth: f32,
    pub radius: f32,
    pub rotation: f32,
    pub visible: bool,
}

/// The ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vec3,
    /// Pixels per tick
    pub velocity: Vec3,
    pub effect: BallEffect,
    /// Derived from depth every tick
    pub radius: f32,
    /// Accumulated visual rotation (radians)
    pub rotation: f32,
    visible: bool,
    is_active: bool,
    is_saved: bool,
    is_goal: bool,
    /// Outcome latch; an idle ball has nothing left to score
    is_processed: bool,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

impl Ball {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, INITIAL_Z),
            velocity: Vec3::ZERO,
            effect: BallEffect::default(),
            radius: Self::radius_at_depth(INITIAL_Z),
            rotation: 0.0,
            visible: false,
            is_active: false,
            is_saved: false,
            is_goal: false,
            is_processed: true,
        }
    }

    /// Visual radius for a depth: quadratic ease from min to max size so the
    /// ball swells as it approaches.
    pub fn radius_at_depth(z: f32) -> f32 {
        let t = depth_progress(z);
        (BALL_MIN_SIZE + (BALL_MAX_SIZE - BALL_MIN_SIZE) * t * t) / 2.0
    }

    /// Launch the ball
    pub fn shoot<R: Rng>(&mut self, options: &ShotOptions, field: &Field, rng: &mut R) {
        let shot = options.resolve(field, rng);

        self.position = shot.start;
        self.velocity = shot.direction * shot.speed;
        self.effect = shot.effect;
        self.radius = Self::radius_at_depth(shot.start.z);
        self.rotation = 0.0;
        self.visible = true;

        self.is_active = true;
        self.is_saved = false;
        self.is_goal = false;
        self.is_processed = false;
    }

    /// Advance one tick. Returns whether the ball is still in flight.
    pub fn update(&mut self, field: &Field) -> bool {
        if !self.is_active {
            return false;
        }

        self.effect.phase += PHASE_STEP;

        // Curve acceleration is scaled by the remaining depth
        let curve_factor = self.position.z.abs() / 1000.0;
        self.velocity.x += self.effect.curve.x * CURVE_STRENGTH * curve_factor;
        self.velocity.y += self.effect.curve.y * CURVE_STRENGTH * curve_factor;

        // Wobble is a positional offset, never fed back into velocity
        let phase = self.effect.phase;
        let wobble = Vec3::new(
            (phase * 3.0).sin() * self.effect.wobble.x,
            (phase * 2.0).cos() * self.effect.wobble.y,
            0.0,
        );
        self.position += self.velocity + wobble;

        let gravity_factor = 1.0 + (INITIAL_Z.abs() - self.position.z.abs()) / 2000.0;
        self.velocity.y += GRAVITY * gravity_factor;

        self.rotation += BASE_ROLL + self.effect.spin;

        // Crossed the goal plane: terminal whether or not it went in
        if self.position.z >= 0.0 {
            if field.goal.contains(self.position.truncate()) && !self.is_saved {
                self.is_goal = true;
            }
            self.is_active = false;
            return false;
        }

        if self.is_out_of_bounds(field) {
            self.is_active = false;
            return false;
        }

        self.radius = Self::radius_at_depth(self.position.z);
        true
    }

    /// Out past the play area (with slack), or knocked back beyond launch depth
    fn is_out_of_bounds(&self, field: &Field) -> bool {
        let slack = self.radius + BOUNDS_MARGIN;
        let p = self.position;
        p.x < -slack
            || p.x > field.width + slack
            || p.y < -slack
            || p.y > field.height + slack
            || p.z < INITIAL_Z
    }

    /// Glove contact: bounce back along depth and deflect sideways.
    /// Returns false if the ball was idle or already saved.
    pub fn save<R: Rng>(&mut self, contact_point: Vec2, rng: &mut R) -> bool {
        if !self.is_active || self.is_saved {
            return false;
        }

        self.is_saved = true;

        self.velocity.z *= SAVE_REBOUND;
        self.velocity.x = rng.random_range(-SAVE_SPREAD_X..=SAVE_SPREAD_X);
        self.velocity.y = -rng.random_range(SAVE_LIFT_MIN..=SAVE_LIFT_MAX);

        // Deflected ball carries no more swerve, just a spin off the glove
        self.effect.curve = Vec2::ZERO;
        self.effect.wobble = Vec2::ZERO;
        let offset = self.position.x - contact_point.x;
        self.effect.spin = (offset * 0.02).clamp(-0.5, 0.5);

        true
    }

    /// Stop and hide. Leaves the outcome latch alone.
    pub fn reset(&mut self) {
        self.is_active = false;
        self.is_saved = false;
        self.is_goal = false;
        self.visible = false;
    }

    pub fn info(&self) -> BallInfo {
        BallInfo {
            center: self.position.truncate(),
            radius: self.radius,
            is_active: self.is_active,
        }
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            position: self.position.truncate(),
            depth: self.position.z,
            radius: self.radius,
            rotation: self.rotation,
            visible: self.visible,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Crossed the goal plane inside the goal without a save
    pub fn is_scored(&self) -> bool {
        self.is_goal
    }

    /// Touched by a glove
    pub fn is_stopped(&self) -> bool {
        self.is_saved
    }

    pub fn is_processed(&self) -> bool {
        self.is_processed
    }

    pub fn mark_processed(&mut self) {
        self.is_processed = true;
    }
}

/// Depth speeds below this are treated as never reaching the goal plane
const MIN_DEPTH_SPEED: f32 = 0.1;

/// Vertical drop accumulated by gravity alone from `start_z` until the ball
/// reaches the goal plane at constant depth speed `velocity_z`.
/// Zero for a ball that is not meaningfully moving toward the goal.
pub fn predicted_drop(start_z: f32, velocity_z: f32) -> f32 {
    if !velocity_z.is_finite() || velocity_z < MIN_DEPTH_SPEED || start_z >= 0.0 {
        return 0.0;
    }

    let ticks = (-start_z / velocity_z).ceil() as u32;
    let mut vy = 0.0;
    let mut y = 0.0;
    for i in 1..=ticks {
        y += vy;
        let z = start_z + velocity_z * i as f32;
        vy += GRAVITY * (1.0 + (INITIAL_Z.abs() - z.abs()) / 2000.0);
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    /// Straight shot at the middle of the goal with no swerve
    fn straight_shot(field: &Field) -> ShotOptions {
        let goal = field.goal;
        let start = Vec3::new((goal.left + goal.right) / 2.0, (goal.top + goal.bottom) / 2.0, INITIAL_Z);
        ShotOptions::new()
            .speed(40.0)
            .direction(Vec3::Z)
            .curve(Vec2::ZERO)
            .wobble(Vec2::ZERO)
            .spin(0.0)
            .start_position(start)
    }

    fn run_to_rest(ball: &mut Ball, field: &Field) -> u32 {
        let mut ticks = 0;
        while ball.update(field) {
            ticks += 1;
            assert!(ticks < 10_000, "ball never came to rest");
        }
        ticks
    }

    #[test]
    fn test_shoot_activates_and_clears_flags() {
        let field = Field::default();
        let mut ball = Ball::new();
        ball.shoot(&ShotOptions::new(), &field, &mut rng());

        assert!(ball.is_active());
        assert!(!ball.is_stopped());
        assert!(!ball.is_scored());
        assert!(!ball.is_processed());
        assert_eq!(ball.position.z, INITIAL_Z);
        assert!((ball.velocity.length() - DEFAULT_SPEED).abs() < 1e-3);
        assert_eq!(ball.effect.phase, 0.0);
    }

    #[test]
    fn test_zero_direction_falls_back_to_default() {
        let field = Field::default();
        let mut ball = Ball::new();
        ball.shoot(&ShotOptions::new().direction(Vec3::ZERO), &field, &mut rng());

        assert!(ball.velocity.is_finite());
        assert!(ball.velocity.z > 0.0);
    }

    #[test]
    fn test_non_positive_speed_falls_back_to_default() {
        let field = Field::default();
        let shot = ShotOptions::new().speed(-3.0).resolve(&field, &mut rng());
        assert_eq!(shot.speed, DEFAULT_SPEED);
        let shot = ShotOptions::new().speed(f32::NAN).resolve(&field, &mut rng());
        assert_eq!(shot.speed, DEFAULT_SPEED);
    }

    #[test]
    fn test_direction_need_not_be_unit() {
        let field = Field::default();
        let shot = ShotOptions::new()
            .direction(Vec3::new(0.0, 0.0, 500.0))
            .speed(10.0)
            .resolve(&field, &mut rng());
        assert!((shot.direction - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_update_inactive_is_noop() {
        let field = Field::default();
        let mut ball = Ball::new();
        let before = ball.clone();

        assert!(!ball.update(&field));
        assert_eq!(ball, before);
    }

    #[test]
    fn test_update_after_rest_mutates_nothing() {
        let field = Field::default();

        // Scored
        let mut ball = Ball::new();
        ball.shoot(&straight_shot(&field), &field, &mut rng());
        run_to_rest(&mut ball, &field);
        assert!(ball.is_scored());
        let before = ball.clone();
        assert!(!ball.update(&field));
        assert_eq!(ball, before);

        // Saved, then knocked back past launch depth
        let mut ball = Ball::new();
        ball.shoot(&straight_shot(&field), &field, &mut rng());
        ball.update(&field);
        let contact = ball.position.truncate();
        assert!(ball.save(contact, &mut rng()));
        run_to_rest(&mut ball, &field);
        assert!(ball.is_stopped());
        let before = ball.clone();
        assert!(!ball.update(&field));
        assert_eq!(ball, before);
    }

    #[test]
    fn test_straight_shot_scores() {
        let field = Field::default();
        let mut ball = Ball::new();
        ball.shoot(&straight_shot(&field), &field, &mut rng());

        run_to_rest(&mut ball, &field);
        assert!(ball.position.z >= 0.0);
        assert!(ball.is_scored());
        assert!(!ball.is_stopped());
        assert!(!ball.is_active());
    }

    #[test]
    fn test_crossing_outside_goal_is_neither() {
        let field = Field::default();
        let mut ball = Ball::new();
        // Low along the ground, well under the crossbar and below the goal mouth
        let start = Vec3::new(field.goal.left - 100.0, field.goal.bottom + 150.0, INITIAL_Z);
        let options = straight_shot(&field).start_position(start).speed(200.0);
        ball.shoot(&options, &field, &mut rng());

        run_to_rest(&mut ball, &field);
        assert!(ball.position.z >= 0.0);
        assert!(!ball.is_scored());
        assert!(!ball.is_stopped());
    }

    #[test]
    fn test_wide_shot_leaves_bounds() {
        let field = Field::default();
        let mut ball = Ball::new();
        let options = straight_shot(&field).direction(Vec3::new(1.0, 0.0, 0.05));
        ball.shoot(&options, &field, &mut rng());

        run_to_rest(&mut ball, &field);
        assert!(ball.position.z < 0.0);
        assert!(ball.position.x > field.width);
        assert!(!ball.is_scored());
    }

    #[test]
    fn test_save_blocks_goal() {
        let field = Field::default();
        let mut ball = Ball::new();
        let mut rng = rng();
        ball.shoot(&straight_shot(&field), &field, &mut rng);

        for _ in 0..10 {
            ball.update(&field);
        }
        let contact = ball.position.truncate();
        assert!(ball.save(contact, &mut rng));
        assert!(ball.velocity.z < 0.0);
        assert!(ball.velocity.y < 0.0);

        run_to_rest(&mut ball, &field);
        assert!(ball.is_stopped());
        assert!(!ball.is_scored());
    }

    #[test]
    fn test_save_is_idempotent() {
        let field = Field::default();
        let mut ball = Ball::new();
        let mut rng = rng();
        ball.shoot(&straight_shot(&field), &field, &mut rng);
        ball.update(&field);

        assert!(ball.save(Vec2::ZERO, &mut rng));
        let velocity = ball.velocity;
        assert!(!ball.save(Vec2::ZERO, &mut rng));
        assert_eq!(ball.velocity, velocity);
        assert!(ball.is_stopped());
    }

    #[test]
    fn test_save_ignored_on_idle_ball() {
        let mut ball = Ball::new();
        assert!(!ball.save(Vec2::ZERO, &mut rng()));
        assert!(!ball.is_stopped());
    }

    #[test]
    fn test_reset_keeps_processed_latch() {
        let field = Field::default();
        let mut ball = Ball::new();
        ball.shoot(&straight_shot(&field), &field, &mut rng());
        ball.reset();

        assert!(!ball.is_active());
        assert!(!ball.snapshot().visible);
        assert!(!ball.is_processed());
    }

    #[test]
    fn test_radius_grows_toward_goal() {
        let far = Ball::radius_at_depth(INITIAL_Z);
        let mid = Ball::radius_at_depth(INITIAL_Z / 2.0);
        let near = Ball::radius_at_depth(0.0);
        assert_eq!(far, BALL_MIN_SIZE / 2.0);
        assert_eq!(near, BALL_MAX_SIZE / 2.0);
        // Quadratic: halfway in depth is less than halfway in size
        assert!(mid < (far + near) / 2.0);
    }

    #[test]
    fn test_curve_bends_path() {
        let field = Field::default();
        let mut plain = Ball::new();
        let mut curved = Ball::new();
        plain.shoot(&straight_shot(&field), &field, &mut rng());
        curved.shoot(&straight_shot(&field).curve(Vec2::new(1.0, 0.0)), &field, &mut rng());

        for _ in 0..30 {
            plain.update(&field);
            curved.update(&field);
        }
        assert!(curved.position.x > plain.position.x);
    }

    #[test]
    fn test_curve_scales_with_remaining_depth() {
        let field = Field::default();
        let mut ball = Ball::new();
        ball.shoot(
            &straight_shot(&field).speed(25.0).curve(Vec2::new(1.0, 0.0)),
            &field,
            &mut rng(),
        );

        // |z| / 1000 = 2 at launch depth
        ball.update(&field);
        assert!((ball.velocity.x - 2.0 * CURVE_STRENGTH).abs() < 1e-6);
    }

    #[test]
    fn test_predicted_drop_rejects_crawling_ball() {
        assert_eq!(predicted_drop(INITIAL_Z, 1e-5), 0.0);
        assert_eq!(predicted_drop(INITIAL_Z, 0.0), 0.0);
        assert_eq!(predicted_drop(INITIAL_Z, f32::NAN), 0.0);
        assert!(predicted_drop(INITIAL_Z, MIN_DEPTH_SPEED) > 0.0);
    }

    #[test]
    fn test_wobble_does_not_touch_velocity() {
        let field = Field::default();
        let mut ball = Ball::new();
        ball.shoot(&straight_shot(&field).wobble(Vec2::new(3.0, 3.0)), &field, &mut rng());
        let vx = ball.velocity.x;
        ball.update(&field);
        assert_eq!(ball.velocity.x, vx);
    }

    #[test]
    fn test_predicted_drop_matches_flight() {
        let field = Field::default();
        let mut ball = Ball::new();
        let options = straight_shot(&field).speed(25.0);
        ball.shoot(&options, &field, &mut rng());
        let start_y = ball.position.y;

        run_to_rest(&mut ball, &field);
        let expected = predicted_drop(INITIAL_Z, 25.0);
        assert!((ball.position.y - start_y - expected).abs() < 1e-2);
    }

    proptest! {
        #[test]
        fn prop_shoot_always_clean(seed in any::<u64>(), speed in 0.1f32..80.0, dx in -1.0f32..1.0, dy in -1.0f32..1.0) {
            let field = Field::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ball = Ball::new();
            ball.shoot(&ShotOptions::new().speed(speed).direction(Vec3::new(dx, dy, 1.0)), &field, &mut rng);
            prop_assert!(ball.is_active());
            prop_assert!(!ball.is_stopped());
            prop_assert!(!ball.is_scored());
        }

        #[test]
        fn prop_forward_shot_terminates(
            seed in any::<u64>(),
            speed in 5.0f32..60.0,
            dx in -0.5f32..0.5,
            dy in -0.5f32..0.5,
            cx in -1.0f32..1.0,
            cy in -1.0f32..1.0,
            save_at in proptest::option::of(0u32..120),
        ) {
            let field = Field::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ball = Ball::new();
            ball.shoot(
                &ShotOptions::new()
                    .speed(speed)
                    .direction(Vec3::new(dx, dy, 1.0))
                    .curve(Vec2::new(cx, cy)),
                &field,
                &mut rng,
            );

            let mut ticks = 0u32;
            while ball.update(&field) {
                if Some(ticks) == save_at {
                    let contact = ball.position.truncate();
                    ball.save(contact, &mut rng);
                }
                ticks += 1;
                prop_assert!(ticks < 2_000);
                prop_assert!(!(ball.is_scored() && ball.is_stopped()));
            }
            prop_assert!(!(ball.is_scored() && ball.is_stopped()));
        }
    }
}
