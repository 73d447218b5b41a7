//! Shape generation for 2D primitives and the pitch scene
//!
//! All output is in play-area pixels (y down); the pipeline maps to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::depth_progress;
use crate::sim::{BallSnapshot, Field, Frame, HandRect};

/// Net mesh spacing in pixels
const NET_CELL: f32 = 25.0;
/// Goal post thickness in pixels
const POST_WIDTH: f32 = 8.0;
const LINE_WIDTH: f32 = 3.0;
const CIRCLE_SEGMENTS: u32 = 24;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Filled ellipse with per-axis radii
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Axis-aligned filled rectangle from two corners
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Thick line segment as a quad
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let (a1, a2, b1, b2) = (a + perp, a - perp, b + perp, b - perp);
    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Striped grass with the goal line and penalty spot
pub fn pitch(field: &Field) -> Vec<Vertex> {
    let mut vertices = rect(Vec2::ZERO, Vec2::new(field.width, field.height), colors::PITCH);

    let stripes = 8;
    let stripe_width = field.width / stripes as f32;
    for i in (0..stripes).step_by(2) {
        let x = i as f32 * stripe_width;
        vertices.extend(rect(
            Vec2::new(x, field.goal.bottom),
            Vec2::new(x + stripe_width, field.height),
            colors::PITCH_STRIPE,
        ));
    }

    vertices.extend(line(
        Vec2::new(0.0, field.goal.bottom),
        Vec2::new(field.width, field.goal.bottom),
        LINE_WIDTH,
        colors::LINE,
    ));
    vertices.extend(circle(
        Vec2::new(field.width / 2.0, field.height * 0.8),
        5.0,
        colors::LINE,
        12,
    ));

    vertices
}

/// Net mesh inside the goal mouth
pub fn net(field: &Field) -> Vec<Vertex> {
    let goal = field.goal;
    let mut vertices = Vec::new();

    let mut x = goal.left + NET_CELL;
    while x < goal.right {
        vertices.extend(line(
            Vec2::new(x, goal.top),
            Vec2::new(x, goal.bottom),
            1.0,
            colors::NET,
        ));
        x += NET_CELL;
    }

    let mut y = goal.top + NET_CELL;
    while y < goal.bottom {
        vertices.extend(line(
            Vec2::new(goal.left, y),
            Vec2::new(goal.right, y),
            1.0,
            colors::NET,
        ));
        y += NET_CELL;
    }

    vertices
}

/// Posts and crossbar, drawn over the net
pub fn goal_frame(field: &Field) -> Vec<Vertex> {
    let goal = field.goal;
    let half = POST_WIDTH / 2.0;

    let mut vertices = rect(
        Vec2::new(goal.left - half, goal.top - half),
        Vec2::new(goal.left + half, goal.bottom),
        colors::GOAL_POST,
    );
    vertices.extend(rect(
        Vec2::new(goal.right - half, goal.top - half),
        Vec2::new(goal.right + half, goal.bottom),
        colors::GOAL_POST,
    ));
    vertices.extend(rect(
        Vec2::new(goal.left - half, goal.top - half),
        Vec2::new(goal.right + half, goal.top + half),
        colors::GOAL_POST,
    ));

    vertices
}

/// One glove: palm plus a cuff strip along the bottom
pub fn glove(hand: &HandRect) -> Vec<Vertex> {
    let (min, max) = (hand.min(), hand.max());
    let cuff_top = max.y - hand.height * 0.2;

    let mut vertices = rect(min, Vec2::new(max.x, cuff_top), colors::GLOVE);
    vertices.extend(rect(Vec2::new(min.x, cuff_top), max, colors::GLOVE_CUFF));
    vertices
}

/// Ground shadow under the ball; slides from the near edge up to the goal
/// line as the ball gains depth.
pub fn ball_shadow(ball: &BallSnapshot, field: &Field) -> Vec<Vertex> {
    let t = depth_progress(ball.depth);
    let ground_y = field.height + (field.goal.bottom - field.height) * t;
    let radii = Vec2::new(ball.radius, ball.radius * 0.3);

    ellipse(
        Vec2::new(ball.position.x, ground_y),
        radii,
        colors::SHADOW,
        CIRCLE_SEGMENTS,
    )
}

/// Ball disc with an outline and a patch that turns with its rotation
pub fn ball(ball: &BallSnapshot) -> Vec<Vertex> {
    let center = ball.position;
    let r = ball.radius;

    let mut vertices = circle(center, r, colors::BALL, CIRCLE_SEGMENTS);
    vertices.extend(ring(center, r * 0.9, r, colors::BALL_PATCH, CIRCLE_SEGMENTS));

    let marker = center + Vec2::new(ball.rotation.cos(), ball.rotation.sin()) * (r * 0.45);
    vertices.extend(circle(marker, r * 0.3, colors::BALL_PATCH, 10));
    vertices.extend(circle(center, r * 0.2, colors::BALL_PATCH, 8));

    vertices
}

/// Full scene for one frame, back to front
pub fn build_scene(frame: &Frame) -> Vec<Vertex> {
    let field = &frame.field;

    let mut vertices = pitch(field);
    vertices.extend(net(field));
    vertices.extend(goal_frame(field));

    if frame.ball.visible {
        vertices.extend(ball_shadow(&frame.ball, field));
        vertices.extend(ball(&frame.ball));
    }

    vertices.extend(glove(&frame.hands.left));
    vertices.extend(glove(&frame.hands.right));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    #[test]
    fn test_circle_vertex_count() {
        let vertices = circle(Vec2::ZERO, 10.0, colors::BALL, 16);
        assert_eq!(vertices.len(), 48);
        for v in vertices.iter().skip(1).step_by(3) {
            let d = Vec2::from(v.position).length();
            assert!((d - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_line_has_width() {
        let vertices = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, colors::LINE);
        assert_eq!(vertices.len(), 6);
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_goal_frame_outlines_goal() {
        let field = Field::default();
        let vertices = goal_frame(&field);
        assert_eq!(vertices.len(), 18);
        let max_y = vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, field.goal.bottom);
    }

    #[test]
    fn test_idle_ball_not_drawn() {
        let state = GameState::new(1);
        let frame = state.frame();
        assert!(!frame.ball.visible);

        let with_ball = {
            let mut frame = frame;
            frame.ball.visible = true;
            build_scene(&frame).len()
        };
        let without_ball = build_scene(&frame).len();
        assert_eq!(
            with_ball - without_ball,
            ball_shadow(&frame.ball, &frame.field).len() + ball(&frame.ball).len()
        );
    }

    #[test]
    fn test_shadow_reaches_goal_line() {
        let field = Field::default();
        let snapshot = BallSnapshot {
            position: Vec2::new(400.0, 200.0),
            depth: 0.0,
            radius: 35.0,
            rotation: 0.0,
            visible: true,
        };
        let center = ball_shadow(&snapshot, &field)[0].position;
        assert_eq!(center[1], field.goal.bottom);
    }
}
