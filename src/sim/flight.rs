//! 2D ball flight
//!
//! Side-view projectile with floor and wall bounces, in canvas coordinates
//! (origin top-left, y grows downward). One call advances one frame.

use serde::{Deserialize, Serialize};

use crate::tuning::{FlightTuning, RectTuning};

/// Ball state in the 2D court. Field names double as the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball2d {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Ball2d {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// True when all components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.dx.is_finite() && self.dy.is_finite()
    }
}

/// Advance the ball by one frame
pub fn step_ball(ball: &Ball2d, tuning: &FlightTuning) -> Ball2d {
    let mut next = *ball;

    next.dy += tuning.gravity;
    next.x += next.dx;
    next.y += next.dy;

    // Floor
    if next.y > tuning.floor_y {
        next.y = tuning.floor_y;
        next.dy *= tuning.bounce;
    }

    // Walls
    if next.x < tuning.left_wall {
        next.x = tuning.left_wall;
        next.dx *= tuning.bounce;
    }
    if next.x > tuning.right_wall {
        next.x = tuning.right_wall;
        next.dx *= tuning.bounce;
    }

    next
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<RectTuning> for Rect {
    fn from(r: RectTuning) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}
