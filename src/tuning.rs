//! Gameplay tuning
//!
//! Every physics and gameplay constant used by the simulation. Defaults are
//! the values the demos ship with; any subset can be overridden from JSON
//! (front-end `?tuning=` query value) or TOML/env (physics server).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 2D ball flight constants (shared by the local stepper and the server)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Downward acceleration per frame (canvas y grows downward)
    pub gravity: f32,
    /// Floor height in canvas pixels
    pub floor_y: f32,
    /// Left wall x
    pub left_wall: f32,
    /// Right wall x
    pub right_wall: f32,
    /// Velocity multiplier on contact (negative flips direction)
    pub bounce: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            floor_y: 600.0,
            left_wall: 0.0,
            right_wall: 800.0,
            bounce: -0.6,
        }
    }
}

/// Axis-aligned rectangle in canvas coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectTuning {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// 2D side-view court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Court2dTuning {
    /// Canvas size
    pub width: f32,
    pub height: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Launch velocity on shoot
    pub shot_dx: f32,
    pub shot_dy: f32,

    // === Athletes ===
    pub athlete_width: f32,
    pub athlete_height: f32,
    pub player_start: (f32, f32),
    pub player_speed: f32,
    pub opponent_start: (f32, f32),
    pub opponent_speed: f32,

    // === Hoops ===
    pub left_hoop: RectTuning,
    pub right_hoop: RectTuning,

    /// Ball flight
    pub flight: FlightTuning,
}

impl Default for Court2dTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,

            ball_radius: 10.0,
            shot_dx: 8.0,
            shot_dy: -10.0,

            athlete_width: 30.0,
            athlete_height: 50.0,
            player_start: (100.0, 500.0),
            player_speed: 5.0,
            opponent_start: (700.0, 500.0),
            opponent_speed: 4.0,

            left_hoop: RectTuning {
                x: 50.0,
                y: 260.0,
                width: 10.0,
                height: 80.0,
            },
            right_hoop: RectTuning {
                x: 740.0,
                y: 260.0,
                width: 10.0,
                height: 80.0,
            },

            flight: FlightTuning::default(),
        }
    }
}

/// 3D full court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Court3dTuning {
    // === Court ===
    /// Court extent along x
    pub court_width: f32,
    /// Court extent along z
    pub court_depth: f32,
    /// Distance athletes keep from the court edge
    pub edge_margin: f32,

    // === Athletes ===
    pub player_start: Vec3,
    pub opponent_start: Vec3,
    /// Player step per frame
    pub player_speed: f32,
    /// Opponent step per frame while chasing a free ball
    pub chase_speed: f32,
    /// Opponent step per frame while guarding
    pub guard_speed: f32,
    /// Opponent stops chasing inside this horizontal distance
    pub chase_threshold: f32,
    /// Opponent grabs a free ball inside this distance
    pub pickup_distance: f32,
    /// Held ball position relative to its holder
    pub carry_offset: Vec3,

    // === Ball ===
    pub ball_radius: f32,
    /// Vertical acceleration per normalized frame (negative is down)
    pub gravity: f32,
    pub ground_y: f32,
    /// Gap kept between ball and floor on contact
    pub floor_skin: f32,
    /// Height tolerance for the resting check
    pub rest_skin: f32,
    /// Vertical restitution on floor contact
    pub bounce: f32,
    /// Horizontal velocity multiplier on floor contact
    pub floor_friction: f32,
    /// Below this vertical speed a floor contact stops the ball
    pub rest_speed: f32,
    /// Delay before a resting ball is handed to the nearest athlete
    pub pickup_delay_ms: f32,

    // === Hoops ===
    /// Hoop distance from each court end along x
    pub hoop_inset: f32,
    pub rim_height: f32,
    /// Rim distance from the back line along z
    pub rim_z_offset: f32,
    pub rim_radius: f32,
    /// Radial thickness of the rim contact band inside the rim radius
    pub rim_band: f32,
    /// Vertical window around the rim where contact is checked
    pub rim_height_window: f32,
    /// Horizontal speed kept after a rim deflection
    pub rim_damping: f32,
    /// Minimum upward speed after a rim deflection
    pub rim_min_lift: f32,
    pub net_radius: f32,
    pub net_half_height: f32,

    // === Shooting ===
    /// Longest drag that still adds power
    pub shot_max_drag: f32,
    pub shot_drag_divisor: f32,
    /// Vertical component of the aim direction before normalization
    pub shot_aim_lift: f32,
    pub shot_speed_factor: f32,
    pub shot_min_vertical: f32,
    pub shot_vertical_factor: f32,
}

impl Default for Court3dTuning {
    fn default() -> Self {
        Self {
            court_width: 200.0,
            court_depth: 120.0,
            edge_margin: 12.0,

            player_start: Vec3::new(-40.0, 0.0, 0.0),
            opponent_start: Vec3::new(40.0, 0.0, 0.0),
            player_speed: 1.8,
            chase_speed: 0.9,
            guard_speed: 0.4,
            chase_threshold: 6.0,
            pickup_distance: 8.0,
            carry_offset: Vec3::new(0.0, 12.0, -8.0),

            ball_radius: 3.8,
            gravity: -0.45,
            ground_y: 0.0,
            floor_skin: 0.1,
            rest_skin: 0.15,
            bounce: 0.6,
            floor_friction: 0.92,
            rest_speed: 1.0,
            pickup_delay_ms: 300.0,

            hoop_inset: 20.0,
            rim_height: 26.0,
            rim_z_offset: 4.0,
            rim_radius: 6.0,
            rim_band: 2.0,
            rim_height_window: 6.0,
            rim_damping: 0.8,
            rim_min_lift: 2.5,
            net_radius: 5.6,
            net_half_height: 0.7,

            shot_max_drag: 40.0,
            shot_drag_divisor: 1.2,
            shot_aim_lift: 0.7,
            shot_speed_factor: 0.8,
            shot_min_vertical: 6.0,
            shot_vertical_factor: 0.5,
        }
    }
}

impl Court3dTuning {
    /// Half-extents (x, z) athletes are clamped to
    pub fn player_limits(&self) -> (f32, f32) {
        (
            self.court_width / 2.0 - self.edge_margin,
            self.court_depth / 2.0 - self.edge_margin,
        )
    }

    /// Clamp a ground position to the playable area
    pub fn clamp_to_court(&self, pos: Vec3) -> Vec3 {
        let (limit_x, limit_z) = self.player_limits();
        Vec3::new(
            pos.x.clamp(-limit_x, limit_x),
            pos.y,
            pos.z.clamp(-limit_z, limit_z),
        )
    }
}

/// Parse a tuning struct from JSON, filling missing fields with defaults
pub fn from_json<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(Error::Decode)
}

/// Optional JSON override on top of the defaults. A malformed override is
/// logged and ignored.
pub fn from_json_or_default<T>(json: Option<&str>) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
        return T::default();
    };
    match from_json(json) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Ignoring tuning override: {}", e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: FlightTuning = from_json(r#"{ "gravity": 1.25 }"#).unwrap();
        assert_eq!(tuning.gravity, 1.25);
        assert_eq!(tuning.floor_y, 600.0);
        assert_eq!(tuning.bounce, -0.6);
    }

    #[test]
    fn test_nested_flight_override() {
        let tuning: Court2dTuning = from_json(r#"{ "flight": { "right_wall": 640 } }"#).unwrap();
        assert_eq!(tuning.flight.right_wall, 640.0);
        assert_eq!(tuning.width, 800.0);
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let result: Result<FlightTuning> = from_json("{ gravity: ");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_override_or_default() {
        let tuning: Court2dTuning = from_json_or_default(Some(r#"{ "shot_dx": 12 }"#));
        assert_eq!(tuning.shot_dx, 12.0);
        assert_eq!(tuning.flight, FlightTuning::default());

        let none: Court3dTuning = from_json_or_default(None);
        assert_eq!(none, Court3dTuning::default());

        let blank: Court3dTuning = from_json_or_default(Some("  "));
        assert_eq!(blank, Court3dTuning::default());

        let broken: Court2dTuning = from_json_or_default(Some("{ shot_dx: "));
        assert_eq!(broken, Court2dTuning::default());
    }

    #[test]
    fn test_player_limits() {
        let tuning = Court3dTuning::default();
        assert_eq!(tuning.player_limits(), (88.0, 48.0));

        let clamped = tuning.clamp_to_court(Vec3::new(500.0, 0.0, -500.0));
        assert_eq!(clamped, Vec3::new(88.0, 0.0, -48.0));
    }
}
