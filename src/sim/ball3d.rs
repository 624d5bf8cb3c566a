//! 3D ball body
//!
//! Integration, floor bounce with friction, rest detection and rim
//! deflection. Units are court units; `dt` is in frames (1.0 at 60 Hz).

use glam::Vec3;

use super::events::Holder;
use super::hoop::Hoop;
use crate::tuning::Court3dTuning;

/// Outcome of a floor check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorContact {
    /// Ball is above the floor
    None,
    /// Ball bounced
    Bounced,
    /// Ball bounced too weakly and was stopped
    Rested,
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct BallBody {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    pub held_by: Option<Holder>,
    /// Height at the start of the current frame (for plane crossing checks)
    pub last_y: f32,
}

impl BallBody {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            radius,
            held_by: None,
            last_y: 0.0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.held_by.is_none()
    }

    /// Free and not moving
    pub fn is_stopped(&self) -> bool {
        self.is_free() && self.vel == Vec3::ZERO
    }

    /// Attach to a holder standing at `anchor`
    pub fn hold(&mut self, holder: Holder, anchor: Vec3, carry_offset: Vec3) {
        self.held_by = Some(holder);
        self.carry(anchor, carry_offset);
    }

    /// Place a held ball at its holder's hands
    pub fn carry(&mut self, anchor: Vec3, carry_offset: Vec3) {
        self.pos = anchor + carry_offset;
        self.vel = Vec3::ZERO;
        self.last_y = self.pos.y;
    }

    /// Semi-implicit Euler step
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Resolve floor contact
    pub fn collide_floor(&mut self, tuning: &Court3dTuning) -> FloorContact {
        let ground = tuning.ground_y;
        if self.pos.y - self.radius >= ground + tuning.floor_skin {
            return FloorContact::None;
        }

        self.pos.y = ground + self.radius + tuning.floor_skin;
        self.vel.y = -self.vel.y * tuning.bounce;
        self.vel.x *= tuning.floor_friction;
        self.vel.z *= tuning.floor_friction;

        if self.vel.y.abs() < tuning.rest_speed
            && self.pos.y <= ground + self.radius + tuning.rest_skin
        {
            self.vel = Vec3::ZERO;
            FloorContact::Rested
        } else {
            FloorContact::Bounced
        }
    }

    /// Deflect off a rim. Returns true on contact.
    pub fn collide_rim(&mut self, hoop: &Hoop, tuning: &Court3dTuning) -> bool {
        let dx = self.pos.x - hoop.rim.x;
        let dz = self.pos.z - hoop.rim.z;
        let dist_xz = (dx * dx + dz * dz).sqrt();
        let height_diff = (self.pos.y - hoop.rim.y).abs();

        let inside_band = dist_xz < tuning.rim_radius + self.radius
            && dist_xz > tuning.rim_radius - tuning.rim_band;
        if height_diff >= tuning.rim_height_window || !inside_band {
            return false;
        }

        let normal = Vec3::new(dx, 0.0, dz).normalize_or_zero();
        let horizontal = Vec3::new(self.vel.x, 0.0, self.vel.z);
        let reflected = reflect(horizontal, normal) * tuning.rim_damping;
        self.vel.x = reflected.x;
        self.vel.z = reflected.z;
        self.vel.y = self.vel.y.max(tuning.rim_min_lift);
        true
    }
}

/// Reflect a vector about a unit normal: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::Side;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.0001
    }

    fn free_ball(pos: Vec3, vel: Vec3) -> BallBody {
        let mut ball = BallBody::new(3.8);
        ball.pos = pos;
        ball.vel = vel;
        ball
    }

    #[test]
    fn test_integrate_scales_by_dt() {
        let mut ball = free_ball(Vec3::new(0.0, 20.0, 0.0), Vec3::new(1.0, 2.0, -1.0));
        ball.integrate(-0.45, 2.0);
        assert!(approx(ball.vel.y, 1.1));
        assert!(approx(ball.pos.x, 2.0));
        assert!(approx(ball.pos.y, 22.2));
        assert!(approx(ball.pos.z, -2.0));
    }

    #[test]
    fn test_floor_bounce_inverts_scales_and_applies_friction() {
        let tuning = Court3dTuning::default();
        let mut ball = free_ball(Vec3::new(0.0, 3.0, 0.0), Vec3::new(10.0, -5.0, -10.0));

        assert_eq!(ball.collide_floor(&tuning), FloorContact::Bounced);
        assert!(approx(ball.pos.y, 3.9));
        assert!(approx(ball.vel.y, 3.0));
        assert!(approx(ball.vel.x, 9.2));
        assert!(approx(ball.vel.z, -9.2));
    }

    #[test]
    fn test_weak_bounce_rests() {
        let tuning = Court3dTuning::default();
        let mut ball = free_ball(Vec3::new(5.0, 3.5, 5.0), Vec3::new(2.0, -1.0, 0.0));

        assert_eq!(ball.collide_floor(&tuning), FloorContact::Rested);
        assert_eq!(ball.vel, Vec3::ZERO);
        assert!(ball.is_stopped());
    }

    #[test]
    fn test_above_floor_untouched() {
        let tuning = Court3dTuning::default();
        let mut ball = free_ball(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(ball.collide_floor(&tuning), FloorContact::None);
        assert_eq!(ball.vel.y, -3.0);
    }

    #[test]
    fn test_rim_deflects_outward_with_lift() {
        let tuning = Court3dTuning::default();
        let hoop = Hoop::new(Side::Right, &tuning);
        // Ball just outside the rim toward +x, moving toward the rim centre
        let pos = Vec3::new(hoop.rim.x + 7.0, hoop.rim.y, hoop.rim.z);
        let mut ball = free_ball(pos, Vec3::new(-5.0, -1.0, 0.0));

        assert!(ball.collide_rim(&hoop, &tuning));
        assert!(approx(ball.vel.x, 4.0));
        assert!(approx(ball.vel.z, 0.0));
        assert!(approx(ball.vel.y, 2.5));
    }

    #[test]
    fn test_rim_ignores_ball_in_centre_or_far_below() {
        let tuning = Court3dTuning::default();
        let hoop = Hoop::new(Side::Left, &tuning);

        let mut centred = free_ball(hoop.rim, Vec3::new(0.0, -3.0, 0.0));
        assert!(!centred.collide_rim(&hoop, &tuning));

        let below = Vec3::new(hoop.rim.x + 6.0, hoop.rim.y - 10.0, hoop.rim.z);
        let mut low = free_ball(below, Vec3::new(1.0, 0.0, 0.0));
        assert!(!low.collide_rim(&hoop, &tuning));
    }

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(3.0, 0.0, -4.0), Vec3::X);
        assert_eq!(r, Vec3::new(-3.0, 0.0, -4.0));
    }
}
