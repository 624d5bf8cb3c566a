//! Hoop geometry and basket detection

use glam::Vec3;

use super::events::{Holder, Side};
use crate::tuning::Court3dTuning;

/// A hoop: rim ring plus an invisible net cylinder used as the scoring zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hoop {
    pub side: Side,
    /// Rim ring centre
    pub rim: Vec3,
    /// Net cylinder centre
    pub net: Vec3,
    pub net_radius: f32,
    pub net_half_height: f32,
}

impl Hoop {
    pub fn new(side: Side, tuning: &Court3dTuning) -> Self {
        let x = match side {
            Side::Left => -tuning.court_width / 2.0 + tuning.hoop_inset,
            Side::Right => tuning.court_width / 2.0 - tuning.hoop_inset,
        };
        let centre = Vec3::new(
            x,
            tuning.rim_height,
            -tuning.court_depth / 2.0 + tuning.rim_z_offset,
        );
        Self {
            side,
            rim: centre,
            net: centre,
            net_radius: tuning.net_radius,
            net_half_height: tuning.net_half_height,
        }
    }

    /// Both hoops, left first
    pub fn pair(tuning: &Court3dTuning) -> [Hoop; 2] {
        [Hoop::new(Side::Left, tuning), Hoop::new(Side::Right, tuning)]
    }

    /// Height of the net's top plane
    pub fn net_top(&self) -> f32 {
        self.net.y + self.net_half_height
    }

    /// Ball centre is inside the net horizontally and crossed the top plane
    /// downward between `prev_y` and `pos.y`
    pub fn scored_through(&self, prev_y: f32, pos: Vec3) -> bool {
        let dx = pos.x - self.net.x;
        let dz = pos.z - self.net.z;
        let dist = (dx * dx + dz * dz).sqrt();
        let top = self.net_top();
        dist < self.net_radius && pos.y < top && prev_y > top
    }

    /// Who gets the point for a basket through this hoop, judged by which
    /// half of the court the ball is on
    pub fn attribute(&self, pos: Vec3) -> Holder {
        match self.side {
            Side::Right if pos.x < 0.0 => Holder::Player,
            Side::Left if pos.x > 0.0 => Holder::Opponent,
            _ if pos.x < 0.0 => Holder::Player,
            _ => Holder::Opponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hoop_positions() {
        let tuning = Court3dTuning::default();
        let [left, right] = Hoop::pair(&tuning);
        assert_eq!(left.rim, Vec3::new(-80.0, 26.0, -56.0));
        assert_eq!(right.rim, Vec3::new(80.0, 26.0, -56.0));
        assert!((left.net_top() - 26.7).abs() < 0.0001);
    }

    #[test]
    fn test_downward_crossing_scores() {
        let hoop = Hoop::new(Side::Right, &Court3dTuning::default());
        let pos = Vec3::new(81.0, 26.0, -55.0);
        assert!(hoop.scored_through(27.5, pos));
    }

    #[test]
    fn test_upward_or_outside_crossing_does_not_score() {
        let hoop = Hoop::new(Side::Right, &Court3dTuning::default());
        // Upward through the plane
        assert!(!hoop.scored_through(26.0, Vec3::new(80.0, 27.0, -56.0)));
        // Downward but outside the net radius
        assert!(!hoop.scored_through(27.5, Vec3::new(87.0, 26.0, -56.0)));
        // Still above the plane
        assert!(!hoop.scored_through(30.0, Vec3::new(80.0, 28.0, -56.0)));
    }

    #[test]
    fn test_attribution_by_half() {
        let tuning = Court3dTuning::default();
        let [left, right] = Hoop::pair(&tuning);
        assert_eq!(right.attribute(Vec3::new(-1.0, 0.0, 0.0)), Holder::Player);
        assert_eq!(right.attribute(Vec3::new(80.0, 0.0, 0.0)), Holder::Opponent);
        assert_eq!(left.attribute(Vec3::new(1.0, 0.0, 0.0)), Holder::Opponent);
        assert_eq!(left.attribute(Vec3::new(-80.0, 0.0, 0.0)), Holder::Player);
    }
}
