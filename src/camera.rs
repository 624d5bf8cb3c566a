//! Follow camera for the 3D court
//!
//! Trails the player from behind and above, projects world points to NDC
//! for the renderer, and turns pointer positions back into points on the
//! court plane for drag-to-shoot.

use glam::{Mat4, Vec2, Vec3};

/// Camera height above the court
const FOLLOW_HEIGHT: f32 = 80.0;
/// Camera distance behind the player along +z
const FOLLOW_DISTANCE: f32 = 220.0;
/// Height of the look-at point
const LOOK_HEIGHT: f32 = 20.0;
/// Fraction of the remaining distance covered per frame
const FOLLOW_LERP: f32 = 0.06;

#[derive(Debug, Clone, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, FOLLOW_HEIGHT, FOLLOW_DISTANCE),
            target: Vec3::new(0.0, LOOK_HEIGHT, 0.0),
            fov_deg: 50.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl FollowCamera {
    /// Ease toward the player; the look-at point snaps
    pub fn follow(&mut self, player: Vec3) {
        let goal = Vec3::new(player.x, FOLLOW_HEIGHT, player.z + FOLLOW_DISTANCE);
        self.position = self.position.lerp(goal, FOLLOW_LERP);
        self.target = Vec3::new(player.x, LOOK_HEIGHT, player.z);
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_deg.to_radians(), aspect, self.near, self.far);
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        proj * view
    }

    /// World point to NDC (x, y in [-1, 1], z depth in [0, 1]).
    /// `None` when the point is behind the camera.
    pub fn project(&self, world: Vec3, aspect: f32) -> Option<Vec3> {
        let clip = self.view_proj(aspect) * world.extend(1.0);
        if clip.w <= self.near * 0.5 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Intersect the pointer ray with the court plane (y = 0)
    pub fn ground_point(&self, ndc: Vec2, aspect: f32) -> Option<Vec3> {
        let inv = self.view_proj(aspect).inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let dir = far - near;
        if dir.y.abs() < f32::EPSILON {
            return None;
        }
        let t = -near.y / dir.y;
        if t < 0.0 {
            return None;
        }
        Some(near + dir * t)
    }
}

/// Element-relative pointer position in CSS pixels to NDC
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}
