//! Scene builders: game state to NDC triangle lists

use glam::{Vec2, Vec3};

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::camera::FollowCamera;
use crate::sim::{Game2d, Game3d, Hoop, Rect};

/// Letterboxed mapping from canvas pixels (y down) to NDC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasView {
    pub width: f32,
    pub height: f32,
    scale: Vec2,
}

impl CanvasView {
    pub fn new(width: f32, height: f32, aspect: f32) -> Self {
        let canvas_aspect = width / height;
        let scale = if aspect > canvas_aspect {
            Vec2::new(canvas_aspect / aspect, 1.0)
        } else {
            Vec2::new(1.0, aspect / canvas_aspect)
        };
        Self {
            width,
            height,
            scale,
        }
    }

    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x / self.width * 2.0 - 1.0) * self.scale.x,
            (1.0 - y / self.height * 2.0) * self.scale.y,
        )
    }

    /// Size in canvas pixels to NDC extents
    pub fn extent(&self, w: f32, h: f32) -> Vec2 {
        Vec2::new(
            w / self.width * 2.0 * self.scale.x,
            h / self.height * 2.0 * self.scale.y,
        )
    }

    fn rect(&self, r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
        let a = self.to_ndc(r.x, r.y);
        let b = self.to_ndc(r.x + r.width, r.y + r.height);
        shapes::rect(a.min(b), a.max(b), color)
    }
}

/// Side-view court: field, hoops, athletes, ball
pub fn court2d(game: &Game2d, aspect: f32) -> Vec<Vertex> {
    let view = CanvasView::new(game.tuning.width, game.tuning.height, aspect);
    let mut v = Vec::with_capacity(256);

    let field = Rect {
        x: 0.0,
        y: 0.0,
        width: game.tuning.width,
        height: game.tuning.height,
    };
    v.extend(view.rect(&field, colors::COURT_2D));

    for (_, hoop) in &game.hoops {
        v.extend(view.rect(hoop, colors::HOOP_POST));
    }

    for (athlete, color) in [
        (&game.player, colors::PLAYER_2D),
        (&game.opponent, colors::OPPONENT_2D),
    ] {
        let r = Rect {
            x: athlete.x,
            y: athlete.y,
            width: athlete.width,
            height: athlete.height,
        };
        v.extend(view.rect(&r, color));
    }

    let radius = game.tuning.ball_radius;
    v.extend(shapes::ellipse(
        view.to_ndc(game.ball.x, game.ball.y),
        view.extent(radius, radius),
        colors::BALL_2D,
        20,
    ));

    v
}

/// Perspective projection helpers bound to one frame
struct Projector<'a> {
    camera: &'a FollowCamera,
    aspect: f32,
}

impl Projector<'_> {
    fn point(&self, world: Vec3) -> Option<Vec2> {
        self.camera.project(world, self.aspect).map(|p| p.truncate())
    }

    fn quad(&self, corners: [Vec3; 4], color: [f32; 4]) -> Vec<Vertex> {
        let projected: Option<Vec<Vec2>> = corners.iter().map(|&c| self.point(c)).collect();
        match projected {
            Some(p) => shapes::quad(p[0], p[1], p[2], p[3], color),
            None => Vec::new(),
        }
    }

    fn line(&self, from: Vec3, to: Vec3, width: f32, color: [f32; 4]) -> Vec<Vertex> {
        match (self.point(from), self.point(to)) {
            (Some(a), Some(b)) => shapes::segment(a, b, width, color),
            _ => Vec::new(),
        }
    }

    /// Depth used for back-to-front ordering
    fn distance(&self, world: Vec3) -> f32 {
        self.camera.position.distance(world)
    }
}

/// Box standing on the ground: front face and top face
fn athlete_box(p: &Projector, base: Vec3, size: Vec3, color: [f32; 4]) -> Vec<Vertex> {
    let h = size / 2.0;
    let (x0, x1) = (base.x - h.x, base.x + h.x);
    let (z0, z1) = (base.z - h.z, base.z + h.z);
    let (y0, y1) = (base.y, base.y + size.y);

    let top_color = [color[0] * 0.8, color[1] * 0.8, color[2] * 0.8, color[3]];
    let mut v = p.quad(
        [
            Vec3::new(x0, y1, z0),
            Vec3::new(x1, y1, z0),
            Vec3::new(x1, y1, z1),
            Vec3::new(x0, y1, z1),
        ],
        top_color,
    );
    v.extend(p.quad(
        [
            Vec3::new(x0, y0, z1),
            Vec3::new(x1, y0, z1),
            Vec3::new(x1, y1, z1),
            Vec3::new(x0, y1, z1),
        ],
        color,
    ));
    v
}

fn hoop_shapes(p: &Projector, hoop: &Hoop, court_depth: f32) -> Vec<Vertex> {
    // Backboard behind the rim
    let board_z = -court_depth / 2.0 + 8.0 + 1.0;
    let board_y = hoop.rim.y + 4.0;
    let mut v = p.quad(
        [
            Vec3::new(hoop.rim.x - 8.0, board_y - 5.0, board_z),
            Vec3::new(hoop.rim.x + 8.0, board_y - 5.0, board_z),
            Vec3::new(hoop.rim.x + 8.0, board_y + 5.0, board_z),
            Vec3::new(hoop.rim.x - 8.0, board_y + 5.0, board_z),
        ],
        colors::BACKBOARD,
    );

    let ring: Option<Vec<Vec2>> = (0..24)
        .map(|i| {
            let theta = i as f32 / 24.0 * std::f32::consts::TAU;
            let radius = hoop.net_radius + 0.4;
            p.point(hoop.rim + Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin()))
        })
        .collect();
    if let Some(ring) = ring {
        v.extend(shapes::outline(&ring, 0.006, colors::RIM));
    }
    v
}

/// Full court seen through the follow camera, painter's order
pub fn court3d(game: &Game3d, camera: &FollowCamera, aspect: f32) -> Vec<Vertex> {
    let p = Projector { camera, aspect };
    let half_w = game.tuning.court_width / 2.0;
    let half_d = game.tuning.court_depth / 2.0;
    let mut v = Vec::with_capacity(1024);

    v.extend(p.quad(
        [
            Vec3::new(-half_w, 0.0, half_d),
            Vec3::new(half_w, 0.0, half_d),
            Vec3::new(half_w, 0.0, -half_d),
            Vec3::new(-half_w, 0.0, -half_d),
        ],
        colors::COURT_3D,
    ));
    v.extend(p.line(
        Vec3::new(0.0, 0.05, -half_d),
        Vec3::new(0.0, 0.05, half_d),
        0.004,
        colors::LINE,
    ));

    // Depth-sorted dynamic objects, far first
    let mut layers: Vec<(f32, Vec<Vertex>)> = Vec::new();
    for hoop in &game.hoops {
        layers.push((p.distance(hoop.rim), hoop_shapes(&p, hoop, game.tuning.court_depth)));
    }

    let body = Vec3::new(8.0, 18.0, 8.0);
    layers.push((
        p.distance(game.player),
        athlete_box(&p, game.player, body, colors::PLAYER_3D),
    ));
    layers.push((
        p.distance(game.opponent),
        athlete_box(&p, game.opponent, body, colors::OPPONENT_3D),
    ));

    let ball = &game.ball;
    if let (Some(centre), Some(top)) = (p.point(ball.pos), p.point(ball.pos + Vec3::Y * ball.radius))
    {
        let r = (top.y - centre.y).abs();
        layers.push((
            p.distance(ball.pos),
            shapes::ellipse(centre, Vec2::new(r / aspect, r), colors::BALL_3D, 24),
        ));
    }

    layers.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    for (_, verts) in layers {
        v.extend(verts);
    }

    if let Some((from, to)) = game.aim_line() {
        v.extend(p.line(from, to, 0.005, colors::AIM_LINE));
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Court2dTuning, Court3dTuning};

    #[test]
    fn test_canvas_view_letterboxes() {
        // Wider screen than the 4:3 canvas: x is squeezed
        let view = CanvasView::new(800.0, 600.0, 2.0);
        let top_left = view.to_ndc(0.0, 0.0);
        let bottom_right = view.to_ndc(800.0, 600.0);
        assert!((top_left.x + 2.0 / 3.0).abs() < 1e-5);
        assert_eq!(top_left.y, 1.0);
        assert!((bottom_right.x - 2.0 / 3.0).abs() < 1e-5);
        assert_eq!(bottom_right.y, -1.0);
    }

    #[test]
    fn test_court2d_stays_in_ndc() {
        let game = Game2d::new(Court2dTuning::default());
        let v = court2d(&game, 16.0 / 9.0);
        assert!(!v.is_empty());
        assert_eq!(v.len() % 3, 0);
        for vert in &v {
            assert!(vert.position[0].abs() <= 1.0001);
            assert!(vert.position[1].abs() <= 1.0001);
        }
        assert!(v.iter().any(|vert| vert.color == colors::BALL_2D));
    }

    #[test]
    fn test_court3d_draws_everything_in_view() {
        let game = Game3d::new(Court3dTuning::default());
        let camera = FollowCamera::default();
        let v = court3d(&game, &camera, 16.0 / 9.0);
        assert_eq!(v.len() % 3, 0);
        for color in [
            colors::COURT_3D,
            colors::RIM,
            colors::PLAYER_3D,
            colors::OPPONENT_3D,
            colors::BALL_3D,
        ] {
            assert!(v.iter().any(|vert| vert.color == color));
        }
        // Carried ball sits in front of the player, away from the camera,
        // so the player's body is painted over it
        let last_of = |color: [f32; 4]| v.iter().rposition(|vert| vert.color == color);
        assert!(last_of(colors::BALL_3D) < last_of(colors::PLAYER_3D));
    }

    #[test]
    fn test_court3d_aim_line() {
        let mut game = Game3d::new(Court3dTuning::default());
        let camera = FollowCamera::default();
        game.begin_aim(Vec3::new(-40.0, 0.0, 0.0));
        game.update_aim(Vec3::new(-10.0, 0.0, -20.0));
        let v = court3d(&game, &camera, 1.5);
        assert_eq!(v.last().map(|vert| vert.color), Some(colors::AIM_LINE));
    }
}
