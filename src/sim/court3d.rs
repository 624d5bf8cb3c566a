//! Full-court 3D game
//!
//! Player versus a chasing/guarding opponent, two hoops, drag-to-shoot.
//! Coordinates: x along the court, y up, z toward the camera; the court
//! plane is y = 0.

use glam::Vec3;

use super::ball3d::{BallBody, FloorContact};
use super::events::{GameEvent, Holder};
use super::hoop::Hoop;
use crate::consts::{FRAME_MS, MAX_FRAME_MS};
use crate::step_toward;
use crate::tuning::Court3dTuning;

/// Held keys and one-shot commands for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Input3d {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Hand the ball back to the player (Space)
    pub reset_ball: bool,
    /// Zero the scores and hand the ball to the player
    pub reset_game: bool,
}

/// Drag gesture in progress (ground-plane points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub start: Vec3,
    pub current: Option<Vec3>,
}

/// Complete 3D game state
#[derive(Debug, Clone)]
pub struct Game3d {
    pub tuning: Court3dTuning,
    pub player: Vec3,
    pub opponent: Vec3,
    pub ball: BallBody,
    pub hoops: [Hoop; 2],
    pub score_player: u32,
    pub score_opponent: u32,
    /// Time left before a resting ball is awarded (armed once per rest)
    pub pickup_timer_ms: Option<f32>,
    pub aim: Option<Aim>,
}

impl Game3d {
    pub fn new(tuning: Court3dTuning) -> Self {
        let mut game = Self {
            player: tuning.player_start,
            opponent: tuning.opponent_start,
            ball: BallBody::new(tuning.ball_radius),
            hoops: Hoop::pair(&tuning),
            score_player: 0,
            score_opponent: 0,
            pickup_timer_ms: None,
            aim: None,
            tuning,
        };
        game.reset_game();
        game
    }

    /// Position of a holder's feet
    pub fn anchor(&self, holder: Holder) -> Vec3 {
        match holder {
            Holder::Player => self.player,
            Holder::Opponent => self.opponent,
        }
    }

    fn give_ball(&mut self, holder: Holder) {
        let anchor = self.anchor(holder);
        self.ball.hold(holder, anchor, self.tuning.carry_offset);
        self.pickup_timer_ms = None;
    }

    /// Advance one display frame of `frame_ms` milliseconds
    pub fn tick(&mut self, input: &Input3d, frame_ms: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let frame_ms = frame_ms.clamp(0.0, MAX_FRAME_MS);
        let dt = frame_ms / FRAME_MS;

        if input.reset_game {
            self.reset_game();
        } else if input.reset_ball {
            self.reset_ball();
            events.push(GameEvent::BallReturned);
        }

        self.update_player(input);
        self.update_opponent(&mut events);
        self.update_physics(dt, &mut events);
        self.update_pickup_timer(frame_ms, &mut events);
        self.check_scoring(&mut events);

        events
    }

    fn update_player(&mut self, input: &Input3d) {
        let speed = self.tuning.player_speed;
        if input.forward {
            self.player.z -= speed;
        }
        if input.back {
            self.player.z += speed;
        }
        if input.left {
            self.player.x -= speed;
        }
        if input.right {
            self.player.x += speed;
        }
        self.player = self.tuning.clamp_to_court(self.player);

        if self.ball.held_by == Some(Holder::Player) {
            self.ball.carry(self.player, self.tuning.carry_offset);
        }
    }

    /// Chase a free ball, otherwise guard the player
    fn update_opponent(&mut self, events: &mut Vec<GameEvent>) {
        let dx = self.ball.pos.x - self.opponent.x;
        let dz = self.ball.pos.z - self.opponent.z;
        let dist_xz = (dx * dx + dz * dz).sqrt();

        let (target, step) = if self.ball.is_free() && dist_xz > self.tuning.chase_threshold {
            (self.ball.pos, self.tuning.chase_speed)
        } else {
            (self.player, self.tuning.guard_speed)
        };
        self.opponent.x = step_toward(self.opponent.x, target.x, step);
        self.opponent.z = step_toward(self.opponent.z, target.z, step);
        self.opponent = self.tuning.clamp_to_court(self.opponent);

        if self.ball.is_free()
            && self.opponent.distance(self.ball.pos) < self.tuning.pickup_distance
        {
            self.give_ball(Holder::Opponent);
            events.push(GameEvent::PickedUp(Holder::Opponent));
            log::debug!("Opponent picked up the ball");
        }

        if self.ball.held_by == Some(Holder::Opponent) {
            self.ball.carry(self.opponent, self.tuning.carry_offset);
        }
    }

    fn update_physics(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.ball.last_y = self.ball.pos.y;
        if !self.ball.is_free() {
            return;
        }

        self.ball.integrate(self.tuning.gravity, dt);

        match self.ball.collide_floor(&self.tuning) {
            FloorContact::None => {}
            FloorContact::Bounced => events.push(GameEvent::Bounce),
            FloorContact::Rested => {
                if self.pickup_timer_ms.is_none() {
                    self.pickup_timer_ms = Some(self.tuning.pickup_delay_ms);
                    events.push(GameEvent::Rested);
                }
            }
        }

        for hoop in &self.hoops {
            if self.ball.collide_rim(hoop, &self.tuning) {
                events.push(GameEvent::RimHit(hoop.side));
            }
        }
    }

    /// Award a resting ball to the nearer athlete once the delay has passed
    fn update_pickup_timer(&mut self, frame_ms: f32, events: &mut Vec<GameEvent>) {
        let Some(remaining) = self.pickup_timer_ms else {
            return;
        };
        let remaining = remaining - frame_ms;
        if remaining > 0.0 {
            self.pickup_timer_ms = Some(remaining);
            return;
        }
        self.pickup_timer_ms = None;

        if !self.ball.is_free() {
            return;
        }
        let dist_player = self.player.distance(self.ball.pos);
        let dist_opponent = self.opponent.distance(self.ball.pos);
        let holder = if dist_player < dist_opponent {
            Holder::Player
        } else {
            Holder::Opponent
        };
        self.give_ball(holder);
        events.push(GameEvent::PickedUp(holder));
    }

    fn check_scoring(&mut self, events: &mut Vec<GameEvent>) {
        if !self.ball.is_free() {
            return;
        }
        let hit = self
            .hoops
            .iter()
            .find(|hoop| hoop.scored_through(self.ball.last_y, self.ball.pos))
            .copied();
        let Some(hoop) = hit else {
            return;
        };

        let by = hoop.attribute(self.ball.pos);
        match by {
            Holder::Player => self.score_player += 1,
            Holder::Opponent => self.score_opponent += 1,
        }
        events.push(GameEvent::Scored {
            by,
            side: hoop.side,
        });
        log::info!(
            "{:?} scored on the {:?} hoop ({} - {})",
            by,
            hoop.side,
            self.score_player,
            self.score_opponent
        );

        // Leader concedes possession
        let next = if self.score_player > self.score_opponent {
            Holder::Opponent
        } else {
            Holder::Player
        };
        self.give_ball(next);
    }

    /// Start a drag at a ground point; only while the player holds the ball
    pub fn begin_aim(&mut self, ground: Vec3) -> bool {
        if self.ball.held_by != Some(Holder::Player) {
            return false;
        }
        self.aim = Some(Aim {
            start: ground,
            current: None,
        });
        true
    }

    pub fn update_aim(&mut self, ground: Vec3) {
        if let Some(aim) = &mut self.aim {
            aim.current = Some(ground);
        }
    }

    /// Preview segment from the ball toward the drag point, at ball height
    pub fn aim_line(&self) -> Option<(Vec3, Vec3)> {
        let end = self.aim?.current?;
        let from = self.ball.pos;
        Some((from, Vec3::new(end.x, from.y, end.z)))
    }

    /// Drop the gesture without shooting
    pub fn cancel_aim(&mut self) {
        self.aim = None;
    }

    /// Finish a drag and shoot. Returns the launch velocity if a shot was
    /// taken.
    pub fn release_aim(&mut self, release: Vec3) -> Option<Vec3> {
        let aim = self.aim.take()?;
        if self.ball.held_by != Some(Holder::Player) {
            return None;
        }
        let vel = shot_velocity(aim.start, release, &self.tuning);
        self.ball.vel = vel;
        self.ball.held_by = None;
        log::debug!("Shot with velocity {:?}", vel);
        Some(vel)
    }

    /// Stop the ball and hand it to the player
    pub fn reset_ball(&mut self) {
        self.give_ball(Holder::Player);
        self.aim = None;
    }

    /// Zero the scores and hand the ball to the player
    pub fn reset_game(&mut self) {
        self.score_player = 0;
        self.score_opponent = 0;
        self.reset_ball();
    }
}

/// Launch velocity for a drag from `start` to `release` on the ground
pub fn shot_velocity(start: Vec3, release: Vec3, tuning: &Court3dTuning) -> Vec3 {
    let dx = start.x - release.x;
    let dz = start.z - release.z;
    let drag = (dx * dx + dz * dz).sqrt();
    let strength = drag.min(tuning.shot_max_drag) / tuning.shot_drag_divisor;

    let dir = Vec3::new(
        release.x - start.x,
        tuning.shot_aim_lift,
        release.z - start.z,
    )
    .normalize();
    let mut vel = dir * (strength * tuning.shot_speed_factor);
    vel.y = tuning
        .shot_min_vertical
        .max(strength * tuning.shot_vertical_factor);
    vel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::Side;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    fn game() -> Game3d {
        Game3d::new(Court3dTuning::default())
    }

    fn idle() -> Input3d {
        Input3d::default()
    }

    #[test]
    fn test_new_game_player_holds_ball() {
        let g = game();
        assert_eq!(g.ball.held_by, Some(Holder::Player));
        assert_eq!(g.ball.pos, Vec3::new(-40.0, 12.0, -8.0));
        assert_eq!((g.score_player, g.score_opponent), (0, 0));
    }

    #[test]
    fn test_player_moves_fixed_step_and_carries_ball() {
        let mut g = game();
        let input = Input3d {
            forward: true,
            right: true,
            ..idle()
        };
        g.tick(&input, 33.3);
        assert!(approx(g.player.x, -38.2));
        assert!(approx(g.player.z, -1.8));
        assert_eq!(g.ball.pos, g.player + Vec3::new(0.0, 12.0, -8.0));
    }

    #[test]
    fn test_player_clamped_to_court() {
        let mut g = game();
        let input = Input3d {
            back: true,
            left: true,
            ..idle()
        };
        for _ in 0..200 {
            g.tick(&input, FRAME_MS);
        }
        assert_eq!(g.player.x, -88.0);
        assert_eq!(g.player.z, 48.0);
    }

    #[test]
    fn test_opponent_guards_player_while_ball_held() {
        let mut g = game();
        g.tick(&idle(), FRAME_MS);
        // Opponent at x=40 steps toward the player at x=-40
        assert!(approx(g.opponent.x, 39.6));
        assert_eq!(g.opponent.z, 0.0);
    }

    #[test]
    fn test_opponent_chases_and_picks_up_free_ball() {
        let mut g = game();
        g.ball.held_by = None;
        g.ball.pos = Vec3::new(20.0, 3.9, 0.0);
        g.ball.vel = Vec3::ZERO;

        let mut picked = false;
        for _ in 0..60 {
            let events = g.tick(&idle(), FRAME_MS);
            if events.contains(&GameEvent::PickedUp(Holder::Opponent)) {
                picked = true;
                break;
            }
        }
        assert!(picked);
        assert_eq!(g.ball.held_by, Some(Holder::Opponent));
        assert_eq!(g.ball.pos, g.opponent + Vec3::new(0.0, 12.0, -8.0));
    }

    #[test]
    fn test_shot_velocity_from_drag() {
        let tuning = Court3dTuning::default();
        let start = Vec3::new(0.0, 0.0, 0.0);
        let release = Vec3::new(30.0, 0.0, 0.0);
        let vel = shot_velocity(start, release, &tuning);

        // strength = 30 / 1.2 = 25, speed = 20
        let len = (30.0f32 * 30.0 + 0.7 * 0.7).sqrt();
        assert!(approx(vel.x, 30.0 / len * 20.0));
        assert!(approx(vel.z, 0.0));
        assert!(approx(vel.y, 12.5));
    }

    #[test]
    fn test_shot_strength_is_clamped_and_min_lift_applied() {
        let tuning = Court3dTuning::default();
        let long = shot_velocity(Vec3::ZERO, Vec3::new(0.0, 0.0, -400.0), &tuning);
        // strength capped at 40 / 1.2
        assert!(approx(long.y, 40.0 / 1.2 * 0.5));

        let short = shot_velocity(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &tuning);
        assert_eq!(short.y, 6.0);
    }

    #[test]
    fn test_aim_requires_possession() {
        let mut g = game();
        g.ball.held_by = Some(Holder::Opponent);
        assert!(!g.begin_aim(Vec3::ZERO));
        assert!(g.release_aim(Vec3::X).is_none());
    }

    #[test]
    fn test_drag_release_frees_ball() {
        let mut g = game();
        assert!(g.begin_aim(Vec3::new(-40.0, 0.0, 0.0)));
        g.update_aim(Vec3::new(-20.0, 0.0, -10.0));
        let (from, to) = g.aim_line().unwrap();
        assert_eq!(from, g.ball.pos);
        assert_eq!(to, Vec3::new(-20.0, g.ball.pos.y, -10.0));

        let vel = g.release_aim(Vec3::new(-20.0, 0.0, -10.0)).unwrap();
        assert!(g.ball.is_free());
        assert!(vel.x > 0.0 && vel.z < 0.0 && vel.y >= 6.0);
        assert!(g.aim.is_none());
    }

    #[test]
    fn test_free_ball_falls_bounces_and_rests_once() {
        let mut g = game();
        // Park the opponent far away so it cannot grab the ball
        g.opponent = Vec3::new(88.0, 0.0, 48.0);
        g.ball.held_by = None;
        g.ball.pos = Vec3::new(-40.0, 20.0, 40.0);
        g.ball.vel = Vec3::ZERO;

        let mut bounces = 0;
        let mut rests = 0;
        let mut picked = None;
        for _ in 0..400 {
            for e in g.tick(&idle(), FRAME_MS) {
                match e {
                    GameEvent::Bounce => bounces += 1,
                    GameEvent::Rested => rests += 1,
                    GameEvent::PickedUp(h) => picked = Some(h),
                    _ => {}
                }
            }
            if picked.is_some() {
                break;
            }
        }
        assert!(bounces >= 1);
        assert_eq!(rests, 1);
        // Player stands on the ball's x, so it is the nearer athlete
        assert_eq!(picked, Some(Holder::Player));
        assert_eq!(g.ball.held_by, Some(Holder::Player));
    }

    #[test]
    fn test_pickup_timer_waits_for_delay() {
        let mut g = game();
        g.opponent = Vec3::new(88.0, 0.0, 48.0);
        g.ball.held_by = None;
        g.ball.pos = Vec3::new(-40.0, 3.9, 40.0);
        g.ball.vel = Vec3::ZERO;
        g.pickup_timer_ms = Some(300.0);

        g.tick(&idle(), 100.0 / 2.0);
        assert!(g.ball.is_free());
        assert!(approx(g.pickup_timer_ms.unwrap_or(0.0), 250.0));
    }

    #[test]
    fn test_basket_scores_and_concedes_possession() {
        let mut g = game();
        g.opponent = Vec3::new(-88.0, 0.0, 48.0);
        let hoop = g.hoops[1];
        g.ball.held_by = None;
        // Dropping straight through the right hoop, on the opponent's half
        g.ball.pos = Vec3::new(hoop.net.x, hoop.net_top() + 0.3, hoop.net.z);
        g.ball.vel = Vec3::new(0.0, -1.0, 0.0);

        let events = g.tick(&idle(), FRAME_MS);
        assert!(events.contains(&GameEvent::Scored {
            by: Holder::Opponent,
            side: Side::Right
        }));
        assert_eq!((g.score_player, g.score_opponent), (0, 1));
        // Opponent leads, so the player gets the ball
        assert_eq!(g.ball.held_by, Some(Holder::Player));
        assert_eq!(g.ball.vel, Vec3::ZERO);
    }

    #[test]
    fn test_reset_ball_and_reset_game() {
        let mut g = game();
        g.score_player = 3;
        g.score_opponent = 2;
        g.ball.held_by = Some(Holder::Opponent);

        let events = g.tick(
            &Input3d {
                reset_ball: true,
                ..idle()
            },
            FRAME_MS,
        );
        assert!(events.contains(&GameEvent::BallReturned));
        assert_eq!(g.ball.held_by, Some(Holder::Player));
        assert_eq!(g.score_player, 3);

        g.tick(
            &Input3d {
                reset_game: true,
                ..idle()
            },
            FRAME_MS,
        );
        assert_eq!((g.score_player, g.score_opponent), (0, 0));
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut a = game();
        let mut b = game();
        for g in [&mut a, &mut b] {
            g.opponent = Vec3::new(88.0, 0.0, 48.0);
            g.ball.held_by = None;
            g.ball.pos = Vec3::new(0.0, 50.0, 0.0);
            g.ball.vel = Vec3::ZERO;
        }
        a.tick(&idle(), 60.0);
        b.tick(&idle(), 5000.0);
        assert_eq!(a.ball.pos, b.ball.pos);
    }

    proptest::proptest! {
        #[test]
        fn prop_shot_always_lifts_and_is_capped(
            sx in -100.0f32..100.0,
            sz in -60.0f32..60.0,
            rx in -100.0f32..100.0,
            rz in -60.0f32..60.0,
        ) {
            let tuning = Court3dTuning::default();
            let vel = shot_velocity(Vec3::new(sx, 0.0, sz), Vec3::new(rx, 0.0, rz), &tuning);
            let max_horizontal =
                tuning.shot_max_drag / tuning.shot_drag_divisor * tuning.shot_speed_factor;

            proptest::prop_assert!(vel.is_finite());
            proptest::prop_assert!(vel.y >= tuning.shot_min_vertical);
            proptest::prop_assert!(Vec3::new(vel.x, 0.0, vel.z).length() <= max_horizontal + 1e-3);
        }
    }
}
