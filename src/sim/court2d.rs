//! Side-view 2D court
//!
//! A player carries the ball and shoots it; a simple opponent shadows the
//! ball along the floor. Ball flight is delegated to a [`BallStepper`] so the
//! same game runs with local or remote physics.

use serde::{Deserialize, Serialize};

use super::events::{GameEvent, Holder, Side};
use super::flight::{Ball2d, Rect};
use super::stepper::{BallStepper, StepOutcome};
use crate::tuning::Court2dTuning;

/// Player or opponent rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per frame
    pub speed: f32,
    pub has_ball: bool,
}

impl Athlete {
    /// Point where a held ball sits (top centre)
    pub fn hands(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y)
    }
}

/// Held keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Input2d {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// Complete 2D game state
#[derive(Debug, Clone)]
pub struct Game2d {
    pub tuning: Court2dTuning,
    pub player: Athlete,
    pub opponent: Athlete,
    pub ball: Ball2d,
    pub hoops: [(Side, Rect); 2],
    /// Baskets made by the player
    pub score: u32,
}

impl Game2d {
    pub fn new(tuning: Court2dTuning) -> Self {
        let player = Athlete {
            x: tuning.player_start.0,
            y: tuning.player_start.1,
            width: tuning.athlete_width,
            height: tuning.athlete_height,
            speed: tuning.player_speed,
            has_ball: true,
        };
        let opponent = Athlete {
            x: tuning.opponent_start.0,
            y: tuning.opponent_start.1,
            width: tuning.athlete_width,
            height: tuning.athlete_height,
            speed: tuning.opponent_speed,
            has_ball: false,
        };
        let (bx, by) = player.hands();
        let hoops = [
            (Side::Left, Rect::from(tuning.left_hoop)),
            (Side::Right, Rect::from(tuning.right_hoop)),
        ];

        Self {
            tuning,
            player,
            opponent,
            ball: Ball2d::at(bx, by),
            hoops,
            score: 0,
        }
    }

    /// Start over with the same tuning. Any physics request still in
    /// flight belongs to the old ball and is dropped.
    pub fn reset(&mut self, stepper: &mut dyn BallStepper) {
        stepper.discard();
        *self = Self::new(self.tuning.clone());
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &Input2d, stepper: &mut dyn BallStepper) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.move_player(input);
        self.shoot(input, &mut events);
        self.update_ball(stepper, &mut events);
        self.move_opponent();

        events
    }

    fn move_player(&mut self, input: &Input2d) {
        let p = &mut self.player;
        if input.up {
            p.y -= p.speed;
        }
        if input.down {
            p.y += p.speed;
        }
        if input.left {
            p.x -= p.speed;
        }
        if input.right {
            p.x += p.speed;
        }

        p.x = p.x.clamp(0.0, self.tuning.width - p.width);
        p.y = p.y.clamp(0.0, self.tuning.height - p.height);

        if p.has_ball {
            let (bx, by) = p.hands();
            self.ball.x = bx;
            self.ball.y = by;
        }
    }

    fn shoot(&mut self, input: &Input2d, events: &mut Vec<GameEvent>) {
        if self.player.has_ball && input.shoot {
            self.player.has_ball = false;
            self.ball.dx = self.tuning.shot_dx;
            self.ball.dy = self.tuning.shot_dy;
            events.push(GameEvent::Shot);
            log::debug!("Shot from ({:.1}, {:.1})", self.ball.x, self.ball.y);
        }
    }

    fn update_ball(&mut self, stepper: &mut dyn BallStepper, events: &mut Vec<GameEvent>) {
        if self.player.has_ball {
            return;
        }

        let prev = self.ball;
        match stepper.step(&self.ball) {
            StepOutcome::Advanced(next) => self.ball = next,
            StepOutcome::Pending => return,
        }

        // Any floor touch ends the possession
        if self.ball.y >= self.tuning.height {
            self.return_ball(stepper);
            events.push(GameEvent::BallReturned);
            return;
        }

        let radius = self.tuning.ball_radius;
        let hit = self
            .hoops
            .iter()
            .find(|(_, rect)| drops_through(&prev, &self.ball, radius, rect))
            .map(|(side, _)| *side);
        if let Some(side) = hit {
            self.score += 1;
            log::info!("Basket on the {:?} hoop, score {}", side, self.score);
            events.push(GameEvent::Scored {
                by: Holder::Player,
                side,
            });
            self.return_ball(stepper);
            events.push(GameEvent::BallReturned);
        }
    }

    /// Put the ball back in the player's hands
    fn return_ball(&mut self, stepper: &mut dyn BallStepper) {
        stepper.discard();
        self.player.has_ball = true;
        let (bx, by) = self.player.hands();
        self.ball = Ball2d::at(bx, by);
    }

    fn move_opponent(&mut self) {
        let o = &mut self.opponent;
        if self.ball.x > o.x {
            o.x += o.speed;
        }
        if self.ball.x < o.x {
            o.x -= o.speed;
        }
        o.x = o.x.clamp(0.0, self.tuning.width - o.width);
    }
}

/// Falling ball whose centre crossed the top edge of the hoop this frame
fn drops_through(prev: &Ball2d, next: &Ball2d, radius: f32, hoop: &Rect) -> bool {
    next.dy > 0.0
        && prev.y < hoop.y
        && next.y >= hoop.y
        && next.x >= hoop.x - radius
        && next.x <= hoop.x + hoop.width + radius
}
