//! Ball physics backends for the 2D court
//!
//! The court asks a stepper to advance the free ball once per frame. The
//! local stepper answers immediately; the remote stepper keeps a single
//! request in flight and freezes the ball until its reply lands, giving up
//! after [`DEFAULT_MAX_WAIT_FRAMES`].

use super::flight::{Ball2d, step_ball};
use crate::error::Result;
use crate::protocol::UpdateBallRequest;
use crate::tuning::FlightTuning;

/// Result of asking for the next ball state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Ball advanced to this state
    Advanced(Ball2d),
    /// No new state this frame; keep the ball where it is
    Pending,
}

/// Something that can advance a free 2D ball
pub trait BallStepper {
    fn step(&mut self, ball: &Ball2d) -> StepOutcome;

    /// Forget any work for a ball that is no longer in flight
    fn discard(&mut self) {}
}

/// In-process physics
#[derive(Debug, Clone, Default)]
pub struct LocalStepper {
    pub tuning: FlightTuning,
}

impl LocalStepper {
    pub fn new(tuning: FlightTuning) -> Self {
        Self { tuning }
    }
}

impl BallStepper for LocalStepper {
    fn step(&mut self, ball: &Ball2d) -> StepOutcome {
        StepOutcome::Advanced(step_ball(ball, &self.tuning))
    }
}

/// Non-blocking request/reply channel to the physics endpoint
pub trait Transport {
    /// Start a request. Only called when no request is outstanding.
    fn send(&mut self, request: UpdateBallRequest);

    /// Take the reply of the outstanding request if it has arrived
    fn poll(&mut self) -> Option<Result<Ball2d>>;
}

/// Frames a reply may take before the request is abandoned (about 0.5 s)
pub const DEFAULT_MAX_WAIT_FRAMES: u32 = 30;

/// Physics delegated to a remote endpoint
pub struct RemoteStepper<T: Transport> {
    transport: T,
    in_flight: bool,
    /// Frames spent waiting on the outstanding request
    waited: u32,
    max_wait: u32,
    /// Replies to ignore (requests sent before a `discard`)
    stale: u32,
    /// Used for frames whose request failed
    fallback: LocalStepper,
    failures: u64,
}

impl<T: Transport> RemoteStepper<T> {
    pub fn new(transport: T, fallback: FlightTuning) -> Self {
        Self {
            transport,
            in_flight: false,
            waited: 0,
            max_wait: DEFAULT_MAX_WAIT_FRAMES,
            stale: 0,
            fallback: LocalStepper::new(fallback),
            failures: 0,
        }
    }

    /// Frames to wait for a reply before stepping locally instead
    pub fn with_max_wait(mut self, frames: u32) -> Self {
        self.max_wait = frames.max(1);
        self
    }

    /// Whether a request is outstanding
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Total failed requests so far
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Drain replies to requests that were discarded
    fn drain_stale(&mut self) {
        while self.stale > 0 {
            match self.transport.poll() {
                Some(_) => self.stale -= 1,
                None => return,
            }
        }
    }
}

impl<T: Transport> BallStepper for RemoteStepper<T> {
    fn step(&mut self, ball: &Ball2d) -> StepOutcome {
        self.drain_stale();
        if self.stale > 0 {
            // An abandoned request still owns the channel
            return self.fallback.step(ball);
        }

        if !self.in_flight {
            self.transport.send(UpdateBallRequest { ball: *ball });
            self.in_flight = true;
            self.waited = 0;
        }

        match self.transport.poll() {
            None => {
                self.waited += 1;
                if self.waited < self.max_wait {
                    return StepOutcome::Pending;
                }
                self.failures += 1;
                log::warn!(
                    "No physics reply after {} frames, stepping locally",
                    self.waited
                );
                self.discard();
                self.fallback.step(ball)
            }
            Some(Ok(next)) if next.is_finite() => {
                self.in_flight = false;
                StepOutcome::Advanced(next)
            }
            Some(Ok(next)) => {
                self.in_flight = false;
                self.failures += 1;
                log::warn!("Physics endpoint returned non-finite ball {:?}, stepping locally", next);
                self.fallback.step(ball)
            }
            Some(Err(e)) => {
                self.in_flight = false;
                self.failures += 1;
                log::warn!("Physics request failed ({}), stepping locally", e);
                self.fallback.step(ball)
            }
        }
    }

    fn discard(&mut self) {
        if self.in_flight {
            self.in_flight = false;
            self.stale += 1;
        }
    }
}
