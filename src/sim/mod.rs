//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - `flight`, `stepper`, `court2d`: side-view game with pluggable physics
//! - `ball3d`, `hoop`, `court3d`: full-court 3D game

pub mod ball3d;
pub mod court2d;
pub mod court3d;
pub mod events;
pub mod flight;
pub mod hoop;
pub mod stepper;

pub use ball3d::{BallBody, FloorContact, reflect};
pub use court2d::{Athlete, Game2d, Input2d};
pub use court3d::{Aim, Game3d, Input3d, shot_velocity};
pub use events::{GameEvent, Holder, Side};
pub use flight::{Ball2d, Rect, step_ball};
pub use hoop::Hoop;
pub use stepper::{BallStepper, LocalStepper, RemoteStepper, StepOutcome, Transport};
