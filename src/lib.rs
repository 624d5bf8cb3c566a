//! Hoop Arcade - arcade basketball demos
//!
//! Core modules:
//! - `sim`: Ball flight, collisions, scoring and per-frame game updates
//! - `protocol`: JSON wire format of the remote ball physics endpoint
//! - `renderer`: WebGPU rendering pipeline
//! - `camera`: Follow camera and pointer picking for the 3D court
//! - `controls`: Keyboard state to per-frame inputs
//! - `platform`: Browser-only plumbing (fetch transport)
//! - `tuning`: Data-driven gameplay constants
//! - `server` / `config`: Native physics endpoint and its configuration

pub mod camera;
pub mod controls;
pub mod error;
pub mod platform;
pub mod protocol;
pub mod renderer;
pub mod sim;
pub mod tuning;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;

pub use error::{Error, Result};
pub use tuning::{Court2dTuning, Court3dTuning, FlightTuning};

/// Frame timing constants
pub mod consts {
    /// Nominal frame length the per-frame physics is tuned for (60 Hz)
    pub const FRAME_MS: f32 = 16.666;
    /// Longest frame fed into the 3D physics (anything slower is clamped)
    pub const MAX_FRAME_MS: f32 = 60.0;
}

/// Step `value` toward a target by `step * signum(delta)`.
///
/// Zero delta means no movement, matching `Math.sign` semantics.
#[inline]
pub fn step_toward(value: f32, target: f32, step: f32) -> f32 {
    let delta = target - value;
    if delta > 0.0 {
        value + step
    } else if delta < 0.0 {
        value - step
    } else {
        value
    }
}
