//! Platform layer
//!
//! Browser-only plumbing that the simulation reaches through traits:
//! - `fetch`: `Transport` for the remote physics endpoint

#[cfg(target_arch = "wasm32")]
pub mod fetch;

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;
