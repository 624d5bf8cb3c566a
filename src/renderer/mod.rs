//! WebGPU rendering module
//!
//! Flat-coloured triangles in NDC. `scene` turns game state into vertices;
//! `pipeline` uploads and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, backing_size};
pub use vertex::Vertex;
