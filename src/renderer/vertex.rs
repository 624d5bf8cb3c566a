//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// 3D scene background (0x1b2b2b)
    pub const BACKGROUND_3D: [f32; 4] = [0.106, 0.169, 0.169, 1.0];
    /// Side-view canvas background
    pub const BACKGROUND_2D: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Forest green court (#228B22)
    pub const COURT_2D: [f32; 4] = [0.133, 0.545, 0.133, 1.0];
    /// Sea green court (0x2e8b57)
    pub const COURT_3D: [f32; 4] = [0.180, 0.545, 0.341, 1.0];
    pub const LINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HOOP_POST: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BACKBOARD: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Orange-red rim (0xff4500)
    pub const RIM: [f32; 4] = [1.0, 0.271, 0.0, 1.0];
    pub const PLAYER_2D: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const OPPONENT_2D: [f32; 4] = [1.0, 0.647, 0.0, 1.0];
    /// 0x2b7aff
    pub const PLAYER_3D: [f32; 4] = [0.169, 0.478, 1.0, 1.0];
    /// 0xff8c00
    pub const OPPONENT_3D: [f32; 4] = [1.0, 0.549, 0.0, 1.0];
    pub const BALL_2D: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    /// 0xffd27f
    pub const BALL_3D: [f32; 4] = [1.0, 0.824, 0.498, 1.0];
    pub const AIM_LINE: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
}
