use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color, laid out exactly as a vertex color attribute.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized `[r, g, b, a]` in 0.0..=1.0.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// How cube geometry is handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubmissionMode {
    /// Face connectivity comes from the explicit index list.
    #[default]
    Indexed,
    /// Face connectivity comes from vertex array order.
    Arrays,
}

impl SubmissionMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Indexed => Self::Arrays,
            Self::Arrays => Self::Indexed,
        }
    }
}

/// Runtime flags flipped by input and read every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFlags {
    pub submission: SubmissionMode,
    pub blending: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            submission: SubmissionMode::Indexed,
            blending: true,
        }
    }
}
