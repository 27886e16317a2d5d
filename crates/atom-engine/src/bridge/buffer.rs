use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::protocol::{kind_code, BODY_FLOATS};
use crate::api::types::BodyId;
use crate::core::body::ParticleKind;
use crate::core::simulator::PositionSink;

/// Per-body record read by the UI after each frame.
/// Must match the TypeScript protocol: 4 floats = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub id: f32,
    pub kind: f32,
    /// Rendered top-left corner in the nucleus frame.
    pub left: f32,
    pub top: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = BODY_FLOATS;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Positions published by the last simulator step.
pub struct PositionBuffer {
    pub instances: Vec<BodyInstance>,
}

impl PositionBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for direct memory reads from JS.
    pub fn instances_ptr(&self) -> *const f32 {
        self.as_floats().as_ptr()
    }
}

impl PositionSink for PositionBuffer {
    fn publish(&mut self, id: BodyId, kind: ParticleKind, top_left: Vec2) {
        self.instances.push(BodyInstance {
            id: id.0 as f32,
            kind: kind_code(kind),
            left: top_left.x,
            top: top_left.y,
        });
    }
}

impl Default for PositionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
