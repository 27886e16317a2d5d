//! Wire layout shared with the browser UI.
//! Must stay in sync with the TypeScript side that reads the buffers.
//!
//! Layout (all values f32 / 4 bytes):
//! ```text
//! [Positions: body_count × 4 floats]   id, kind, left, top
//! [Events:    event_count × 4 floats]  kind, a, b, c
//! ```

use crate::core::body::ParticleKind;
use crate::systems::validator::Verdict;

/// Protocol version reported to the UI at init.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per body record (wire format, never changes).
pub const BODY_FLOATS: usize = 4;

/// Floats per session event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

/// Returned by the bridge in place of an id when an add was rejected.
pub const INVALID_ID: u32 = u32::MAX;

/// Body kind codes.
pub const KIND_PROTON: f32 = 0.0;
pub const KIND_NEUTRON: f32 = 1.0;

/// Session event kinds.
pub mod events {
    /// a = protons, b = neutrons, c = electrons.
    pub const COUNTS: f32 = 1.0;
    /// a = atomic number, b = mass number.
    pub const TARGET: f32 = 2.0;
    /// a = verdict code, b = shell (1-indexed, 0 if none), c = found in that shell.
    pub const VERDICT: f32 = 3.0;
    /// a = 1 when the simulation runs, 0 when stopped.
    pub const RUNNING: f32 = 4.0;
}

/// Verdict codes carried in `events::VERDICT`.
pub const VERDICT_CORRECT: f32 = 0.0;
pub const VERDICT_WRONG_COUNTS: f32 = 1.0;
pub const VERDICT_WRONG_SHELL: f32 = 2.0;

pub fn kind_code(kind: ParticleKind) -> f32 {
    match kind {
        ParticleKind::Proton => KIND_PROTON,
        ParticleKind::Neutron => KIND_NEUTRON,
    }
}

/// Pack a verdict into the `a, b, c` payload of a verdict event.
pub fn verdict_payload(verdict: &Verdict) -> [f32; 3] {
    match verdict {
        Verdict::Correct => [VERDICT_CORRECT, 0.0, 0.0],
        Verdict::WrongCounts { diffs } => [VERDICT_WRONG_COUNTS, 0.0, diffs.len() as f32],
        Verdict::WrongShell { shell, found, .. } => [VERDICT_WRONG_SHELL, *shell as f32, *found as f32],
    }
}
