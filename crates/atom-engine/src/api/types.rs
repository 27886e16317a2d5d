use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::bridge::protocol::EVENT_FLOATS;

/// Unique identifier for a nucleus body within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Unique identifier for a placed electron within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElectronId(pub u32);

/// A session event forwarded to the UI layer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SessionEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl SessionEvent {
    pub const FLOATS: usize = EVENT_FLOATS;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_event_is_4_floats() {
        assert_eq!(std::mem::size_of::<SessionEvent>(), SessionEvent::FLOATS * 4);
        let events = [SessionEvent::new(1.0, 2.0, 3.0, 4.0)];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
