use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, ElectronId};

/// Nucleus particle kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Proton,
    Neutron,
}

impl ParticleKind {
    /// Wire code used by the bridge (0 = proton, 1 = neutron).
    pub fn code(self) -> u32 {
        match self {
            Self::Proton => 0,
            Self::Neutron => 1,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Proton),
            1 => Some(Self::Neutron),
            _ => None,
        }
    }
}

/// Integrator state of a body, in the local nucleus frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsState {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl PhysicsState {
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// A simulated nucleus particle.
///
/// `physics` stays `None` until the simulator first sees the body; the
/// spawn position then comes from `placed_at` when the body was dropped at a
/// rendered coordinate, or from a spot near the nucleus center otherwise.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: ParticleKind,
    pub physics: Option<PhysicsState>,
    /// Last rendered top-left coordinate supplied by the UI layer.
    pub placed_at: Option<Vec2>,
}

impl Body {
    pub fn new(id: BodyId, kind: ParticleKind) -> Self {
        Self {
            id,
            kind,
            physics: None,
            placed_at: None,
        }
    }

    // -- Builder pattern --

    pub fn with_placement(mut self, top_left: Vec2) -> Self {
        self.placed_at = Some(top_left);
        self
    }

    pub fn with_physics(mut self, pos: Vec2, vel: Vec2) -> Self {
        self.physics = Some(PhysicsState { pos, vel });
        self
    }

    /// Current position, if the simulator has initialized this body.
    pub fn pos(&self) -> Option<Vec2> {
        self.physics.map(|p| p.pos)
    }

    /// Current velocity, if the simulator has initialized this body.
    pub fn vel(&self) -> Option<Vec2> {
        self.physics.map(|p| p.vel)
    }
}

/// An electron placed on the atom diagram. Never simulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElectronPlacement {
    pub id: ElectronId,
    pub pos: Vec2,
}

/// Live particle tallies, always projected from the scene collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleCounts {
    pub protons: u32,
    pub neutrons: u32,
    pub electrons: u32,
}

impl ParticleCounts {
    pub fn new(protons: u32, neutrons: u32, electrons: u32) -> Self {
        Self {
            protons,
            neutrons,
            electrons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_round_trip() {
        for kind in [ParticleKind::Proton, ParticleKind::Neutron] {
            assert_eq!(ParticleKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ParticleKind::from_code(9), None);
    }

    #[test]
    fn new_body_is_uninitialized() {
        let body = Body::new(BodyId(1), ParticleKind::Proton);
        assert!(body.physics.is_none());
        assert!(body.pos().is_none());

        let body = body.with_physics(Vec2::new(1.0, 2.0), Vec2::ZERO);
        assert_eq!(body.pos(), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn non_finite_state_detected() {
        let state = PhysicsState {
            pos: Vec2::new(f32::NAN, 0.0),
            vel: Vec2::ZERO,
        };
        assert!(!state.is_finite());
    }
}
