use crate::api::types::{BodyId, ElectronId};
use crate::core::body::{Body, ElectronPlacement, ParticleCounts, ParticleKind};

/// Owned storage for the live nucleus bodies and placed electrons.
/// Flat Vecs; a classroom atom holds a few dozen particles at most.
pub struct Scene {
    bodies: Vec<Body>,
    electrons: Vec<ElectronPlacement>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(64),
            electrons: Vec::with_capacity(32),
        }
    }

    /// Add a body to the nucleus.
    pub fn spawn_body(&mut self, body: Body) {
        self.bodies.push(body);
    }

    /// Place an electron on the diagram.
    pub fn spawn_electron(&mut self, electron: ElectronPlacement) {
        self.electrons.push(electron);
    }

    /// Remove a body by ID. Returns the removed body if found.
    /// Order is preserved so publish order stays stable for the renderer.
    pub fn despawn_body(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.remove(idx))
    }

    /// Remove an electron by ID. Returns the removed placement if found.
    pub fn despawn_electron(&mut self, id: ElectronId) -> Option<ElectronPlacement> {
        let idx = self.electrons.iter().position(|e| e.id == id)?;
        Some(self.electrons.remove(idx))
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn electrons(&self) -> &[ElectronPlacement] {
        &self.electrons
    }

    /// Project the live collections into particle tallies.
    pub fn counts(&self) -> ParticleCounts {
        let protons = self
            .bodies
            .iter()
            .filter(|b| b.kind == ParticleKind::Proton)
            .count() as u32;
        let neutrons = self.bodies.len() as u32 - protons;
        ParticleCounts::new(protons, neutrons, self.electrons.len() as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.electrons.is_empty()
    }

    /// Drop every body and electron.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.electrons.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
