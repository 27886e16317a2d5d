use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, ElectronId, SessionEvent};
use crate::assets::catalog::{ElementCatalog, TargetElement};
use crate::bridge::protocol::{events, verdict_payload};
use crate::core::body::{Body, ElectronPlacement, ParticleCounts, ParticleKind};
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::core::simulator::{NucleusConfig, NucleusSimulator, PositionSink};
use crate::error::{Error, Result};
use crate::systems::shells::ShellDiagram;
use crate::systems::validator::{validate, Verdict};

/// Configuration for a session, provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Nucleus simulation tuning.
    pub nucleus: NucleusConfig,
    /// Electron diagram width in UI units (default: 400).
    pub diagram_width: f32,
    /// Electron diagram height in UI units (default: 400).
    pub diagram_height: f32,
    /// RNG seed for spawn positions, jitter and target draws.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nucleus: NucleusConfig::default(),
            diagram_width: 400.0,
            diagram_height: 400.0,
            seed: 42,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Shared handle to a session's run flag. Clearing it stops the frame loop
/// after the frame in flight.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

fn check_finite(x: f32, y: f32) -> Result<Vec2> {
    if x.is_finite() && y.is_finite() {
        Ok(Vec2::new(x, y))
    } else {
        log::warn!("rejected non-finite coordinate ({}, {})", x, y);
        Err(Error::NonFiniteCoordinate { x, y })
    }
}

/// Events kept for the UI between drains. Older events are dropped first.
pub const MAX_PENDING_EVENTS: usize = 64;

/// One learner's round: the target, the built atom and the running
/// nucleus simulation.
pub struct GameSession {
    catalog: ElementCatalog,
    target: TargetElement,
    scene: Scene,
    simulator: NucleusSimulator,
    diagram: ShellDiagram,
    rng: Rng,
    running: Arc<AtomicBool>,
    next_id: u32,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Create a session over the embedded catalog and start the first round.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Ok(Self::with_catalog(ElementCatalog::load()?, config))
    }

    /// Create a session over a custom catalog and start the first round.
    pub fn with_catalog(catalog: ElementCatalog, config: SessionConfig) -> Self {
        let mut rng = Rng::new(config.seed);
        let target = catalog.pick(&mut rng).clone();
        let mut session = Self {
            catalog,
            target,
            scene: Scene::new(),
            simulator: NucleusSimulator::new(config.nucleus),
            diagram: ShellDiagram::from_size(config.diagram_width, config.diagram_height),
            rng,
            running: Arc::new(AtomicBool::new(true)),
            next_id: 1,
            events: Vec::new(),
        };
        session.announce_round();
        session
    }

    /// Generate the next unique particle ID. IDs are never reused, not even
    /// across rounds.
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_event(&mut self, event: SessionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    fn announce_round(&mut self) {
        log::info!(
            "round started: build {} ({}, Z={}, A={})",
            self.target.name,
            self.target.symbol,
            self.target.atomic_number,
            self.target.mass_number
        );
        self.push_event(SessionEvent::new(
            events::TARGET,
            self.target.atomic_number as f32,
            self.target.mass_number as f32,
            0.0,
        ));
        self.push_counts_event();
    }

    fn push_counts_event(&mut self) {
        let counts = self.scene.counts();
        self.push_event(SessionEvent::new(
            events::COUNTS,
            counts.protons as f32,
            counts.neutrons as f32,
            counts.electrons as f32,
        ));
    }

    // -- Particles --

    /// Add a body to the nucleus. It spawns near the center on the next tick.
    pub fn add_body(&mut self, kind: ParticleKind) -> BodyId {
        let id = BodyId(self.next_id());
        self.scene.spawn_body(Body::new(id, kind));
        log::debug!("added {:?} {:?}", kind, id);
        self.push_counts_event();
        id
    }

    /// Add a body dropped at a rendered top-left coordinate of the nucleus.
    pub fn add_body_at(&mut self, kind: ParticleKind, x: f32, y: f32) -> Result<BodyId> {
        let top_left = check_finite(x, y)?;
        let id = BodyId(self.next_id());
        self.scene.spawn_body(Body::new(id, kind).with_placement(top_left));
        log::debug!("dropped {:?} {:?} at {:?}", kind, id, top_left);
        self.push_counts_event();
        Ok(id)
    }

    /// Place an electron exactly where the UI put it.
    pub fn add_electron(&mut self, x: f32, y: f32) -> Result<ElectronId> {
        let pos = check_finite(x, y)?;
        Ok(self.place_electron(pos))
    }

    /// Place an electron on the ring nearest to the drop point.
    pub fn drop_electron(&mut self, x: f32, y: f32) -> Result<ElectronId> {
        let pos = check_finite(x, y)?;
        let snapped = self.diagram.snap_to_shell(pos);
        Ok(self.place_electron(snapped))
    }

    /// Place an electron on a random ring, for click-to-add.
    pub fn add_electron_on_random_shell(&mut self) -> ElectronId {
        let pos = self.diagram.random_shell_position(&mut self.rng);
        self.place_electron(pos)
    }

    fn place_electron(&mut self, pos: Vec2) -> ElectronId {
        let id = ElectronId(self.next_id());
        self.scene.spawn_electron(ElectronPlacement { id, pos });
        log::debug!("placed electron {:?} at {:?}", id, pos);
        self.push_counts_event();
        id
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        let body = self.scene.despawn_body(id).ok_or(Error::UnknownBody(id))?;
        log::debug!("removed {:?} {:?}", body.kind, id);
        self.push_counts_event();
        Ok(body)
    }

    pub fn remove_electron(&mut self, id: ElectronId) -> Result<ElectronPlacement> {
        let electron = self
            .scene
            .despawn_electron(id)
            .ok_or(Error::UnknownElectron(id))?;
        log::debug!("removed electron {:?}", id);
        self.push_counts_event();
        Ok(electron)
    }

    // -- Frame loop --

    /// Advance the nucleus by one tick. No-op while stopped.
    pub fn step(&mut self, sink: &mut impl PositionSink) {
        if self.is_running() {
            self.simulator.step(self.scene.bodies_mut(), &mut self.rng, sink);
        }
    }

    /// Run the frame the host scheduled, then report whether to schedule
    /// another. A stop raised before this call still lets this frame finish.
    pub fn frame(&mut self, sink: &mut impl PositionSink) -> bool {
        self.simulator.step(self.scene.bodies_mut(), &mut self.rng, sink);
        self.is_running()
    }

    pub fn start(&mut self) {
        self.running.store(true, Ordering::Release);
        self.push_event(SessionEvent::new(events::RUNNING, 1.0, 0.0, 0.0));
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        self.push_event(SessionEvent::new(events::RUNNING, 0.0, 0.0, 0.0));
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// A handle that can stop the frame loop without borrowing the session.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    // -- Rounds --

    /// Check the current build against the target.
    pub fn check(&mut self) -> Verdict {
        let electrons: Vec<Vec2> = self.scene.electrons().iter().map(|e| e.pos).collect();
        let verdict = validate(&self.target, self.scene.counts(), &electrons, &self.diagram);
        log::info!("check {}: {:?}", self.target.symbol, verdict);

        let [a, b, c] = verdict_payload(&verdict);
        self.push_event(SessionEvent::new(events::VERDICT, a, b, c));
        verdict
    }

    /// Draw a new target, clear the atom and restart the simulation.
    pub fn reset(&mut self) {
        self.target = self.catalog.pick(&mut self.rng).clone();
        self.scene.clear();
        self.start();
        self.announce_round();
    }

    // -- Accessors --

    pub fn target(&self) -> &TargetElement {
        &self.target
    }

    pub fn counts(&self) -> ParticleCounts {
        self.scene.counts()
    }

    pub fn bodies(&self) -> &[Body] {
        self.scene.bodies()
    }

    pub fn electrons(&self) -> &[ElectronPlacement] {
        self.scene.electrons()
    }

    pub fn diagram(&self) -> &ShellDiagram {
        &self.diagram
    }

    pub fn nucleus_config(&self) -> &NucleusConfig {
        self.simulator.config()
    }

    /// Resize the electron diagram. Electrons keep their coordinates.
    pub fn set_diagram_size(&mut self, width: f32, height: f32) -> Result<()> {
        let size = check_finite(width, height)?;
        self.diagram = ShellDiagram::from_size(size.x, size.y);
        Ok(())
    }

    /// Events queued since the last drain.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::simulator::NullSink;
    use crate::systems::validator::{CountDiff, CountField};

    fn catalog_of(atomic_number: u32, mass_number: u32) -> ElementCatalog {
        ElementCatalog::from_elements(vec![TargetElement {
            atomic_number,
            mass_number,
            symbol: String::from("X"),
            name: String::from("Test"),
        }])
        .unwrap()
    }

    fn session_for(atomic_number: u32, mass_number: u32) -> GameSession {
        GameSession::with_catalog(catalog_of(atomic_number, mass_number), SessionConfig::default())
    }

    #[test]
    fn new_session_picks_from_catalog() {
        let session = GameSession::new(SessionConfig::default()).expect("embedded catalog loads");
        let z = session.target().atomic_number;
        assert!((1..=20).contains(&z));
        assert_eq!(session.counts(), ParticleCounts::default());
        assert!(session.is_running());
    }

    #[test]
    fn counts_track_adds_and_removes() {
        let mut session = session_for(2, 4);
        let p = session.add_body(ParticleKind::Proton);
        session.add_body(ParticleKind::Neutron);
        let e = session.add_electron(250.0, 200.0).unwrap();
        assert_eq!(session.counts(), ParticleCounts::new(1, 1, 1));

        session.remove_body(p).unwrap();
        session.remove_electron(e).unwrap();
        assert_eq!(session.counts(), ParticleCounts::new(0, 1, 0));
    }

    #[test]
    fn removing_unknown_id_errors() {
        let mut session = session_for(2, 4);
        session.add_body(ParticleKind::Proton);
        assert!(matches!(session.remove_body(BodyId(999)), Err(Error::UnknownBody(_))));
        assert!(matches!(
            session.remove_electron(ElectronId(999)),
            Err(Error::UnknownElectron(_))
        ));
        assert_eq!(session.counts(), ParticleCounts::new(1, 0, 0));
    }

    #[test]
    fn non_finite_input_rejected() {
        let mut session = session_for(2, 4);
        assert!(matches!(
            session.add_electron(f32::NAN, 10.0),
            Err(Error::NonFiniteCoordinate { .. })
        ));
        assert!(session.drop_electron(10.0, f32::INFINITY).is_err());
        assert!(session.add_body_at(ParticleKind::Proton, f32::NEG_INFINITY, 0.0).is_err());
        assert!(session.set_diagram_size(f32::NAN, 100.0).is_err());
        assert_eq!(session.counts(), ParticleCounts::default());
    }

    #[test]
    fn dropped_electron_snaps_to_ring() {
        let mut session = session_for(2, 4);
        let d = *session.diagram();
        let id = session.drop_electron(d.center.x + 55.0, d.center.y).unwrap();
        let placed = session.electrons().iter().find(|e| e.id == id).unwrap();
        // 400 wide: rings at 60, 100, 140, 180
        assert!((placed.pos - (d.center + Vec2::new(60.0, 0.0))).length() < 1e-3);
    }

    #[test]
    fn clicked_electron_lands_on_a_ring() {
        let mut session = session_for(2, 4);
        session.add_electron_on_random_shell();
        let d = *session.diagram();
        let dist = (session.electrons()[0].pos - d.center).length();
        assert!(d.radii.iter().any(|r| (dist - r).abs() < 1e-2));
    }

    #[test]
    fn hydrogen_round_passes() {
        let mut session = session_for(1, 1);
        session.add_body(ParticleKind::Proton);
        let d = *session.diagram();
        session.drop_electron(d.center.x, d.center.y - d.radii[0] - 3.0).unwrap();
        assert_eq!(session.check(), Verdict::Correct);
    }

    #[test]
    fn hydrogen_with_neutron_fails_on_counts() {
        let mut session = session_for(1, 1);
        session.add_body(ParticleKind::Proton);
        session.add_body(ParticleKind::Neutron);
        session.add_electron_on_random_shell();
        assert_eq!(
            session.check(),
            Verdict::WrongCounts {
                diffs: vec![CountDiff { field: CountField::Neutrons, found: 1, expected: 0 }],
            }
        );
    }

    #[test]
    fn check_is_repeatable() {
        let mut session = session_for(3, 7);
        for _ in 0..3 {
            session.add_body(ParticleKind::Proton);
            session.add_electron_on_random_shell();
        }
        for _ in 0..4 {
            session.add_body(ParticleKind::Neutron);
        }
        let first = session.check();
        let second = session.check();
        assert_eq!(first, second);
    }

    #[test]
    fn step_moves_bodies_inside_nucleus() {
        let mut session = session_for(6, 12);
        for _ in 0..6 {
            session.add_body(ParticleKind::Proton);
            session.add_body(ParticleKind::Neutron);
        }
        for _ in 0..120 {
            session.step(&mut NullSink);
        }
        let config = session.nucleus_config().clone();
        for b in session.bodies() {
            let d = (b.pos().expect("stepped") - config.center).length();
            assert!(d <= config.boundary_radius() + 1e-3);
        }
    }

    #[test]
    fn stop_ends_frame_loop() {
        let mut session = session_for(2, 4);
        session.add_body(ParticleKind::Proton);
        assert!(session.frame(&mut NullSink));

        session.stop();
        // The frame already scheduled still runs, but asks for no successor
        assert!(!session.frame(&mut NullSink));

        let frozen = session.bodies()[0].physics;
        session.step(&mut NullSink);
        assert_eq!(session.bodies()[0].physics, frozen);

        session.start();
        assert!(session.frame(&mut NullSink));
    }

    #[test]
    fn stop_handle_works_from_another_thread() {
        let mut session = session_for(2, 4);
        let handle = session.stop_handle();
        std::thread::spawn(move || handle.stop()).join().unwrap();
        assert!(!session.is_running());
        assert!(!session.frame(&mut NullSink));
    }

    #[test]
    fn reset_clears_atom_and_keeps_ids_unique() {
        let mut session = session_for(2, 4);
        let before = session.add_body(ParticleKind::Proton);
        session.add_electron(1.0, 2.0).unwrap();
        session.stop();

        session.reset();

        assert_eq!(session.counts(), ParticleCounts::default());
        assert!(session.is_running());
        let after = session.add_body(ParticleKind::Proton);
        assert!(after.0 > before.0, "ids must not be reused: {:?} after {:?}", after, before);
    }

    #[test]
    fn events_report_counts_and_verdicts() {
        let mut session = session_for(1, 1);
        let initial = session.drain_events();
        assert_eq!(initial[0].kind, events::TARGET);
        assert_eq!(initial[0].a, 1.0);

        session.add_body(ParticleKind::Neutron);
        session.check();
        let events_now = session.drain_events();
        assert!(events_now
            .iter()
            .any(|e| e.kind == events::COUNTS && e.b == 1.0));
        assert!(events_now.iter().any(|e| e.kind == events::VERDICT));
        assert!(session.events().is_empty());
    }

    #[test]
    fn pending_events_stay_bounded_while_stopped() {
        let mut session = session_for(2, 4);
        session.stop();
        for _ in 0..1000 {
            let id = session.add_electron_on_random_shell();
            session.remove_electron(id).unwrap();
            session.check();
        }
        assert_eq!(session.events().len(), MAX_PENDING_EVENTS);
        // Newest event survives
        assert_eq!(session.events().last().map(|e| e.kind), Some(events::VERDICT));
    }

    #[test]
    fn config_from_partial_json() {
        let config = SessionConfig::from_json(r#"{"seed": 7, "nucleus": {"max_speed": 1.5}}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.nucleus.max_speed, 1.5);
        assert_eq!(config.nucleus.nucleus_radius, 60.0);
        assert_eq!(config.diagram_width, 400.0);
    }
}
