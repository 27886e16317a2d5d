use atom_engine::{
    BodyId, ElectronId, GameSession, Locale, ParticleKind, PositionBuffer, SessionEvent, Verdict,
    INVALID_ID,
};

/// Owns the session and the per-frame buffers the browser reads.
///
/// The bridge keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]` that forward to it, so every mutation
/// and tick runs on the thread that owns the session.
pub struct SessionRunner {
    session: GameSession,
    positions: PositionBuffer,
    /// Events drained on the last tick or explicit drain.
    frame_events: Vec<SessionEvent>,
    last_verdict: Option<Verdict>,
}

impl SessionRunner {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            positions: PositionBuffer::new(),
            frame_events: Vec::with_capacity(32),
            last_verdict: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Run one animation frame. Returns whether the host should request
    /// another one.
    pub fn tick(&mut self) -> bool {
        self.positions.clear();
        let again = self.session.frame(&mut self.positions);
        self.drain_events();
        again
    }

    /// Move pending session events into the buffer the host reads. The host
    /// calls this itself while the frame loop is stopped.
    pub fn drain_events(&mut self) -> u32 {
        self.frame_events = self.session.drain_events();
        self.events_len()
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    // ---- Particles ----

    pub fn add_body(&mut self, kind: ParticleKind) -> u32 {
        self.session.add_body(kind).0
    }

    pub fn drop_body(&mut self, kind_code: u32, x: f32, y: f32) -> u32 {
        let Some(kind) = ParticleKind::from_code(kind_code) else {
            log::warn!("unknown particle kind code {}", kind_code);
            return INVALID_ID;
        };
        match self.session.add_body_at(kind, x, y) {
            Ok(id) => id.0,
            Err(e) => {
                log::warn!("drop rejected: {}", e);
                INVALID_ID
            }
        }
    }

    pub fn add_electron(&mut self, x: f32, y: f32) -> u32 {
        match self.session.add_electron(x, y) {
            Ok(id) => id.0,
            Err(e) => {
                log::warn!("electron rejected: {}", e);
                INVALID_ID
            }
        }
    }

    pub fn drop_electron(&mut self, x: f32, y: f32) -> u32 {
        match self.session.drop_electron(x, y) {
            Ok(id) => id.0,
            Err(e) => {
                log::warn!("electron drop rejected: {}", e);
                INVALID_ID
            }
        }
    }

    pub fn click_electron(&mut self) -> u32 {
        self.session.add_electron_on_random_shell().0
    }

    pub fn remove_body(&mut self, id: u32) -> bool {
        match self.session.remove_body(BodyId(id)) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn remove_electron(&mut self, id: u32) -> bool {
        match self.session.remove_electron(ElectronId(id)) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn set_diagram_size(&mut self, width: f32, height: f32) -> bool {
        match self.session.set_diagram_size(width, height) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("diagram resize rejected: {}", e);
                false
            }
        }
    }

    // ---- Rounds ----

    /// Check the build and return the verdict as JSON.
    pub fn check_json(&mut self) -> String {
        let verdict = self.session.check();
        let json = serde_json::to_string(&verdict).unwrap_or_else(|e| {
            log::error!("verdict serialization failed: {}", e);
            String::from("{}")
        });
        self.last_verdict = Some(verdict);
        json
    }

    /// Feedback text for the last check, empty before the first check of a round.
    pub fn feedback(&self, lang: &str) -> String {
        self.last_verdict
            .as_ref()
            .map(|v| v.message(Locale::from_tag(lang)))
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.positions.clear();
        self.last_verdict = None;
    }

    pub fn target_json(&self) -> String {
        serde_json::to_string(self.session.target()).unwrap_or_else(|e| {
            log::error!("target serialization failed: {}", e);
            String::from("{}")
        })
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn positions_ptr(&self) -> *const f32 {
        self.positions.instances_ptr()
    }

    pub fn position_count(&self) -> u32 {
        self.positions.instance_count()
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.frame_events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.frame_events.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atom_engine::bridge::protocol::events;
    use atom_engine::{ElementCatalog, SessionConfig, TargetElement, MAX_PENDING_EVENTS};

    fn runner_for(atomic_number: u32, mass_number: u32) -> SessionRunner {
        let catalog = ElementCatalog::from_elements(vec![TargetElement {
            atomic_number,
            mass_number,
            symbol: String::from("X"),
            name: String::from("Test"),
        }])
        .unwrap();
        SessionRunner::new(GameSession::with_catalog(catalog, SessionConfig::default()))
    }

    #[test]
    fn tick_publishes_positions() {
        let mut runner = runner_for(2, 4);
        runner.add_body(ParticleKind::Proton);
        runner.add_body(ParticleKind::Neutron);
        assert!(runner.tick());
        assert_eq!(runner.position_count(), 2);
        // Round start and the two adds were drained this frame
        assert!(runner.events_len() >= 3);
    }

    #[test]
    fn rejected_input_returns_sentinels() {
        let mut runner = runner_for(2, 4);
        assert_eq!(runner.add_electron(f32::NAN, 0.0), INVALID_ID);
        assert_eq!(runner.drop_body(7, 1.0, 1.0), INVALID_ID);
        assert!(!runner.remove_body(12345));
        assert!(!runner.remove_electron(12345));
    }

    #[test]
    fn check_returns_json_and_feedback() {
        let mut runner = runner_for(1, 1);
        assert_eq!(runner.feedback("de"), "");
        runner.add_body(ParticleKind::Proton);
        let d = *runner.session().diagram();
        runner.drop_electron(d.center.x + d.radii[0], d.center.y);

        let json = runner.check_json();
        assert!(json.contains("\"correct\""), "got {}", json);
        assert!(runner.feedback("en").contains("Correct"));

        runner.reset();
        assert_eq!(runner.feedback("de"), "");
        assert_eq!(runner.position_count(), 0);
    }

    #[test]
    fn events_after_stop_are_drained_on_request() {
        let mut runner = runner_for(2, 4);
        runner.tick();
        runner.stop();
        assert!(!runner.tick());
        for _ in 0..1000 {
            let id = runner.click_electron();
            runner.remove_electron(id);
            runner.check_json();
        }
        let pending = runner.session().events();
        assert!(pending.len() <= MAX_PENDING_EVENTS, "queue grew to {}", pending.len());
        assert_eq!(pending.last().map(|e| e.kind), Some(events::VERDICT));

        assert_eq!(runner.drain_events() as usize, MAX_PENDING_EVENTS);
        assert!(runner.session().events().is_empty());
        assert_eq!(runner.drain_events(), 0);
    }

    #[test]
    fn stop_halts_ticks() {
        let mut runner = runner_for(2, 4);
        runner.stop();
        assert!(!runner.tick());
        runner.start();
        assert!(runner.tick());
    }
}
