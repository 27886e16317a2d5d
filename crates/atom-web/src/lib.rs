//! WASM exports for the atom builder.
//!
//! The browser owns the DOM, drag and drop and the animation frame loop. It
//! calls `atom_tick` from `requestAnimationFrame` and keeps requesting frames
//! while the call returns true.

pub mod runner;

pub use runner::SessionRunner;

use std::cell::RefCell;

use atom_engine::{GameSession, ParticleKind, SessionConfig, INVALID_ID};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner, or return `R::default()` before `atom_init`.
fn with_runner<R: Default>(f: impl FnOnce(&mut SessionRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("atom session not initialized, call atom_init() first");
            R::default()
        }
    })
}

fn install(config: SessionConfig) -> bool {
    match GameSession::new(config) {
        Ok(session) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(SessionRunner::new(session)));
            true
        }
        Err(e) => {
            log::error!("atom session failed to start: {}", e);
            false
        }
    }
}

fn setup_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64 + 1
}

/// Start a session with default tuning. A zero seed draws one from `Math.random`.
#[wasm_bindgen]
pub fn atom_init(seed: u32) -> bool {
    setup_logging();
    let seed = if seed == 0 { random_seed() } else { seed as u64 };
    let ok = install(SessionConfig {
        seed,
        ..SessionConfig::default()
    });
    if ok {
        log::info!("atom-builder: initialized");
    }
    ok
}

/// Start a session from a JSON config; missing fields keep their defaults.
#[wasm_bindgen]
pub fn atom_init_with_config(json: &str) -> bool {
    setup_logging();
    match SessionConfig::from_json(json) {
        Ok(config) => install(config),
        Err(e) => {
            log::error!("invalid session config: {}", e);
            false
        }
    }
}

// ---- Frame loop ----

#[wasm_bindgen]
pub fn atom_tick() -> bool {
    with_runner(|r| r.tick())
}

#[wasm_bindgen]
pub fn atom_start() {
    with_runner(|r| r.start());
}

#[wasm_bindgen]
pub fn atom_stop() {
    with_runner(|r| r.stop());
}

// ---- Particles ----

#[wasm_bindgen]
pub fn atom_add_proton() -> u32 {
    with_runner(|r| Some(r.add_body(ParticleKind::Proton))).unwrap_or(INVALID_ID)
}

#[wasm_bindgen]
pub fn atom_add_neutron() -> u32 {
    with_runner(|r| Some(r.add_body(ParticleKind::Neutron))).unwrap_or(INVALID_ID)
}

/// Add a body dropped at a rendered top-left coordinate (kind 0 = proton, 1 = neutron).
#[wasm_bindgen]
pub fn atom_drop_body(kind: u32, x: f32, y: f32) -> u32 {
    with_runner(|r| Some(r.drop_body(kind, x, y))).unwrap_or(INVALID_ID)
}

#[wasm_bindgen]
pub fn atom_add_electron(x: f32, y: f32) -> u32 {
    with_runner(|r| Some(r.add_electron(x, y))).unwrap_or(INVALID_ID)
}

#[wasm_bindgen]
pub fn atom_drop_electron(x: f32, y: f32) -> u32 {
    with_runner(|r| Some(r.drop_electron(x, y))).unwrap_or(INVALID_ID)
}

#[wasm_bindgen]
pub fn atom_click_electron() -> u32 {
    with_runner(|r| Some(r.click_electron())).unwrap_or(INVALID_ID)
}

#[wasm_bindgen]
pub fn atom_remove_body(id: u32) -> bool {
    with_runner(|r| r.remove_body(id))
}

#[wasm_bindgen]
pub fn atom_remove_electron(id: u32) -> bool {
    with_runner(|r| r.remove_electron(id))
}

#[wasm_bindgen]
pub fn atom_set_diagram_size(width: f32, height: f32) -> bool {
    with_runner(|r| r.set_diagram_size(width, height))
}

// ---- Rounds ----

#[wasm_bindgen]
pub fn atom_check() -> String {
    with_runner(|r| r.check_json())
}

#[wasm_bindgen]
pub fn atom_feedback(lang: &str) -> String {
    with_runner(|r| r.feedback(lang))
}

#[wasm_bindgen]
pub fn atom_reset() {
    with_runner(|r| r.reset());
}

#[wasm_bindgen]
pub fn atom_target_json() -> String {
    with_runner(|r| r.target_json())
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_proton_count() -> u32 {
    with_runner(|r| r.session().counts().protons)
}

#[wasm_bindgen]
pub fn get_neutron_count() -> u32 {
    with_runner(|r| r.session().counts().neutrons)
}

#[wasm_bindgen]
pub fn get_electron_count() -> u32 {
    with_runner(|r| r.session().counts().electrons)
}

#[wasm_bindgen]
pub fn get_positions_ptr() -> *const f32 {
    with_runner(|r| Some(r.positions_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_position_count() -> u32 {
    with_runner(|r| r.position_count())
}

/// Refresh the event buffer outside the frame loop. Returns the event count.
#[wasm_bindgen]
pub fn atom_drain_events() -> u32 {
    with_runner(|r| r.drain_events())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| Some(r.events_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len())
}

#[wasm_bindgen]
pub fn get_protocol_version() -> f32 {
    atom_engine::PROTOCOL_VERSION
}
