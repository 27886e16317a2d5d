pub mod api;
pub mod assets;
pub mod bridge;
pub mod core;
pub mod error;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::session::{GameSession, SessionConfig, StopHandle, MAX_PENDING_EVENTS};
pub use api::types::{BodyId, ElectronId, SessionEvent};
pub use assets::catalog::{ElementCatalog, TargetElement};
pub use bridge::buffer::{BodyInstance, PositionBuffer};
pub use bridge::protocol::{BODY_FLOATS, EVENT_FLOATS, INVALID_ID, PROTOCOL_VERSION};
pub use core::body::{Body, ElectronPlacement, ParticleCounts, ParticleKind, PhysicsState};
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use core::simulator::{repulsion_between, NucleusConfig, NucleusSimulator, NullSink, PositionSink};
pub use error::{Error, Result};
pub use systems::shells::{expected_configuration, ShellDiagram, SHELL_CAPACITIES, SHELL_COUNT};
pub use systems::validator::{validate, CountDiff, CountField, Locale, Verdict};
