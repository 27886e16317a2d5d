//! Nucleus particle simulation.
//!
//! Keeps protons and neutrons clumped inside the nucleus circle with a
//! constant pull toward the center, short-range linear repulsion between
//! neighbours, random jitter and a soft reflecting boundary. The constants
//! are visual tuning values, not physical units.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::BodyId;
use crate::core::body::{Body, ParticleKind, PhysicsState};
use crate::core::rng::Rng;

/// Tuning parameters for the nucleus simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NucleusConfig {
    /// Nucleus center in the local nucleus frame.
    pub center: Vec2,
    /// Radius of the nucleus drop zone.
    pub nucleus_radius: f32,
    /// Radius shared by every body.
    pub particle_radius: f32,
    /// Pull toward the center, multiplied by `attraction_scale`.
    pub attraction_strength: f32,
    pub attraction_scale: f32,
    /// Pairwise push, multiplied by `repulsion_scale`.
    pub repulsion_strength: f32,
    pub repulsion_scale: f32,
    /// Distance at which repulsion vanishes (slightly above one diameter).
    pub repulsion_cutoff: f32,
    /// Maximum speed per tick.
    pub max_speed: f32,
    /// Velocity multiplier applied every tick (friction).
    pub damping: f32,
    /// Velocity multiplier applied on boundary contact.
    pub bounce: f32,
    /// Half-width of the per-component random kick each tick.
    pub jitter: f32,
    /// Half-width of the per-component initial velocity.
    pub initial_speed: f32,
    /// Half-width of the square around the center where unplaced bodies spawn.
    pub spawn_spread: f32,
}

impl Default for NucleusConfig {
    fn default() -> Self {
        Self {
            center: Vec2::new(60.0, 60.0),
            nucleus_radius: 60.0,
            particle_radius: 7.5,
            attraction_strength: 0.05,
            attraction_scale: 0.01,
            repulsion_strength: 2.0,
            repulsion_scale: 0.05,
            repulsion_cutoff: 16.0,
            max_speed: 0.5,
            damping: 0.95,
            bounce: -0.5,
            jitter: 0.1,
            initial_speed: 0.25,
            spawn_spread: 10.0,
        }
    }
}

impl NucleusConfig {
    /// Largest distance from the center a body's midpoint may reach.
    pub fn boundary_radius(&self) -> f32 {
        self.nucleus_radius - self.particle_radius
    }
}

/// Receives each body's rendered position once per step.
pub trait PositionSink {
    /// `top_left` is the body position shifted by the particle radius, the
    /// coordinate a DOM-style renderer positions the particle by.
    fn publish(&mut self, id: BodyId, kind: ParticleKind, top_left: Vec2);
}

impl<F: FnMut(BodyId, ParticleKind, Vec2)> PositionSink for F {
    fn publish(&mut self, id: BodyId, kind: ParticleKind, top_left: Vec2) {
        self(id, kind, top_left)
    }
}

/// Sink that discards every position.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PositionSink for NullSink {
    fn publish(&mut self, _id: BodyId, _kind: ParticleKind, _top_left: Vec2) {}
}

/// Linear repulsion that `p` receives from a neighbour at `other`.
///
/// Zero at and beyond the cutoff, growing as the two overlap. Coincident
/// bodies exert nothing.
pub fn repulsion_between(p: Vec2, other: Vec2, config: &NucleusConfig) -> Vec2 {
    let delta = p - other;
    let dist = delta.length();
    // Negated form so a NaN distance also bails out
    if !(dist > 0.0 && dist < config.repulsion_cutoff) {
        return Vec2::ZERO;
    }
    let force = (config.repulsion_cutoff - dist) * config.repulsion_strength;
    delta / dist * force * config.repulsion_scale
}

/// Frame-stepped integrator over the nucleus bodies.
pub struct NucleusSimulator {
    config: NucleusConfig,
    /// Pre-step positions, reused across steps.
    snapshot: Vec<Vec2>,
}

impl NucleusSimulator {
    pub fn new(config: NucleusConfig) -> Self {
        Self {
            config,
            snapshot: Vec::new(),
        }
    }

    pub fn config(&self) -> &NucleusConfig {
        &self.config
    }

    /// Give a body its starting position and a small random velocity.
    fn init_body(&self, body: &mut Body, rng: &mut Rng) {
        let pos = match body.placed_at {
            Some(top_left) => top_left + Vec2::splat(self.config.particle_radius),
            None => self.spawn_near_center(rng),
        };
        let vel = Vec2::new(
            rng.symmetric(self.config.initial_speed),
            rng.symmetric(self.config.initial_speed),
        );
        body.physics = Some(PhysicsState { pos, vel });
    }

    fn spawn_near_center(&self, rng: &mut Rng) -> Vec2 {
        self.config.center
            + Vec2::new(
                rng.symmetric(self.config.spawn_spread),
                rng.symmetric(self.config.spawn_spread),
            )
    }

    /// Advance every body by one tick.
    ///
    /// All forces are computed against the positions from before this step,
    /// so the result does not depend on body order.
    pub fn step(&mut self, bodies: &mut [Body], rng: &mut Rng, sink: &mut impl PositionSink) {
        for body in bodies.iter_mut() {
            if body.physics.is_none() {
                self.init_body(body, rng);
            }
        }

        self.snapshot.clear();
        self.snapshot
            .extend(bodies.iter().map(|b| b.pos().unwrap_or(self.config.center)));

        let config = &self.config;
        let limit = config.boundary_radius();

        for (i, body) in bodies.iter_mut().enumerate() {
            let Some(PhysicsState { mut pos, mut vel }) = body.physics else {
                continue;
            };

            // Centering pull
            vel += (config.center - pos) * config.attraction_strength * config.attraction_scale;

            // Neighbour repulsion
            for (j, &other) in self.snapshot.iter().enumerate() {
                if i != j {
                    vel += repulsion_between(pos, other, config);
                }
            }

            // Thermal jitter
            vel.x += rng.symmetric(config.jitter);
            vel.y += rng.symmetric(config.jitter);

            vel *= config.damping;

            let speed = vel.length();
            if speed > config.max_speed {
                vel = vel / speed * config.max_speed;
            }

            pos += vel;

            // Soft bounce off the nucleus wall
            let offset = pos - config.center;
            if offset.length() > limit {
                let angle = offset.y.atan2(offset.x);
                pos = config.center + Vec2::new(angle.cos(), angle.sin()) * limit;
                vel *= config.bounce;
            }

            let mut state = PhysicsState { pos, vel };
            if !state.is_finite() {
                log::warn!("body {:?} went non-finite, respawning near center", body.id);
                state = PhysicsState {
                    pos: config.center
                        + Vec2::new(
                            rng.symmetric(config.spawn_spread),
                            rng.symmetric(config.spawn_spread),
                        ),
                    vel: Vec2::ZERO,
                };
                body.placed_at = None;
            }
            body.physics = Some(state);

            sink.publish(
                body.id,
                body.kind,
                state.pos - Vec2::splat(config.particle_radius),
            );
        }
    }
}
