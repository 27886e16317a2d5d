//! Electron shell geometry for the atom diagram.
//!
//! The diagram is drawn as four concentric rings. The same ring radii are
//! used when snapping a dropped electron and when classifying electrons for
//! validation, so a snapped electron always lands in the shell it shows.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::rng::Rng;

/// Number of shells on the diagram.
pub const SHELL_COUNT: usize = 4;

/// Simplified maximum occupancy per shell (adequate for Z <= 20).
pub const SHELL_CAPACITIES: [u32; SHELL_COUNT] = [2, 8, 8, 18];

/// Ring radius as a fraction of the diagram width.
pub const SHELL_RADIUS_FACTORS: [f32; SHELL_COUNT] = [0.15, 0.25, 0.35, 0.45];

/// Ring layout of the atom diagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellDiagram {
    pub center: Vec2,
    pub radii: [f32; SHELL_COUNT],
}

impl ShellDiagram {
    pub fn new(center: Vec2, radii: [f32; SHELL_COUNT]) -> Self {
        Self { center, radii }
    }

    /// Layout for a drop zone of the given size: centered rings whose radii
    /// scale with the width.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            radii: SHELL_RADIUS_FACTORS.map(|f| width * f),
        }
    }

    /// Index of the ring closest to `pos`. Exact ties go to the inner ring.
    pub fn nearest_shell(&self, pos: Vec2) -> usize {
        let dist = (pos - self.center).length();
        let mut closest = 0;
        let mut min_diff = (dist - self.radii[0]).abs();
        for (i, &r) in self.radii.iter().enumerate().skip(1) {
            let diff = (dist - r).abs();
            if diff < min_diff {
                min_diff = diff;
                closest = i;
            }
        }
        closest
    }

    /// Point on `shell` at `angle` radians around the center.
    pub fn point_on_shell(&self, shell: usize, angle: f32) -> Vec2 {
        let r = self.radii[shell.min(SHELL_COUNT - 1)];
        self.center + Vec2::new(angle.cos(), angle.sin()) * r
    }

    /// Move `pos` radially onto its nearest ring, keeping its angle.
    pub fn snap_to_shell(&self, pos: Vec2) -> Vec2 {
        let offset = pos - self.center;
        // atan2(0, 0) is 0, so a drop on the center lands at angle 0
        let angle = offset.y.atan2(offset.x);
        self.point_on_shell(self.nearest_shell(pos), angle)
    }

    /// Random ring, random angle. Used when an electron is added by click
    /// rather than dropped.
    pub fn random_shell_position(&self, rng: &mut Rng) -> Vec2 {
        let shell = rng.next_int(SHELL_COUNT as u32) as usize;
        let angle = rng.angle();
        self.point_on_shell(shell, angle)
    }

    /// Tally electrons per ring.
    pub fn classify<'a>(&self, positions: impl IntoIterator<Item = &'a Vec2>) -> [u32; SHELL_COUNT] {
        let mut counts = [0; SHELL_COUNT];
        for pos in positions {
            counts[self.nearest_shell(*pos)] += 1;
        }
        counts
    }
}

impl Default for ShellDiagram {
    fn default() -> Self {
        Self::from_size(400.0, 400.0)
    }
}

/// Expected electrons per shell for a neutral atom with `electrons`
/// electrons: fill each shell up to its capacity, innermost first.
pub fn expected_configuration(electrons: u32) -> [u32; SHELL_COUNT] {
    let mut expected = [0; SHELL_COUNT];
    let mut remaining = electrons;
    for (slot, &capacity) in expected.iter_mut().zip(SHELL_CAPACITIES.iter()) {
        let fill = remaining.min(capacity);
        *slot = fill;
        remaining -= fill;
    }
    expected
}
