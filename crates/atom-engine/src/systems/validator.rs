//! Answer checking for a built atom.
//!
//! A build is judged in two stages: particle counts first, then the electron
//! arrangement over the diagram rings. Only the first failing stage is
//! reported, and within the shell stage only the innermost wrong shell.

use std::fmt::Write as _;

use glam::Vec2;
use serde::Serialize;

use crate::assets::catalog::TargetElement;
use crate::core::body::ParticleCounts;
use crate::systems::shells::{expected_configuration, ShellDiagram, SHELL_COUNT};

/// Which particle tally a count mismatch refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountField {
    Protons,
    Neutrons,
    Electrons,
}

impl CountField {
    fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Protons, Locale::De) => "Protonen",
            (Self::Neutrons, Locale::De) => "Neutronen",
            (Self::Electrons, Locale::De) => "Elektronen",
            (Self::Protons, Locale::En) => "Protons",
            (Self::Neutrons, Locale::En) => "Neutrons",
            (Self::Electrons, Locale::En) => "Electrons",
        }
    }
}

/// One mismatching tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountDiff {
    pub field: CountField,
    pub found: u32,
    pub expected: u32,
}

/// Outcome of checking a build against its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    /// At least one tally is off. Lists every mismatch in
    /// proton, neutron, electron order.
    WrongCounts { diffs: Vec<CountDiff> },
    /// Counts match but the innermost wrong shell (1-indexed) holds
    /// `found` electrons instead of `expected`.
    WrongShell { shell: usize, found: u32, expected: u32 },
}

/// Language of the feedback text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    /// Parse a language tag such as "de" or "en-US". Unknown tags fall back
    /// to German.
    pub fn from_tag(tag: &str) -> Self {
        if tag.to_ascii_lowercase().starts_with("en") {
            Self::En
        } else {
            Self::De
        }
    }
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    /// User-facing feedback line.
    pub fn message(&self, locale: Locale) -> String {
        match self {
            Self::Correct => match locale {
                Locale::De => "✅ Richtig! Gut gemacht.".to_string(),
                Locale::En => "✅ Correct! Well done.".to_string(),
            },
            Self::WrongCounts { diffs } => {
                let mut msg = match locale {
                    Locale::De => String::from("❌ Falsch."),
                    Locale::En => String::from("❌ Not quite."),
                };
                for diff in diffs {
                    let _ = write!(msg, " {}: {}/{}.", diff.field.label(locale), diff.found, diff.expected);
                }
                msg
            }
            Self::WrongShell { shell, found, expected } => match locale {
                Locale::De => format!(
                    "❌ Schale {shell} ist falsch. Gefunden: {found}, Erwartet: {expected}. \
                     Denke daran, die inneren Schalen zuerst zu füllen!"
                ),
                Locale::En => format!(
                    "❌ Shell {shell} is wrong. Found: {found}, expected: {expected}. \
                     Remember to fill the inner shells first!"
                ),
            },
        }
    }
}

/// Compare live tallies with what the target needs. Empty when all match.
pub fn count_diffs(target: &TargetElement, counts: ParticleCounts) -> Vec<CountDiff> {
    [
        (CountField::Protons, counts.protons, target.expected_protons()),
        (CountField::Neutrons, counts.neutrons, target.expected_neutrons()),
        (CountField::Electrons, counts.electrons, target.expected_electrons()),
    ]
    .into_iter()
    .filter(|(_, found, expected)| found != expected)
    .map(|(field, found, expected)| CountDiff { field, found, expected })
    .collect()
}

/// Check a build. Pure: the same inputs always give the same verdict.
pub fn validate(
    target: &TargetElement,
    counts: ParticleCounts,
    electrons: &[Vec2],
    diagram: &ShellDiagram,
) -> Verdict {
    let diffs = count_diffs(target, counts);
    if !diffs.is_empty() {
        return Verdict::WrongCounts { diffs };
    }

    let observed = diagram.classify(electrons);
    let expected = expected_configuration(target.expected_electrons());

    (0..SHELL_COUNT)
        .find(|&i| observed[i] != expected[i])
        .map_or(Verdict::Correct, |i| Verdict::WrongShell {
            shell: i + 1,
            found: observed[i],
            expected: expected[i],
        })
}
