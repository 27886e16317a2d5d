//! Target element catalog.
//!
//! The first twenty elements, embedded as JSON at compile time. Mass numbers
//! are the rounded mass of the most common isotope, which is what the
//! learner has to reproduce with neutrons.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::rng::Rng;
use crate::error::{Error, Result};

/// Embed the catalog JSON at compile time.
const ELEMENTS_JSON: &str = include_str!("../../data/elements.json");

/// An element the learner has to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetElement {
    pub atomic_number: u32,
    pub mass_number: u32,
    pub symbol: String,
    /// Display name shown in the UI.
    pub name: String,
}

impl TargetElement {
    pub fn expected_protons(&self) -> u32 {
        self.atomic_number
    }

    pub fn expected_neutrons(&self) -> u32 {
        self.mass_number.saturating_sub(self.atomic_number)
    }

    /// Neutral atom: one electron per proton.
    pub fn expected_electrons(&self) -> u32 {
        self.atomic_number
    }
}

/// Root structure for the JSON file.
#[derive(Debug, Deserialize)]
struct CatalogJson {
    elements: Vec<TargetElement>,
}

/// Fixed list of candidate targets with lookup by atomic number and symbol.
#[derive(Debug, Clone)]
pub struct ElementCatalog {
    elements: Vec<TargetElement>,
    by_symbol: HashMap<String, usize>,
}

impl ElementCatalog {
    /// Load the embedded catalog.
    pub fn load() -> Result<Self> {
        Self::from_json(ELEMENTS_JSON)
    }

    /// Parse and check a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: CatalogJson = serde_json::from_str(json)?;
        Self::from_elements(raw.elements)
    }

    pub fn from_elements(mut elements: Vec<TargetElement>) -> Result<Self> {
        if elements.is_empty() {
            return Err(Error::InvalidCatalog("no elements".to_string()));
        }
        for e in &elements {
            if e.atomic_number == 0 {
                return Err(Error::InvalidCatalog(format!("{} has atomic number 0", e.symbol)));
            }
            if e.mass_number < e.atomic_number {
                return Err(Error::InvalidCatalog(format!(
                    "{} has mass number {} below atomic number {}",
                    e.symbol, e.mass_number, e.atomic_number
                )));
            }
        }
        elements.sort_by_key(|e| e.atomic_number);

        let by_symbol = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.symbol.clone(), i))
            .collect();

        Ok(Self { elements, by_symbol })
    }

    /// Get element by atomic number.
    pub fn get(&self, atomic_number: u32) -> Option<&TargetElement> {
        self.elements.iter().find(|e| e.atomic_number == atomic_number)
    }

    /// Get element by symbol.
    pub fn get_by_symbol(&self, symbol: &str) -> Option<&TargetElement> {
        self.by_symbol.get(symbol).map(|&i| &self.elements[i])
    }

    /// Draw a target uniformly at random.
    pub fn pick(&self, rng: &mut Rng) -> &TargetElement {
        &self.elements[rng.next_int(self.elements.len() as u32) as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
