// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Fish reference catalogue
//
// Read-only list of known species. Supplies the guide price and best bait
// for new catches and backs the catalogue search.

use crate::fish::Rarity;
use crate::types::AppError;
use serde::{Deserialize, Serialize};

/// Catalogue written out on first run
const BUILTIN_CATALOGUE: &str = include_str!("../assets/fish_data.json");

/// One species in the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub name: String,
    pub rarity: Rarity,
    /// Typical weight range in kilograms, [min, max]
    pub weight_range: [f64; 2],
    pub best_bait: String,
    pub price_guide: f64,
}

impl SpeciesEntry {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        let [min, max] = self.weight_range;
        if self.name.trim().is_empty() {
            return Err(AppError::MalformedRecord(
                "fish reference entry without a name".to_string(),
            ));
        }
        if !(min >= 0.0 && min <= max) {
            return Err(AppError::MalformedRecord(format!(
                "{} has invalid weight range [{}, {}]",
                self.name, min, max
            )));
        }
        if self.price_guide.is_nan() || self.price_guide < 0.0 {
            return Err(AppError::MalformedRecord(format!(
                "{} has invalid price {}",
                self.name, self.price_guide
            )));
        }
        Ok(())
    }
}

/// Lookup of species by name
pub trait SpeciesLookup {
    /// Exact, case-insensitive name match
    fn find_by_name(&self, name: &str) -> Option<&SpeciesEntry>;
}

/// The fish reference document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FishReference {
    #[serde(rename = "рыбы", default)]
    species: Vec<SpeciesEntry>,
}

impl FishReference {
    /// The catalogue bundled with the crate
    pub fn builtin() -> Result<Self, AppError> {
        let document: serde_json::Value = serde_json::from_str(BUILTIN_CATALOGUE)?;
        Self::from_document(document)
    }

    /// Parse and validate a fish reference document
    pub fn from_document(document: serde_json::Value) -> Result<Self, AppError> {
        let reference: Self = serde_json::from_value(document)
            .map_err(|e| AppError::MalformedRecord(format!("fish reference: {}", e)))?;

        for entry in &reference.species {
            entry.validate()?;
        }

        Ok(reference)
    }

    pub fn to_document(&self) -> Result<serde_json::Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn species(&self) -> &[SpeciesEntry] {
        &self.species
    }

    /// Case-insensitive substring search; an empty term matches everything
    pub fn search(&self, term: &str) -> Vec<&SpeciesEntry> {
        let term = term.trim().to_lowercase();
        self.species
            .iter()
            .filter(|s| term.is_empty() || s.name.to_lowercase().contains(&term))
            .collect()
    }
}

impl SpeciesLookup for FishReference {
    fn find_by_name(&self, name: &str) -> Option<&SpeciesEntry> {
        let name = name.trim().to_lowercase();
        self.species.iter().find(|s| s.name.to_lowercase() == name)
    }
}
