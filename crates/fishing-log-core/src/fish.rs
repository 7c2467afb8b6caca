// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Catch records
//
// A Fish is one logged specimen. Weights are grams; storage limits are kilograms.

use crate::types::AppError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grams per kilogram
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Rarity tier of a catch, ordered from least to most valuable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Trophy,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Trophy,
    ];

    /// Serialized key
    pub fn key(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Trophy => "trophy",
        }
    }

    /// Label shown to the user (the in-game line color)
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Common => "Серая",
            Self::Uncommon => "Синяя",
            Self::Rare => "Красная",
            Self::Trophy => "Зеленая",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Rarity {
    type Err = AppError;

    /// Accepts either the key or the display label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.key() == needle || r.display_label().to_lowercase() == needle)
            .ok_or_else(|| AppError::Validation(format!("Unknown rarity: {}", s.trim())))
    }
}

/// Which kind of storage currently holds a catch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Temporary,
    Permanent,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temporary => f.write_str("temporary"),
            Self::Permanent => f.write_str("permanent"),
        }
    }
}

/// One caught fish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub rarity_display: String,
    /// Weight in grams
    pub weight: f64,
    pub timestamp: NaiveDateTime,
    pub price_guide: f64,
    pub best_bait: String,
    pub storage: StorageKind,
}

impl Fish {
    /// Create a new temporary-storage catch stamped with the local time
    pub fn new(
        name: impl Into<String>,
        rarity: Rarity,
        weight: f64,
        price_guide: f64,
        best_bait: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            rarity,
            rarity_display: rarity.display_label().to_string(),
            weight,
            timestamp: chrono::Local::now().naive_local(),
            price_guide,
            best_bait: best_bait.into(),
            storage: StorageKind::Temporary,
        }
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight / GRAMS_PER_KG
    }

    /// Check the per-record invariants of a loaded catch
    pub(crate) fn validate(&self, expected: StorageKind) -> Result<(), AppError> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(AppError::MalformedRecord(format!(
                "fish {} has non-positive weight {}",
                self.id, self.weight
            )));
        }
        if self.price_guide.is_nan() || self.price_guide < 0.0 {
            return Err(AppError::MalformedRecord(format!(
                "fish {} has invalid price {}",
                self.id, self.price_guide
            )));
        }
        if self.rarity_display != self.rarity.display_label() {
            return Err(AppError::MalformedRecord(format!(
                "fish {} is {} but labelled '{}'",
                self.id, self.rarity, self.rarity_display
            )));
        }
        if self.storage != expected {
            return Err(AppError::MalformedRecord(format!(
                "fish {} is tagged {} but stored in {} storage",
                self.id, self.storage, expected
            )));
        }
        Ok(())
    }
}

/// Parse a user-entered weight in grams; must be a positive number
pub fn parse_weight(input: &str) -> Result<f64, AppError> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
        .ok_or_else(|| AppError::Validation("Enter a valid weight".to_string()))
}

/// Display order: rarest first, heaviest first within a tier.
/// The stored order is left untouched.
pub fn sorted_for_display(fishes: &[Fish]) -> Vec<&Fish> {
    let mut sorted: Vec<&Fish> = fishes.iter().collect();
    sorted.sort_by(|a, b| {
        b.rarity
            .cmp(&a.rarity)
            .then_with(|| b.weight.total_cmp(&a.weight))
    });
    sorted
}
