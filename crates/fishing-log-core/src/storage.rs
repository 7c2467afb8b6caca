// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Storage buckets
//
// Temporary storages are named and user-managed; the permanent storage is a
// single sink. Both share the weight-capacity metrics below.

use crate::fish::{Fish, GRAMS_PER_KG};
use serde::{Deserialize, Serialize};

/// Default limit of a new temporary storage, in kilograms
pub const DEFAULT_STORAGE_LIMIT_KG: f64 = 50.0;

/// Default limit of the permanent storage, in kilograms
pub const DEFAULT_PERMANENT_LIMIT_KG: f64 = 100.0;

/// Name of the storage created on first run
pub const DEFAULT_STORAGE_NAME: &str = "Основное хранилище";

/// Weight-capacity metrics shared by every bucket
pub trait Capacity {
    /// Capacity limit in kilograms
    fn limit_kg(&self) -> f64;

    /// Catches currently held
    fn fishes(&self) -> &[Fish];

    /// Folds from +0.0 so an empty bucket never reports -0.0
    fn total_weight_grams(&self) -> f64 {
        self.fishes().iter().fold(0.0, |acc, f| acc + f.weight)
    }

    fn total_weight_kg(&self) -> f64 {
        self.total_weight_grams() / GRAMS_PER_KG
    }

    /// Percentage of the limit in use; 0 for a zero limit
    fn fill_percentage(&self) -> f64 {
        let limit = self.limit_kg();
        if limit == 0.0 {
            return 0.0;
        }
        self.total_weight_kg() / limit * 100.0
    }

    /// Remaining room in kilograms, never negative
    fn available_kg(&self) -> f64 {
        (self.limit_kg() - self.total_weight_kg()).max(0.0)
    }

    /// Whether `extra_grams` more would still fit under the limit.
    /// Compared in grams, where catch weights are exact.
    fn can_accept_grams(&self, extra_grams: f64) -> bool {
        self.total_weight_grams() + extra_grams <= self.limit_kg() * GRAMS_PER_KG
    }

    fn count(&self) -> usize {
        self.fishes().len()
    }

    fn is_empty(&self) -> bool {
        self.fishes().is_empty()
    }
}

/// A named temporary storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryStorage {
    pub(crate) name: String,
    /// Limit in kilograms
    pub(crate) limit: f64,
    #[serde(default)]
    pub(crate) fishes: Vec<Fish>,
}

impl TemporaryStorage {
    pub fn new(name: impl Into<String>, limit: f64) -> Self {
        Self {
            name: name.into(),
            limit,
            fishes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Capacity for TemporaryStorage {
    fn limit_kg(&self) -> f64 {
        self.limit
    }

    fn fishes(&self) -> &[Fish] {
        &self.fishes
    }
}

/// The single permanent storage
#[derive(Debug, Clone, PartialEq)]
pub struct PermanentStorage {
    pub(crate) limit: f64,
    pub(crate) fishes: Vec<Fish>,
}

impl PermanentStorage {
    pub fn new(limit: f64) -> Self {
        Self {
            limit,
            fishes: Vec::new(),
        }
    }

    /// Sum of guide prices of everything held
    pub fn total_value(&self) -> f64 {
        self.fishes.iter().fold(0.0, |acc, f| acc + f.price_guide)
    }
}

impl Default for PermanentStorage {
    fn default() -> Self {
        Self::new(DEFAULT_PERMANENT_LIMIT_KG)
    }
}

impl Capacity for PermanentStorage {
    fn limit_kg(&self) -> f64 {
        self.limit
    }

    fn fishes(&self) -> &[Fish] {
        &self.fishes
    }
}
