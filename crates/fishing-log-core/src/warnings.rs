// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Storage fill warnings

use crate::storage::Capacity;
use std::collections::HashMap;
use std::fmt;

/// Identifies a bucket for warning bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketId {
    Temporary(String),
    Permanent,
}

/// A storage crossed the fill threshold
#[derive(Debug, Clone, PartialEq)]
pub struct FillWarning {
    pub bucket: BucketId,
    pub fill_percentage: f64,
    pub weight_kg: f64,
    pub limit_kg: f64,
}

impl fmt::Display for FillWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bucket {
            BucketId::Temporary(name) => write!(f, "Storage '{}'", name)?,
            BucketId::Permanent => f.write_str("Permanent storage")?,
        }
        write!(
            f,
            " is {:.1}% full ({:.2}/{:.1} kg)",
            self.fill_percentage, self.weight_kg, self.limit_kg
        )
    }
}

/// Remembers the last fill percentage reported per bucket so a warning is
/// shown once per distinct value
#[derive(Debug)]
pub struct FillWarnings {
    threshold: f64,
    last_shown: HashMap<BucketId, f64>,
}

impl FillWarnings {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_shown: HashMap::new(),
        }
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Drop the history of a bucket that was deleted or renamed, so a new
    /// bucket under the same name starts fresh
    pub fn forget(&mut self, bucket: &BucketId) {
        self.last_shown.remove(bucket);
    }

    pub fn check(&mut self, bucket: BucketId, storage: &impl Capacity) -> Option<FillWarning> {
        let fill = storage.fill_percentage();
        if fill < self.threshold || self.last_shown.get(&bucket) == Some(&fill) {
            return None;
        }

        self.last_shown.insert(bucket.clone(), fill);
        Some(FillWarning {
            bucket,
            fill_percentage: fill,
            weight_kg: storage.total_weight_kg(),
            limit_kg: storage.limit_kg(),
        })
    }
}
