// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Catch statistics

use crate::app_data::AppData;
use crate::fish::{Fish, Rarity};

/// How many species the top list holds
pub const TOP_SPECIES: usize = 5;

/// Aggregates over every catch in every storage
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    pub total: usize,
    /// Most frequently caught species and its count
    pub most_common: Option<(String, usize)>,
    /// Heaviest single catch
    pub heaviest: Option<Fish>,
    /// Count per rarity tier, common first; tiers with no catches are omitted
    pub rarity_distribution: Vec<(Rarity, usize)>,
    /// Up to five most frequently caught species
    pub top_species: Vec<(String, usize)>,
}

impl Statistics {
    pub fn compute(data: &AppData) -> Self {
        let fishes: Vec<&Fish> = data.all_fishes().collect();
        if fishes.is_empty() {
            return Self::default();
        }

        // Counts in first-seen order so ties favor the earlier species
        let mut by_name: Vec<(String, usize)> = Vec::new();
        for fish in &fishes {
            match by_name.iter_mut().find(|(name, _)| *name == fish.name) {
                Some((_, count)) => *count += 1,
                None => by_name.push((fish.name.clone(), 1)),
            }
        }
        by_name.sort_by(|a, b| b.1.cmp(&a.1));

        let heaviest = fishes
            .iter()
            .copied()
            .reduce(|best, f| if f.weight > best.weight { f } else { best })
            .cloned();

        let rarity_distribution = Rarity::ALL
            .into_iter()
            .map(|r| (r, fishes.iter().filter(|f| f.rarity == r).count()))
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            total: fishes.len(),
            most_common: by_name.first().cloned(),
            heaviest,
            rarity_distribution,
            top_species: by_name.into_iter().take(TOP_SPECIES).collect(),
        }
    }
}
