// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Application state
//
// AppData owns every storage and the current-storage reference. Every
// operation checks all of its preconditions before touching any field, so a
// returned error always means nothing changed. No I/O happens here; see
// StorageManager for persistence.

use crate::fish::{Fish, Rarity, StorageKind, GRAMS_PER_KG};
use crate::reference::SpeciesLookup;
use crate::storage::{
    Capacity, PermanentStorage, TemporaryStorage, DEFAULT_PERMANENT_LIMIT_KG,
    DEFAULT_STORAGE_LIMIT_KG, DEFAULT_STORAGE_NAME,
};
use crate::types::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Guide price used when a species is missing from the catalogue
pub const FALLBACK_PRICE_GUIDE: f64 = 50.0;

/// Bait text used when a species is missing from the catalogue
pub const FALLBACK_BAIT: &str = "Неизвестно";

/// Shape of the persisted app-state document
#[derive(Serialize, Deserialize)]
struct SavedData {
    #[serde(default)]
    temporary_storages: Vec<TemporaryStorage>,
    #[serde(default)]
    permanent_storage: Vec<Fish>,
    #[serde(default)]
    current_storage_name: String,
    #[serde(default = "default_permanent_limit")]
    permanent_storage_limit: f64,
}

fn default_permanent_limit() -> f64 {
    DEFAULT_PERMANENT_LIMIT_KG
}

/// Snapshot of a temporary storage after a lifecycle operation
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSummary {
    pub name: String,
    pub limit_kg: f64,
    pub weight_kg: f64,
    pub fish_count: usize,
}

impl StorageSummary {
    fn of(storage: &TemporaryStorage) -> Self {
        Self {
            name: storage.name.clone(),
            limit_kg: storage.limit,
            weight_kg: storage.total_weight_kg(),
            fish_count: storage.count(),
        }
    }
}

/// What deleting the current storage discards
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePreview {
    pub name: String,
    pub fish_count: usize,
    pub weight_kg: f64,
}

/// What a transfer to the permanent storage moves
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSummary {
    pub from: String,
    pub count: usize,
    pub weight_kg: f64,
    /// Free room in the permanent storage before the transfer
    pub available_kg: f64,
}

/// What selling the permanent storage removes
#[derive(Debug, Clone, PartialEq)]
pub struct SaleSummary {
    pub count: usize,
    pub weight_kg: f64,
    pub total_value: f64,
}

/// Main application data
#[derive(Debug, Clone, PartialEq)]
pub struct AppData {
    temporary_storages: Vec<TemporaryStorage>,
    permanent: PermanentStorage,
    current_storage_name: String,
}

impl Default for AppData {
    /// One empty default storage and an empty permanent storage
    fn default() -> Self {
        Self {
            temporary_storages: vec![TemporaryStorage::new(
                DEFAULT_STORAGE_NAME,
                DEFAULT_STORAGE_LIMIT_KG,
            )],
            permanent: PermanentStorage::default(),
            current_storage_name: DEFAULT_STORAGE_NAME.to_string(),
        }
    }
}

impl AppData {
    // ---- read view ----

    pub fn temporary_storages(&self) -> &[TemporaryStorage] {
        &self.temporary_storages
    }

    pub fn permanent(&self) -> &PermanentStorage {
        &self.permanent
    }

    pub fn current_storage_name(&self) -> &str {
        &self.current_storage_name
    }

    pub fn storage(&self, name: &str) -> Option<&TemporaryStorage> {
        self.temporary_storages.iter().find(|s| s.name == name)
    }

    /// The current storage, falling back to the first one if the name is stale
    pub fn current_storage(&self) -> Option<&TemporaryStorage> {
        self.current_index().map(|i| &self.temporary_storages[i])
    }

    /// Every catch across all storages, temporary ones first
    pub fn all_fishes(&self) -> impl Iterator<Item = &Fish> {
        self.temporary_storages
            .iter()
            .flat_map(|s| s.fishes.iter())
            .chain(self.permanent.fishes.iter())
    }

    fn current_index(&self) -> Option<usize> {
        if self.temporary_storages.is_empty() {
            return None;
        }
        Some(
            self.temporary_storages
                .iter()
                .position(|s| s.name == self.current_storage_name)
                .unwrap_or(0),
        )
    }

    fn current_mut(&mut self) -> Result<&mut TemporaryStorage, AppError> {
        let index = self.current_index().ok_or(AppError::NoActiveStorage)?;
        Ok(&mut self.temporary_storages[index])
    }

    /// Re-point a dangling current reference at the first storage.
    /// Returns true when the reference changed.
    pub(crate) fn heal_current(&mut self) -> bool {
        match self.current_index() {
            Some(index) if self.temporary_storages[index].name != self.current_storage_name => {
                let name = self.temporary_storages[index].name.clone();
                tracing::warn!(
                    "Current storage '{}' not found, falling back to '{}'",
                    self.current_storage_name,
                    name
                );
                self.current_storage_name = name;
                true
            }
            _ => false,
        }
    }

    fn name_taken(&self, name: &str) -> bool {
        self.temporary_storages.iter().any(|s| s.name == name)
    }

    // ---- catches ----

    /// Log a new catch into the current storage
    pub fn log_catch(
        &mut self,
        name: &str,
        rarity: Option<Rarity>,
        weight_grams: f64,
        catalogue: &impl SpeciesLookup,
    ) -> Result<Fish, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Enter a fish name".to_string()));
        }
        if !weight_grams.is_finite() || weight_grams <= 0.0 {
            return Err(AppError::Validation("Enter a valid weight".to_string()));
        }

        let (price_guide, best_bait) = match catalogue.find_by_name(name) {
            Some(entry) => (entry.price_guide, entry.best_bait.clone()),
            None => (FALLBACK_PRICE_GUIDE, FALLBACK_BAIT.to_string()),
        };

        let storage = self.current_mut()?;
        if !storage.can_accept_grams(weight_grams) {
            return Err(AppError::CapacityExceeded {
                available_kg: storage.available_kg(),
                requested_kg: weight_grams / GRAMS_PER_KG,
            });
        }

        let fish = Fish::new(
            name,
            rarity.unwrap_or_default(),
            weight_grams,
            price_guide,
            best_bait,
        );
        storage.fishes.push(fish.clone());
        Ok(fish)
    }

    /// Remove one catch from the current storage
    pub fn delete_fish(&mut self, id: &str) -> Result<Fish, AppError> {
        let storage = self.current_mut()?;
        let index = storage
            .fishes
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| AppError::FishNotFound(id.to_string()))?;
        Ok(storage.fishes.remove(index))
    }

    // ---- storage lifecycle ----

    /// Add a storage and make it current. A missing or non-positive limit
    /// falls back to the default.
    pub fn create_storage(
        &mut self,
        name: &str,
        limit_kg: Option<f64>,
    ) -> Result<StorageSummary, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Enter a storage name".to_string()));
        }
        if self.name_taken(name) {
            return Err(AppError::DuplicateStorageName(name.to_string()));
        }

        let limit = limit_kg
            .filter(|l| l.is_finite() && *l > 0.0)
            .unwrap_or(DEFAULT_STORAGE_LIMIT_KG);
        let storage = TemporaryStorage::new(name, limit);
        let summary = StorageSummary::of(&storage);

        self.temporary_storages.push(storage);
        self.current_storage_name = name.to_string();
        Ok(summary)
    }

    /// Rename and/or re-limit the current storage. A blank or unchanged name
    /// leaves the name as is; a missing limit keeps the current one.
    pub fn edit_storage(
        &mut self,
        new_name: Option<&str>,
        new_limit_kg: Option<f64>,
    ) -> Result<StorageSummary, AppError> {
        let index = self.current_index().ok_or(AppError::NoActiveStorage)?;
        let storage = &self.temporary_storages[index];

        // An unchanged limit is never re-checked, so over-full loaded
        // storages can still be renamed
        let limit = match new_limit_kg {
            Some(limit) => {
                check_new_limit(limit, storage)?;
                limit
            }
            None => storage.limit,
        };

        let rename = new_name
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != storage.name);
        if let Some(name) = rename {
            if self.name_taken(name) {
                return Err(AppError::DuplicateStorageName(name.to_string()));
            }
        }

        let storage = &mut self.temporary_storages[index];
        if let Some(name) = rename {
            storage.name = name.to_string();
        }
        storage.limit = limit;
        self.current_storage_name = storage.name.clone();
        Ok(StorageSummary::of(storage))
    }

    /// Check whether the current storage may be deleted and report what
    /// would be lost
    pub fn preview_delete_storage(&self) -> Result<DeletePreview, AppError> {
        let storage = self.current_storage().ok_or(AppError::NoActiveStorage)?;
        if self.temporary_storages.len() <= 1 {
            return Err(AppError::LastStorage);
        }
        Ok(DeletePreview {
            name: storage.name.clone(),
            fish_count: storage.count(),
            weight_kg: storage.total_weight_kg(),
        })
    }

    /// Delete the current storage, discarding its catches
    pub fn delete_storage(&mut self) -> Result<DeletePreview, AppError> {
        let preview = self.preview_delete_storage()?;
        self.temporary_storages.retain(|s| s.name != preview.name);
        self.current_storage_name = self.temporary_storages[0].name.clone();
        Ok(preview)
    }

    pub fn switch_storage(&mut self, name: &str) -> Result<StorageSummary, AppError> {
        let storage = self
            .storage(name)
            .ok_or_else(|| AppError::StorageNotFound(name.to_string()))?;
        let summary = StorageSummary::of(storage);
        self.current_storage_name = summary.name.clone();
        Ok(summary)
    }

    // ---- permanent storage ----

    /// Check whether the current storage fits into the permanent storage
    pub fn preview_transfer(&self) -> Result<TransferSummary, AppError> {
        let storage = self.current_storage().ok_or(AppError::NoActiveStorage)?;
        if storage.is_empty() {
            return Err(AppError::NothingToTransfer);
        }

        let weight_kg = storage.total_weight_kg();
        let available_kg = self.permanent.available_kg();
        if !self.permanent.can_accept_grams(storage.total_weight_grams()) {
            return Err(AppError::CapacityExceeded {
                available_kg,
                requested_kg: weight_kg,
            });
        }

        Ok(TransferSummary {
            from: storage.name.clone(),
            count: storage.count(),
            weight_kg,
            available_kg,
        })
    }

    /// Move every catch of the current storage into the permanent storage.
    /// All or nothing.
    pub fn transfer_to_permanent(&mut self) -> Result<TransferSummary, AppError> {
        let summary = self.preview_transfer()?;
        let storage = self.current_mut()?;
        let mut moved = std::mem::take(&mut storage.fishes);
        for fish in &mut moved {
            fish.storage = StorageKind::Permanent;
        }
        self.permanent.fishes.append(&mut moved);
        Ok(summary)
    }

    pub fn set_permanent_limit(&mut self, limit_kg: f64) -> Result<f64, AppError> {
        check_new_limit(limit_kg, &self.permanent)?;
        self.permanent.limit = limit_kg;
        Ok(limit_kg)
    }

    pub fn preview_sale(&self) -> Result<SaleSummary, AppError> {
        if self.permanent.is_empty() {
            return Err(AppError::NothingToSell);
        }
        Ok(SaleSummary {
            count: self.permanent.count(),
            weight_kg: self.permanent.total_weight_kg(),
            total_value: self.permanent.total_value(),
        })
    }

    /// Empty the permanent storage in one step
    pub fn sell_all(&mut self) -> Result<SaleSummary, AppError> {
        let summary = self.preview_sale()?;
        self.permanent.fishes.clear();
        Ok(summary)
    }

    // ---- documents ----

    /// Serialize to the persisted app-state document
    pub fn to_document(&self) -> Result<serde_json::Value, AppError> {
        let saved = SavedData {
            temporary_storages: self.temporary_storages.clone(),
            permanent_storage: self.permanent.fishes.clone(),
            current_storage_name: self.current_storage_name.clone(),
            permanent_storage_limit: self.permanent.limit,
        };
        Ok(serde_json::to_value(saved)?)
    }

    /// Parse and validate a persisted app-state document
    pub fn from_document(document: serde_json::Value) -> Result<Self, AppError> {
        let saved: SavedData = serde_json::from_value(document)
            .map_err(|e| AppError::MalformedRecord(format!("app state: {}", e)))?;

        check_limit("permanent storage", saved.permanent_storage_limit)?;
        for fish in &saved.permanent_storage {
            fish.validate(StorageKind::Permanent)?;
        }

        let mut names = HashSet::new();
        for storage in &saved.temporary_storages {
            if !names.insert(storage.name.as_str()) {
                return Err(AppError::MalformedRecord(format!(
                    "duplicate storage name '{}'",
                    storage.name
                )));
            }
            check_limit(&storage.name, storage.limit)?;
            for fish in &storage.fishes {
                fish.validate(StorageKind::Temporary)?;
            }
        }

        let mut data = Self {
            temporary_storages: saved.temporary_storages,
            permanent: PermanentStorage {
                limit: saved.permanent_storage_limit,
                fishes: saved.permanent_storage,
            },
            current_storage_name: saved.current_storage_name,
        };

        if data.temporary_storages.is_empty() {
            tracing::warn!("Saved state has no temporary storage, adding the default one");
            data.temporary_storages.push(TemporaryStorage::new(
                DEFAULT_STORAGE_NAME,
                DEFAULT_STORAGE_LIMIT_KG,
            ));
            data.current_storage_name = DEFAULT_STORAGE_NAME.to_string();
        }

        for storage in &data.temporary_storages {
            if storage.total_weight_kg() > storage.limit {
                tracing::warn!(
                    "Storage '{}' holds {:.2} kg over its {:.1} kg limit",
                    storage.name,
                    storage.total_weight_kg(),
                    storage.limit
                );
            }
        }
        if data.permanent.total_weight_kg() > data.permanent.limit {
            tracing::warn!(
                "Permanent storage holds {:.2} kg over its {:.1} kg limit",
                data.permanent.total_weight_kg(),
                data.permanent.limit
            );
        }

        Ok(data)
    }
}

/// A limit must be positive and must not shrink below the contents
fn check_new_limit(limit_kg: f64, storage: &impl Capacity) -> Result<(), AppError> {
    if !limit_kg.is_finite() || limit_kg <= 0.0 {
        return Err(AppError::Validation(
            "Limit must be greater than 0".to_string(),
        ));
    }
    if limit_kg * GRAMS_PER_KG < storage.total_weight_grams() {
        return Err(AppError::LimitBelowContents {
            limit_kg,
            current_kg: storage.total_weight_kg(),
        });
    }
    Ok(())
}

fn check_limit(owner: &str, limit: f64) -> Result<(), AppError> {
    if limit.is_finite() && limit > 0.0 {
        Ok(())
    } else {
        Err(AppError::MalformedRecord(format!(
            "{} has invalid limit {}",
            owner, limit
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::FishReference;

    fn catalogue() -> FishReference {
        FishReference::builtin().unwrap()
    }

    /// Default state with the current storage already holding `grams`
    fn data_with(grams: &[f64]) -> AppData {
        let mut data = AppData::default();
        for &g in grams {
            data.log_catch("Лещ", None, g, &catalogue()).unwrap();
        }
        data
    }

    #[test]
    fn test_default_state() {
        let data = AppData::default();
        assert_eq!(data.temporary_storages().len(), 1);
        let current = data.current_storage().unwrap();
        assert_eq!(current.name(), "Основное хранилище");
        assert_eq!(current.limit_kg(), 50.0);
        assert!(current.is_empty());
        assert!(data.permanent().is_empty());
        assert_eq!(data.permanent().limit_kg(), 100.0);
        assert_eq!(data.current_storage_name(), "Основное хранилище");
    }

    #[test]
    fn test_log_catch_uses_catalogue() {
        let mut data = AppData::default();
        let fish = data
            .log_catch("  жерех ", Some(Rarity::Uncommon), 1200.0, &catalogue())
            .unwrap();
        assert_eq!(fish.name, "жерех");
        assert_eq!(fish.price_guide, 400.0);
        assert_eq!(fish.best_bait, "Колеблющаяся блесна / Креветки");
        assert_eq!(fish.storage, StorageKind::Temporary);
        assert_eq!(data.current_storage().unwrap().count(), 1);
    }

    #[test]
    fn test_log_catch_unknown_species_falls_back() {
        let mut data = AppData::default();
        let fish = data
            .log_catch("Неведомая рыба", None, 500.0, &catalogue())
            .unwrap();
        assert_eq!(fish.price_guide, FALLBACK_PRICE_GUIDE);
        assert_eq!(fish.best_bait, FALLBACK_BAIT);
        assert_eq!(fish.rarity, Rarity::Common);
    }

    #[test]
    fn test_log_catch_validation() {
        let mut data = AppData::default();
        assert!(matches!(
            data.log_catch("   ", None, 500.0, &catalogue()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            data.log_catch("Лещ", None, 0.0, &catalogue()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            data.log_catch("Лещ", None, f64::NAN, &catalogue()),
            Err(AppError::Validation(_))
        ));
        assert_eq!(data, AppData::default());
    }

    #[test]
    fn test_log_catch_over_capacity_is_rejected() {
        let mut data = data_with(&[15_000.0]);
        let before = data.clone();
        let err = data
            .log_catch("Сом обыкновенный", None, 40_000.0, &catalogue())
            .unwrap_err();
        match err {
            AppError::CapacityExceeded {
                available_kg,
                requested_kg,
            } => {
                assert_eq!(available_kg, 35.0);
                assert_eq!(requested_kg, 40.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(data, before);
    }

    #[test]
    fn test_log_catch_exactly_fills_storage() {
        let mut data = data_with(&[15_000.0]);
        data.log_catch("Сом обыкновенный", None, 35_000.0, &catalogue())
            .unwrap();
        assert_eq!(data.current_storage().unwrap().available_kg(), 0.0);
    }

    #[test]
    fn test_create_storage_becomes_current() {
        let mut data = AppData::default();
        let summary = data.create_storage(" Lake ", Some(10.0)).unwrap();
        assert_eq!(summary.name, "Lake");
        assert_eq!(summary.limit_kg, 10.0);
        assert_eq!(data.current_storage_name(), "Lake");
        assert_eq!(data.temporary_storages().len(), 2);
    }

    #[test]
    fn test_create_storage_limit_falls_back_to_default() {
        let mut data = AppData::default();
        assert_eq!(data.create_storage("a", None).unwrap().limit_kg, 50.0);
        assert_eq!(data.create_storage("b", Some(-4.0)).unwrap().limit_kg, 50.0);
        assert_eq!(data.create_storage("c", Some(0.0)).unwrap().limit_kg, 50.0);
    }

    #[test]
    fn test_create_storage_rejects_blank_and_duplicate() {
        let mut data = AppData::default();
        assert!(matches!(
            data.create_storage("  ", Some(10.0)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            data.create_storage("Основное хранилище", Some(10.0)),
            Err(AppError::DuplicateStorageName(_))
        ));
        assert_eq!(data.temporary_storages().len(), 1);
    }

    #[test]
    fn test_edit_storage_rename_and_relimit() {
        let mut data = data_with(&[5_000.0]);
        let summary = data.edit_storage(Some("River"), Some(20.0)).unwrap();
        assert_eq!(summary.name, "River");
        assert_eq!(summary.limit_kg, 20.0);
        assert_eq!(data.current_storage_name(), "River");
        assert_eq!(data.current_storage().unwrap().count(), 1);
    }

    #[test]
    fn test_edit_storage_keeps_limit_and_ignores_blank_name() {
        let mut data = AppData::default();
        let summary = data.edit_storage(Some("   "), None).unwrap();
        assert_eq!(summary.name, "Основное хранилище");
        assert_eq!(summary.limit_kg, 50.0);
    }

    #[test]
    fn test_edit_storage_cannot_shrink_below_contents() {
        let mut data = data_with(&[15_000.0]);
        let before = data.clone();
        assert!(matches!(
            data.edit_storage(Some("River"), Some(10.0)),
            Err(AppError::LimitBelowContents { .. })
        ));
        assert!(matches!(
            data.edit_storage(None, Some(0.0)),
            Err(AppError::Validation(_))
        ));
        assert_eq!(data, before);
        // shrinking to exactly the contents is allowed
        assert_eq!(data.edit_storage(None, Some(15.0)).unwrap().limit_kg, 15.0);
    }

    #[test]
    fn test_over_full_loaded_storage_can_be_renamed() {
        let mut document = data_with(&[20_000.0]).to_document().unwrap();
        document["temporary_storages"][0]["limit"] = serde_json::json!(10.0);
        let mut data = AppData::from_document(document).unwrap();

        let summary = data.edit_storage(Some("River"), None).unwrap();
        assert_eq!(summary.name, "River");
        assert_eq!(summary.limit_kg, 10.0);
        assert!(matches!(
            data.edit_storage(None, Some(15.0)),
            Err(AppError::LimitBelowContents { .. })
        ));
    }

    #[test]
    fn test_fractional_limit_fills_exactly() {
        let mut data = AppData::default();
        data.create_storage("Cup", Some(0.3)).unwrap();
        data.log_catch("Уклейка", None, 100.0, &catalogue()).unwrap();
        data.log_catch("Уклейка", None, 200.0, &catalogue()).unwrap();
        assert!(matches!(
            data.log_catch("Уклейка", None, 1.0, &catalogue()),
            Err(AppError::CapacityExceeded { .. })
        ));
        assert_eq!(data.current_storage().unwrap().count(), 2);
    }

    #[test]
    fn test_edit_storage_rejects_name_collision() {
        let mut data = AppData::default();
        data.create_storage("Lake", None).unwrap();
        assert!(matches!(
            data.edit_storage(Some("Основное хранилище"), None),
            Err(AppError::DuplicateStorageName(_))
        ));
        assert_eq!(data.current_storage_name(), "Lake");
    }

    #[test]
    fn test_cannot_delete_last_storage() {
        let mut data = data_with(&[1_000.0]);
        let before = data.clone();
        assert!(matches!(data.delete_storage(), Err(AppError::LastStorage)));
        assert_eq!(data, before);
    }

    #[test]
    fn test_delete_storage_discards_catches_and_repoints() {
        let mut data = AppData::default();
        data.create_storage("Lake", Some(10.0)).unwrap();
        data.log_catch("Лещ", None, 5_000.0, &catalogue()).unwrap();

        let preview = data.preview_delete_storage().unwrap();
        assert_eq!(preview.fish_count, 1);
        assert_eq!(preview.weight_kg, 5.0);

        let deleted = data.delete_storage().unwrap();
        assert_eq!(deleted.name, "Lake");
        assert_eq!(data.temporary_storages().len(), 1);
        assert_eq!(data.current_storage_name(), "Основное хранилище");
        assert_eq!(data.all_fishes().count(), 0);
    }

    #[test]
    fn test_storage_count_never_drops_to_zero() {
        let mut data = AppData::default();
        data.create_storage("a", None).unwrap();
        data.create_storage("b", None).unwrap();
        for _ in 0..5 {
            let _ = data.delete_storage();
        }
        assert_eq!(data.temporary_storages().len(), 1);
    }

    #[test]
    fn test_switch_storage() {
        let mut data = AppData::default();
        data.create_storage("Lake", None).unwrap();
        data.switch_storage("Основное хранилище").unwrap();
        assert_eq!(data.current_storage_name(), "Основное хранилище");
        assert!(matches!(
            data.switch_storage("Sea"),
            Err(AppError::StorageNotFound(_))
        ));
    }

    #[test]
    fn test_delete_fish() {
        let mut data = data_with(&[1_000.0, 2_000.0]);
        let id = data.current_storage().unwrap().fishes()[0].id.clone();
        let removed = data.delete_fish(&id).unwrap();
        assert_eq!(removed.weight, 1_000.0);
        assert_eq!(data.current_storage().unwrap().count(), 1);
        assert!(matches!(
            data.delete_fish(&id),
            Err(AppError::FishNotFound(_))
        ));
    }

    #[test]
    fn test_transfer_moves_everything() {
        let mut data = data_with(&[10_000.0, 20_000.0]);
        let summary = data.transfer_to_permanent().unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.weight_kg, 30.0);
        assert_eq!(summary.available_kg, 100.0);
        assert!(data.current_storage().unwrap().is_empty());
        assert_eq!(data.permanent().count(), 2);
        assert!(data
            .permanent()
            .fishes()
            .iter()
            .all(|f| f.storage == StorageKind::Permanent));
    }

    #[test]
    fn test_transfer_empty_storage_is_rejected() {
        let mut data = AppData::default();
        assert!(matches!(
            data.transfer_to_permanent(),
            Err(AppError::NothingToTransfer)
        ));
    }

    #[test]
    fn test_transfer_over_capacity_is_all_or_nothing() {
        let mut data = AppData::default();
        data.create_storage("Sea", Some(100.0)).unwrap();
        data.log_catch("Тунец", Some(Rarity::Rare), 80_000.0, &catalogue())
            .unwrap();
        data.transfer_to_permanent().unwrap();

        data.switch_storage("Основное хранилище").unwrap();
        data.log_catch("Сазан", None, 12_000.0, &catalogue()).unwrap();
        data.log_catch("Сом обыкновенный", None, 18_000.0, &catalogue())
            .unwrap();
        let before = data.clone();

        match data.transfer_to_permanent().unwrap_err() {
            AppError::CapacityExceeded {
                available_kg,
                requested_kg,
            } => {
                assert_eq!(available_kg, 20.0);
                assert_eq!(requested_kg, 30.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(data, before);
    }

    #[test]
    fn test_set_permanent_limit() {
        let mut data = data_with(&[30_000.0]);
        data.transfer_to_permanent().unwrap();
        assert!(matches!(
            data.set_permanent_limit(20.0),
            Err(AppError::LimitBelowContents { .. })
        ));
        assert!(matches!(
            data.set_permanent_limit(-1.0),
            Err(AppError::Validation(_))
        ));
        assert_eq!(data.set_permanent_limit(30.0).unwrap(), 30.0);
        assert_eq!(data.permanent().limit_kg(), 30.0);
    }

    #[test]
    fn test_sell_all() {
        let mut data = AppData::default();
        assert!(matches!(data.sell_all(), Err(AppError::NothingToSell)));

        for name in ["Лещ", "Краснопёрка", "Неведомая рыба"] {
            data.log_catch(name, None, 1_000.0, &catalogue()).unwrap();
        }
        data.transfer_to_permanent().unwrap();
        let sale = data.sell_all().unwrap();
        assert_eq!(sale.count, 3);
        assert_eq!(sale.weight_kg, 3.0);
        // 70 + 50 + fallback 50
        assert_eq!(sale.total_value, 170.0);
        assert!(data.permanent().is_empty());
    }

    #[test]
    fn test_document_round_trip() {
        let mut data = AppData::default();
        data.log_catch("Лещ", Some(Rarity::Rare), 900.0, &catalogue())
            .unwrap();
        data.transfer_to_permanent().unwrap();
        data.create_storage("Lake", Some(12.5)).unwrap();
        data.log_catch("Плотва", None, 300.0, &catalogue()).unwrap();
        data.set_permanent_limit(150.0).unwrap();

        let document = data.to_document().unwrap();
        assert_eq!(document["current_storage_name"], "Lake");
        assert_eq!(document["permanent_storage_limit"], 150.0);
        let restored = AppData::from_document(document).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_document_defaults_for_missing_fields() {
        let document = serde_json::json!({
            "temporary_storages": [{ "name": "Озеро", "limit": 20 }]
        });
        let data = AppData::from_document(document).unwrap();
        assert_eq!(data.permanent().limit_kg(), 100.0);
        assert_eq!(data.current_storage_name(), "");
        assert_eq!(data.current_storage().unwrap().name(), "Озеро");
        assert!(data.current_storage().unwrap().is_empty());
    }

    #[test]
    fn test_document_without_storages_gets_default() {
        let data = AppData::from_document(serde_json::json!({})).unwrap();
        assert_eq!(data, AppData::default());
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let mut data = data_with(&[1_000.0]);
        let mut document = data.to_document().unwrap();
        document["temporary_storages"][0]["fishes"][0]["weight"] = serde_json::json!(-5.0);
        assert!(matches!(
            AppData::from_document(document),
            Err(AppError::MalformedRecord(_))
        ));

        let mut document = data.to_document().unwrap();
        document["temporary_storages"][0]["fishes"][0]["storage"] = serde_json::json!("permanent");
        assert!(matches!(
            AppData::from_document(document),
            Err(AppError::MalformedRecord(_))
        ));

        let mut document = data.to_document().unwrap();
        document["temporary_storages"][0]["fishes"][0]["rarity"] = serde_json::json!("legendary");
        assert!(matches!(
            AppData::from_document(document),
            Err(AppError::MalformedRecord(_))
        ));

        let mut document = data.to_document().unwrap();
        document["temporary_storages"][0]["fishes"][0]["rarity_display"] = serde_json::json!("Зеленая");
        assert!(matches!(
            AppData::from_document(document),
            Err(AppError::MalformedRecord(_))
        ));

        data.create_storage("Lake", None).unwrap();
        let mut document = data.to_document().unwrap();
        document["temporary_storages"][1]["name"] = serde_json::json!("Основное хранилище");
        assert!(matches!(
            AppData::from_document(document),
            Err(AppError::MalformedRecord(_))
        ));

        assert!(matches!(
            AppData::from_document(serde_json::json!({ "temporary_storages": "nope" })),
            Err(AppError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_dangling_current_name_resolves_and_heals() {
        let mut data = AppData::default();
        data.create_storage("Lake", None).unwrap();
        let mut document = data.to_document().unwrap();
        document["current_storage_name"] = serde_json::json!("Gone");

        let mut data = AppData::from_document(document).unwrap();
        assert_eq!(data.current_storage().unwrap().name(), "Основное хранилище");
        assert!(data.heal_current());
        assert_eq!(data.current_storage_name(), "Основное хранилище");
        assert!(!data.heal_current());
    }
}
