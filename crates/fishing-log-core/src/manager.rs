// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Storage manager
//
// The single owner of AppData. Every mutating operation runs against a
// working copy, the copy is saved, and only a successful save replaces the
// live state. Frontends read through `data()` and mutate only through the
// methods below.

use crate::app_data::{
    AppData, DeletePreview, SaleSummary, StorageSummary, TransferSummary,
};
use crate::fish::{Fish, Rarity};
use crate::persistence::{DocumentKey, Persistence};
use crate::reference::FishReference;
use crate::types::{AppError, AppSettings};
use crate::warnings::{BucketId, FillWarning, FillWarnings};

pub struct StorageManager<P: Persistence> {
    data: AppData,
    reference: FishReference,
    persistence: P,
    warnings: FillWarnings,
}

impl<P: Persistence> StorageManager<P> {
    /// Load both documents, bootstrapping and saving defaults for any that
    /// do not exist yet
    pub fn open(mut persistence: P, settings: &AppSettings) -> Result<Self, AppError> {
        let mut data = match persistence.load(DocumentKey::AppState)? {
            Some(document) => {
                tracing::info!("Loading saved app state");
                AppData::from_document(document)?
            }
            None => {
                tracing::info!("No saved app state found, creating default storage");
                let data = AppData::default();
                save_state(&mut persistence, &data)?;
                data
            }
        };

        let reference = match persistence.load(DocumentKey::FishReference)? {
            Some(document) => FishReference::from_document(document)?,
            None => {
                tracing::info!("No fish reference found, writing built-in catalogue");
                let reference = FishReference::builtin()?;
                persistence.save(DocumentKey::FishReference, &reference.to_document()?)?;
                reference
            }
        };

        if data.heal_current() {
            persist_best_effort(&mut persistence, &data);
        }

        tracing::info!(
            "Loaded {} storages and {} species",
            data.temporary_storages().len(),
            reference.species().len()
        );

        Ok(Self {
            data,
            reference,
            persistence,
            warnings: FillWarnings::new(settings.fill_warning_percent),
        })
    }

    /// Read view of the application state
    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn reference(&self) -> &FishReference {
        &self.reference
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn set_fill_warning_percent(&mut self, percent: f64) {
        self.warnings.set_threshold(percent);
    }

    /// Validate and mutate a working copy, save it, then commit it
    fn apply<T>(
        data: &mut AppData,
        persistence: &mut P,
        op: impl FnOnce(&mut AppData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut working = data.clone();
        let outcome = op(&mut working)?;
        save_state(persistence, &working)?;
        *data = working;
        Ok(outcome)
    }

    pub fn log_catch(
        &mut self,
        name: &str,
        rarity: Option<Rarity>,
        weight_grams: f64,
    ) -> Result<Fish, AppError> {
        let reference = &self.reference;
        let fish = Self::apply(&mut self.data, &mut self.persistence, |data| {
            data.log_catch(name, rarity, weight_grams, reference)
        })?;
        tracing::info!("Logged {} ({} g)", fish.name, fish.weight);
        Ok(fish)
    }

    pub fn delete_fish(&mut self, id: &str) -> Result<Fish, AppError> {
        Self::apply(&mut self.data, &mut self.persistence, |data| {
            data.delete_fish(id)
        })
    }

    pub fn create_storage(
        &mut self,
        name: &str,
        limit_kg: Option<f64>,
    ) -> Result<StorageSummary, AppError> {
        Self::apply(&mut self.data, &mut self.persistence, |data| {
            data.create_storage(name, limit_kg)
        })
    }

    pub fn edit_storage(
        &mut self,
        new_name: Option<&str>,
        new_limit_kg: Option<f64>,
    ) -> Result<StorageSummary, AppError> {
        let old_name = self.data.current_storage().map(|s| s.name().to_string());
        let summary = Self::apply(&mut self.data, &mut self.persistence, |data| {
            data.edit_storage(new_name, new_limit_kg)
        })?;
        if let Some(old_name) = old_name.filter(|n| *n != summary.name) {
            tracing::info!("Renamed storage '{}' to '{}'", old_name, summary.name);
            self.warnings.forget(&BucketId::Temporary(old_name));
        }
        Ok(summary)
    }

    pub fn preview_delete_storage(&self) -> Result<DeletePreview, AppError> {
        self.data.preview_delete_storage()
    }

    /// Delete the current storage and everything in it.
    /// Frontends must confirm with the user first.
    pub fn delete_storage(&mut self) -> Result<DeletePreview, AppError> {
        let deleted = Self::apply(&mut self.data, &mut self.persistence, AppData::delete_storage)?;
        self.warnings
            .forget(&BucketId::Temporary(deleted.name.clone()));
        tracing::info!(
            "Deleted storage '{}' with {} fish",
            deleted.name,
            deleted.fish_count
        );
        Ok(deleted)
    }

    pub fn switch_storage(&mut self, name: &str) -> Result<StorageSummary, AppError> {
        Self::apply(&mut self.data, &mut self.persistence, |data| {
            data.switch_storage(name)
        })
    }

    pub fn preview_transfer(&self) -> Result<TransferSummary, AppError> {
        self.data.preview_transfer()
    }

    pub fn transfer_to_permanent(&mut self) -> Result<TransferSummary, AppError> {
        let moved = Self::apply(
            &mut self.data,
            &mut self.persistence,
            AppData::transfer_to_permanent,
        )?;
        tracing::info!(
            "Transferred {} fish ({:.2} kg) from '{}'",
            moved.count,
            moved.weight_kg,
            moved.from
        );
        Ok(moved)
    }

    pub fn set_permanent_limit(&mut self, limit_kg: f64) -> Result<f64, AppError> {
        Self::apply(&mut self.data, &mut self.persistence, |data| {
            data.set_permanent_limit(limit_kg)
        })
    }

    pub fn preview_sale(&self) -> Result<SaleSummary, AppError> {
        self.data.preview_sale()
    }

    pub fn sell_all(&mut self) -> Result<SaleSummary, AppError> {
        let sold = Self::apply(&mut self.data, &mut self.persistence, AppData::sell_all)?;
        tracing::info!(
            "Sold {} fish ({:.2} kg) for {:.0}",
            sold.count,
            sold.weight_kg,
            sold.total_value
        );
        Ok(sold)
    }

    /// Display refresh: heals the current-storage reference and returns any
    /// new fill warnings for the current and permanent storages
    pub fn refresh(&mut self) -> Vec<FillWarning> {
        if self.data.heal_current() {
            persist_best_effort(&mut self.persistence, &self.data);
        }

        let mut warnings = Vec::new();
        if let Some(storage) = self.data.current_storage() {
            let id = BucketId::Temporary(storage.name().to_string());
            warnings.extend(self.warnings.check(id, storage));
        }
        warnings.extend(self.warnings.check(BucketId::Permanent, self.data.permanent()));
        warnings
    }
}

fn save_state<P: Persistence>(persistence: &mut P, data: &AppData) -> Result<(), AppError> {
    let document = data.to_document()?;
    persistence
        .save(DocumentKey::AppState, &document)
        .inspect_err(|e| tracing::error!("Failed to save app state: {}", e))
}

/// Save on a display-only path; failures are logged and ignored
fn persist_best_effort<P: Persistence>(persistence: &mut P, data: &AppData) {
    if let Err(e) = save_state(persistence, data) {
        tracing::warn!("Ignoring failed save during refresh: {}", e);
    }
}
