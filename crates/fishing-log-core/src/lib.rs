// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Shared logic for all frontends
//
// This crate provides:
// - Fish, TemporaryStorage and PermanentStorage models
// - AppData with the capacity-checked storage operations
// - StorageManager, which owns AppData and persists every change
// - FishReference catalogue and Statistics
// - SettingsStore and AppError types
//
// Frontend-specific code lives in separate crates.

pub mod app_data;
pub mod fish;
pub mod manager;
pub mod persistence;
pub mod reference;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod types;
pub mod warnings;

// Re-export commonly used items
pub use app_data::{AppData, DeletePreview, SaleSummary, StorageSummary, TransferSummary};
pub use fish::{parse_weight, sorted_for_display, Fish, Rarity, StorageKind};
pub use manager::StorageManager;
pub use persistence::{DocumentKey, JsonFileStore, MemoryStore, Persistence};
pub use reference::{FishReference, SpeciesEntry, SpeciesLookup};
pub use settings::SettingsStore;
pub use stats::Statistics;
pub use storage::{Capacity, PermanentStorage, TemporaryStorage};
pub use types::{AppError, AppSettings, ErrorKind};
pub use warnings::{BucketId, FillWarning};

/// Platform directories for settings and data
pub(crate) fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "fishing-log", "FishingLog")
}
