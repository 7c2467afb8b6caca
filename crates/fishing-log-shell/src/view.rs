// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Shell - Text views
//
// Pure rendering of read views into display text.

use fishing_log_core::{
    sorted_for_display, AppData, Capacity, Fish, PermanentStorage, SpeciesEntry, Statistics,
    TemporaryStorage,
};
use std::fmt::Write;

/// Characters of the fish id shown in listings; `remove` accepts this prefix
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(fish: &Fish) -> &str {
    fish.id.get(..SHORT_ID_LEN).unwrap_or(&fish.id)
}

fn fill_line(storage: &impl Capacity) -> String {
    format!(
        "{:.2}/{:.1} kg ({:.1}%), {} fish",
        storage.total_weight_kg(),
        storage.limit_kg(),
        storage.fill_percentage(),
        storage.count()
    )
}

fn fish_lines(out: &mut String, fishes: &[Fish]) {
    if fishes.is_empty() {
        out.push_str("  (empty)\n");
        return;
    }
    for fish in sorted_for_display(fishes) {
        let _ = writeln!(
            out,
            "  [{}] {}  {:.0} g ({:.2} kg)  {}  bait: {}  price: {:.0}",
            short_id(fish),
            fish.name,
            fish.weight,
            fish.weight_kg(),
            fish.rarity.display_label(),
            fish.best_bait,
            fish.price_guide
        );
    }
}

pub fn render_storage(storage: &TemporaryStorage) -> String {
    let mut out = format!("Storage '{}': {}\n", storage.name(), fill_line(storage));
    fish_lines(&mut out, storage.fishes());
    out
}

pub fn render_permanent(permanent: &PermanentStorage) -> String {
    let mut out = format!(
        "Permanent storage: {}, value {:.0}\n",
        fill_line(permanent),
        permanent.total_value()
    );
    fish_lines(&mut out, permanent.fishes());
    out
}

/// Current storage followed by the permanent storage
pub fn render_overview(data: &AppData) -> String {
    let mut out = match data.current_storage() {
        Some(storage) => render_storage(storage),
        None => "No active storage\n".to_string(),
    };
    out.push('\n');
    out.push_str(&render_permanent(data.permanent()));
    out
}

pub fn render_storage_list(data: &AppData) -> String {
    let current = data.current_storage().map(|s| s.name());
    let mut out = String::new();
    for storage in data.temporary_storages() {
        let marker = if Some(storage.name()) == current { '*' } else { ' ' };
        let _ = writeln!(out, "{} {}  {}", marker, storage.name(), fill_line(storage));
    }
    out
}

pub fn render_stats(stats: &Statistics) -> String {
    if stats.total == 0 {
        return "No catches yet\n".to_string();
    }

    let mut out = format!("Total catches: {}\n", stats.total);
    if let Some((name, count)) = &stats.most_common {
        let _ = writeln!(out, "Most common: {} ({} pcs)", name, count);
    }
    if let Some(fish) = &stats.heaviest {
        let _ = writeln!(
            out,
            "Record weight: {} {:.0} g ({:.2} kg)",
            fish.name,
            fish.weight,
            fish.weight_kg()
        );
    }

    out.push_str("By rarity:\n");
    for (rarity, count) in &stats.rarity_distribution {
        let _ = writeln!(out, "  {}: {}", rarity.display_label(), count);
    }

    out.push_str("Top species:\n");
    for (place, (name, count)) in stats.top_species.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({})", place + 1, name, count);
    }
    out
}

pub fn render_species(entries: &[&SpeciesEntry]) -> String {
    if entries.is_empty() {
        return "No matching species\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{}  {}  {}-{} kg  bait: {}  price: {:.0}",
            entry.name,
            entry.rarity.display_label(),
            entry.weight_range[0],
            entry.weight_range[1],
            entry.best_bait,
            entry.price_guide
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishing_log_core::{FishReference, Rarity};

    fn data_with_catches() -> AppData {
        let reference = FishReference::builtin().unwrap();
        let mut data = AppData::default();
        data.log_catch("Лещ", Some(Rarity::Common), 800.0, &reference)
            .unwrap();
        data.log_catch("Стерлядь", Some(Rarity::Trophy), 4_000.0, &reference)
            .unwrap();
        data
    }

    #[test]
    fn test_storage_view_sorts_rarest_first() {
        let data = data_with_catches();
        let text = render_storage(data.current_storage().unwrap());

        assert!(text.starts_with("Storage 'Основное хранилище': 4.80/50.0 kg (9.6%), 2 fish"));
        let trophy = text.find("Стерлядь").unwrap();
        let common = text.find("Лещ").unwrap();
        assert!(trophy < common);
        assert!(text.contains("800 g (0.80 kg)"));
        assert!(text.contains("Зеленая"));
    }

    #[test]
    fn test_empty_views() {
        let data = AppData::default();
        assert!(render_permanent(data.permanent()).contains("(empty)"));
        assert_eq!(render_stats(&Statistics::default()), "No catches yet\n");
        assert_eq!(render_species(&[]), "No matching species\n");
    }

    #[test]
    fn test_storage_list_marks_current() {
        let mut data = AppData::default();
        data.create_storage("Lake", Some(10.0)).unwrap();
        let text = render_storage_list(&data);
        assert!(text.contains("  Основное хранилище"));
        assert!(text.contains("* Lake  0.00/10.0 kg"));
    }

    #[test]
    fn test_stats_view() {
        let stats = Statistics::compute(&data_with_catches());
        let text = render_stats(&stats);
        assert!(text.contains("Total catches: 2"));
        assert!(text.contains("Record weight: Стерлядь 4000 g (4.00 kg)"));
        assert!(text.contains("  1. Лещ (1)"));
    }

    #[test]
    fn test_short_id() {
        let data = data_with_catches();
        let fish = &data.current_storage().unwrap().fishes()[0];
        assert_eq!(short_id(fish).len(), SHORT_ID_LEN);
        assert!(fish.id.starts_with(short_id(fish)));
    }
}
