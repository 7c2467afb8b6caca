// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Shell - Interactive loop
//
// Reads commands, runs them against the StorageManager and prints notices.
// Destructive commands show a preview and ask before acting.

use crate::command::{parse_line, parse_number, Command};
use crate::view;
use fishing_log_core::{
    parse_weight, AppError, AppSettings, Capacity, ErrorKind, Persistence, Rarity,
    SettingsStore, Statistics, StorageManager,
};
use std::fmt;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Set for notices built from an AppError
    pub kind: Option<ErrorKind>,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            kind: None,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            kind: None,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            kind: None,
            text: text.into(),
        }
    }
}

impl From<AppError> for Notice {
    fn from(e: AppError) -> Self {
        Self {
            level: NoticeLevel::Error,
            kind: Some(e.kind()),
            text: e.to_string(),
        }
    }
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "validation",
        ErrorKind::Capacity => "capacity",
        ErrorKind::State => "state",
        ErrorKind::Persistence => "persistence",
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.level, self.kind) {
            (NoticeLevel::Info, _) => {}
            (NoticeLevel::Success, _) => f.write_str("ok: ")?,
            (NoticeLevel::Warning, _) => f.write_str("warning: ")?,
            (NoticeLevel::Error, Some(kind)) => write!(f, "{} error: ", kind_label(kind))?,
            (NoticeLevel::Error, None) => f.write_str("error: ")?,
        }
        f.write_str(self.text.trim_end())
    }
}

/// Whether the loop keeps reading after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<P: Persistence> {
    manager: StorageManager<P>,
    settings: SettingsStore,
}

impl<P: Persistence> Shell<P> {
    pub fn new(manager: StorageManager<P>, settings: SettingsStore) -> Self {
        Self { manager, settings }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", view::render_overview(self.manager.data()))?;
        self.print_warnings(out)?;
        writeln!(out, "Type 'help' for commands.")?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                writeln!(out)?;
                break;
            };

            let command = match parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(text) => {
                    writeln!(out, "{}", text.trim_end())?;
                    continue;
                }
            };

            tracing::debug!("Running command: {:?}", command);
            let flow = self.handle(command, input, out)?;
            self.print_warnings(out)?;
            if flow == Flow::Quit {
                break;
            }
        }

        tracing::info!("Shell closed");
        Ok(())
    }

    fn print_warnings(&mut self, out: &mut impl Write) -> io::Result<()> {
        for warning in self.manager.refresh() {
            writeln!(out, "{}", Notice::warning(warning.to_string()))?;
        }
        Ok(())
    }

    fn handle(
        &mut self,
        command: Command,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> io::Result<Flow> {
        let notices = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Delete { yes } => self.delete_storage(yes, input, out)?,
            Command::Transfer { yes } => self.transfer(yes, input, out)?,
            Command::Sell { yes } => self.sell(yes, input, out)?,
            other => self.execute(other),
        };

        for notice in notices {
            writeln!(out, "{}", notice)?;
        }
        Ok(Flow::Continue)
    }

    /// Commands that need no confirmation
    fn execute(&mut self, command: Command) -> Vec<Notice> {
        let result = match command {
            Command::Add {
                name,
                weight,
                rarity,
            } => self.add(&name, &weight, rarity.as_deref()),
            Command::List => Ok(vec![Notice::info(view::render_overview(
                self.manager.data(),
            ))]),
            Command::Storages => Ok(vec![Notice::info(view::render_storage_list(
                self.manager.data(),
            ))]),
            Command::Create { name, limit } => self.create(&name, limit.as_deref()),
            Command::Edit { name, limit } => self.edit(name.as_deref(), limit.as_deref()),
            Command::Switch { name } => self.manager.switch_storage(&name).map(|summary| {
                vec![Notice::success(format!(
                    "Switched to '{}' ({:.2}/{:.1} kg)",
                    summary.name, summary.weight_kg, summary.limit_kg
                ))]
            }),
            Command::Remove { id } => self.remove(&id),
            Command::PermanentLimit { limit } => self.permanent_limit(&limit),
            Command::Stats => Ok(vec![Notice::info(view::render_stats(
                &Statistics::compute(self.manager.data()),
            ))]),
            Command::Wiki { term } => {
                let entries = self
                    .manager
                    .reference()
                    .search(term.as_deref().unwrap_or(""));
                Ok(vec![Notice::info(view::render_species(&entries))])
            }
            Command::Config {
                warn_threshold,
                data_dir,
            } => self.config(warn_threshold, data_dir),
            Command::Delete { .. }
            | Command::Transfer { .. }
            | Command::Sell { .. }
            | Command::Quit => Ok(Vec::new()),
        };

        result.unwrap_or_else(|e| vec![e.into()])
    }

    fn add(
        &mut self,
        name: &str,
        weight: &str,
        rarity: Option<&str>,
    ) -> Result<Vec<Notice>, AppError> {
        let grams = parse_weight(weight)?;
        let rarity = rarity.map(str::parse::<Rarity>).transpose()?;
        let fish = self.manager.log_catch(name, rarity, grams)?;
        Ok(vec![Notice::success(format!(
            "Fish '{}' added ({:.0} g, {})",
            fish.name,
            fish.weight,
            fish.rarity.display_label()
        ))])
    }

    fn create(&mut self, name: &str, limit: Option<&str>) -> Result<Vec<Notice>, AppError> {
        // An unreadable limit falls back to the default
        let limit_kg = limit.and_then(parse_number);
        let summary = self.manager.create_storage(name, limit_kg)?;
        Ok(vec![Notice::success(format!(
            "Storage '{}' created with a {:.1} kg limit",
            summary.name, summary.limit_kg
        ))])
    }

    fn edit(&mut self, name: Option<&str>, limit: Option<&str>) -> Result<Vec<Notice>, AppError> {
        let limit_kg = limit
            .map(|text| {
                parse_number(text)
                    .ok_or_else(|| AppError::Validation(format!("Invalid limit: {}", text)))
            })
            .transpose()?;
        let summary = self.manager.edit_storage(name, limit_kg)?;
        Ok(vec![Notice::success(format!(
            "Storage '{}' updated, limit {:.1} kg",
            summary.name, summary.limit_kg
        ))])
    }

    /// Remove the single fish of the current storage whose id starts with `prefix`
    fn remove(&mut self, prefix: &str) -> Result<Vec<Notice>, AppError> {
        let storage = self
            .manager
            .data()
            .current_storage()
            .ok_or(AppError::NoActiveStorage)?;
        let matches: Vec<&str> = storage
            .fishes()
            .iter()
            .filter(|f| !prefix.is_empty() && f.id.starts_with(prefix))
            .map(|f| f.id.as_str())
            .collect();

        let id = match matches.as_slice() {
            [] => return Err(AppError::FishNotFound(prefix.to_string())),
            [id] => id.to_string(),
            _ => {
                return Err(AppError::Validation(format!(
                    "Id prefix '{}' matches {} fish",
                    prefix,
                    matches.len()
                )))
            }
        };

        let fish = self.manager.delete_fish(&id)?;
        Ok(vec![Notice::success(format!("Fish '{}' removed", fish.name))])
    }

    fn permanent_limit(&mut self, limit: &str) -> Result<Vec<Notice>, AppError> {
        let limit_kg = parse_number(limit)
            .ok_or_else(|| AppError::Validation(format!("Invalid limit: {}", limit)))?;
        let limit_kg = self.manager.set_permanent_limit(limit_kg)?;
        Ok(vec![Notice::success(format!(
            "Permanent storage limit set to {:.1} kg",
            limit_kg
        ))])
    }

    fn config(
        &mut self,
        warn_threshold: Option<f64>,
        data_dir: Option<std::path::PathBuf>,
    ) -> Result<Vec<Notice>, AppError> {
        if warn_threshold.is_none() && data_dir.is_none() {
            return Ok(vec![Notice::info(render_settings(
                &self.settings.get(),
                &self.settings,
            ))]);
        }

        let current = self.settings.get();
        let moved_data = data_dir.is_some();
        let updated = AppSettings {
            data_dir: data_dir.or(current.data_dir),
            fill_warning_percent: warn_threshold.unwrap_or(current.fill_warning_percent),
        };
        self.settings.update(updated.clone())?;
        self.manager
            .set_fill_warning_percent(updated.fill_warning_percent);

        let mut notices = vec![Notice::success("Settings saved")];
        if moved_data {
            notices.push(Notice::info(
                "The new data directory is used from the next launch",
            ));
        }
        Ok(notices)
    }

    fn delete_storage(
        &mut self,
        yes: bool,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> io::Result<Vec<Notice>> {
        let preview = match self.manager.preview_delete_storage() {
            Ok(preview) => preview,
            Err(e) => return Ok(vec![e.into()]),
        };
        let question = format!(
            "Delete storage '{}' with {} fish ({:.2} kg)? The fish are lost.",
            preview.name, preview.fish_count, preview.weight_kg
        );
        if !yes && !confirm(&question, input, out)? {
            return Ok(vec![Notice::info("Cancelled")]);
        }

        Ok(match self.manager.delete_storage() {
            Ok(deleted) => vec![
                Notice::success(format!("Storage '{}' deleted", deleted.name)),
                Notice::info(format!(
                    "Current storage: {}",
                    self.manager.data().current_storage_name()
                )),
            ],
            Err(e) => vec![e.into()],
        })
    }

    fn transfer(
        &mut self,
        yes: bool,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> io::Result<Vec<Notice>> {
        let preview = match self.manager.preview_transfer() {
            Ok(preview) => preview,
            Err(e) => return Ok(vec![e.into()]),
        };
        let question = format!(
            "Move {} fish ({:.2} kg) from '{}' to the permanent storage ({:.2} kg free)?",
            preview.count, preview.weight_kg, preview.from, preview.available_kg
        );
        if !yes && !confirm(&question, input, out)? {
            return Ok(vec![Notice::info("Cancelled")]);
        }

        Ok(match self.manager.transfer_to_permanent() {
            Ok(moved) => vec![Notice::success(format!(
                "Moved {} fish ({:.2} kg) to the permanent storage",
                moved.count, moved.weight_kg
            ))],
            Err(e) => vec![e.into()],
        })
    }

    fn sell(
        &mut self,
        yes: bool,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> io::Result<Vec<Notice>> {
        let preview = match self.manager.preview_sale() {
            Ok(preview) => preview,
            Err(e) => return Ok(vec![e.into()]),
        };
        let question = format!(
            "Sell {} fish ({:.2} kg) for about {:.0}?",
            preview.count, preview.weight_kg, preview.total_value
        );
        if !yes && !confirm(&question, input, out)? {
            return Ok(vec![Notice::info("Cancelled")]);
        }

        Ok(match self.manager.sell_all() {
            Ok(sold) => vec![Notice::success(format!(
                "Sold {} fish for {:.0}",
                sold.count, sold.total_value
            ))],
            Err(e) => vec![e.into()],
        })
    }
}

fn render_settings(settings: &AppSettings, store: &SettingsStore) -> String {
    let data_dir = settings
        .data_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "(platform default)".to_string());
    format!(
        "Settings file: {}\nData directory: {}\nWarning threshold: {:.1}%",
        store.path().display(),
        data_dir,
        settings.fill_warning_percent
    )
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Ask a yes/no question; anything but an explicit yes declines
fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let answer = read_line(input)?.unwrap_or_default();
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    ))
}
