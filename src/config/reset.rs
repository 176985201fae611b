//! Forced reset of the configuration file.

use std::fs;

use tracing::debug;

use super::backup::{create_backup, BackupKind};
use super::error::ConfigError;
use super::paths::canonical_config_file;
use super::platform::Notes;
use super::resolver::{emit, read_config, ConfigResolver, Resolution};
use crate::output::{notice, Level};

impl ConfigResolver<'_> {
    /// Backs up and deletes the config file, then resolves a fresh one.
    ///
    /// Gated by `Utils.enabled_force_update` in the existing file: only a
    /// recognized false token keeps the file. Returns `None` when the
    /// existing file cannot be read or parsed.
    pub fn force_update(&self) -> Option<Resolution> {
        let mut notes = Notes::new();
        let prepared = self.clear_for_reset(&mut notes);
        emit(notes);

        match prepared {
            Ok(()) => Some(self.resolve()),
            Err(e) => {
                notice(
                    Level::Error,
                    &self.tr.get("config.force_update_failed", &[("error", &e)]),
                );
                None
            }
        }
    }

    fn clear_for_reset(&self, notes: &mut Notes) -> Result<(), ConfigError> {
        let file = canonical_config_file(self.host)?;
        if !file.exists() {
            debug!(path = %file.display(), "no config file to reset");
            return Ok(());
        }

        let existing = read_config(&file)?;
        let enabled = existing
            .get_bool("Utils", "enabled_force_update")
            .unwrap_or(true);
        if !enabled {
            notes.push((Level::Info, self.tr.text("config.config_force_update_disabled")));
            return Ok(());
        }

        let backup = match create_backup(&file, BackupKind::ForcedReset) {
            Ok(backup) => backup,
            Err(e) => {
                notes.push((
                    Level::Error,
                    self.tr.get("config.backup_failed", &[("error", &e)]),
                ));
                return Ok(());
            }
        };
        notes.push((
            Level::Info,
            self.tr.get("config.backup_created", &[("path", &backup.display())]),
        ));
        notes.push((Level::Info, self.tr.text("config.config_force_update_enabled")));

        match fs::remove_file(&file) {
            Ok(()) => notes.push((Level::Info, self.tr.text("config.config_removed"))),
            Err(e) => notes.push((
                Level::Error,
                self.tr.get(
                    "config.error_removing_config",
                    &[("path", &file.display()), ("error", &e)],
                ),
            )),
        }
        Ok(())
    }
}
