//! Create, merge and repair the configuration file.
//!
//! [`ConfigResolver::resolve`] never fails: every error is turned into a
//! degraded but usable [`Resolution`] plus a diagnostic notice.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::backup::{create_backup, BackupKind};
use super::defaults::{build_defaults, minimal_fallback};
use super::error::ConfigError;
use super::ini::Configuration;
use super::paths::ensure_config_dir;
use super::platform::{Notes, Platform};
use crate::host::HostProbe;
use crate::i18n::Translator;
use crate::output::{notice, Level};

/// A configuration and the file it came from.
///
/// `path` is `None` only for the minimal fallback configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: Configuration,
    pub path: Option<PathBuf>,
}

/// Resolves the configuration for one host and platform.
pub struct ConfigResolver<'a> {
    pub(super) host: &'a dyn HostProbe,
    pub(super) platform: Platform,
    pub(super) tr: &'a Translator,
}

pub(super) fn emit(notes: Notes) {
    for (level, message) in notes {
        notice(level, &message);
    }
}

pub(super) fn read_config(path: &Path) -> Result<Configuration, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(Configuration::parse(text)?)
}

fn write_config(path: &Path, config: &Configuration) -> Result<(), ConfigError> {
    fs::write(path, config.to_ini_string()).map_err(|e| ConfigError::io(path, e))
}

impl<'a> ConfigResolver<'a> {
    pub fn new(host: &'a dyn HostProbe, platform: Platform, tr: &'a Translator) -> Self {
        Self { host, platform, tr }
    }

    /// Resolves the configuration, printing diagnostics as notices.
    pub fn resolve(&self) -> Resolution {
        let (resolution, notes) = self.resolve_collecting();
        emit(notes);
        resolution
    }

    /// Resolves the configuration and returns diagnostics instead of printing them.
    pub fn resolve_collecting(&self) -> (Resolution, Notes) {
        let mut notes = Notes::new();
        let resolution = match self.try_resolve(&mut notes) {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(error = %e, "config resolution failed, using minimal fallback");
                notes.push((
                    Level::Error,
                    self.tr.get("config.unexpected_error_setup", &[("error", &e)]),
                ));
                Resolution {
                    config: minimal_fallback(),
                    path: None,
                }
            }
        };
        (resolution, notes)
    }

    fn try_resolve(&self, notes: &mut Notes) -> Result<Resolution, ConfigError> {
        let paths = ensure_config_dir(self.host, self.tr, notes)?;
        if paths.used_temp_fallback {
            warn!(dir = %paths.config_dir.display(), "config stored in temp directory");
        }
        let defaults = build_defaults(self.host, self.platform, &paths.config_dir, self.tr, notes)?;
        let file = paths.config_file;

        let blank = match fs::metadata(&file) {
            Ok(meta) => meta.is_file() && meta.len() == 0,
            Err(_) => true,
        };
        let config = if blank {
            self.write_fresh(&file, defaults, notes)
        } else {
            match read_config(&file) {
                Ok(existing) => self.merge_existing(&file, existing, &defaults, notes),
                Err(e) => self.recover_corrupt(&file, defaults, e, notes),
            }
        };

        Ok(Resolution {
            config,
            path: Some(file),
        })
    }

    fn write_fresh(&self, file: &Path, defaults: Configuration, notes: &mut Notes) -> Configuration {
        match write_config(file, &defaults) {
            Ok(()) => {
                debug!(path = %file.display(), "wrote default config");
                notes.push((
                    Level::Info,
                    self.tr.get("config.created_config_file", &[("path", &file.display())]),
                ));
            }
            Err(e) => notes.push((
                Level::Error,
                self.tr.get(
                    "config.error_creating_config_file",
                    &[("path", &file.display()), ("error", &e)],
                ),
            )),
        }
        defaults
    }

    /// Adds missing defaults; rewrites the file only when something changed.
    fn merge_existing(
        &self,
        file: &Path,
        mut existing: Configuration,
        defaults: &Configuration,
        notes: &mut Notes,
    ) -> Configuration {
        if !existing.merge_missing(defaults) {
            debug!(path = %file.display(), "config already complete");
            return existing;
        }
        match write_config(file, &existing) {
            Ok(()) => notes.push((
                Level::Info,
                self.tr.get("config.config_updated", &[("path", &file.display())]),
            )),
            Err(e) => notes.push((
                Level::Error,
                self.tr.get(
                    "config.error_updating_config_file",
                    &[("path", &file.display()), ("error", &e)],
                ),
            )),
        }
        existing
    }

    /// Backs up an unreadable file and replaces it with the defaults.
    ///
    /// Without a backup the file is left untouched and the defaults are
    /// only used in memory.
    fn recover_corrupt(
        &self,
        file: &Path,
        defaults: Configuration,
        error: ConfigError,
        notes: &mut Notes,
    ) -> Configuration {
        notes.push((
            Level::Error,
            self.tr.get(
                "config.error_reading_config_file",
                &[("path", &file.display()), ("error", &error)],
            ),
        ));

        match create_backup(file, BackupKind::Corrupt) {
            Ok(backup) => {
                notes.push((
                    Level::Warning,
                    self.tr.get("config.backup_created", &[("path", &backup.display())]),
                ));
            }
            Err(e) => {
                notes.push((
                    Level::Error,
                    self.tr.get("config.error_creating_backup", &[("error", &e)]),
                ));
                notes.push((
                    Level::Warning,
                    self.tr.get(
                        "config.config_kept_after_backup_failure",
                        &[("path", &file.display())],
                    ),
                ));
                return defaults;
            }
        }

        match write_config(file, &defaults) {
            Ok(()) => notes.push((
                Level::Warning,
                self.tr.get("config.config_reset_to_default", &[("path", &file.display())]),
            )),
            Err(e) => notes.push((
                Level::Error,
                self.tr.get(
                    "config.error_writing_default_config",
                    &[("path", &file.display()), ("error", &e)],
                ),
            )),
        }
        defaults
    }
}
