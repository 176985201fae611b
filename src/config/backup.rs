//! Timestamped copies taken before a config file is overwritten or removed.
//!
//! Backups sit next to the original and are never pruned.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::error::ConfigError;
use crate::constants::{CORRUPT_BACKUP_FORMAT, RESET_BACKUP_FORMAT};

/// Why a backup is being taken; selects the file name scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupKind {
    /// Before replacing an unreadable file: `config.ini.backup_YYYYMMDDHHMMSS`.
    Corrupt,
    /// Before a forced reset: `config.ini.bak.YYYYMMDD_HHMMSS`.
    ForcedReset,
}

impl BackupKind {
    fn format(self) -> &'static str {
        match self {
            BackupKind::Corrupt => CORRUPT_BACKUP_FORMAT,
            BackupKind::ForcedReset => RESET_BACKUP_FORMAT,
        }
    }
}

/// Backup path for `file` taken at `at`.
pub fn backup_path(file: &Path, kind: BackupKind, at: DateTime<Local>) -> PathBuf {
    let mut name: OsString = file.as_os_str().to_owned();
    name.push(at.format(kind.format()).to_string());
    PathBuf::from(name)
}

/// Copies `file` to a fresh backup path and returns it.
pub fn create_backup(file: &Path, kind: BackupKind) -> Result<PathBuf, ConfigError> {
    let target = backup_path(file, kind, Local::now());
    fs::copy(file, &target).map_err(|e| ConfigError::io(file, e))?;
    Ok(target)
}
