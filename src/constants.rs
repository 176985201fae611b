//! Centralized constants for vipconf.
//!
//! File names, directory names, default strings and token tables live here
//! so they can be changed in one place.

/// Name of the per-user configuration directory (`.cursor-free-vip`).
pub const CONFIG_DIR_NAME: &str = ".cursor-free-vip";

/// Configuration filename inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILENAME: &str = "config.ini";

/// Subdirectory of the config dir holding downloaded language files.
pub const LANGUAGE_CACHE_DIRNAME: &str = "language_cache";

/// Display name of the automated target application.
pub const TARGET_APP: &str = "Cursor";

/// Lower-cased directory name of the target application.
pub const TARGET_APP_LOWER: &str = "cursor";

/// Directory name of the target application's updater.
pub const UPDATER_DIRNAME: &str = "cursor-updater";

/// Default token refresh server.
pub const TOKEN_REFRESH_SERVER: &str = "https://token.cursorpro.com.cn";

// --- Backups ---

/// Backup suffix written before a corrupt file is reset (`config.ini.backup_20240101120000`).
pub const CORRUPT_BACKUP_FORMAT: &str = ".backup_%Y%m%d%H%M%S";

/// Backup suffix written before a forced reset (`config.ini.bak.20240101_120000`).
pub const RESET_BACKUP_FORMAT: &str = ".bak.%Y%m%d_%H%M%S";

// --- Boolean tokens ---

/// Values treated as "on", compared case-insensitively.
pub const TRUTHY_TOKENS: [&str; 4] = ["true", "yes", "on", "1"];

/// Values treated as "off", compared case-insensitively.
pub const FALSY_TOKENS: [&str; 4] = ["false", "no", "off", "0"];

// --- Output ---

/// Upper bound for the width of the printer's separator line.
pub const SEPARATOR_MAX_WIDTH: usize = 70;

// --- Environment ---

/// Overrides the documents directory used as the configuration base.
pub const ENV_BASE_DIR: &str = "VIPCONF_BASE_DIR";

/// Path to a JSON message catalog.
pub const ENV_LOCALE: &str = "VIPCONF_LOCALE";
