//! Localized message lookup.
//!
//! A [`Translator`] maps dotted message keys (`config.backup_created`) to
//! templates with `{name}` placeholders. Catalogs are JSON files whose nested
//! objects are flattened into dotted keys. Every lookup falls back to the
//! built-in English table, so callers never carry their own default text.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{Display, Write};
use std::fs;
use std::path::Path;

/// Message catalog with a guaranteed English fallback.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    catalog: HashMap<String, String>,
}

impl Translator {
    /// A translator with no catalog; every lookup uses the English table.
    pub fn english() -> Self {
        Self::default()
    }

    /// Loads a JSON catalog from `path`.
    ///
    /// Nested objects become dotted keys; non-string leaves are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read message catalog {:?}", path))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse message catalog {:?}", path))?;
        let mut catalog = HashMap::new();
        flatten("", &value, &mut catalog);
        Ok(Self { catalog })
    }

    /// Looks up `key` and substitutes `{name}` placeholders from `params`.
    ///
    /// Resolution order: loaded catalog, built-in English, the key itself.
    pub fn get(&self, key: &str, params: &[(&str, &dyn Display)]) -> String {
        let template = self
            .catalog
            .get(key)
            .map(String::as_str)
            .or_else(|| english(key))
            .unwrap_or(key);
        substitute(template, params)
    }

    /// Shorthand for [`Translator::get`] without placeholders.
    pub fn text(&self, key: &str) -> String {
        self.get(key, &[])
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                flatten(&key, v, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        _ => {}
    }
}

/// Replace every `{name}` with the matching parameter; unknown names stay as-is.
///
/// The template is scanned once, so substituted values are never expanded again.
fn substitute(template: &str, params: &[(&str, &dyn Display)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            result.push_str(&rest[open..]);
            return result;
        };
        let name = &after[..close];
        match params.iter().find(|(n, _)| *n == name) {
            Some((_, value)) => {
                let _ = write!(result, "{}", value);
            }
            None => {
                result.push('{');
                result.push_str(name);
                result.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    result.push_str(rest);
    result
}

/// Built-in English messages.
fn english(key: &str) -> Option<&'static str> {
    let text = match key {
        "config.documents_path_not_found" => "Documents path not found, using current directory",
        "config.config_dir_created" => "Config directory created: {path}",
        "config.using_temp_dir" => "Using temporary directory due to error: {path} (Error: {error})",
        "config.created_config_file" => "Created config file: {path}",
        "config.error_creating_config_file" => "Error creating config file {path}: {error}",
        "config.config_updated" => "Added missing settings to config file: {path}",
        "config.error_updating_config_file" => "Error updating config file {path}: {error}",
        "config.error_reading_config_file" => "Error reading config file {path}: {error}",
        "config.backup_created" => "Created backup of config: {path}",
        "config.error_creating_backup" => "Error creating backup: {error}",
        "config.config_kept_after_backup_failure" => {
            "Keeping unreadable config file in place, using defaults for this run: {path}"
        }
        "config.config_reset_to_default" => "Config file reset to default: {path}",
        "config.error_writing_default_config" => "Error writing default config {path}: {error}",
        "config.unexpected_error_setup" => "Unexpected error during config setup: {error}",
        "config.error_creating_storage_dir" => "Could not create storage directory {path}: {error}",
        "config.neither_cursor_nor_cursor_directory_found" => {
            "Neither Cursor nor cursor directory found in {config_base}"
        }
        "config.also_checked" => "Also checked {path}",
        "config.please_make_sure_cursor_is_installed_and_has_been_run_at_least_once" => {
            "Please make sure Cursor is installed and has been run at least once"
        }
        "config.storage_directory_not_found" => "Storage directory not found: {storage_dir}",
        "config.storage_file_found" => "Storage file found: {storage_path}",
        "config.file_size" => "File size: {size} bytes",
        "config.file_permissions" => "File permissions: {permissions}",
        "config.file_owner" => "File owner: {owner}",
        "config.file_group" => "File group: {group}",
        "config.error_getting_file_stats" => "Error getting file stats: {error}",
        "config.permission_denied" => "Permission denied: {storage_path}",
        "config.try_running" => "Try running: {command}",
        "config.and" => "And",
        "config.storage_file_is_empty" => "Storage file is empty: {storage_path}",
        "config.the_file_might_be_corrupted_please_reinstall_cursor" => {
            "The file might be corrupted, please reinstall Cursor"
        }
        "config.storage_file_is_valid_and_contains_data" => "Storage file is valid and contains data",
        "config.error_reading_storage_file" => "Error reading storage file: {error}",
        "config.storage_file_not_found" => "Storage file not found: {storage_path}",
        "config.config_not_available" => "Configuration not available",
        "config.configuration" => "Configuration",
        "config.enabled" => "Enabled",
        "config.disabled" => "Disabled",
        "config.config_directory" => "Config Directory",
        "config.config_force_update_enabled" => "Config file force update enabled",
        "config.config_force_update_disabled" => {
            "Config file force update disabled by configuration. Keeping existing config file."
        }
        "config.config_removed" => "Config file removed for forced update",
        "config.error_removing_config" => "Error removing config file {path}: {error}",
        "config.backup_failed" => "Failed to backup config: {error}",
        "config.force_update_failed" => "Force update config failed: {error}",
        _ => return None,
    };
    Some(text)
}
