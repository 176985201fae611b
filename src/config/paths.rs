//! Location of the configuration directory and file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::ConfigError;
use super::platform::Notes;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME};
use crate::host::HostProbe;
use crate::i18n::Translator;
use crate::output::Level;

/// Where the configuration lives for this run. Recomputed on every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    /// The preferred directory could not be created; a temp dir is used.
    pub used_temp_fallback: bool,
}

impl ResolvedPaths {
    fn under(base: &Path, used_temp_fallback: bool) -> Self {
        let config_dir = base.join(CONFIG_DIR_NAME);
        let config_file = config_dir.join(CONFIG_FILENAME);
        Self {
            config_dir,
            config_file,
            used_temp_fallback,
        }
    }
}

/// Documents folder when it exists, otherwise the absolute working directory.
///
/// Returns whether the fallback was taken alongside the directory.
pub fn base_dir(host: &dyn HostProbe) -> Result<(PathBuf, bool), ConfigError> {
    match host.documents_dir() {
        Some(docs) if !docs.as_os_str().is_empty() && docs.exists() => Ok((docs, false)),
        _ => {
            let cwd = host.current_dir().map_err(ConfigError::NoWorkingDirectory)?;
            Ok((cwd, true))
        }
    }
}

/// Path of the primary config file, without creating anything.
pub fn canonical_config_file(host: &dyn HostProbe) -> Result<PathBuf, ConfigError> {
    let (base, _) = base_dir(host)?;
    Ok(ResolvedPaths::under(&base, false).config_file)
}

/// Resolves and creates the configuration directory.
///
/// Falls back to `<temp>/.cursor-free-vip` when the preferred directory
/// cannot be created. Fails only if the temp directory is unusable too.
pub fn ensure_config_dir(
    host: &dyn HostProbe,
    tr: &Translator,
    notes: &mut Notes,
) -> Result<ResolvedPaths, ConfigError> {
    let (base, fell_back) = base_dir(host)?;
    if fell_back {
        notes.push((Level::Warning, tr.text("config.documents_path_not_found")));
    }

    let preferred = ResolvedPaths::under(&base, false);
    let existed = preferred.config_dir.is_dir();
    match fs::create_dir_all(&preferred.config_dir) {
        Ok(()) => {
            if !existed {
                notes.push((
                    Level::Info,
                    tr.get(
                        "config.config_dir_created",
                        &[("path", &preferred.config_dir.display())],
                    ),
                ));
            }
            debug!(dir = %preferred.config_dir.display(), "config directory ready");
            Ok(preferred)
        }
        Err(e) => {
            let temp = ResolvedPaths::under(&host.temp_dir(), true);
            let temp_existed = temp.config_dir.is_dir();
            fs::create_dir_all(&temp.config_dir)
                .map_err(|err| ConfigError::io(&temp.config_dir, err))?;
            if !temp_existed {
                notes.push((
                    Level::Warning,
                    tr.get(
                        "config.using_temp_dir",
                        &[("path", &temp.config_dir.display()), ("error", &e)],
                    ),
                ));
            }
            debug!(dir = %temp.config_dir.display(), error = %e, "using temp config directory");
            Ok(temp)
        }
    }
}
