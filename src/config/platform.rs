//! Per-platform locations of the target application's files.
//!
//! Exactly one `<Platform>Paths` section is added to the defaults. Linux
//! additionally hunts for the application's config directory (accounting for
//! `sudo`) and reports on the state of its storage file. All checks are
//! diagnostic only.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::ConfigError;
use crate::constants::{TARGET_APP, TARGET_APP_LOWER, UPDATER_DIRNAME};
use crate::host::HostProbe;
use crate::i18n::Translator;
use crate::output::Level;

/// Diagnostic lines gathered while probing, emitted by the caller.
pub type Notes = Vec<(Level, String)>;

/// Host operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

/// Keys of every platform section, in declaration order.
pub const PATH_KEYS: [&str; 7] = [
    "storage_path",
    "sqlite_path",
    "machine_id_path",
    "cursor_path",
    "updater_path",
    "update_yml_path",
    "product_json_path",
];

impl Platform {
    /// Platform of the running binary. Unknown unix-likes count as Linux.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Linux
        }
    }

    /// Name of this platform's section.
    pub fn section_name(self) -> &'static str {
        match self {
            Platform::Windows => "WindowsPaths",
            Platform::Mac => "MacPaths",
            Platform::Linux => "LinuxPaths",
        }
    }

    /// Builds the `<Platform>Paths` entries, in [`PATH_KEYS`] order.
    pub fn paths_section(
        self,
        host: &dyn HostProbe,
        tr: &Translator,
        notes: &mut Notes,
    ) -> Result<Vec<(&'static str, String)>, ConfigError> {
        let values = match self {
            Platform::Windows => windows_paths(host, tr, notes)?,
            Platform::Mac => mac_paths(host, tr, notes),
            Platform::Linux => linux_paths(host, tr, notes),
        };
        Ok(PATH_KEYS.into_iter().zip(values).collect())
    }
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn ensure_storage_dir(storage_path: &Path, tr: &Translator, notes: &mut Notes) {
    let Some(dir) = storage_path.parent() else {
        return;
    };
    if let Err(e) = fs::create_dir_all(dir) {
        notes.push((
            Level::Warning,
            tr.get(
                "config.error_creating_storage_dir",
                &[("path", &dir.display()), ("error", &e)],
            ),
        ));
    }
}

fn windows_paths(
    host: &dyn HostProbe,
    tr: &Translator,
    notes: &mut Notes,
) -> Result<[String; 7], ConfigError> {
    let appdata = PathBuf::from(
        host.env_var("APPDATA")
            .ok_or(ConfigError::MissingEnv("APPDATA"))?,
    );
    let local = PathBuf::from(host.env_var("LOCALAPPDATA").unwrap_or_default());
    let global_storage = appdata.join(TARGET_APP).join("User").join("globalStorage");
    let resources = local.join("Programs").join(TARGET_APP).join("resources");

    let storage = global_storage.join("storage.json");
    ensure_storage_dir(&storage, tr, notes);

    Ok([
        lossy(&storage),
        lossy(&global_storage.join("state.vscdb")),
        lossy(&appdata.join(TARGET_APP).join("machineId")),
        lossy(&resources.join("app")),
        lossy(&local.join(UPDATER_DIRNAME)),
        lossy(&resources.join("app-update.yml")),
        lossy(&resources.join("app").join("product.json")),
    ])
}

fn mac_paths(host: &dyn HostProbe, tr: &Translator, notes: &mut Notes) -> [String; 7] {
    let home = host.home_dir().unwrap_or_else(|| PathBuf::from("~"));
    let support = home.join("Library").join("Application Support");
    let global_storage = support.join(TARGET_APP).join("User").join("globalStorage");
    let resources = PathBuf::from(format!("/Applications/{}.app/Contents/Resources", TARGET_APP));

    let storage = global_storage.join("storage.json");
    ensure_storage_dir(&storage, tr, notes);

    [
        lossy(&storage),
        lossy(&global_storage.join("state.vscdb")),
        lossy(&support.join(TARGET_APP).join("machineId")),
        lossy(&resources.join("app")),
        lossy(&support.join(UPDATER_DIRNAME)),
        lossy(&resources.join("app-update.yml")),
        lossy(&resources.join("app").join("product.json")),
    ]
}

/// Where the Linux search looked and what it found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxLocation {
    /// Effective user (the invoking user under `sudo`).
    pub user: String,
    /// Set when running under `sudo`.
    pub sudo_user: Option<String>,
    /// `<home>/.config` of the effective user.
    pub config_base: PathBuf,
    /// `/root` under `sudo`, searched after the user's home.
    pub root_home: Option<PathBuf>,
    /// First existing application config directory.
    pub app_dir: Option<PathBuf>,
}

/// Locates the target application's config directory on Linux.
pub fn locate_linux(host: &dyn HostProbe) -> LinuxLocation {
    let sudo_user = host.env_var("SUDO_USER");
    let user = sudo_user
        .clone()
        .or_else(|| host.env_var("USER"))
        .or_else(|| host.env_var("USERNAME"))
        .or_else(|| {
            host.home_dir()
                .and_then(|h| h.file_name().map(|n| n.to_string_lossy().to_string()))
        })
        .unwrap_or_default();

    let (mut actual_home, root_home) = match &sudo_user {
        Some(sudo) => (PathBuf::from("/home").join(sudo), Some(PathBuf::from("/root"))),
        None => (PathBuf::from("/home").join(&user), None),
    };
    if user.is_empty() || !actual_home.exists() {
        actual_home = host.home_dir().unwrap_or(actual_home);
    }

    let config_base = actual_home.join(".config");
    let mut candidates = vec![config_base.join(TARGET_APP), config_base.join(TARGET_APP_LOWER)];
    if let Some(root) = &root_home {
        candidates.push(root.join(".config").join(TARGET_APP));
        candidates.push(root.join(".config").join(TARGET_APP_LOWER));
    }
    let app_dir = candidates.into_iter().find(|p| p.exists());
    debug!(?app_dir, config_base = %config_base.display(), "linux application directory");

    LinuxLocation {
        user,
        sudo_user,
        config_base,
        root_home,
        app_dir,
    }
}

fn linux_paths(host: &dyn HostProbe, tr: &Translator, notes: &mut Notes) -> [String; 7] {
    let loc = locate_linux(host);
    if loc.app_dir.is_none() {
        notes.push((
            Level::Warning,
            tr.get(
                "config.neither_cursor_nor_cursor_directory_found",
                &[("config_base", &loc.config_base.display())],
            ),
        ));
        if let Some(root) = &loc.root_home {
            notes.push((
                Level::Info,
                tr.get("config.also_checked", &[("path", &root.join(".config").display())]),
            ));
        }
        notes.push((
            Level::Info,
            tr.text("config.please_make_sure_cursor_is_installed_and_has_been_run_at_least_once"),
        ));
    }

    let in_app = |rel: &str| {
        loc.app_dir
            .as_ref()
            .map(|dir| lossy(&dir.join(rel)))
            .unwrap_or_default()
    };
    let storage_path = in_app("User/globalStorage/storage.json");

    if !storage_path.is_empty() {
        check_storage_file(Path::new(&storage_path), &loc, tr, notes);
    }

    [
        storage_path,
        in_app("User/globalStorage/state.vscdb"),
        in_app("machineid"),
        host.linux_install_path(),
        lossy(&loc.config_base.join(UPDATER_DIRNAME)),
        in_app("resources/app-update.yml"),
        in_app("resources/app/product.json"),
    ]
}

/// Reports existence, metadata, access and content of the storage file.
fn check_storage_file(storage: &Path, loc: &LinuxLocation, tr: &Translator, notes: &mut Notes) {
    if let Some(dir) = storage.parent() {
        if !dir.exists() {
            notes.push((
                Level::Warning,
                tr.get(
                    "config.storage_directory_not_found",
                    &[("storage_dir", &dir.display())],
                ),
            ));
        }
    }

    if !storage.exists() {
        notes.push((
            Level::Warning,
            tr.get(
                "config.storage_file_not_found",
                &[("storage_path", &storage.display())],
            ),
        ));
        notes.push((
            Level::Info,
            tr.text("config.please_make_sure_cursor_is_installed_and_has_been_run_at_least_once"),
        ));
        return;
    }

    match fs::metadata(storage) {
        Ok(meta) => {
            notes.push((
                Level::Success,
                tr.get("config.storage_file_found", &[("storage_path", &storage.display())]),
            ));
            notes.push((Level::Success, tr.get("config.file_size", &[("size", &meta.len())])));
            #[cfg(unix)]
            {
                use std::os::unix::fs::MetadataExt;
                let mode = format!("{:#o}", meta.mode() & 0o777);
                notes.push((Level::Success, tr.get("config.file_permissions", &[("permissions", &mode)])));
                notes.push((Level::Success, tr.get("config.file_owner", &[("owner", &meta.uid())])));
                notes.push((Level::Success, tr.get("config.file_group", &[("group", &meta.gid())])));
            }
        }
        Err(e) => notes.push((
            Level::Error,
            tr.get("config.error_getting_file_stats", &[("error", &e)]),
        )),
    }

    let accessible = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(storage)
        .is_ok();
    if !accessible {
        notes.push((
            Level::Error,
            tr.get("config.permission_denied", &[("storage_path", &storage.display())]),
        ));
        let owner = loc.sudo_user.as_deref().unwrap_or(&loc.user);
        let chown = format!("chown {}:{} {}", owner, owner, storage.display());
        notes.push((Level::Info, tr.get("config.try_running", &[("command", &chown)])));
        notes.push((
            Level::Info,
            format!("{}: chmod 644 {}", tr.text("config.and"), storage.display()),
        ));
    }

    match fs::read_to_string(storage) {
        Ok(content) if content.trim().is_empty() => {
            notes.push((
                Level::Warning,
                tr.get("config.storage_file_is_empty", &[("storage_path", &storage.display())]),
            ));
            notes.push((
                Level::Info,
                tr.text("config.the_file_might_be_corrupted_please_reinstall_cursor"),
            ));
        }
        Ok(_) => notes.push((
            Level::Success,
            tr.text("config.storage_file_is_valid_and_contains_data"),
        )),
        Err(e) => {
            notes.push((
                Level::Error,
                tr.get("config.error_reading_storage_file", &[("error", &e)]),
            ));
            notes.push((
                Level::Info,
                tr.text("config.the_file_might_be_corrupted_please_reinstall_cursor"),
            ));
        }
    }
}
