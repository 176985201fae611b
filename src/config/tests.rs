use super::backup::{backup_path, BackupKind};
use super::defaults::build_defaults;
use super::platform::Notes;
use super::*;
use crate::host::{Browser, HostProbe};
use crate::i18n::Translator;
use crate::output::Level;
use chrono::{Local, TimeDelta};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// In-memory [`HostProbe`] rooted in a scratch directory.
pub(crate) struct FakeHost {
    home: PathBuf,
    documents: Option<PathBuf>,
    cwd: Option<PathBuf>,
    temp: PathBuf,
    env: HashMap<String, String>,
}

impl FakeHost {
    pub(crate) const INSTALL_PATH: &'static str = "/opt/Cursor/resources/app";

    pub(crate) fn new(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            documents: None,
            cwd: Some(home.to_path_buf()),
            temp: home.join("tmp"),
            env: HashMap::new(),
        }
    }

    pub(crate) fn with_documents(mut self, dir: Option<&Path>) -> Self {
        self.documents = dir.map(Path::to_path_buf);
        self
    }

    pub(crate) fn with_cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub(crate) fn without_cwd(mut self) -> Self {
        self.cwd = None;
        self
    }

    pub(crate) fn with_temp(mut self, dir: &Path) -> Self {
        self.temp = dir.to_path_buf();
        self
    }

    pub(crate) fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }
}

impl HostProbe for FakeHost {
    fn documents_dir(&self) -> Option<PathBuf> {
        self.documents.clone()
    }

    fn browser_path(&self, browser: Browser) -> String {
        format!("/fake/browsers/{}", browser.key())
    }

    fn driver_path(&self, browser: Browser) -> String {
        format!("/fake/drivers/{}", browser.key())
    }

    fn linux_install_path(&self) -> String {
        Self::INSTALL_PATH.to_string()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.home.clone())
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp.clone()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        self.cwd
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "working directory removed"))
    }
}

/// Every platform section name.
pub(crate) fn platform_section_names() -> [&'static str; 3] {
    [
        Platform::Windows.section_name(),
        Platform::Mac.section_name(),
        Platform::Linux.section_name(),
    ]
}

/// Marks `path` read-only. Returns `false` when the OS still allows writing
/// (running as root), in which case the caller skips its assertions.
fn make_read_only(path: &Path) -> bool {
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms).unwrap();
    fs::OpenOptions::new().write(true).open(path).is_err()
}

struct Fixture {
    root: TempDir,
    host: FakeHost,
    tr: Translator,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("Documents");
        fs::create_dir_all(&docs).unwrap();
        let host = FakeHost::new(root.path()).with_documents(Some(&docs));
        Self {
            root,
            host,
            tr: Translator::english(),
        }
    }

    fn resolver(&self) -> ConfigResolver<'_> {
        ConfigResolver::new(&self.host, Platform::Linux, &self.tr)
    }

    fn config_dir(&self) -> PathBuf {
        self.root.path().join("Documents").join(".cursor-free-vip")
    }

    fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.ini")
    }

    fn defaults(&self) -> Configuration {
        let mut notes = Notes::new();
        build_defaults(
            &self.host,
            Platform::Linux,
            &self.config_dir(),
            &self.tr,
            &mut notes,
        )
        .unwrap()
    }

    fn backups(&self, prefix: &str) -> Vec<PathBuf> {
        let mut found: Vec<_> = fs::read_dir(self.config_dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(prefix))
                    .unwrap_or(false)
            })
            .collect();
        found.sort();
        found
    }
}

#[test]
fn test_fresh_install_without_documents_dir() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::new(root.path()).with_documents(None);
    let tr = Translator::english();
    let resolution = ConfigResolver::new(&host, Platform::Linux, &tr).resolve();

    let expected = root.path().join(".cursor-free-vip").join("config.ini");
    assert_eq!(resolution.path.as_deref(), Some(expected.as_path()));
    let on_disk = Configuration::parse(&fs::read_to_string(&expected).unwrap()).unwrap();
    assert_eq!(on_disk, resolution.config);
    for name in [
        "Browser",
        "Turnstile",
        "Timing",
        "Utils",
        "OAuth",
        "Token",
        "Language",
        "LinuxPaths",
        "TempMailPlus",
    ] {
        assert!(on_disk.has_section(name), "missing [{}]", name);
    }
}

#[test]
fn test_zero_length_file_is_rewritten() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    fs::write(fx.config_file(), "").unwrap();

    let resolution = fx.resolver().resolve();
    assert_eq!(resolution.config, fx.defaults());
    assert_eq!(
        fs::read_to_string(fx.config_file()).unwrap(),
        fx.defaults().to_ini_string()
    );
}

#[test]
fn test_resolve_twice_is_byte_identical() {
    let fx = Fixture::new();
    fx.resolver().resolve();
    let first = fs::read(fx.config_file()).unwrap();

    let (second_res, notes) = fx.resolver().resolve_collecting();
    let second = fs::read(fx.config_file()).unwrap();
    assert_eq!(first, second);
    assert_eq!(second_res.config, fx.defaults());
    // Nothing created or updated on the second pass.
    assert!(!notes.iter().any(|(_, m)| m.contains("Created config file")));
    assert!(!notes.iter().any(|(_, m)| m.contains("Added missing settings")));
}

#[test]
fn test_missing_key_is_added_and_existing_values_kept() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    fs::write(
        fx.config_file(),
        "[Utils]\nenabled_update_check = False\nenabled_force_update = False\n\n\
         [Timing]\nmax_timeout = 999\n\n[Custom]\nmine = 1\n",
    )
    .unwrap();

    let (resolution, notes) = fx.resolver().resolve_collecting();
    let config = &resolution.config;
    assert_eq!(config.get("Utils", "enabled_account_info"), Some("True"));
    assert_eq!(config.get("Utils", "enabled_update_check"), Some("False"));
    assert_eq!(config.get("Timing", "max_timeout"), Some("999"));
    assert_eq!(config.get("Custom", "mine"), Some("1"));
    assert_eq!(
        notes
            .iter()
            .filter(|(_, m)| m.contains("Added missing settings"))
            .count(),
        1
    );

    // Every default key is present, both in memory and on disk.
    let on_disk = Configuration::parse(&fs::read_to_string(fx.config_file()).unwrap()).unwrap();
    for section in fx.defaults().sections() {
        for (key, _) in section.entries() {
            assert!(config.has_key(section.name(), key), "{}.{}", section.name(), key);
            assert!(on_disk.has_key(section.name(), key), "{}.{}", section.name(), key);
        }
    }

    // A second pass finds nothing to add.
    let before = fs::read(fx.config_file()).unwrap();
    let (again, notes) = fx.resolver().resolve_collecting();
    assert_eq!(fs::read(fx.config_file()).unwrap(), before);
    assert_eq!(again.config, resolution.config);
    assert!(!notes.iter().any(|(_, m)| m.contains("Added missing settings")));
}

#[test]
fn test_corrupt_file_is_backed_up_and_reset() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    let garbage = b"this is not an ini file\n[Utils\nenabled = ".to_vec();
    fs::write(fx.config_file(), &garbage).unwrap();

    let resolution = fx.resolver().resolve();

    let backups = fx.backups("config.ini.backup_");
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read(&backups[0]).unwrap(), garbage);
    assert_eq!(resolution.config, fx.defaults());
    assert_eq!(resolution.path, Some(fx.config_file()));
    assert_eq!(
        fs::read_to_string(fx.config_file()).unwrap(),
        fx.defaults().to_ini_string()
    );
}

#[test]
fn test_invalid_utf8_counts_as_corrupt() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    fs::write(fx.config_file(), b"[Utils]\nenabled = \xff\xfe\n").unwrap();

    let resolution = fx.resolver().resolve();
    assert_eq!(fx.backups("config.ini.backup_").len(), 1);
    assert_eq!(resolution.config, fx.defaults());
}

#[test]
fn test_unreadable_file_without_backup_is_left_in_place() {
    let fx = Fixture::new();
    // A directory where the file should be: not readable, not copyable.
    fs::create_dir_all(fx.config_file().join("inner")).unwrap();

    let (resolution, notes) = fx.resolver().resolve_collecting();
    assert_eq!(resolution.config, fx.defaults());
    assert_eq!(resolution.path, Some(fx.config_file()));
    assert!(fx.config_file().join("inner").is_dir());
    assert!(fx.backups("config.ini.backup_").is_empty());
    assert!(notes.iter().any(|(_, m)| m.contains("Error creating backup")));
}

#[test]
fn test_platform_sections_are_exclusive() {
    for platform in [Platform::Windows, Platform::Mac, Platform::Linux] {
        let fx = Fixture::new();
        let host = FakeHost::new(fx.root.path())
            .with_documents(Some(&fx.root.path().join("Documents")))
            .with_env("APPDATA", &fx.root.path().join("AppData").to_string_lossy());
        let resolution = ConfigResolver::new(&host, platform, &fx.tr).resolve();

        let present: Vec<_> = platform_section_names()
            .into_iter()
            .filter(|name| resolution.config.has_section(name))
            .collect();
        assert_eq!(present, vec![platform.section_name()]);
        assert!(resolution.path.is_some());
    }
}

#[test]
fn test_unusable_working_directory_gives_minimal_fallback() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::new(root.path()).with_documents(None).without_cwd();
    let tr = Translator::english();

    let (resolution, notes) = ConfigResolver::new(&host, Platform::Linux, &tr).resolve_collecting();
    assert_eq!(resolution.path, None);
    assert_eq!(resolution.config, defaults::minimal_fallback());
    assert!(notes
        .iter()
        .any(|(_, m)| m.contains("Unexpected error during config setup")));
}

#[test]
fn test_windows_without_appdata_gives_minimal_fallback() {
    let fx = Fixture::new();
    let resolution = ConfigResolver::new(&fx.host, Platform::Windows, &fx.tr).resolve();
    assert_eq!(resolution.path, None);
    assert_eq!(resolution.config.get("Language", "current_language"), Some("en"));
}

#[test]
fn test_force_update_disabled_keeps_file() {
    let fx = Fixture::new();
    fx.resolver().resolve();
    let mut config = fx.defaults();
    config.set("Utils", "enabled_force_update", "false");
    config.set("Timing", "max_timeout", "42");
    fs::write(fx.config_file(), config.to_ini_string()).unwrap();
    let before = fs::read(fx.config_file()).unwrap();

    let resolution = fx.resolver().force_update().unwrap();

    assert_eq!(fs::read(fx.config_file()).unwrap(), before);
    assert!(fx.backups("config.ini.bak.").is_empty());
    assert_eq!(resolution, fx.resolver().resolve());
    assert_eq!(resolution.config.get("Timing", "max_timeout"), Some("42"));
}

#[test]
fn test_force_update_enabled_regenerates_defaults() {
    let fx = Fixture::new();
    fx.resolver().resolve();
    let mut config = fx.defaults();
    config.set("Utils", "enabled_force_update", "True");
    config.set("Timing", "max_timeout", "42");
    fs::write(fx.config_file(), config.to_ini_string()).unwrap();
    let before = fs::read(fx.config_file()).unwrap();

    let resolution = fx.resolver().force_update().unwrap();

    let backups = fx.backups("config.ini.bak.");
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read(&backups[0]).unwrap(), before);
    assert_eq!(resolution.config, fx.defaults());
    assert_eq!(resolution.config.get("Timing", "max_timeout"), Some("160"));
    assert_eq!(
        fs::read_to_string(fx.config_file()).unwrap(),
        fx.defaults().to_ini_string()
    );
}

#[test]
fn test_force_update_flag_defaults_to_enabled() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    fs::write(fx.config_file(), "[Utils]\nenabled_force_update = sometimes\n").unwrap();

    let resolution = fx.resolver().force_update().unwrap();
    assert_eq!(fx.backups("config.ini.bak.").len(), 1);
    assert_eq!(resolution.config, fx.defaults());
}

#[test]
fn test_force_update_without_file_just_resolves() {
    let fx = Fixture::new();
    let resolution = fx.resolver().force_update().unwrap();
    assert_eq!(resolution.path, Some(fx.config_file()));
    assert!(fx.config_file().exists());
    assert!(fx.backups("config.ini.bak.").is_empty());
}

#[test]
fn test_force_update_on_corrupt_file_fails() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    fs::write(fx.config_file(), "no header here\n").unwrap();

    assert!(fx.resolver().force_update().is_none());
    assert_eq!(fs::read_to_string(fx.config_file()).unwrap(), "no header here\n");
}

#[test]
fn test_store_caches_until_forced_update() {
    let fx = Fixture::new();
    let mut store = ConfigStore::new(fx.resolver());
    let first = store.get().clone();
    assert_eq!(first.config, fx.defaults());

    // Edits on disk are not seen through the cache.
    let mut edited = fx.defaults();
    edited.set("Utils", "enabled_force_update", "True");
    edited.set("OAuth", "timeout", "5");
    fs::write(fx.config_file(), edited.to_ini_string()).unwrap();
    assert_eq!(store.get(), &first);

    // A forced update replaces the cached value.
    let refreshed = store.force_update().cloned().unwrap();
    assert_eq!(refreshed.config.get("OAuth", "timeout"), Some("120"));
    assert_eq!(store.get(), &refreshed);
}

#[test]
fn test_header_with_trailing_comment_keeps_user_values() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    fs::write(fx.config_file(), "[Timing] ; tuned by hand\nmax_timeout = 999\n").unwrap();

    let (resolution, notes) = fx.resolver().resolve_collecting();
    assert_eq!(resolution.config.get("Timing", "max_timeout"), Some("999"));
    assert!(fx.backups("config.ini.backup_").is_empty());
    assert!(!notes.iter().any(|(_, m)| m.contains("Error reading config file")));

    let on_disk = Configuration::parse(&fs::read_to_string(fx.config_file()).unwrap()).unwrap();
    assert_eq!(on_disk.get("Timing", "max_timeout"), Some("999"));
}

#[cfg(unix)]
#[test]
fn test_failed_fresh_write_returns_defaults_with_path() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    let target = fx.config_dir().join("missing").join("dir").join("x.ini");
    std::os::unix::fs::symlink(&target, fx.config_file()).unwrap();

    let (resolution, notes) = fx.resolver().resolve_collecting();
    assert_eq!(resolution.config, fx.defaults());
    assert_eq!(resolution.path, Some(fx.config_file()));
    assert!(!target.exists());
    assert!(notes
        .iter()
        .any(|(l, m)| *l == Level::Error && m.contains("Error creating config file")));
}

#[test]
fn test_failed_merge_rewrite_returns_merged_config() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    let original = "[Timing]\nmax_timeout = 999\n";
    fs::write(fx.config_file(), original).unwrap();
    if !make_read_only(&fx.config_file()) {
        return;
    }

    let (resolution, notes) = fx.resolver().resolve_collecting();
    assert_eq!(resolution.path, Some(fx.config_file()));
    assert_eq!(resolution.config.get("Timing", "max_timeout"), Some("999"));
    assert_eq!(resolution.config.get("Utils", "enabled_account_info"), Some("True"));
    assert_eq!(fs::read_to_string(fx.config_file()).unwrap(), original);
    assert!(notes
        .iter()
        .any(|(l, m)| *l == Level::Error && m.contains("Error updating config file")));
}

#[test]
fn test_failed_overwrite_after_backup_returns_defaults() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config_dir()).unwrap();
    fs::write(fx.config_file(), "not ini at all\n").unwrap();
    if !make_read_only(&fx.config_file()) {
        return;
    }

    let (resolution, notes) = fx.resolver().resolve_collecting();
    assert_eq!(resolution.config, fx.defaults());
    assert_eq!(resolution.path, Some(fx.config_file()));
    assert_eq!(fx.backups("config.ini.backup_").len(), 1);
    assert_eq!(fs::read_to_string(fx.config_file()).unwrap(), "not ini at all\n");
    assert!(notes
        .iter()
        .any(|(l, m)| *l == Level::Error && m.contains("Error writing default config")));
}

#[test]
fn test_force_update_backup_failure_keeps_file() {
    let fx = Fixture::new();
    fx.resolver().resolve();
    let mut config = fx.defaults();
    config.set("Utils", "enabled_force_update", "True");
    config.set("Timing", "max_timeout", "42");
    fs::write(fx.config_file(), config.to_ini_string()).unwrap();
    let before = fs::read(fx.config_file()).unwrap();

    // Directories at every backup name the next few seconds could produce.
    let now = Local::now();
    for offset in 0..5 {
        let blocked = backup_path(
            &fx.config_file(),
            BackupKind::ForcedReset,
            now + TimeDelta::seconds(offset),
        );
        fs::create_dir_all(blocked).unwrap();
    }

    let resolution = fx.resolver().force_update().unwrap();
    assert_eq!(fs::read(fx.config_file()).unwrap(), before);
    assert_eq!(resolution.config.get("Timing", "max_timeout"), Some("42"));
    assert_eq!(resolution.path, Some(fx.config_file()));
}
