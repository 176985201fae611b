//! Default configuration schema.

use std::path::Path;

use super::error::ConfigError;
use super::ini::Configuration;
use super::platform::{Notes, Platform};
use crate::constants::{LANGUAGE_CACHE_DIRNAME, TOKEN_REFRESH_SERVER};
use crate::host::{Browser, HostProbe};
use crate::i18n::Translator;

type Entries = Vec<(String, String)>;

fn owned(pairs: &[(&str, &str)]) -> Entries {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn browser_section(host: &dyn HostProbe) -> Entries {
    let mut entries = vec![("default_browser".to_string(), "chrome".to_string())];
    for browser in Browser::ALL {
        let key = browser.key();
        entries.push((format!("{}_path", key), host.browser_path(browser)));
        entries.push((
            format!("{}_driver_path", key),
            host.driver_path(browser.driver_browser()),
        ));
    }
    entries
}

/// Builds the full default configuration for `platform`.
///
/// `config_dir` anchors the language cache. Diagnostics from probing the
/// platform paths are appended to `notes`.
pub fn build_defaults(
    host: &dyn HostProbe,
    platform: Platform,
    config_dir: &Path,
    tr: &Translator,
    notes: &mut Notes,
) -> Result<Configuration, ConfigError> {
    let language_cache = config_dir
        .join(LANGUAGE_CACHE_DIRNAME)
        .to_string_lossy()
        .to_string();

    let mut sections: Vec<(&str, Entries)> = vec![
        ("Browser", browser_section(host)),
        (
            "Turnstile",
            owned(&[
                ("handle_turnstile_time", "2"),
                ("handle_turnstile_random_time", "1-3"),
            ]),
        ),
        (
            "Timing",
            owned(&[
                ("min_random_time", "0.1"),
                ("max_random_time", "0.8"),
                ("page_load_wait", "0.1-0.8"),
                ("input_wait", "0.3-0.8"),
                ("submit_wait", "0.5-1.5"),
                ("verification_code_input", "0.1-0.3"),
                ("verification_success_wait", "2-3"),
                ("verification_retry_wait", "2-3"),
                ("email_check_initial_wait", "4-6"),
                ("email_refresh_wait", "2-4"),
                ("settings_page_load_wait", "1-2"),
                ("failed_retry_time", "0.5-1"),
                ("retry_interval", "8-12"),
                ("max_timeout", "160"),
            ]),
        ),
        (
            "Utils",
            owned(&[
                ("enabled_update_check", "True"),
                ("enabled_force_update", "False"),
                ("enabled_account_info", "True"),
            ]),
        ),
        (
            "OAuth",
            owned(&[
                ("show_selection_alert", "False"),
                ("timeout", "120"),
                ("max_attempts", "3"),
            ]),
        ),
        (
            "Token",
            owned(&[
                ("refresh_server", TOKEN_REFRESH_SERVER),
                ("enable_refresh", "True"),
            ]),
        ),
        (
            "Language",
            // An empty current_language means "detect from the system".
            owned(&[
                ("current_language", ""),
                ("fallback_language", "en"),
                ("auto_update_languages", "True"),
                ("language_cache_dir", language_cache.as_str()),
            ]),
        ),
    ];

    sections.push((
        platform.section_name(),
        platform
            .paths_section(host, tr, notes)?
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    ));
    sections.push((
        "TempMailPlus",
        owned(&[("enabled", "false"), ("email", ""), ("epin", "")]),
    ));

    Ok(Configuration::from_pairs(sections))
}

/// Last-resort configuration used when resolution fails outright.
pub fn minimal_fallback() -> Configuration {
    Configuration::from_pairs([(
        "Language",
        owned(&[("current_language", "en"), ("fallback_language", "en")]),
    )])
}
