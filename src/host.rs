//! Lookups against the host machine.
//!
//! [`HostProbe`] is the seam between configuration resolution and the
//! operating system: documents folder, browser and driver locations, the
//! target application's install directory, environment variables and the
//! usual home/temp/working directories. [`SystemHost`] answers them for the
//! real machine; tests substitute their own implementation.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::Platform;

/// Browsers the automation tool can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Edge,
    Firefox,
    Brave,
    Opera,
    OperaGx,
}

impl Browser {
    /// All supported browsers, in the order their keys appear in `[Browser]`.
    pub const ALL: [Browser; 6] = [
        Browser::Chrome,
        Browser::Edge,
        Browser::Firefox,
        Browser::Brave,
        Browser::Opera,
        Browser::OperaGx,
    ];

    /// Key prefix used in the `[Browser]` section (`chrome_path`, `operagx_driver_path`).
    pub fn key(self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Edge => "edge",
            Browser::Firefox => "firefox",
            Browser::Brave => "brave",
            Browser::Opera => "opera",
            Browser::OperaGx => "operagx",
        }
    }

    /// Browser whose WebDriver this browser uses.
    ///
    /// Chromium derivatives without their own driver reuse chromedriver.
    pub fn driver_browser(self) -> Browser {
        match self {
            Browser::Brave | Browser::OperaGx => Browser::Chrome,
            other => other,
        }
    }

    fn driver_name(self) -> &'static str {
        match self.driver_browser() {
            Browser::Edge => "msedgedriver",
            Browser::Firefox => "geckodriver",
            Browser::Opera => "operadriver",
            _ => "chromedriver",
        }
    }

    fn candidates(self, platform: Platform, home: &Path) -> Vec<PathBuf> {
        let local = home.join("AppData").join("Local");
        match (platform, self) {
            (Platform::Windows, Browser::Chrome) => vec![
                PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
                PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
                local.join(r"Google\Chrome\Application\chrome.exe"),
            ],
            (Platform::Windows, Browser::Edge) => vec![
                PathBuf::from(r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe"),
                PathBuf::from(r"C:\Program Files\Microsoft\Edge\Application\msedge.exe"),
            ],
            (Platform::Windows, Browser::Firefox) => vec![
                PathBuf::from(r"C:\Program Files\Mozilla Firefox\firefox.exe"),
                PathBuf::from(r"C:\Program Files (x86)\Mozilla Firefox\firefox.exe"),
            ],
            (Platform::Windows, Browser::Brave) => vec![
                PathBuf::from(r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe"),
                local.join(r"BraveSoftware\Brave-Browser\Application\brave.exe"),
            ],
            (Platform::Windows, Browser::Opera) => vec![
                local.join(r"Programs\Opera\opera.exe"),
                PathBuf::from(r"C:\Program Files\Opera\opera.exe"),
            ],
            (Platform::Windows, Browser::OperaGx) => vec![
                local.join(r"Programs\Opera GX\opera.exe"),
                PathBuf::from(r"C:\Program Files\Opera GX\opera.exe"),
            ],
            (Platform::Mac, Browser::Chrome) => {
                vec![PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome")]
            }
            (Platform::Mac, Browser::Edge) => vec![PathBuf::from(
                "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
            )],
            (Platform::Mac, Browser::Firefox) => {
                vec![PathBuf::from("/Applications/Firefox.app/Contents/MacOS/firefox")]
            }
            (Platform::Mac, Browser::Brave) => vec![PathBuf::from(
                "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
            )],
            (Platform::Mac, Browser::Opera) => {
                vec![PathBuf::from("/Applications/Opera.app/Contents/MacOS/Opera")]
            }
            (Platform::Mac, Browser::OperaGx) => {
                vec![PathBuf::from("/Applications/Opera GX.app/Contents/MacOS/Opera")]
            }
            (Platform::Linux, Browser::Chrome) => vec![
                PathBuf::from("/usr/bin/google-chrome"),
                PathBuf::from("/usr/bin/google-chrome-stable"),
                PathBuf::from("/usr/bin/chromium"),
                PathBuf::from("/usr/bin/chromium-browser"),
            ],
            (Platform::Linux, Browser::Edge) => vec![PathBuf::from("/usr/bin/microsoft-edge")],
            (Platform::Linux, Browser::Firefox) => vec![PathBuf::from("/usr/bin/firefox")],
            (Platform::Linux, Browser::Brave) => vec![PathBuf::from("/usr/bin/brave-browser")],
            (Platform::Linux, Browser::Opera) | (Platform::Linux, Browser::OperaGx) => {
                vec![PathBuf::from("/usr/bin/opera")]
            }
        }
    }
}

/// Host lookups consumed by configuration resolution.
///
/// Path lookups are best-effort: they return a plausible default rather
/// than failing when nothing is installed.
pub trait HostProbe {
    /// The user's documents folder, if one can be determined.
    fn documents_dir(&self) -> Option<PathBuf>;

    /// Executable path for `browser`.
    fn browser_path(&self, browser: Browser) -> String;

    /// WebDriver path for `browser`.
    fn driver_path(&self, browser: Browser) -> String;

    /// Install directory of the target application on Linux.
    fn linux_install_path(&self) -> String;

    /// Value of an environment variable, `None` when unset or empty.
    fn env_var(&self, name: &str) -> Option<String>;

    /// The current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Root of the system temp directory.
    fn temp_dir(&self) -> PathBuf;

    /// The process working directory.
    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// [`HostProbe`] backed by the real machine.
pub struct SystemHost {
    platform: Platform,
    base_dir: Option<PathBuf>,
}

impl SystemHost {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            base_dir: None,
        }
    }

    /// Use `dir` instead of the documents folder as the configuration base.
    pub fn with_base_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.base_dir = dir;
        self
    }

    fn home(&self) -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    fn drivers_dir(&self) -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drivers")
    }
}

/// First candidate that exists, otherwise the first candidate.
fn first_existing(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .find(|p| p.exists())
        .or_else(|| candidates.first())
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl HostProbe for SystemHost {
    fn documents_dir(&self) -> Option<PathBuf> {
        self.base_dir.clone().or_else(dirs::document_dir)
    }

    fn browser_path(&self, browser: Browser) -> String {
        first_existing(&browser.candidates(self.platform, &self.home()))
    }

    fn driver_path(&self, browser: Browser) -> String {
        let name = match self.platform {
            Platform::Windows => format!("{}.exe", browser.driver_name()),
            _ => browser.driver_name().to_string(),
        };
        self.drivers_dir().join(name).to_string_lossy().to_string()
    }

    fn linux_install_path(&self) -> String {
        let candidates = [
            PathBuf::from("/opt/Cursor/resources/app"),
            PathBuf::from("/usr/share/cursor/resources/app"),
            PathBuf::from("/opt/cursor-bin/resources/app"),
            PathBuf::from("/usr/lib/cursor/resources/app"),
            self.home().join(".local/share/cursor/resources/app"),
        ];
        first_existing(&candidates)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}
