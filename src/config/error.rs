use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised inside configuration resolution.
///
/// None of these reach callers of the public operations; they pick the
/// fallback path and turn into a diagnostic notice.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem operation failed on `path`.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Config file is not valid INI.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A required environment variable is unset.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    /// Neither the documents folder nor the working directory is usable.
    #[error("no usable working directory: {0}")]
    NoWorkingDirectory(#[source] io::Error),
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why an INI document was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingSectionHeader,
    EmptySectionName,
    DuplicateSection(String),
    DuplicateKey { section: String, key: String },
    MissingDelimiter(String),
    EmptyKey,
}

/// Malformed INI input, with the 1-based line where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {}", describe(.kind))]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

fn describe(kind: &ParseErrorKind) -> String {
    match kind {
        ParseErrorKind::MissingSectionHeader => "content before the first section header".into(),
        ParseErrorKind::EmptySectionName => "empty section name".into(),
        ParseErrorKind::DuplicateSection(name) => format!("section [{}] already exists", name),
        ParseErrorKind::DuplicateKey { section, key } => {
            format!("key '{}' already exists in section [{}]", key, section)
        }
        ParseErrorKind::MissingDelimiter(line) => format!("expected 'key = value', got '{}'", line),
        ParseErrorKind::EmptyKey => "empty key name".into(),
    }
}
