//! Ordered INI document model, parser and writer.
//!
//! Sections and keys keep insertion order so a rewritten file reads the same
//! way it was declared. Key names are case-insensitive and stored lower-cased;
//! section names are case-sensitive. All values are plain strings.

use std::fmt;

use super::error::{ParseError, ParseErrorKind};
use crate::constants::{FALSY_TOKENS, TRUTHY_TOKENS};

/// One `[Name]` block and its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn set(&mut self, key: &str, value: &str) {
        let key = key.to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }
}

/// A full configuration: ordered sections of ordered `key = value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    sections: Vec<Section>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from `(section, [(key, value)])` literals.
    pub fn from_pairs<'a, I, E, K>(sections: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, E)>,
        E: IntoIterator<Item = (K, String)>,
        K: AsRef<str>,
    {
        let mut config = Self::new();
        for (section, entries) in sections {
            config.add_section(section);
            for (key, value) in entries {
                config.set(section, key.as_ref(), &value);
            }
        }
        config
    }

    /// Sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Adds an empty section unless it already exists.
    pub fn add_section(&mut self, name: &str) {
        if !self.has_section(name) {
            self.sections.push(Section::new(name));
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Reads a value as a boolean token; `None` when absent or unrecognized.
    pub fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        self.get(section, key).and_then(parse_bool)
    }

    /// Sets a value, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.add_section(section);
        if let Some(s) = self.sections.iter_mut().find(|s| s.name == section) {
            s.set(key, value);
        }
    }

    /// Adds every section and key of `defaults` that is missing here.
    ///
    /// Existing values are left alone. Returns `true` when anything was added.
    pub fn merge_missing(&mut self, defaults: &Configuration) -> bool {
        let mut updated = false;
        for section in defaults.sections() {
            if !self.has_section(section.name()) {
                self.add_section(section.name());
                updated = true;
            }
            for (key, value) in section.entries() {
                if !self.has_key(section.name(), key) {
                    self.set(section.name(), key, value);
                    updated = true;
                }
            }
        }
        updated
    }

    /// Parses INI text.
    ///
    /// Accepts `key = value` and `key: value`, full-line `#`/`;` comments and
    /// indented continuation lines. Rejects content before the first header,
    /// duplicate sections, duplicate keys and lines without a delimiter.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut config = Self::new();
        let mut current: Option<usize> = None;
        // Last key written in the current section, for continuation lines.
        let mut last_key: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw.starts_with(' ') || raw.starts_with('\t');
            if indented {
                if let (Some(sec), Some(key)) = (current, last_key.as_ref()) {
                    let entry = config.sections[sec]
                        .entries
                        .iter_mut()
                        .find(|(k, _)| k == key);
                    if let Some(entry) = entry {
                        entry.1.push('\n');
                        entry.1.push_str(trimmed);
                        continue;
                    }
                }
            }

            if let Some(name) = section_header(trimmed) {
                if name.is_empty() {
                    return Err(ParseError::new(line_no, ParseErrorKind::EmptySectionName));
                }
                if config.has_section(name) {
                    return Err(ParseError::new(
                        line_no,
                        ParseErrorKind::DuplicateSection(name.to_string()),
                    ));
                }
                config.sections.push(Section::new(name));
                current = Some(config.sections.len() - 1);
                last_key = None;
                continue;
            }

            let Some(sec) = current else {
                return Err(ParseError::new(line_no, ParseErrorKind::MissingSectionHeader));
            };

            let Some(pos) = trimmed.find(|c: char| c == '=' || c == ':') else {
                return Err(ParseError::new(
                    line_no,
                    ParseErrorKind::MissingDelimiter(trimmed.to_string()),
                ));
            };
            let key = trimmed[..pos].trim().to_lowercase();
            let value = trimmed[pos + 1..].trim();
            if key.is_empty() {
                return Err(ParseError::new(line_no, ParseErrorKind::EmptyKey));
            }

            let section = &mut config.sections[sec];
            if section.contains_key(&key) {
                return Err(ParseError::new(
                    line_no,
                    ParseErrorKind::DuplicateKey {
                        section: section.name.clone(),
                        key,
                    },
                ));
            }
            section.entries.push((key.clone(), value.to_string()));
            last_key = Some(key);
        }

        Ok(config)
    }

    /// Serializes to INI text: a blank line follows every section.
    pub fn to_ini_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{} = {}", key, value.replace('\n', "\n\t"))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Name inside `[...]`, up to the last `]`; anything after it is ignored.
fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    Some(&rest[..end])
}

/// Interprets a boolean token (`true/yes/on/1`, `false/no/off/0`).
pub fn parse_bool(value: &str) -> Option<bool> {
    let v = value.trim().to_lowercase();
    if TRUTHY_TOKENS.contains(&v.as_str()) {
        Some(true)
    } else if FALSY_TOKENS.contains(&v.as_str()) {
        Some(false)
    } else {
        None
    }
}
