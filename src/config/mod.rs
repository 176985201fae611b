//! Configuration resolution for cursor-free-vip.
//!
//! The tool keeps its settings as INI at `<documents>/.cursor-free-vip/config.ini`
//! (falling back to the working directory, then the temp directory). The file
//! is created with platform defaults when missing, gains any missing keys on
//! later runs, and is backed up and reset when it cannot be parsed.

mod backup;
mod defaults;
mod error;
mod ini;
mod paths;
mod platform;
mod reset;
mod resolver;

#[cfg(test)]
pub(crate) mod tests;

pub use ini::{parse_bool, Configuration};
pub use platform::Platform;
pub use resolver::{ConfigResolver, Resolution};

/// Caller-owned, lazily resolved configuration.
///
/// Resolves once on first access and serves the cached result afterwards.
/// A forced update always replaces the cached value.
pub struct ConfigStore<'a> {
    resolver: ConfigResolver<'a>,
    cached: Option<Resolution>,
}

impl<'a> ConfigStore<'a> {
    pub fn new(resolver: ConfigResolver<'a>) -> Self {
        Self {
            resolver,
            cached: None,
        }
    }

    /// The resolved configuration, resolving on first call.
    pub fn get(&mut self) -> &Resolution {
        self.cached.get_or_insert_with(|| self.resolver.resolve())
    }

    /// Runs [`ConfigResolver::force_update`] and caches its result.
    ///
    /// On failure the cache is cleared so the next [`ConfigStore::get`]
    /// resolves again.
    pub fn force_update(&mut self) -> Option<&Resolution> {
        self.cached = self.resolver.force_update();
        self.cached.as_ref()
    }
}
