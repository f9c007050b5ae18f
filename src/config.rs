//! Checker settings: embedded defaults, an optional `ddf.toml`, then
//! command-line overrides.

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use ddf_parse::Policy;
use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("../defaults/ddf.default.toml");

/// Picked up from the working directory when no `--config` is given.
pub const LOCAL_CONFIG: &str = "ddf.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub policy: Policy,
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub version: u32,
}

pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let settings = Loader::new().build().expect("defaults");
        assert_eq!(settings.policy, Policy::default());
        assert_eq!(settings.engine.version, ddf_parse::ENGINE_VERSION);
    }

    #[test]
    fn overrides_win() {
        let settings = Loader::new()
            .set_override("policy.strict_errors", true)
            .and_then(|l| l.set_override("engine.version", 129))
            .and_then(Loader::build)
            .expect("overrides");
        assert!(settings.policy.strict_errors);
        assert_eq!(settings.engine.version, 129);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let settings = Loader::new()
            .with_file("no/such/ddf.toml", false)
            .build()
            .expect("optional");
        assert!(!settings.policy.lax_errors);
        assert!(Loader::new().with_file("no/such/ddf.toml", true).build().is_err());
    }
}
