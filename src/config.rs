use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const DEFAULT_MAX_FIELDS: usize = 64;

/// Defaults applied to every type built with [`ModelConfig`].
///
/// Individual builders can still override `strict` and `kw_only`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Reject attribute values whose kind differs from the declaration.
    pub strict_types: bool,
    /// Refuse positional construction.
    pub kw_only: bool,
    /// Record built value object types in the global registry.
    pub register_types: bool,
    /// Upper bound on declared attributes per type.
    pub max_fields: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            strict_types: true,
            kw_only: false,
            register_types: true,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl ModelConfig {
    /// Loads a config file; the format follows the extension (YAML, JSON or TOML).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("config file {:?} does not exist", path);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let ext = path
            .extension()
            .and_then(|os| os.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("failed to parse YAML config {:?}", path))?,
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse JSON config {:?}", path))?,
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("failed to parse TOML config {:?}", path))?,
            other => anyhow::bail!("unsupported config extension: {other}"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `DOMAIN_OBJECTS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overrides fields from `DOMAIN_OBJECTS_STRICT`, `DOMAIN_OBJECTS_KW_ONLY`,
    /// `DOMAIN_OBJECTS_REGISTER` and `DOMAIN_OBJECTS_MAX_FIELDS`.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(strict) = env_flag("DOMAIN_OBJECTS_STRICT")? {
            self.strict_types = strict;
        }
        if let Some(kw_only) = env_flag("DOMAIN_OBJECTS_KW_ONLY")? {
            self.kw_only = kw_only;
        }
        if let Some(register) = env_flag("DOMAIN_OBJECTS_REGISTER")? {
            self.register_types = register;
        }
        if let Ok(raw) = env::var("DOMAIN_OBJECTS_MAX_FIELDS") {
            self.max_fields = raw
                .trim()
                .parse()
                .with_context(|| format!("DOMAIN_OBJECTS_MAX_FIELDS must be an integer, got {raw:?}"))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_fields > 0, "max_fields must be greater than 0");
        Ok(())
    }
}

fn env_flag(name: &str) -> Result<Option<bool>> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => anyhow::bail!("{name} must be a boolean, got {other:?}"),
    }
}
