//! Configuration loader for phpfmt.
//!
//! `defaults/phpfmt.default.toml` is embedded into the crate so that docs and
//! runtime behavior stay in sync. Callers layer a project `phpfmt.toml`, an
//! explicit file and command line overrides on top of those defaults via
//! [`Loader`] before deserializing into [`PhpfmtConfig`]. Layout values are
//! checked once everything is merged.

use crate::php::engine::PassSettings;
use crate::php::error::{PhpfmtError, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_TOML: &str = include_str!("../../defaults/phpfmt.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PhpfmtConfig {
    pub formatting: FormattingConfig,
}

/// Layout settings and the pass list.
#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    pub indent_string: String,
    pub newline: String,
    pub use_cache: bool,
    /// Pass names, run in order. Resolved against the pass registry when the pipeline is
    /// built, so unknown names surface as a pipeline error rather than a parse error.
    pub passes: Vec<String>,
}

impl FormattingConfig {
    fn validate(&self) -> Result<()> {
        if !matches!(self.newline.as_str(), "\n" | "\r\n") {
            return Err(PhpfmtError::Config(format!(
                "newline must be \"\\n\" or \"\\r\\n\", got {:?}",
                self.newline
            )));
        }
        if self.indent_string.is_empty() || !self.indent_string.chars().all(|c| c == ' ' || c == '\t') {
            return Err(PhpfmtError::Config(format!(
                "indent_string must be spaces or tabs, got {:?}",
                self.indent_string
            )));
        }
        Ok(())
    }

    pub fn pass_settings(&self) -> PassSettings {
        PassSettings {
            indent_unit: self.indent_string.clone(),
            newline: self.newline.clone(),
            use_cache: self.use_cache,
        }
    }
}

/// Name of the project configuration file picked up next to the formatted file.
pub const PROJECT_FILE: &str = "phpfmt.toml";

/// Layers configuration sources over the embedded defaults. Later layers win, so callers
/// add the project file, then an explicit file, then command line overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file. Missing files are an error at [Loader::build] time.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer the nearest [PROJECT_FILE] in `start` or one of its ancestors, if there is one.
    pub fn with_project_file(self, start: impl AsRef<Path>) -> Self {
        match find_project_file(start.as_ref()) {
            Some(path) => {
                debug!(path = %path.display(), "using project configuration");
                self.with_file(path)
            }
            None => self,
        }
    }

    /// Apply a single key/value override (used for command line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Deserialize all layers and check the layout values.
    pub fn build(self) -> Result<PhpfmtConfig> {
        let config: PhpfmtConfig = self.builder.build()?.try_deserialize()?;
        config.formatting.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The nearest [PROJECT_FILE] in `start` or its ancestors.
pub fn find_project_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE))
        .find(|path| path.is_file())
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PhpfmtConfig> {
    Loader::new().build()
}
