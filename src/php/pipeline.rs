//! Pass pipeline
//!
//!     Chains passes: the output text of one pass is the input of the next, and every pass
//!     tokenizes its input afresh. A pipeline is built either by adding passes one by one or
//!     from a [FormattingConfig], which names the passes and the settings they share.
//!
//! # Examples
//!
//! ```ignore
//! use phpfmt::php::pipeline::Pipeline;
//! use phpfmt::php::passes::PassKind;
//!
//! let settings = PassSettings::default();
//! let pipeline = Pipeline::new()
//!     .with_pass(PassKind::CurlyOpenNextLine, &settings)
//!     .with_pass(PassKind::Reindent, &settings);
//!
//! let formatted = pipeline.format("<?php\nclass Foo {\n}\n");
//! ```

use crate::php::config::FormattingConfig;
use crate::php::engine::PassSettings;
use crate::php::error::Result;
use crate::php::passes::{Pass, PassKind};
use tracing::debug;

/// An ordered list of passes.
pub struct Pipeline {
    passes: Vec<(PassKind, Box<dyn Pass>)>,
}

impl Pipeline {
    /// Create an empty pipeline, which returns its input unchanged.
    pub fn new() -> Self {
        Pipeline { passes: Vec::new() }
    }

    /// Append a pass built with `settings`.
    pub fn with_pass(mut self, kind: PassKind, settings: &PassSettings) -> Self {
        self.passes.push((kind, kind.build(settings)));
        self
    }

    /// Build the pipeline named by a configuration.
    ///
    /// Fails with [UnknownPass](crate::php::error::PhpfmtError::UnknownPass) on the first
    /// name that is not in the registry.
    pub fn from_config(config: &FormattingConfig) -> Result<Self> {
        let settings = config.pass_settings();
        config
            .passes
            .iter()
            .try_fold(Pipeline::new(), |pipeline, name| {
                Ok(pipeline.with_pass(name.parse()?, &settings))
            })
    }

    /// The pipeline with every pass, in the default order.
    pub fn default_passes(settings: &PassSettings) -> Self {
        PassKind::ALL
            .into_iter()
            .fold(Pipeline::new(), |pipeline, kind| pipeline.with_pass(kind, settings))
    }

    pub fn passes(&self) -> Vec<PassKind> {
        self.passes.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn format(&self, source: &str) -> String {
        self.passes
            .iter()
            .fold(source.to_string(), |text, (kind, pass)| {
                let formatted = pass.format(&text);
                debug!(
                    pass = kind.name(),
                    changed = formatted != text,
                    bytes = formatted.len(),
                    "pass finished"
                );
                formatted
            })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
