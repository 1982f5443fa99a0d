//! Main module for phpfmt library functionality
//!
//!     Source flows through the crate like this:
//!
//!         source -> lexing::tokenize -> [pass: PassContext over a TokenStream] -> source -> ...
//!
//!     - [token] / [lexing]: the token model and the logos based tokenizer.
//!     - [engine]: the shared rewriting machinery (navigation, output, block copies).
//!     - [passes]: the rewriting rules, and the [PassKind](passes::PassKind) registry.
//!     - [pipeline]: chains passes into a formatter.
//!     - [config], [error], [logging]: the ambient pieces used by the command line tool.

pub mod config;
pub mod engine;
pub mod error;
pub mod lexing;
pub mod logging;
pub mod passes;
pub mod pipeline;
pub mod token;

pub use error::{PhpfmtError, Result};
pub use passes::{Pass, PassKind};
pub use pipeline::Pipeline;

/// Format `source` with the default configuration.
pub fn format_source(source: &str) -> Result<String> {
    let config = config::load_defaults()?;
    Ok(Pipeline::from_config(&config.formatting)?.format(source))
}
