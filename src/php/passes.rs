//! Formatting passes
//!
//!     A pass is one single-purpose rewriting rule. It receives source text and returns source
//!     text; in between it tokenizes, walks the tokens with a fresh [PassContext] and writes
//!     the result. Passes keep no state across calls, so one instance can format any number of
//!     inputs.
//!
//!     The available passes are listed in [PassKind], which doubles as the registry used by the
//!     configuration and the command line: pass names there are the kebab-case variant names.
//!
//! Writing a pass
//!
//!     Dispatch on the kind of each token returned by [PassContext::next_token] and copy every
//!     kind you do not handle verbatim. Strings (an opening `Quote`) must be copied with
//!     `copy_until` so nothing inside them is ever rewritten. To hand a token back to the outer
//!     loop, `step_back` the stream.
//!
//! [PassContext]: crate::php::engine::PassContext
//! [PassContext::next_token]: crate::php::engine::PassContext::next_token

pub mod curly_open_next_line;
pub mod eliminate_duplicated_empty_lines;
pub mod reindent;
pub mod trim_paren_padding;

pub use curly_open_next_line::CurlyOpenNextLine;
pub use eliminate_duplicated_empty_lines::EliminateDuplicatedEmptyLines;
pub use reindent::Reindent;
pub use trim_paren_padding::TrimParenPadding;

use crate::php::engine::PassSettings;
use crate::php::error::PhpfmtError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A source-to-source rewriting rule.
pub trait Pass {
    fn format(&self, source: &str) -> String;
}

/// Registry of the passes this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    TrimParenPadding,
    CurlyOpenNextLine,
    Reindent,
    EliminateDuplicatedEmptyLines,
}

impl PassKind {
    /// Every pass, in the default pipeline order.
    pub const ALL: [PassKind; 4] = [
        PassKind::TrimParenPadding,
        PassKind::CurlyOpenNextLine,
        PassKind::Reindent,
        PassKind::EliminateDuplicatedEmptyLines,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PassKind::TrimParenPadding => "trim-paren-padding",
            PassKind::CurlyOpenNextLine => "curly-open-next-line",
            PassKind::Reindent => "reindent",
            PassKind::EliminateDuplicatedEmptyLines => "eliminate-duplicated-empty-lines",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PassKind::TrimParenPadding => "Remove spaces just inside parentheses",
            PassKind::CurlyOpenNextLine => {
                "Move the opening brace of class, interface, trait and function declarations to its own line"
            }
            PassKind::Reindent => "Recompute leading indentation from bracket nesting",
            PassKind::EliminateDuplicatedEmptyLines => "Collapse runs of blank lines into one",
        }
    }

    pub fn build(&self, settings: &PassSettings) -> Box<dyn Pass> {
        let settings = settings.clone();
        match self {
            PassKind::TrimParenPadding => Box::new(TrimParenPadding::new(settings)),
            PassKind::CurlyOpenNextLine => Box::new(CurlyOpenNextLine::new(settings)),
            PassKind::Reindent => Box::new(Reindent::new(settings)),
            PassKind::EliminateDuplicatedEmptyLines => {
                Box::new(EliminateDuplicatedEmptyLines::new(settings))
            }
        }
    }

    fn available() -> String {
        PassKind::ALL
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PassKind {
    type Err = PhpfmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        PassKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| PhpfmtError::UnknownPass {
                name: name.to_string(),
                available: PassKind::available(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for kind in PassKind::ALL {
            assert_eq!(kind.name().parse::<PassKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_unknown_pass_lists_available() {
        let err = "psr2".parse::<PassKind>().unwrap_err();
        match err {
            PhpfmtError::UnknownPass { name, available } => {
                assert_eq!(name, "psr2");
                assert!(available.contains("curly-open-next-line"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_serde_names_match_registry_names() {
        for kind in PassKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_every_pass_keeps_empty_input_empty() {
        let settings = PassSettings::default();
        for kind in PassKind::ALL {
            assert_eq!(kind.build(&settings).format(""), "", "{kind}");
        }
    }
}
