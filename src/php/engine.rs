//! Token-stream rewriting engine
//!
//!     Every pass shares the same machinery: it tokenizes its input, walks the tokens with a
//!     cursor, and writes an output string while tracking an indent level. This module holds
//!     that machinery, split the way passes use it:
//!         - [stream]: the token stream, its cursor and the navigation queries (look-left,
//!           look-right, skip rules, memoized classification);
//!         - [output]: the output buffer and indent level;
//!         - [blocks]: the per-call [PassContext] with the block-copy primitives.
//!
//! Invariants
//!
//!     - The cursor only moves through consuming calls (advance, the copy primitives, the
//!       explicit `step_back` rewind). Queries never move it.
//!     - The classification cache only holds answers for the current cursor position.
//!     - The indent level is never negative.
//!     - Balanced copies emit exactly the tokens between an opener and its matching closer.
//!
//!     None of these operations fail. Running off either end of the stream is "no match", and
//!     an unterminated region yields whatever was collected.

pub mod blocks;
pub mod output;
pub mod stream;

pub use blocks::PassContext;
pub use output::OutputBuilder;
pub use stream::{Direction, IgnoreList, TokenStream};

/// Layout and engine settings handed to every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSettings {
    /// One level of indentation.
    pub indent_unit: String,
    pub newline: String,
    /// Memoize classification queries.
    pub use_cache: bool,
}

impl Default for PassSettings {
    fn default() -> Self {
        PassSettings {
            indent_unit: "    ".to_string(),
            newline: "\n".to_string(),
            use_cache: false,
        }
    }
}
