//! Blank line collapsing
//!
//!     Two or more consecutive blank lines become one. Only whitespace tokens are rewritten, so
//!     blank lines inside strings, heredocs, comments and inline HTML are kept. The kept blank
//!     line uses the source's own line ending.

use crate::php::engine::{PassContext, PassSettings};
use crate::php::passes::Pass;
use crate::php::token::TokenKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// A line break followed by two or more (possibly indented) blank lines.
static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n){2,}").expect("valid blank line pattern"));

#[derive(Debug, Clone, Default)]
pub struct EliminateDuplicatedEmptyLines {
    settings: PassSettings,
}

impl EliminateDuplicatedEmptyLines {
    pub fn new(settings: PassSettings) -> Self {
        EliminateDuplicatedEmptyLines { settings }
    }
}

impl Pass for EliminateDuplicatedEmptyLines {
    fn format(&self, source: &str) -> String {
        let mut ctx = PassContext::new(source, &self.settings);
        let collapsed = format!("{nl}{nl}", nl = ctx.out.newline());

        while let Some(token) = ctx.next_token() {
            match token.kind {
                TokenKind::Quote => {
                    ctx.out.append(&token.text);
                    ctx.copy_until(TokenKind::Quote);
                }
                TokenKind::Whitespace => {
                    let text = BLANK_RUN.replace_all(&token.text, collapsed.as_str());
                    ctx.out.append(&text);
                }
                _ => ctx.out.append(&token.text),
            }
        }

        ctx.finish()
    }
}
