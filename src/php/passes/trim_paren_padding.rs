//! Parenthesis padding
//!
//!     `foo( $a, ( $b ) )` becomes `foo($a, ($b))`. The interior of every parenthesized region
//!     is formatted by this same pass and spliced back between the original delimiters, so
//!     nested regions are trimmed from the inside out.
//!
//!     Line layout survives: padding that ends a line, or that indents a closing paren placed
//!     on its own line, is kept.
//!
//!     Sub-formatting stops [MAX_NESTING] levels deep; regions below that are copied verbatim.

use crate::php::engine::{PassContext, PassSettings};
use crate::php::passes::Pass;
use crate::php::token::TokenKind;

/// Deepest parenthesized level whose interior is still reformatted.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct TrimParenPadding {
    settings: PassSettings,
}

impl TrimParenPadding {
    pub fn new(settings: PassSettings) -> Self {
        TrimParenPadding { settings }
    }

    fn format_at(&self, mut ctx: PassContext, depth: usize) -> String {
        while let Some(token) = ctx.next_token() {
            match token.kind {
                TokenKind::Quote => {
                    ctx.out.append(&token.text);
                    ctx.copy_until(TokenKind::Quote);
                }
                TokenKind::ParenOpen if depth < MAX_NESTING => {
                    ctx.out.append(&token.text);
                    ctx.copy_nested_with(TokenKind::ParenOpen, TokenKind::ParenClose, |inner| {
                        let nested = PassContext::fragment(inner, &self.settings);
                        trim_padding(&self.format_at(nested, depth + 1))
                    });
                }
                TokenKind::ParenOpen => {
                    ctx.out.append(&token.text);
                    ctx.copy_balanced_block(TokenKind::ParenOpen, TokenKind::ParenClose);
                }
                _ => ctx.out.append(&token.text),
            }
        }

        ctx.finish()
    }
}

impl Pass for TrimParenPadding {
    fn format(&self, source: &str) -> String {
        self.format_at(PassContext::new(source, &self.settings), 0)
    }
}

fn trim_padding(inner: &str) -> String {
    let inner = inner.trim_start_matches([' ', '\t']);
    let trimmed = inner.trim_end_matches([' ', '\t']);
    if trimmed.ends_with('\n') {
        inner.to_string()
    } else {
        trimmed.to_string()
    }
}
