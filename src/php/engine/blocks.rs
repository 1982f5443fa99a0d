//! Block-copy primitives
//!
//!     A [PassContext] bundles the token stream and output builder of one `format` call, and
//!     carries the primitives that move whole regions from one to the other. Every primitive
//!     consumes tokens through [TokenStream::advance], so the cursor and the classification
//!     cache stay consistent no matter how a pass mixes them with its own token loop.
//!
//!     The context writes line breaks in the line ending the source already uses, judged by
//!     its first line break. The configured newline applies only to sources without one.
//!
//!     When the stream ends before the region does, a primitive keeps everything it collected,
//!     reports "not found" through its return value and logs the region at debug level. No
//!     closing delimiter is ever invented.

use crate::php::engine::{OutputBuilder, PassSettings, TokenStream};
use crate::php::lexing::{tokenize, tokenize_fragment};
use crate::php::token::{Token, TokenKind};
use tracing::debug;

/// Everything mutable during one pass invocation.
#[derive(Debug)]
pub struct PassContext {
    pub stream: TokenStream,
    pub out: OutputBuilder,
}

impl PassContext {
    /// Tokenize `source` and start from a clean cursor, cache and output.
    pub fn new(source: &str, settings: &PassSettings) -> Self {
        Self::build(tokenize(source), source, settings)
    }

    /// Like [PassContext::new], for code cut out of a larger file (the interior of a nested
    /// region). The fragment is lexed as code even if it contains `<?`.
    pub fn fragment(source: &str, settings: &PassSettings) -> Self {
        Self::build(tokenize_fragment(source), source, settings)
    }

    fn build(tokens: Vec<Token>, source: &str, settings: &PassSettings) -> Self {
        let newline = line_ending(source).unwrap_or(settings.newline.as_str());
        PassContext {
            stream: TokenStream::new(tokens).with_cache(settings.use_cache),
            out: OutputBuilder::new(settings.indent_unit.clone(), newline),
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.stream.advance()
    }

    /// Emit tokens up to and including the first one of `kind`.
    pub fn copy_until(&mut self, kind: TokenKind) -> bool {
        while let Some(token) = self.stream.advance() {
            self.out.append(&token.text);
            if token.kind == kind {
                return true;
            }
        }
        debug!(?kind, "stream ended before closing token");
        false
    }

    /// Emit tokens up to the first one whose kind is in `kinds` and return that token
    /// without emitting it. The cursor rests on the returned token.
    pub fn copy_and_stop_at(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        while let Some(token) = self.stream.advance() {
            if kinds.contains(&token.kind) {
                return Some(token);
            }
            self.out.append(&token.text);
        }
        debug!(?kinds, "stream ended before stop token");
        None
    }

    /// Emit a bracket-balanced region whose opener the caller has already emitted, up to and
    /// including the matching `close`.
    pub fn copy_balanced_block(&mut self, open: TokenKind, close: TokenKind) -> bool {
        let mut depth = 1usize;
        while let Some(token) = self.stream.advance() {
            self.out.append(&token.text);
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
        }
        debug!(?open, depth, "unbalanced block at end of stream");
        false
    }

    /// Collect the interior of a balanced region whose opener the caller has already emitted,
    /// emit `transform(interior)` and then the closer, if one was found.
    pub fn copy_nested_with<F>(&mut self, open: TokenKind, close: TokenKind, transform: F) -> bool
    where
        F: FnOnce(&str) -> String,
    {
        let mut depth = 1usize;
        let mut interior = String::new();
        let mut closer = None;
        while let Some(token) = self.stream.advance() {
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    closer = Some(token);
                    break;
                }
            }
            interior.push_str(&token.text);
        }

        self.out.append(&transform(&interior));
        match closer {
            Some(token) => {
                self.out.append(&token.text);
                true
            }
            None => {
                debug!(?open, depth, "unbalanced nested region at end of stream");
                false
            }
        }
    }

    /// Collect text up to and including the first token of `kind` without emitting it.
    pub fn accumulate_until(&mut self, kind: TokenKind) -> (String, bool) {
        let mut text = String::new();
        while let Some(token) = self.stream.advance() {
            text.push_str(&token.text);
            if token.kind == kind {
                return (text, true);
            }
        }
        debug!(?kind, "stream ended before closing token");
        (text, false)
    }

    pub fn finish(self) -> String {
        self.out.into_string()
    }
}

fn line_ending(source: &str) -> Option<&'static str> {
    let at = source.find('\n')?;
    Some(if source[..at].ends_with('\r') { "\r\n" } else { "\n" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(source: &str) -> PassContext {
        PassContext::new(source, &PassSettings::default())
    }

    /// Emit tokens until (and including) the first of `kind`, as a pass would.
    fn consume_through(ctx: &mut PassContext, kind: TokenKind) {
        while let Some(token) = ctx.next_token() {
            ctx.out.append(&token.text);
            if token.kind == kind {
                return;
            }
        }
    }

    #[test]
    fn test_copy_until_includes_terminator() {
        let mut ctx = context("a b; c");
        assert!(ctx.copy_until(TokenKind::Semicolon));
        assert_eq!(ctx.out.as_str(), "a b;");
        assert_eq!(ctx.stream.current().map(|t| t.kind), Some(TokenKind::Semicolon));
    }

    #[test]
    fn test_copy_until_unterminated_keeps_text() {
        let mut ctx = context("a b");
        assert!(!ctx.copy_until(TokenKind::Semicolon));
        assert_eq!(ctx.finish(), "a b");
    }

    #[test]
    fn test_copy_and_stop_at_returns_stop_token() {
        let mut ctx = context("class Foo extends Bar {}");
        let stop = ctx.copy_and_stop_at(&[TokenKind::CurlyOpen, TokenKind::Semicolon]);
        assert_eq!(stop.map(|t| t.kind), Some(TokenKind::CurlyOpen));
        assert_eq!(ctx.out.as_str(), "class Foo extends Bar ");
        assert_eq!(ctx.stream.current().map(|t| t.kind), Some(TokenKind::CurlyOpen));
    }

    #[test]
    fn test_copy_balanced_block_nested() {
        let mut ctx = context("f(a, (b), (c(d))) + 1");
        consume_through(&mut ctx, TokenKind::ParenOpen);
        assert!(ctx.copy_balanced_block(TokenKind::ParenOpen, TokenKind::ParenClose));
        assert_eq!(ctx.out.as_str(), "f(a, (b), (c(d)))");
    }

    #[test]
    fn test_copy_balanced_block_unterminated() {
        let mut ctx = context("f(a, (b)");
        consume_through(&mut ctx, TokenKind::ParenOpen);
        assert!(!ctx.copy_balanced_block(TokenKind::ParenOpen, TokenKind::ParenClose));
        assert_eq!(ctx.finish(), "f(a, (b)");
    }

    #[test]
    fn test_copy_nested_with_transforms_interior_only() {
        let mut ctx = context("f( a(b) ) ;");
        consume_through(&mut ctx, TokenKind::ParenOpen);
        assert!(ctx.copy_nested_with(TokenKind::ParenOpen, TokenKind::ParenClose, |inner| {
            assert_eq!(inner, " a(b) ");
            inner.to_uppercase()
        }));
        assert_eq!(ctx.out.as_str(), "f( A(B) )");
    }

    #[test]
    fn test_copy_nested_with_missing_closer() {
        let mut ctx = context("f( a");
        consume_through(&mut ctx, TokenKind::ParenOpen);
        assert!(!ctx.copy_nested_with(TokenKind::ParenOpen, TokenKind::ParenClose, |inner| {
            inner.trim().to_string()
        }));
        assert_eq!(ctx.finish(), "f(a");
    }

    #[test]
    fn test_line_ending_follows_source() {
        assert_eq!(context("a;\r\nb;\n").out.newline(), "\r\n");
        assert_eq!(context("a;\nb;\r\n").out.newline(), "\n");

        let settings = PassSettings {
            newline: "\r\n".to_string(),
            ..PassSettings::default()
        };
        assert_eq!(PassContext::new("a; b;", &settings).out.newline(), "\r\n");
        assert_eq!(PassContext::new("a;\nb;", &settings).out.newline(), "\n");
    }

    #[test]
    fn test_fragment_is_lexed_as_code() {
        let mut ctx = PassContext::fragment("'<?' . $a", &PassSettings::default());
        assert_eq!(ctx.next_token().map(|t| t.kind), Some(TokenKind::ConstantString));
    }

    #[test]
    fn test_accumulate_until_does_not_emit() {
        let mut ctx = context("a b; c");
        let (text, found) = ctx.accumulate_until(TokenKind::Semicolon);
        assert!(found);
        assert_eq!(text, "a b;");
        assert!(ctx.out.is_empty());
    }
}
