//! Token model shared by the tokenizer, the rewriting engine and every pass.
//!
//!     A token is a kind plus the literal text it was produced from. Kinds are produced by
//!     the logos lexer (see [lexing](crate::php::lexing)); a handful of kinds are synthetic
//!     and only ever created by the tokenizer driver (inline HTML, doc comments, the pieces
//!     of an interpolated string, unknown input).
//!
//! Matching
//!
//!     Passes ask questions such as "is the previous significant token `=` or `return`?".
//!     A [Target] answers those in one of three ways:
//!         - exact equality of kind and text;
//!         - membership of the token's kind in a set of kinds;
//!         - membership of the token's text in a set of texts, for punctuation tokens only.
//!     Punctuation tokens are the ones whose kind is conventionally identified by their single
//!     character of text (`{`, `;`, `=`, a lone `?` ...), so the text form and the kind form of
//!     a query agree for them.

use logos::{Lexer, Logos};
use serde::Serialize;

/// All token kinds produced while lexing PHP source.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TokenKind {
    // Tags
    #[regex(r"<\?php|<\?=|<\?")]
    OpenTag,
    #[token("?>")]
    CloseTag,
    /// Text outside of `<?php ... ?>`.
    InlineHtml,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,
    #[token("//", line_comment)]
    #[token("#", line_comment)]
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    Comment,
    /// `/** ... */`, split from block comments by the tokenizer driver.
    DocComment,

    // Literals
    #[regex(r"'([^'\\]|\\.|\\\n)*'")]
    ConstantString,
    /// Opens a double quoted string. The tokenizer driver finds the closing quote; it stays
    /// a lone Quote only when the string is unterminated or delimits interpolation.
    #[token("\"")]
    Quote,
    /// Literal run inside an interpolated string.
    EncapsedText,
    #[regex(r#"<<<[ \t]*([A-Za-z_][A-Za-z0-9_]*|'[A-Za-z_][A-Za-z0-9_]*'|"[A-Za-z_][A-Za-z0-9_]*")\r?\n"#, heredoc_body)]
    Heredoc,
    #[regex(r"[0-9][0-9_]*(\.[0-9_]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    Number,
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    // Keywords the passes dispatch on
    #[token("class", ignore(ascii_case))]
    Class,
    #[token("interface", ignore(ascii_case))]
    Interface,
    #[token("trait", ignore(ascii_case))]
    Trait,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("return", ignore(ascii_case))]
    Return,
    #[token("use", ignore(ascii_case))]
    Use,
    #[token("static", ignore(ascii_case))]
    Static,

    /// Identifiers and every other keyword, including namespaced names.
    #[regex(r"\\?[A-Za-z_][A-Za-z0-9_]*(\\[A-Za-z_][A-Za-z0-9_]*)*")]
    Name,

    // Structural punctuation
    #[token("{")]
    CurlyOpen,
    #[token("}")]
    CurlyClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    /// `[`, or the `#[` that opens an attribute.
    #[token("[")]
    #[token("#[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equal,
    #[token("=>")]
    DoubleArrow,
    #[token("->")]
    #[token("?->")]
    ObjectOperator,
    #[token("::")]
    DoubleColon,

    #[token("==")]
    #[token("===")]
    #[token("!=")]
    #[token("!==")]
    #[token("<>")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token("<=>")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("**")]
    #[token(".")]
    #[token("...")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("!")]
    #[token("&&")]
    #[token("||")]
    #[token("??")]
    #[token("?")]
    #[token(":")]
    #[token("@")]
    #[token("$")]
    #[token("\\")]
    #[token("`")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token(".=")]
    #[token("%=")]
    #[token("**=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<")]
    #[token(">>")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("??=")]
    #[token("++")]
    #[token("--")]
    Operator,

    /// Input the lexer could not classify; kept so no text is ever dropped.
    Unknown,
}

/// Consumes a `//` or `#` comment up to the end of the line or a `?>`, whichever is first.
fn line_comment(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let line_end = rest.find(['\r', '\n']).unwrap_or(rest.len());
    let end = rest[..line_end].find("?>").unwrap_or(line_end);
    lex.bump(end);
    true
}

/// Consumes a heredoc/nowdoc body up to and including its closing label.
///
/// An unterminated heredoc swallows the rest of the input.
fn heredoc_body(lex: &mut Lexer<TokenKind>) -> bool {
    let label = heredoc_label(lex.slice());
    let end = closing_label_end(lex.remainder(), label);
    lex.bump(end);
    true
}

fn heredoc_label(opener: &str) -> &str {
    opener
        .trim_start_matches("<<<")
        .trim_start_matches([' ', '\t'])
        .trim_end_matches(['\r', '\n'])
        .trim_matches(['"', '\''])
}

fn closing_label_end(rest: &str, label: &str) -> usize {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let body = line.trim_start_matches([' ', '\t']);
        if let Some(after) = body.strip_prefix(label) {
            if !after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
                return offset + (line.len() - body.len()) + label.len();
            }
        }
        offset += line.len();
    }
    rest.len()
}

impl TokenKind {
    /// Kinds skipped by default when scanning for the neighbouring token.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::DocComment)
    }

    /// Single-character structural punctuation, identified by its text.
    fn is_structural_punctuation(&self) -> bool {
        matches!(
            self,
            TokenKind::CurlyOpen
                | TokenKind::CurlyClose
                | TokenKind::ParenOpen
                | TokenKind::ParenClose
                | TokenKind::BracketOpen
                | TokenKind::BracketClose
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Equal
                | TokenKind::Quote
        )
    }
}

/// A classified lexical unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// Punctuation tokens: structural single characters and single-character operators.
    pub fn is_punctuation(&self) -> bool {
        self.kind.is_structural_punctuation()
            || (self.kind == TokenKind::Operator && self.text.chars().count() == 1)
    }

    pub fn has_newline(&self) -> bool {
        self.text.contains('\n')
    }
}

/// What a navigation query is looking for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Kind and text must both be equal.
    Exact(Token),
    /// A single kind.
    Kind(TokenKind),
    /// Any of these kinds.
    AnyKind(Vec<TokenKind>),
    /// Any of these texts; only punctuation tokens are compared by text.
    AnyText(Vec<String>),
}

impl Target {
    pub fn any_kind(kinds: &[TokenKind]) -> Self {
        Target::AnyKind(kinds.to_vec())
    }

    pub fn any_text(texts: &[&str]) -> Self {
        Target::AnyText(texts.iter().map(|t| t.to_string()).collect())
    }

    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Target::Exact(expected) => expected == token,
            Target::Kind(kind) => token.kind == *kind,
            Target::AnyKind(kinds) => kinds.contains(&token.kind),
            Target::AnyText(texts) => token.is_punctuation() && texts.iter().any(|t| *t == token.text),
        }
    }
}

impl From<TokenKind> for Target {
    fn from(kind: TokenKind) -> Self {
        Target::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_target_requires_kind_and_text() {
        let target = Target::Exact(Token::new(TokenKind::Name, "Foo"));
        assert!(target.matches(&Token::new(TokenKind::Name, "Foo")));
        assert!(!target.matches(&Token::new(TokenKind::Name, "Bar")));
        assert!(!target.matches(&Token::new(TokenKind::Variable, "Foo")));
    }

    #[test]
    fn test_kind_set_target() {
        let target = Target::any_kind(&[TokenKind::Return, TokenKind::DoubleArrow]);
        assert!(target.matches(&Token::new(TokenKind::Return, "RETURN")));
        assert!(target.matches(&Token::new(TokenKind::DoubleArrow, "=>")));
        assert!(!target.matches(&Token::new(TokenKind::Equal, "=")));
    }

    #[test]
    fn test_text_set_only_matches_punctuation() {
        let target = Target::any_text(&["=", "?", "return"]);
        assert!(target.matches(&Token::new(TokenKind::Equal, "=")));
        assert!(target.matches(&Token::new(TokenKind::Operator, "?")));
        // `return` is a keyword token, never compared by text
        assert!(!target.matches(&Token::new(TokenKind::Return, "return")));
        // multi-character operators are not punctuation
        assert!(!Target::any_text(&["=="]).matches(&Token::new(TokenKind::Operator, "==")));
    }

    #[test]
    fn test_heredoc_label_variants() {
        assert_eq!(heredoc_label("<<<EOT\n"), "EOT");
        assert_eq!(heredoc_label("<<< \"EOT\"\r\n"), "EOT");
        assert_eq!(heredoc_label("<<<'RAW'\n"), "RAW");
    }

    #[test]
    fn test_closing_label_end() {
        let rest = "line {\n  EOTX\nEOT;\n";
        assert_eq!(closing_label_end(rest, "EOT"), "line {\n  EOTX\nEOT".len());
        assert_eq!(closing_label_end("never closed", "EOT"), "never closed".len());
    }
}
