//! Tokenizer
//!
//!     Turns PHP source into the token sequence every pass works on. The raw tokenization is
//!     done by the logos lexer derived on [TokenKind]; this driver adds the few context
//!     sensitive pieces a regular lexer cannot express:
//!         - text before the first open tag, and after a `?>` close tag up to the next `<?`,
//!           is one InlineHtml token;
//!         - block comments starting with `/**` become DocComment tokens;
//!         - double quoted strings are closed by the driver, skipping over `{$ ... }` groups
//!           that contain quotes of their own. Strings with interpolation are split into a
//!           Quote, the literal runs (EncapsedText), the interpolated variables and `{ ... }`
//!           groups, and a closing Quote, so passes can copy them through without ever
//!           looking inside;
//!         - bytes the lexer cannot classify become Unknown tokens.
//!
//!     Source without any open tag is lexed as code, so fragments can be formatted on their
//!     own. [tokenize_fragment] always lexes as code; it is meant for the interiors of nested
//!     regions that sub-formatters hand back to a pass.
//!
//!     The tokenization is lossless: concatenating the texts of the returned tokens always
//!     reproduces the input.

use crate::php::token::{Token, TokenKind};
use logos::Logos;

/// Tokenize a PHP file into kind + text tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    match source.find("<?") {
        Some(start) => {
            if start > 0 {
                tokens.push(Token::new(TokenKind::InlineHtml, &source[..start]));
            }
            lex_code(&source[start..], &mut tokens);
        }
        None => lex_code(source, &mut tokens),
    }
    tokens
}

/// Tokenize a piece of code taken from inside a file, with no HTML context.
pub fn tokenize_fragment(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    lex_code(source, &mut tokens);
    tokens
}

/// Concatenate token texts back into source.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.text.as_str()).collect()
}

fn lex_code(source: &str, tokens: &mut Vec<Token>) {
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        match result {
            Ok(TokenKind::CloseTag) => {
                tokens.push(Token::new(TokenKind::CloseTag, text));
                let html = inline_html_prefix(lexer.remainder());
                if !html.is_empty() {
                    tokens.push(Token::new(TokenKind::InlineHtml, html));
                    lexer.bump(html.len());
                }
            }
            Ok(TokenKind::Quote) => match closing_quote(lexer.remainder().as_bytes()) {
                Some(close) => {
                    let start = lexer.span().start;
                    let literal = &source[start..lexer.span().end + close + 1];
                    lexer.bump(close + 1);
                    push_double_quoted(literal, tokens);
                }
                None => tokens.push(Token::new(TokenKind::Quote, text)),
            },
            Ok(TokenKind::Comment) if is_doc_comment(text) => {
                tokens.push(Token::new(TokenKind::DocComment, text));
            }
            Ok(kind) => tokens.push(Token::new(kind, text)),
            Err(()) => push_unknown(text, tokens),
        }
    }
}

fn inline_html_prefix(rest: &str) -> &str {
    let end = rest.find("<?").unwrap_or(rest.len());
    &rest[..end]
}

fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && text.len() > 4
}

fn push_unknown(text: &str, tokens: &mut Vec<Token>) {
    // Merge runs of unclassifiable input into a single token
    if let Some(last) = tokens.last_mut() {
        if last.kind == TokenKind::Unknown {
            last.text.push_str(text);
            return;
        }
    }
    tokens.push(Token::new(TokenKind::Unknown, text));
}

/// Emit a complete double quoted string, splitting it if it interpolates.
fn push_double_quoted(text: &str, tokens: &mut Vec<Token>) {
    let body = &text[1..text.len() - 1];
    let parts = split_interpolation(body);

    if parts.iter().all(|part| part.kind == TokenKind::EncapsedText) {
        tokens.push(Token::new(TokenKind::ConstantString, text));
        return;
    }

    tokens.push(Token::new(TokenKind::Quote, "\""));
    tokens.extend(parts);
    tokens.push(Token::new(TokenKind::Quote, "\""));
}

/// Split the body of a double quoted string into literal runs and interpolations.
///
/// Recognized interpolations are `$name` and `{$ ... }`; everything else, including
/// escaped characters and `${...}`, stays part of the literal run.
fn split_interpolation(body: &str) -> Vec<Token> {
    let bytes = body.as_bytes();
    let mut parts = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1).is_some_and(|b| is_name_start(*b)) => {
                flush_literal(body, literal_start, i, &mut parts);
                let end = name_end(bytes, i + 1);
                parts.push(Token::new(TokenKind::Variable, &body[i..end]));
                i = end;
                literal_start = end;
            }
            b'{' if bytes.get(i + 1) == Some(&b'$') => match matching_brace(bytes, i) {
                Some(close) => {
                    flush_literal(body, literal_start, i, &mut parts);
                    parts.push(Token::new(TokenKind::CurlyOpen, "{"));
                    lex_code(&body[i + 1..close], &mut parts);
                    parts.push(Token::new(TokenKind::CurlyClose, "}"));
                    i = close + 1;
                    literal_start = i;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    flush_literal(body, literal_start, body.len(), &mut parts);
    parts
}

fn flush_literal(body: &str, start: usize, end: usize, parts: &mut Vec<Token>) {
    if start < end {
        parts.push(Token::new(TokenKind::EncapsedText, &body[start..end]));
    }
}

fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn name_end(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

/// Offset of the `"` closing a double quoted string, within the text after its opener.
fn closing_quote(rest: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            b'{' if rest.get(i + 1) == Some(&b'$') => {
                i = matching_brace(rest, i).map_or(i + 1, |close| close + 1);
            }
            _ => i += 1,
        }
    }
    None
}

/// The `}` matching the `{` at `open`. Quoted strings inside the group are skipped.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'\'' | b'"') => i = skip_quoted(bytes, i + 1, quote)?,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the unescaped `quote` closing a string whose body starts at `from`.
fn skip_quoted(bytes: &[u8], from: usize, quote: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i),
            _ => i += 1,
        }
    }
    None
}
