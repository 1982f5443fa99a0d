//! Indentation
//!
//!     Recomputes the leading whitespace of every line from the nesting of `{`, `(` and `[`.
//!
//!     A line that opens brackets without closing them indents the following lines by one
//!     level, however many brackets it opened. The bracket that gets the level is the last one
//!     opened on the line; when it closes, the level goes away. A line starting with closers
//!     is dedented by the levels those closers release, which is known before the line is
//!     written by previewing the indent with a negative delta.
//!
//!     Interior lines of doc comments starting with `*` are realigned under the opening `/**`.
//!     Strings, heredocs, inline HTML and plain block comments keep their text.

use crate::php::engine::{PassContext, PassSettings};
use crate::php::passes::Pass;
use crate::php::token::{Token, TokenKind};

#[derive(Debug, Clone, Default)]
pub struct Reindent {
    settings: PassSettings,
}

impl Reindent {
    pub fn new(settings: PassSettings) -> Self {
        Reindent { settings }
    }
}

/// Bracket nesting while walking the stream.
#[derive(Debug, Default)]
struct Nesting {
    /// One entry per open bracket: does it hold an indent level?
    open: Vec<bool>,
    /// Brackets opened on the current line and still open.
    line_openers: usize,
}

impl Nesting {
    fn open(&mut self) {
        self.open.push(false);
        self.line_openers += 1;
    }

    /// Returns whether the closed bracket held a level.
    fn close(&mut self) -> bool {
        match self.open.pop() {
            Some(true) => true,
            Some(false) => {
                self.line_openers = self.line_openers.saturating_sub(1);
                false
            }
            None => false,
        }
    }

    /// At a line break: returns whether the finished line added a level.
    fn end_line(&mut self) -> bool {
        let opened = self.line_openers > 0;
        if opened {
            if let Some(top) = self.open.last_mut() {
                *top = true;
            }
        }
        self.line_openers = 0;
        opened
    }

    /// Levels released by `closers` consecutive closing brackets.
    fn released_by(&self, closers: usize) -> usize {
        self.open.iter().rev().take(closers).filter(|held| **held).count()
    }
}

impl Pass for Reindent {
    fn format(&self, source: &str) -> String {
        let mut ctx = PassContext::new(source, &self.settings);
        let mut nesting = Nesting::default();

        while let Some(token) = ctx.next_token() {
            match token.kind {
                TokenKind::Quote => {
                    ctx.out.append(&token.text);
                    ctx.copy_until(TokenKind::Quote);
                }
                TokenKind::CurlyOpen | TokenKind::ParenOpen | TokenKind::BracketOpen => {
                    nesting.open();
                    ctx.out.append(&token.text);
                }
                TokenKind::CurlyClose | TokenKind::ParenClose | TokenKind::BracketClose => {
                    if nesting.close() {
                        ctx.out.adjust_indent(-1);
                    }
                    ctx.out.append(&token.text);
                }
                TokenKind::Whitespace if token.has_newline() => {
                    if nesting.end_line() {
                        ctx.out.adjust_indent(1);
                    }
                    line_break(&mut ctx, &nesting, &token);
                }
                TokenKind::DocComment => {
                    let indent = ctx.out.indent_string(0);
                    ctx.out.append(&realign_doc_comment(&token.text, &indent));
                }
                _ => ctx.out.append(&token.text),
            }
        }

        ctx.finish()
    }
}

/// Emit the line breaks of a whitespace token followed by the indent of the next line.
fn line_break(ctx: &mut PassContext, nesting: &Nesting, token: &Token) {
    let breaks: String = token.text.chars().filter(|c| !matches!(c, ' ' | '\t')).collect();
    ctx.out.append(&breaks);
    if ctx.stream.is_exhausted() {
        return;
    }

    let released = nesting.released_by(leading_closers(ctx));
    let indent = ctx.out.indent_string(-(released as isize));
    ctx.out.append(&indent);
}

fn leading_closers(ctx: &PassContext) -> usize {
    (1..)
        .map_while(|offset| ctx.stream.peek(offset))
        .take_while(|token| {
            matches!(
                token.kind,
                TokenKind::CurlyClose | TokenKind::ParenClose | TokenKind::BracketClose
            )
        })
        .count()
}

fn realign_doc_comment(text: &str, indent: &str) -> String {
    let mut lines = text.split('\n');
    let mut aligned = lines.next().unwrap_or_default().to_string();
    for line in lines {
        aligned.push('\n');
        let body = line.trim_start_matches([' ', '\t']);
        if body.starts_with('*') {
            aligned.push_str(indent);
            aligned.push(' ');
            aligned.push_str(body);
        } else {
            aligned.push_str(line);
        }
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(source: &str) -> String {
        Reindent::default().format(source)
    }

    #[test]
    fn test_nested_blocks() {
        let source = "class A\n{\nfunction f()\n{\nreturn [\n1,\n2,\n];\n}\n}";
        let expected = "class A\n{\n    function f()\n    {\n        return [\n            1,\n            2,\n        ];\n    }\n}";
        assert_eq!(format(source), expected);
    }

    #[test]
    fn test_several_openers_add_one_level() {
        let source = "foo([\n  1,\n  ]);";
        assert_eq!(format(source), "foo([\n    1,\n]);");

        let source = "foo(function () {\nbar();\n});";
        assert_eq!(format(source), "foo(function () {\n    bar();\n});");
    }

    #[test]
    fn test_else_line() {
        let source = "if ($a) {\n  a();\n  } else {\n b();\n}";
        assert_eq!(format(source), "if ($a) {\n    a();\n} else {\n    b();\n}");
    }

    #[test]
    fn test_blank_lines_lose_trailing_whitespace() {
        assert_eq!(format("{\na();\n   \t\nb();\n}\n"), "{\n    a();\n\n    b();\n}\n");
    }

    #[test]
    fn test_doc_comment_realigned() {
        let source = "{\n/**\n      * Doc.\n  */\nfunction f();\n}";
        assert_eq!(format(source), "{\n    /**\n     * Doc.\n     */\n    function f();\n}");
    }

    #[test]
    fn test_literals_keep_their_text() {
        let source = "{\n$a = 'x\n   y';\n$b = <<<EOT\n  {\nEOT;\n}";
        assert_eq!(format(source), "{\n    $a = 'x\n   y';\n    $b = <<<EOT\n  {\nEOT;\n}");
    }

    #[test]
    fn test_uses_configured_unit() {
        let pass = Reindent::new(PassSettings {
            indent_unit: "\t".to_string(),
            ..PassSettings::default()
        });
        assert_eq!(pass.format("{\na();\n}"), "{\n\ta();\n}");
    }

    #[test]
    fn test_stray_closer_does_not_underflow() {
        assert_eq!(format("}\n}\na();"), "}\n}\na();");
    }

    #[test]
    fn test_idempotent() {
        let once = format("class A {\nfunction f() {\nif ($a) {\nb([\n1,\n]);\n}\n}\n}\n");
        assert_eq!(format(&once), once);
    }
}
