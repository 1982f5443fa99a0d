//! Brace relocation
//!
//!     Puts the opening brace of named declarations on its own line:
//!
//!         class Foo {            class Foo
//!         }              =>      {
//!                                }
//!
//!     Types (`class`, `interface`, `trait`) and functions are handled, with two differences:
//!         - a type header is copied until its brace, and the brace is moved unless the source
//!           already has a line break right before it;
//!         - a function header keeps its brace in place if the header spans several lines, and
//!           a function used as an expression (closures) is left alone entirely.
//!
//!     In both cases the header loop stops on the brace and steps back, so the brace itself is
//!     emitted by the main loop together with the indent bookkeeping. Everything else is copied
//!     through unchanged.

use crate::php::engine::{Direction, IgnoreList, PassContext, PassSettings, TokenStream};
use crate::php::passes::Pass;
use crate::php::token::{Target, Token, TokenKind};
use tracing::trace;

/// Significant tokens after which `function` starts a closure rather than a declaration.
const EXPRESSION_LEADS: [TokenKind; 8] = [
    TokenKind::DoubleArrow,
    TokenKind::Return,
    TokenKind::Equal,
    TokenKind::ParenOpen,
    TokenKind::Comma,
    TokenKind::BracketOpen,
    TokenKind::Operator,
    TokenKind::Use,
];

const MEMBER_ACCESS: [TokenKind; 2] = [TokenKind::DoubleColon, TokenKind::ObjectOperator];

#[derive(Debug, Clone, Default)]
pub struct CurlyOpenNextLine {
    settings: PassSettings,
}

impl CurlyOpenNextLine {
    pub fn new(settings: PassSettings) -> Self {
        CurlyOpenNextLine { settings }
    }
}

impl Pass for CurlyOpenNextLine {
    fn format(&self, source: &str) -> String {
        let mut ctx = PassContext::new(source, &self.settings);

        while let Some(token) = ctx.next_token() {
            match token.kind {
                TokenKind::Quote => {
                    ctx.out.append(&token.text);
                    ctx.copy_until(TokenKind::Quote);
                }
                TokenKind::Class | TokenKind::Interface | TokenKind::Trait => {
                    type_declaration(&mut ctx, &token);
                }
                TokenKind::Function => callable_declaration(&mut ctx, &token),
                TokenKind::CurlyOpen => {
                    ctx.out.append(&token.text);
                    ctx.out.adjust_indent(1);
                }
                TokenKind::CurlyClose => {
                    ctx.out.adjust_indent(-1);
                    ctx.out.append(&token.text);
                }
                _ => ctx.out.append(&token.text),
            }
        }

        ctx.finish()
    }
}

fn type_declaration(ctx: &mut PassContext, keyword: &Token) {
    ctx.out.append(&keyword.text);
    // `Foo::class`, `$node->class`
    if ctx
        .stream
        .token_is(Target::any_kind(&MEMBER_ACCESS), Direction::Left, &[])
    {
        return;
    }

    loop {
        let stop = ctx.copy_and_stop_at(&[
            TokenKind::CurlyOpen,
            TokenKind::ParenOpen,
            TokenKind::Quote,
            TokenKind::Semicolon,
        ]);
        match stop {
            Some(token) if token.kind == TokenKind::ParenOpen => {
                ctx.out.append(&token.text);
                ctx.copy_balanced_block(TokenKind::ParenOpen, TokenKind::ParenClose);
            }
            Some(token) if token.kind == TokenKind::Quote => {
                ctx.out.append(&token.text);
                ctx.copy_until(TokenKind::Quote);
            }
            Some(token) if token.kind == TokenKind::CurlyOpen => {
                if !ctx.stream.has_ln_before() {
                    trace!(keyword = %keyword.text, "moving type brace to its own line");
                    break_before_brace(ctx);
                }
                ctx.stream.step_back();
                return;
            }
            Some(token) => {
                ctx.out.append(&token.text);
                return;
            }
            None => return,
        }
    }
}

fn callable_declaration(ctx: &mut PassContext, keyword: &Token) {
    ctx.out.append(&keyword.text);
    if is_expression(&mut ctx.stream) {
        return;
    }

    let mut touched_ln = false;
    while let Some(token) = ctx.next_token() {
        match token.kind {
            TokenKind::Whitespace if token.has_newline() => {
                touched_ln = true;
                ctx.out.append(&token.text);
            }
            TokenKind::Quote => {
                ctx.out.append(&token.text);
                ctx.copy_until(TokenKind::Quote);
            }
            TokenKind::CurlyOpen => {
                if !touched_ln {
                    trace!("moving function brace to its own line");
                    break_before_brace(ctx);
                }
                ctx.stream.step_back();
                return;
            }
            TokenKind::Semicolon => {
                ctx.out.append(&token.text);
                return;
            }
            _ => ctx.out.append(&token.text),
        }
    }
}

/// Is the `function` under the cursor a closure (or a member merely named `function`)?
fn is_expression(stream: &mut TokenStream) -> bool {
    if stream.useful_token_is(Target::any_kind(&MEMBER_ACCESS), Direction::Left) {
        return true;
    }
    let leads = Target::any_kind(&EXPRESSION_LEADS);
    if stream.useful_token_is(leads.clone(), Direction::Left) {
        return !stream
            .left_useful_index()
            .is_some_and(|idx| ends_statement_head(stream, idx));
    }

    // `static function` is a closure only when the `static` itself follows an expression lead
    if stream.useful_token_is(TokenKind::Static, Direction::Left) {
        return stream
            .left_useful_index()
            .is_some_and(|idx| stream.matches_at(idx, &leads, Direction::Left, &IgnoreList::useful()));
    }
    false
}

/// A `:` that closes `case ...:`, `default:`, a label or an alternative-syntax header.
///
/// Scans left from the colon at `idx` within its statement: a `?` at the same bracket level
/// makes it a ternary, an enclosing `(` or `[` makes it part of an expression (named
/// arguments among others).
fn ends_statement_head(stream: &TokenStream, idx: usize) -> bool {
    if stream.get(idx).map_or(true, |token| token.text != ":") {
        return false;
    }
    let mut depth = 0usize;
    for token in stream.tokens()[..idx].iter().rev() {
        match token.kind {
            TokenKind::ParenClose | TokenKind::BracketClose => depth += 1,
            TokenKind::ParenOpen | TokenKind::BracketOpen if depth == 0 => return false,
            TokenKind::ParenOpen | TokenKind::BracketOpen => depth -= 1,
            TokenKind::Semicolon | TokenKind::CurlyOpen | TokenKind::CurlyClose if depth == 0 => return true,
            TokenKind::Operator if depth == 0 && token.text == "?" => return false,
            _ => {}
        }
    }
    true
}

fn break_before_brace(ctx: &mut PassContext) {
    let layout = ctx.out.newline_indent();
    ctx.out.rtrim_append(&layout);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(source: &str) -> String {
        CurlyOpenNextLine::default().format(source)
    }

    #[test]
    fn test_class_brace_moves() {
        assert_eq!(format("class Foo{\n}"), "class Foo\n{\n}");
        assert_eq!(format("class Foo extends Bar implements Baz {\n}"), "class Foo extends Bar implements Baz\n{\n}");
    }

    #[test]
    fn test_interface_and_trait() {
        assert_eq!(format("interface I {}"), "interface I\n{}");
        assert_eq!(format("trait T {}"), "trait T\n{}");
    }

    #[test]
    fn test_class_constant_is_not_a_declaration() {
        let source = "if ($a::class) {\n}\n$b = $node->class; {}";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_anonymous_class_arguments_are_copied_whole() {
        assert_eq!(
            format("$x = new class(function () { return 1; }) {\n};"),
            "$x = new class(function () { return 1; })\n{\n};"
        );
    }

    #[test]
    fn test_method_uses_body_indent() {
        assert_eq!(
            format("class A\n{\n    public function run() {\n    }\n}"),
            "class A\n{\n    public function run()\n    {\n    }\n}"
        );
    }

    #[test]
    fn test_multiline_function_header_keeps_brace() {
        let source = "function run(\n    $a\n) {\n}";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_abstract_method_without_body() {
        let source = "abstract class A\n{\n    abstract function run();\n}";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_closures_are_left_alone() {
        for source in [
            "$f = function () {\n};",
            "return function () {};",
            "array_map(function ($x) { return $x; }, $xs);",
            "$a = [function () {}];",
            "$a = ['k' => function () {}];",
            "$f = $g ?: function () {};",
            "$f = static function () {};",
            "$f = /* hm */ function () {};",
            "$f = $a ? [1] : function () {};",
            "$f = $a ? ($b ? 1 : 2) : function () {};",
            "register(callback: function () {});",
            "use function Foo\\bar;",
        ] {
            assert_eq!(format(source), source, "{source}");
        }
    }

    #[test]
    fn test_function_after_statement_colon_is_a_declaration() {
        assert_eq!(
            format("switch ($a) {\ncase 1: function foo() {\n}\n}"),
            "switch ($a) {\ncase 1: function foo()\n    {\n}\n}"
        );
        assert_eq!(
            format("if ($a): function foo() {\n}\nendif;"),
            "if ($a): function foo()\n{\n}\nendif;"
        );
    }

    #[test]
    fn test_crlf_source_keeps_crlf() {
        assert_eq!(format("class Foo {\r\n}"), "class Foo\r\n{\r\n}");
    }

    #[test]
    fn test_static_method_is_a_declaration() {
        assert_eq!(
            format("class A\n{\n    public static function make() {}\n}"),
            "class A\n{\n    public static function make()\n    {}\n}"
        );
    }

    #[test]
    fn test_braces_in_interpolated_strings_are_opaque() {
        let source = "$s = \"{$a} class {$b}\";";
        assert_eq!(format(source), source);
        assert_eq!(
            format("$x = new class(\"{$a}\") {};"),
            "$x = new class(\"{$a}\")\n{};"
        );
        assert_eq!(
            format("class A implements \"{$b}\" {}"),
            "class A implements \"{$b}\"\n{}"
        );
    }
}
