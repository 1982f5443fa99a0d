//! Integration tests for the pass pipeline
//!
//! Exercises the default pass list end to end and pipelines built from configuration.

use phpfmt::php::config::Loader;
use phpfmt::php::engine::PassSettings;
use phpfmt::php::{format_source, PassKind, PhpfmtError, Pipeline};
use rstest::rstest;

const MESSY: &str = "<?php
namespace App;



use Foo\\Bar;
class Greeter extends Bar {
  const GREETING = 'Hello {name}  (again)';


  public function greet( $name, array $opts = [ ] ) {
        $fn = function ( $x ) use ( $name ) {
      return sprintf( \"%s, {$x}\", $name );
    };
      if ( $opts ) {
    return array_map( $fn, $opts );
      }
    return $fn( $name );
  }
}
";

const TIDY: &str = "<?php
namespace App;

use Foo\\Bar;
class Greeter extends Bar
{
    const GREETING = 'Hello {name}  (again)';

    public function greet($name, array $opts = [ ])
    {
        $fn = function ($x) use ($name) {
            return sprintf(\"%s, {$x}\", $name);
        };
        if ($opts) {
            return array_map($fn, $opts);
        }
        return $fn($name);
    }
}
";

#[test]
fn test_default_pipeline_formats_a_class() {
    assert_eq!(format_source(MESSY).expect("default configuration"), TIDY);
}

#[test]
fn test_default_pipeline_is_idempotent() {
    let once = format_source(MESSY).expect("default configuration");
    assert_eq!(format_source(&once).expect("default configuration"), once);
}

#[rstest]
#[case::trim_paren_padding(PassKind::TrimParenPadding)]
#[case::curly_open_next_line(PassKind::CurlyOpenNextLine)]
#[case::reindent(PassKind::Reindent)]
#[case::eliminate_duplicated_empty_lines(PassKind::EliminateDuplicatedEmptyLines)]
fn test_each_pass_is_idempotent(#[case] kind: PassKind) {
    let pass = kind.build(&PassSettings::default());
    let once = pass.format(MESSY);
    assert_eq!(pass.format(&once), once);
}

#[rstest]
#[case::single_quoted("$a = '  {  (  x  )  }  ';\n")]
#[case::interpolated("$a = \"  ( {$b} )\n\n\n\n  {$c[0]}  \";\n")]
#[case::heredoc("$a = <<<EOT\n  ( x )\n\n\n\n  { y }\nEOT;\n")]
#[case::nowdoc("$a = <<<'EOT'\n    class A {\n    }\nEOT;\n")]
#[case::inline_html("?>\n<div>\n  ( x )\n\n\n\n</div>\n<?php\n")]
#[case::html_after_line_comment("<?php if ($a): // show list ?>\n<ul>\n\n\n\n  <li>( x )</li>\n</ul>\n<?php endif; ?>\n")]
#[case::html_after_hash_comment("<?php # note ?>\n<p>\n\n\n\n  ( y )\n</p>\n")]
#[case::html_before_open_tag("<!DOCTYPE html>\n<div>\n\n\n\n  <p>( a )</p>\n</div>\n<?php echo 1; ?>\n")]
#[case::quotes_inside_interpolation("<?php\n$a = \"{$b[\"k ( x )\"]}  \";\n")]
fn test_literal_contents_are_untouched(#[case] source: &str) {
    assert_eq!(format_source(source).expect("default configuration"), source);
}

#[test]
fn test_pipeline_from_config_with_tabs() {
    let config = Loader::new()
        .set_override("formatting.indent_string", "\t")
        .expect("override to apply")
        .build()
        .expect("config to build");
    let pipeline = Pipeline::from_config(&config.formatting).expect("pipeline");

    assert_eq!(
        pipeline.format("class A {\nfunction f() {\nreturn 1;\n}\n}\n"),
        "class A\n{\n\tfunction f()\n\t{\n\t\treturn 1;\n\t}\n}\n"
    );
}

#[test]
fn test_pipeline_subset_from_config() {
    let config = Loader::new()
        .set_override("formatting.passes", vec!["curly-open-next-line".to_string()])
        .expect("override to apply")
        .build()
        .expect("config to build");
    let pipeline = Pipeline::from_config(&config.formatting).expect("pipeline");

    assert_eq!(pipeline.passes(), vec![PassKind::CurlyOpenNextLine]);
    assert_eq!(pipeline.format("class A {\n  f( $x );\n}"), "class A\n{\n  f( $x );\n}");
}

#[test]
fn test_unknown_pass_in_config() {
    let config = Loader::new()
        .set_override("formatting.passes", vec!["psr2-everything".to_string()])
        .expect("override to apply")
        .build()
        .expect("config to build");

    match Pipeline::from_config(&config.formatting) {
        Err(PhpfmtError::UnknownPass { name, available }) => {
            assert_eq!(name, "psr2-everything");
            assert!(available.contains("reindent"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unknown pass accepted"),
    }
}

#[test]
fn test_crlf_source_keeps_its_line_endings() {
    let source = "<?php\r\nclass A {\r\nfunction f() {\r\n\r\n\r\n\r\nreturn 1;\r\n}\r\n}\r\n";
    assert_eq!(
        format_source(source).expect("default configuration"),
        "<?php\r\nclass A\r\n{\r\n    function f()\r\n    {\r\n\r\n        return 1;\r\n    }\r\n}\r\n"
    );
}

#[test]
fn test_deeply_nested_input_is_formatted() {
    let deep = format!("{}$x{}", "(".repeat(5000), ")".repeat(5000));
    let source = format!("<?php\nf( {} );\n", deep);
    assert_eq!(
        format_source(&source).expect("default configuration"),
        format!("<?php\nf({});\n", deep)
    );
}

#[test]
fn test_malformed_input_does_not_panic() {
    for source in [
        "class",
        "class A {",
        "function f(",
        "}}}}",
        "$a = \"unterminated {$b",
        "<<<EOT\nnever closed",
        "((([[[{{{",
    ] {
        let formatted = format_source(source).expect("default configuration");
        assert!(!formatted.is_empty(), "{source}");
    }
}
