//! Command-line interface for phpfmt
//! This binary formats PHP files by running them through the configured pass pipeline.
//!
//! Usage:
//!   phpfmt `<path>`                      - Print the formatted file (`-` reads stdin)
//!   phpfmt `<path>` --write              - Rewrite the file in place
//!   phpfmt `<path>` --check              - Exit with status 1 if the file is not formatted
//!   phpfmt `<path>` --emit tokens        - Print the token stream as JSON
//!   phpfmt --list-passes                 - List the available passes
//!
//! Configuration is layered: built-in defaults, then the nearest `phpfmt.toml` in the
//! file's directory or its parents (the working directory for stdin), then `--config`,
//! then the individual flags.
//!
//! Exit status is 2 on any error.

use clap::{Arg, ArgAction, ArgMatches, Command};
use phpfmt::php::config::{Loader, PhpfmtConfig};
use phpfmt::php::lexing::tokenize;
use phpfmt::php::logging::init_logging;
use phpfmt::php::{PassKind, PhpfmtError, Pipeline, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

fn main() {
    let matches = Command::new("phpfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A pass-based PHP code formatter")
        .arg(
            Arg::new("path")
                .help("Path to the PHP file, or '-' for stdin")
                .required_unless_present("list-passes")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("passes")
                .long("passes")
                .short('p')
                .help("Comma separated list of passes to run, in order")
                .value_delimiter(','),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .help("Indent unit (e.g. four spaces or a tab)"),
        )
        .arg(
            Arg::new("write")
                .long("write")
                .short('w')
                .help("Rewrite the file in place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Exit with status 1 if formatting would change the file")
                .action(ArgAction::SetTrue)
                .conflicts_with("write"),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .help("Print an intermediate representation instead of formatting")
                .value_parser(["tokens"]),
        )
        .arg(
            Arg::new("list-passes")
                .long("list-passes")
                .help("List the available passes")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    match run(&matches) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn run(matches: &ArgMatches) -> Result<i32> {
    init_logging()?;

    if matches.get_flag("list-passes") {
        handle_list_passes_command();
        return Ok(0);
    }

    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| PhpfmtError::Config("no input path given".to_string()))?;
    let source = read_source(path)?;

    if matches.get_one::<String>("emit").is_some() {
        return handle_emit_tokens(&source);
    }

    let config = load_config(matches, path)?;
    let pipeline = Pipeline::from_config(&config.formatting)?;
    let formatted = pipeline.format(&source);

    if matches.get_flag("check") {
        return Ok(if formatted == source { 0 } else { 1 });
    }

    if matches.get_flag("write") && path != "-" {
        if formatted != source {
            fs::write(path, &formatted).map_err(|e| io_error(path, e))?;
        }
    } else {
        print!("{}", formatted);
    }
    Ok(0)
}

fn load_config(matches: &ArgMatches, input: &str) -> Result<PhpfmtConfig> {
    let mut loader = Loader::new();
    if let Some(dir) = project_search_start(input) {
        loader = loader.with_project_file(dir);
    }
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(passes) = matches.get_many::<String>("passes") {
        let passes: Vec<String> = passes.map(|name| name.trim().to_string()).collect();
        loader = loader.set_override("formatting.passes", passes)?;
    }
    if let Some(indent) = matches.get_one::<String>("indent") {
        loader = loader.set_override("formatting.indent_string", indent.clone())?;
    }
    loader.build()
}

fn project_search_start(input: &str) -> Option<PathBuf> {
    if input == "-" {
        return std::env::current_dir().ok();
    }
    fs::canonicalize(input).ok()?.parent().map(Path::to_path_buf)
}

fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| io_error("<stdin>", e))?;
        Ok(source)
    } else {
        fs::read_to_string(path).map_err(|e| io_error(path, e))
    }
}

fn io_error(path: &str, err: impl std::fmt::Display) -> PhpfmtError {
    PhpfmtError::Io {
        path: path.to_string(),
        message: err.to_string(),
    }
}

fn handle_emit_tokens(source: &str) -> Result<i32> {
    let json = serde_json::to_string_pretty(&tokenize(source)).map_err(|e| io_error("<stdout>", e))?;
    println!("{}", json);
    Ok(0)
}

fn handle_list_passes_command() {
    println!("Available passes (default order):\n");
    for kind in PassKind::ALL {
        println!("  {:<34} {}", kind.name(), kind.description());
    }
}
