//! Command-line interface for tmplfmt
//!
//! Usage:
//!   tmplfmt `<input>` [`<output>`] [--config `<file>`]     - Format a template (in place by default)
//!   tmplfmt `<input>` --inspect `<format>`                 - Print a view of the template instead
//!
//! Inspect formats: template, ast-json, ast-yaml, ast-treeviz, token-json, token-simple.

use clap::{Arg, Command};
use std::process;
use tmplfmt::tmpl::ast::Template;
use tmplfmt::tmpl::config::{FormatConfig, Loader};
use tmplfmt::tmpl::files::{read_template, write_atomic};
use tmplfmt::tmpl::formats::FormatRegistry;
use tmplfmt::tmpl::lexing::tokenize;
use tmplfmt::tmpl::parsing::parse;

fn main() {
    let matches = Command::new("tmplfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Normalizes whitespace inside {{ … }} delimiters of text/template files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Template file to format")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Where to write the result (defaults to the input file)")
                .index(2),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .short('i')
                .help("Print a view instead of writing: template, ast-json, ast-yaml, ast-treeviz, token-json, token-simple")
                .conflicts_with("output"),
        )
        .get_matches();

    let input = matches
        .get_one::<String>("input")
        .expect("input is a required argument");
    let output = matches.get_one::<String>("output").unwrap_or(input);

    let config = load_config(matches.get_one::<String>("config"));
    let source = read_template(input).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", input, e);
        process::exit(1);
    });

    match matches.get_one::<String>("inspect") {
        Some(format) => handle_inspect(&source, format, &config),
        None => handle_format(&source, output, &config),
    }
}

fn load_config(path: Option<&String>) -> FormatConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader.build().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        process::exit(1);
    })
}

fn parse_or_exit(source: &str, config: &FormatConfig) -> Template {
    parse(source).unwrap_or_else(|e| {
        eprintln!("{}", e.render(source, &config.diagnostics));
        process::exit(1);
    })
}

fn handle_format(source: &str, output: &str, config: &FormatConfig) {
    let template = parse_or_exit(source, config);
    let formatted = tmplfmt::tmpl::printing::print(&template, &config.formatting.indent);
    if let Err(e) = write_atomic(output, &formatted) {
        eprintln!("Error writing {}: {}", output, e);
        process::exit(1);
    }
}

fn handle_inspect(source: &str, format: &str, config: &FormatConfig) {
    let rendered = match format {
        "token-json" => serde_json::to_string_pretty(&tokenize(source)).unwrap_or_else(|e| {
            eprintln!("Error formatting tokens: {}", e);
            process::exit(1);
        }) + "\n",
        "token-simple" => tokenize(source)
            .iter()
            .map(|token| format!("{}:{} {} {}\n", token.line, token.pos, token.kind, token))
            .collect(),
        _ => {
            let registry = FormatRegistry::with_config(config);
            if !registry.has(format) {
                eprintln!("Format '{}' not supported", format);
                eprintln!("Available formats:");
                let views = registry.describe().into_iter().chain([
                    ("token-json", "Token stream as JSON"),
                    ("token-simple", "One token per line"),
                ]);
                for (name, description) in views {
                    eprintln!("  {:<14}{}", name, description);
                }
                process::exit(1);
            }
            let template = parse_or_exit(source, config);
            registry.serialize(&template, format).unwrap_or_else(|e| {
                eprintln!("{}", e);
                process::exit(1);
            })
        }
    };
    print!("{}", rendered);
}
