//! Entrypoint for the Peregrine compiler CLI

use std::fs;
use std::path::Path;
use std::process;

use log::{error, info};

use peregrine::codegen::generator;
use peregrine::modules::search_default_module;
use peregrine::parser::ast::AstNode;
use peregrine::parser::lexer::Lexer;
use peregrine::parser::parse::Parser;

static USAGE: &str = r#"
usage: peregrine <input.pg> [output.cc]

The output path defaults to the input path with its extension replaced
by `.cc`. The result is a single C translation unit for a downstream
C compiler.

examples:
    peregrine hello.pg
    peregrine hello.pg build/hello.cc
"#;

fn main() {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Error: no input file provided");
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let input = &args[1];
    if !Path::new(input).exists() {
        eprintln!("Error: file '{}' not found", input);
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let output = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| default_output(input));

    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(err) => {
            error!("failed to read {}: {}", input, err);
            process::exit(1);
        }
    };

    info!("lexing {}", input);
    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    info!("parsing {} tokens", tokens.len());
    let program = match Parser::new(tokens, input.as_str()).parse() {
        Ok(program) => program,
        Err(errors) => {
            for err in &errors {
                eprintln!("{}", err);
            }
            error!("aborting: {} parse error(s)", errors.len());
            process::exit(1);
        }
    };

    report_imports(&program, input);

    info!("generating C for {}", input);
    let unit = generator::generate(&program, input);

    if let Err(err) = fs::write(&output, unit) {
        error!("failed to write {}: {}", output, err);
        process::exit(1);
    }
    info!("wrote {}", output);
}

fn default_output(input: &str) -> String {
    Path::new(input)
        .with_extension("cc")
        .to_string_lossy()
        .into_owned()
}

/// Resolve each imported module against the source file's directory and
/// log what was (or was not) found. Generation is unaffected either way.
fn report_imports(program: &AstNode, input: &str) {
    let search_dir = match Path::new(input).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    let AstNode::Program { statements, .. } = program else {
        return;
    };
    for stmt in statements {
        if let AstNode::ImportStatement { module, .. } = stmt {
            if let Some(name) = module.0.identifier_name() {
                match search_default_module(&search_dir, &format!("{}.pg", name)) {
                    Some(path) => info!("import {} -> {}", name, path.display()),
                    None => info!(
                        "import {}: no module file found under {}",
                        name,
                        search_dir.display()
                    ),
                }
            }
        }
    }
}
