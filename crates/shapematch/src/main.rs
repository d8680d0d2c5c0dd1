//! Shapematch CLI
//!
//! Evaluates a JSON case document and prints the winning case's output.

use std::io::Read;
use std::process::ExitCode;

use shapematch::{init_tracing, CaseDocument, DocumentError};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut pretty = false;
    let mut input = None;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "--pretty" => pretty = true,
            "-" => input = Some(arg.as_str()),
            flag if flag.starts_with('-') => {
                eprintln!("error: unknown option `{flag}`");
                print_usage();
                return ExitCode::FAILURE;
            }
            path if input.is_none() => input = Some(path),
            extra => {
                eprintln!("error: unexpected argument `{extra}`");
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(input) = input else {
        print_usage();
        return ExitCode::FAILURE;
    };

    match run(input, pretty) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &str, pretty: bool) -> Result<String, DocumentError> {
    let document = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| DocumentError::Io {
                path: "<stdin>".to_string(),
                source,
            })?;
        CaseDocument::parse(&text)?
    } else {
        CaseDocument::load(input)?
    };

    let output = document.evaluate()?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(rendered)
}

fn print_usage() {
    eprintln!("Usage: shapematch [--pretty] <file.json | ->");
    eprintln!();
    eprintln!("Evaluates a case document and prints the result as JSON.");
    eprintln!("Reads the document from stdin when the path is `-`.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG              Enable logging (e.g. shapematch_eval=trace)");
    eprintln!("  SHAPEMATCH_LOG_TREE   Render spans as a tree");
}
