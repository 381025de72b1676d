//! Command-line diagnostics runner: analyze AspScript component files and
//! print the resulting diagnostics without going through an editor.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use aspscript_language_server::lang;
use aspscript_language_server::validation::analyze_document;

#[derive(Debug, Parser)]
#[command(name = "aspscript-check")]
#[command(about = "Analyze AspScript component files and print diagnostics")]
#[command(version)]
struct Args {
    /// Component files to analyze
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Language definition TOML overriding the embedded one
    #[arg(long, help = "Path to a language definition TOML file")]
    language_file: Option<PathBuf>,

    /// Print diagnostics as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = Args::parse();
    let language = lang::load_spec(args.language_file.as_deref());

    let mut errors_found = false;

    for path in &args.paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let result = analyze_document(&text, &language);

        for diagnostic in &result.diagnostics {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "file": path.display().to_string(),
                        "line": diagnostic.range.start_line,
                        "col": diagnostic.range.start_col,
                        "severity": format!("{:?}", diagnostic.severity),
                        "code": diagnostic.code,
                        "message": diagnostic.message,
                    })
                );
            } else {
                println!(
                    "{}:{}:{}: {:?}: {} [{}]",
                    path.display(),
                    diagnostic.range.start_line,
                    diagnostic.range.start_col,
                    diagnostic.severity,
                    diagnostic.message,
                    diagnostic.code
                );
            }
        }

        if !result.is_valid() {
            errors_found = true;
        }
    }

    Ok(if errors_found {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
