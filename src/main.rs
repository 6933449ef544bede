// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;
use std::process;

use blockcfg::export::export_tree_to_json;
use blockcfg::{render_tree, Body, ConfigError, EvalContext, Evaluator, SchemaRegistry};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// blockcfg evaluates a block-structured configuration document and prints
/// the resulting value tree.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON schema file to validate blocks against instead of the builtin one.
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Print the tree as JSON.
    #[arg(short, long)]
    json: bool,

    /// Number of lenient passes before the strict pass.
    #[arg(long, default_value_t = 1)]
    lenient_passes: usize,

    file: PathBuf,
}

/// Logging is off unless `RUST_LOG` is set, e.g. `RUST_LOG=blockcfg=trace`.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run(args: &Args) -> Result<String, ConfigError> {
    let custom;
    let registry = match &args.schema {
        Some(path) => {
            custom = SchemaRegistry::from_file(path)?;
            &custom
        }
        None => SchemaRegistry::builtin(),
    };

    let body = Body::from_file(&args.file)?;
    let tree: EvalContext = Evaluator::new(registry)
        .with_lenient_passes(args.lenient_passes)
        .build(&body)?;

    if args.json {
        export_tree_to_json(&tree).map(|json| format!("{}\n", json))
    } else {
        Ok(render_tree(&tree))
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
