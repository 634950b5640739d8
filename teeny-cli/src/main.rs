use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use teeny_core::{compile_c, tokenize};
use tracing::info;

/// Compile a Teeny program to C.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Teeny source file to compile
    input: PathBuf,

    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = "out.c",
        help = "Where to write the generated C source"
    )]
    output: PathBuf,

    #[arg(long, help = "Print the token stream instead of compiling")]
    tokens: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    execute(cli)
}

/// Log to stderr, but only when `RUST_LOG` asks for it.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn execute(cli: Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input file {}", cli.input.display()))?;

    if cli.tokens {
        for token in tokenize(&source)? {
            println!("{} {}", token.kind, token.text.escape_debug());
        }
        return Ok(());
    }

    let artifact = compile_c(&source)?;
    info!(
        variables = artifact.variables.len(),
        labels = artifact.labels.len(),
        "writing {}",
        cli.output.display()
    );
    write_output(&cli.output, artifact.c_source.as_bytes())?;
    println!("Compiling completed.");
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}
