//! The `abec` command: parse a JSON scheme document, analyze it, and print
//! the four compiled IR programs.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use miette::{Context, IntoDiagnostic};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Operation {
    Setup,
    Keygen,
    Encrypt,
    Decrypt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Debug,
}

/// Compile a pairing-based ABE scheme specification to intermediate code.
#[derive(Debug, Parser)]
#[command(name = "abec", version, about)]
struct Cli {
    /// The JSON scheme document to compile.
    input: PathBuf,

    /// Print only one operation instead of all four.
    #[arg(long, value_enum)]
    operation: Option<Operation>,

    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Only analyze; report the detected variant and classification counts.
    #[arg(long)]
    check: bool,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read '{}'", cli.input.display()))?;

    let raw = abec_dsl::parse_json(&source)?;
    let scheme = abec_analysis::analyze_scheme(&raw)
        .into_diagnostic()
        .wrap_err("scheme analysis failed")?;
    info!(variant = ?scheme.variant, "scheme analyzed");

    if cli.check {
        println!(
            "{:?}: {} master key vars, {} common vars, {} key polys, {} cipher polys, \
             {} singles, {} pairs",
            scheme.variant,
            scheme.master_key_vars.len(),
            scheme.common_vars.len(),
            scheme.key_polys.len(),
            scheme.cipher_primaries.len() + scheme.cipher_secondaries.len() + 1,
            scheme.dec_singles.len(),
            scheme.dec_pairs.len(),
        );
        return Ok(());
    }

    let programs = abec_ir::compile_scheme(&scheme)
        .into_diagnostic()
        .wrap_err("code generation failed")?;

    match (cli.operation, cli.format) {
        (None, Format::Json) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&programs).into_diagnostic()?
            );
        }
        (None, Format::Debug) => println!("{programs:#?}"),
        (Some(op), format) => {
            let program = match op {
                Operation::Setup => &programs.setup,
                Operation::Keygen => &programs.keygen,
                Operation::Encrypt => &programs.encrypt,
                Operation::Decrypt => &programs.decrypt,
            };
            match format {
                Format::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(program).into_diagnostic()?
                ),
                Format::Debug => println!("{program:#?}"),
            }
        }
    }
    Ok(())
}
