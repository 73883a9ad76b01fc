use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use xlate::gen::GenMode;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Input .c or .java source file
    input: PathBuf,
    /// Output file; defaults to the input with the target extension
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Target for .c input: java (default) or cpp
    #[arg(long)]
    target: Option<String>,
    /// Keep going on unsupported constructs, leaving placeholder comments
    #[arg(long)]
    lenient: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let mode = if args.lenient {
        GenMode::Lenient
    } else {
        GenMode::Strict
    };

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;

    let ext = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let (translated, out_ext) = match ext {
        "c" => match args.target.as_deref() {
            None | Some("java") => (xlate::c_to_java(&source, mode)?, "java"),
            Some("cpp") => (xlate::c_to_cpp(&source, mode)?, "cpp"),
            Some(other) => bail!("unknown target `{}` (expected java or cpp)", other),
        },
        "java" => {
            if let Some(target) = args.target.as_deref() {
                if target != "c" {
                    bail!("unknown target `{}` for Java input (expected c)", target);
                }
            }
            (xlate::java_to_c(&source, mode)?, "c")
        }
        other => bail!(
            "unrecognized input extension `{}` (expected .c or .java)",
            other
        ),
    };

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension(out_ext));
    fs::write(&output, translated)
        .with_context(|| format!("Writing {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
