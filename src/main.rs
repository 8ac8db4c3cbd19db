#![forbid(unsafe_code)]

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rescc::rcc;

#[derive(Debug, Parser)]
#[command(name = "rescc", version, about = "Resource bundle compiler")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a resource manifest into a Rust source artifact.
    Compile {
        /// Resource manifest (TOML).
        manifest: PathBuf,
        /// Generated Rust file.
        output: PathBuf,
        /// Module path the generated lifecycle functions register with.
        #[arg(long, default_value = rcc::DEFAULT_RUNTIME)]
        runtime: String,
    },

    /// List the file records a manifest packs to.
    List {
        manifest: PathBuf,
        /// Print sizes, name offsets, hashes and source paths too.
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Fail if the generated artifact is missing or out of date.
    Check {
        manifest: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = rcc::DEFAULT_RUNTIME)]
        runtime: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let res = match cli.cmd {
        Command::Compile {
            manifest,
            output,
            runtime,
        } => rcc::compile(&manifest, &output, &runtime),
        Command::List { manifest, verbose } => rcc::list(&manifest, verbose),
        Command::Check {
            manifest,
            output,
            runtime,
        } => rcc::check(&manifest, &output, &runtime),
    };

    if let Err(e) = res {
        let msg = e.to_string().replace('\n', " ");
        eprintln!("error: {msg}");
        std::process::exit(1);
    }
}
