use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use shieldgen::output::summarize;
use shieldgen::{
    ConfigFile, InputOptions, PolicyOptions, ProcessingOptions, build_options, run_main,
};
use shieldgen_core::Result;

#[derive(Parser, Debug)]
#[command(
    name = "shieldgen",
    about = "shieldgen: keep markup-bound types out of the renamer's reach",
    version
)]
pub struct Cli {
    #[command(flatten)]
    inputs: InputOptions,

    #[command(flatten)]
    policy: PolicyOptions,

    #[command(flatten)]
    processing: ProcessingOptions,

    /// TOML config file; command-line values take precedence
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    let config = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let opts = build_options(
        args.inputs,
        args.policy,
        args.processing,
        args.output,
        config,
    )?;

    let (report, rendered) = run_main(&opts)?;
    if opts.output.is_none() {
        print!("{rendered}");
    }
    eprint!("{}", summarize(&report));

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    eprintln!("Total time: {total_secs:.2}s");
    Ok(())
}

pub fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Cli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "execution failed");
            ExitCode::FAILURE
        }
    }
}
