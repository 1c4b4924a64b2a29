//! jxscript binary entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use jxscript_cli::{Cli, run};

fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("jxscript=info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    let ok = run(cli, &mut stdout)?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
