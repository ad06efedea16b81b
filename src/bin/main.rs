use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use atm_machine::{Atm, Batch};

/// A cli interface to the ATM state machine
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the command batch, read from stdin if omitted
    input: Option<PathBuf>,
    /// Where to write the result log, stdout if omitted
    #[clap(short, long, env = "OUTPUT_PATH")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let batch = match &args.input {
        Some(path) => {
            tracing::info!("Reading commands from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Cannot open {}", path.display()))?;
            Batch::from_reader(file)?
        }
        None => {
            tracing::info!("Reading commands from stdin");
            Batch::from_reader(io::stdin().lock())?
        }
    };
    tracing::info!("Processing {} commands", batch.commands().len());

    let mut atm = Atm::new(batch.password(), batch.initial_balance()).with_trace(|trace| {
        tracing::debug!(
            action = trace.action,
            parameter = %trace.parameter,
            success = trace.success,
            state = %trace.state,
            balance = trace.balance,
            "applied action"
        );
    });
    let reports = atm.run(batch.commands());

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    for report in &reports {
        writeln!(writer, "{}", report)?;
    }
    writer.flush()?;

    match &args.output {
        Some(path) => tracing::info!("Output written to {}", path.display()),
        None => tracing::info!("Output written to stdout"),
    }

    Ok(())
}
