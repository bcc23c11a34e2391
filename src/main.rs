use clap::Parser;
use portsweep::cli::Args;
use portsweep::error::CliResult;
use portsweep::output::{self, OutputFormat, ProgressReporter};
use portsweep::scanner::ScanCoordinator;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flags.
fn init_tracing(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

async fn run(args: Args) -> CliResult<()> {
    let settings = args.load_settings()?;
    let config = args.to_config(&settings)?;
    let format = args.output_format();

    let (targets, ports, workers) = (config.targets.len(), config.ports.count(), config.workers);
    let coordinator = ScanCoordinator::new(config)?;
    let total = coordinator.total();

    let reporter = if format == OutputFormat::Plain && !args.quiet {
        output::print_scan_header(targets, ports, workers);
        Arc::new(ProgressReporter::new(total))
    } else {
        Arc::new(ProgressReporter::hidden(total))
    };

    let summary = coordinator.with_progress(reporter.clone()).run().await?;
    reporter.finish();

    output::print_results(&summary, format)?;
    Ok(())
}
