use std::num::NonZeroUsize;
use std::process::ExitCode;

use clap::Parser;
use prioq::{RunConfig, DEFAULT_ITEMS_PER_PRODUCER};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/* ---------- */

/// Runs producers and consumers over a bounded two-priority queue, then prints a summary.
#[derive(Parser, Debug)]
#[command(name = "prioq")]
struct Cli {
    /// Number of producer threads.
    producers: NonZeroUsize,
    /// Number of consumer threads.
    consumers: NonZeroUsize,
    /// Capacity of the bounded buffer, both priorities combined.
    buffer_size: NonZeroUsize,
    /// Number of items each producer emits [default: 20].
    items_per_producer: Option<NonZeroUsize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Lifecycle events on stdout, errors on stderr.
    tracing_subscriber::fmt()
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
        .with_max_level(Level::INFO)
        .without_time()
        .with_level(false)
        .with_target(false)
        .init();

    let items = cli
        .items_per_producer
        .map_or(DEFAULT_ITEMS_PER_PRODUCER, NonZeroUsize::get);
    let config = RunConfig::new(
        cli.producers.get(),
        cli.consumers.get(),
        cli.buffer_size.get(),
    )
    .items_per_producer(items);

    println!("{config}");

    match prioq::run(&config) {
        Ok(report) => {
            println!("\n{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
