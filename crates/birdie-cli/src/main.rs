use clap::{Parser, Subcommand};
use commands::BookArgs;
use console::style;
use std::path::Path;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "birdie")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Books a golf tee time the moment it releases",
    long_about = "Birdie signs into a Chronogolf-style booking widget, waits for the morning \
                  release of the target date, then grabs a tee time inside your preferred \
                  window on a bounded retry budget."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a booking (waits for the release unless --test-mode is set)
    Book(BookArgs),

    /// Resolve configuration and print the schedule without launching a browser
    Check(BookArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => {
            if let Err(e) = init_logging(cli.verbose, None) {
                eprintln!("{} {:#}", style("error:").red().bold(), e);
                return ExitCode::FAILURE;
            }
            match commands::check::execute(&args) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{} {:#}", style("error:").red().bold(), e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Book(args) => match commands::book::execute(args, cli.verbose) {
            Ok(commands::book::Outcome::Booked { .. }) => ExitCode::SUCCESS,
            // Sold out is distinguishable from broken for cron wrappers.
            Ok(commands::book::Outcome::Exhausted { .. }) => ExitCode::from(2),
            Err(e) => {
                eprintln!("{} {:#}", style("error:").red().bold(), e);
                ExitCode::FAILURE
            }
        },
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("birdie=debug,birdie_core=debug,birdie_browser=debug,birdie_site=debug")
    } else {
        EnvFilter::new("birdie=info,birdie_core=info,birdie_browser=info,birdie_site=info")
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time();

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .init();
        }
    }

    Ok(())
}
