use std::io::{self, IsTerminal};
use std::process::ExitCode;

use mkhost::{Outcome, RunOptions};
use tracing_subscriber::EnvFilter;

mod cli;
mod os;

const LOG_ENV: &str = "MKHOST_LOG";

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = cli::parse();
    init_logging(args.verbose);

    let options = RunOptions {
        input: args.input.to_string_lossy().into_owned(),
        output: args
            .output
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned()),
        platform: args.platform,
        dry_run: args.dry_run,
    };

    match mkhost::run(&os::Os, &options) {
        Ok(Outcome::DryRun(text)) => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
        Ok(Outcome::AlreadyAugmented) => {}
        Ok(Outcome::Written { .. }) => {
            tracing::info!("Use 'make host-plugins' to build plugins for your host platform");
            tracing::info!("Use 'make help-host' to see all available host build targets");
        }
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
