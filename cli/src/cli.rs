use std::path::PathBuf;

use clap::{ArgAction, Parser};
use mkhost::Platform;

#[derive(Parser, Debug)]
#[command(name = "mkhost")]
#[command(about = "Add host platform build targets to disting NT plugin Makefiles")]
#[command(version)]
pub struct Args {
    /// Input Makefile path
    #[arg(short, long, value_name = "path", default_value = "Makefile")]
    pub input: PathBuf,

    /// Output Makefile path (default: overwrite input)
    #[arg(short, long, value_name = "path")]
    pub output: Option<PathBuf>,

    /// Target platform
    #[arg(
        short,
        long,
        value_name = "auto|macos|windows|linux|all",
        default_value = "auto"
    )]
    pub platform: Platform,

    /// Print the augmented Makefile without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Log more detail (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse() -> Args {
    Args::parse()
}
