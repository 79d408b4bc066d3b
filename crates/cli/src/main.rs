use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use poetry2nix_lib::consts::{DEFAULT_LOCKFILE, DEFAULT_OUTPUT};

mod cmd;
mod output;

use cmd::{LockArgs, cmd_lock};
use output::print_error;

/// poetry2nix - Pin the git dependencies of a Poetry project for Nix
#[derive(Parser)]
#[command(name = "poetry2nix")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate an overlay that pins every git dependency of a lockfile
  Lock {
    /// Path to the Poetry lockfile
    #[arg(long, default_value = DEFAULT_LOCKFILE)]
    lock: PathBuf,

    /// Path of the generated overlay
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Number of prefetch helpers to run at once (default: number of CPUs)
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// Prefetch helper to invoke (default: $POETRY2NIX_PREFETCH_GIT or nix-prefetch-git)
    #[arg(long)]
    prefetch: Option<PathBuf>,
  },
}

fn main() {
  let cli = Cli::parse();

  // Initialize logging
  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Lock {
      lock,
      out,
      jobs,
      prefetch,
    } => cmd_lock(LockArgs {
      lockfile: lock,
      output: out,
      jobs,
      prefetch,
    }),
  };

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
