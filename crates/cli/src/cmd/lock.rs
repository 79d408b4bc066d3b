//! Implementation of the `poetry2nix lock` command.
//!
//! This command pins every git dependency of a Poetry lockfile by
//! prefetching it and writes the resulting overlay.

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use poetry2nix_lib::lock::{LockError, LockOptions, lock};
use poetry2nix_lib::prefetch::{PrefetchConfig, PrefetchError};

use crate::output::{format_duration, print_success, symbols, truncate_hash};

/// Arguments of the lock command, as parsed from the command line.
#[derive(Debug)]
pub struct LockArgs {
  pub lockfile: PathBuf,
  pub output: PathBuf,
  pub jobs: Option<NonZeroUsize>,
  pub prefetch: Option<PathBuf>,
}

impl LockArgs {
  fn into_options(self) -> LockOptions {
    let mut prefetch = PrefetchConfig::from_env();
    if let Some(helper) = self.prefetch {
      prefetch = prefetch.with_helper(helper);
    }
    if let Some(jobs) = self.jobs {
      prefetch = prefetch.with_parallelism(jobs.get());
    }

    LockOptions {
      lockfile: self.lockfile,
      output: self.output,
      prefetch,
    }
  }
}

/// Execute the lock command.
///
/// Prints one line per pinned package and a confirmation on success. When a
/// prefetch helper fails, its stderr is forwarded byte for byte and the
/// process exits with the helper's status.
pub fn cmd_lock(args: LockArgs) -> Result<()> {
  let start = Instant::now();
  let options = args.into_options();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = match rt.block_on(lock(&options)) {
    Ok(report) => report,
    Err(LockError::Prefetch(err @ PrefetchError::HelperFailed { .. })) => exit_with_helper_failure(&err),
    Err(err) => return Err(anyhow::Error::new(err).context("Failed to generate overlay")),
  };

  for entry in &report.entries {
    println!(
      "  {} {} {}",
      symbols::ADD.if_supports_color(Stream::Stdout, |s| s.green()),
      entry.name.if_supports_color(Stream::Stdout, |s| s.cyan()),
      truncate_hash(&entry.rev).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }

  print_success(&format!(
    "Wrote {} ({} git source(s) pinned in {})",
    report.output.display(),
    report.entries.len(),
    format_duration(start.elapsed())
  ));

  Ok(())
}

/// Forward the helper's diagnostics and exit with its status.
fn exit_with_helper_failure(err: &PrefetchError) -> ! {
  if let PrefetchError::HelperFailed { stderr, .. } = err {
    let mut handle = std::io::stderr().lock();
    // Nothing better to do if stderr itself is gone.
    let _ = handle.write_all(stderr);
    let _ = handle.flush();
  }
  tracing::debug!(error = %err, "aborting after prefetch failure");
  std::process::exit(err.exit_code());
}
