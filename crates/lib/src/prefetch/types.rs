//! Types for prefetching git sources.
//!
//! This module defines the error type, the helper's output format, and the
//! configuration of the prefetch worker pool.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::consts::{DEFAULT_PREFETCH_HELPER, PREFETCH_HELPER_ENV};

/// Errors that can occur while prefetching a source.
#[derive(Debug, Error)]
pub enum PrefetchError {
  /// The helper could not be started.
  #[error("failed to run '{helper}' for package '{name}': {source}")]
  Spawn {
    name: String,
    helper: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The helper exited unsuccessfully.
  ///
  /// `stderr` holds the helper's diagnostics byte for byte.
  #[error("prefetching package '{name}' failed with exit code {code:?}")]
  HelperFailed {
    name: String,
    code: Option<i32>,
    stderr: Vec<u8>,
  },

  /// The helper succeeded but its output is not a usable description.
  #[error("invalid prefetch output for package '{name}': {source}")]
  InvalidOutput {
    name: String,
    #[source]
    source: serde_json::Error,
  },

  /// The worker pool's semaphore was closed before the task could run.
  ///
  /// Never produced in practice: `prefetch_all` owns its semaphore and never
  /// closes it. The variant only gives `Semaphore::acquire` an error to map to.
  #[error("prefetch worker pool closed: {0}")]
  Pool(#[from] tokio::sync::AcquireError),

  /// A prefetch task panicked or was aborted.
  #[error("prefetch task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl PrefetchError {
  /// Exit status the process should terminate with for this error.
  ///
  /// A failed helper propagates its own status. Helpers killed by a signal
  /// and every other error map to `1`.
  pub fn exit_code(&self) -> i32 {
    match self {
      PrefetchError::HelperFailed { code: Some(code), .. } => *code,
      _ => 1,
    }
  }
}

/// JSON description printed by `nix-prefetch-git` on success.
///
/// The helper also reports `path`, `date` and fetch flags; those are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefetchOutput {
  pub url: String,
  pub rev: String,
  pub sha256: String,
}

/// A source pinned to a content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
  /// Package name from the lockfile.
  pub name: String,
  /// Repository URL as reported by the helper.
  pub url: String,
  /// Revision as reported by the helper.
  pub rev: String,
  /// Content hash of the fetched tree.
  pub sha256: String,
}

impl ResolvedSource {
  pub fn from_output(name: impl Into<String>, output: PrefetchOutput) -> Self {
    Self {
      name: name.into(),
      url: output.url,
      rev: output.rev,
      sha256: output.sha256,
    }
  }
}

/// Configuration for prefetching.
#[derive(Debug, Clone)]
pub struct PrefetchConfig {
  /// Executable invoked once per source.
  pub helper: PathBuf,

  /// Maximum number of helpers running at once.
  pub parallelism: usize,
}

impl Default for PrefetchConfig {
  fn default() -> Self {
    Self {
      helper: PathBuf::from(DEFAULT_PREFETCH_HELPER),
      parallelism: num_cpus(),
    }
  }
}

impl PrefetchConfig {
  /// Default configuration with the helper taken from
  /// `POETRY2NIX_PREFETCH_GIT` when set.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Some(helper) = std::env::var_os(PREFETCH_HELPER_ENV).filter(|v| !v.is_empty()) {
      config.helper = PathBuf::from(helper);
    }
    config
  }

  pub fn with_helper(mut self, helper: impl Into<PathBuf>) -> Self {
    self.helper = helper.into();
    self
  }

  /// Set the pool size. Zero is clamped to one.
  pub fn with_parallelism(mut self, parallelism: usize) -> Self {
    self.parallelism = parallelism.max(1);
    self
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
