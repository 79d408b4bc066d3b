//! Lock orchestration.
//!
//! This module provides the core logic for the `poetry2nix lock` command:
//! read the lockfile, prefetch every git source, render the overlay and
//! write it in one step.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use tracing::info;

use crate::consts::{DEFAULT_LOCKFILE, DEFAULT_OUTPUT};
use crate::lockfile::{LockfileError, PoetryLock};
use crate::overlay::{self, OverlayEntry};
use crate::prefetch::{PrefetchConfig, PrefetchError, prefetch_all};

/// Options for a lock run.
#[derive(Debug, Clone)]
pub struct LockOptions {
  /// Path to `poetry.lock`.
  pub lockfile: PathBuf,
  /// Path the overlay is written to.
  pub output: PathBuf,
  /// Helper and worker pool settings.
  pub prefetch: PrefetchConfig,
}

impl Default for LockOptions {
  fn default() -> Self {
    Self {
      lockfile: PathBuf::from(DEFAULT_LOCKFILE),
      output: PathBuf::from(DEFAULT_OUTPUT),
      prefetch: PrefetchConfig::from_env(),
    }
  }
}

/// Result of a successful lock run.
#[derive(Debug)]
pub struct LockReport {
  /// Where the overlay was written.
  pub output: PathBuf,
  /// Pinned packages, in lockfile order.
  pub entries: Vec<OverlayEntry>,
}

/// Errors that can occur during a lock run.
#[derive(Debug, Error)]
pub enum LockError {
  /// Failed to read or interpret the lockfile.
  #[error(transparent)]
  Lockfile(#[from] LockfileError),

  /// A source could not be prefetched.
  #[error(transparent)]
  Prefetch(#[from] PrefetchError),

  /// Failed to write the overlay.
  #[error("failed to write overlay '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Generate the git overlay for a lockfile.
///
/// Nothing is written unless every source was prefetched successfully. The
/// overlay replaces the output file atomically.
///
/// # Errors
///
/// Returns an error if:
/// - The lockfile cannot be read or parsed
/// - A source declares no revision
/// - Any helper invocation fails or prints unusable output
/// - The overlay cannot be written
pub async fn lock(options: &LockOptions) -> Result<LockReport, LockError> {
  info!(lockfile = %options.lockfile.display(), "reading lockfile");

  let lock = PoetryLock::load(&options.lockfile)?;
  let sources = lock.git_sources()?;

  info!(git_sources = sources.len(), packages = lock.package.len(), "found git sources");

  let resolved = prefetch_all(&sources, &options.prefetch).await?;
  let entries: Vec<OverlayEntry> = resolved.into_iter().map(OverlayEntry::from).collect();

  let content = overlay::render(&entries);
  write_atomic(&options.output, &content)?;

  info!(output = %options.output.display(), entries = entries.len(), "wrote overlay");

  Ok(LockReport {
    output: options.output.clone(),
    entries,
  })
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// The result gets the permissions a plain write would give it: an existing
/// file keeps its mode, a new one gets `0o666` minus the umask.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), LockError> {
  let write_err = |source: io::Error| LockError::Write {
    path: path.to_path_buf(),
    source,
  };

  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut tmp = temp_file_in(dir).map_err(write_err)?;
  if let Ok(existing) = fs::metadata(path) {
    tmp.as_file().set_permissions(existing.permissions()).map_err(write_err)?;
  }
  tmp.write_all(content.as_bytes()).map_err(write_err)?;
  tmp.persist(path).map_err(|e| write_err(e.error))?;

  Ok(())
}

/// Create the temporary file, asking for `0o666` so the umask decides the mode.
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
  use std::os::unix::fs::PermissionsExt;

  Builder::new()
    .permissions(fs::Permissions::from_mode(0o666))
    .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
  Builder::new().tempfile_in(dir)
}
