//! Lockfile reading.
//!
//! Loads a `poetry.lock` file and extracts the packages that declare a
//! `source` table. Those are the packages whose sources the overlay pins.
//!
//! # Lockfile Format
//!
//! ```toml
//! [[package]]
//! name = "requests"
//! version = "2.31.0"
//!
//! [[package]]
//! name = "mylib"
//! version = "0.1.0"
//!
//! [package.source]
//! type = "git"
//! url = "https://github.com/org/mylib.git"
//! reference = "main"
//! resolved_reference = "4f1c2d3e..."
//! ```

mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use types::*;

/// Errors that can occur when reading a lockfile.
#[derive(Debug, Error)]
pub enum LockfileError {
  /// Failed to read the lockfile.
  #[error("failed to read lockfile '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The lockfile is not valid TOML or lacks a consumed field.
  #[error("failed to parse lockfile: {0}")]
  Parse(#[from] toml::de::Error),

  /// A package declares a source with neither `resolved_reference` nor `reference`.
  #[error("package '{name}' has a source without a reference or resolved_reference")]
  MissingRevision { name: String },
}

impl PoetryLock {
  /// Load a lockfile from the given path.
  pub fn load(path: &Path) -> Result<Self, LockfileError> {
    let content = fs::read_to_string(path).map_err(|source| LockfileError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let lock = Self::parse(&content)?;
    debug!(path = %path.display(), packages = lock.package.len(), "loaded lockfile");
    Ok(lock)
  }

  /// Parse lockfile content.
  pub fn parse(content: &str) -> Result<Self, LockfileError> {
    Ok(toml::from_str(content)?)
  }

  /// Extract every package that declares a source, in lockfile order.
  ///
  /// Fails on the first package whose source carries no revision, so a
  /// malformed entry is reported before any helper is started.
  pub fn git_sources(&self) -> Result<Vec<PackageSource>, LockfileError> {
    self
      .package
      .iter()
      .filter_map(|pkg| pkg.source.as_ref().map(|src| (pkg, src)))
      .map(|(pkg, src)| {
        let revision = src.revision().ok_or_else(|| LockfileError::MissingRevision {
          name: pkg.name.clone(),
        })?;
        debug!(
          name = %pkg.name,
          source_type = src.type_.as_deref().unwrap_or("unknown"),
          rev = revision,
          "found package source"
        );
        Ok(PackageSource::new(&pkg.name, &src.url, revision))
      })
      .collect()
  }
}
