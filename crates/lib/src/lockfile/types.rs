//! Lockfile types.
//!
//! Only the fields the overlay needs are modelled. Every other key in
//! `poetry.lock` (versions, hashes, dependency tables, `[metadata]`) is
//! ignored by serde rather than rejected, so lockfiles from newer Poetry
//! releases keep loading.

use serde::Deserialize;

/// The subset of `poetry.lock` consumed by the overlay generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PoetryLock {
  /// `[[package]]` tables, in file order.
  #[serde(default)]
  pub package: Vec<LockedPackage>,
}

/// A single `[[package]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedPackage {
  /// Package name as written in the lockfile.
  pub name: String,

  /// Present when the package is not installed from a registry.
  #[serde(default)]
  pub source: Option<LockedSource>,
}

/// The `[package.source]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedSource {
  /// Source type, e.g. `"git"`. Kept for diagnostics only.
  #[serde(rename = "type", default)]
  pub type_: Option<String>,

  /// Repository location.
  pub url: String,

  /// Branch, tag or commit as requested in `pyproject.toml`.
  #[serde(default)]
  pub reference: Option<String>,

  /// Commit the reference resolved to when the lock was written.
  #[serde(default)]
  pub resolved_reference: Option<String>,
}

impl LockedSource {
  /// The revision to fetch: the resolved reference wins over the plain one.
  pub fn revision(&self) -> Option<&str> {
    self.resolved_reference.as_deref().or(self.reference.as_deref())
  }
}

/// A package whose source must be prefetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSource {
  /// Package name, unique within the lockfile.
  pub name: String,
  /// Repository URL passed to the helper.
  pub url: String,
  /// Revision passed to the helper.
  pub revision: String,
}

impl PackageSource {
  pub fn new(name: impl Into<String>, url: impl Into<String>, revision: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      url: url.into(),
      revision: revision.into(),
    }
  }
}
