//! Invocation of the external prefetch helper.
//!
//! Each source is resolved by running
//! `<helper> --fetch-submodules --url <url> --rev <revision>` and parsing the
//! JSON description the helper prints on stdout.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::types::{PrefetchError, PrefetchOutput, ResolvedSource};
use crate::lockfile::PackageSource;

/// Build the helper's argument list for a source.
pub fn helper_args(source: &PackageSource) -> [&str; 5] {
  [
    "--fetch-submodules",
    "--url",
    source.url.as_str(),
    "--rev",
    source.revision.as_str(),
  ]
}

/// Prefetch a single source.
///
/// Blocks the task until the helper exits. The helper's stderr is captured
/// and returned untouched in [`PrefetchError::HelperFailed`] when it exits
/// unsuccessfully.
pub async fn prefetch_one(source: &PackageSource, helper: &Path) -> Result<ResolvedSource, PrefetchError> {
  debug!(
    name = %source.name,
    url = %source.url,
    rev = %source.revision,
    helper = %helper.display(),
    "prefetching source"
  );

  let output = Command::new(helper)
    .args(helper_args(source))
    .stdin(Stdio::null())
    .output()
    .await
    .map_err(|e| PrefetchError::Spawn {
      name: source.name.clone(),
      helper: helper.to_path_buf(),
      source: e,
    })?;

  if !output.status.success() {
    debug!(name = %source.name, code = ?output.status.code(), "prefetch helper failed");
    return Err(PrefetchError::HelperFailed {
      name: source.name.clone(),
      code: output.status.code(),
      stderr: output.stderr,
    });
  }

  let parsed: PrefetchOutput =
    serde_json::from_slice(&output.stdout).map_err(|e| PrefetchError::InvalidOutput {
      name: source.name.clone(),
      source: e,
    })?;

  debug!(name = %source.name, rev = %parsed.rev, sha256 = %parsed.sha256, "prefetched source");

  Ok(ResolvedSource::from_output(&source.name, parsed))
}
