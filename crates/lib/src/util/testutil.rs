//! Test utilities for poetry2nix-lib.
//!
//! Tests never call the real `nix-prefetch-git`. Instead they write a small
//! shell script that mimics its command line and output.

use std::path::{Path, PathBuf};

/// Body of a fake `nix-prefetch-git`.
///
/// Behaviour is selected by markers in the `--url` argument:
/// - `slow`: sleep one second before answering
/// - `fail`: print `boom` to stderr and exit with status 3
///
/// Otherwise it prints the JSON description with `sha256` set to
/// [`fake_sha256`] of the revision.
pub const FAKE_HELPER: &str = r#"
if [ "$1" != "--fetch-submodules" ] || [ "$2" != "--url" ] || [ "$4" != "--rev" ]; then
  echo "unexpected arguments: $*" >&2
  exit 64
fi
url="$3"
rev="$5"
case "$url" in
  *slow*) sleep 1 ;;
esac
case "$url" in
  *fail*)
    echo boom >&2
    exit 3
    ;;
esac
printf '{\n  "url": "%s",\n  "rev": "%s",\n  "date": "2024-01-01T00:00:00+00:00",\n  "path": "/nix/store/fake",\n  "sha256": "sha256-of-%s",\n  "fetchLeaveDotGit": false,\n  "deepClone": false,\n  "fetchSubmodules": true\n}\n' "$url" "$rev" "$rev"
"#;

/// The hash [`FAKE_HELPER`] reports for a revision.
pub fn fake_sha256(rev: &str) -> String {
  format!("sha256-of-{}", rev)
}

/// Write an executable `/bin/sh` script named `fake-prefetch-git` into `dir`.
#[cfg(unix)]
pub fn write_helper(dir: &Path, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join("fake-prefetch-git");
  std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
