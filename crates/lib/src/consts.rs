//! Shared constants.

/// Lockfile read when no `--lock` path is given.
pub const DEFAULT_LOCKFILE: &str = "poetry.lock";

/// Overlay written when no `--out` path is given.
pub const DEFAULT_OUTPUT: &str = "poetry-git-overlay.nix";

/// Helper invoked to prefetch git sources.
pub const DEFAULT_PREFETCH_HELPER: &str = "nix-prefetch-git";

/// Environment variable that overrides the prefetch helper.
pub const PREFETCH_HELPER_ENV: &str = "POETRY2NIX_PREFETCH_GIT";

/// Margin applied to every non-empty line of an overlay entry.
pub const OVERLAY_INDENT: &str = "  ";
