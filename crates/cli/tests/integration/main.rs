//! CLI integration tests.
//!
//! These run the real binary against a fake `nix-prefetch-git` shell script,
//! so they are Unix-only.

#![cfg(unix)]

mod lock_tests;
