//! poetry2nix-lib: Core logic for generating git overlays
//!
//! This crate pins the git-sourced packages of a Poetry lockfile for Nix:
//! - `lockfile`: reads `poetry.lock` and extracts the git sources
//! - `prefetch`: resolves each source to a content hash with `nix-prefetch-git`
//! - `overlay`: renders the resolved sources into an overlay expression
//! - `lock`: ties the three together for a single `lock` run

pub mod consts;
pub mod lock;
pub mod lockfile;
pub mod overlay;
pub mod prefetch;
pub mod util;
