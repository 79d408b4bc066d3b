//! Overlay rendering.
//!
//! Turns resolved git sources into a Nix overlay that replaces each
//! package's `src` with a pinned `pkgs.fetchgit` call:
//!
//! ```nix
//! { pkgs }:
//! self: super: {
//!
//!   mylib = super.mylib.overridePythonAttrs (
//!     _: {
//!       src = pkgs.fetchgit {
//!         url = "https://github.com/org/mylib.git";
//!         rev = "4f1c2d3e...";
//!         sha256 = "0m0x...";
//!       };
//!     }
//!   );
//!
//! }
//! ```
//!
//! Values are escaped for Nix double-quoted strings, and package names that
//! are not plain Nix identifiers are emitted as quoted attribute names.

mod template;

use crate::consts::OVERLAY_INDENT;
use crate::prefetch::ResolvedSource;

pub use template::{ENTRY_TEMPLATE, fill};

/// Opening lines of every overlay.
pub const HEADER: &str = "{ pkgs }:\nself: super: {\n";

/// Closing lines of every overlay.
pub const FOOTER: &str = "\n}\n";

/// Nix keywords that cannot be used as bare attribute names.
const NIX_KEYWORDS: &[&str] = &["assert", "else", "if", "in", "inherit", "let", "or", "rec", "then", "with"];

/// One overridden package in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
  pub name: String,
  pub url: String,
  pub rev: String,
  pub sha256: String,
}

impl From<ResolvedSource> for OverlayEntry {
  fn from(source: ResolvedSource) -> Self {
    Self {
      name: source.name,
      url: source.url,
      rev: source.rev,
      sha256: source.sha256,
    }
  }
}

impl OverlayEntry {
  /// Render this entry's block, without indentation.
  pub fn render(&self) -> String {
    let attr = attr_name(&self.name);
    let url = escape_string(&self.url);
    let rev = escape_string(&self.rev);
    let sha256 = escape_string(&self.sha256);

    fill(
      ENTRY_TEMPLATE,
      &[
        ("attr", attr.as_str()),
        ("url", url.as_str()),
        ("rev", rev.as_str()),
        ("sha256", sha256.as_str()),
      ],
    )
  }
}

/// Render a complete overlay document.
///
/// Blocks appear in the order given, separated by one blank line.
pub fn render(entries: &[OverlayEntry]) -> String {
  let mut out = String::from(HEADER);

  if !entries.is_empty() {
    let body = entries.iter().map(OverlayEntry::render).collect::<Vec<_>>().join("\n\n");
    out.push('\n');
    out.push_str(&indent(&body, OVERLAY_INDENT));
    out.push('\n');
  }

  out.push_str(FOOTER);
  out
}

/// Prefix every non-empty line of `text` with `margin`.
///
/// Empty lines stay empty. Line endings are kept.
pub fn indent(text: &str, margin: &str) -> String {
  let mut out = String::with_capacity(text.len());

  for line in text.split_inclusive('\n') {
    let content = line.trim_end_matches(['\n', '\r']);
    if content.is_empty() {
      out.push_str(line);
    } else {
      out.push_str(margin);
      out.push_str(line);
    }
  }

  out
}

/// Escape a value for use inside a Nix double-quoted string.
pub fn escape_string(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  let mut chars = value.chars().peekable();

  while let Some(ch) = chars.next() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      _ => out.push(ch),
    }
  }

  out
}

/// Whether `name` can be used as a bare Nix attribute name.
pub fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  let starts_well = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');

  starts_well
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '-'))
    && !NIX_KEYWORDS.contains(&name)
}

/// Attribute name for a package, quoted when it is not a plain identifier.
pub fn attr_name(name: &str) -> String {
  if is_identifier(name) {
    name.to_string()
  } else {
    format!("\"{}\"", escape_string(name))
  }
}
