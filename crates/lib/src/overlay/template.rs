//! Entry template and slot substitution.
//!
//! Slots are written `@name@`. Substitution is a single left-to-right pass,
//! so a value that itself contains `@slot@` text is copied verbatim and never
//! expanded a second time.

/// Template for one overridden package, before indentation.
pub const ENTRY_TEMPLATE: &str = r#"@attr@ = super.@attr@.overridePythonAttrs (
  _: {
    src = pkgs.fetchgit {
      url = "@url@";
      rev = "@rev@";
      sha256 = "@sha256@";
    };
  }
);"#;

/// Replace every `@name@` slot in `template` with its value from `slots`.
///
/// Text between `@` signs that does not name a slot is copied unchanged,
/// as is a trailing unmatched `@`.
pub fn fill(template: &str, slots: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(template.len());
  let mut rest = template;

  while let Some(start) = rest.find('@') {
    out.push_str(&rest[..start]);
    let after = &rest[start + 1..];

    let slot = after
      .find('@')
      .and_then(|end| slots.iter().find(|(name, _)| *name == &after[..end]).map(|s| (end, s.1)));

    match slot {
      Some((end, value)) => {
        out.push_str(value);
        rest = &after[end + 1..];
      }
      None => {
        out.push('@');
        rest = after;
      }
    }
  }

  out.push_str(rest);
  out
}
