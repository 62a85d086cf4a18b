//! POSIX shell quoting.

/// Quotes `value` as one POSIX shell word.
///
/// The value is wrapped in single quotes; an embedded quote closes the
/// quoted run, emits an escaped quote and reopens it (`'\''`).
///
/// # Examples
///
/// ```
/// use corral::launch::shell_escape;
///
/// assert_eq!(shell_escape("it's"), "'it'\\''s'");
/// ```
#[must_use]
pub fn shell_escape(value: &str) -> String {
    let body = value.split('\'').collect::<Vec<_>>().join("'\\''");
    format!("'{body}'")
}

/// Returns `true` when `name` can be used as a shell variable name.
pub(super) fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_ascii_alphabetic())
        && chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}
