//! File name extraction from distribution URIs.

use super::LaunchError;

/// Returns the file name a URI points at: everything after the last `/`.
///
/// A URI without any `/` is returned whole.
///
/// # Errors
///
/// Returns [`LaunchError::EmptyUri`] for an empty URI and
/// [`LaunchError::TrailingSlash`] when the URI ends in `/`.
///
/// # Examples
///
/// ```
/// use corral::launch::file_name_from_uri;
///
/// assert_eq!(file_name_from_uri("http://h/path/to/file.tgz"), Ok("file.tgz"));
/// assert!(file_name_from_uri("http://h/path/").is_err());
/// ```
pub fn file_name_from_uri(uri: &str) -> Result<&str, LaunchError> {
    if uri.is_empty() {
        return Err(LaunchError::EmptyUri);
    }
    match uri.rsplit_once('/') {
        None => Ok(uri),
        Some((_, "")) => Err(LaunchError::TrailingSlash(uri.to_owned())),
        Some((_, file_name)) => Ok(file_name),
    }
}
