/// Checks if a URL path starts with a path prefix on a segment boundary
///
/// A prefix matches:
/// 1. The identical path: "/search" matches "/search"
/// 2. Any path below it: "/search" matches "/search/advanced"
/// 3. Anything starting with it, when the prefix itself ends in "/":
///    "/maps/" matches "/maps/place"
///
/// "/search" does not match "/searchbyimage"; a rule that wants raw string
/// prefixes should use a regex pattern instead.
///
/// # Examples
///
/// ```
/// use referal::url::matches_path_prefix;
///
/// assert!(matches_path_prefix("/search", "/search"));
/// assert!(matches_path_prefix("/search", "/search/advanced"));
/// assert!(!matches_path_prefix("/search", "/searchbyimage"));
/// assert!(matches_path_prefix("/", "/anything"));
/// ```
pub fn matches_path_prefix(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}
