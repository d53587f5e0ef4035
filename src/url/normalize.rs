use crate::url::domain::{extract_host, registrable_domain};
use crate::{UrlError, UrlResult};
use std::collections::HashMap;
use url::Url;

/// Schemes a referer can be classified for
const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// A referer URL broken down into the parts the classifier needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// Lowercase host, as sent (e.g. "www.google.co.uk")
    pub host: String,

    /// Host with subdomains stripped (e.g. "google.co.uk")
    pub registrable_domain: String,

    /// Path with empty segments and trailing slash removed
    pub path: String,

    /// Decoded query parameters; the first occurrence of a key wins
    pub query_params: HashMap<String, String>,
}

impl NormalizedUrl {
    /// Returns a decoded query parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }
}

/// Normalizes a raw referer string
///
/// Empty, whitespace-only and malformed strings are routine in referer
/// headers, so this never fails: anything that cannot be classified becomes
/// `None`. The reason is logged at trace level.
///
/// # Examples
///
/// ```
/// use referal::url::normalize;
///
/// let url = normalize("https://www.google.co.uk/search?q=rust+lang").unwrap();
/// assert_eq!(url.host, "www.google.co.uk");
/// assert_eq!(url.registrable_domain, "google.co.uk");
/// assert_eq!(url.path, "/search");
/// assert_eq!(url.param("q"), Some("rust lang"));
///
/// assert!(normalize("   ").is_none());
/// assert!(normalize("not a url").is_none());
/// ```
pub fn normalize(raw: &str) -> Option<NormalizedUrl> {
    match parse_referer(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!("Referer {:?} not classifiable: {}", raw, e);
            None
        }
    }
}

/// Parses a raw referer string, reporting why it was rejected
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject if nothing is left
/// 2. Parse the URL; reject if malformed
/// 3. Reject schemes other than HTTP and HTTPS
/// 4. Lowercase the host and compute its registrable domain
/// 5. Normalize the path (drop empty segments and trailing slash)
/// 6. Decode query parameters
pub fn parse_referer(raw: &str) -> UrlResult<NormalizedUrl> {
    // Step 1: Reject blank input
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    // Step 2: Parse the URL
    let url = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

    // Step 3: Validate scheme
    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    // Step 4: Host and registrable domain
    let host = extract_host(&url).ok_or(UrlError::MissingHost)?;
    let registrable_domain = registrable_domain(&host);

    // Step 5 & 6: Path and query
    let path = normalize_path(url.path());
    let query_params = collect_query_params(&url);

    Ok(NormalizedUrl {
        host,
        registrable_domain,
        path,
        query_params,
    })
}

/// Normalizes a URL path by removing empty segments and trailing slashes
///
/// Dot segments are already resolved by the URL parser.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Decodes query parameters, keeping the first value of repeated keys
fn collect_query_params(url: &Url) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for (key, value) in url.query_pairs() {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    params
}
