use std::net::IpAddr;
use url::Url;

/// Extracts the host from a URL
///
/// The host is lowercased and a trailing root dot (`example.com.`) is removed.
///
/// # Returns
///
/// * `Some(String)` - The lowercase host
/// * `None` - If the URL has no host or the host is empty
///
/// # Examples
///
/// ```
/// use url::Url;
/// use referal::url::extract_host;
///
/// let url = Url::parse("https://WWW.Google.COM/search").unwrap();
/// assert_eq!(extract_host(&url), Some("www.google.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_end_matches('.').to_lowercase())
        .filter(|h| !h.is_empty())
}

/// Computes the registrable domain of a host using the Public Suffix List
///
/// Subdomains are stripped down to the part a site actually registers, so
/// `www.google.co.uk` becomes `google.co.uk`. IP addresses and hosts that have
/// no registrable part (such as `localhost`) are returned unchanged.
///
/// # Examples
///
/// ```
/// use referal::url::registrable_domain;
///
/// assert_eq!(registrable_domain("www.google.co.uk"), "google.co.uk");
/// assert_eq!(registrable_domain("m.facebook.com"), "facebook.com");
/// assert_eq!(registrable_domain("localhost"), "localhost");
/// ```
pub fn registrable_domain(host: &str) -> String {
    if is_ip_host(host) {
        return host.to_string();
    }

    psl::domain_str(host).unwrap_or(host).to_string()
}

/// IPv6 hosts come out of `Url::host_str` wrapped in brackets
fn is_ip_host(host: &str) -> bool {
    host.starts_with('[') || host.parse::<IpAddr>().is_ok()
}
