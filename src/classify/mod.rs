//! Referer classification
//!
//! [`classify`] walks a referer through normalization, internal-referral
//! detection and rule lookup. It is a pure function over an immutable
//! [`RuleDatabase`], safe to call from any number of threads at once.

mod search;

pub use search::extract_search_term;

use crate::rules::{Medium, RefererRule, RuleDatabase};
use crate::url::{normalize, NormalizedUrl};

/// Outcome of classifying one referer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// True when a rule matched or the referral is internal
    pub known: bool,

    /// Provider display name
    pub name: Option<String>,

    pub medium: Option<Medium>,

    /// Only set for search referers whose query carries the term parameter
    pub search_term: Option<String>,

    /// Referer host; set even for unknown referers, unset when unparsable
    pub host: Option<String>,
}

impl ClassificationResult {
    /// A referer with no matching rule
    pub fn unknown(host: Option<String>) -> Self {
        Self {
            host,
            ..Self::default()
        }
    }

    /// A referral from the page's own site
    pub fn internal(host: String) -> Self {
        Self {
            known: true,
            medium: Some(Medium::Internal),
            host: Some(host),
            ..Self::default()
        }
    }

    /// A referer matched by a rule
    pub fn matched(rule: &RefererRule, url: &NormalizedUrl) -> Self {
        let search_term = match rule.medium {
            Medium::Search => extract_search_term(rule, url),
            _ => None,
        };

        Self {
            known: true,
            name: Some(rule.provider_name.clone()),
            medium: Some(rule.medium),
            search_term,
            host: Some(url.host.clone()),
        }
    }
}

/// Classifies a raw referer string
///
/// # Arguments
///
/// * `referer` - The raw referer, as found in the event
/// * `page_url` - The URL of the page being visited, if known; enables
///   internal-referral detection
/// * `db` - The rule database
///
/// # Precedence
///
/// 1. Unparsable referer: unknown, without host
/// 2. Same registrable domain as the page: internal, regardless of rules
/// 3. No rule for the registrable domain: unknown, with host
/// 4. Rule match: known, with the rule's medium and name, plus the search term
///    for search rules
///
/// # Examples
///
/// ```
/// use referal::{classify, Medium, RuleDatabase};
///
/// let db = RuleDatabase::bundled().unwrap();
///
/// let result = classify("https://m.facebook.com/", None, &db);
/// assert_eq!(result.medium, Some(Medium::Social));
/// assert_eq!(result.name.as_deref(), Some("Facebook"));
///
/// let result = classify(
///     "https://app.example.com/page2",
///     Some("https://app.example.com/page1"),
///     &db,
/// );
/// assert_eq!(result.medium, Some(Medium::Internal));
/// ```
pub fn classify(
    referer: &str,
    page_url: Option<&str>,
    db: &RuleDatabase,
) -> ClassificationResult {
    // Step 1: Normalize the referer
    let url = match normalize(referer) {
        Some(url) => url,
        None => return ClassificationResult::unknown(None),
    };

    // Step 2: Internal navigation wins over any rule
    if let Some(page) = page_url.and_then(normalize) {
        if page.registrable_domain == url.registrable_domain {
            return ClassificationResult::internal(url.host);
        }
    }

    // Step 3 & 4: Rule lookup
    match db.lookup(&url.registrable_domain) {
        Some(rule) => ClassificationResult::matched(rule, &url),
        None => ClassificationResult::unknown(Some(url.host)),
    }
}
