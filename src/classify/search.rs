use crate::rules::RefererRule;
use crate::url::NormalizedUrl;

/// Extracts the search term from a referer matched by a search rule
///
/// The term parameter comes from the first path pattern matching the
/// referer path, or the rule's default parameter. Missing, empty and
/// whitespace-only values yield `None`.
pub fn extract_search_term(rule: &RefererRule, url: &NormalizedUrl) -> Option<String> {
    let parameter = rule.term_parameter(&url.path)?;

    url.param(parameter)
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}
