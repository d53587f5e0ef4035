//! URL handling module for Referal
//!
//! This module turns raw referer strings into [`NormalizedUrl`] values: host,
//! registrable domain, path and decoded query parameters. Anything that cannot
//! be classified (empty input, garbage, non-HTTP schemes) normalizes to `None`.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, registrable_domain};
pub use matcher::matches_path_prefix;
pub use normalize::{normalize, parse_referer, NormalizedUrl};
