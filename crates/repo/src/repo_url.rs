//! Repository index url validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// File every repository publishes its extension index under.
pub const INDEX_SUFFIX: &str = "/index.min.json";

/// Manifest describing the repository itself, relative to the base url.
pub const MANIFEST_FILE: &str = "repo.json";

static REPO_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://.*/index\.min\.json$").expect("repo url pattern is valid"));

/// Whether `url` has the shape `https://.../index.min.json`.
pub fn is_valid_index_url(url: &str) -> bool {
    REPO_URL.is_match(url)
}

/// Base url of the repository whose index lives at `url`.
///
/// Returns `None` when `url` is not a valid index url.
pub fn base_url_from_index(url: &str) -> Option<&str> {
    if !is_valid_index_url(url) {
        return None;
    }
    url.strip_suffix(INDEX_SUFFIX)
}

pub fn manifest_url(base_url: &str) -> String {
    format!("{}/{}", base_url, MANIFEST_FILE)
}
