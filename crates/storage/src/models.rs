//! The stored extension repository record.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Prefix carried by fingerprints of records that were stored before the
/// remote manifest exposed one. Such records accept any fingerprint on refresh.
pub const PLACEHOLDER_FINGERPRINT_PREFIX: &str = "NOFINGERPRINT";

/// A remote source of installable extensions.
///
/// Identity is the `base_url`; `fingerprint` is the signing key identifier
/// and is unique across stored repositories as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtensionRepo {
    pub base_url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub website: String,
    pub fingerprint: String,
}

impl ExtensionRepo {
    pub fn new(
        base_url: impl Into<String>,
        name: impl Into<String>,
        short_name: Option<String>,
        website: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            name: name.into(),
            short_name,
            website: website.into(),
            fingerprint: fingerprint.into(),
        }
    }

    /// Whether the stored fingerprint is a legacy placeholder.
    pub fn has_placeholder_fingerprint(&self) -> bool {
        self.fingerprint.starts_with(PLACEHOLDER_FINGERPRINT_PREFIX)
    }

    /// Short label for listings, falling back to the full name.
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for ExtensionRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.base_url)
    }
}

/// Full, sorted view of the stored repositories at one point in time.
pub type RepoSnapshot = Arc<[ExtensionRepo]>;
