//! Category labels of the form `category:subcategory`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label given to anything no source could categorize
pub const UNCATEGORIZED: &str = "unknown:uncategorized";

/// A `category:subcategory` label, e.g. `outings:restaurants`.
///
/// The shape is not enforced: hand-written labels and model replies are kept
/// as given (trimmed), since the output CSV should reflect what the source said.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryLabel(String);

impl CategoryLabel {
    /// Wrap a label as-is (surrounding whitespace removed)
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_string())
    }

    /// Build a label from free text: lower-case, whitespace runs become `_`
    pub fn normalized(text: &str) -> Self {
        let joined = text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_");
        Self(joined)
    }

    /// The `unknown:uncategorized` sentinel
    pub fn unknown() -> Self {
        Self(UNCATEGORIZED.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNCATEGORIZED
    }

    /// Top-level category (before the colon)
    pub fn category(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0).trim()
    }

    /// Subcategory (after the first colon), empty when there is none
    pub fn subcategory(&self) -> &str {
        self.0
            .split_once(':')
            .map(|(_, sub)| sub.trim())
            .unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CategoryLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
