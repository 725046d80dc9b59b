//! Category classification: learned map first, then external sources in order,
//! then `unknown:uncategorized`.

use tally_core::CategoryLabel;
use tally_ingest::merchant_key;
use tracing::{debug, warn};

use crate::category_map::CategoryMap;
use crate::services::CategorySource;

/// Where a label came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    LocalMap,
    External(String),
    Fallback,
}

/// Result of classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: CategoryLabel,
    pub source: LabelSource,
}

pub struct Classifier<'a> {
    map: &'a CategoryMap,
    sources: Vec<&'a dyn CategorySource>,
}

impl<'a> Classifier<'a> {
    /// `sources` are consulted in the given order when the map has no match.
    pub fn new(map: &'a CategoryMap, sources: Vec<&'a dyn CategorySource>) -> Self {
        Self { map, sources }
    }

    /// Classify a raw transaction description.
    pub fn classify(&self, transaction: &str) -> Classification {
        let key = merchant_key(transaction);
        self.classify_merchant(&key)
    }

    /// Classify an already extracted merchant name.
    pub fn classify_merchant(&self, merchant: &str) -> Classification {
        if let Some(label) = self.map.lookup(merchant) {
            debug!(merchant, %label, "matched learned category");
            return Classification {
                label: label.clone(),
                source: LabelSource::LocalMap,
            };
        }

        for source in &self.sources {
            match source.suggest(merchant) {
                Ok(Some(answer)) if !answer.trim().is_empty() => {
                    let label = CategoryLabel::new(&answer);
                    debug!(merchant, %label, source = source.name(), "external category");
                    return Classification {
                        label,
                        source: LabelSource::External(source.name().to_string()),
                    };
                }
                Ok(_) => {
                    debug!(merchant, source = source.name(), "no usable answer");
                }
                Err(e) => {
                    warn!(merchant, source = source.name(), error = %e, "category lookup failed");
                }
            }
        }

        Classification {
            label: CategoryLabel::unknown(),
            source: LabelSource::Fallback,
        }
    }
}
