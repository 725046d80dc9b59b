//! Best-effort merchant resolution through a place-search service.
//!
//! Search by "merchant location" text, take the first candidate, and fall back
//! to a details query when the candidate only carries an id. Service failures
//! leave the merchant unresolved; they are never returned to the caller.

use tally_core::identify_payment_processor;
use tally_ingest::{parse_transaction, strip_store_numbers, ParsedTransaction};
use tracing::{debug, warn};

use crate::services::PlaceSearch;

/// Name used when the details query returns no result for a known place id
pub const MERCHANT_NOT_FOUND: &str = "Merchant Not Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMerchant {
    pub place_id: Option<String>,
    pub name: String,
}

/// A parsed transaction with everything we could learn about its merchant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantLookup {
    pub transaction: ParsedTransaction,
    pub processor_name: Option<&'static str>,
    pub resolved: Option<ResolvedMerchant>,
}

pub struct MerchantResolver<P> {
    places: P,
}

impl<P: PlaceSearch> MerchantResolver<P> {
    pub fn new(places: P) -> Self {
        Self { places }
    }

    /// Resolve a merchant name and location to a canonical place name.
    pub fn resolve(&self, merchant: &str, location: &str) -> Option<ResolvedMerchant> {
        let query = format!("{} {}", strip_store_numbers(merchant), location.trim());
        let query = query.trim();

        let candidate = match self.places.find_place(query) {
            Ok(Some(c)) => c,
            Ok(None) => {
                debug!(query, "no place candidates");
                return None;
            }
            Err(e) => {
                warn!(query, error = %e, "place search failed");
                return None;
            }
        };

        if let Some(name) = candidate.name.filter(|n| !n.trim().is_empty()) {
            return Some(ResolvedMerchant {
                place_id: candidate.place_id,
                name,
            });
        }

        let place_id = candidate.place_id.filter(|id| !id.trim().is_empty())?;
        match self.places.place_name(&place_id) {
            Ok(name) => Some(ResolvedMerchant {
                name: name.unwrap_or_else(|| MERCHANT_NOT_FOUND.to_string()),
                place_id: Some(place_id),
            }),
            Err(e) => {
                warn!(place_id = %place_id, error = %e, "place details failed");
                None
            }
        }
    }

    /// Parse a raw description and resolve its merchant.
    /// Returns `None` when the description does not parse.
    pub fn lookup_transaction(&self, raw: &str) -> Option<MerchantLookup> {
        let Some(transaction) = parse_transaction(raw) else {
            debug!(raw, "transaction details could not be extracted");
            return None;
        };

        let processor_name = transaction
            .processor_code
            .as_deref()
            .map(identify_payment_processor);
        let resolved = self.resolve(&transaction.merchant, &transaction.location);

        Some(MerchantLookup {
            transaction,
            processor_name,
            resolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{PlaceCandidate, ServiceError};
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakePlaces {
        candidate: Option<PlaceCandidate>,
        details: Option<String>,
        fail_search: bool,
        fail_details: bool,
        queries: RefCell<Vec<String>>,
        detail_ids: RefCell<Vec<String>>,
    }

    impl PlaceSearch for FakePlaces {
        fn find_place(&self, query: &str) -> Result<Option<PlaceCandidate>, ServiceError> {
            self.queries.borrow_mut().push(query.to_string());
            if self.fail_search {
                return Err(ServiceError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(self.candidate.clone())
        }

        fn place_name(&self, place_id: &str) -> Result<Option<String>, ServiceError> {
            self.detail_ids.borrow_mut().push(place_id.to_string());
            if self.fail_details {
                return Err(ServiceError::Transport("timed out".to_string()));
            }
            Ok(self.details.clone())
        }
    }

    fn candidate(place_id: Option<&str>, name: Option<&str>) -> Option<PlaceCandidate> {
        Some(PlaceCandidate {
            place_id: place_id.map(str::to_string),
            name: name.map(str::to_string),
        })
    }

    #[test]
    fn test_zero_candidates_is_unresolved() {
        let places = FakePlaces::default();
        let resolver = MerchantResolver::new(&places);
        assert_eq!(resolver.resolve("PROOF WINE & S", "Denver CO"), None);
    }

    #[test]
    fn test_name_from_search_is_used_directly() {
        let places = FakePlaces {
            candidate: candidate(Some("ChIJ123"), Some("Proof Wine & Spirits")),
            ..Default::default()
        };
        let resolver = MerchantResolver::new(&places);

        let resolved = resolver.resolve("PROOF WINE & S", "Denver CO").unwrap();
        assert_eq!(resolved.name, "Proof Wine & Spirits");
        assert_eq!(resolved.place_id.as_deref(), Some("ChIJ123"));
        assert!(places.detail_ids.borrow().is_empty());
    }

    #[test]
    fn test_id_only_falls_back_to_details() {
        let places = FakePlaces {
            candidate: candidate(Some("ChIJ456"), None),
            details: Some("Walmart Supercenter".to_string()),
            ..Default::default()
        };
        let resolver = MerchantResolver::new(&places);

        let resolved = resolver.resolve("WALMART #1234", "Aurora CO").unwrap();
        assert_eq!(resolved.name, "Walmart Supercenter");
        assert_eq!(*places.detail_ids.borrow(), vec!["ChIJ456".to_string()]);
    }

    #[test]
    fn test_details_without_result_uses_not_found_name() {
        let places = FakePlaces {
            candidate: candidate(Some("ChIJ789"), None),
            ..Default::default()
        };
        let resolver = MerchantResolver::new(&places);

        let resolved = resolver.resolve("BOXCAR", "Denver CO").unwrap();
        assert_eq!(resolved.name, MERCHANT_NOT_FOUND);
    }

    #[test]
    fn test_service_errors_are_swallowed() {
        let search_down = FakePlaces {
            fail_search: true,
            ..Default::default()
        };
        assert_eq!(MerchantResolver::new(&search_down).resolve("BOXCAR", "Denver CO"), None);

        let details_down = FakePlaces {
            candidate: candidate(Some("ChIJ789"), None),
            fail_details: true,
            ..Default::default()
        };
        assert_eq!(MerchantResolver::new(&details_down).resolve("BOXCAR", "Denver CO"), None);
    }

    #[test]
    fn test_store_numbers_removed_from_query() {
        let places = FakePlaces::default();
        let resolver = MerchantResolver::new(&places);
        resolver.resolve("WALMART #1234", "Aurora CO");
        assert_eq!(*places.queries.borrow(), vec!["WALMART Aurora CO".to_string()]);
    }

    #[test]
    fn test_lookup_transaction_enriches_parse() {
        let places = FakePlaces {
            candidate: candidate(Some("ChIJ123"), Some("Proof Wine & Spirits")),
            ..Default::default()
        };
        let resolver = MerchantResolver::new(&places);

        let lookup = resolver
            .lookup_transaction(
                "PURCHASE AUTHORIZED ON 01/01 SQ *PROOF WINE & S Denver CO S384033859155009 CARD 4987",
            )
            .unwrap();
        assert_eq!(lookup.processor_name, Some("Square"));
        assert_eq!(
            lookup.resolved.as_ref().map(|r| r.name.as_str()),
            Some("Proof Wine & Spirits")
        );
        assert_eq!(lookup.transaction.card_last4, "4987");
    }

    #[test]
    fn test_lookup_transaction_unparseable() {
        let places = FakePlaces::default();
        let resolver = MerchantResolver::new(&places);
        assert!(resolver.lookup_transaction("ONLINE TRANSFER REF #IB0X2").is_none());
        assert!(places.queries.borrow().is_empty());
    }
}
