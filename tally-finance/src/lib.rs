//! tally-finance: category map, classifier, merchant resolver and the CSV batch driver

pub mod batch;
pub mod category_map;
pub mod classifier;
pub mod ledger;
pub mod resolver;
pub mod services;

pub use batch::{
    categorize_ledger, categorize_rows, resolve_ledger, write_resolved, CategorizeSummary, ResolvedRow,
};
pub use category_map::CategoryMap;
pub use classifier::{Classification, Classifier, LabelSource};
pub use ledger::{read_ledger, write_ledger, Ledger, LedgerRow};
pub use resolver::{MerchantLookup, MerchantResolver, ResolvedMerchant, MERCHANT_NOT_FOUND};
pub use services::{CategorySource, PlaceCandidate, PlaceSearch, ServiceError};
