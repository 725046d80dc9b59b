//! tally-core: category label type and static code tables shared by the tally crates

pub mod label;
pub mod lookup;

pub use label::{CategoryLabel, UNCATEGORIZED};
pub use lookup::{identify_payment_processor, mcc_category, UNKNOWN_CATEGORY, UNKNOWN_PROCESSOR};
