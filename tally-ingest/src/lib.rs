//! tally-ingest: parsing of raw bank-statement transaction descriptions.

pub mod parsers;
pub mod types;

pub use parsers::debit_card::{extract_useful_portion, merchant_key, parse_transaction, strip_store_numbers};
pub use types::ParsedTransaction;
