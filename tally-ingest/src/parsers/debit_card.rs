//! Card transaction descriptions from checking-account statements
//!
//! Expected shape (one line per transaction):
//!   PURCHASE AUTHORIZED ON 01/01 SQ *PROOF WINE & S Denver CO S384033859155009 CARD 4987
//!   RECURRING PAYMENT AUTHORIZED ON 02/14 NETFLIX.COM Los Gatos CA S463045123456789 CARD 4987
//!
//! Matching is greedy: when the city has more than one word the merchant name
//! can swallow the first of them. That is left as-is.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ParsedTransaction;

static TRANSACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<type>(?:PURCHASE|RECURRING PAYMENT)(?:\s+(?:AUTHORIZED|POS|CHARGE))?|POS|CHARGE)\s+ON\s+",
        r"(?P<date>\d{2}/\d{2})\s+",
        r"(?:(?P<processor>\w+)\s*\*)?\s*",
        r"(?P<merchant>[A-Za-z0-9 &#*+,.\-]+)\s+",
        r"(?P<location>[A-Za-z][A-Za-z ]*\s+[A-Z]{2})\s+",
        r"(?P<mid>[A-Z]\d+)\s+CARD\s+(?P<card>\d{4})"
    ))
    .expect("transaction grammar is a valid regex")
});

static USEFUL_PORTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"AUTHORIZED ON \d{2}/\d{2} (.*?) CARD").expect("useful-portion pattern is a valid regex")
});

// Store numbers such as "#1234" or "0042-17"
static STORE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+-?\d*").expect("store-number pattern is a valid regex"));

/// Parse a raw description with the full grammar.
///
/// Returns `None` when the description does not fit; callers fall back to
/// [`extract_useful_portion`].
pub fn parse_transaction(raw: &str) -> Option<ParsedTransaction> {
    let caps = TRANSACTION_RE.captures(raw)?;

    Some(ParsedTransaction {
        kind: caps["type"].trim().to_string(),
        date: caps["date"].to_string(),
        processor_code: caps.name("processor").map(|m| m.as_str().trim().to_string()),
        merchant: caps["merchant"].trim().to_string(),
        location: caps["location"].trim().to_string(),
        mid: caps["mid"].to_string(),
        card_last4: caps["card"].to_string(),
    })
}

/// Text between `AUTHORIZED ON MM/DD` and `CARD`, or the whole trimmed input.
pub fn extract_useful_portion(raw: &str) -> String {
    match USEFUL_PORTION_RE.captures(raw) {
        Some(caps) => caps[1].trim().to_string(),
        None => raw.trim().to_string(),
    }
}

/// The part of a description that identifies the merchant: the parsed merchant
/// name when the grammar applies, otherwise [`extract_useful_portion`].
pub fn merchant_key(raw: &str) -> String {
    match parse_transaction(raw) {
        Some(txn) => txn.merchant,
        None => extract_useful_portion(raw),
    }
}

/// Drop store numbers from a merchant name before searching for the place.
pub fn strip_store_numbers(name: &str) -> String {
    let stripped = STORE_NUMBER_RE.replace_all(name, "");
    stripped
        .split_whitespace()
        .filter(|token| *token != "#")
        .collect::<Vec<_>>()
        .join(" ")
}
