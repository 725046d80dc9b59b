use serde::Serialize;

/// Fields recovered from one card transaction description.
///
/// Produced all at once by a single grammar match; there is no partially
/// parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTransaction {
    /// Transaction type prefix, e.g. `PURCHASE AUTHORIZED` or `POS`
    pub kind: String,
    /// `MM/DD` as printed on the statement (no year)
    pub date: String,
    /// Processor prefix before the `*`, e.g. `SQ` or `TST`
    pub processor_code: Option<String>,
    pub merchant: String,
    /// City and two-letter state
    pub location: String,
    /// Merchant/location identifier, a letter followed by digits
    pub mid: String,
    pub card_last4: String,
}

#[cfg(test)]
mod tests {
    use crate::parse_transaction;

    #[test]
    fn test_json_field_names() {
        let txn = parse_transaction(
            "PURCHASE AUTHORIZED ON 01/01 SQ *PROOF WINE & S Denver CO S384033859155009 CARD 4987",
        )
        .unwrap();
        let v = serde_json::to_value(&txn).unwrap();
        assert_eq!(v["kind"], "PURCHASE AUTHORIZED");
        assert_eq!(v["processor_code"], "SQ");
        assert_eq!(v["merchant"], "PROOF WINE & S");
        assert_eq!(v["card_last4"], "4987");
    }
}
