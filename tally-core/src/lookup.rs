//! Static code tables: payment processor prefixes and merchant category codes (MCC)

pub const UNKNOWN_PROCESSOR: &str = "Unknown Processor";
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Processor prefixes seen before the `*` in card descriptions
const PROCESSORS: &[(&str, &str)] = &[
    ("SQ", "Square"),
    ("PAYPAL", "PayPal"),
    ("STRIPE", "Stripe"),
    ("CLOVER", "Clover"),
    ("AMZN", "Amazon"),
    ("ZELLE", "Zelle"),
    ("VENMO", "Venmo"),
    ("TST", "Toast"),
];

const MCC_CATEGORIES: &[(&str, &str)] = &[
    ("5411", "Grocery Stores"),
    ("5541", "Service Stations"),
    ("5732", "Electronics"),
    ("5812", "Restaurants"),
    ("5814", "Fast Food Restaurants"),
    ("5921", "Package Stores - Beer, Wine & Liquor"),
    ("7832", "Motion Picture Theaters"),
    ("7997", "Clubs & Memberships"),
];

/// Display name for a processor code such as `SQ` or `TST`.
/// Unknown codes map to [`UNKNOWN_PROCESSOR`].
pub fn identify_payment_processor(code: &str) -> &'static str {
    let code = code.trim().to_uppercase();
    PROCESSORS
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_PROCESSOR)
}

/// Display name for a four-digit MCC. Unknown codes map to [`UNKNOWN_CATEGORY`].
pub fn mcc_category(code: &str) -> &'static str {
    let code = code.trim();
    MCC_CATEGORIES
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_processors() {
        assert_eq!(identify_payment_processor("TST"), "Toast");
        assert_eq!(identify_payment_processor("SQ"), "Square");
        assert_eq!(identify_payment_processor(" paypal "), "PayPal");
    }

    #[test]
    fn test_unknown_processor() {
        assert_eq!(identify_payment_processor("XYZ"), "Unknown Processor");
        assert_eq!(identify_payment_processor(""), UNKNOWN_PROCESSOR);
    }

    #[test]
    fn test_mcc_lookup() {
        assert_eq!(mcc_category("5812"), "Restaurants");
        assert_eq!(mcc_category("7997"), "Clubs & Memberships");
        assert_eq!(mcc_category("0000"), "Unknown Category");
    }
}
