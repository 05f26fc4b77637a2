//! ISO 3166-1 alpha-2 country codes.

use crate::{Error, Result};

/// All officially assigned ISO 3166-1 alpha-2 codes.
pub const ISO_3166_1_ALPHA_2_CODES: [&str; 249] = [
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Check if `code` is an assigned alpha-2 code (upper case).
pub fn is_country_code(code: &str) -> bool {
    ISO_3166_1_ALPHA_2_CODES.binary_search(&code).is_ok()
}

/// Upper-case and validate a user supplied country code.
pub fn normalize_country_code(code: &str) -> Result<String> {
    let upper = code.trim().to_uppercase();
    if is_country_code(&upper) {
        Ok(upper)
    } else {
        Err(Error::InvalidCountryCode(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_sorted_and_unique() {
        assert!(ISO_3166_1_ALPHA_2_CODES.windows(2).all(|w| w[0] < w[1]));
        assert!(ISO_3166_1_ALPHA_2_CODES.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_country_code("jp").unwrap(), "JP");
        assert_eq!(normalize_country_code(" Us ").unwrap(), "US");
        assert!(matches!(
            normalize_country_code("XX"),
            Err(Error::InvalidCountryCode(_))
        ));
        assert!(normalize_country_code("").is_err());
        assert!(normalize_country_code("USA").is_err());
    }

    #[test]
    fn test_is_country_code() {
        assert!(is_country_code("DE"));
        assert!(!is_country_code("de"));
        assert!(!is_country_code("EU"));
        assert!(!is_country_code("ZZ"));
    }
}
