//! Converters from raw sheet strings to typed values.
//!
//! Every function here is total: malformed input yields a default or `None`,
//! never an error.

use chrono::NaiveDate;

use salonsite_shared::{Gender, PhoneNumbers};

/// Accepted `Valid_till` formats, tried in order.
const EXPIRY_FORMATS: &[&str] = &["%d-%b-%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Country code prefixed to local numbers.
const COUNTRY_CODE: &str = "91";

/// Length of a local mobile/landline number.
const LOCAL_DIGITS: usize = 10;

/// Whether a flag cell reads as affirmative (`yes`, `y`, `true`, `1`).
pub fn is_yes(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

/// Map a gender cell to the audience it is listed under.
pub fn norm_gender(value: &str) -> Gender {
    match value.trim().to_lowercase().as_str() {
        "female" | "women" | "f" | "w" => Gender::Female,
        "male" | "men" | "m" => Gender::Male,
        _ => Gender::Unisex,
    }
}

/// Parse an offer's `Valid_till` cell.
pub fn parse_expiry(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    EXPIRY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Whether an offer with this `Valid_till` is still running on `today`.
///
/// Empty, `-` and unparseable values never expire. The expiry day itself
/// still counts as active.
pub fn is_offer_active(valid_till: &str, today: NaiveDate) -> bool {
    let trimmed = valid_till.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return true;
    }
    expiry_is_active(parse_expiry(trimmed), today)
}

/// Same rule as [`is_offer_active`] for an already-parsed expiry.
pub fn expiry_is_active(expiry: Option<NaiveDate>, today: NaiveDate) -> bool {
    expiry.is_none_or(|expiry| expiry >= today)
}

/// Normalise a phone cell into display, dial and WhatsApp forms.
///
/// The local number is the last ten digits, after dropping a leading `91`
/// from twelve-digit input. A cell with no digits at all is passed through
/// unchanged in every slot.
pub fn normalise_phone(raw: &str) -> PhoneNumbers {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return PhoneNumbers {
            display: raw.to_string(),
            dial: raw.to_string(),
            whatsapp: raw.to_string(),
        };
    }

    let local = if digits.len() == 12 && digits.starts_with(COUNTRY_CODE) {
        &digits[2..]
    } else if digits.len() <= LOCAL_DIGITS {
        &digits[..]
    } else {
        &digits[digits.len() - LOCAL_DIGITS..]
    };

    let display = if local.len() > 5 {
        format!("+{COUNTRY_CODE} {} {}", &local[..5], &local[5..])
    } else {
        format!("+{COUNTRY_CODE} {local}")
    };

    PhoneNumbers {
        display,
        dial: format!("+{COUNTRY_CODE}{local}"),
        whatsapp: format!("{COUNTRY_CODE}{local}"),
    }
}

/// Parse a price cell such as `₹1,200` or `1200.00`.
pub fn parse_price(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn is_yes_accepts_affirmatives_in_any_case() {
        for v in ["yes", "YES", " Yes ", "y", "Y", "true", "True", "1", "\t1\n"] {
            assert!(is_yes(v), "{v:?} should be yes");
        }
    }

    #[test]
    fn is_yes_rejects_everything_else() {
        for v in ["", "no", "n", "false", "0", "yes please", "-", "2"] {
            assert!(!is_yes(v), "{v:?} should not be yes");
        }
    }

    #[test]
    fn norm_gender_buckets() {
        assert_eq!(norm_gender("Female"), Gender::Female);
        assert_eq!(norm_gender(" women "), Gender::Female);
        assert_eq!(norm_gender("W"), Gender::Female);
        assert_eq!(norm_gender("MALE"), Gender::Male);
        assert_eq!(norm_gender("m"), Gender::Male);
        assert_eq!(norm_gender(""), Gender::Unisex);
        assert_eq!(norm_gender("Unisex"), Gender::Unisex);
        assert_eq!(norm_gender("kids"), Gender::Unisex);
    }

    #[test]
    fn parse_expiry_accepts_each_format() {
        assert_eq!(parse_expiry("13-Mar-2026"), Some(date(2026, 3, 13)));
        assert_eq!(parse_expiry(" 13/03/2026 "), Some(date(2026, 3, 13)));
        assert_eq!(parse_expiry("2026-03-13"), Some(date(2026, 3, 13)));
    }

    #[test]
    fn parse_expiry_rejects_garbage() {
        assert_eq!(parse_expiry(""), None);
        assert_eq!(parse_expiry("-"), None);
        assert_eq!(parse_expiry("next month"), None);
        assert_eq!(parse_expiry("31/02/2026"), None);
    }

    #[test]
    fn offer_without_date_is_active() {
        let today = date(2026, 3, 13);
        assert!(is_offer_active("", today));
        assert!(is_offer_active("  ", today));
        assert!(is_offer_active("-", today));
        assert!(is_offer_active("while stocks last", today));
    }

    #[test]
    fn offer_expiry_boundaries() {
        let today = date(2026, 3, 13);
        assert!(!is_offer_active("12-Mar-2026", today));
        assert!(is_offer_active("13-Mar-2026", today));
        assert!(is_offer_active("14-Mar-2026", today));
        assert!(!is_offer_active("2020-01-01", today));
        assert!(is_offer_active("01/01/2030", today));
    }

    #[test]
    fn phone_with_country_code() {
        let phone = normalise_phone("918792642299");
        assert_eq!(phone.display, "+91 87926 42299");
        assert_eq!(phone.dial, "+918792642299");
        assert_eq!(phone.whatsapp, "918792642299");
    }

    #[test]
    fn phone_with_punctuation_and_plus() {
        let phone = normalise_phone("+91 98450-11223");
        assert_eq!(phone.display, "+91 98450 11223");
        assert_eq!(phone.dial, "+919845011223");
    }

    #[test]
    fn phone_ten_digits_used_as_is() {
        assert_eq!(normalise_phone("9845011223").whatsapp, "919845011223");
    }

    #[test]
    fn phone_with_trunk_zero_keeps_last_ten() {
        let phone = normalise_phone("09845022334");
        assert_eq!(phone.display, "+91 98450 22334");
    }

    #[test]
    fn phone_short_number_kept_whole() {
        let phone = normalise_phone("12345");
        assert_eq!(phone.display, "+91 12345");
        assert_eq!(phone.dial, "+9112345");
    }

    #[test]
    fn phone_without_digits_passes_through() {
        let phone = normalise_phone("");
        assert_eq!(phone.display, "");
        assert_eq!(phone.dial, "");
        assert_eq!(phone.whatsapp, "");

        let phone = normalise_phone("N/A");
        assert_eq!(phone.display, "N/A");
        assert_eq!(phone.whatsapp, "N/A");
    }

    #[test]
    fn parse_price_strips_currency_and_separators() {
        assert_eq!(parse_price("₹1,200"), Some(1200.0));
        assert_eq!(parse_price("INR 499.50"), Some(499.5));
        assert_eq!(parse_price("300"), Some(300.0));
        assert_eq!(parse_price("0"), Some(0.0));
    }

    #[test]
    fn parse_price_without_number_is_none() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price("on request"), None);
        assert_eq!(parse_price("1.2.3"), None);
    }
}
