use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// Regex for validating phone numbers
    /// Digits with optional leading "+" and single spaces, dashes or dots between groups
    /// - Valid: "555-123-4567", "+48 601 234 567", "0044.20.7946.0958"
    /// - Invalid: "phone", "555--1234", "-555", "12"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{2,}(?:[ .\-][0-9]+)*$").unwrap();

    /// Regex for validating postal codes
    /// Alphanumeric groups separated by a single space or dash
    /// - Valid: "00-950", "SW1A 1AA", "10115"
    /// - Invalid: "", " 123", "12--34"
    pub static ref POST_CODE_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9]+(?:[ \-][A-Za-z0-9]+)*$").unwrap();
}

/// Rejects strings that are empty after trimming
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Rejects negative money amounts
pub fn validate_non_negative_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_amount")
            .with_message("amount must not be negative".into()));
    }
    Ok(())
}

/// Rejects certification lists containing blank entries
pub fn validate_certifications(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|c| c.trim().is_empty()) {
        return Err(ValidationError::new("blank_certification")
            .with_message("certifications must not contain blank entries".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("555-123-4567"));
        assert!(PHONE_REGEX.is_match("+48 601 234 567"));
        assert!(PHONE_REGEX.is_match("0044.20.7946.0958"));
        assert!(PHONE_REGEX.is_match("112"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("phone"));
        assert!(!PHONE_REGEX.is_match("555--1234")); // double separator
        assert!(!PHONE_REGEX.is_match("-555")); // leading separator
        assert!(!PHONE_REGEX.is_match("1")); // too short
        assert!(!PHONE_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_post_code_regex() {
        assert!(POST_CODE_REGEX.is_match("00-950"));
        assert!(POST_CODE_REGEX.is_match("SW1A 1AA"));
        assert!(!POST_CODE_REGEX.is_match(" 123"));
        assert!(!POST_CODE_REGEX.is_match("12--34"));
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Rescuer").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_non_negative_money() {
        assert!(validate_non_negative_money(&dec("0")).is_ok());
        assert!(validate_non_negative_money(&dec("-0.00")).is_ok());
        assert!(validate_non_negative_money(&dec("19.99")).is_ok());
        assert!(validate_non_negative_money(&dec("-0.01")).is_err());
    }

    #[test]
    fn test_certifications() {
        assert!(validate_certifications(&["CPR".to_string(), "EMT-B".to_string()]).is_ok());
        assert!(validate_certifications(&[]).is_ok());
        assert!(validate_certifications(&["CPR".to_string(), " ".to_string()]).is_err());
    }
}
