//! Phone-number validation and account-number derivation.

use super::error::ValidationError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Number of leading characters the fixed-offset policy drops (`+` and three digits).
pub const FIXED_OFFSET: usize = 4;

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\+[1-9][0-9]{1,3}[0-9]{8,14}$").expect("valid phone pattern")
    })
}

/// `+`, a one to four digit country code and 8 to 14 further digits, all ASCII.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone)
}

/// Calling code, region and the national significant number lengths it allows.
const COUNTRY_CODES: &[(&str, &str, &[usize])] = &[
    ("1", "US", &[10]),
    ("20", "EG", &[10]),
    ("27", "ZA", &[9]),
    ("33", "FR", &[9]),
    ("44", "GB", &[10]),
    ("49", "DE", &[10, 11]),
    ("61", "AU", &[9]),
    ("91", "IN", &[10]),
    ("221", "SN", &[9]),
    ("225", "CI", &[10]),
    ("233", "GH", &[9]),
    ("234", "NG", &[10]),
    ("237", "CM", &[9]),
    ("254", "KE", &[9]),
    ("255", "TZ", &[9]),
    ("256", "UG", &[9]),
];

/// A phone number split at its calling code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPhone {
    pub country_code: &'static str,
    pub region: &'static str,
    pub national_number: String,
}

/// Splits `phone` at its calling code and checks the national number length.
///
/// Calling codes are prefix-free, so at most one table entry can match.
pub fn parse_phone(phone: &str) -> Result<ParsedPhone, ValidationError> {
    if !is_valid_phone(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    let digits = &phone[1..];
    let &(country_code, region, lengths) = COUNTRY_CODES
        .iter()
        .find(|(code, _, _)| digits.starts_with(code))
        .ok_or_else(|| ValidationError::UnknownCountryCode(phone.to_string()))?;

    let national_number = &digits[country_code.len()..];
    if !lengths.contains(&national_number.len()) {
        return Err(ValidationError::NationalNumberLength {
            region: region.to_string(),
            actual: national_number.len(),
        });
    }
    Ok(ParsedPhone {
        country_code,
        region,
        national_number: national_number.to_string(),
    })
}

/// How an account number is derived from a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountNumberPolicy {
    /// Everything after the first four characters, whatever the country code length.
    #[default]
    FixedOffset,
    /// The national significant number, after a country-code table lookup.
    CountryCode,
}

impl AccountNumberPolicy {
    /// Derives the account number, refusing phones that fail [`is_valid_phone`].
    pub fn derive(self, phone: &str) -> Result<String, ValidationError> {
        if !is_valid_phone(phone) {
            return Err(ValidationError::InvalidPhone);
        }
        match self {
            AccountNumberPolicy::FixedOffset => phone
                .get(FIXED_OFFSET..)
                .map(str::to_string)
                .ok_or(ValidationError::InvalidPhone),
            AccountNumberPolicy::CountryCode => Ok(parse_phone(phone)?.national_number),
        }
    }
}

impl FromStr for AccountNumberPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed-offset" => Ok(AccountNumberPolicy::FixedOffset),
            "country-code" => Ok(AccountNumberPolicy::CountryCode),
            other => Err(format!("unknown account number policy: {}", other)),
        }
    }
}

impl fmt::Display for AccountNumberPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountNumberPolicy::FixedOffset => f.write_str("fixed-offset"),
            AccountNumberPolicy::CountryCode => f.write_str("country-code"),
        }
    }
}
