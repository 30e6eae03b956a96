use regex::Regex;
use std::sync::OnceLock;

/// Longest digit run the ITU allows for a subscriber number
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestValidationError {
    #[error("Missing required parameter: {0}")]
    MissingField(&'static str),

    #[error("Phone number contains no digits")]
    NoDigits,

    #[error("Phone number has {0} digits, maximum is 15")]
    TooLong(usize),

    #[error("Invalid country code: {0}")]
    InvalidCountryCode(String),
}

/// A request that passed input validation, with both fields normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    /// Digits only
    pub phone_number: String,
    /// `+` followed by one to four digits
    pub country_code: String,
}

impl NormalizedRequest {
    /// Human-readable form used in prompts and log lines
    pub fn display(&self) -> String {
        format!("{} {}", self.country_code, self.phone_number)
    }
}

fn country_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?(\d{1,4})$").expect("country code regex is valid"))
}

/// Strip every non-digit separator from a phone number
pub fn normalize_phone_number(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Accepts `"+44"`, `"44"` and `" +44 "`, returns `"+44"`
pub fn normalize_country_code(raw: &str) -> Result<String, RequestValidationError> {
    let trimmed = raw.trim();
    let captures = country_code_regex()
        .captures(trimmed)
        .ok_or_else(|| RequestValidationError::InvalidCountryCode(trimmed.to_string()))?;

    Ok(format!("+{}", &captures[1]))
}

pub fn validate_request(
    phone_number: &str,
    country_code: &str,
) -> Result<NormalizedRequest, RequestValidationError> {
    if phone_number.trim().is_empty() {
        return Err(RequestValidationError::MissingField("phoneNumber"));
    }
    if country_code.trim().is_empty() {
        return Err(RequestValidationError::MissingField("countryCode"));
    }

    let digits = normalize_phone_number(phone_number);
    if digits.is_empty() {
        return Err(RequestValidationError::NoDigits);
    }
    if digits.len() > MAX_PHONE_DIGITS {
        return Err(RequestValidationError::TooLong(digits.len()));
    }

    Ok(NormalizedRequest {
        phone_number: digits,
        country_code: normalize_country_code(country_code)?,
    })
}
