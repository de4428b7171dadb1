use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static PHONE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().\-]+$").expect("phone pattern compiles"));

// US ZIP / ZIP+4 and Canadian postal codes.
static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{5}(-\d{4})?|[A-Za-z]\d[A-Za-z] ?\d[A-Za-z]\d)$")
        .expect("postal code pattern compiles")
});

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// Digits with optional leading `+` and common separators; 7 to 15 digits.
pub fn is_phone(value: &str) -> bool {
    let value = value.trim();
    let digits = value.chars().filter(char::is_ascii_digit).count();
    PHONE_CHARS.is_match(value) && (7..=15).contains(&digits)
}

pub fn is_postal_code(value: &str) -> bool {
    POSTAL_CODE.is_match(value.trim())
}
