use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

#[allow(clippy::expect_used)]
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9\- ]{5,18}[0-9]$").expect("compile phone regex"));

#[allow(clippy::expect_used)]
static GENDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L} \-]{1,20}$").expect("compile gender regex"));

#[allow(clippy::expect_used)]
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?[\p{L}\p{N}_]{1,50}$").expect("compile tag regex"));

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Gender is free-form text, but it must be short and
/// made of letters, spaces or dashes.
pub fn is_valid_gender(gender: &str) -> bool {
    GENDER_REGEX.is_match(gender)
}

/// A hashtag is up to 50 letters, digits or underscores, optionally
/// prefixed with `#`.
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_REGEX.is_match(tag)
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        let mut error = ValidationError::new("phone");
        error.message = Some("Invalid phone number".into());
        Err(error)
    }
}

pub fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if is_valid_gender(gender) {
        Ok(())
    } else {
        let mut error = ValidationError::new("gender");
        error.message = Some("Invalid gender".into());
        Err(error)
    }
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().all(|tag| is_valid_tag(tag)) {
        Ok(())
    } else {
        let mut error = ValidationError::new("tags");
        error.message = Some("Invalid tag".into());
        Err(error)
    }
}
