//! Canonicalization of heterogeneous Ivorian phone number formats.
//!
//! Subscriber numbers arrive as anything from `07 01 23 45 67` over
//! `00225...` down to the legacy 8-digit form. [`normalize`] folds them all
//! into one E.164-like shape: `+225` followed by the subscriber digits.

const COUNTRY_CODE: &str = "225";

/// Normalize a raw phone number into international format.
///
/// Returns `None` when the input is empty or carries no digits at all;
/// anything else is resolved best-effort. The 10-digit rules are order
/// sensitive: a leading `0` is the domestic trunk prefix and is dropped,
/// while 10 digits without it belong to the newer numbering plan and are
/// kept whole. The two branches produce numerically different results for
/// the same length of input, which matches the numbering plan in use.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    if digits.starts_with(COUNTRY_CODE) {
        // Already international, just missing the plus.
        return Some(format!("+{digits}"));
    }

    if let Some(rest) = digits.strip_prefix("00") {
        if rest.starts_with(COUNTRY_CODE) {
            return Some(format!("+{rest}"));
        }
    }

    match digits.len() {
        10 if digits.starts_with('0') => Some(format!("+{COUNTRY_CODE}{}", &digits[1..])),
        10 => Some(format!("+{COUNTRY_CODE}{digits}")),
        8 => Some(format!("+{COUNTRY_CODE}{digits}")),
        // Unrecognized shape, e.g. a foreign number: pass through with a plus.
        _ => Some(format!("+{digits}")),
    }
}
