//! Key/value text parsing
//!
//! `application/x-www-form-urlencoded` parsing on top of `url::form_urlencoded`.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::error::{Result, TopicError};

/// Every value seen for each key, in arrival order
pub type QueryValues = HashMap<String, Vec<String>>;

/// Parse `k1=v1&k2=v2` into key → values
///
/// Percent escapes and `+` are decoded. Pairs containing `;` or a malformed
/// `%` escape are dropped; the rest are kept. Use [`validate_query`] to find
/// out whether anything was dropped.
pub fn parse_query(text: &str) -> QueryValues {
    let mut values = QueryValues::new();
    for pair in text.split('&').filter(|pair| !pair.is_empty()) {
        if check_pair(pair).is_err() {
            continue;
        }
        for (key, value) in form_urlencoded::parse(pair.as_bytes()) {
            values
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }
    values
}

/// Check key/value text for encoding errors
///
/// Reports the first pair containing a `;` separator or a `%` not followed by
/// two hex digits.
pub fn validate_query(text: &str) -> Result<()> {
    text.split('&').try_for_each(check_pair)
}

fn check_pair(pair: &str) -> Result<()> {
    if pair.contains(';') {
        return Err(TopicError::StatusParse(format!(
            "invalid semicolon separator in {:?}",
            pair
        )));
    }

    let bytes = pair.as_bytes();
    for (pos, _) in pair.match_indices('%') {
        let escape = bytes.get(pos + 1..pos + 3);
        let valid = matches!(escape, Some(&[hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
        if !valid {
            let end = (pos + 3).min(pair.len());
            return Err(TopicError::StatusParse(format!(
                "invalid URL escape {:?} in {:?}",
                String::from_utf8_lossy(&bytes[pos..end]),
                pair
            )));
        }
    }

    Ok(())
}
