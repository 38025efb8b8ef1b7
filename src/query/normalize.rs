//! Quote-aware case folding.

use crate::types::{QueryError, Result};

/// Lower-case query text outside of the first quoted literal.
///
/// The literal (single- or double-quoted, closed by the same quote
/// character) is copied byte for byte so string comparisons stay
/// case-sensitive. Text without quotes is lower-cased entirely.
///
/// # Errors
///
/// Returns `QueryError::MalformedLiteral` if the opening quote is never closed
///
/// # Example
///
/// ```rust
/// use percolate_query::query::normalize;
///
/// let text = normalize("SELECT t.a FROM t WHERE t.b = 'MixedCase'").unwrap();
/// assert_eq!(text, "select t.a from t where t.b = 'MixedCase'");
/// ```
pub fn normalize(text: &str) -> Result<String> {
    let Some(begin) = text.find(&['\'', '"'][..]) else {
        return Ok(text.to_lowercase());
    };

    let quote = &text[begin..begin + 1];
    let end = text[begin + 1..]
        .find(quote)
        .map(|offset| begin + 1 + offset)
        .ok_or(QueryError::MalformedLiteral(begin))?;

    let mut normalized = String::with_capacity(text.len());
    normalized.push_str(&text[..begin].to_lowercase());
    normalized.push_str(&text[begin..=end]);
    normalized.push_str(&text[end + 1..].to_lowercase());
    Ok(normalized)
}
