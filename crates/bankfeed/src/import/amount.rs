use bigdecimal::BigDecimal;

use crate::error::AmountParseError;

/// Parse a statement amount cell into a signed decimal.
///
/// Accepts grouping commas, surrounding quotes, leading `£`/`$`, and the
/// parenthesised-negative convention (`(45.99)` means `-45.99`). Empty or
/// whitespace input is an error, never zero. The result always carries at
/// least two decimal places.
pub fn parse_amount(raw: &str) -> Result<BigDecimal, AmountParseError> {
    let stripped = raw
        .replace(',', "")
        .replace('"', "")
        .replace('£', "")
        .replace('$', "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::NotNumeric(raw.to_string()));
    }

    if let Some(inner) = trimmed.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        let magnitude = parse_plain(inner.trim(), raw)?;
        return Ok(at_least_cents(-magnitude));
    }

    parse_plain(trimmed, raw).map(at_least_cents)
}

fn parse_plain(value: &str, raw: &str) -> Result<BigDecimal, AmountParseError> {
    value
        .parse::<BigDecimal>()
        .map_err(|_| AmountParseError::NotNumeric(raw.to_string()))
}

// Cent-level scale keeps sums and display stable for short inputs like "5".
fn at_least_cents(value: BigDecimal) -> BigDecimal {
    if value.fractional_digit_count() < 2 {
        return value.with_scale(2);
    }
    value
}
