//! Danish krone formatting

use super::FormatError;

/// Currency indicator appended after the amount
pub const CURRENCY_SYMBOL: &str = "kr.";

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';
const NO_BREAK_SPACE: char = '\u{a0}';

/// Format a price as Danish kroner with exactly two fractional digits
///
/// Grouping uses `.` and the decimal separator is `,`; the amount and the
/// `kr.` indicator are joined by a no-break space. Cents are rounded half
/// away from zero on the shortest decimal representation of the value, so
/// `0.145` becomes `0,15 kr.`. Negative input keeps its sign even when it
/// rounds to zero (`-0.001` is `-0,00 kr.`).
///
/// ```
/// use elpris_page::format::format_price;
///
/// assert_eq!(format_price(1234.5).unwrap(), "1.234,50\u{a0}kr.");
/// ```
pub fn format_price(price: f64) -> Result<String, FormatError> {
    if !price.is_finite() {
        return Err(FormatError::NonFinitePrice(price));
    }

    let (whole, cents) = round_to_cents(price.abs());

    let mut out = String::with_capacity(whole.len() + whole.len() / 3 + 8);
    if price.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(&whole));
    out.push(DECIMAL_SEPARATOR);
    out.push_str(&cents);
    out.push(NO_BREAK_SPACE);
    out.push_str(CURRENCY_SYMBOL);
    Ok(out)
}

/// Parse decimal text and format it as a price
///
/// Accepts `.` as the decimal point. A lone `,` is accepted as the decimal
/// point too when the text contains no `.` (e.g. `"12,5"`).
pub fn format_price_str(input: &str) -> Result<String, FormatError> {
    let trimmed = input.trim();
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replacen(',', ".", 1)
    } else {
        trimmed.to_string()
    };

    let price: f64 = normalized
        .parse()
        .map_err(|_| FormatError::InvalidPrice(input.to_string()))?;

    format_price(price)
}

/// Round a non-negative finite value to cents, returning (whole, cents) digits
fn round_to_cents(value: f64) -> (String, String) {
    // f64 Display never uses exponent notation and yields the shortest
    // representation that round-trips.
    let repr = value.to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(2))
        .map(|b| b - b'0')
        .collect();

    let round_up = fraction.as_bytes().get(2).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut carried = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carried = false;
                break;
            }
        }
        if carried {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - 2;
    let to_text = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    (to_text(&digits[..split]), to_text(&digits[split..]))
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: String) -> String {
        s.replace(NO_BREAK_SPACE, " ")
    }

    #[test]
    fn test_format_price_grouping() {
        let formatted = format_price(1234.5).unwrap();
        assert!(formatted.contains("1.234,50"));
        assert!(formatted.ends_with(CURRENCY_SYMBOL));
        assert_eq!(plain(formatted), "1.234,50 kr.");

        assert_eq!(plain(format_price(1234567.891).unwrap()), "1.234.567,89 kr.");
        assert_eq!(plain(format_price(999.0).unwrap()), "999,00 kr.");
        assert_eq!(plain(format_price(1000.0).unwrap()), "1.000,00 kr.");
    }

    #[test]
    fn test_format_price_zero() {
        assert_eq!(plain(format_price(0.0).unwrap()), "0,00 kr.");
        assert_eq!(plain(format_price(0.004).unwrap()), "0,00 kr.");
    }

    #[test]
    fn test_format_price_negative_zero_keeps_sign() {
        assert_eq!(plain(format_price(-0.0).unwrap()), "-0,00 kr.");
        assert_eq!(plain(format_price(-0.001).unwrap()), "-0,00 kr.");
        assert_eq!(plain(format_price_str("-0,004").unwrap()), "-0,00 kr.");
    }

    #[test]
    fn test_format_price_small_and_negative() {
        assert_eq!(plain(format_price(0.5).unwrap()), "0,50 kr.");
        assert_eq!(plain(format_price(2.1).unwrap()), "2,10 kr.");
        assert_eq!(plain(format_price(-1234.5).unwrap()), "-1.234,50 kr.");
    }

    #[test]
    fn test_format_price_rounding() {
        assert_eq!(plain(format_price(0.145).unwrap()), "0,15 kr.");
        assert_eq!(plain(format_price(2.344).unwrap()), "2,34 kr.");
        assert_eq!(plain(format_price(9.995).unwrap()), "10,00 kr.");
        assert_eq!(plain(format_price(999.999).unwrap()), "1.000,00 kr.");
        assert_eq!(plain(format_price(-2.005).unwrap()), "-2,01 kr.");
    }

    #[test]
    fn test_format_price_rejects_non_finite() {
        assert!(matches!(
            format_price(f64::NAN),
            Err(FormatError::NonFinitePrice(_))
        ));
        assert!(matches!(
            format_price(f64::NEG_INFINITY),
            Err(FormatError::NonFinitePrice(_))
        ));
    }

    #[test]
    fn test_format_price_str() {
        assert_eq!(plain(format_price_str("2.4567").unwrap()), "2,46 kr.");
        assert_eq!(plain(format_price_str(" 12,5 ").unwrap()), "12,50 kr.");
        assert!(matches!(
            format_price_str("cheap"),
            Err(FormatError::InvalidPrice(_))
        ));
        assert!(matches!(
            format_price_str("NaN"),
            Err(FormatError::NonFinitePrice(_))
        ));
    }
}
