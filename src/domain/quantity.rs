use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Quantities, rates and amounts are exact decimals. Row fields are kept as
/// text while editing and only turned into a `Quantity` when read.
pub type Quantity = Decimal;

/// Coerce a text field into a number, never failing.
///
/// Reads the longest valid decimal prefix after leading whitespace, so a
/// half-typed value still counts for what it already says:
/// "12." -> 12, "12abc" -> 12, ".5" -> 0.5, "1e3" -> 1000.
/// Empty text, a lone sign, or anything without a leading digit is zero,
/// as is a value too large for a `Decimal`.
pub fn coerce(text: &str) -> Quantity {
    let Some(prefix) = numeric_prefix(text.trim_start()) else {
        return Decimal::ZERO;
    };

    let parsed = if prefix.exponent.is_some() {
        Decimal::from_scientific(&prefix.to_scientific())
    } else {
        Decimal::from_str(&prefix.mantissa())
    };

    parsed.map(|value| value.normalize()).unwrap_or(Decimal::ZERO)
}

/// Round a product to a whole amount, halves away from zero (2.5 -> 3, -2.5 -> -3).
pub fn round_amount(value: Quantity) -> Quantity {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Format a value with `,` thousands separators on the integer part.
/// Example: 1234567 -> "1,234,567", -1800 -> "-1,800", 1234.5 -> "1,234.5"
pub fn format_grouped(value: Quantity) -> String {
    let text = value.normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format a value without grouping, trailing zeros dropped.
pub fn format_plain(value: Quantity) -> String {
    value.normalize().to_string()
}

struct NumericPrefix<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
    exponent: Option<&'a str>,
}

impl NumericPrefix<'_> {
    fn mantissa(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        let integer = if self.integer.is_empty() { "0" } else { self.integer };
        if self.fraction.is_empty() {
            format!("{sign}{integer}")
        } else {
            format!("{sign}{integer}.{}", self.fraction)
        }
    }

    fn to_scientific(&self) -> String {
        let exponent = self.exponent.unwrap_or("0").trim_start_matches('+');
        format!("{}e{}", self.mantissa(), exponent)
    }
}

fn numeric_prefix(input: &str) -> Option<NumericPrefix<'_>> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let integer_start = pos;
    pos += count_digits(&bytes[pos..]);
    let integer = &input[integer_start..pos];

    let mut fraction = "";
    if bytes.get(pos) == Some(&b'.') {
        let fraction_start = pos + 1;
        let fraction_end = fraction_start + count_digits(&bytes[fraction_start..]);
        fraction = &input[fraction_start..fraction_end];
        pos = fraction_end;
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    // An exponent only counts once it has at least one digit.
    let mut exponent = None;
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp_pos = pos + 1;
        if matches!(bytes.get(exp_pos), Some(b'-') | Some(b'+')) {
            exp_pos += 1;
        }
        let digits = count_digits(&bytes[exp_pos..]);
        if digits > 0 {
            exponent = Some(&input[pos + 1..exp_pos + digits]);
        }
    }

    Some(NumericPrefix {
        negative,
        integer,
        fraction,
        exponent,
    })
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
