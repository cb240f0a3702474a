//! Decimal rounding for display. Ties round away from zero.

/// Places needed to print any finite f64 exactly (the smallest subnormal is 2^-1074).
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Fixed-point text with exactly `fraction_digits` decimals, rounded from the
/// exact binary value. `6.25` (1) -> `"6.3"`, `1.005` (2) -> `"1.00"`.
///
/// Non-finite values print as `NaN`, `Infinity` and `-Infinity`.
pub fn to_fixed(value: f64, fraction_digits: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    signed(value, round_positional(&exact, fraction_digits))
}

/// Like [`to_fixed`], but rounds from the shortest decimal that round-trips
/// the value. `1.005` (2) -> `"1.01"`, `1.03125` (4) -> `"1.0313"`.
pub fn to_rounded(value: f64, fraction_digits: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    let shortest = format!("{}", value.abs());
    signed(value, round_positional(&shortest, fraction_digits))
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string())
    } else {
        None
    }
}

// -0.0 stays unsigned; a negative value that rounds to zero keeps its sign
fn signed(value: f64, magnitude: String) -> String {
    if value < 0.0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

/// Round an unsigned positional decimal (`"123.4567"`, `"9"`) half away from zero.
fn round_positional(positional: &str, fraction_digits: usize) -> String {
    let (integer, fraction) = positional.split_once('.').unwrap_or((positional, ""));

    let mut digits: Vec<u8> = integer.bytes().collect();
    digits.extend(fraction.bytes().chain(std::iter::repeat(b'0')).take(fraction_digits));

    let round_up = fraction
        .as_bytes()
        .get(fraction_digits)
        .is_some_and(|next| *next >= b'5');
    if round_up {
        carry_one(&mut digits);
    }

    let split = digits.len() - fraction_digits;
    let mut out: String = digits[..split].iter().map(|&d| char::from(d)).collect();
    if fraction_digits > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|&d| char::from(d)));
    }
    out
}

fn carry_one(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
