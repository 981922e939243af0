//! Numeric literal typing.
//!
//! A literal records every interpretation that fits it exactly: `1` is int, uint and float,
//! `-1` int and float, `1.5` float only, `1e3` all three. Character constants are integers with
//! the code point as value; `1+2i` and `2i` are complex and collapse to real when the imaginary
//! part is zero.

use super::unquote::unquote_char;
use crate::tmpl::ast::{ErrorKind, NumberNode};
use crate::tmpl::lexing::lexeme::scan_number;
use crate::tmpl::lexing::TokenKind;

/// 2^63 and 2^64 as floats; both are exact.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

pub fn new_number(pos: usize, text: &str, kind: TokenKind) -> Result<NumberNode, ErrorKind> {
    let mut number = NumberNode::new(pos, text);

    match kind {
        TokenKind::CharConstant => {
            let malformed = || ErrorKind::MalformedCharConstant {
                text: text.to_string(),
            };
            let inner = text.strip_prefix('\'').ok_or_else(malformed)?;
            let (decoded, tail) = unquote_char(inner, '\'').map_err(|_| ErrorKind::InvalidSyntax {
                text: text.to_string(),
            })?;
            if tail != "'" {
                return Err(malformed());
            }
            let value = decoded.value();
            number.int64 = i64::from(value);
            number.is_int = true;
            number.uint64 = u64::from(value);
            number.is_uint = true;
            number.float64 = f64::from(value);
            number.is_float = true;
            return Ok(number);
        }
        TokenKind::Complex => {
            let (real_len, _) = scan_number(text);
            let illegal = || ErrorKind::IllegalNumber {
                text: text.to_string(),
            };
            let real = parse_float(&text[..real_len]).ok_or_else(illegal)?;
            let imaginary_text = text[real_len..].strip_suffix('i').ok_or_else(illegal)?;
            let imaginary = parse_float(imaginary_text).ok_or_else(illegal)?;
            number.is_complex = true;
            number.complex128 = (real, imaginary);
            simplify_complex(&mut number);
            return Ok(number);
        }
        _ => {}
    }

    if let Some(imaginary_text) = text.strip_suffix('i') {
        if let Some(imaginary) = parse_float(imaginary_text) {
            number.is_complex = true;
            number.complex128 = (0.0, imaginary);
            simplify_complex(&mut number);
            return Ok(number);
        }
    }

    if let Some(value) = parse_uint(text) {
        number.is_uint = true;
        number.uint64 = value;
    }
    if let Some(value) = parse_int(text) {
        number.is_int = true;
        number.int64 = value;
        if value == 0 {
            // -0 is also a valid unsigned zero
            number.is_uint = true;
            number.uint64 = 0;
        }
    }

    if number.is_int {
        number.is_float = true;
        number.float64 = number.int64 as f64;
    } else if number.is_uint {
        number.is_float = true;
        number.float64 = number.uint64 as f64;
    } else if let Some(value) = parse_float(text) {
        if !text.contains(['.', 'e', 'E', 'p', 'P']) {
            return Err(ErrorKind::IntegerOverflow {
                text: text.to_string(),
            });
        }
        number.is_float = true;
        number.float64 = value;
        backfill_integers(&mut number, value);
    }

    if !number.is_int && !number.is_uint && !number.is_float {
        return Err(ErrorKind::IllegalNumber {
            text: text.to_string(),
        });
    }
    Ok(number)
}

/// A complex number with no imaginary part is also a float, and possibly an integer.
fn simplify_complex(number: &mut NumberNode) {
    let (real, imaginary) = number.complex128;
    if imaginary == 0.0 {
        number.is_float = true;
        number.float64 = real;
        backfill_integers(number, real);
    }
}

fn backfill_integers(number: &mut NumberNode, value: f64) {
    if value.fract() != 0.0 || !value.is_finite() {
        return;
    }
    if !number.is_int && (-I64_BOUND..I64_BOUND).contains(&value) {
        number.is_int = true;
        number.int64 = value as i64;
    }
    if !number.is_uint && (0.0..U64_BOUND).contains(&value) {
        number.is_uint = true;
        number.uint64 = value as u64;
    }
}

/// Splits a base prefix off an unsigned literal. A bare leading `0` means octal.
fn split_base(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'0') {
        return (10, text);
    }
    if bytes.len() >= 3 {
        match bytes[1].to_ascii_lowercase() {
            b'b' => return (2, &text[2..]),
            b'o' => return (8, &text[2..]),
            b'x' => return (16, &text[2..]),
            _ => {}
        }
    }
    (8, &text[1..])
}

/// Underscores may only separate digits, or follow a base prefix.
fn underscores_ok(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    // saw: '^' start, '0' digit or prefix, '_' underscore, '!' anything else
    let mut saw = b'^';

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut hex = false;
    if bytes.len() - i >= 2 && bytes[i] == b'0' {
        let prefix = bytes[i + 1].to_ascii_lowercase();
        if matches!(prefix, b'b' | b'o' | b'x') {
            hex = prefix == b'x';
            i += 2;
            saw = b'0';
        }
    }

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            saw = b'0';
        } else if b == b'_' {
            if saw != b'0' {
                return false;
            }
            saw = b'_';
        } else {
            if saw == b'_' {
                return false;
            }
            saw = b'!';
        }
        i += 1;
    }
    saw != b'_'
}

fn parse_uint(text: &str) -> Option<u64> {
    if text.is_empty() || text.starts_with(['+', '-']) {
        return None;
    }
    if text.contains('_') && !underscores_ok(text) {
        return None;
    }
    let (radix, digits) = split_base(text);
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        // only a lone "0" reaches here empty
        return (radix == 8).then_some(0);
    }
    if digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(&digits, radix).ok()
}

fn parse_int(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = i128::from(parse_uint(unsigned)?);
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

/// Decimal or hexadecimal (`0x1.8p3`) float. Overflow to infinity counts as failure.
fn parse_float(text: &str) -> Option<f64> {
    if text.contains('_') && !underscores_ok(text) {
        return None;
    }
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (negative, unsigned) = match cleaned.as_bytes().first()? {
        b'-' => (true, &cleaned[1..]),
        b'+' => (false, &cleaned[1..]),
        _ => (false, cleaned.as_str()),
    };

    let magnitude = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        parse_hex_float(hex)?
    } else {
        if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return None;
        }
        if unsigned.contains(|c: char| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) {
            return None;
        }
        unsigned.parse::<f64>().ok()?
    };

    if !magnitude.is_finite() {
        return None;
    }
    Some(if negative { -magnitude } else { magnitude })
}

/// Hex mantissa with a mandatory binary exponent: `1.8p3` is 12.
fn parse_hex_float(text: &str) -> Option<f64> {
    let (mantissa, exponent) = text.split_once(['p', 'P'])?;
    let exponent: i32 = exponent.parse().ok()?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut value = 0.0f64;
    for digit in whole.chars() {
        value = value * 16.0 + f64::from(digit.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for digit in fraction.chars() {
        value += f64::from(digit.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn number(text: &str) -> NumberNode {
        new_number(0, text, TokenKind::Number).unwrap()
    }

    #[rstest(
        text,
        int,
        uint,
        float,
        case("42", Some(42), Some(42), Some(42.0)),
        case("-7", Some(-7), None, Some(-7.0)),
        case("-0", Some(0), Some(0), Some(0.0)),
        case("0x10", Some(16), Some(16), Some(16.0)),
        case("0o17", Some(15), Some(15), Some(15.0)),
        case("017", Some(15), Some(15), Some(15.0)),
        case("0b101", Some(5), Some(5), Some(5.0)),
        case("1_000", Some(1000), Some(1000), Some(1000.0)),
        case("1.5", None, None, Some(1.5)),
        case("1e3", Some(1000), Some(1000), Some(1000.0)),
        case(".5", None, None, Some(0.5)),
        case("0x1p4", Some(16), Some(16), Some(16.0)),
        case("1e100", None, None, Some(1e100)),
        case("18446744073709551615", None, Some(u64::MAX), Some(u64::MAX as f64))
    )]
    fn typing(text: &str, int: Option<i64>, uint: Option<u64>, float: Option<f64>) {
        let n = number(text);
        assert_eq!(n.is_int.then_some(n.int64), int, "int of {text}");
        assert_eq!(n.is_uint.then_some(n.uint64), uint, "uint of {text}");
        assert_eq!(n.is_float.then_some(n.float64), float, "float of {text}");
        assert!(!n.is_complex);
        assert_eq!(n.text, text);
    }

    #[test]
    fn char_constants() {
        let n = new_number(0, "'a'", TokenKind::CharConstant).unwrap();
        assert!(n.is_int && n.is_uint && n.is_float);
        assert_eq!(n.int64, 97);

        let n = new_number(0, r"'\n'", TokenKind::CharConstant).unwrap();
        assert_eq!(n.uint64, 10);

        assert!(matches!(
            new_number(0, "'ab'", TokenKind::CharConstant),
            Err(ErrorKind::MalformedCharConstant { .. })
        ));
        assert!(matches!(
            new_number(0, r"'\q'", TokenKind::CharConstant),
            Err(ErrorKind::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn complex_literals() {
        let n = new_number(0, "1+2i", TokenKind::Complex).unwrap();
        assert!(n.is_complex);
        assert!(!n.is_float && !n.is_int);
        assert_eq!(n.complex128, (1.0, 2.0));

        let n = new_number(0, "3-0i", TokenKind::Complex).unwrap();
        assert!(n.is_complex && n.is_float && n.is_int);
        assert_eq!(n.int64, 3);

        let n = number("2i");
        assert!(n.is_complex && !n.is_float);
        assert_eq!(n.complex128, (0.0, 2.0));

        let n = number("0i");
        assert!(n.is_complex && n.is_int && n.is_uint && n.is_float);
    }

    #[test]
    fn overflow_and_garbage() {
        assert_eq!(
            new_number(0, "99999999999999999999", TokenKind::Number),
            Err(ErrorKind::IntegerOverflow {
                text: "99999999999999999999".into()
            })
        );
        assert_eq!(
            new_number(0, "0x", TokenKind::Number),
            Err(ErrorKind::IllegalNumber { text: "0x".into() })
        );
        assert_eq!(
            new_number(0, "1e400", TokenKind::Number),
            Err(ErrorKind::IllegalNumber {
                text: "1e400".into()
            })
        );
        assert!(new_number(0, "08", TokenKind::Number).is_err());
        assert!(new_number(0, "1__0", TokenKind::Number).is_err());
    }

    #[test]
    fn underscore_rules() {
        assert!(underscores_ok("1_000"));
        assert!(underscores_ok("0x_ff"));
        assert!(!underscores_ok("1__0"));
        assert!(!underscores_ok("_1"));
        assert!(!underscores_ok("1_"));
    }
}
