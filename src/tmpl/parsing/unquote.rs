//! Unquoting of string and character literals.
//!
//! Escape rules follow the template language: `\a \b \f \n \r \t \v \\`, the active quote
//! character, three-digit octal up to `\377`, `\xHH`, `\uHHHH` and `\UHHHHHHHH` (a valid,
//! non-surrogate code point). `\x` and octal escapes produce raw bytes, so a string may decode
//! to invalid UTF-8; such bytes are replaced with U+FFFD.

/// A malformed literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxError;

/// One decoded character: either a code point or a raw byte from `\x`/octal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unquoted {
    Char(char),
    Byte(u8),
}

impl Unquoted {
    pub fn value(self) -> u32 {
        match self {
            Unquoted::Char(c) => c as u32,
            Unquoted::Byte(b) => u32::from(b),
        }
    }
}

/// Decodes the first character or escape of `s`, returning it and the rest of the input.
pub fn unquote_char(s: &str, quote: char) -> Result<(Unquoted, &str), SyntaxError> {
    let mut chars = s.chars();
    let first = chars.next().ok_or(SyntaxError)?;
    if first == quote && (quote == '\'' || quote == '"') {
        return Err(SyntaxError);
    }
    if first != '\\' {
        return Ok((Unquoted::Char(first), chars.as_str()));
    }

    let escape = chars.next().ok_or(SyntaxError)?;
    let rest = chars.as_str();
    let simple = match escape {
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        'f' => Some('\x0c'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\x0b'),
        '\\' => Some('\\'),
        '\'' | '"' if escape == quote => Some(escape),
        _ => None,
    };
    if let Some(c) = simple {
        return Ok((Unquoted::Char(c), rest));
    }

    match escape {
        'x' | 'u' | 'U' => {
            let width = match escape {
                'x' => 2,
                'u' => 4,
                _ => 8,
            };
            let digits = rest.get(..width).ok_or(SyntaxError)?;
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(SyntaxError);
            }
            let value = u32::from_str_radix(digits, 16).map_err(|_| SyntaxError)?;
            let decoded = if escape == 'x' {
                Unquoted::Byte(value as u8)
            } else {
                Unquoted::Char(char::from_u32(value).ok_or(SyntaxError)?)
            };
            Ok((decoded, &rest[width..]))
        }
        '0'..='7' => {
            let digits = rest.get(..2).ok_or(SyntaxError)?;
            let mut value = escape as u32 - '0' as u32;
            for digit in digits.bytes() {
                if !(b'0'..=b'7').contains(&digit) {
                    return Err(SyntaxError);
                }
                value = (value << 3) | u32::from(digit - b'0');
            }
            let byte = u8::try_from(value).map_err(|_| SyntaxError)?;
            Ok((Unquoted::Byte(byte), &rest[2..]))
        }
        _ => Err(SyntaxError),
    }
}

/// Removes the quotes from a `"…"`, `` `…` `` or `'…'` literal and decodes its escapes.
pub fn unquote(quoted: &str) -> Result<String, SyntaxError> {
    let quote = quoted.chars().next().ok_or(SyntaxError)?;
    if quoted.len() < 2 || !quoted.ends_with(quote) {
        return Err(SyntaxError);
    }
    let body = &quoted[quote.len_utf8()..quoted.len() - quote.len_utf8()];

    match quote {
        '`' => {
            if body.contains('`') {
                return Err(SyntaxError);
            }
            Ok(body.replace('\r', ""))
        }
        '"' | '\'' => {
            if body.contains('\n') {
                return Err(SyntaxError);
            }
            if !body.contains('\\') && !body.contains(quote) {
                if quote == '\'' && body.chars().count() != 1 {
                    return Err(SyntaxError);
                }
                return Ok(body.to_string());
            }

            let mut bytes = Vec::with_capacity(body.len());
            let mut rest = body;
            while !rest.is_empty() {
                let (decoded, tail) = unquote_char(rest, quote)?;
                match decoded {
                    Unquoted::Char(c) => {
                        let mut buf = [0; 4];
                        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                    Unquoted::Byte(b) => bytes.push(b),
                }
                rest = tail;
                if quote == '\'' && !rest.is_empty() {
                    return Err(SyntaxError);
                }
            }
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Err(SyntaxError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest(
        quoted,
        expected,
        case(r#""plain""#, "plain"),
        case(r#""tab\there""#, "tab\there"),
        case(r#""quote \" inside""#, "quote \" inside"),
        case(r#""\x41\102é""#, "ABé"),
        case(r#""\U0001F600""#, "\u{1F600}"),
        case("`raw \\n`", "raw \\n"),
        case("`a\r\nb`", "a\nb"),
        case("'x'", "x")
    )]
    fn unquotes(quoted: &str, expected: &str) {
        assert_eq!(unquote(quoted).unwrap(), expected);
    }

    #[rstest(
        quoted,
        case(r#""\q""#),
        case(r#""\400""#),
        case(r#""\xZZ""#),
        case(r#""\uD800""#),
        case(r#""\'""#),
        case("\"open"),
        case("'ab'")
    )]
    fn rejects(quoted: &str) {
        assert_eq!(unquote(quoted), Err(SyntaxError));
    }

    #[test]
    fn unquote_char_reports_tail() {
        let (decoded, tail) = unquote_char(r"\n'", '\'').unwrap();
        assert_eq!(decoded, Unquoted::Char('\n'));
        assert_eq!(tail, "'");

        let (decoded, tail) = unquote_char(r"\377'", '\'').unwrap();
        assert_eq!(decoded.value(), 255);
        assert_eq!(tail, "'");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        assert_eq!(unquote(r#""\xff""#).unwrap(), "\u{FFFD}");
    }
}
