//! Annotation lookup.
//!
//! A field annotation is a space separated list of `key:"value"` pairs, for
//! example `default:"8080" alt:"9090"`. Keys are runs of printable characters
//! other than `:` and `"`; values are double quoted and may use the
//! usual backslash escapes (`\"`, `\n`, `\x41`, `\u00e9`, `\U0001f600`,
//! `\101` and so on). Byte escapes (`\x..` and octal) must stay below `0x80`.
//! A malformed pair or an unknown escape ends the lookup with no value.

use std::borrow::Cow;
use std::str::Chars;

/// Returns the value stored under `key`, if any.
pub fn lookup<'a>(annotation: &'a str, key: &str) -> Option<Cow<'a, str>> {
    let mut rest = annotation;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }
        let name_end = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if name_end == 0 || !rest[name_end..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..name_end];
        rest = &rest[name_end + 1..];

        // find the closing quote, skipping escaped characters
        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let quoted = &rest[1..i];
        rest = &rest[i + 1..];

        if name == key {
            return unquote(quoted);
        }
    }
}

fn unquote(quoted: &str) -> Option<Cow<'_, str>> {
    if !quoted.contains('\\') {
        return Some(Cow::Borrowed(quoted));
    }
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            '"' => '"',
            '\\' => '\\',
            '\'' => '\'',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'x' => ascii(hex(&mut chars, 2)?)?,
            'u' => char::from_u32(hex(&mut chars, 4)?)?,
            'U' => char::from_u32(hex(&mut chars, 8)?)?,
            first @ '0'..='7' => {
                let mut code = first.to_digit(8)?;
                for _ in 0..2 {
                    code = code * 8 + chars.next()?.to_digit(8)?;
                }
                ascii(code)?
            }
            _ => return None,
        };
        out.push(escaped);
    }
    Some(Cow::Owned(out))
}

/// Exactly `digits` hex digits.
fn hex(chars: &mut Chars<'_>, digits: usize) -> Option<u32> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}

// byte escapes above 0x7f would not be valid UTF-8 on their own
fn ascii(code: u32) -> Option<char> {
    u8::try_from(code).ok().filter(u8::is_ascii).map(char::from)
}
