//! Turning raw token text into literal values.
//! 将 token 原始文本转换为字面量值。
//!
//! The lexer already reported malformed input, so these helpers are
//! best-effort and never fail: bad escapes are kept verbatim.

use std::str::Chars;

/// Value of a quoted string token, quotes removed and escapes applied.
pub fn cook_string(text: &str) -> String {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let inner = chars.as_str();
    let inner = inner.strip_suffix(quote).unwrap_or(inner);
    unescape(inner)
}

/// Value of a markup attribute string: quotes removed, no escapes.
pub fn cook_attribute_string(text: &str) -> &str {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return "";
    };
    let inner = chars.as_str();
    inner.strip_suffix(quote).unwrap_or(inner)
}

/// Apply escape sequences.
/// 处理转义序列。
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let rest = chars.as_str();
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            // Line continuation - 续行
            Some('\n') => {}
            Some('\r') => {
                if chars.as_str().starts_with('\n') {
                    chars.next();
                }
            }
            Some('x') => match hex_value(&mut chars, 2) {
                Some(c) => out.push(c),
                None => {
                    out.push('\\');
                    chars = rest.chars();
                }
            },
            Some('u') => match unicode_escape(&mut chars) {
                Some(c) => out.push(c),
                None => {
                    out.push('\\');
                    chars = rest.chars();
                }
            },
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn hex_value(chars: &mut Chars<'_>, digits: usize) -> Option<char> {
    let text = chars.as_str().get(..digits)?;
    let value = u32::from_str_radix(text, 16).ok()?;
    let ch = char::from_u32(value)?;
    for _ in 0..digits {
        chars.next();
    }
    Some(ch)
}

fn unicode_escape(chars: &mut Chars<'_>) -> Option<char> {
    let text = chars.as_str();
    if let Some(braced) = text.strip_prefix('{') {
        let end = braced.find('}')?;
        let value = u32::from_str_radix(&braced[..end], 16).ok()?;
        let ch = char::from_u32(value)?;
        *chars = braced[end + 1..].chars();
        Some(ch)
    } else {
        hex_value(chars, 4)
    }
}

/// Numeric value of a number token. BigInt literals lose precision past 2^53.
/// 数字 token 的数值。
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let cleaned = cleaned.strip_suffix('n').unwrap_or(&cleaned);

    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return cleaned[2..]
            .chars()
            .map_while(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * radix as f64 + d as f64);
    }

    // Legacy octal `0777`.
    if cleaned.len() > 1
        && cleaned.starts_with('0')
        && cleaned.chars().all(|c| ('0'..='7').contains(&c))
    {
        return cleaned[1..]
            .chars()
            .filter_map(|c| c.to_digit(8))
            .fold(0.0, |acc, d| acc * 8.0 + d as f64);
    }

    let numeric_end = cleaned
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
        .unwrap_or(cleaned.len());
    let numeric = cleaned[..numeric_end].trim_end_matches(['e', 'E', '+', '-']);
    numeric.parse().unwrap_or(f64::NAN)
}

/// True for `123n`-style literals.
pub fn is_bigint(text: &str) -> bool {
    // `n` is not a hex digit, so no radix needs special casing.
    text.ends_with('n')
}

/// Decode HTML character references in markup text.
/// 解码标记文本中的 HTML 字符引用。
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            decode_entity(&tail[1..end]).map(|ch| (ch, end))
        }) {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let value = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(value);
    }
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        _ => return None,
    };
    Some(ch)
}
