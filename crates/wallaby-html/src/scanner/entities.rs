//! Character reference decoding for attribute values.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Decoding is total and permissive: numeric references and the named
//! references in the table below are replaced, and anything unrecognized
//! (including a bare `&`) passes through unchanged. The full standard
//! defines 2,231 named entities; the table covers the ones that show up in
//! real-world documents.

use std::collections::HashMap;
use std::sync::LazyLock;

/// The named character reference table.
///
/// Maps entity names (without the leading `&`) to their replacement strings.
/// Names are matched with their trailing semicolon; the handful of legacy
/// entities that browsers accept without one get an extra semicolon-less key.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // The core five
        ("amp;", "&"),
        ("amp", "&"), // Legacy (no semicolon)
        ("lt;", "<"),
        ("lt", "<"), // Legacy
        ("gt;", ">"),
        ("gt", ">"), // Legacy
        ("quot;", "\""),
        ("quot", "\""), // Legacy
        ("apos;", "'"),
        // Spacing and punctuation
        ("nbsp;", "\u{00A0}"),
        ("shy;", "\u{00AD}"),
        ("middot;", "\u{00B7}"), // ·
        ("bull;", "\u{2022}"),   // •
        ("hellip;", "\u{2026}"), // …
        ("ndash;", "\u{2013}"),  // –
        ("mdash;", "\u{2014}"),  // —
        ("lsquo;", "\u{2018}"),
        ("rsquo;", "\u{2019}"),
        ("ldquo;", "\u{201C}"),
        ("rdquo;", "\u{201D}"),
        ("laquo;", "\u{00AB}"), // «
        ("raquo;", "\u{00BB}"), // »
        ("sect;", "\u{00A7}"),  // §
        ("para;", "\u{00B6}"),  // ¶
        // Legal marks
        ("copy;", "\u{00A9}"),  // ©
        ("reg;", "\u{00AE}"),   // ®
        ("trade;", "\u{2122}"), // ™
        // Currency
        ("cent;", "\u{00A2}"),  // ¢
        ("pound;", "\u{00A3}"), // £
        ("euro;", "\u{20AC}"),  // €
        ("yen;", "\u{00A5}"),   // ¥
        // Math
        ("times;", "\u{00D7}"),  // ×
        ("divide;", "\u{00F7}"), // ÷
        ("plusmn;", "\u{00B1}"), // ±
        ("deg;", "\u{00B0}"),    // °
        ("ne;", "\u{2260}"),     // ≠
        ("le;", "\u{2264}"),     // ≤
        ("ge;", "\u{2265}"),     // ≥
        ("frac12;", "\u{00BD}"), // ½
        ("frac14;", "\u{00BC}"), // ¼
        ("frac34;", "\u{00BE}"), // ¾
        // Arrows
        ("larr;", "\u{2190}"), // ←
        ("rarr;", "\u{2192}"), // →
        ("uarr;", "\u{2191}"), // ↑
        ("darr;", "\u{2193}"), // ↓
    ])
});

/// Look up a named character reference.
///
/// The `name` should NOT include the leading `&`.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decode character references in an attribute value.
///
/// Numeric references (`&#72;`, `&#x48;`, semicolon optional) and the named
/// references in the table are replaced; unrecognized sequences pass through
/// unchanged. Total: defined for every input, never fails.
#[must_use]
pub fn decode(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];
        match decode_reference(rest) {
            Some((replacement, consumed)) => {
                out.push_str(&replacement);
                rest = &rest[consumed..];
            }
            None => out.push('&'),
        }
    }
    out.push_str(rest);
    out
}

/// Decode one reference starting just past an `&`.
///
/// Returns the replacement text and the number of bytes consumed, or `None`
/// when the `&` should pass through unchanged.
fn decode_reference(rest: &str) -> Option<(String, usize)> {
    if let Some(numeric) = rest.strip_prefix('#') {
        return decode_numeric(numeric).map(|(text, used)| (text, used + 1));
    }
    decode_named(rest)
}

/// [§ 13.2.5.79 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Decimal `&#DD;` or hex `&#xHH;` form, starting just past the `#`. Code
/// points that are not valid scalar values pass through.
fn decode_numeric(rest: &str) -> Option<(String, usize)> {
    let bytes = rest.as_bytes();
    let (digits_start, radix) = match bytes.first() {
        Some(b'x' | b'X') => (1, 16),
        _ => (0, 10),
    };

    let mut digits_end = digits_start;
    while digits_end < bytes.len() && char::from(bytes[digits_end]).is_digit(radix) {
        digits_end += 1;
    }
    if digits_end == digits_start {
        return None;
    }

    let code = u32::from_str_radix(&rest[digits_start..digits_end], radix).ok()?;
    let decoded = char::from_u32(code)?;
    let consumed = if bytes.get(digits_end) == Some(&b';') {
        digits_end + 1
    } else {
        digits_end
    };
    Some((decoded.to_string(), consumed))
}

/// Named form: the longest alphanumeric run, first with its semicolon, then
/// as one of the legacy semicolon-less entities.
fn decode_named(rest: &str) -> Option<(String, usize)> {
    let bytes = rest.as_bytes();
    let mut name_end = 0;
    while name_end < bytes.len() && bytes[name_end].is_ascii_alphanumeric() {
        name_end += 1;
    }
    if name_end == 0 {
        return None;
    }

    if bytes.get(name_end) == Some(&b';')
        && let Some(replacement) = lookup_entity(&rest[..=name_end])
    {
        return Some((replacement.to_owned(), name_end + 1));
    }
    lookup_entity(&rest[..name_end]).map(|replacement| (replacement.to_owned(), name_end))
}
