//! Tag scanner implementation.
//!
//! Given the index of a `<` that begins a non-comment, non-declaration
//! construct, the scanner locates the terminating `>`, classifies the tag and
//! extracts its name and attributes. All scanning is byte-index arithmetic
//! over the source; the delimiters involved are ASCII, so multi-byte UTF-8
//! sequences pass through untouched.

use wallaby_dom::AttributesMap;

use super::entities;
use super::token::TagToken;

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
/// or U+0020 SPACE."
const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

/// The result of scanning one tag construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTag {
    /// The classified token.
    pub token: TagToken,
    /// Index of the last byte the construct consumed; the caller resumes
    /// scanning at `end + 1`. For a real tag this is the terminating `>`;
    /// for [`TagToken::Degenerate`] it is the byte after the `<`.
    pub end: usize,
}

/// Scanner over an immutable source buffer.
#[derive(Debug, Clone, Copy)]
pub struct TagScanner<'src> {
    source: &'src str,
}

impl<'src> TagScanner<'src> {
    /// Create a scanner over `source`.
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self { source }
    }

    /// Scan the tag construct whose `<` sits at byte index `open`.
    ///
    /// Returns `None` when no terminating `>` exists anywhere after `open`;
    /// the caller treats that as document-terminating.
    #[must_use]
    pub fn scan_tag(&self, open: usize) -> Option<ScannedTag> {
        let bytes = self.source.as_bytes();
        let close = self.source[open + 1..].find('>').map(|i| open + 1 + i)?;

        // Interior of the tag, excluding the delimiters and one optional
        // trailing solidus (the self-close marker).
        let mut start = open + 1;
        let mut end = close;
        let self_closed = end > start && bytes[end - 1] == b'/';
        if self_closed {
            end -= 1;
        }
        // A lone `</>` reads as a closing tag with an empty name: the same
        // solidus serves as both marker and closer.
        let is_closing = bytes[start] == b'/';
        if is_closing {
            start += 1;
        }

        // The name runs to the first whitespace byte inside the interior.
        let mut name_end = start;
        while name_end < end && !is_whitespace(bytes[name_end]) {
            name_end += 1;
        }
        let name = self.source[start..name_end].to_ascii_lowercase();

        if is_closing {
            return Some(ScannedTag {
                token: TagToken::Closing { name },
                end: close,
            });
        }
        if name.is_empty() {
            return Some(ScannedTag {
                token: TagToken::Degenerate,
                end: open + 1,
            });
        }

        let attributes = if name_end < end {
            self.extract_attributes(name_end, end)
        } else {
            AttributesMap::new()
        };
        Some(ScannedTag {
            token: TagToken::Opening {
                name,
                attributes,
                self_closed,
            },
            end: close,
        })
    }

    /// Extract attributes from the tag interior between `range_start` and
    /// `range_end` (the sub-range after the tag name).
    ///
    /// Tolerates missing `=`, missing quotes and stray `=` characters; those
    /// only produce fewer or degenerate pairs, never a failure.
    fn extract_attributes(&self, range_start: usize, range_end: usize) -> AttributesMap {
        let bytes = self.source.as_bytes();
        let mut attributes = AttributesMap::new();

        let mut pos = range_start;
        while pos < range_end {
            // STEP 1: skip whitespace before the key.
            while pos < range_end && is_whitespace(bytes[pos]) {
                pos += 1;
            }
            if pos >= range_end {
                // Trailing whitespace only: no key without content.
                break;
            }

            // STEP 2: the key token is at least one byte and runs to the
            // next whitespace or `=`.
            let mut key_end = pos + 1;
            while key_end < range_end && !is_whitespace(bytes[key_end]) && bytes[key_end] != b'=' {
                key_end += 1;
            }
            let key = String::from_utf8_lossy(&bytes[pos..key_end]).to_ascii_lowercase();

            // STEP 3: skip the separator run of whitespace and `=`.
            pos = key_end + 1;
            while pos < range_end && (is_whitespace(bytes[pos]) || bytes[pos] == b'=') {
                pos += 1;
            }

            // STEP 4: a leading quote delimits the value up to its partner;
            // otherwise the value runs to the next whitespace byte. A key at
            // the end of the range gets the empty value.
            let mut value = String::new();
            let mut quoted = false;
            let mut value_end = key_end;
            if pos < range_end {
                let quote = bytes[pos];
                if quote == b'"' || quote == b'\'' {
                    quoted = true;
                    pos += 1;
                }
                value_end = if quoted { pos } else { pos + 1 };
                while value_end < range_end {
                    let terminates = if quoted {
                        bytes[value_end] == quote
                    } else {
                        is_whitespace(bytes[value_end])
                    };
                    if terminates {
                        break;
                    }
                    value_end += 1;
                }
                let raw = String::from_utf8_lossy(&bytes[pos..value_end]);
                value = entities::decode(&raw);
            }

            // STEP 5: later duplicates overwrite earlier values.
            if !key.is_empty() {
                let _ = attributes.insert(key, value);
            }

            // STEP 6: advance past the value, and past the closing quote
            // when there was one.
            pos = value_end + if quoted { 2 } else { 1 };
        }

        attributes
    }
}

/// Find `needle` in `haystack` at or after `from`, matching ASCII
/// case-insensitively. `needle` must be ASCII.
pub(crate) fn find_ascii_case_insensitive(
    haystack: &str,
    from: usize,
    needle: &str,
) -> Option<usize> {
    let bytes = &haystack.as_bytes()[from..];
    bytes
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
        .map(|i| from + i)
}
