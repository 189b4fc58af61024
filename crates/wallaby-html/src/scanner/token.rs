//! Tag tokens produced by the scanner.

use wallaby_dom::AttributesMap;

/// A classified tag construct.
///
/// Produced once per `<...>` construct that is neither a comment nor a
/// declaration; the tree builder decides how the cursor moves for each kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagToken {
    /// An opening tag such as `<p>` or `<img src="a.png"/>`.
    Opening {
        /// Lowercased tag name.
        name: String,
        /// Decoded attributes; a later duplicate key overwrites the earlier
        /// value.
        attributes: AttributesMap,
        /// Whether the raw source ends with `/>` (a solidus immediately
        /// before the terminator).
        self_closed: bool,
    },
    /// A closing tag such as `</p>`. Closing tags carry no attributes.
    Closing {
        /// Lowercased tag name.
        name: String,
    },
    /// A tag whose name turned out empty (e.g. `< >`). No node is created
    /// for it; the builder advances just past the delimiter and carries on.
    Degenerate,
}

/// Whether `name` (lowercase) is a void element that can never contain
/// children.
///
/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified for
/// void elements."
#[must_use]
pub fn is_void_tag(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
