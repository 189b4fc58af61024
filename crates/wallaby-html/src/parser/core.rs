//! Single-pass tree construction with permissive recovery.
//!
//! The builder keeps one cursor into the tree being built: the cursor moves
//! down when a non-void tag opens and back up when a matching closing tag is
//! seen. There is no explicit stack of open elements and no error outcome;
//! every malformed-input condition degrades into one of the documented
//! recoveries (skip forward, truncate, drop the construct) so that any input
//! string, however broken, yields a usable tree.

use std::sync::Arc;

use serde::Serialize;
use strum_macros::Display;

use wallaby_common::warning::warn_once;
use wallaby_dom::{AttributesMap, DomTree, HtmlTag, NodeId, NodeKind, TextSpan};

use crate::scanner::core::find_ascii_case_insensitive;
use crate::scanner::{TagScanner, TagToken, is_void_tag};

/// The tag whose content is captured verbatim, without tag interpretation.
const RAW_TEXT_TAG: &str = "style";
/// The literal sequence that ends raw-text capture, matched ASCII
/// case-insensitively.
const RAW_TEXT_END: &str = "</style>";

/// Classification of the construct beginning at a `<` delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MarkupKind {
    /// A `<!--` comment; skipped, contributes no nodes.
    Comment,
    /// A `<!...>` declaration such as a doctype; skipped, contributes no
    /// nodes.
    Declaration,
    /// A start or end tag, handed to the tag scanner.
    Tag,
}

/// A recoverable anomaly encountered while parsing.
///
/// Parsing never fails; issues record where the input forced one of the
/// documented degradations.
#[derive(Debug, Clone, Serialize)]
pub struct ParseIssue {
    /// Description of the anomaly.
    pub message: String,
    /// Byte offset into the source where it was noticed.
    pub position: usize,
}

/// Single-pass permissive HTML parser.
///
/// Builds a [`DomTree`] from a markup string. The contract is total: every
/// input string, including the empty one, produces a tree, and malformed
/// input degrades the tree instead of producing an error.
pub struct DocumentParser {
    /// The source being scanned; shared with the tree so text spans stay
    /// resolvable.
    source: Arc<str>,

    /// The tree under construction.
    tree: DomTree,

    /// The node under which newly scanned content is appended. Moves down on
    /// open tags, up on matched close tags; never restructures what is
    /// already built.
    cursor: NodeId,

    /// Next unscanned byte index.
    position: usize,

    /// Recoverable anomalies encountered so far.
    issues: Vec<ParseIssue>,
}

impl DocumentParser {
    /// Create a parser for `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let source: Arc<str> = Arc::from(source);
        let tree = DomTree::new(Arc::clone(&source));
        Self {
            source,
            tree,
            cursor: NodeId::ROOT,
            position: 0,
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the finished tree.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        self.parse();
        self.tree
    }

    /// Run the parser and return the finished tree along with any parse
    /// issues encountered.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.parse();
        let issues = std::mem::take(&mut self.issues);
        (self.tree, issues)
    }

    /// The main scan loop.
    fn parse(&mut self) {
        // STEP 1: find the next `<`; without one, scanning is over and only
        //         the trailing text remains to handle.
        while let Some(open) = self.find_delimiter() {
            // STEP 2: everything between the last construct and this `<` is
            //         literal text under the cursor.
            self.flush_text(open);

            // STEP 3: classify and consume the construct.
            match Self::classify(&self.source[open..]) {
                MarkupKind::Comment => self.skip_comment(open),
                MarkupKind::Declaration => self.skip_declaration(open),
                MarkupKind::Tag => {
                    if !self.consume_tag(open) {
                        // A tag with no terminator anywhere: scanning stops
                        // and the unscanned remainder is dropped.
                        return;
                    }
                    // STEP 4: a tag that left the cursor on a raw-text
                    //         element switches to literal capture.
                    if self.in_raw_text_element() && !self.capture_raw_text() {
                        return;
                    }
                }
            }
        }

        // STEP 5: leftover text after the last construct.
        self.append_trailing_text();
    }

    /// Index of the next `<` at or after the current position.
    fn find_delimiter(&self) -> Option<usize> {
        self.source[self.position..]
            .find('<')
            .map(|i| self.position + i)
    }

    /// Classify the construct starting at the `<` that begins `rest`.
    fn classify(rest: &str) -> MarkupKind {
        let after = &rest[1..];
        if after.starts_with("!--") {
            MarkupKind::Comment
        } else if after.starts_with('!') {
            MarkupKind::Declaration
        } else {
            MarkupKind::Tag
        }
    }

    /// Append the text strictly between `position` and `until` as a text
    /// child of the cursor.
    ///
    /// Whitespace-only runs are kept: whether the enclosing element is
    /// preformatted is not known yet, so dropping them is a later stage's
    /// call.
    fn flush_text(&mut self, until: usize) {
        if until > self.position {
            let span = TextSpan::new(self.position, until - self.position);
            let _ = self.tree.append_text_child(self.cursor, span);
        }
        self.position = until;
    }

    /// Skip a `<!-- ... -->` comment. Contributes nothing to the tree.
    ///
    /// An unterminated comment degrades to a two-character skip: scanning
    /// resumes just past the `<!`, reinterpreting the rest of the input.
    fn skip_comment(&mut self, open: usize) {
        let search = open + 2;
        if let Some(found) = self.source[search..].find("-->") {
            self.position = search + found + 3;
        } else {
            let kind = MarkupKind::Comment;
            self.parse_issue(format!("unterminated {kind} at byte {open}"), open);
            self.position = search;
        }
    }

    /// Skip a `<!...>` declaration (doctype and friends). Contributes
    /// nothing to the tree; unterminated declarations degrade exactly like
    /// unterminated comments.
    fn skip_declaration(&mut self, open: usize) {
        let search = open + 2;
        if let Some(found) = self.source[search..].find('>') {
            self.position = search + found + 1;
        } else {
            let kind = MarkupKind::Declaration;
            self.parse_issue(format!("unterminated {kind} at byte {open}"), open);
            self.position = search;
        }
    }

    /// Scan and apply one tag. Returns `false` when the scanner found no
    /// terminating `>`, which ends the parse.
    fn consume_tag(&mut self, open: usize) -> bool {
        let Some(scan) = TagScanner::new(&self.source).scan_tag(open) else {
            let kind = MarkupKind::Tag;
            self.parse_issue(
                format!("{kind} at byte {open} has no terminating '>'; remainder dropped"),
                open,
            );
            return false;
        };

        self.position = scan.end + 1;
        match scan.token {
            TagToken::Closing { name } => self.close_element(&name, open),
            TagToken::Opening {
                name,
                attributes,
                self_closed,
            } => self.open_element(name, attributes, self_closed),
            TagToken::Degenerate => {
                let kind = MarkupKind::Tag;
                self.parse_issue(format!("nameless {kind} at byte {open}"), open);
            }
        }
        true
    }

    /// Apply a closing tag: move the cursor to the node the upward name
    /// search resolves.
    fn close_element(&mut self, name: &str, open: usize) {
        // A stray closing void tag (`</br>`) has no nesting to unwind.
        if is_void_tag(name) {
            return;
        }
        if self.tree.parent(self.cursor).is_none() {
            return;
        }

        let matched = std::iter::once(self.cursor)
            .chain(self.tree.ancestors(self.cursor))
            .any(|id| {
                self.tree
                    .as_element(id)
                    .is_some_and(|tag| tag.name.eq_ignore_ascii_case(name))
            });
        if !matched {
            self.parse_issue(format!("closing tag </{name}> matches no open element"), open);
        }
        self.cursor = self.tree.find_ancestor_by_tag(self.cursor, name);
    }

    /// Apply an opening tag: append an element child of the cursor, and move
    /// the cursor into it unless the element is void.
    fn open_element(&mut self, name: String, attributes: AttributesMap, self_closed: bool) {
        let is_void = self_closed || is_void_tag(&name);
        let tag = HtmlTag::new(name, is_void, attributes);
        let id = self.tree.append_element_child(self.cursor, tag);
        if !is_void {
            self.cursor = id;
        }
    }

    /// Whether the cursor currently sits on a raw-text element.
    fn in_raw_text_element(&self) -> bool {
        self.tree
            .as_element(self.cursor)
            .is_some_and(|tag| tag.name == RAW_TEXT_TAG)
    }

    /// Capture everything up to the next case-insensitive closing sequence
    /// as one verbatim text child of the raw-text element. Scanning resumes
    /// at the closing sequence itself, which the next loop iteration consumes
    /// as an ordinary closing tag.
    ///
    /// Returns `false` when the closing sequence never occurs: the remainder
    /// of the document is dropped, mirroring the unterminated-tag recovery.
    fn capture_raw_text(&mut self) -> bool {
        match find_ascii_case_insensitive(&self.source, self.position, RAW_TEXT_END) {
            Some(close) => {
                if close > self.position {
                    let span = TextSpan::new(self.position, close - self.position);
                    let _ = self.tree.append_text_child(self.cursor, span);
                }
                self.position = close;
                true
            }
            None => {
                let position = self.position;
                self.parse_issue(
                    format!("<{RAW_TEXT_TAG}> never closed; remainder dropped"),
                    position,
                );
                false
            }
        }
    }

    /// Append whatever follows the last consumed construct as one text child
    /// of the root, no matter where the cursor stopped, provided it is not
    /// empty or whitespace-only. Orphaned trailing text always attaches to
    /// the root.
    fn append_trailing_text(&mut self) {
        if self.position < self.source.len() {
            let span = TextSpan::new(self.position, self.source.len() - self.position);
            if !span.is_empty_or_whitespace(&self.source) {
                let _ = self.tree.append_text_child(NodeId::ROOT, span);
            }
        }
    }

    /// Record a recoverable anomaly.
    ///
    /// Logs via the shared warning system and stores the issue for later
    /// retrieval through [`DocumentParser::run_with_issues`].
    fn parse_issue(&mut self, message: String, position: usize) {
        warn_once("HTML Parser", &message);
        self.issues.push(ParseIssue { message, position });
    }
}

/// Parse a markup string into a document tree.
///
/// Synchronous and total: defined for every input string including the empty
/// one, and a pure function of its input. The same source yields a
/// structurally equivalent tree every time.
#[must_use]
pub fn parse_document(source: &str) -> DomTree {
    DocumentParser::new(source).run()
}

/// Print a document tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    if let Some(node) = tree.get(id) {
        match &node.kind {
            NodeKind::Root => {
                println!("{prefix}#root");
            }
            NodeKind::Element(tag) => {
                let marker = if tag.is_void { "/" } else { "" };
                if tag.attrs.is_empty() {
                    println!("{prefix}<{}{marker}>", tag.name);
                } else {
                    let attrs: Vec<String> = tag
                        .attrs
                        .iter()
                        .map(|(k, v)| {
                            if v.is_empty() {
                                k.clone()
                            } else {
                                format!("{k}=\"{v}\"")
                            }
                        })
                        .collect();
                    println!("{prefix}<{} {}{marker}>", tag.name, attrs.join(" "));
                }
            }
            NodeKind::Text(span) => {
                let display = span
                    .resolve(tree.source())
                    .replace('\n', "\\n")
                    .replace(' ', "\u{00B7}");
                println!("{prefix}\"{display}\"");
            }
        }
        for &child_id in tree.children(id) {
            print_tree(tree, child_id, indent + 1);
        }
    }
}
