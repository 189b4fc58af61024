//! DOM tree implementation for the Wallaby renderer.
//!
//! This crate provides an arena-based document tree loosely following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) tree concepts.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. The tree also owns a shared copy of the markup source it was built
//! from: text nodes are [`TextSpan`] index ranges into that source instead of
//! per-node string copies, and they stay resolvable for as long as the tree
//! is alive.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Map of attribute names to values for an element.
///
/// Keys are stored lowercase; a duplicate key in the source overwrites the
/// earlier value (last write wins).
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the document tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing
/// issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A run of literal text, referenced by byte range into the tree's source.
///
/// Spans never copy the text they denote; they are resolved on demand against
/// the source buffer the tree owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    /// Byte offset of the first character of the run.
    pub start: usize,
    /// Length of the run in bytes.
    pub len: usize,
}

impl TextSpan {
    /// Create a span covering `len` bytes starting at `start`.
    #[must_use]
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Byte offset just past the last character of the run.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// Resolve the span against the source it was cut from.
    ///
    /// # Panics
    ///
    /// Panics if the span does not lie on character boundaries inside
    /// `source`. Spans produced by the parser always do.
    #[must_use]
    pub fn resolve<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end()]
    }

    /// Whether the run is empty or consists only of whitespace.
    ///
    /// Answered without materializing a copy of the text.
    #[must_use]
    pub fn is_empty_or_whitespace(&self, source: &str) -> bool {
        self.resolve(source).chars().all(char::is_whitespace)
    }
}

/// Immutable descriptor of an element's tag, created once per opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTag {
    /// Lowercase tag name.
    pub name: String,
    /// Whether the element can never contain children (`<br>`, `<img>`, or
    /// an explicit `/>` in the source).
    pub is_void: bool,
    /// The element's attribute list, values already entity-decoded.
    pub attrs: AttributesMap,
}

impl HtmlTag {
    /// Create a new tag descriptor.
    #[must_use]
    pub const fn new(name: String, is_void: bool, attrs: AttributesMap) -> Self {
        Self {
            name,
            is_void,
            attrs,
        }
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&String> {
        self.attrs.get("id")
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the
    /// element belongs to."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        match self.attrs.get("class") {
            Some(classlist) => classlist.split(' ').collect(),
            None => HashSet::new(),
        }
    }
}

/// What a node in the tree represents.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The root of the tree: a block-level container with no tag descriptor.
    /// Always at [`NodeId::ROOT`], never has a parent.
    Root,
    /// An element with a tag descriptor.
    Element(HtmlTag),
    /// A run of literal text. Text nodes never gain children.
    Text(TextSpan),
}

/// A node that participates in the tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// Stores indices for parent/child/sibling relationships, enabling O(1)
/// traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node represents.
    pub kind: NodeKind,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"; insertion order is
    /// document order.
    pub children: Vec<NodeId>,

    /// The node immediately following this one in its parent's children.
    pub next_sibling: Option<NodeId>,

    /// The node immediately preceding this one in its parent's children.
    pub prev_sibling: Option<NodeId>,
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// All nodes live in a contiguous vector and address each other by [`NodeId`];
/// the root is always at index 0. Construction is append-only: nodes are never
/// removed or reparented once created.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// The markup source the tree was built from. Text spans resolve against
    /// this buffer, so it lives exactly as long as the tree.
    source: Arc<str>,
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding a shared copy of `source`, with just the
    /// root node.
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        let root = Node {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        DomTree {
            source: source.into(),
            nodes: vec![root],
        }
    }

    /// The markup source this tree was built from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the root node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`, updating all
    /// relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        // Current last child of parent (if any) for sibling links
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Allocate an element node for `tag` and append it under `parent`.
    pub fn append_element_child(&mut self, parent: NodeId, tag: HtmlTag) -> NodeId {
        let id = self.alloc(NodeKind::Element(tag));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node for `span` and append it under `parent`.
    pub fn append_text_child(&mut self, parent: NodeId, span: TextSpan) -> NodeId {
        let id = self.alloc(NodeKind::Text(span));
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get the tag descriptor if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&HtmlTag> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        })
    }

    /// Get text content if this node is a text node, resolved against the
    /// tree's source.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(span) => Some(span.resolve(&self.source)),
            _ => None,
        })
    }

    /// Resolve the node a closing tag named `name` should move the cursor to.
    ///
    /// Walks from `from` upward, `from` included. The nearest element whose
    /// tag name equals `name` (ASCII case-insensitively) yields that
    /// element's parent; when nothing on the path matches, the parent of
    /// `from` is returned instead. The root stands in wherever a parent is
    /// absent, so the search is total: it always returns a node, regardless
    /// of `name` or how mis-nested the tree is.
    #[must_use]
    pub fn find_ancestor_by_tag(&self, from: NodeId, name: &str) -> NodeId {
        let fallback = self.parent(from).unwrap_or(NodeId::ROOT);
        let mut current = Some(from);
        while let Some(id) = current {
            if let Some(tag) = self.as_element(id)
                && tag.name.eq_ignore_ascii_case(name)
            {
                return self.parent(id).unwrap_or(NodeId::ROOT);
            }
            current = self.parent(id);
        }
        fallback
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new("")
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
