//! Integration tests for the document parser.

use wallaby_dom::{DomTree, NodeId, NodeKind};
use wallaby_html::{DocumentParser, parse_document};

/// Helper to parse HTML and return the document tree.
fn parse(html: &str) -> DomTree {
    parse_document(html)
}

/// Helper to get an element by tag name (first match, depth-first).
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to get the concatenated text content of a subtree.
fn text_content(tree: &DomTree, id: NodeId) -> String {
    let mut result = String::new();
    if let Some(text) = tree.as_text(id) {
        result.push_str(text);
    } else {
        for &child_id in tree.children(id) {
            result.push_str(&text_content(tree, child_id));
        }
    }
    result
}

/// Helper describing a node's children as compact labels: `<name>` for
/// elements, the literal text for text nodes.
fn child_labels(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|&child_id| match tree.get(child_id).map(|n| &n.kind) {
            Some(NodeKind::Element(tag)) => format!("<{}>", tag.name),
            Some(NodeKind::Text(_)) => tree.as_text(child_id).unwrap_or_default().to_string(),
            _ => "#root".to_string(),
        })
        .collect()
}

#[test]
fn empty_input_yields_a_bare_root() {
    let tree = parse("");
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn input_without_tags_becomes_one_text_child() {
    let tree = parse("hello world");
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["hello world"]);
}

#[test]
fn whitespace_only_input_yields_no_children() {
    let tree = parse("  \n\t ");
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn nested_inline_elements() {
    let tree = parse("<p>Hello <b>World</b>!</p>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<p>"]);
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(child_labels(&tree, p), vec!["Hello ", "<b>", "!"]);
    let b = find_element(&tree, p, "b").unwrap();
    assert_eq!(child_labels(&tree, b), vec!["World"]);
}

#[test]
fn comments_contribute_nothing() {
    let tree = parse("<!-- c --><div>x</div>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<div>"]);
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(text_content(&tree, div), "x");
}

#[test]
fn declarations_contribute_nothing() {
    let tree = parse("<!DOCTYPE html><p>x</p>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<p>"]);
}

#[test]
fn void_element_with_attributes() {
    let tree = parse("<img src='a.png'/><p>t</p>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<img>", "<p>"]);
    let img = find_element(&tree, NodeId::ROOT, "img").unwrap();
    let tag = tree.as_element(img).unwrap();
    assert!(tag.is_void);
    assert_eq!(tag.attrs.get("src"), Some(&"a.png".to_string()));
    assert!(tree.children(img).is_empty());
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(text_content(&tree, p), "t");
}

#[test]
fn void_elements_never_acquire_children() {
    let tree = parse("<br>text<p>y</p>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<br>", "text", "<p>"]);
    let br = find_element(&tree, NodeId::ROOT, "br").unwrap();
    assert!(tree.children(br).is_empty());
    assert!(tree.as_element(br).unwrap().is_void);
}

#[test]
fn self_closed_unknown_element_does_not_take_children() {
    let tree = parse("<widget/><p>x</p>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<widget>", "<p>"]);
    let widget = find_element(&tree, NodeId::ROOT, "widget").unwrap();
    assert!(tree.as_element(widget).unwrap().is_void);
}

#[test]
fn style_content_is_one_verbatim_text_child() {
    let tree = parse("<style>a{color:red}</style>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<style>"]);
    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert_eq!(child_labels(&tree, style), vec!["a{color:red}"]);
}

#[test]
fn style_content_is_never_tag_interpreted() {
    let tree = parse("<div><style>a<b>c</style></div>");

    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    // One text child holding the raw bytes, `<` included.
    assert_eq!(child_labels(&tree, style), vec!["a<b>c"]);
    assert!(find_element(&tree, NodeId::ROOT, "b").is_none());
}

#[test]
fn style_closing_sequence_matches_case_insensitively() {
    let tree = parse("<style>A{}</StYlE>after");

    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert_eq!(child_labels(&tree, style), vec!["A{}"]);
    // The cursor popped back out, so the trailing text lands on the root.
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<style>", "after"]);
}

#[test]
fn unterminated_style_drops_the_remainder() {
    let (tree, issues) = DocumentParser::new("<style>x<p>y</p>").run_with_issues();

    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert!(tree.children(style).is_empty());
    assert!(find_element(&tree, NodeId::ROOT, "p").is_none());
    assert_eq!(issues.len(), 1);
}

#[test]
fn self_closed_style_does_not_capture_raw_text() {
    // Raw-text capture keys off the cursor, which never moves into a
    // self-closed element.
    let tree = parse("<style/>x<p>y</p>");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<style>", "x", "<p>"]);
    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert!(tree.children(style).is_empty());
}

#[test]
fn empty_style_gets_no_text_child() {
    let tree = parse("<style></style>");

    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert!(tree.children(style).is_empty());
}

#[test]
fn unterminated_tag_drops_the_remainder() {
    let (tree, issues) = DocumentParser::new("<div>x</div><p hi").run_with_issues();

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<div>"]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].position, 12);
}

#[test]
fn fully_unterminated_input_yields_a_bare_root() {
    let (tree, issues) = DocumentParser::new("<p hi").run_with_issues();

    assert!(tree.children(NodeId::ROOT).is_empty());
    assert_eq!(issues.len(), 1);
}

#[test]
fn trailing_text_attaches_to_the_root() {
    // The `<p>` is still open when the input runs out; the tail bypasses the
    // cursor and lands on the root.
    let tree = parse("<p>hi");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<p>", "hi"]);
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert!(tree.children(p).is_empty());
}

#[test]
fn whitespace_only_trailing_text_is_dropped() {
    let tree = parse("<div></div>  \n");
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<div>"]);
}

#[test]
fn whitespace_runs_between_elements_are_kept() {
    let tree = parse("<div> <p>x</p> </div>");

    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_labels(&tree, div), vec![" ", "<p>", " "]);
}

#[test]
fn unterminated_comment_degrades_to_a_two_character_skip() {
    let (tree, issues) = DocumentParser::new("<!-- x <p>y").run_with_issues();

    // Scanning resumes just past `<!`, so the comment body is reinterpreted.
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["-- x ", "<p>", "y"]);
    assert_eq!(issues.len(), 1);
}

#[test]
fn unterminated_declaration_degrades_to_a_two_character_skip() {
    let (tree, issues) = DocumentParser::new("<!DOCTYPE").run_with_issues();

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["DOCTYPE"]);
    assert_eq!(issues.len(), 1);
}

#[test]
fn mismatched_closing_skips_unmatched_intermediates() {
    let tree = parse("<div><span>a</div>b");

    // </div> jumps from inside the span straight past the div; the span is
    // never explicitly closed but stays where it was built.
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_labels(&tree, div), vec!["<span>"]);
    let span = find_element(&tree, div, "span").unwrap();
    assert_eq!(child_labels(&tree, span), vec!["a"]);
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<div>", "b"]);
}

#[test]
fn closing_tag_with_no_match_moves_one_level_up() {
    let (tree, issues) = DocumentParser::new("<div><p>x</p></em>y</div>").run_with_issues();

    // </em> matches nothing, so the cursor falls back to the div's parent;
    // the following text therefore lands on the root.
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<div>", "y"]);
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_labels(&tree, div), vec!["<p>"]);
    assert_eq!(issues.len(), 1);
}

#[test]
fn closing_nearest_of_nested_same_name_elements() {
    let tree = parse("<div><div>x</div>y</div>");

    let outer = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_labels(&tree, outer), vec!["<div>", "y"]);
    let inner = find_element(&tree, outer, "div").unwrap();
    assert_eq!(child_labels(&tree, inner), vec!["x"]);
}

#[test]
fn stray_closing_void_tag_is_a_no_op() {
    let tree = parse("<div></br>x</div>");

    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_labels(&tree, div), vec!["x"]);
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<div>"]);
}

#[test]
fn closing_tags_match_case_insensitively() {
    let tree = parse("<DIV>x</div>y");

    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["<div>", "y"]);
}

#[test]
fn degenerate_tag_creates_no_node() {
    let (tree, issues) = DocumentParser::new("< p>x").run_with_issues();

    // The scan resumes two bytes past the `<`; the leftovers become text.
    assert_eq!(child_labels(&tree, NodeId::ROOT), vec!["p>x"]);
    assert_eq!(issues.len(), 1);
}

#[test]
fn attributes_reach_the_tree_decoded_and_lowercased() {
    let tree = parse(r#"<a HREF="x y" disabled TITLE="a&amp;b">link</a>"#);

    let a = find_element(&tree, NodeId::ROOT, "a").unwrap();
    let tag = tree.as_element(a).unwrap();
    assert_eq!(tag.attrs.get("href"), Some(&"x y".to_string()));
    assert_eq!(tag.attrs.get("disabled"), Some(&String::new()));
    assert_eq!(tag.attrs.get("title"), Some(&"a&b".to_string()));
}

#[test]
fn text_content_is_kept_verbatim() {
    // Entity decoding applies to attribute values only; text runs are raw
    // views into the source.
    let tree = parse("<p>a&amp;b</p>");

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(text_content(&tree, p), "a&amp;b");
}

#[test]
fn document_order_is_preserved() {
    let tree = parse("<ul><li>a</li><li>b</li></ul>");

    let ul = find_element(&tree, NodeId::ROOT, "ul").unwrap();
    assert_eq!(child_labels(&tree, ul), vec!["<li>", "<li>"]);
    assert_eq!(text_content(&tree, NodeId::ROOT), "ab");
}

#[test]
fn nesting_depth_matches_markup_depth() {
    let tree = parse("<div><section><p>x</p></section></div>");

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    let chain: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(chain.len(), 3); // section, div, root
}

#[test]
fn clean_input_reports_no_issues() {
    let (_, issues) = DocumentParser::new("<p>Hello <b>World</b>!</p>").run_with_issues();
    assert!(issues.is_empty());
}

#[test]
fn same_input_parses_to_the_same_tree() {
    let html = "<div><p>x</p><!-- c --><img src=a.png></div>";
    let first = parse(html);
    let second = parse(html);

    assert_eq!(first.len(), second.len());
    assert_eq!(
        child_labels(&first, NodeId::ROOT),
        child_labels(&second, NodeId::ROOT)
    );
}
