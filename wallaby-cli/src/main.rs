//! Wallaby parsing CLI
//!
//! A headless front end for inspecting parsed documents: feed it a file or a
//! literal HTML string and it prints the resulting tree, or a JSON dump of
//! the tree plus any parse issues.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

use wallaby_dom::{DomTree, NodeId, NodeKind};
use wallaby_html::{DocumentParser, print_tree};

/// Parse an HTML document and dump the resulting tree.
#[derive(Parser)]
#[command(name = "wallaby", version, about)]
struct Cli {
    /// HTML file to parse.
    input: Option<PathBuf>,

    /// Parse this literal HTML string instead of a file.
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Emit the tree and the parse issues as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = match (cli.html, cli.input) {
        (Some(html), _) => html,
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => anyhow::bail!("expected a file path or --html '<p>...'"),
    };

    let (tree, issues) = DocumentParser::new(&source).run_with_issues();

    if cli.json {
        let dump = json!({
            "tree": node_to_value(&tree, tree.root()),
            "issues": issues,
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else {
        println!("{}", "=== DOM Tree ===".bold());
        print_tree(&tree, tree.root(), 0);
        println!();
        println!(
            "{} {} nodes, {} issues",
            "done:".green().bold(),
            tree.len(),
            issues.len()
        );
    }

    Ok(())
}

/// Convert a node and its subtree into a JSON value.
fn node_to_value(tree: &DomTree, id: NodeId) -> Value {
    let children: Vec<Value> = tree
        .children(id)
        .iter()
        .map(|&child_id| node_to_value(tree, child_id))
        .collect();

    match tree.get(id).map(|node| &node.kind) {
        Some(NodeKind::Root) => json!({
            "type": "root",
            "children": children,
        }),
        Some(NodeKind::Element(tag)) => json!({
            "type": "element",
            "tagName": tag.name,
            "void": tag.is_void,
            "attributes": tag.attrs,
            "children": children,
        }),
        Some(NodeKind::Text(_)) => json!({
            "type": "text",
            "content": tree.as_text(id).unwrap_or_default(),
        }),
        None => Value::Null,
    }
}
