pub mod content_hash;
pub mod file_reader;

use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::error::ConvertError;
use crate::lang;
use crate::types::FileKind;

/// Parse `content` with the grammar for `kind`.
///
/// tree-sitter recovers from syntax errors instead of failing, so a tree
/// containing ERROR or MISSING nodes is turned into a parse error here.
/// Nothing is emitted for such a file.
pub fn parse_source(kind: FileKind, path: &Path, content: &str) -> Result<Tree, ConvertError> {
    let mut parser = lang::create_parser(kind)?;
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| ConvertError::Parse {
            path: path.to_path_buf(),
            message: "tree-sitter parse returned None".into(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let message = match first_error(root) {
            Some(node) => describe_error(node),
            None => "syntax error".to_string(),
        };
        return Err(ConvertError::Parse {
            path: path.to_path_buf(),
            message,
        });
    }

    Ok(tree)
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

fn describe_error(node: Node<'_>) -> String {
    let pos = node.start_position();
    if node.is_missing() {
        format!(
            "missing `{}` at line {}, column {}",
            node.kind(),
            pos.row + 1,
            pos.column + 1
        )
    } else {
        format!("unexpected syntax at line {}, column {}", pos.row + 1, pos.column + 1)
    }
}

/// Source text covered by a node.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}
