use tree_sitter::Node;

use super::edits::SourceEdit;
use crate::parse::node_text;
use crate::tables::RenameTables;

/// Rename element tags found in the element table.
///
/// Only plain identifiers are matched (`<div>`, not `<ui.div>` or
/// `<svg:div>`). The closing tag is renamed together with the opening one.
pub fn collect_tag_renames(
    node: Node<'_>,
    source: &str,
    tables: &RenameTables,
    edits: &mut Vec<SourceEdit>,
) {
    match node.kind() {
        "jsx_element" => {
            let open_name = node
                .child_by_field_name("open_tag")
                .and_then(plain_tag_name);
            if let Some(name) = open_name {
                if let Some(target) = tables.element(node_text(name, source)) {
                    edits.push(SourceEdit::replace(name, target));
                    let close_name = node
                        .child_by_field_name("close_tag")
                        .and_then(plain_tag_name);
                    if let Some(close) = close_name {
                        edits.push(SourceEdit::replace(close, target));
                    }
                }
            }
        }
        "jsx_self_closing_element" => {
            if let Some(name) = plain_tag_name(node) {
                if let Some(target) = tables.element(node_text(name, source)) {
                    edits.push(SourceEdit::replace(name, target));
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tag_renames(child, source, tables, edits);
    }
}

/// Rename attributes on every element, renamed or not.
///
/// Spread attributes (`{...props}`) and namespaced names are left alone.
pub fn collect_attribute_renames(
    node: Node<'_>,
    source: &str,
    tables: &RenameTables,
    edits: &mut Vec<SourceEdit>,
) {
    if matches!(
        node.kind(),
        "jsx_opening_element" | "jsx_self_closing_element"
    ) {
        let mut cursor = node.walk();
        for attr in node.children(&mut cursor) {
            if attr.kind() != "jsx_attribute" {
                continue;
            }
            let Some(name) = attr.child(0) else { continue };
            if name.kind() != "property_identifier" {
                continue;
            }
            if let Some(target) = tables.attribute(node_text(name, source)) {
                edits.push(SourceEdit::replace(name, target));
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_attribute_renames(child, source, tables, edits);
    }
}

fn plain_tag_name(element: Node<'_>) -> Option<Node<'_>> {
    element
        .child_by_field_name("name")
        .filter(|name| name.kind() == "identifier")
}
