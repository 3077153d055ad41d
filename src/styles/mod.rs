use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tree_sitter::Node;

use crate::error::ConvertError;
use crate::parse::{self, node_text};
use crate::types::FileKind;

/// class name -> (camelCase property -> raw value)
pub type StyleMap = BTreeMap<String, BTreeMap<String, String>>;

const MODULE_HEADER: &str = "import { StyleSheet } from \"react-native\";\n\n";

/// A class-selector rule with its declarations in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Selector with the leading `.` removed.
    pub selector: String,
    /// (kebab-case property, raw value)
    pub declarations: Vec<(String, String)>,
}

/// Convert kebab-case CSS property names to React Native camelCase.
///
/// `background-color` -> `backgroundColor`; names without a hyphen are
/// returned as is.
pub fn camel_case(property: &str) -> String {
    static HYPHEN_LETTER: OnceLock<Regex> = OnceLock::new();
    let re = HYPHEN_LETTER.get_or_init(|| Regex::new(r"-([a-z])").expect("valid property regex"));
    re.replace_all(property, |caps: &Captures<'_>| caps[1].to_uppercase())
        .into_owned()
}

/// Parse a stylesheet and return its top-level class-selector rules.
///
/// Only the first selector of a list is inspected, and only rules whose
/// first selector starts with `.` are kept. At-rules (`@media`, ...) and
/// id, element or attribute selectors are skipped.
pub fn parse_rules(path: &Path, content: &str) -> Result<Vec<StyleRule>, ConvertError> {
    let tree = parse::parse_source(FileKind::Stylesheet, path, content)?;
    let root = tree.root_node();

    let mut rules = Vec::new();
    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        if node.kind() != "rule_set" {
            continue;
        }
        if let Some(rule) = class_rule(node, content) {
            rules.push(rule);
        }
    }
    Ok(rules)
}

fn class_rule(rule_set: Node<'_>, source: &str) -> Option<StyleRule> {
    let mut cursor = rule_set.walk();
    let selectors = rule_set
        .children(&mut cursor)
        .find(|c| c.kind() == "selectors")?;
    let first = selectors.named_child(0)?;
    let class_name = node_text(first, source).trim().strip_prefix('.')?;

    let mut cursor = rule_set.walk();
    let block = rule_set.children(&mut cursor).find(|c| c.kind() == "block")?;

    let mut declarations = Vec::new();
    let mut cursor = block.walk();
    for decl in block.children(&mut cursor) {
        if decl.kind() != "declaration" {
            continue;
        }
        if let Some(pair) = declaration(decl, source) {
            declarations.push(pair);
        }
    }

    Some(StyleRule {
        selector: class_name.to_string(),
        declarations,
    })
}

/// (property, raw value) of one declaration. The value is everything
/// between the colon and the terminating semicolon, trimmed, with
/// comments cut out.
fn declaration(decl: Node<'_>, source: &str) -> Option<(String, String)> {
    let mut cursor = decl.walk();
    let children: Vec<Node<'_>> = decl.children(&mut cursor).collect();

    let property = children.iter().find(|c| c.kind() == "property_name")?;
    let colon = children.iter().find(|c| c.kind() == ":")?;
    let end = match children.last() {
        Some(last) if last.kind() == ";" => last.start_byte(),
        _ => decl.end_byte(),
    };

    let mut comments = Vec::new();
    collect_comments(decl, &mut comments);

    let mut value = String::new();
    let mut at = colon.end_byte();
    for comment in comments {
        if comment.start_byte() < at || comment.end_byte() > end {
            continue;
        }
        push_segment(&mut value, source.get(at..comment.start_byte())?);
        at = comment.end_byte();
    }
    push_segment(&mut value, source.get(at..end)?);

    Some((node_text(*property, source).to_string(), value))
}

fn collect_comments<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "comment" {
            out.push(child);
        } else {
            collect_comments(child, out);
        }
    }
}

/// Append a value segment; segments split by a comment join on one space.
fn push_segment(value: &mut String, segment: &str) {
    let segment = segment.trim();
    if segment.is_empty() {
        return;
    }
    if !value.is_empty() {
        value.push(' ');
    }
    value.push_str(segment);
}

/// Fold rules into a style map; later declarations win on collision.
pub fn merge_rules(rules: &[StyleRule]) -> StyleMap {
    let mut styles = StyleMap::new();
    for rule in rules {
        let entry = styles.entry(rule.selector.clone()).or_default();
        for (property, value) in &rule.declarations {
            entry.insert(camel_case(property), value.clone());
        }
    }
    styles
}

/// Extract the class-keyed style map from stylesheet text.
pub fn extract_styles(path: &Path, content: &str) -> Result<StyleMap, ConvertError> {
    let rules = parse_rules(path, content)?;
    Ok(merge_rules(&rules))
}

/// Wrap a style map in a `StyleSheet.create` module.
pub fn render_style_module(styles: &StyleMap) -> Result<String, ConvertError> {
    let body = serde_json::to_string_pretty(styles)?;
    Ok(format!(
        "{MODULE_HEADER}export default StyleSheet.create({body});\n"
    ))
}

/// Stylesheet text -> style module source.
pub fn convert_stylesheet(path: &Path, content: &str) -> Result<String, ConvertError> {
    let styles = extract_styles(path, content)?;
    tracing::trace!(path = %path.display(), classes = styles.len(), "extracted styles");
    render_style_module(&styles)
}
