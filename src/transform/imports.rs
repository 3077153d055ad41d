use tree_sitter::Node;

use super::edits::SourceEdit;
use crate::parse::node_text;
use crate::tables::RenameTables;

/// Stylesheet imports are dropped; the styles are emitted as modules.
const STYLESHEET_SUFFIX: &str = ".css";

/// Rewrite top-level import declarations.
///
/// Catalog matches are replaced by an advisory comment, stylesheet imports
/// are deleted along with their line break, everything else stays put.
pub fn collect_import_rewrites(
    root: Node<'_>,
    source: &str,
    tables: &RenameTables,
    edits: &mut Vec<SourceEdit>,
) {
    let mut cursor = root.walk();
    for stmt in root.children(&mut cursor) {
        if stmt.kind() != "import_statement" {
            continue;
        }
        let Some(specifier) = extract_source_specifier(stmt, source) else {
            continue;
        };

        if let Some(advisory) = tables.import(&specifier) {
            tracing::debug!(%specifier, replacement = %advisory.replacement, "flagging web-only import");
            let end = stmt.end_byte();
            let eol = line_ending(source, end);
            let mut comment = advisory
                .comment_lines()
                .iter()
                .map(|line| format!("// {line}"))
                .collect::<Vec<_>>()
                .join(eol);
            if !source[end..].is_empty() && !starts_with_newline(&source[end..]) {
                comment.push_str(eol);
            }
            edits.push(SourceEdit::new(stmt.start_byte(), end, comment));
        } else if specifier.ends_with(STYLESHEET_SUFFIX) {
            tracing::debug!(%specifier, "dropping stylesheet import");
            let end = stmt.end_byte() + newline_len(&source[stmt.end_byte()..]);
            edits.push(SourceEdit::new(stmt.start_byte(), end, ""));
        }
    }
}

/// Extract the module specifier from an import statement.
fn extract_source_specifier(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(source_node) = node.child_by_field_name("source") {
        return extract_string_value(source_node, source);
    }

    let mut cursor = node.walk();
    let string_node = node.children(&mut cursor).find(|c| c.kind() == "string")?;
    extract_string_value(string_node, source)
}

/// Extract the text value from a string node: fragments concatenated,
/// escape sequences decoded.
fn extract_string_value(string_node: Node<'_>, source: &str) -> Option<String> {
    let mut value = String::new();
    let mut cursor = string_node.walk();
    for child in string_node.children(&mut cursor) {
        match child.kind() {
            "string_fragment" => value.push_str(node_text(child, source)),
            "escape_sequence" => decode_escape(node_text(child, source), &mut value),
            _ => {}
        }
    }
    Some(value)
}

/// Decode one JS escape sequence (`\n`, `\x41`, `\u0041`, `\u{41}`, `\-`).
/// Sequences that do not decode are kept verbatim.
fn decode_escape(escape: &str, out: &mut String) {
    let Some(body) = escape.strip_prefix('\\') else {
        out.push_str(escape);
        return;
    };
    // line continuation
    if body.starts_with(['\n', '\r', '\u{2028}', '\u{2029}']) {
        return;
    }
    let decoded = match body {
        "n" => Some('\n'),
        "r" => Some('\r'),
        "t" => Some('\t'),
        "b" => Some('\u{8}'),
        "f" => Some('\u{c}'),
        "v" => Some('\u{b}'),
        "0" => Some('\0'),
        _ => {
            let hex = body
                .strip_prefix("u{")
                .and_then(|h| h.strip_suffix('}'))
                .or_else(|| body.strip_prefix('u'))
                .or_else(|| body.strip_prefix('x'));
            match hex {
                Some(hex) => u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
                None => {
                    let mut chars = body.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c),
                        _ => None,
                    }
                }
            }
        }
    };
    match decoded {
        Some(c) => out.push(c),
        None => out.push_str(escape),
    }
}

/// Line ending used by the line that ends at `at`.
fn line_ending(source: &str, at: usize) -> &'static str {
    let rest = &source[at..];
    let line_end = rest.find('\n').map(|i| at + i);
    match line_end {
        Some(i) if i > 0 && source.as_bytes()[i - 1] == b'\r' => "\r\n",
        Some(_) => "\n",
        None if source.contains("\r\n") => "\r\n",
        None => "\n",
    }
}

fn starts_with_newline(rest: &str) -> bool {
    rest.starts_with('\n') || rest.starts_with("\r\n")
}

fn newline_len(rest: &str) -> usize {
    if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        0
    }
}
