use tree_sitter::Node;

/// Replacement of a byte range of the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl SourceEdit {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        SourceEdit {
            start,
            end,
            text: text.into(),
        }
    }

    /// Replace the full span of `node`.
    pub fn replace(node: Node<'_>, text: impl Into<String>) -> Self {
        Self::new(node.start_byte(), node.end_byte(), text)
    }
}

/// Splice `edits` into `source`. Bytes outside every edit are copied
/// unchanged. Edits must not overlap; an overlapping edit is dropped.
pub fn apply_edits(source: &str, mut edits: Vec<SourceEdit>) -> String {
    edits.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.start < cursor || edit.end > source.len() {
            tracing::warn!(
                start = edit.start,
                end = edit.end,
                "dropping overlapping source edit"
            );
            continue;
        }
        out.push_str(&source[cursor..edit.start]);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    out.push_str(&source[cursor..]);
    out
}
