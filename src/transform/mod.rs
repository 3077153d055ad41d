pub mod edits;
pub mod imports;
pub mod jsx;

use std::path::Path;

use tree_sitter::Node;

use crate::error::ConvertError;
use crate::lang;
use crate::parse;
use crate::tables::RenameTables;
use crate::types::FileKind;

use edits::SourceEdit;

/// Rewrite one JSX/JS source file for React Native.
///
/// Returns `Ok(None)` when `path` is not a script file. Parse failures are
/// returned as `ConvertError::Parse` and nothing is produced for the file.
pub fn transform_source(
    path: &Path,
    content: &str,
    tables: &RenameTables,
) -> Result<Option<String>, ConvertError> {
    if lang::classify(path) != Some(FileKind::Script) {
        return Ok(None);
    }
    transform_script(path, content, tables).map(Some)
}

/// Parse and rewrite a file already known to be a script.
pub fn transform_script(
    path: &Path,
    content: &str,
    tables: &RenameTables,
) -> Result<String, ConvertError> {
    let tree = parse::parse_source(FileKind::Script, path, content)?;
    Ok(rewrite(tree.root_node(), content, tables))
}

/// Collect every edit against the parsed tree and splice them into the
/// source. Tag renames come first, then attribute renames, then import
/// rewrites; imports are matched against the untouched statement list.
pub fn rewrite(root: Node<'_>, source: &str, tables: &RenameTables) -> String {
    let mut edits: Vec<SourceEdit> = Vec::new();

    jsx::collect_tag_renames(root, source, tables, &mut edits);
    let tags = edits.len();
    jsx::collect_attribute_renames(root, source, tables, &mut edits);
    let attributes = edits.len() - tags;
    imports::collect_import_rewrites(root, source, tables, &mut edits);
    let import_edits = edits.len() - tags - attributes;

    tracing::trace!(tags, attributes, imports = import_edits, "collected source edits");
    edits::apply_edits(source, edits)
}
