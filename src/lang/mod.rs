use std::path::Path;

use tree_sitter::{Language, Parser};

use crate::error::ConvertError;
use crate::types::FileKind;

/// Output extension for rewritten scripts.
pub const SCRIPT_OUTPUT_EXT: &str = "tsx";
/// Suffix replacing `.css` for emitted style modules.
pub const STYLE_OUTPUT_SUFFIX: &str = ".styles.js";

/// Get the tree-sitter Language for a file kind.
pub fn get_language(kind: FileKind) -> Language {
    match kind {
        // The JavaScript grammar covers JSX and class fields.
        FileKind::Script => tree_sitter_javascript::LANGUAGE.into(),
        FileKind::Stylesheet => tree_sitter_css::LANGUAGE.into(),
    }
}

/// Create a tree-sitter Parser configured for the given file kind.
pub fn create_parser(kind: FileKind) -> Result<Parser, ConvertError> {
    let language = get_language(kind);
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ConvertError::Parser(format!("{kind:?}: {e}")))?;
    Ok(parser)
}

/// Map file extension to the converter that handles it.
pub fn extension_to_kind(ext: &str) -> Option<FileKind> {
    match ext {
        "js" | "jsx" => Some(FileKind::Script),
        "css" => Some(FileKind::Stylesheet),
        _ => None,
    }
}

/// Classify a path by its extension.
pub fn classify(path: &Path) -> Option<FileKind> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    extension_to_kind(ext)
}

/// Rewrite a relative input path into its output path.
///
/// `components/App.jsx` -> `components/App.tsx`,
/// `styles/main.css` -> `styles/main.styles.js`.
pub fn output_rel_path(rel_path: &str, kind: FileKind) -> String {
    let stem_end = rel_path.rfind('.').unwrap_or(rel_path.len());
    let stem = &rel_path[..stem_end];
    match kind {
        FileKind::Script => format!("{stem}.{SCRIPT_OUTPUT_EXT}"),
        FileKind::Stylesheet => format!("{stem}{STYLE_OUTPUT_SUFFIX}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(Path::new("a/App.jsx")), Some(FileKind::Script));
        assert_eq!(classify(Path::new("index.js")), Some(FileKind::Script));
        assert_eq!(classify(Path::new("main.css")), Some(FileKind::Stylesheet));
        assert_eq!(classify(Path::new("logo.svg")), None);
        assert_eq!(classify(Path::new("Makefile")), None);
    }

    #[test]
    fn test_output_rel_path() {
        assert_eq!(
            output_rel_path("components/App.jsx", FileKind::Script),
            "components/App.tsx"
        );
        assert_eq!(output_rel_path("index.js", FileKind::Script), "index.tsx");
        assert_eq!(
            output_rel_path("styles/main.css", FileKind::Stylesheet),
            "styles/main.styles.js"
        );
        assert_eq!(
            output_rel_path("v1.2/card.css", FileKind::Stylesheet),
            "v1.2/card.styles.js"
        );
    }

    #[test]
    fn test_parsers_load() {
        assert!(create_parser(FileKind::Script).is_ok());
        assert!(create_parser(FileKind::Stylesheet).is_ok());
    }
}
