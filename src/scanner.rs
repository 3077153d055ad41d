use ignore::WalkBuilder;
use std::path::Path;

use crate::lang::classify;
use crate::types::{ConvertOptions, FailureKind, FileFailure, SourceFile};

/// Files found under an input root.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Convertible files, sorted by relative path.
    pub files: Vec<SourceFile>,
    /// Entries that could not be read or were too large.
    pub failures: Vec<FileFailure>,
    /// Files with no converter.
    pub ignored: usize,
}

/// Scan a directory for scripts and stylesheets.
///
/// Relative paths are always computed against `root`, the top-level input
/// directory, never against the directory currently being walked.
/// `exclude` prunes a subtree, used when the output root lives inside the
/// input root.
pub fn scan_directory(
    root: &Path,
    options: &ConvertOptions,
    exclude: Option<&Path>,
) -> ScanResult {
    let mut result = ScanResult::default();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .parents(false)
        .ignore(false)
        .git_ignore(options.respect_gitignore)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    if let Some(excluded) = exclude {
        let excluded = excluded.to_path_buf();
        builder.filter_entry(move |entry| !entry.path().starts_with(&excluded));
    }

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read directory entry");
                result.failures.push(FileFailure {
                    path: String::new(),
                    kind: FailureKind::Io,
                    message: err.to_string(),
                });
                continue;
            }
        };

        // Skip directories
        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(true) {
            continue;
        }

        let path = entry.path();
        let rel_path = match path.strip_prefix(root) {
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };

        let Some(kind) = classify(path) else {
            result.ignored += 1;
            continue;
        };

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                result.failures.push(FileFailure {
                    path: rel_path,
                    kind: FailureKind::Io,
                    message: err.to_string(),
                });
                continue;
            }
        };
        if size > options.max_file_bytes {
            tracing::debug!(%rel_path, size, "skipping oversized file");
            result.failures.push(FileFailure {
                path: rel_path,
                kind: FailureKind::TooLarge,
                message: format!(
                    "{size} bytes exceeds the {} byte limit",
                    options.max_file_bytes
                ),
            });
            continue;
        }

        result.files.push(SourceFile {
            rel_path,
            absolute_path: path.to_path_buf(),
            kind,
        });
    }

    result.files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    result
}
