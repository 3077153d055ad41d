use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// How a file is handled by the converter, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `.js` / `.jsx`, rewritten by the syntax transformer.
    Script,
    /// `.css`, lifted into a style module.
    Stylesheet,
}

/// Convertible file discovered by the scanner.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the top-level input root (forward slashes).
    pub rel_path: String,
    /// Absolute path on disk.
    pub absolute_path: PathBuf,
    pub kind: FileKind,
}

/// Options for a conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Worker threads; 0 picks the number of CPUs minus one.
    pub threads: usize,
    /// Honour `.gitignore` files in the input tree.
    pub respect_gitignore: bool,
    /// Files larger than this are reported as skipped.
    pub max_file_bytes: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            threads: 0,
            respect_gitignore: false,
            max_file_bytes: 2 * 1024 * 1024,
        }
    }
}

/// One produced output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedFile {
    /// Input path relative to the input root.
    pub source: String,
    /// Output path relative to the output root.
    pub output: String,
    pub kind: FileKind,
    /// SHA-256 hex digest of the emitted content.
    pub content_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    Parse,
    Io,
    TooLarge,
    /// Another input already maps to the same output path.
    OutputConflict,
    Cancelled,
}

/// A file that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub path: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Result of visiting a single file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Converted(ConvertedFile),
    Failed(FileFailure),
}

/// Summary of a conversion run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Produced files, sorted by source path.
    pub converted: Vec<ConvertedFile>,
    /// Skipped files, sorted by path.
    pub failures: Vec<FileFailure>,
    /// Files with no converter (copied nowhere).
    pub ignored: usize,
}

impl RunReport {
    pub fn new(input_root: PathBuf, output_root: PathBuf) -> Self {
        RunReport {
            input_root,
            output_root,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Converted(file) => self.converted.push(file),
            FileOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Sort entries so the report does not depend on worker scheduling.
    pub fn finish(mut self) -> Self {
        self.converted.sort_by(|a, b| a.source.cmp(&b.source));
        self.failures.sort_by(|a, b| a.path.cmp(&b.path));
        self
    }

    pub fn is_usable(&self) -> bool {
        !self.converted.is_empty()
    }

    /// A run is usable when at least one file was produced, even if
    /// others failed.
    pub fn ensure_usable(&self) -> Result<(), ConvertError> {
        if self.is_usable() {
            return Ok(());
        }
        if self.failures.is_empty() {
            return Err(ConvertError::NoInputFiles(self.input_root.clone()));
        }
        Err(ConvertError::NothingConverted {
            failures: self.failures.clone(),
        })
    }
}
