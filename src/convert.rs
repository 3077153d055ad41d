use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::ConvertError;
use crate::lang;
use crate::parse::{content_hash, file_reader};
use crate::scanner;
use crate::styles;
use crate::tables::RenameTables;
use crate::transform;
use crate::types::{
    ConvertOptions, ConvertedFile, FailureKind, FileFailure, FileKind, FileOutcome, RunReport,
    SourceFile,
};

/// Shared flag that stops a run from starting further files.
///
/// Files already being converted finish normally; outputs already written
/// stay on disk.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Convert every script and stylesheet under `input_root` into
/// `output_root`, mirroring relative paths.
pub fn convert_project(
    input_root: &Path,
    output_root: &Path,
    options: &ConvertOptions,
    tables: &RenameTables,
) -> Result<RunReport, ConvertError> {
    convert_project_with_cancel(input_root, output_root, options, tables, &CancellationToken::new())
}

/// [`convert_project`] with a cancellation token.
///
/// Fails as a whole only when the roots themselves are unusable; per-file
/// problems end up in the report.
pub fn convert_project_with_cancel(
    input_root: &Path,
    output_root: &Path,
    options: &ConvertOptions,
    tables: &RenameTables,
    cancel: &CancellationToken,
) -> Result<RunReport, ConvertError> {
    if !input_root.is_dir() {
        return Err(ConvertError::RootNotFound(input_root.to_path_buf()));
    }
    fs::create_dir_all(output_root).map_err(|e| ConvertError::io(output_root, e))?;

    let input_root = input_root
        .canonicalize()
        .map_err(|e| ConvertError::io(input_root, e))?;
    let output_root = output_root
        .canonicalize()
        .map_err(|e| ConvertError::io(output_root, e))?;

    let exclude = output_root
        .starts_with(&input_root)
        .then_some(output_root.as_path());
    let scan = scanner::scan_directory(&input_root, options, exclude);
    tracing::info!(
        input = %input_root.display(),
        files = scan.files.len(),
        ignored = scan.ignored,
        "scanned input tree"
    );

    let mut report = RunReport::new(input_root.clone(), output_root.clone());
    report.ignored = scan.ignored;
    for failure in scan.failures {
        report.record(FileOutcome::Failed(failure));
    }

    let (files, conflicts) = split_output_conflicts(scan.files);
    for outcome in conflicts {
        report.record(outcome);
    }

    let run = || -> Vec<FileOutcome> {
        files
            .par_iter()
            .map(|file| {
                if cancel.is_cancelled() {
                    return FileOutcome::Failed(FileFailure {
                        path: file.rel_path.clone(),
                        kind: FailureKind::Cancelled,
                        message: "run cancelled before this file was started".into(),
                    });
                }
                convert_file(file, &output_root, tables)
            })
            .collect()
    };
    let outcomes = match build_pool(options.threads) {
        Some(pool) => pool.install(run),
        None => run(),
    };
    for outcome in outcomes {
        report.record(outcome);
    }

    let report = report.finish();
    tracing::info!(
        converted = report.converted.len(),
        failed = report.failures.len(),
        output = %report.output_root.display(),
        "conversion finished"
    );
    Ok(report)
}

/// Convert a single file and write its output. Never panics on bad input;
/// every problem is returned as a failed outcome.
pub fn convert_file(file: &SourceFile, output_root: &Path, tables: &RenameTables) -> FileOutcome {
    match try_convert_file(file, output_root, tables) {
        Ok(converted) => {
            tracing::debug!(source = %converted.source, output = %converted.output, "converted file");
            FileOutcome::Converted(converted)
        }
        Err(err) => {
            tracing::warn!(path = %file.rel_path, error = %err, "skipping file");
            FileOutcome::Failed(FileFailure {
                path: file.rel_path.clone(),
                kind: failure_kind(&err),
                message: err.to_string(),
            })
        }
    }
}

fn try_convert_file(
    file: &SourceFile,
    output_root: &Path,
    tables: &RenameTables,
) -> Result<ConvertedFile, ConvertError> {
    let content = file_reader::read_file(&file.absolute_path)?;
    let logical_path = Path::new(&file.rel_path);

    let output = match file.kind {
        FileKind::Script => transform::transform_script(logical_path, &content, tables)?,
        FileKind::Stylesheet => styles::convert_stylesheet(logical_path, &content)?,
    };

    let output_rel = lang::output_rel_path(&file.rel_path, file.kind);
    let output_path = output_root.join(&output_rel);
    write_output(&output_path, &output)?;

    Ok(ConvertedFile {
        source: file.rel_path.clone(),
        output: output_rel,
        kind: file.kind,
        content_hash: content_hash::hash_content(&output),
    })
}

/// Write a file, creating parent directories as needed. `create_dir_all`
/// tolerates concurrent creation of the same directories.
fn write_output(path: &Path, content: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| ConvertError::io(path, e))
}

/// `App.js` and `App.jsx` both map to `App.tsx`. The first input in path
/// order keeps the output; the rest are reported.
fn split_output_conflicts(files: Vec<SourceFile>) -> (Vec<SourceFile>, Vec<FileOutcome>) {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(files.len());
    let mut conflicts = Vec::new();

    for file in files {
        let output = lang::output_rel_path(&file.rel_path, file.kind);
        if claimed.insert(output.clone()) {
            kept.push(file);
        } else {
            conflicts.push(FileOutcome::Failed(FileFailure {
                path: file.rel_path,
                kind: FailureKind::OutputConflict,
                message: format!("{output} is already produced by another input"),
            }));
        }
    }
    (kept, conflicts)
}

fn failure_kind(err: &ConvertError) -> FailureKind {
    match err {
        ConvertError::Parse { .. } | ConvertError::Serialize(_) => FailureKind::Parse,
        _ => FailureKind::Io,
    }
}

/// Dedicated pool sized by `threads`; 0 means CPUs minus one.
fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    let count = if threads == 0 { default_threads() } else { threads };
    match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            // Fallback to global pool
            tracing::warn!(error = %err, "could not build worker pool");
            None
        }
    }
}

/// Get the number of available CPU cores (minus 1, minimum 1).
pub fn default_threads() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus.saturating_sub(1).max(1)
}
