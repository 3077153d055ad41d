use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::convert::convert_project;
use crate::error::ConvertError;
use crate::tables::RenameTables;
use crate::types::{ConvertOptions, RunReport};

/// Upload limit of the web front end (50 MiB).
pub const MAX_ARCHIVE_BYTES: u64 = 50 * 1024 * 1024;

/// Directory, inside the extraction directory, that receives the output.
const OUTPUT_DIR_NAME: &str = "native-src";

/// Extract a zip archive into `dest`.
///
/// Entries whose names would escape `dest` make the whole extraction fail.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<(), ConvertError> {
    let file = File::open(archive).map_err(|e| ConvertError::io(archive, e))?;
    let mut zip = ZipArchive::new(file)?;
    fs::create_dir_all(dest).map_err(|e| ConvertError::io(dest, e))?;
    zip.extract(dest)?;
    tracing::debug!(archive = %archive.display(), entries = zip.len(), "extracted archive");
    Ok(())
}

/// Zip the contents of `dir` into `archive`, with entry names relative to
/// `dir`. Entries are added in path order.
pub fn create_archive(dir: &Path, archive: &Path) -> Result<(), ConvertError> {
    let file = File::create(archive).map_err(|e| ConvertError::io(archive, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| ConvertError::Archive(e.to_string()))?;
        let path = entry.path();
        let rel = match path.strip_prefix(dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().replace('\\', "/"),
            _ => continue,
        };

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            zip.add_directory(rel, options)?;
            continue;
        }

        zip.start_file(rel, options)?;
        let mut source = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        io::copy(&mut source, &mut zip).map_err(|e| ConvertError::io(path, e))?;
    }

    zip.finish()?;
    Ok(())
}

/// Pick the conversion input inside an extracted project: `src/` when it
/// exists, the directory itself otherwise.
pub fn resolve_input_root(extracted: &Path) -> PathBuf {
    let src = extracted.join("src");
    if src.is_dir() {
        src
    } else {
        extracted.to_path_buf()
    }
}

/// Convert a zipped project into a zipped React Native source tree.
///
/// The archive is extracted into a fresh directory under `work_dir`, which
/// is removed again whether the run succeeds or not. A run that produced
/// no file at all is an error and no output archive is written.
pub fn convert_archive(
    archive: &Path,
    output_archive: &Path,
    work_dir: &Path,
    options: &ConvertOptions,
    tables: &RenameTables,
) -> Result<RunReport, ConvertError> {
    check_upload(archive)?;

    fs::create_dir_all(work_dir).map_err(|e| ConvertError::io(work_dir, e))?;
    let extract_dir = tempfile::Builder::new()
        .prefix("extract_")
        .tempdir_in(work_dir)
        .map_err(|e| ConvertError::io(work_dir, e))?;

    extract_archive(archive, extract_dir.path())?;
    let is_empty = fs::read_dir(extract_dir.path())
        .map_err(|e| ConvertError::io(extract_dir.path(), e))?
        .next()
        .is_none();
    if is_empty {
        return Err(ConvertError::Archive("extracted archive is empty".into()));
    }

    let input_root = resolve_input_root(extract_dir.path());
    let output_root = extract_dir.path().join(OUTPUT_DIR_NAME);
    tracing::info!(input = %input_root.display(), "using input directory");

    let report = convert_project(&input_root, &output_root, options, tables)?;
    report.ensure_usable()?;

    create_archive(&output_root, output_archive)?;
    tracing::info!(archive = %output_archive.display(), "wrote output archive");
    Ok(report)
}

fn check_upload(archive: &Path) -> Result<(), ConvertError> {
    let metadata = fs::metadata(archive).map_err(|e| ConvertError::io(archive, e))?;
    if metadata.len() == 0 {
        return Err(ConvertError::Archive("uploaded file is empty".into()));
    }
    if metadata.len() > MAX_ARCHIVE_BYTES {
        return Err(ConvertError::Archive(format!(
            "archive is {} bytes, limit is {MAX_ARCHIVE_BYTES}",
            metadata.len()
        )));
    }
    Ok(())
}
