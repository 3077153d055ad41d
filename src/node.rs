//! Node.js bindings, so an upload server can run conversions in-process.

use std::path::Path;

use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::convert;
use crate::tables::RenameTables;
use crate::transform;
use crate::types::ConvertOptions;

fn to_napi(err: crate::error::ConvertError) -> Error {
    Error::new(Status::GenericFailure, err.to_string())
}

fn load_tables(rules_json: Option<String>) -> Result<RenameTables> {
    match rules_json {
        Some(json) => RenameTables::from_json(&json).map_err(to_napi),
        None => Ok(RenameTables::default()),
    }
}

/// Convert a project directory into `output_dir`.
///
/// Returns the run report as a plain object. Rejects when the run produced
/// no file at all.
#[napi]
pub fn convert_project(
    input_dir: String,
    output_dir: String,
    thread_count: u32,
    rules_json: Option<String>,
) -> Result<serde_json::Value> {
    let tables = load_tables(rules_json)?;
    let options = ConvertOptions {
        threads: thread_count as usize,
        ..ConvertOptions::default()
    };

    let report = convert::convert_project(
        Path::new(&input_dir),
        Path::new(&output_dir),
        &options,
        &tables,
    )
    .map_err(to_napi)?;
    report.ensure_usable().map_err(to_napi)?;

    serde_json::to_value(&report).map_err(|e| Error::from_reason(e.to_string()))
}

/// Convert a single JSX source. Returns null for non-script paths.
#[napi]
pub fn convert_source(
    path: String,
    content: String,
    rules_json: Option<String>,
) -> Result<Option<String>> {
    let tables = load_tables(rules_json)?;
    transform::transform_source(Path::new(&path), &content, &tables).map_err(to_napi)
}
