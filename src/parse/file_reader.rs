use std::fs;
use std::path::Path;

use crate::error::ConvertError;

/// Read a source file as UTF-8, dropping a leading BOM.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; uploaded
/// projects are not always clean.
pub fn read_file(path: &Path) -> Result<String, ConvertError> {
    let bytes = fs::read(path).map_err(|e| ConvertError::io(path, e))?;
    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    Ok(String::from_utf8_lossy(body).into_owned())
}
