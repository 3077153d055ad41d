pub mod archive;
pub mod convert;
pub mod error;
pub mod lang;
#[cfg(feature = "node")]
pub mod node;
pub mod parse;
pub mod scanner;
pub mod styles;
pub mod tables;
pub mod transform;
pub mod types;

pub use convert::{convert_project, convert_project_with_cancel, CancellationToken};
pub use error::ConvertError;
pub use tables::{ImportAdvisory, RenameTables};
pub use transform::transform_source;
pub use types::{ConvertOptions, ConvertedFile, FailureKind, FileFailure, FileKind, RunReport};
