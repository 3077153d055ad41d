use sha2::{Digest, Sha256};

/// SHA-256 digest of emitted output, as lowercase hex.
///
/// Recorded per file in the run report so two runs over the same input
/// can be compared without diffing the output trees.
pub fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
