//! Content negotiation and response body compression.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

/// The single content coding this server can produce.
pub const GZIP: &str = "gzip";

/// Check whether `scheme` appears in a list of client-advertised encodings.
///
/// Matching is exact and case-sensitive.
pub fn supports_encoding(schemes: &[&str], scheme: &str) -> bool {
    schemes.iter().any(|candidate| *candidate == scheme)
}

/// Compress `data` with gzip.
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
