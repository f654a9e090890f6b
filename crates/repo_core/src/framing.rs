use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::core_api::{SaveError, SaveErrorKind};

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip_framed(bytes: &[u8]) -> bool {
    bytes.len() >= GZIP_MAGIC.len() && bytes[..GZIP_MAGIC.len()] == GZIP_MAGIC
}

/// Gzip-decompresses `bytes` iff they carry the gzip magic number; anything
/// else is returned unchanged. Decompression is automatic on read, but
/// compression on write is caller-opt-in only, matching the game's writer.
pub fn maybe_decompress(bytes: Vec<u8>) -> Result<Vec<u8>, SaveError> {
    if !is_gzip_framed(&bytes) {
        return Ok(bytes);
    }

    let mut out = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut out)
        .map_err(|e| {
            SaveError::new(
                SaveErrorKind::Decode,
                format!("gzip frame is corrupt: {e}"),
            )
        })?;
    Ok(out)
}

pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, SaveError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(compress_error)?;
    encoder.finish().map_err(compress_error)
}

fn compress_error(e: io::Error) -> SaveError {
    SaveError::new(SaveErrorKind::Io, format!("gzip compression failed: {e}"))
}
