//! Magic-byte signature check
//!
//! The declared content type of an upload is attacker-controlled, so the
//! first bytes of the stored file are inspected before anything is handed to
//! the image decoder. Any read error fails closed.

use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// WebP needs `RIFF` at offset 0 and `WEBP` at offset 8, so 12 bytes cover
/// every supported signature.
const HEADER_LEN: usize = 12;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_PREFIX: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Check a file header against the known image signatures:
/// JPEG, PNG, GIF (`GIF8`), WebP (`RIFF....WEBP`).
pub fn matches_image_signature(header: &[u8]) -> bool {
    if header.len() >= JPEG_PREFIX.len() && header[..3] == JPEG_PREFIX {
        return true;
    }
    if header.len() >= PNG_SIGNATURE.len() && header[..8] == PNG_SIGNATURE {
        return true;
    }
    if header.len() >= 4 && &header[..4] == b"GIF8" {
        return true;
    }
    if header.len() >= HEADER_LEN && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return true;
    }
    false
}

/// Read the first 12 bytes of the file at `path` and check them against the
/// known signatures. Returns `false` on any read error.
pub async fn check_file(path: &Path) -> bool {
    match read_header(path).await {
        Ok(header) => matches_image_signature(&header),
        Err(error) => {
            tracing::debug!(path = %path.display(), error = %error, "Signature check read failed");
            false
        }
    }
}

async fn read_header(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path).await?;
    let mut buf = [0u8; HEADER_LEN];
    let mut filled = 0;
    // Short reads are legal; keep going until EOF or the header is full.
    loop {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == HEADER_LEN {
            break;
        }
    }
    Ok(buf[..filled].to_vec())
}
