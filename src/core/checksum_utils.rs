/*
 * SHA-256 helpers used to confirm that exported copies are byte-identical to
 * the files they were copied from.
 */
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/*
 * Hex-encoded SHA-256 of a file's contents, read in chunks so large files are
 * not loaded at once.
 */
pub fn sha256_hex(file_path: &Path) -> io::Result<String> {
    let file = File::open(file_path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0; 1024 * 8];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    let hex_checksum = format!("{:x}", hasher.finalize());
    log::trace!("ChecksumUtils: {hex_checksum} for {file_path:?}");
    Ok(hex_checksum)
}

pub fn files_identical(first: &Path, second: &Path) -> io::Result<bool> {
    if first.metadata()?.len() != second.metadata()?.len() {
        return Ok(false);
    }
    Ok(sha256_hex(first)? == sha256_hex(second)?)
}
