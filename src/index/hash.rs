//! Content digests for change detection
//!
//! Deterministic fixed-length hex digests over byte content. Files are read
//! in chunks so large inputs do not balloon memory. Unsupported algorithm
//! names and missing files are the named failures here; everything else in
//! the system degrades silently.

use sha2::{Digest, Sha256, Sha512};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use super::IndexError;

const CHUNK_SIZE: usize = 8192;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = IndexError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(IndexError::UnsupportedAlgorithm(name.to_string())),
        }
    }
}

/// Hex digest of a byte buffer.
pub fn digest_bytes(bytes: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
    }
}

/// Hex digest of a file's content, read in chunks.
pub fn file_digest(path: &Path, algorithm: HashAlgorithm) -> Result<String, IndexError> {
    if !path.is_file() {
        return Err(IndexError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path).map_err(|e| IndexError::Io(e.to_string()))?;
    match algorithm {
        HashAlgorithm::Sha256 => digest_reader(file, Sha256::new()),
        HashAlgorithm::Sha512 => digest_reader(file, Sha512::new()),
    }
}

fn digest_reader<D: Digest>(mut reader: impl Read, mut hasher: D) -> Result<String, IndexError> {
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = reader
            .read(&mut chunk)
            .map_err(|e| IndexError::Io(e.to_string()))?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}
