use md5::{Digest, Md5};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of leading bytes covered by the slice checksum (256 KiB).
pub const SLICE_LEN: usize = 262_144;

#[derive(Error, Debug)]
pub enum FactsError {
    #[error("File path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The four facts a rapid-upload link encodes about a file.
///
/// Both checksums are 32-character uppercase hex MD5 digests. Whenever
/// `length <= SLICE_LEN` the slice covers the whole file, so
/// `slice_md5 == md5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFacts {
    pub name: String,
    pub length: u64,
    pub md5: String,
    pub slice_md5: String,
}

impl FileFacts {
    /// Compute the facts for an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Self {
        let slice = &data[..data.len().min(SLICE_LEN)];
        FileFacts {
            name: name.into(),
            length: data.len() as u64,
            md5: md5_hex(data),
            slice_md5: md5_hex(slice),
        }
    }

    /// Read a regular file and compute its facts. The name is the final
    /// path component.
    pub fn from_path(path: &Path) -> Result<Self, FactsError> {
        if !path.exists() {
            return Err(FactsError::NotFound(path.to_path_buf()));
        }
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(FileFacts::from_bytes(name, &data))
    }
}

fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode_upper(hasher.finalize())
}
