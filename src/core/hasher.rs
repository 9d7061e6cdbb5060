use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};
use thiserror::Error;

use crate::utils::hex;

const READ_CHUNK: usize = 64 * 1024;

/// Hex-encoded SHA-256 digest of a file's content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(String);

impl Digest {
    /// Wrap an already computed hex digest
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Hash in-memory bytes
pub fn hash_bytes(bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Digest(hex::encode(&hasher.finalize()[..]))
}

/// Hash the full content of a file
///
/// The file is streamed in fixed-size chunks so large files are never held
/// in memory. The handle is dropped on every exit path.
pub fn hash_file(path: &Path) -> Result<Digest, FileError> {
    let unreadable = |source: io::Error| FileError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(unreadable(e)),
        };
        hasher.update(&buf[..n]);
    }

    Ok(Digest(hex::encode(&hasher.finalize()[..])))
}

/// Hash a file, treating any failure as an absent digest
pub fn try_hash_file(path: &Path) -> Option<Digest> {
    match hash_file(path) {
        Ok(digest) => Some(digest),
        Err(e) => {
            tracing::warn!("{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_is_hex_sha256() {
        let digest = hash_bytes(b"");
        assert_eq!(
            digest.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_hash_file_matches_hash_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bashrc");
        std::fs::write(&path, "export EDITOR=vim\n").unwrap();

        let from_file = hash_file(&path).unwrap();
        assert_eq!(from_file, hash_bytes(b"export EDITOR=vim\n"));
        assert_eq!(from_file, hash_file(&path).unwrap());
    }

    #[test]
    fn test_hash_file_spanning_chunks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big");
        let content: Vec<u8> = (0..READ_CHUNK * 2 + 17).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        assert_eq!(hash_file(&path).unwrap(), hash_bytes(&content));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let err = hash_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FileError::Unreadable { .. }));
        assert!(err.to_string().contains("nope"));
        assert!(try_hash_file(&dir.path().join("nope")).is_none());
    }

    #[test]
    fn test_directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        assert!(try_hash_file(dir.path()).is_none());
    }

    proptest! {
        #[test]
        fn prop_file_digest_depends_only_on_bytes(
            content in proptest::collection::vec(any::<u8>(), 0..4096),
        ) {
            let dir = TempDir::new().unwrap();
            let a = dir.path().join("a");
            let b = dir.path().join("nested-b");
            std::fs::write(&a, &content).unwrap();
            std::fs::write(&b, &content).unwrap();

            let digest = hash_file(&a).unwrap();
            prop_assert_eq!(digest.len(), 64);
            prop_assert_eq!(&digest, &hash_file(&b).unwrap());
            prop_assert_eq!(&digest, &hash_bytes(&content));
        }

        #[test]
        fn prop_flipping_any_byte_changes_digest(
            content in proptest::collection::vec(any::<u8>(), 1..4096),
            index in any::<prop::sample::Index>(),
            mask in 1u8..=255,
        ) {
            let mut changed = content.clone();
            let i = index.index(changed.len());
            changed[i] ^= mask;
            prop_assert_ne!(hash_bytes(&content), hash_bytes(&changed));
        }

        #[test]
        fn prop_appending_a_byte_changes_digest(
            content in proptest::collection::vec(any::<u8>(), 0..4096),
            extra in any::<u8>(),
        ) {
            let mut longer = content.clone();
            longer.push(extra);
            prop_assert_ne!(hash_bytes(&content), hash_bytes(&longer));
        }
    }
}
