//! Content hashing of generated artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;

/// A 128-bit XXH3 hash of file content.
///
/// The generator compares the hash of freshly emitted text against the file
/// already on disk so unchanged outputs keep their timestamps, which keeps
/// downstream simulator builds incremental.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Computes the hash of a string.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Hashes the file at `path`, returning `None` when it does not exist.
    pub fn of_file(path: &Path) -> io::Result<Option<Self>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(Self::from_bytes(&bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_hash() {
        assert_eq!(
            ContentHash::of_text("module a(); endmodule"),
            ContentHash::of_text("module a(); endmodule")
        );
        assert_ne!(ContentHash::of_text("a"), ContentHash::of_text("b"));
    }

    #[test]
    fn display_is_hex() {
        let s = ContentHash::of_text("x").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn file_hash_matches_text_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.sv");
        std::fs::write(&path, "endmodule\n").unwrap();
        let on_disk = ContentHash::of_file(&path).unwrap();
        assert_eq!(on_disk, Some(ContentHash::of_text("endmodule\n")));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let hash = ContentHash::of_file(&dir.path().join("absent.sv")).unwrap();
        assert!(hash.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::of_text("serde");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
