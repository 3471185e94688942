//! File/line source locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declaration site in the front-end source, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLoc {
    /// Path of the declaring source file, as recorded by the front end.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
}

impl SourceLoc {
    /// Creates a location.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Returns the final path component of [`file`](Self::file).
    pub fn file_name(&self) -> &str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file.as_str())
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let loc = SourceLoc::new("tests/counter.py", 12);
        assert_eq!(loc.to_string(), "tests/counter.py:12");
    }

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(SourceLoc::new("a/b/c.py", 1).file_name(), "c.py");
        assert_eq!(SourceLoc::new("c:\\w\\d.py", 1).file_name(), "d.py");
        assert_eq!(SourceLoc::new("plain.py", 1).file_name(), "plain.py");
    }

    #[test]
    fn serde_roundtrip() {
        let loc = SourceLoc::new("x.py", 3);
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, r#"{"file":"x.py","line":3}"#);
        let back: SourceLoc = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, back);
    }
}
