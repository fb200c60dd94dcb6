use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Index into the unit's file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileIdx(pub u32);

/// A byte offset inside one file of the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilePoint {
    pub file: FileIdx,
    pub offset: u32,
}

impl FilePoint {
    pub const fn new(
        file: FileIdx,
        offset: u32,
    ) -> Self {
        Self {
            file,
            offset,
        }
    }
}

/// Where a token's text is spelled, and, for tokens produced by a macro, the
/// expansion point the token logically resides at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub spelling: FilePoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<FilePoint>,
}

impl SourceLocation {
    pub const fn file(point: FilePoint) -> Self {
        Self {
            spelling: point,
            expansion: None,
        }
    }

    pub const fn macro_expanded(
        spelling: FilePoint,
        expansion: FilePoint,
    ) -> Self {
        Self {
            spelling,
            expansion: Some(expansion),
        }
    }

    pub fn is_macro(&self) -> bool {
        self.expansion.is_some()
    }

    /// The location a reader would attribute the token to: the expansion point
    /// for macro-produced tokens, the spelling otherwise.
    pub fn file_point(&self) -> FilePoint {
        self.expansion.unwrap_or(self.spelling)
    }
}

/// Half-open byte range inside one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub file: FileIdx,
    pub start: u32,
    pub end: u32,
}

impl SourceSpan {
    pub const fn new(
        file: FileIdx,
        start: u32,
        end: u32,
    ) -> Self {
        Self {
            file,
            start,
            end,
        }
    }

    pub fn begin(&self) -> FilePoint {
        FilePoint::new(self.file, self.start)
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(
        &self,
        point: FilePoint,
    ) -> bool {
        point.file == self.file && self.start <= point.offset && point.offset < self.end
    }

    /// Closed-interval check: the point may sit on either boundary.
    pub fn touches(
        &self,
        point: FilePoint,
    ) -> bool {
        point.file == self.file && self.start <= point.offset && point.offset <= self.end
    }

    pub fn encloses(
        &self,
        other: &SourceSpan,
    ) -> bool {
        self.file == other.file && self.start <= other.start && other.end <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path of the file. `None` for buffers with no stable identity,
    /// such as builtin definitions or token-pasting scratch space.
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub text: String,
}
