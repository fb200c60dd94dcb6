use std::path::PathBuf;

/// Zero-based line and UTF-16 column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IdePosition {
    pub line: u32,
    pub character: u32,
}

impl IdePosition {
    pub const fn new(
        line: u32,
        character: u32,
    ) -> Self {
        Self {
            line,
            character,
        }
    }
}

/// Half-open range of positions in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IdeRange {
    pub start: IdePosition,
    pub end: IdePosition,
}

impl IdeRange {
    pub const fn new(
        start: IdePosition,
        end: IdePosition,
    ) -> Self {
        Self {
            start,
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Closed containment: a position on either end counts.
    pub fn touches(
        &self,
        position: IdePosition,
    ) -> bool {
        self.start <= position && position <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdeLocation {
    pub file_path: PathBuf,
    pub range: IdeRange,
}

impl IdeLocation {
    pub fn new(
        file_path: impl Into<PathBuf>,
        range: IdeRange,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            range,
        }
    }

    /// A location naming a whole file, such as an include target.
    pub fn file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(file_path, IdeRange::default())
    }
}

/// Where a go-to request should take the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Single(IdeLocation),
    Multiple(Vec<IdeLocation>),
}

impl NavigationTarget {
    pub fn from_locations(locations: Vec<IdeLocation>) -> Option<Self> {
        match locations.len() {
            0 => None,
            1 => locations.into_iter().next().map(Self::Single),
            _ => Some(Self::Multiple(locations)),
        }
    }
}
