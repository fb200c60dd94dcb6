use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ast::source::FilePoint;

/// An `#include`/`#import` directive of the main file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inclusion {
    /// Zero-based line of the `#`.
    pub hash_line: u32,
    pub hash_offset: u32,
    /// Target as written, without delimiters.
    pub written: String,
    /// Resolved path; `None` when the header was not found.
    #[serde(default)]
    pub resolved: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacroIdx(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub name: String,
    /// Location of the macro name in its `#define`.
    pub name_loc: FilePoint,
    /// Main-file offset of the `#undef` that ends this definition, if any.
    #[serde(default)]
    pub undefined_at: Option<u32>,
}

/// One entry of the preprocessor's macro reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroReference {
    pub macro_idx: MacroIdx,
    pub start: u32,
    pub end: u32,
    #[serde(default)]
    pub is_definition: bool,
}
