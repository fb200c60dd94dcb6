//! Find-references, document highlights and symbol info.

mod find;
mod finder;
mod highlight;
mod symbol_info;

pub use find::{Reference, ReferenceAttributes, ReferencesResult, find_references};
pub use finder::{Occurrence, SymbolRole, find_refs};
pub use highlight::{DocumentHighlight, HighlightKind, find_document_highlights};
pub use symbol_info::{SymbolDetails, get_symbol_info};
