pub mod ast;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod hierarchy;
pub mod ide;
pub mod index;
pub mod location;
pub mod perf;
pub mod provider;
pub mod references;
pub mod selection;
pub mod syntax;
pub mod text_pos;
pub mod vfs;

#[cfg(test)]
#[path = "../tests/src/fixture.rs"]
pub(crate) mod fixture;

pub use ast::{ParsedUnit, UnitBuilder};
pub use config::XrefSettings;
pub use context::QueryContext;
pub use error::{PayloadError, XrefError};
pub use index::{MemIndex, SymbolId, SymbolIndex};
pub use provider::{ReferencesResponse, XrefProvider};
