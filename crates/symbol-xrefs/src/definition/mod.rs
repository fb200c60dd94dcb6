//! Go-to-definition, go-to-type and implementation lookups.

mod bridge;
mod implementations;
mod includes;
mod locate;
mod located;
mod macros;
mod nearby;
mod preferred;
mod textual;
mod types;

pub use bridge::{enhance_from_index, find_implementors, located_from_decl};
pub use implementations::find_implementations;
pub use includes::{DocumentLink, document_links, locate_file_referent};
pub use locate::locate_symbol_at;
pub use located::LocatedSymbol;
pub use macros::locate_macro_referent;
pub use nearby::find_nearby_identifier;
pub use preferred::{definition_of, preferred_decl};
pub use textual::locate_symbol_textually;
pub use types::{find_type, locate_symbol_for_type, type_for_node, unwrap_find_type};
