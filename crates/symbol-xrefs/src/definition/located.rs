use std::path::PathBuf;

use crate::{ide::navigation::IdeLocation, index::SymbolId};

/// One answer to a go-to query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSymbol {
    /// Name as the user would write it, e.g. `Foo`, `vector<int>`, `foo.h`.
    pub name: String,
    /// Where the symbol is declared; the definition when there is no other.
    pub preferred_declaration: IdeLocation,
    pub definition: Option<IdeLocation>,
    pub id: Option<SymbolId>,
}

impl LocatedSymbol {
    pub fn new(
        name: impl Into<String>,
        preferred_declaration: IdeLocation,
    ) -> Self {
        Self {
            name: name.into(),
            preferred_declaration,
            definition: None,
            id: None,
        }
    }

    /// A whole file, e.g. the target of an `#include`.
    pub fn file(path: PathBuf) -> Self {
        let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
        let location = IdeLocation::file(path);
        Self {
            name,
            definition: Some(location.clone()),
            preferred_declaration: location,
            id: None,
        }
    }
}
