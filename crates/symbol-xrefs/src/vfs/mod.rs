use std::path::{Component, Path, PathBuf};

use tower_lsp::lsp_types::Url;

/// Lexically normalizes `path`: drops `.` components and folds `..` into the
/// preceding component. The file system is never consulted, so results are
/// stable for files that do not exist on this machine.
pub fn normalized_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            },
            other => out.push(other),
        }
    }
    out
}

pub fn paths_match(
    left: &Path,
    right: &Path,
) -> bool {
    normalized_path(left) == normalized_path(right)
}

/// The `file://` URI of an absolute path.
pub fn uri_for_path(path: &Path) -> Option<Url> {
    Url::from_file_path(normalized_path(path)).ok()
}

/// Resolves an index file reference to a path. `file://` URIs map directly;
/// bare paths are taken as written, relative ones against the directory of
/// the translation unit `tu_path`.
pub fn resolve_file_reference(
    reference: &str,
    tu_path: &Path,
) -> Option<PathBuf> {
    if reference.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(reference)
        && url.scheme() == "file"
    {
        return url.to_file_path().ok().map(|path| normalized_path(&path));
    }
    let path = Path::new(reference);
    if path.is_absolute() {
        return Some(normalized_path(path));
    }
    let base = tu_path.parent()?;
    Some(normalized_path(&base.join(path)))
}
