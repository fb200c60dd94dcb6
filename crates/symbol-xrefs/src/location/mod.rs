//! Conversions between editor positions, unit offsets and index locations.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    ast::{FileIdx, FilePoint, ParsedUnit, SourceSpan},
    ide::navigation::{IdeLocation, IdePosition, IdeRange},
    index::{Point, SymbolLocation},
    text_pos::{byte_offset_from_position, range_from_byte_offsets},
    vfs::{normalized_path, resolve_file_reference, uri_for_path},
};

/// Main-file offset of an editor position, or `None` when the position lies
/// outside the main file's text.
pub fn main_file_offset(
    unit: &ParsedUnit,
    position: IdePosition,
) -> Option<u32> {
    byte_offset_from_position(unit.main_text(), position).map(|offset| offset as u32)
}

/// Stable path of a unit file. The main file is always reported as the
/// translation unit's own path; files without a path are unlocatable.
pub fn file_path(
    unit: &ParsedUnit,
    file: FileIdx,
    tu_path: &Path,
) -> Option<PathBuf> {
    if file == unit.main_file {
        return Some(normalized_path(tu_path));
    }
    unit.file_path(file).map(normalized_path)
}

/// Location of the token starting at `point`.
pub fn make_location(
    unit: &ParsedUnit,
    point: FilePoint,
    tu_path: &Path,
) -> Option<IdeLocation> {
    let Some(path) = file_path(unit, point.file, tu_path) else {
        debug!("[location] no stable path for file {}", point.file.0);
        return None;
    };
    let text = &unit.file(point.file).text;
    let start = point.offset as usize;
    let end = start + unit.token_length(point) as usize;
    Some(IdeLocation::new(path, range_from_byte_offsets(text, start, end)))
}

pub fn span_to_range(
    unit: &ParsedUnit,
    span: &SourceSpan,
) -> IdeRange {
    range_from_byte_offsets(&unit.file(span.file).text, span.start as usize, span.end as usize)
}

pub fn span_to_location(
    unit: &ParsedUnit,
    span: &SourceSpan,
    tu_path: &Path,
) -> Option<IdeLocation> {
    let path = file_path(unit, span.file, tu_path)?;
    Some(IdeLocation::new(path, span_to_range(unit, span)))
}

/// Range of a main-file token span.
pub fn main_range(
    unit: &ParsedUnit,
    start: u32,
    end: u32,
) -> IdeRange {
    range_from_byte_offsets(unit.main_text(), start as usize, end as usize)
}

/// Converts an index location, or `None` for empty or unresolvable ones.
pub fn index_to_ide_location(
    location: &SymbolLocation,
    tu_path: &Path,
) -> Option<IdeLocation> {
    if location.is_empty() {
        return None;
    }
    let Some(path) = resolve_file_reference(&location.file_uri, tu_path) else {
        warn!("[location] cannot resolve index file `{}`", location.file_uri);
        return None;
    };
    if location.has_overflow() {
        warn!("[location] index location in {} has an overflowing line or column", location.file_uri);
    }
    let range = IdeRange::new(
        IdePosition::new(location.start.line(), location.start.column()),
        IdePosition::new(location.end.line(), location.end.column()),
    );
    Some(IdeLocation::new(path, range))
}

/// Converts an editor location into the index representation.
pub fn to_index_location(location: &IdeLocation) -> SymbolLocation {
    let file_uri = uri_for_path(&location.file_path).map(|uri| uri.to_string()).unwrap_or_default();
    SymbolLocation::new(
        file_uri,
        Point::new(location.range.start.line, location.range.start.character),
        Point::new(location.range.end.line, location.range.end.character),
    )
}
