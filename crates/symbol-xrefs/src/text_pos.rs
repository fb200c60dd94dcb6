use crate::ide::navigation::{IdePosition, IdeRange};

/// Byte offset of `position`, or `None` when the line does not exist or the
/// column lies past the end of the line. Columns count UTF-16 code units; a
/// column inside a surrogate pair maps to the start of that character.
pub fn byte_offset_from_position(
    source: &str,
    position: IdePosition,
) -> Option<usize> {
    let line_idx = position.line as usize;
    let mut lines = source.split('\n');
    let mut byte_offset = 0usize;

    for _ in 0..line_idx {
        let line = lines.next()?;
        byte_offset += line.len() + 1;
    }

    let line = lines.next()?;
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut utf16_offset = 0u32;
    let mut char_offset = 0usize;
    for ch in line.chars() {
        let next = utf16_offset + ch.len_utf16() as u32;
        if next > position.character {
            break;
        }
        utf16_offset = next;
        char_offset += ch.len_utf8();
    }
    if position.character > utf16_offset && char_offset == line.len() {
        return None;
    }

    Some(byte_offset + char_offset)
}

/// Position of `byte_offset`, clamped to the end of `source`.
pub fn position_from_byte_offset(
    source: &str,
    byte_offset: usize,
) -> IdePosition {
    let mut remaining = byte_offset.min(source.len());

    for (line_index, line) in source.split('\n').enumerate() {
        let line_len = line.len();
        if remaining <= line_len {
            let mut utf16_col = 0u32;
            let mut byte_count = 0usize;
            for ch in line.chars() {
                if byte_count >= remaining {
                    break;
                }
                utf16_col += ch.len_utf16() as u32;
                byte_count += ch.len_utf8();
            }
            return IdePosition::new(line_index as u32, utf16_col);
        }
        remaining = remaining.saturating_sub(line_len + 1);
    }

    IdePosition::new(0, 0)
}

pub fn range_from_byte_offsets(
    source: &str,
    start: usize,
    end: usize,
) -> IdeRange {
    IdeRange::new(position_from_byte_offset(source, start), position_from_byte_offset(source, end))
}
