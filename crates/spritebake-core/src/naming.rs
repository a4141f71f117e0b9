//! Output file naming.

use crate::frame::ImageFormat;

/// Characters reserved on common filesystems, replaced by `_` in base names.
pub const RESERVED_CHARS: [char; 7] = ['|', ':', '*', '?', '<', '>', '"'];

const FRAME_MARKER: &str = "_frame_";

/// Replaces every reserved character with `_`.
pub fn sanitize_base_name(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// `{base}_frame_{index:04}.{ext}` for the frame at emission index `index`.
pub fn frame_file_name(base: &str, index: u32, format: ImageFormat) -> String {
    format!(
        "{}{}{:04}.{}",
        sanitize_base_name(base),
        FRAME_MARKER,
        index,
        format.extension()
    )
}

/// `{base}_sh_{rows}x{columns}.{ext}`.
pub fn sheet_file_name(base: &str, rows: u32, columns: u32, format: ImageFormat) -> String {
    format!(
        "{}_sh_{}x{}.{}",
        sanitize_base_name(base),
        rows,
        columns,
        format.extension()
    )
}

/// `{base}_sh_{rows}x{columns}.json`, the sheet metadata sidecar.
pub fn sheet_metadata_file_name(base: &str, rows: u32, columns: u32) -> String {
    format!("{}_sh_{}x{}.json", sanitize_base_name(base), rows, columns)
}

/// Splits a frame file name into its base name and emission index.
///
/// Returns `None` for anything that is not `{base}_frame_{digits}.{ext}` with
/// the extension of `format`.
pub fn parse_frame_file_name(file_name: &str, format: ImageFormat) -> Option<(&str, u32)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case(format.extension()) {
        return None;
    }
    let (base, digits) = stem.rsplit_once(FRAME_MARKER)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((base, digits.parse().ok()?))
}
