//! Spritesheet packing.
//!
//! Frames are laid out on a uniform grid of square cells in emission order,
//! left to right, one row after another. Row 0 is the top row of the sheet by
//! default ([`RowOrigin::TopDown`]); [`RowOrigin::BottomUp`] puts it at the
//! bottom instead, for engines that address textures from the lower-left
//! corner.
//!
//! Frames are copied over the transparent sheet as-is, alpha included. Cells
//! without a frame stay fully transparent.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::codec::{read_frame, write_frame};
use crate::error::{SpriteError, SpriteResult};
use crate::frame::{FrameImage, ImageFormat};
use crate::naming::{
    parse_frame_file_name, sanitize_base_name, sheet_file_name, sheet_metadata_file_name,
};

/// Valid range of manual grid dimensions.
pub const MANUAL_GRID_LIMITS: std::ops::RangeInclusive<u32> = 1..=20;

/// Vertical placement of grid row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrigin {
    /// Row 0 at the top of the sheet.
    #[default]
    TopDown,
    /// Row 0 at the bottom of the sheet.
    BottomUp,
}

impl RowOrigin {
    /// Returns the origin as a string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            RowOrigin::TopDown => "top_down",
            RowOrigin::BottomUp => "bottom_up",
        }
    }
}

/// How the grid dimensions are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GridMode {
    /// Near-square grid sized from the frame count.
    #[default]
    Auto,
    /// Fixed grid. Frames beyond `columns * rows` are dropped.
    Manual {
        #[serde(default = "default_manual_dim")]
        columns: u32,
        #[serde(default = "default_manual_dim")]
        rows: u32,
    },
}

fn default_manual_dim() -> u32 {
    4
}

impl GridMode {
    /// Checks manual dimensions against [`MANUAL_GRID_LIMITS`].
    pub fn validate(&self) -> SpriteResult<()> {
        if let GridMode::Manual { columns, rows } = self {
            for (label, value) in [("columns", columns), ("rows", rows)] {
                if !MANUAL_GRID_LIMITS.contains(value) {
                    return Err(SpriteError::invalid_config(format!(
                        "grid {} must be between 1 and 20, got {}",
                        label, value
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Smallest `c` with `c * c >= n`.
fn ceil_sqrt(n: u32) -> u32 {
    let mut c = (f64::from(n)).sqrt().ceil() as u32;
    while c.saturating_mul(c) < n {
        c += 1;
    }
    while c > 1 && (c - 1) * (c - 1) >= n {
        c -= 1;
    }
    c
}

/// Grid geometry of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpritesheetLayout {
    /// Cells per row.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Edge length of a cell in pixels.
    pub cell_size: u32,
}

impl SpritesheetLayout {
    /// Near-square grid for `frame_count` frames: `ceil(sqrt(n))` columns and
    /// as many rows as needed. A count of zero is treated as one.
    pub fn auto(frame_count: u32, cell_size: u32) -> Self {
        let n = frame_count.max(1);
        let columns = ceil_sqrt(n);
        let rows = n.div_ceil(columns);
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Explicit grid.
    pub fn manual(columns: u32, rows: u32, cell_size: u32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Layout for `grid` holding `frame_count` frames.
    pub fn for_grid(grid: GridMode, frame_count: u32, cell_size: u32) -> Self {
        match grid {
            GridMode::Auto => Self::auto(frame_count, cell_size),
            GridMode::Manual { columns, rows } => Self::manual(columns, rows, cell_size),
        }
    }

    /// Number of cells.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Sheet width in pixels.
    pub fn sheet_width(&self) -> u32 {
        self.columns * self.cell_size
    }

    /// Sheet height in pixels.
    pub fn sheet_height(&self) -> u32 {
        self.rows * self.cell_size
    }

    /// Grid cell `(column, row)` of frame `index`.
    pub fn cell_of(&self, index: usize) -> (u32, u32) {
        let columns = self.columns as usize;
        ((index % columns) as u32, (index / columns) as u32)
    }

    /// Top-left pixel of frame `index` on the sheet.
    pub fn cell_origin(&self, index: usize, origin: RowOrigin) -> (u32, u32) {
        let (col, row) = self.cell_of(index);
        let row = match origin {
            RowOrigin::TopDown => row,
            RowOrigin::BottomUp => self.rows - 1 - row,
        };
        (col * self.cell_size, row * self.cell_size)
    }
}

/// Composites `frames` onto a transparent sheet.
///
/// Frames past the layout capacity are dropped. Every frame must be exactly
/// `cell_size` square.
pub fn pack(
    frames: &[FrameImage],
    layout: &SpritesheetLayout,
    origin: RowOrigin,
) -> SpriteResult<FrameImage> {
    if frames.is_empty() {
        return Err(SpriteError::InsufficientFrames {
            required: 1,
            found: 0,
        });
    }

    let capacity = layout.capacity();
    if frames.len() > capacity {
        debug!(
            "dropping {} frame(s) beyond the {}x{} grid",
            frames.len() - capacity,
            layout.columns,
            layout.rows
        );
    }

    let mut sheet = FrameImage::new(layout.sheet_width(), layout.sheet_height());
    for (index, frame) in frames.iter().take(capacity).enumerate() {
        if frame.width != layout.cell_size || frame.height != layout.cell_size {
            return Err(SpriteError::FrameSizeMismatch {
                index,
                expected: layout.cell_size,
                width: frame.width,
                height: frame.height,
            });
        }
        let (x, y) = layout.cell_origin(index, origin);
        sheet.blit(frame, x, y);
    }

    Ok(sheet)
}

/// Frame files of one sequence in `dir`, ordered by emission index.
///
/// With `base = None` the directory must hold exactly one sequence.
pub fn collect_frame_files(
    dir: &Path,
    base: Option<&str>,
    format: ImageFormat,
) -> SpriteResult<Vec<PathBuf>> {
    let wanted = base.map(sanitize_base_name);
    let mut found: Vec<(String, u32, PathBuf)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some((stem, index)) = parse_frame_file_name(name, format) else {
            continue;
        };
        if wanted.as_deref().is_some_and(|w| w != stem) {
            continue;
        }
        found.push((stem.to_string(), index, entry.path()));
    }

    if wanted.is_none() {
        if let Some((first, _, _)) = found.first() {
            if found.iter().any(|(stem, _, _)| stem != first) {
                return Err(SpriteError::invalid_config(format!(
                    "{} holds more than one frame sequence; pass a base name",
                    dir.display()
                )));
            }
        }
    }

    found.sort_by_key(|(_, index, _)| *index);
    Ok(found.into_iter().map(|(_, _, path)| path).collect())
}

/// A packed sheet, not yet written.
#[derive(Debug, Clone)]
pub struct PackedSheet {
    /// Sheet pixels.
    pub image: FrameImage,
    /// Grid used.
    pub layout: SpritesheetLayout,
    /// Frames placed on the sheet.
    pub frame_count: usize,
}

/// Loads the frame files of one sequence from `dir` and packs them.
///
/// `expected` is the number of frames the sequence should contain; fewer files
/// on disk is an error. The cell size is taken from the first frame.
pub fn pack_directory(
    dir: &Path,
    base: Option<&str>,
    format: ImageFormat,
    grid: GridMode,
    origin: RowOrigin,
    expected: Option<usize>,
) -> SpriteResult<PackedSheet> {
    let mut paths = collect_frame_files(dir, base, format)?;
    let required = expected.unwrap_or(paths.len()).max(1);
    if paths.len() < required {
        return Err(SpriteError::InsufficientFrames {
            required,
            found: paths.len(),
        });
    }
    paths.truncate(required);

    let frames = paths
        .iter()
        .map(|p| read_frame(p))
        .collect::<SpriteResult<Vec<_>>>()?;
    let cell_size = frames[0].width;
    let layout = SpritesheetLayout::for_grid(grid, frames.len() as u32, cell_size);
    let image = pack(&frames, &layout, origin)?;

    Ok(PackedSheet {
        image,
        layout,
        frame_count: frames.len().min(layout.capacity()),
    })
}

/// Placement of one frame on a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetFrameRect {
    /// Emission index of the frame.
    pub index: usize,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// JSON sidecar describing a written sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    /// File name of the sheet image.
    pub image: String,
    /// Sheet dimensions `[width, height]` in pixels.
    pub size: [u32; 2],
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Cell edge length in pixels.
    pub cell_size: u32,
    /// Row origin used for packing.
    pub origin: RowOrigin,
    /// BLAKE3 hash of the sheet image file.
    pub hash: String,
    /// One rect per packed frame, in emission order.
    pub frames: Vec<SheetFrameRect>,
}

impl SheetMetadata {
    /// Describes `frame_count` frames packed with `layout` and `origin`.
    pub fn new(
        image: impl Into<String>,
        layout: &SpritesheetLayout,
        origin: RowOrigin,
        frame_count: usize,
        hash: impl Into<String>,
    ) -> Self {
        let frames = (0..frame_count.min(layout.capacity()))
            .map(|index| {
                let (x, y) = layout.cell_origin(index, origin);
                SheetFrameRect {
                    index,
                    x,
                    y,
                    width: layout.cell_size,
                    height: layout.cell_size,
                }
            })
            .collect();
        Self {
            image: image.into(),
            size: [layout.sheet_width(), layout.sheet_height()],
            columns: layout.columns,
            rows: layout.rows,
            cell_size: layout.cell_size,
            origin,
            hash: hash.into(),
            frames,
        }
    }
}

/// Files produced by [`write_sheet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOutput {
    /// The sheet image.
    pub path: PathBuf,
    /// BLAKE3 hash of the sheet image.
    pub hash: String,
    /// The metadata sidecar, when requested.
    pub metadata_path: Option<PathBuf>,
}

/// Writes `sheet` to `{dir}/{base}_sh_{rows}x{columns}.{ext}` and, when
/// `with_metadata` is set, the matching `.json` sidecar.
pub fn write_sheet(
    sheet: &PackedSheet,
    dir: &Path,
    base: &str,
    format: ImageFormat,
    origin: RowOrigin,
    with_metadata: bool,
) -> SpriteResult<SheetOutput> {
    let layout = &sheet.layout;
    let file_name = sheet_file_name(base, layout.rows, layout.columns, format);
    let path = dir.join(&file_name);
    let hash = write_frame(&sheet.image, &path, format)?;

    let metadata_path = if with_metadata {
        let metadata = SheetMetadata::new(file_name, layout, origin, sheet.frame_count, &hash);
        let meta_path = dir.join(sheet_metadata_file_name(base, layout.rows, layout.columns));
        fs::write(&meta_path, serde_json::to_string_pretty(&metadata)?)?;
        Some(meta_path)
    } else {
        None
    };

    Ok(SheetOutput {
        path,
        hash,
        metadata_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::frame_file_name;
    use pretty_assertions::assert_eq;

    fn frame(size: u32, value: u8) -> FrameImage {
        FrameImage::filled(size, size, [value, value, value, 255])
    }

    #[test]
    fn test_auto_grid_sizes() {
        let grid = |n| {
            let l = SpritesheetLayout::auto(n, 8);
            (l.columns, l.rows)
        };
        assert_eq!(grid(16), (4, 4));
        assert_eq!(grid(10), (4, 3));
        assert_eq!(grid(1), (1, 1));
        assert_eq!(grid(0), (1, 1));
        assert_eq!(grid(2), (2, 1));
        assert_eq!(grid(17), (5, 4));
    }

    #[test]
    fn test_ceil_sqrt_exact_squares() {
        for c in 1..=50u32 {
            assert_eq!(ceil_sqrt(c * c), c);
            assert_eq!(ceil_sqrt(c * c + 1), c + 1);
        }
    }

    #[test]
    fn test_top_down_is_default_origin() {
        assert_eq!(RowOrigin::default(), RowOrigin::TopDown);
        let layout = SpritesheetLayout::manual(2, 2, 10);
        assert_eq!(layout.cell_origin(0, RowOrigin::default()), (0, 0));
        assert_eq!(layout.cell_origin(3, RowOrigin::default()), (10, 10));
    }

    #[test]
    fn test_bottom_up_origin() {
        let layout = SpritesheetLayout::manual(2, 2, 10);
        assert_eq!(layout.cell_origin(0, RowOrigin::BottomUp), (0, 10));
        assert_eq!(layout.cell_origin(1, RowOrigin::BottomUp), (10, 10));
        assert_eq!(layout.cell_origin(2, RowOrigin::BottomUp), (0, 0));
    }

    #[test]
    fn test_pack_leaves_empty_cells_transparent() {
        let frames = vec![frame(4, 10), frame(4, 20), frame(4, 30)];
        let layout = SpritesheetLayout::auto(3, 4);
        let sheet = pack(&frames, &layout, RowOrigin::TopDown).unwrap();

        assert_eq!((sheet.width, sheet.height), (8, 8));
        assert_eq!(sheet.pixel(0, 0), [10, 10, 10, 255]);
        assert_eq!(sheet.pixel(4, 0), [20, 20, 20, 255]);
        assert_eq!(sheet.pixel(0, 4), [30, 30, 30, 255]);
        assert_eq!(sheet.pixel(5, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_pack_copies_alpha_verbatim() {
        let frames = vec![FrameImage::filled(2, 2, [200, 0, 0, 64])];
        let layout = SpritesheetLayout::auto(1, 2);
        let sheet = pack(&frames, &layout, RowOrigin::TopDown).unwrap();
        assert_eq!(sheet.pixel(1, 1), [200, 0, 0, 64]);
    }

    #[test]
    fn test_manual_grid_truncates() {
        let frames: Vec<_> = (0..6).map(|i| frame(2, i * 10)).collect();
        let layout = SpritesheetLayout::manual(2, 2, 2);
        let sheet = pack(&frames, &layout, RowOrigin::TopDown).unwrap();
        assert_eq!((sheet.width, sheet.height), (4, 4));
        assert_eq!(sheet.pixel(2, 2), [30, 30, 30, 255]);
    }

    #[test]
    fn test_pack_rejects_wrong_frame_size() {
        let frames = vec![frame(4, 1), frame(5, 2)];
        let layout = SpritesheetLayout::auto(2, 4);
        let err = pack(&frames, &layout, RowOrigin::TopDown).unwrap_err();
        assert!(matches!(
            err,
            SpriteError::FrameSizeMismatch {
                index: 1,
                expected: 4,
                width: 5,
                height: 5
            }
        ));
    }

    #[test]
    fn test_pack_empty_is_insufficient() {
        let layout = SpritesheetLayout::auto(0, 4);
        assert!(matches!(
            pack(&[], &layout, RowOrigin::TopDown),
            Err(SpriteError::InsufficientFrames {
                required: 1,
                found: 0
            })
        ));
    }

    #[test]
    fn test_grid_mode_validation() {
        assert!(GridMode::Auto.validate().is_ok());
        assert!(GridMode::Manual {
            columns: 20,
            rows: 1
        }
        .validate()
        .is_ok());
        assert!(GridMode::Manual {
            columns: 0,
            rows: 4
        }
        .validate()
        .is_err());
        assert!(GridMode::Manual {
            columns: 4,
            rows: 21
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_grid_mode_serde() {
        let grid: GridMode = serde_json::from_str(r#"{"mode":"manual"}"#).unwrap();
        assert_eq!(grid, GridMode::Manual { columns: 4, rows: 4 });
        let grid: GridMode = serde_json::from_str(r#"{"mode":"auto"}"#).unwrap();
        assert_eq!(grid, GridMode::Auto);
    }

    #[test]
    fn test_collect_orders_by_index_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        for i in [2u32, 0, 10, 1] {
            let name = frame_file_name("Walk", i, ImageFormat::Png);
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::write(dir.path().join("Run_frame_0000.png"), b"x").unwrap();
        fs::write(dir.path().join("Walk_frame_0003.webp"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = collect_frame_files(dir.path(), Some("Walk"), ImageFormat::Png).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "Walk_frame_0000.png",
                "Walk_frame_0001.png",
                "Walk_frame_0002.png",
                "Walk_frame_0010.png"
            ]
        );

        assert!(collect_frame_files(dir.path(), None, ImageFormat::Png).is_err());
    }

    #[test]
    fn test_pack_directory_and_write_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3u32 {
            let path = dir
                .path()
                .join(frame_file_name("Idle", i, ImageFormat::Png));
            write_frame(&frame(4, i as u8 * 50), &path, ImageFormat::Png).unwrap();
        }

        let packed = pack_directory(
            dir.path(),
            Some("Idle"),
            ImageFormat::Png,
            GridMode::Auto,
            RowOrigin::TopDown,
            Some(3),
        )
        .unwrap();
        assert_eq!(packed.frame_count, 3);
        assert_eq!(packed.layout, SpritesheetLayout::manual(2, 2, 4));

        let out = write_sheet(
            &packed,
            dir.path(),
            "Idle",
            ImageFormat::Png,
            RowOrigin::TopDown,
            true,
        )
        .unwrap();
        assert!(out.path.ends_with("Idle_sh_2x2.png"));

        let meta_path = out.metadata_path.unwrap();
        assert!(meta_path.ends_with("Idle_sh_2x2.json"));
        let meta: SheetMetadata =
            serde_json::from_str(&fs::read_to_string(meta_path).unwrap()).unwrap();
        assert_eq!(meta.size, [8, 8]);
        assert_eq!(meta.hash, out.hash);
        assert_eq!(meta.frames.len(), 3);
        assert_eq!(
            meta.frames[2],
            SheetFrameRect {
                index: 2,
                x: 0,
                y: 4,
                width: 4,
                height: 4
            }
        );
    }

    #[test]
    fn test_pack_directory_requires_expected_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join(frame_file_name("Idle", 0, ImageFormat::Png));
        write_frame(&frame(4, 1), &path, ImageFormat::Png).unwrap();

        let err = pack_directory(
            dir.path(),
            Some("Idle"),
            ImageFormat::Png,
            GridMode::Auto,
            RowOrigin::TopDown,
            Some(2),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SpriteError::InsufficientFrames {
                required: 2,
                found: 1
            }
        ));
    }
}
