use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::fmt::Write;
use std::path::Path;

use crate::error::{TerrainError, TerrainResult};
use crate::ships::{Fleet, Move};
use crate::terrain::{cell_label, TerrainGrid, TerrainType};

/// Largest image edge, in pixels, the renderer will allocate.
pub const MAX_IMAGE_SIDE: u32 = 16_384;

const GRID_LINE: Rgb<u8> = Rgb([40, 40, 40]);
const LABEL_COLOR: Rgb<u8> = Rgb([30, 30, 30]);
const SHIP_OUTLINE: Rgb<u8> = Rgb([255, 255, 255]);
const HIT_MARK: Rgb<u8> = Rgb([200, 40, 40]);
const MISS_MARK: Rgb<u8> = Rgb([240, 240, 240]);

/// Pixel offset of cell `index`, or `None` when it does not fit in `u32`.
fn cell_offset(index: usize, cell_px: u32) -> Option<u32> {
    u32::try_from(index).ok()?.checked_mul(cell_px)
}

/// Top-left corner of `(row, col)` shifted by `inset`, or `None` unless the
/// whole cell lies inside `img`.
fn cell_origin(img: &RgbImage, row: usize, col: usize, cell_px: u32, inset: u32) -> Option<(i32, i32)> {
    let right = cell_offset(col.checked_add(1)?, cell_px)?;
    let bottom = cell_offset(row.checked_add(1)?, cell_px)?;
    if right > img.width() || bottom > img.height() {
        return None;
    }
    let x = i32::try_from(right - cell_px + inset).ok()?;
    let y = i32::try_from(bottom - cell_px + inset).ok()?;
    Some((x, y))
}

/// Edge length of the rendered image, rejected when it overflows or
/// exceeds [`MAX_IMAGE_SIDE`].
pub fn image_side(size: usize, cell_px: u32) -> TerrainResult<u32> {
    cell_offset(size, cell_px)
        .filter(|&side| side <= MAX_IMAGE_SIDE)
        .ok_or_else(|| {
            TerrainError::InvalidArgument(format!(
                "a {size}x{size} board at {cell_px}px per cell exceeds {MAX_IMAGE_SIDE}px"
            ))
        })
}

pub struct TerrainRenderer;

impl TerrainRenderer {
    /// Flat-coloured cells with a one pixel border; `cell_px` per side.
    pub fn render_to_image(grid: &TerrainGrid, cell_px: u32) -> TerrainResult<RgbImage> {
        let side = image_side(grid.size(), cell_px)?;
        let mut img: RgbImage = ImageBuffer::new(side, side);

        for (row, col, kind) in grid.cells() {
            // Every offset is below `side`, which was checked above.
            let (x0, y0) = (col as u32 * cell_px, row as u32 * cell_px);
            let color = Rgb(kind.color());
            for py in y0..y0 + cell_px {
                for px in x0..x0 + cell_px {
                    img.put_pixel(px, py, color);
                }
            }
            if cell_px > 2 {
                let rect = Rect::at(x0 as i32, y0 as i32).of_size(cell_px, cell_px);
                draw_hollow_rect_mut(&mut img, rect, GRID_LINE);
            }
        }

        Ok(img)
    }

    /// Stamp board coordinates (`A1`, `B3`, ...) into the top-left of each cell.
    pub fn draw_labels(img: &mut RgbImage, grid: &TerrainGrid, cell_px: u32, font: &Font<'_>) {
        let scale = Scale::uniform((cell_px as f32 * 0.25).max(8.0));
        for (row, col, _) in grid.cells() {
            let Some((x, y)) = cell_origin(img, row, col, cell_px, 0) else {
                continue;
            };
            draw_text_mut(img, LABEL_COLOR, x + 4, y + 3, scale, font, &cell_label(row, col));
        }
    }

    /// Outline every cell a ship occupies.
    pub fn draw_fleet(img: &mut RgbImage, fleet: &Fleet, cell_px: u32) {
        if cell_px <= 6 {
            return;
        }
        let inset = cell_px / 6;
        for (row, col) in fleet.occupied() {
            let Some((x, y)) = cell_origin(img, row, col, cell_px, inset) else {
                continue;
            };
            let rect = Rect::at(x, y).of_size(cell_px - 2 * inset, cell_px - 2 * inset);
            draw_hollow_rect_mut(img, rect, SHIP_OUTLINE);
        }
    }

    /// Fill the centre of every revealed cell: red for a hit, white for a miss.
    pub fn draw_moves(img: &mut RgbImage, moves: &[Move], cell_px: u32) {
        let mark = cell_px / 3;
        if mark == 0 {
            return;
        }
        for shot in moves {
            let Some((x, y)) = cell_origin(img, shot.row, shot.col, cell_px, mark) else {
                continue;
            };
            let color = if shot.hit { HIT_MARK } else { MISS_MARK };
            draw_filled_rect_mut(img, Rect::at(x, y).of_size(mark, mark), color);
        }
    }

    /// One glyph per cell, optionally wrapped in ANSI colour codes.
    pub fn render_ascii(grid: &TerrainGrid, color: bool) -> String {
        let mut out = String::new();
        for row in grid.rows() {
            for &kind in row {
                if color {
                    let _ = write!(out, "{}{}\x1b[0m", kind.ansi_color(), kind.glyph());
                } else {
                    out.push(kind.glyph());
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn legend(color: bool) -> String {
        TerrainType::ALL
            .iter()
            .map(|kind| {
                if color {
                    format!("{}{}\x1b[0m {}", kind.ansi_color(), kind.glyph(), kind.display_name())
                } else {
                    format!("{} {}", kind.glyph(), kind.display_name())
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

pub fn load_font(path: impl AsRef<Path>) -> TerrainResult<Font<'static>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    Font::try_from_vec(bytes).ok_or_else(|| TerrainError::Font(path.display().to_string()))
}

pub fn save_png(img: &RgbImage, path: impl AsRef<Path>) -> TerrainResult<()> {
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::{default_fleet, place_fleet, reveal_moves};

    #[test]
    fn test_image_dimensions() {
        let grid = TerrainGrid::reference();
        let img = TerrainRenderer::render_to_image(&grid, 20).unwrap();
        assert_eq!(img.dimensions(), (120, 120));
        assert_eq!(TerrainRenderer::render_to_image(&TerrainGrid::empty(), 20).unwrap().dimensions(), (0, 0));
    }

    #[test]
    fn test_cell_interior_uses_category_color() {
        let grid = TerrainGrid::reference();
        let img = TerrainRenderer::render_to_image(&grid, 20).unwrap();
        // Cell (3, 3) is highland; sample its centre, away from the border.
        assert_eq!(*img.get_pixel(3 * 20 + 10, 3 * 20 + 10), Rgb(TerrainType::Highland.color()));
        assert_eq!(*img.get_pixel(10, 10), Rgb(TerrainType::DeepWater.color()));
        assert_eq!(*img.get_pixel(0, 0), GRID_LINE);
    }

    #[test]
    fn test_fleet_outline() {
        let grid = TerrainGrid::reference();
        let fleet = place_fleet(&grid, &default_fleet(), 1).unwrap();
        let mut img = TerrainRenderer::render_to_image(&grid, 24).unwrap();
        TerrainRenderer::draw_fleet(&mut img, &fleet, 24);
        let (row, col) = fleet.ships[0].cells[0];
        let corner = img.get_pixel(col as u32 * 24 + 4, row as u32 * 24 + 4);
        assert_eq!(*corner, SHIP_OUTLINE);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let grid = TerrainGrid::reference();
        assert!(matches!(
            TerrainRenderer::render_to_image(&grid, u32::MAX),
            Err(TerrainError::InvalidArgument(_))
        ));
        assert!(image_side(usize::MAX, 1).is_err());
        assert!(image_side(100_000, 60).is_err());
        assert_eq!(image_side(6, 60).unwrap(), 360);
        assert_eq!(image_side(1, MAX_IMAGE_SIDE).unwrap(), MAX_IMAGE_SIDE);
    }

    #[test]
    fn test_overlays_skip_cells_outside_image() {
        let mut img = TerrainRenderer::render_to_image(&TerrainGrid::reference(), 10).unwrap();
        let before = img.clone();
        let fleet = place_fleet(&TerrainGrid::reference(), &default_fleet(), 1).unwrap();
        TerrainRenderer::draw_fleet(&mut img, &fleet, u32::MAX);
        assert_eq!(img, before);
    }

    #[test]
    fn test_moves_marked() {
        let grid = TerrainGrid::reference();
        let fleet = place_fleet(&grid, &default_fleet(), 1).unwrap();
        let moves = reveal_moves(&grid, &fleet, 1).unwrap();
        let mut img = TerrainRenderer::render_to_image(&grid, 30).unwrap();
        TerrainRenderer::draw_moves(&mut img, &moves, 30);
        for shot in &moves {
            let centre = img.get_pixel(shot.col as u32 * 30 + 15, shot.row as u32 * 30 + 15);
            assert_eq!(*centre, if shot.hit { HIT_MARK } else { MISS_MARK });
        }
    }

    #[test]
    fn test_ascii_rows() {
        let grid = TerrainGrid::reference();
        let plain = TerrainRenderer::render_ascii(&grid, false);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "≈≈≈~,,");
        assert!(TerrainRenderer::render_ascii(&grid, true).contains("\x1b[34m≈"));
    }

    #[test]
    fn test_legend_lists_every_category() {
        let legend = TerrainRenderer::legend(false);
        for kind in TerrainType::ALL {
            assert!(legend.contains(kind.display_name()));
        }
    }

    #[test]
    fn test_load_font_rejects_garbage() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"definitely not a font").unwrap();
        assert!(matches!(load_font(file.path()), Err(TerrainError::Font(_))));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        let img = TerrainRenderer::render_to_image(&TerrainGrid::reference(), 10).unwrap();
        save_png(&img, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (60, 60));
    }
}
