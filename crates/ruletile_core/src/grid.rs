//! Rectangular tile grid

use log::warn;
use thiserror::Error;

use crate::{IdRemap, Tile, TileId, TileRegistry, Vector2};

/// Errors from grid construction and cell access.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfRange {
        col: i32,
        row: i32,
        width: i32,
        height: i32,
    },
    #[error("expected {expected} cells for a {width}x{height} grid, got {actual}")]
    CellCountMismatch {
        expected: usize,
        actual: usize,
        width: i32,
        height: i32,
    },
    #[error("cell {index} references unknown tile id {id}")]
    UnknownTile { index: usize, id: TileId },
}

/// A fixed-size map of tile references.
///
/// Cells are stored flat in row-major order (`row * width + col`) and
/// hold plain [`TileId`]s resolved through a [`TileRegistry`] at each
/// use. Every access is bounds-checked; out-of-range coordinates are a
/// typed error, never an adjacent read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    map_size: Vector2,
    tile_render_size: Vector2,
    cells: Vec<Option<TileId>>,
}

impl TileGrid {
    /// Create an empty grid. Dimensions must be positive.
    pub fn new(map_size: Vector2, tile_render_size: Vector2) -> Result<Self, GridError> {
        if map_size.x < 1 || map_size.y < 1 {
            return Err(GridError::InvalidSize {
                width: map_size.x,
                height: map_size.y,
            });
        }
        Ok(Self {
            map_size,
            tile_render_size,
            cells: vec![None; (map_size.x * map_size.y) as usize],
        })
    }

    /// Build a grid from raw cell ids, resolving each one through the
    /// registry. Unknown ids fail construction.
    pub fn from_cells(
        map_size: Vector2,
        tile_render_size: Vector2,
        cells: Vec<Option<TileId>>,
        registry: &TileRegistry,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(map_size, tile_render_size)?;
        if cells.len() != grid.cells.len() {
            return Err(GridError::CellCountMismatch {
                expected: grid.cells.len(),
                actual: cells.len(),
                width: map_size.x,
                height: map_size.y,
            });
        }
        for (index, cell) in cells.iter().enumerate() {
            if let Some(id) = cell {
                if registry.get_tile(*id).is_none() {
                    return Err(GridError::UnknownTile { index, id: *id });
                }
            }
        }
        grid.cells = cells;
        Ok(grid)
    }

    pub fn map_size(&self) -> Vector2 {
        self.map_size
    }

    /// On-screen size of one cell, in pixels.
    pub fn tile_render_size(&self) -> Vector2 {
        self.tile_render_size
    }

    pub fn cells(&self) -> &[Option<TileId>] {
        &self.cells
    }

    fn index(&self, col: i32, row: i32) -> Result<usize, GridError> {
        if col < 0 || row < 0 || col >= self.map_size.x || row >= self.map_size.y {
            return Err(GridError::OutOfRange {
                col,
                row,
                width: self.map_size.x,
                height: self.map_size.y,
            });
        }
        Ok((row * self.map_size.x + col) as usize)
    }

    /// Tile id occupying a cell, `None` when empty.
    pub fn cell(&self, col: i32, row: i32) -> Result<Option<TileId>, GridError> {
        Ok(self.cells[self.index(col, row)?])
    }

    pub fn set_cell(
        &mut self,
        col: i32,
        row: i32,
        tile: Option<TileId>,
    ) -> Result<(), GridError> {
        let index = self.index(col, row)?;
        self.cells[index] = tile;
        Ok(())
    }

    /// Resolve the tile occupying a cell through the registry.
    /// Empty cells and ids the registry no longer knows both come back
    /// as `None`; rendering distinguishes the latter via [`cell`](Self::cell).
    pub fn tile_at<'r>(
        &self,
        col: i32,
        row: i32,
        registry: &'r TileRegistry,
    ) -> Result<Option<&'r Tile>, GridError> {
        Ok(self.cell(col, row)?.and_then(|id| registry.get_tile(id)))
    }

    /// Clear every cell. Dimensions are unchanged.
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    /// Apply a renumbering pass's id assignments to every cell.
    /// References to tiles that no longer exist are cleared.
    pub fn remap(&mut self, remap: &IdRemap) {
        let width = self.map_size.x;
        for (index, cell) in self.cells.iter_mut().enumerate() {
            if let Some(old) = *cell {
                *cell = match remap.get(old) {
                    Some(new) => Some(new),
                    None => {
                        warn!(
                            "clearing cell ({}, {}): tile {old} no longer exists",
                            index as i32 % width,
                            index as i32 / width
                        );
                        None
                    }
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SlicingSettings, SpriteAtlas};

    fn small_registry() -> TileRegistry {
        let mut atlas = SpriteAtlas::new("ground", "ground.png", SlicingSettings::default());
        atlas.mark_loaded(Vector2::new(32, 32));
        let mut registry = TileRegistry::new();
        registry.set_atlases(vec![atlas]).unwrap();
        registry
    }

    #[test]
    fn test_new_rejects_degenerate_sizes() {
        assert!(matches!(
            TileGrid::new(Vector2::new(0, 4), Vector2::new(16, 16)),
            Err(GridError::InvalidSize { .. })
        ));
        assert!(matches!(
            TileGrid::new(Vector2::new(4, -1), Vector2::new(16, 16)),
            Err(GridError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_cell_roundtrip_and_reset() {
        let mut grid = TileGrid::new(Vector2::new(4, 3), Vector2::new(16, 16)).unwrap();
        assert_eq!(grid.cell(2, 1).unwrap(), None);

        grid.set_cell(2, 1, Some(7)).unwrap();
        assert_eq!(grid.cell(2, 1).unwrap(), Some(7));
        assert_eq!(grid.cells()[6], Some(7));

        grid.reset();
        assert_eq!(grid.cell(2, 1).unwrap(), None);
        assert_eq!(grid.map_size(), Vector2::new(4, 3));
    }

    #[test]
    fn test_out_of_range_access_is_an_error() {
        let mut grid = TileGrid::new(Vector2::new(4, 3), Vector2::new(16, 16)).unwrap();
        assert!(matches!(
            grid.cell(4, 0),
            Err(GridError::OutOfRange { col: 4, row: 0, .. })
        ));
        assert!(matches!(grid.cell(0, 3), Err(GridError::OutOfRange { .. })));
        assert!(matches!(grid.cell(-1, 0), Err(GridError::OutOfRange { .. })));
        assert!(matches!(
            grid.set_cell(0, -2, Some(1)),
            Err(GridError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_from_cells_validates_length() {
        let registry = small_registry();
        let result = TileGrid::from_cells(
            Vector2::new(2, 2),
            Vector2::new(16, 16),
            vec![None; 3],
            &registry,
        );
        assert!(matches!(
            result,
            Err(GridError::CellCountMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_from_cells_validates_ids() {
        let registry = small_registry();
        let result = TileGrid::from_cells(
            Vector2::new(2, 2),
            Vector2::new(16, 16),
            vec![Some(1), None, Some(99), None],
            &registry,
        );
        assert!(matches!(
            result,
            Err(GridError::UnknownTile { index: 2, id: 99 })
        ));

        let grid = TileGrid::from_cells(
            Vector2::new(2, 2),
            Vector2::new(16, 16),
            vec![Some(1), None, Some(4), None],
            &registry,
        )
        .unwrap();
        assert_eq!(grid.cell(0, 1).unwrap(), Some(4));
    }

    #[test]
    fn test_tile_at_resolves_through_registry() {
        let registry = small_registry();
        let mut grid = TileGrid::new(Vector2::new(2, 2), Vector2::new(16, 16)).unwrap();
        grid.set_cell(1, 0, Some(2)).unwrap();

        let tile = grid.tile_at(1, 0, &registry).unwrap().unwrap();
        assert_eq!(tile.id(), 2);
        assert!(grid.tile_at(0, 0, &registry).unwrap().is_none());
    }

    #[test]
    fn test_remap_rewrites_and_clears_cells() {
        let mut registry = small_registry();
        let mut grid = TileGrid::new(Vector2::new(2, 1), Vector2::new(16, 16)).unwrap();
        grid.set_cell(0, 0, Some(4)).unwrap();
        grid.set_cell(1, 0, Some(2)).unwrap();

        // Shrink the atlas image: 32x32 -> 32x16 leaves slots 0 and 1.
        let mut smaller = SpriteAtlas::new("ground", "ground.png", SlicingSettings::default());
        smaller.mark_loaded(Vector2::new(32, 16));
        let remap = registry.set_atlases(vec![smaller]).unwrap();

        grid.remap(&remap);
        assert_eq!(grid.cell(0, 0).unwrap(), None, "slot 3 vanished");
        assert_eq!(grid.cell(1, 0).unwrap(), Some(2), "slot 1 kept its id");
    }
}
