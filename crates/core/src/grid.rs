//! Frozen grid - the settled cells of the playing field
//!
//! The grid is a 10x20 field where each cell is either empty or holds the color
//! of a block that has locked there. It knows nothing about the active piece.
//! Uses a flat array for cache locality and zero-allocation row compaction.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the grid
const GRID_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row indices removed by a single clear, ascending.
///
/// A lock completes at most 4 rows, but hand-built grids may hold more.
pub type ClearedRows = ArrayVec<u8, HEIGHT>;

/// One row of the grid, left to right.
pub type GridRow = [Cell; WIDTH];

/// Read-only copy of the grid handed to observers.
///
/// Rows are ordered top to bottom (`rows[0]` is the spawn row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSnapshot {
    pub rows: [GridRow; HEIGHT],
}

impl GridSnapshot {
    pub fn empty() -> Self {
        Self {
            rows: [[None; WIDTH]; HEIGHT],
        }
    }

    /// Cell at (x, y), `None` when out of bounds or empty.
    pub fn cell(&self, x: i8, y: i8) -> Cell {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .flatten()
    }

    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }
}

impl Default for GridSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// The settled field - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenGrid {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; GRID_SIZE],
}

impl FrozenGrid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid for a block (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled).
    /// Out-of-bounds queries answer false.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Check whether every cell of `piece` is in bounds and empty.
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.cells().iter().all(|&(x, y)| self.is_valid(x, y))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Write `piece` into the grid using its kind's color.
    ///
    /// # Panics
    ///
    /// The caller must have checked [`FrozenGrid::fits`] first; locking a piece
    /// that leaves the field or overlaps settled blocks panics.
    pub fn lock(&mut self, piece: &Piece) {
        assert!(
            self.fits(piece),
            "lock of a piece that does not fit: {:?} at {:?}",
            piece,
            piece.cells()
        );

        let color = piece.color();
        for (x, y) in piece.cells() {
            self.set(x, y, Some(color));
        }
    }

    /// Clear all full rows and return their indices (ascending)
    ///
    /// Full rows are dropped in one pass: a read cursor walks up from the floor
    /// and a write cursor trails it over the surviving rows, so indices never
    /// shift mid-scan. Rows freed at the top are emptied.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y as u8);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * WIDTH;
                    self.cells
                        .copy_within(src_start..src_start + WIDTH, write_y * WIDTH);
                }
            }
        }

        self.cells[..write_y * WIDTH].fill(None);

        cleared.reverse();
        cleared
    }

    /// Number of filled cells on the whole grid
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Copy the grid into an observer-facing snapshot.
    pub fn snapshot(&self) -> GridSnapshot {
        let mut snap = GridSnapshot::empty();
        self.write_snapshot(&mut snap);
        snap
    }

    /// Copy the grid into an existing snapshot without allocating.
    pub fn write_snapshot(&self, out: &mut GridSnapshot) {
        for (dst, src) in out.rows.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for FrozenGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn test_grid_index_calculation() {
        assert_eq!(FrozenGrid::index(0, 0), Some(0));
        assert_eq!(FrozenGrid::index(9, 0), Some(9));
        assert_eq!(FrozenGrid::index(0, 1), Some(10));
        assert_eq!(FrozenGrid::index(9, 19), Some(199));
        assert_eq!(FrozenGrid::index(-1, 0), None);
        assert_eq!(FrozenGrid::index(10, 0), None);
        assert_eq!(FrozenGrid::index(0, 20), None);
    }

    #[test]
    fn test_grid_flat_array() {
        let mut grid = FrozenGrid::new();

        grid.set(0, 0, Some(Color::Cyan));
        grid.set(5, 10, Some(Color::Purple));

        assert_eq!(grid.cells[0], Some(Color::Cyan));
        assert_eq!(grid.cells[10 * 10 + 5], Some(Color::Purple));
    }

    #[test]
    fn test_snapshot_matches_rows() {
        let mut grid = FrozenGrid::new();
        grid.set(3, 5, Some(Color::Yellow));
        grid.set(7, 19, Some(Color::Orange));

        let snap = grid.snapshot();

        assert_eq!(snap.rows[5][3], Some(Color::Yellow));
        assert_eq!(snap.rows[19][7], Some(Color::Orange));
        assert_eq!(snap.cell(3, 5), Some(Color::Yellow));
        assert_eq!(snap.cell(-1, 5), None);
        assert_eq!(snap.occupied_count(), 2);
    }

    #[test]
    fn test_clear_with_more_than_four_full_rows() {
        let mut grid = FrozenGrid::new();
        for y in 14..20 {
            for x in 0..10 {
                grid.set(x, y, Some(Color::Red));
            }
        }
        grid.set(0, 13, Some(Color::Blue));

        let cleared = grid.clear_full_rows();

        assert_eq!(cleared.as_slice(), &[14, 15, 16, 17, 18, 19]);
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.get(0, 19), Some(Some(Color::Blue)));
    }
}
