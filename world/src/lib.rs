#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world map for Outpost.
//!
//! The [`Map`] owns two co-indexed dense buffers: the rich per-cell state
//! and a lazily allocated boolean traversability grid derived from it. Cell
//! writes require `&mut Map`, so the compiler serializes all cell mutation;
//! the derived grid sits behind a read-write lock so rebuilds and readers
//! never observe each other partially.

mod traversability;

use std::sync::{RwLock, RwLockReadGuard};

use outpost_core::{Cell, CellCoord, CellType, MapError, ObstacleMask, TraversabilityView};
use outpost_system_terrain::{classify, NoiseSource, RandomStream};

use crate::traversability::TraversabilityGrid;

/// Authoritative fixed-size grid of terrain and resource cells.
#[derive(Debug)]
pub struct Map {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    traversable: RwLock<TraversabilityGrid>,
}

impl Map {
    /// Creates a map with the provided dimensions, every cell initialized
    /// to open grass.
    ///
    /// Dimensions are fixed for the lifetime of the map. Fails with
    /// [`MapError::Allocation`] when either dimension is zero or the cell
    /// count overflows the address space; no partial map is observable on
    /// failure.
    pub fn new(width: u32, height: u32) -> Result<Self, MapError> {
        let cell_count =
            cell_count(width, height).ok_or(MapError::Allocation { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); cell_count],
            traversable: RwLock::new(TraversabilityGrid::default()),
        })
    }

    /// Width of the map in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the map in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the cell stored at the provided coordinates.
    pub fn cell(&self, x: u32, y: u32) -> Result<Cell, MapError> {
        let index = self.index(x, y)?;
        Ok(self.cells[index])
    }

    /// Replaces the cell stored at the provided coordinates.
    ///
    /// The derived traversability grid is not updated; callers performing a
    /// bulk edit must request a rebuild before the next pathfinding query.
    pub fn set_cell(&mut self, x: u32, y: u32, cell: Cell) -> Result<(), MapError> {
        let index = self.index(x, y)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Row-major read view of every cell.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Regenerates terrain and resources across the whole map.
    ///
    /// Cells are visited in row-major order with x fastest-varying; each is
    /// classified from its noise sample and rewritten in place. Selection
    /// flags are left untouched. Callers must rebuild the traversability
    /// grid once afterwards, not per cell.
    pub fn generate(&mut self, noise: &impl NoiseSource, rolls: &mut impl RandomStream) {
        let mut x = 0u32;
        let mut y = 0u32;
        for cell in &mut self.cells {
            let (kind, height) = classify(noise.height(x, y), rolls);
            cell.kind = kind;
            cell.height = height;

            x += 1;
            if x == self.width {
                x = 0;
                y += 1;
            }
        }
    }

    /// Rebuilds the derived traversability grid from the current cells.
    ///
    /// Holds the write half of the internal lock for the entire scan; the
    /// grid is allocated on the first rebuild and overwritten in place by
    /// every later one. Indexed cell mutation never triggers this
    /// automatically.
    pub fn rebuild_traversability(&self) {
        // A rebuild rewrites the full grid, so state behind a poisoned lock
        // is still safe to reuse.
        let mut grid = match self.traversable.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        grid.rebuild_from(&self.cells);
    }

    /// Captures a read-locked handle over the derived traversability grid.
    ///
    /// The handle's lifetime bounds every view taken from it, so a reader
    /// that spans its whole read through one handle can never observe a
    /// concurrent rebuild mid-scan.
    #[must_use]
    pub fn traversability(&self) -> TraversabilityRef<'_> {
        let guard = match self.traversable.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        TraversabilityRef {
            guard,
            width: self.width,
            height: self.height,
        }
    }

    /// Seeds the map from an obstacle mask loaded from level data.
    ///
    /// Marked cells become wood resources and open cells become grass;
    /// heights and selection flags are left untouched. Fails with
    /// [`MapError::MaskMismatch`] before touching any cell when the mask
    /// dimensions differ from the map's. Callers must rebuild the
    /// traversability grid afterwards.
    pub fn apply_obstacle_mask(&mut self, mask: &ObstacleMask) -> Result<(), MapError> {
        if mask.width() != self.width || mask.height() != self.height {
            return Err(MapError::MaskMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                width: self.width,
                height: self.height,
            });
        }

        for (cell, &marked) in self.cells.iter_mut().zip(mask.cells()) {
            cell.kind = if marked {
                CellType::Wood
            } else {
                CellType::Grass
            };
        }
        Ok(())
    }

    /// Marks every cell along the provided path as selected.
    ///
    /// The whole path is validated up front, so a failing coordinate leaves
    /// no partial marking behind.
    pub fn mark_path(&mut self, path: &[CellCoord]) -> Result<(), MapError> {
        let mut indices = Vec::with_capacity(path.len());
        for cell in path {
            indices.push(self.index(cell.x(), cell.y())?);
        }
        for index in indices {
            self.cells[index].selected = true;
        }
        Ok(())
    }

    /// Clears the selection flag on every cell.
    pub fn clear_selection(&mut self) {
        for cell in &mut self.cells {
            cell.selected = false;
        }
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, MapError> {
        let out_of_range = MapError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        if x >= self.width || y >= self.height {
            return Err(out_of_range);
        }
        let row = usize::try_from(y).map_err(|_| out_of_range)?;
        let column = usize::try_from(x).map_err(|_| out_of_range)?;
        let width = usize::try_from(self.width).map_err(|_| out_of_range)?;
        Ok(row * width + column)
    }
}

/// Read-locked handle over the map's derived traversability grid.
#[derive(Debug)]
pub struct TraversabilityRef<'a> {
    guard: RwLockReadGuard<'a, TraversabilityGrid>,
    width: u32,
    height: u32,
}

impl TraversabilityRef<'_> {
    /// Reports whether the derived grid has been built at least once.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.guard.as_slice().is_some()
    }

    /// Borrowed view over the derived grid, or `None` before the first
    /// rebuild.
    ///
    /// The view cannot outlive this handle, so a pathfinding call receiving
    /// it cannot retain the grid past the read.
    #[must_use]
    pub fn view(&self) -> Option<TraversabilityView<'_>> {
        self.guard
            .as_slice()
            .map(|cells| TraversabilityView::new(cells, self.width, self.height))
    }
}

fn cell_count(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)
}

/// Query functions that provide read-only access to the map state.
pub mod query {
    use outpost_core::{CellCoord, CellType};

    use super::Map;

    /// Per-kind cell totals captured from a full map scan.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CellCensus {
        /// Number of grass cells.
        pub grass: usize,
        /// Number of water cells.
        pub water: usize,
        /// Number of wood resource cells.
        pub wood: usize,
        /// Number of gold resource cells.
        pub gold: usize,
        /// Number of stone resource cells.
        pub stone: usize,
        /// Number of food resource cells.
        pub food: usize,
    }

    impl CellCensus {
        /// Total number of resource cells.
        #[must_use]
        pub const fn resources(&self) -> usize {
            self.wood + self.gold + self.stone + self.food
        }
    }

    /// Tallies every cell kind across the map.
    #[must_use]
    pub fn census(map: &Map) -> CellCensus {
        let mut census = CellCensus::default();
        for cell in map.cells() {
            match cell.kind {
                CellType::Grass => census.grass += 1,
                CellType::Water => census.water += 1,
                CellType::Wood => census.wood += 1,
                CellType::Gold => census.gold += 1,
                CellType::Stone => census.stone += 1,
                CellType::Food => census.food += 1,
            }
        }
        census
    }

    /// Collects the coordinates of every selected cell in row-major order.
    #[must_use]
    pub fn selected_cells(map: &Map) -> Vec<CellCoord> {
        let mut selected = Vec::new();
        let mut x = 0u32;
        let mut y = 0u32;
        for cell in map.cells() {
            if cell.selected {
                selected.push(CellCoord::new(x, y));
            }
            x += 1;
            if x == map.width() {
                x = 0;
                y += 1;
            }
        }
        selected
    }
}
