#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Outpost world grid.
//!
//! This crate defines the vocabulary that connects the authoritative map,
//! the terrain generation system, and external collaborators. The map owns
//! dense per-cell state and a derived traversability grid; pathfinding
//! implementations receive a borrowed [`TraversabilityView`] scoped to a
//! single search call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of terrain or resource occupying a single map cell.
///
/// The numeric ordering is load-bearing: every terrain variant sits strictly
/// below [`CellType::RESOURCE_BOUNDARY`] and every resource variant sits at
/// or above it. [`CellType::is_resource`] is defined solely through that
/// constant, so variants must not be reordered without moving the boundary.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum CellType {
    /// Open grassland, the default terrain.
    #[default]
    Grass = 0,
    /// Water terrain; the cell height encodes its depth shading.
    Water = 1,
    /// Harvestable wood resource.
    Wood = 2,
    /// Harvestable gold resource.
    Gold = 3,
    /// Harvestable stone resource.
    Stone = 4,
    /// Harvestable food resource.
    Food = 5,
}

impl CellType {
    /// Discriminant separating terrain variants from resource variants.
    ///
    /// Every variant whose discriminant is at or above this value is a
    /// resource. The derived traversability grid is populated directly from
    /// this boundary.
    pub const RESOURCE_BOUNDARY: u8 = CellType::Wood as u8;

    /// Reports whether this cell type is a resource variant.
    #[must_use]
    pub const fn is_resource(self) -> bool {
        self as u8 >= Self::RESOURCE_BOUNDARY
    }
}

/// Terrain, elevation, and selection state of a single map cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Terrain or resource kind occupying the cell.
    pub kind: CellType,
    /// Elevation or intensity sample; its meaning depends on the kind.
    pub height: u8,
    /// Transient query flag marking the cell, e.g. as part of a computed
    /// path. Not part of terrain identity.
    pub selected: bool,
}

/// Location of a single grid cell expressed as x and y coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x().abs_diff(other.x()) + self.y().abs_diff(other.y())
    }
}

/// Dense boolean obstacle mask used to seed a map from external level data.
///
/// Cells are stored in row-major order with x fastest-varying; `true` marks
/// an obstacle that the map materializes as a resource cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl ObstacleMask {
    /// Builds a mask from row-major cells, or `None` when the cell count
    /// does not match the provided dimensions.
    #[must_use]
    pub fn from_cells(width: u32, height: u32, cells: Vec<bool>) -> Option<Self> {
        let expected = usize::try_from(width).ok()?.checked_mul(usize::try_from(height).ok()?)?;
        if cells.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Width of the mask in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the mask in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major mask cells; `true` marks an obstacle.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Reports whether the provided cell is marked as an obstacle.
    ///
    /// Cells outside the mask are reported as open.
    #[must_use]
    pub fn is_marked(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.cells.get(index).copied().unwrap_or(false))
    }

    /// Number of cells marked as obstacles.
    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|&&marked| marked).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() < self.width && cell.y() < self.height {
            let x = usize::try_from(cell.x()).ok()?;
            let y = usize::try_from(cell.y()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(y * width + x)
        } else {
            None
        }
    }
}

/// Read-only view into the map's derived traversability grid.
///
/// The view borrows the dense boolean grid for the duration of a single
/// pathfinding call; `true` marks a resource cell per the map's boundary
/// rule.
#[derive(Clone, Copy, Debug)]
pub struct TraversabilityView<'a> {
    cells: &'a [bool],
    width: u32,
    height: u32,
}

impl<'a> TraversabilityView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [bool], width: u32, height: u32) -> Self {
        Self {
            cells,
            width,
            height,
        }
    }

    /// Reports whether the provided cell holds a resource.
    ///
    /// Cells outside the grid are reported as non-resource.
    #[must_use]
    pub fn is_resource(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.cells.get(index).copied().unwrap_or(false))
    }

    /// Returns the flag stored for the provided cell, if it lies within the
    /// grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<bool> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() < self.width && cell.y() < self.height {
            let x = usize::try_from(cell.x()).ok()?;
            let y = usize::try_from(cell.y()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(y * width + x)
        } else {
            None
        }
    }
}

/// Contract for the pathfinding collaborator consumed by the map's owner.
///
/// Implementations receive the derived traversability grid as a borrowed
/// view scoped to the call and must not retain it. The returned path is
/// ordered from `start` to `end` inclusive, or empty when no path exists.
pub trait PathSearch {
    /// Searches for a path between two cells over the provided grid view.
    fn search(
        &mut self,
        start: CellCoord,
        end: CellCoord,
        traversable: TraversabilityView<'_>,
    ) -> Vec<CellCoord>;
}

/// Failures surfaced by map construction and indexed access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The requested dimensions cannot be backed by a cell buffer.
    #[error("cannot allocate a {width}x{height} cell grid")]
    Allocation {
        /// Requested grid width.
        width: u32,
        /// Requested grid height.
        height: u32,
    },
    /// An indexed access reached beyond the grid bounds.
    #[error("cell ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfRange {
        /// Column of the rejected access.
        x: u32,
        /// Row of the rejected access.
        y: u32,
        /// Width of the grid that rejected the access.
        width: u32,
        /// Height of the grid that rejected the access.
        height: u32,
    },
    /// An obstacle mask with foreign dimensions was applied to the map.
    #[error("mask dimensions {mask_width}x{mask_height} do not match the {width}x{height} grid")]
    MaskMismatch {
        /// Width of the rejected mask.
        mask_width: u32,
        /// Height of the rejected mask.
        mask_height: u32,
        /// Width of the receiving grid.
        width: u32,
        /// Height of the receiving grid.
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cell, CellCoord, CellType, ObstacleMask, TraversabilityView};
    use serde::{de::DeserializeOwned, Serialize};

    const ALL_TYPES: [CellType; 6] = [
        CellType::Grass,
        CellType::Water,
        CellType::Wood,
        CellType::Gold,
        CellType::Stone,
        CellType::Food,
    ];

    #[test]
    fn resource_boundary_splits_terrain_from_resources() {
        for kind in ALL_TYPES {
            let expected = kind as u8 >= CellType::RESOURCE_BOUNDARY;
            assert_eq!(kind.is_resource(), expected, "{kind:?}");
        }
        assert!(!CellType::Grass.is_resource());
        assert!(!CellType::Water.is_resource());
        assert!(CellType::Wood.is_resource());
        assert!(CellType::Food.is_resource());
    }

    #[test]
    fn default_cell_is_open_grass() {
        let cell = Cell::default();
        assert_eq!(cell.kind, CellType::Grass);
        assert_eq!(cell.height, 0);
        assert!(!cell.selected);
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn mask_rejects_mismatched_cell_count() {
        assert!(ObstacleMask::from_cells(3, 2, vec![false; 5]).is_none());
        assert!(ObstacleMask::from_cells(3, 2, vec![false; 6]).is_some());
    }

    #[test]
    fn mask_reports_marked_cells_row_major() {
        let mut cells = vec![false; 6];
        // Mark (2, 1) in the row-major layout of a 3x2 mask.
        cells[5] = true;
        let mask = ObstacleMask::from_cells(3, 2, cells).expect("mask builds");

        assert!(mask.is_marked(CellCoord::new(2, 1)));
        assert!(!mask.is_marked(CellCoord::new(2, 0)));
        assert!(!mask.is_marked(CellCoord::new(3, 0)), "out of bounds is open");
        assert_eq!(mask.marked_count(), 1);
    }

    #[test]
    fn view_indexes_row_major_and_treats_out_of_bounds_as_open() {
        let cells = [false, false, true, false, true, false];
        let view = TraversabilityView::new(&cells, 3, 2);

        assert!(view.is_resource(CellCoord::new(2, 0)));
        assert!(view.is_resource(CellCoord::new(1, 1)));
        assert!(!view.is_resource(CellCoord::new(0, 0)));
        assert!(!view.is_resource(CellCoord::new(0, 2)));
        assert_eq!(view.get(CellCoord::new(0, 2)), None);
        assert_eq!(view.dimensions(), (3, 2));
        assert_eq!(view.iter().filter(|&flag| flag).count(), 2);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_type_round_trips_through_bincode() {
        for kind in ALL_TYPES {
            assert_round_trip(&kind);
        }
    }

    #[test]
    fn cell_round_trips_through_bincode() {
        let cell = Cell {
            kind: CellType::Water,
            height: 18,
            selected: true,
        };
        assert_round_trip(&cell);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(512, 731));
    }
}
