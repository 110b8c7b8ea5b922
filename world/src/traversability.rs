//! Derived traversability grid rebuilt from the authoritative cells.

use outpost_core::Cell;

/// Dense boolean cache of the resource-boundary rule, one flag per cell.
///
/// The buffer is allocated on the first rebuild and overwritten in place by
/// every later rebuild; it is never resized because the owning map's
/// dimensions are fixed.
#[derive(Clone, Debug, Default)]
pub(crate) struct TraversabilityGrid {
    cells: Option<Vec<bool>>,
}

impl TraversabilityGrid {
    /// Rewrites every flag from the provided cell buffer in row-major order.
    pub(crate) fn rebuild_from(&mut self, cells: &[Cell]) {
        let flags = self
            .cells
            .get_or_insert_with(|| vec![false; cells.len()]);
        for (flag, cell) in flags.iter_mut().zip(cells) {
            *flag = cell.kind.is_resource();
        }
    }

    /// Row-major flags, or `None` before the first rebuild.
    pub(crate) fn as_slice(&self) -> Option<&[bool]> {
        self.cells.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::TraversabilityGrid;
    use outpost_core::{Cell, CellType};

    fn cell(kind: CellType) -> Cell {
        Cell {
            kind,
            height: 0,
            selected: false,
        }
    }

    #[test]
    fn grid_is_absent_before_first_rebuild() {
        let grid = TraversabilityGrid::default();
        assert!(grid.as_slice().is_none());
    }

    #[test]
    fn rebuild_mirrors_the_resource_boundary() {
        let cells = [
            cell(CellType::Grass),
            cell(CellType::Wood),
            cell(CellType::Water),
            cell(CellType::Gold),
        ];

        let mut grid = TraversabilityGrid::default();
        grid.rebuild_from(&cells);

        assert_eq!(grid.as_slice(), Some(&[false, true, false, true][..]));
    }

    #[test]
    fn rebuild_overwrites_the_existing_buffer() {
        let mut grid = TraversabilityGrid::default();
        grid.rebuild_from(&[cell(CellType::Wood), cell(CellType::Wood)]);
        grid.rebuild_from(&[cell(CellType::Grass), cell(CellType::Wood)]);

        assert_eq!(grid.as_slice(), Some(&[false, true][..]));
    }
}
