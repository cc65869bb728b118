//! Static battlefield terrain.

use squad_tactics_core::{CellCoord, GridBounds, Layout, OrderError, Terrain, TerrainView};

/// Dense row-major terrain grid.
///
/// Walls and crates are stored in the same slot, so a cell can never hold
/// both.
#[derive(Clone, Debug)]
pub struct GridMap {
    bounds: GridBounds,
    cells: Vec<Terrain>,
}

impl GridMap {
    /// Creates an open grid of the provided size.
    #[must_use]
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            cells: vec![Terrain::Open; bounds.cell_count()],
        }
    }

    /// Builds the terrain described by a layout. Walls win over crates.
    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        let mut grid = Self::new(layout.bounds());
        for cell in &layout.crates {
            grid.set(*cell, Terrain::Crate);
        }
        for cell in &layout.walls {
            grid.set(*cell, Terrain::Wall);
        }
        grid
    }

    fn set(&mut self, cell: CellCoord, terrain: Terrain) {
        if let Some(slot) = self
            .bounds
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
        {
            *slot = terrain;
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Reports whether the cell lies on the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        self.bounds.contains(cell)
    }

    /// Reports whether the cell can be walked on.
    #[must_use]
    pub fn passable(&self, cell: CellCoord) -> bool {
        self.view().passable(cell)
    }

    /// Terrain stored for the cell.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<Terrain> {
        self.view().terrain(cell)
    }

    /// Borrowed view for systems.
    #[must_use]
    pub fn view(&self) -> TerrainView<'_> {
        TerrainView::new(&self.cells, self.bounds)
    }

    /// Flips wall membership of a cell, evicting any crate under a new wall.
    pub fn toggle_block(&mut self, cell: CellCoord) -> Result<Terrain, OrderError> {
        let current = self.terrain(cell).ok_or(OrderError::OutOfBounds)?;
        let next = match current {
            Terrain::Wall => Terrain::Open,
            Terrain::Open | Terrain::Crate => Terrain::Wall,
        };
        self.set(cell, next);
        Ok(next)
    }

    /// Flips crate membership of a cell. Walls refuse crates.
    pub fn toggle_crate(&mut self, cell: CellCoord) -> Result<Terrain, OrderError> {
        let next = match self.terrain(cell).ok_or(OrderError::OutOfBounds)? {
            Terrain::Wall => return Err(OrderError::Occupied),
            Terrain::Crate => Terrain::Open,
            Terrain::Open => Terrain::Crate,
        };
        self.set(cell, next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_evicts_crate_and_crate_refuses_wall() {
        let mut grid = GridMap::new(GridBounds::new(4, 4));
        let cell = CellCoord::new(1, 2);

        assert_eq!(grid.toggle_crate(cell), Ok(Terrain::Crate));
        assert!(grid.passable(cell));
        assert_eq!(grid.toggle_block(cell), Ok(Terrain::Wall));
        assert!(!grid.passable(cell));
        assert_eq!(grid.toggle_crate(cell), Err(OrderError::Occupied));
        assert_eq!(grid.toggle_block(cell), Ok(Terrain::Open));
        assert_eq!(grid.terrain(cell), Some(Terrain::Open));
    }

    #[test]
    fn out_of_bounds_toggles_change_nothing() {
        let mut grid = GridMap::new(GridBounds::new(2, 2));
        let outside = CellCoord::new(2, 0);

        assert_eq!(grid.toggle_block(outside), Err(OrderError::OutOfBounds));
        assert_eq!(grid.toggle_crate(outside), Err(OrderError::OutOfBounds));
        assert!(!grid.in_bounds(outside));
        assert!(!grid.passable(outside));
        assert_eq!(grid.view().walls().count(), 0);
    }

    #[test]
    fn demo_layout_has_no_crate_under_a_wall() {
        let layout = Layout::default();
        let grid = GridMap::from_layout(&layout);

        assert_eq!(grid.bounds(), GridBounds::new(20, 20));
        assert!(!grid.passable(CellCoord::new(10, 6)));
        assert!(!grid.passable(CellCoord::new(10, 13)));
        assert!(grid.passable(CellCoord::new(10, 14)));
        assert_eq!(grid.terrain(CellCoord::new(6, 8)), Some(Terrain::Crate));
        assert_eq!(grid.view().walls().count(), 11);
        assert_eq!(grid.view().crates().count(), 2);
    }
}
