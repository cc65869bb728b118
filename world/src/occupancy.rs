//! Dynamic occupancy of grid cells by units and enemies.

use squad_tactics_core::{CellCoord, GridBounds, Occupant, OccupancyView};

#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    bounds: GridBounds,
    cells: Vec<Option<Occupant>>,
}

impl OccupancyGrid {
    pub(crate) fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            cells: vec![None; bounds.cell_count()],
        }
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.view().occupant(cell)
    }

    pub(crate) fn is_free(&self, cell: CellCoord) -> bool {
        self.bounds.contains(cell) && self.occupant(cell).is_none()
    }

    pub(crate) fn occupy(&mut self, cell: CellCoord, occupant: Occupant) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = Some(occupant);
        }
    }

    /// Clears the cell only while `occupant` still holds it.
    pub(crate) fn vacate(&mut self, cell: CellCoord, occupant: Occupant) {
        if let Some(slot) = self.slot_mut(cell) {
            if *slot == Some(occupant) {
                *slot = None;
            }
        }
    }

    pub(crate) fn view(&self) -> OccupancyView<'_> {
        OccupancyView::new(&self.cells, self.bounds)
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Option<Occupant>> {
        let index = self.bounds.index(cell)?;
        self.cells.get_mut(index)
    }
}
