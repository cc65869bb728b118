#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Directional cover derived from the terrain around a cell.
//!
//! Each cardinal side of a cell takes its cover from the neighbouring tile on
//! that side: walls give full cover, crates give half cover. Only the side
//! facing the shooter protects the target.

use squad_tactics_core::{CellCoord, CoverLevel, Direction, Terrain, TerrainView};

/// Cover on each cardinal side of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoverProfile {
    /// Cover toward decreasing rows.
    pub north: CoverLevel,
    /// Cover toward increasing columns.
    pub east: CoverLevel,
    /// Cover toward increasing rows.
    pub south: CoverLevel,
    /// Cover toward decreasing columns.
    pub west: CoverLevel,
}

impl CoverProfile {
    /// Cover on the provided side.
    #[must_use]
    pub const fn side(&self, direction: Direction) -> CoverLevel {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Strongest cover on any side.
    #[must_use]
    pub fn best(&self) -> CoverLevel {
        Direction::ALL
            .into_iter()
            .map(|direction| self.side(direction))
            .max()
            .unwrap_or(CoverLevel::None)
    }
}

/// Cover the neighbour on `side` of `cell` provides.
///
/// Sides that fall off the grid provide no cover.
#[must_use]
pub fn cover_at(terrain: TerrainView<'_>, cell: CellCoord, side: Direction) -> CoverLevel {
    let Some(neighbor) = cell.step(side, terrain.bounds()) else {
        return CoverLevel::None;
    };
    match terrain.terrain(neighbor) {
        Some(Terrain::Wall) => CoverLevel::Full,
        Some(Terrain::Crate) => CoverLevel::Half,
        Some(Terrain::Open) | None => CoverLevel::None,
    }
}

/// Cover on all four sides of `cell`.
#[must_use]
pub fn cover_profile(terrain: TerrainView<'_>, cell: CellCoord) -> CoverProfile {
    CoverProfile {
        north: cover_at(terrain, cell, Direction::North),
        east: cover_at(terrain, cell, Direction::East),
        south: cover_at(terrain, cell, Direction::South),
        west: cover_at(terrain, cell, Direction::West),
    }
}

/// Side of `target` that faces `shooter`.
///
/// The dominant axis of the offset decides the side, with ties going to the
/// horizontal axis. A shooter on the target's own cell faces west.
#[must_use]
pub fn facing_side(target: CellCoord, shooter: CellCoord) -> Direction {
    let dx = i64::from(shooter.column()) - i64::from(target.column());
    let dy = i64::from(shooter.row()) - i64::from(target.row());
    if dx.abs() >= dy.abs() {
        if dx > 0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if dy > 0 {
        Direction::South
    } else {
        Direction::North
    }
}

/// Cover protecting `target` against fire from `shooter`.
#[must_use]
pub fn facing_cover(terrain: TerrainView<'_>, shooter: CellCoord, target: CellCoord) -> CoverLevel {
    cover_at(terrain, target, facing_side(target, shooter))
}

/// Reports whether `target` has no cover against `shooter`.
#[must_use]
pub fn is_flanked(terrain: TerrainView<'_>, shooter: CellCoord, target: CellCoord) -> bool {
    facing_cover(terrain, shooter, target) == CoverLevel::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_tactics_core::GridBounds;

    fn grid(columns: u32, rows: u32, props: &[(CellCoord, Terrain)]) -> Vec<Terrain> {
        let bounds = GridBounds::new(columns, rows);
        let mut cells = vec![Terrain::Open; bounds.cell_count()];
        for (cell, terrain) in props {
            if let Some(index) = bounds.index(*cell) {
                cells[index] = *terrain;
            }
        }
        cells
    }

    #[test]
    fn wall_north_protects_only_against_northern_fire() {
        let bounds = GridBounds::new(9, 9);
        let target = CellCoord::new(4, 4);
        let cells = grid(9, 9, &[(CellCoord::new(4, 3), Terrain::Wall)]);
        let terrain = TerrainView::new(&cells, bounds);

        assert_eq!(cover_at(terrain, target, Direction::North), CoverLevel::Full);
        assert!(!is_flanked(terrain, CellCoord::new(4, 0), target));
        assert!(is_flanked(terrain, CellCoord::new(4, 8), target));
        assert!(is_flanked(terrain, CellCoord::new(0, 4), target));
    }

    #[test]
    fn crate_gives_half_cover() {
        let bounds = GridBounds::new(5, 5);
        let target = CellCoord::new(2, 2);
        let cells = grid(5, 5, &[(CellCoord::new(3, 2), Terrain::Crate)]);
        let terrain = TerrainView::new(&cells, bounds);

        assert_eq!(facing_cover(terrain, CellCoord::new(4, 1), target), CoverLevel::Half);
        assert_eq!(
            cover_profile(terrain, target),
            CoverProfile {
                north: CoverLevel::None,
                east: CoverLevel::Half,
                south: CoverLevel::None,
                west: CoverLevel::None,
            }
        );
        assert_eq!(cover_profile(terrain, target).best(), CoverLevel::Half);
    }

    #[test]
    fn grid_edge_offers_no_cover() {
        let bounds = GridBounds::new(3, 3);
        let cells = grid(3, 3, &[]);
        let terrain = TerrainView::new(&cells, bounds);

        assert_eq!(
            cover_at(terrain, CellCoord::new(0, 0), Direction::West),
            CoverLevel::None
        );
    }

    #[test]
    fn diagonal_ties_use_horizontal_axis() {
        let target = CellCoord::new(5, 5);
        assert_eq!(facing_side(target, CellCoord::new(7, 3)), Direction::East);
        assert_eq!(facing_side(target, CellCoord::new(3, 7)), Direction::West);
        assert_eq!(facing_side(target, CellCoord::new(6, 9)), Direction::South);
        assert_eq!(facing_side(target, CellCoord::new(5, 1)), Direction::North);
        assert_eq!(facing_side(target, target), Direction::West);
    }
}
