#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Discrete line of sight between grid cells.
//!
//! Lines are rasterized with Bresenham's algorithm. Only walls occlude; the
//! endpoints themselves never block, so a unit standing next to a wall can
//! still see and be seen.

use squad_tactics_core::{CellCoord, TerrainView};

/// Cells visited by a Bresenham line from `from` to `to`, both inclusive.
#[must_use]
pub fn bresenham_line(from: CellCoord, to: CellCoord) -> Vec<CellCoord> {
    let (x0, y0) = (i64::from(from.column()), i64::from(from.row()));
    let (x1, y1) = (i64::from(to.column()), i64::from(to.row()));
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let capacity = usize::try_from(dx - dy + 1).unwrap_or(0);
    let mut cells = Vec::with_capacity(capacity);
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;
    loop {
        // Both coordinates stay between the endpoints, which are valid u32s.
        if let (Ok(column), Ok(row)) = (u32::try_from(x), u32::try_from(y)) {
            cells.push(CellCoord::new(column, row));
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// Reports whether `to` is visible from `from`.
///
/// A rasterized line is clear when no cell strictly between its endpoints is
/// blocked. Bresenham breaks ties at cell corners toward the direction of
/// travel, so the line is traced both ways and sight holds if either trace is
/// clear. The answer is therefore the same for both observers.
pub fn has_los<F>(from: CellCoord, to: CellCoord, mut is_blocked: F) -> bool
where
    F: FnMut(CellCoord) -> bool,
{
    if from == to {
        return true;
    }
    trace_clear(from, to, &mut is_blocked) || trace_clear(to, from, &mut is_blocked)
}

fn trace_clear<F>(from: CellCoord, to: CellCoord, is_blocked: &mut F) -> bool
where
    F: FnMut(CellCoord) -> bool,
{
    let line = bresenham_line(from, to);
    let interior = line.len().saturating_sub(1);
    line.into_iter()
        .take(interior)
        .skip(1)
        .all(|cell| !is_blocked(cell))
}

/// Line of sight across the battlefield, occluded by walls only.
#[must_use]
pub fn visible(terrain: TerrainView<'_>, from: CellCoord, to: CellCoord) -> bool {
    has_los(from, to, |cell| terrain.is_wall(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_tactics_core::{GridBounds, Terrain};

    #[test]
    fn horizontal_line_is_contiguous() {
        let line = bresenham_line(CellCoord::new(1, 0), CellCoord::new(4, 0));
        assert_eq!(
            line,
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(3, 0),
                CellCoord::new(4, 0),
            ]
        );
    }

    #[test]
    fn degenerate_line_contains_single_cell() {
        let cell = CellCoord::new(3, 3);
        assert_eq!(bresenham_line(cell, cell), vec![cell]);
        assert!(has_los(cell, cell, |_| true));
    }

    #[test]
    fn wall_between_endpoints_blocks_sight() {
        let wall = CellCoord::new(2, 0);
        let blocked = |cell: CellCoord| cell == wall;

        assert!(!has_los(CellCoord::new(1, 0), CellCoord::new(3, 0), blocked));
        assert!(has_los(CellCoord::new(1, 1), CellCoord::new(3, 0), blocked));
    }

    #[test]
    fn corner_ties_resolve_in_favour_of_sight() {
        let wall = CellCoord::new(2, 0);
        let forward = bresenham_line(CellCoord::new(1, 1), CellCoord::new(3, 0));
        let backward = bresenham_line(CellCoord::new(3, 0), CellCoord::new(1, 1));

        assert!(forward.contains(&wall));
        assert!(!backward.contains(&wall));
        assert!(has_los(CellCoord::new(3, 0), CellCoord::new(1, 1), |cell| cell == wall));
    }

    #[test]
    fn blocked_endpoints_do_not_occlude() {
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(0, 1);
        assert!(has_los(from, to, |_| true));
    }

    #[test]
    fn crates_never_occlude() {
        let bounds = GridBounds::new(5, 1);
        let mut cells = vec![Terrain::Open; 5];
        cells[2] = Terrain::Crate;
        let terrain = TerrainView::new(&cells, bounds);
        assert!(visible(terrain, CellCoord::new(0, 0), CellCoord::new(4, 0)));

        cells[2] = Terrain::Wall;
        let terrain = TerrainView::new(&cells, bounds);
        assert!(!visible(terrain, CellCoord::new(0, 0), CellCoord::new(4, 0)));
    }
}
