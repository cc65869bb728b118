#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid search used for squad movement and enemy planning.
//!
//! All searches walk the four cardinal neighbours with uniform step cost and
//! ask a caller-supplied closure which cells are blocked. Callers decide what
//! counts as an obstacle (walls, other units, enemies), which keeps the same
//! search usable for player previews and enemy routes alike.

use std::{
    cmp::Reverse,
    collections::{BTreeSet, BinaryHeap, VecDeque},
};

use squad_tactics_core::{CellCoord, GridBounds, SquadRules};

/// Result of a point-to-point search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Start and goal are the same cell.
    AlreadyThere,
    /// No unblocked path connects start and goal.
    Unreachable,
    /// Tiles from the cell after the start up to and including the goal.
    Path(Vec<CellCoord>),
}

impl Route {
    /// Number of tiles walked along the route.
    #[must_use]
    pub fn steps(&self) -> Option<usize> {
        match self {
            Self::AlreadyThere => Some(0),
            Self::Unreachable => None,
            Self::Path(path) => Some(path.len()),
        }
    }

    /// Consumes the route, yielding the tiles to walk when a path exists.
    #[must_use]
    pub fn into_path(self) -> Option<Vec<CellCoord>> {
        match self {
            Self::Path(path) => Some(path),
            Self::AlreadyThere | Self::Unreachable => None,
        }
    }
}

/// Finds a shortest four-connected path from `start` to `goal`.
///
/// The start cell is never tested against `is_blocked`; a blocked goal is
/// unreachable. Open-set ties are resolved first-in first-out and neighbours
/// are expanded east, west, south, north, so results are stable across runs.
pub fn a_star<F>(start: CellCoord, goal: CellCoord, bounds: GridBounds, mut is_blocked: F) -> Route
where
    F: FnMut(CellCoord) -> bool,
{
    if start == goal {
        return Route::AlreadyThere;
    }
    let (Some(start_index), Some(_)) = (bounds.index(start), bounds.index(goal)) else {
        return Route::Unreachable;
    };

    let cell_count = bounds.cell_count();
    let mut g_scores = vec![u32::MAX; cell_count];
    let mut came_from: Vec<Option<CellCoord>> = vec![None; cell_count];
    let mut open = BinaryHeap::new();
    let mut sequence: u64 = 0;

    g_scores[start_index] = 0;
    open.push(Reverse((0_u32, sequence, start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == goal {
            return Route::Path(reconstruct(&came_from, bounds, start, goal));
        }
        let Some(current_index) = bounds.index(current) else {
            continue;
        };
        let tentative = g_scores[current_index].saturating_add(1);

        for neighbor in bounds.neighbors(current) {
            if is_blocked(neighbor) {
                continue;
            }
            let Some(neighbor_index) = bounds.index(neighbor) else {
                continue;
            };
            if tentative >= g_scores[neighbor_index] {
                continue;
            }
            g_scores[neighbor_index] = tentative;
            came_from[neighbor_index] = Some(current);
            sequence += 1;
            let f_score = tentative.saturating_add(neighbor.manhattan_distance(goal));
            open.push(Reverse((f_score, sequence, neighbor)));
        }
    }

    Route::Unreachable
}

fn reconstruct(
    came_from: &[Option<CellCoord>],
    bounds: GridBounds,
    start: CellCoord,
    goal: CellCoord,
) -> Vec<CellCoord> {
    let mut path = Vec::new();
    let mut node = goal;
    while node != start {
        path.push(node);
        match bounds.index(node).and_then(|index| came_from[index]) {
            Some(previous) => node = previous,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Cells reachable from `origin` within `max_steps` tiles.
///
/// The origin itself is excluded from the result.
pub fn bfs_reachable<F>(
    origin: CellCoord,
    max_steps: u32,
    bounds: GridBounds,
    mut is_blocked: F,
) -> BTreeSet<CellCoord>
where
    F: FnMut(CellCoord) -> bool,
{
    let mut reached = BTreeSet::new();
    if !bounds.contains(origin) {
        return reached;
    }

    let mut frontier = VecDeque::new();
    frontier.push_back((origin, 0_u32));
    while let Some((cell, depth)) = frontier.pop_front() {
        if depth == max_steps {
            continue;
        }
        for neighbor in bounds.neighbors(cell) {
            if neighbor == origin || reached.contains(&neighbor) || is_blocked(neighbor) {
                continue;
            }
            let _ = reached.insert(neighbor);
            frontier.push_back((neighbor, depth + 1));
        }
    }
    reached
}

/// Movement range split by action point cost.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveTiers {
    /// Cells reachable for a single action point.
    pub one_ap: BTreeSet<CellCoord>,
    /// Cells that need a second action point.
    pub two_ap: BTreeSet<CellCoord>,
}

impl MoveTiers {
    /// Action points needed to reach `cell`, if it is in range.
    #[must_use]
    pub fn cost_of(&self, cell: CellCoord) -> Option<u32> {
        if self.one_ap.contains(&cell) {
            Some(1)
        } else if self.two_ap.contains(&cell) {
            Some(2)
        } else {
            None
        }
    }
}

/// Builds the one and two action point movement bands around `origin`.
///
/// The second band is only populated when at least two action points remain.
pub fn movement_tiers<F>(
    origin: CellCoord,
    tiles_per_ap: u32,
    available_ap: u32,
    bounds: GridBounds,
    mut is_blocked: F,
) -> MoveTiers
where
    F: FnMut(CellCoord) -> bool,
{
    if available_ap == 0 || tiles_per_ap == 0 {
        return MoveTiers::default();
    }

    let one_ap = bfs_reachable(origin, tiles_per_ap, bounds, &mut is_blocked);
    if available_ap < 2 {
        return MoveTiers {
            one_ap,
            two_ap: BTreeSet::new(),
        };
    }

    let double_range = tiles_per_ap.saturating_mul(2);
    let two_ap = bfs_reachable(origin, double_range, bounds, &mut is_blocked)
        .difference(&one_ap)
        .copied()
        .collect();
    MoveTiers { one_ap, two_ap }
}

/// Proposed movement shown while hovering a destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPreview {
    /// Tiles to walk, excluding the unit's own cell.
    pub path: Vec<CellCoord>,
    /// Number of tiles in the path.
    pub steps: u32,
    /// Action points the move would cost.
    pub ap_cost: u32,
}

impl PathPreview {
    /// Reports whether a unit holding `ap` action points can pay for the move.
    #[must_use]
    pub const fn affordable(&self, ap: u32) -> bool {
        self.ap_cost > 0 && self.ap_cost <= ap
    }
}

/// Previews a move from `start` to `goal`, capped at two action points of tiles.
///
/// Returns `None` when the goal is the start, unreachable, or too far away.
pub fn preview_path<F>(
    start: CellCoord,
    goal: CellCoord,
    bounds: GridBounds,
    squad: &SquadRules,
    is_blocked: F,
) -> Option<PathPreview>
where
    F: FnMut(CellCoord) -> bool,
{
    let path = a_star(start, goal, bounds, is_blocked).into_path()?;
    let steps = u32::try_from(path.len()).ok()?;
    if steps > squad.preview_cap() {
        return None;
    }
    Some(PathPreview {
        ap_cost: squad.movement_ap_cost(steps),
        steps,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_path_on_open_grid() {
        let bounds = GridBounds::new(10, 10);
        let route = a_star(CellCoord::new(0, 0), CellCoord::new(3, 0), bounds, |_| false);

        assert_eq!(
            route,
            Route::Path(vec![
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(3, 0),
            ])
        );
    }

    #[test]
    fn same_cell_is_already_there() {
        let bounds = GridBounds::new(4, 4);
        let cell = CellCoord::new(2, 2);
        assert_eq!(a_star(cell, cell, bounds, |_| true), Route::AlreadyThere);
        assert_eq!(Route::AlreadyThere.steps(), Some(0));
    }

    #[test]
    fn walled_goal_is_unreachable() {
        let bounds = GridBounds::new(5, 5);
        let goal = CellCoord::new(4, 4);
        let route = a_star(CellCoord::new(0, 0), goal, bounds, |cell| cell == goal);
        assert_eq!(route, Route::Unreachable);
        assert_eq!(route.steps(), None);
    }

    #[test]
    fn detours_around_a_wall() {
        let bounds = GridBounds::new(5, 3);
        let walls = [CellCoord::new(2, 0), CellCoord::new(2, 1)];
        let route = a_star(CellCoord::new(0, 0), CellCoord::new(4, 0), bounds, |cell| {
            walls.contains(&cell)
        });

        let path = route.into_path().expect("a detour exists");
        assert_eq!(path.len(), 8);
        assert!(path.iter().all(|cell| !walls.contains(cell)));
        assert_eq!(path.last(), Some(&CellCoord::new(4, 0)));
    }

    #[test]
    fn reachability_from_corner_counts_in_bounds_cells() {
        let bounds = GridBounds::new(10, 10);
        let reached = bfs_reachable(CellCoord::new(0, 0), 2, bounds, |_| false);

        let expected: BTreeSet<_> = [
            CellCoord::new(1, 0),
            CellCoord::new(0, 1),
            CellCoord::new(2, 0),
            CellCoord::new(1, 1),
            CellCoord::new(0, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(reached, expected);
    }

    #[test]
    fn reachability_in_the_open_forms_a_diamond() {
        let bounds = GridBounds::new(10, 10);
        let origin = CellCoord::new(5, 5);
        let reached = bfs_reachable(origin, 2, bounds, |_| false);

        assert_eq!(reached.len(), 12);
        assert!(!reached.contains(&origin));
        assert!(reached
            .iter()
            .all(|cell| (1..=2).contains(&cell.manhattan_distance(origin))));
    }

    #[test]
    fn tiers_depend_on_available_ap() {
        let bounds = GridBounds::new(20, 20);
        let origin = CellCoord::new(10, 10);

        let none = movement_tiers(origin, 5, 0, bounds, |_| false);
        assert!(none.one_ap.is_empty() && none.two_ap.is_empty());

        let single = movement_tiers(origin, 5, 1, bounds, |_| false);
        assert_eq!(single.one_ap.len(), 60);
        assert!(single.two_ap.is_empty());

        let double = movement_tiers(origin, 5, 2, bounds, |_| false);
        assert_eq!(double.one_ap, single.one_ap);
        assert!(double.one_ap.is_disjoint(&double.two_ap));
        assert_eq!(double.cost_of(CellCoord::new(10, 3)), Some(2));
        assert_eq!(double.cost_of(CellCoord::new(10, 6)), Some(1));
        assert_eq!(double.cost_of(origin), None);
    }

    #[test]
    fn preview_costs_round_up_and_cap() {
        let bounds = GridBounds::new(20, 1);
        let squad = SquadRules::default();
        let start = CellCoord::new(0, 0);

        let near = preview_path(start, CellCoord::new(5, 0), bounds, &squad, |_| false)
            .expect("five tiles fit the preview");
        assert_eq!((near.steps, near.ap_cost), (5, 1));

        let far = preview_path(start, CellCoord::new(6, 0), bounds, &squad, |_| false)
            .expect("six tiles fit the preview");
        assert_eq!((far.steps, far.ap_cost), (6, 2));
        assert!(far.affordable(2));
        assert!(!far.affordable(1));

        assert!(preview_path(start, CellCoord::new(11, 0), bounds, &squad, |_| false).is_none());
        assert!(preview_path(start, start, bounds, &squad, |_| false).is_none());
    }
}
