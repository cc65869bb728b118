#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy-phase orchestration: route planning toward the squad and turn completion.

use squad_tactics_core::{
    CellCoord, Command, EnemyRules, EnemySnapshot, EnemyView, Event, GridBounds, Phase, UnitView,
};
use squad_tactics_system_pathfinding::a_star;

/// Pure system that plans enemy routes and hands the turn back to the squad.
#[derive(Debug)]
pub struct EnemyAi {
    stall_limit: u32,
    state: TurnState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnState {
    Idle,
    Stepping,
}

impl EnemyAi {
    /// Creates the system, yielding the turn after `rules.stall_limit` stalled cadences.
    #[must_use]
    pub fn new(rules: &EnemyRules) -> Self {
        Self {
            stall_limit: rules.stall_limit.max(1),
            state: TurnState::Idle,
        }
    }

    /// Consumes world events and immutable views to emit enemy-phase commands.
    ///
    /// `is_blocked` should report walls, cells off the grid and every occupied
    /// cell; the planner lifts the restriction for the moving enemy and its
    /// candidate target itself.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        units: &UnitView,
        enemies: &EnemyView,
        bounds: GridBounds,
        is_blocked: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        let mut entered_enemy_phase = false;
        let mut deadlocked = false;
        let mut time_advanced = false;

        for event in events {
            match event {
                Event::PhaseChanged {
                    phase: Phase::Enemy,
                    ..
                } => entered_enemy_phase = true,
                Event::PhaseChanged {
                    phase: Phase::Player,
                    ..
                }
                | Event::GridConfigured { .. } => {
                    entered_enemy_phase = false;
                    self.state = TurnState::Idle;
                }
                Event::EnemyStepsStalled { consecutive } => {
                    deadlocked |= *consecutive >= self.stall_limit;
                }
                Event::TimeAdvanced { .. } => time_advanced = true,
                _ => {}
            }
        }

        if entered_enemy_phase {
            self.state = TurnState::Stepping;
            for enemy in enemies.iter() {
                if let Some(route) = plan_route(enemy, units, bounds, &is_blocked) {
                    out.push(Command::AssignEnemyRoute {
                        enemy: enemy.id,
                        route,
                    });
                }
            }
            return;
        }

        if self.state != TurnState::Stepping || !time_advanced {
            return;
        }

        let settled = !enemies.iter().any(EnemySnapshot::has_pending_steps);
        if settled || deadlocked {
            if deadlocked {
                tracing::debug!(limit = self.stall_limit, "enemies deadlocked, yielding turn");
            }
            self.state = TurnState::Idle;
            out.push(Command::CompleteEnemyTurn);
        }
    }
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self::new(&EnemyRules::default())
    }
}

/// Chooses the shortest route from `enemy` to any squad member.
///
/// The route stops one tile short of the target; ties keep the unit with the
/// lowest id.
fn plan_route<F>(
    enemy: &EnemySnapshot,
    units: &UnitView,
    bounds: GridBounds,
    is_blocked: &F,
) -> Option<Vec<CellCoord>>
where
    F: Fn(CellCoord) -> bool,
{
    let origin = enemy.cell;
    let mut best: Option<Vec<CellCoord>> = None;

    for unit in units.iter() {
        let target = unit.cell;
        let route = a_star(origin, target, bounds, |cell| {
            cell != origin && cell != target && is_blocked(cell)
        });
        let Some(mut path) = route.into_path() else {
            continue;
        };
        let _ = path.pop();
        if best.as_ref().map_or(true, |current| path.len() < current.len()) {
            best = Some(path);
        }
    }

    if let Some(path) = &best {
        tracing::trace!(enemy = enemy.id.get(), steps = path.len(), "enemy route planned");
    }
    best
}
