//! Enemy roster entries and the enemy-phase step clock.

use std::{collections::VecDeque, time::Duration};

use squad_tactics_core::{CellCoord, EnemyId, EnemySnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    cell: CellCoord,
    health: u32,
    route: VecDeque<CellCoord>,
    budget: u32,
}

impl Enemy {
    pub(crate) fn new(id: EnemyId, cell: CellCoord, health: u32) -> Self {
        Self {
            id,
            cell,
            health,
            route: VecDeque::new(),
            budget: 0,
        }
    }

    pub(crate) const fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) const fn health(&self) -> u32 {
        self.health
    }

    /// Replaces the route and returns the step budget granted for this turn.
    pub(crate) fn assign_route(&mut self, route: Vec<CellCoord>, steps_per_turn: u32) -> u32 {
        let length = u32::try_from(route.len()).unwrap_or(u32::MAX);
        self.route = route.into();
        self.budget = steps_per_turn.min(length);
        self.budget
    }

    pub(crate) fn clear_route(&mut self) {
        self.route.clear();
        self.budget = 0;
    }

    pub(crate) fn next_step(&self) -> Option<CellCoord> {
        if self.budget == 0 {
            return None;
        }
        self.route.front().copied()
    }

    pub(crate) fn has_pending_steps(&self) -> bool {
        self.next_step().is_some()
    }

    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.route.pop_front() {
            self.cell = next;
            self.budget = self.budget.saturating_sub(1);
        }
    }

    /// Applies damage and reports whether the enemy died.
    pub(crate) fn take_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.health == 0
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            cell: self.cell,
            health: self.health,
            next_step: self.route.front().copied(),
            route_remaining: u32::try_from(self.route.len()).unwrap_or(u32::MAX),
            budget: self.budget,
        }
    }
}

/// Fixed-interval cadence for enemy steps, measured in simulation time.
#[derive(Clone, Debug)]
pub(crate) struct StepClock {
    interval: Duration,
    accumulated: Duration,
    stalled: u32,
}

impl StepClock {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
            stalled: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.stalled = 0;
    }

    pub(crate) fn accumulate(&mut self, dt: Duration) {
        self.accumulated = self.accumulated.saturating_add(dt);
    }

    /// Consumes one interval if enough time has accumulated.
    pub(crate) fn take_cadence(&mut self) -> bool {
        if self.interval.is_zero() || self.accumulated < self.interval {
            return false;
        }
        self.accumulated -= self.interval;
        true
    }

    /// Records the outcome of a cadence, returning the stall streak when nothing moved.
    pub(crate) fn record(&mut self, moved: bool) -> Option<u32> {
        if moved {
            self.stalled = 0;
            return None;
        }
        self.stalled = self.stalled.saturating_add(1);
        Some(self.stalled)
    }

    pub(crate) const fn stalled(&self) -> u32 {
        self.stalled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_capped_by_route_length() {
        let mut enemy = Enemy::new(EnemyId::new(0), CellCoord::new(0, 0), 3);
        let route = vec![CellCoord::new(1, 0), CellCoord::new(2, 0)];

        assert_eq!(enemy.assign_route(route, 6), 2);
        enemy.advance();
        enemy.advance();
        assert_eq!(enemy.cell(), CellCoord::new(2, 0));
        assert!(!enemy.has_pending_steps());
    }

    #[test]
    fn exhausted_budget_stops_walking() {
        let mut enemy = Enemy::new(EnemyId::new(0), CellCoord::new(0, 0), 3);
        let route = (1..=4).map(|column| CellCoord::new(column, 0)).collect();

        assert_eq!(enemy.assign_route(route, 1), 1);
        enemy.advance();
        assert_eq!(enemy.next_step(), None);
        assert_eq!(enemy.snapshot().route_remaining, 3);
    }

    #[test]
    fn clock_counts_stalls_until_progress() {
        let mut clock = StepClock::new(Duration::from_millis(150));
        clock.accumulate(Duration::from_millis(320));

        assert!(clock.take_cadence());
        assert_eq!(clock.record(false), Some(1));
        assert!(clock.take_cadence());
        assert_eq!(clock.record(false), Some(2));
        assert!(!clock.take_cadence());
        assert_eq!(clock.record(true), None);
        assert_eq!(clock.stalled(), 0);
    }
}
