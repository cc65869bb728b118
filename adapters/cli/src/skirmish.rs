use std::time::Duration;

use squad_tactics_core::{
    CellCoord, Command, EnemyId, EnemySnapshot, Event, Phase, RulesError, UnitSnapshot,
    WorldConfig,
};
use squad_tactics_system_enemy_ai::EnemyAi;
use squad_tactics_system_squad_orders::{
    movement_range, next_ready_unit, shot_preview, OrderAction, OrderInput, ShotPreview,
    SquadOrders,
};
use squad_tactics_world::{self as world, query, World};

/// Upper bound on simulation steps spent waiting for movement or the enemy turn.
const MAX_SETTLE_STEPS: u32 = 10_000;

/// Headless skirmish where an autopilot commands the squad.
#[derive(Debug)]
pub(crate) struct Skirmish {
    world: World,
    orders: SquadOrders,
    enemy_ai: EnemyAi,
    step: Duration,
}

/// Final state of a finished skirmish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) turn: u32,
    pub(crate) units: usize,
    pub(crate) enemies_left: usize,
    pub(crate) shots: Vec<String>,
}

impl Skirmish {
    pub(crate) fn new(config: WorldConfig, step: Duration) -> Result<Self, RulesError> {
        let enemy_ai = EnemyAi::new(&config.rules.enemy);
        Ok(Self {
            world: World::with_config(config)?,
            orders: SquadOrders::new(),
            enemy_ai,
            step,
        })
    }

    /// Plays up to `turns` full rounds, stopping early once every enemy is down.
    pub(crate) fn play(mut self, turns: u32) -> Summary {
        for _ in 0..turns {
            if query::enemy_view(&self.world).is_empty() {
                break;
            }
            self.player_turn();
            self.dispatch(OrderInput::new(None, Some(OrderAction::EndTurn)));
            self.enemy_turn();
        }

        Summary {
            turn: query::turn(&self.world),
            units: query::unit_view(&self.world).len(),
            enemies_left: query::enemy_view(&self.world).len(),
            shots: query::combat_log(&self.world)
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    fn player_turn(&mut self) {
        let squad_size = query::unit_view(&self.world).len();
        let mut selected = None;

        // Each unit acts at most twice: a move and a follow-up action.
        for _ in 0..squad_size * 2 {
            let units = query::unit_view(&self.world);
            let Some(id) = next_ready_unit(&units, selected) else {
                return;
            };
            let Some(unit) = units.get(id).filter(|unit| unit.is_ready()) else {
                return;
            };
            selected = Some(id);

            let action = self.choose_action(unit);
            tracing::debug!(unit = id.get(), ?action, "autopilot order");
            self.dispatch(OrderInput::new(selected, Some(action)));
            self.wait_for_squad();

            let still_ready = query::unit_view(&self.world)
                .get(id)
                .is_some_and(UnitSnapshot::is_ready);
            if still_ready && !matches!(action, OrderAction::MoveTo(_)) {
                // The world refused the order; park the unit instead of retrying.
                self.dispatch(OrderInput::new(selected, Some(OrderAction::Overwatch)));
            }
        }
    }

    fn choose_action(&self, unit: &UnitSnapshot) -> OrderAction {
        if unit.ammo == 0 {
            return OrderAction::Reload;
        }
        let enemies = query::enemy_view(&self.world);
        if let Some(target) = self.best_target(unit, enemies.iter()) {
            return OrderAction::FireAt(target);
        }
        if unit.ap == unit.ap_max {
            if let Some(cell) = self.advance_cell(unit, enemies.iter()) {
                return OrderAction::MoveTo(cell);
            }
        }
        OrderAction::Overwatch
    }

    fn best_target<'a>(
        &self,
        unit: &UnitSnapshot,
        enemies: impl Iterator<Item = &'a EnemySnapshot>,
    ) -> Option<EnemyId> {
        let terrain = query::terrain_view(&self.world);
        let rules = &query::rules(&self.world).combat;
        enemies
            .filter_map(|enemy| match shot_preview(unit.cell, enemy.cell, terrain, rules) {
                ShotPreview::Odds { odds, .. } => Some((odds.hit, enemy.id)),
                ShotPreview::NoLineOfSight => None,
            })
            .max_by_key(|(hit, id)| (*hit, std::cmp::Reverse(*id)))
            .map(|(_, id)| id)
    }

    /// Single action point move that ends closest to any enemy.
    fn advance_cell<'a>(
        &self,
        unit: &UnitSnapshot,
        enemies: impl Iterator<Item = &'a EnemySnapshot>,
    ) -> Option<CellCoord> {
        let targets: Vec<CellCoord> = enemies.map(|enemy| enemy.cell).collect();
        let distance_to_enemies = |cell: CellCoord| {
            targets
                .iter()
                .map(|target| cell.manhattan_distance(*target))
                .min()
        };
        let current = distance_to_enemies(unit.cell)?;

        let terrain = query::terrain_view(&self.world);
        let occupancy = query::occupancy_view(&self.world);
        let range = movement_range(
            unit,
            query::bounds(&self.world),
            &query::rules(&self.world).squad,
            |cell| !terrain.passable(cell) || !occupancy.is_free(cell),
        );
        range
            .one_ap
            .iter()
            .filter_map(|cell| distance_to_enemies(*cell).map(|distance| (distance, *cell)))
            .filter(|(distance, _)| *distance < current)
            .min()
            .map(|(_, cell)| cell)
    }

    fn dispatch(&mut self, input: OrderInput) {
        let units = query::unit_view(&self.world);
        let terrain = query::terrain_view(&self.world);
        let occupancy = query::occupancy_view(&self.world);
        let mut commands = Vec::new();
        self.orders.handle(
            &[],
            input,
            &units,
            query::bounds(&self.world),
            &query::rules(&self.world).squad,
            |cell| !terrain.passable(cell) || !occupancy.is_free(cell),
            &mut commands,
        );
        for command in commands {
            self.execute(command);
        }
    }

    fn wait_for_squad(&mut self) {
        for _ in 0..MAX_SETTLE_STEPS {
            if !query::unit_view(&self.world).iter().any(UnitSnapshot::is_moving) {
                return;
            }
            self.execute(Command::Tick { dt: self.step });
        }
        tracing::warn!("squad never came to rest");
    }

    fn enemy_turn(&mut self) {
        for _ in 0..MAX_SETTLE_STEPS {
            if query::phase(&self.world) == Phase::Player {
                return;
            }
            self.execute(Command::Tick { dt: self.step });
        }
        tracing::warn!("enemy turn did not finish");
    }

    /// Applies a command and routes the resulting events through every system
    /// until no more commands are produced.
    fn execute(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            report(&events);
            let units = query::unit_view(&self.world);
            let enemies = query::enemy_view(&self.world);
            let terrain = query::terrain_view(&self.world);
            let occupancy = query::occupancy_view(&self.world);
            let is_blocked = |cell: CellCoord| !terrain.passable(cell) || !occupancy.is_free(cell);
            let mut commands = Vec::new();

            self.orders.handle(
                &events,
                OrderInput::default(),
                &units,
                query::bounds(&self.world),
                &query::rules(&self.world).squad,
                is_blocked,
                &mut commands,
            );
            self.enemy_ai.handle(
                &events,
                &units,
                &enemies,
                query::bounds(&self.world),
                is_blocked,
                &mut commands,
            );

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::OrderRejected { order, reason } => {
                tracing::debug!(?order, %reason, "autopilot order refused");
            }
            Event::UnitArrived {
                unit,
                cell,
                ap_remaining,
            } => tracing::debug!(unit = unit.get(), %cell, ap_remaining, "unit arrived"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_skirmish_is_reproducible() {
        let step = Duration::from_millis(16);
        let first = Skirmish::new(WorldConfig::default(), step)
            .expect("demo configuration is valid")
            .play(3);
        let second = Skirmish::new(WorldConfig::default(), step)
            .expect("demo configuration is valid")
            .play(3);

        assert_eq!(first, second);
        assert_eq!(first.units, 4);
        assert!(first.turn > 1);
    }

    #[test]
    fn empty_battlefield_ends_immediately() {
        let config = WorldConfig {
            layout: squad_tactics_core::Layout::empty(6, 6),
            ..WorldConfig::default()
        };

        let summary = Skirmish::new(config, Duration::from_millis(16))
            .expect("empty configuration is valid")
            .play(5);

        assert_eq!(summary.turn, 1);
        assert_eq!(summary.enemies_left, 0);
        assert!(summary.shots.is_empty());
    }
}
