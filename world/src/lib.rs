#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Squad Tactics.

mod enemy;
mod grid;
mod occupancy;
mod turns;
mod unit;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squad_tactics_core::{
    CellCoord, Command, EnemyId, Event, FireMode, GridBounds, IsoProjection, Layout, Occupant,
    OrderError, OrderKind, Phase, RulesConfig, RulesError, ShotOdds, ShotOutcome, UnitId,
    WorldConfig,
};
use squad_tactics_system_combat::{adjudicate, calc_shot_chances, ShotRolls};

use crate::{enemy::Enemy, enemy::StepClock, occupancy::OccupancyGrid};

pub use grid::GridMap;
pub use turns::TurnManager;
pub use unit::Unit;

/// Represents the authoritative Squad Tactics world state.
#[derive(Debug)]
pub struct World {
    rules: RulesConfig,
    projection: IsoProjection,
    grid: GridMap,
    occupancy: OccupancyGrid,
    units: Vec<Unit>,
    enemies: Vec<Enemy>,
    turns: TurnManager,
    enemy_clock: StepClock,
    rng: ChaCha8Rng,
    seed: u64,
    combat_log: Vec<ShotOutcome>,
    next_unit_id: u32,
    next_enemy_id: u32,
}

impl World {
    /// Creates the demo skirmish with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Creates a world from the provided configuration.
    ///
    /// Spawn points that land on walls or on another spawn are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first rule or layout value that cannot drive a simulation,
    /// such as a non-positive movement speed.
    pub fn with_config(config: WorldConfig) -> Result<Self, RulesError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        let WorldConfig {
            rules,
            layout,
            projection,
            seed,
        } = config;
        let bounds = layout.bounds();
        let interval = Duration::from_millis(rules.enemy.step_interval_ms);
        let mut world = Self {
            grid: GridMap::from_layout(&layout),
            occupancy: OccupancyGrid::new(bounds),
            units: Vec::new(),
            enemies: Vec::new(),
            turns: TurnManager::new(),
            enemy_clock: StepClock::new(interval),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            combat_log: Vec::new(),
            next_unit_id: 0,
            next_enemy_id: 0,
            rules,
            projection,
        };
        world.populate(&layout);
        world
    }

    fn populate(&mut self, layout: &Layout) {
        for cell in &layout.unit_spawns {
            if self.spawn_unit(*cell).is_err() {
                tracing::warn!(%cell, "skipping blocked unit spawn");
            }
        }
        for cell in &layout.enemy_spawns {
            if self.place_enemy(*cell).is_err() {
                tracing::warn!(%cell, "skipping blocked enemy spawn");
            }
        }
    }

    fn reset(&mut self, bounds: GridBounds) {
        self.grid = GridMap::new(bounds);
        self.occupancy = OccupancyGrid::new(bounds);
        self.units.clear();
        self.enemies.clear();
        self.turns = TurnManager::new();
        self.enemy_clock.reset();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.combat_log.clear();
        self.next_unit_id = 0;
        self.next_enemy_id = 0;
    }

    fn unit_index(&self, unit: UnitId) -> Option<usize> {
        self.units.iter().position(|candidate| candidate.id() == unit)
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id() == enemy)
    }

    fn enemy_index_at(&self, cell: CellCoord) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.cell() == cell)
    }

    fn require_player_phase(&self) -> Result<(), OrderError> {
        if self.turns.phase() == Phase::Player {
            Ok(())
        } else {
            Err(OrderError::NotPlayerPhase)
        }
    }

    fn require_enemy_phase(&self) -> Result<(), OrderError> {
        if self.turns.phase() == Phase::Enemy {
            Ok(())
        } else {
            Err(OrderError::NotEnemyPhase)
        }
    }

    fn require_vacant(&self, cell: CellCoord) -> Result<(), OrderError> {
        if !self.grid.in_bounds(cell) {
            return Err(OrderError::OutOfBounds);
        }
        if !self.grid.passable(cell) || !self.occupancy.is_free(cell) {
            return Err(OrderError::Occupied);
        }
        Ok(())
    }

    fn spawn_unit(&mut self, cell: CellCoord) -> Result<UnitId, OrderError> {
        self.require_vacant(cell)?;
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        self.units
            .push(Unit::new(id, cell, &self.rules.squad, &self.projection));
        self.occupancy.occupy(cell, Occupant::Unit(id));
        Ok(id)
    }

    fn place_enemy(&mut self, cell: CellCoord) -> Result<EnemyId, OrderError> {
        self.require_vacant(cell)?;
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies
            .push(Enemy::new(id, cell, self.rules.enemy.default_hp));
        self.occupancy.occupy(cell, Occupant::Enemy(id));
        Ok(id)
    }

    fn toggle_wall(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        if !self.grid.in_bounds(cell) {
            return Err(OrderError::OutOfBounds);
        }
        if self.occupancy.occupant(cell).is_some() {
            return Err(OrderError::Occupied);
        }
        let terrain = self.grid.toggle_block(cell)?;
        out_events.push(Event::TerrainChanged { cell, terrain });
        Ok(())
    }

    fn toggle_crate(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        let terrain = self.grid.toggle_crate(cell)?;
        out_events.push(Event::TerrainChanged { cell, terrain });
        Ok(())
    }

    fn toggle_enemy(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        if let Some(index) = self.enemy_index_at(cell) {
            let enemy = self.enemies.remove(index);
            self.occupancy.vacate(cell, Occupant::Enemy(enemy.id()));
            out_events.push(Event::EnemyRemoved {
                enemy: enemy.id(),
                cell,
            });
            return Ok(());
        }
        let enemy = self.place_enemy(cell)?;
        out_events.push(Event::EnemyPlaced {
            enemy,
            cell,
            health: self.rules.enemy.default_hp,
        });
        Ok(())
    }

    fn place_unit(
        &mut self,
        unit: UnitId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        let index = self.unit_index(unit).ok_or(OrderError::UnknownUnit)?;
        if self.units[index].is_moving() {
            return Err(OrderError::UnitMoving);
        }
        let from = self.units[index].cell();
        if from == cell {
            out_events.push(Event::UnitPlaced { unit, cell });
            return Ok(());
        }
        self.require_vacant(cell)?;

        self.occupancy.vacate(from, Occupant::Unit(unit));
        self.occupancy.occupy(cell, Occupant::Unit(unit));
        self.units[index].set_grid_immediate(cell, &self.projection);
        out_events.push(Event::UnitPlaced { unit, cell });
        Ok(())
    }

    fn move_unit(
        &mut self,
        unit: UnitId,
        path: Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        let index = self.unit_index(unit).ok_or(OrderError::UnknownUnit)?;
        let mover = &self.units[index];
        if mover.is_moving() {
            return Err(OrderError::UnitMoving);
        }
        let from = mover.cell();
        let to = *path.last().ok_or(OrderError::InvalidPath)?;

        let mut previous = from;
        for cell in &path {
            if !previous.is_adjacent(*cell) || !self.grid.passable(*cell) {
                return Err(OrderError::InvalidPath);
            }
            if !self.occupancy.is_free(*cell) {
                return Err(OrderError::DestinationOccupied);
            }
            previous = *cell;
        }

        let steps = u32::try_from(path.len()).map_err(|_| OrderError::InvalidPath)?;
        let ap_cost = self.rules.squad.movement_ap_cost(steps);
        if !mover.can_afford(ap_cost) {
            return Err(OrderError::InsufficientAp);
        }

        // The destination is claimed now; the origin is released on arrival.
        self.occupancy.occupy(to, Occupant::Unit(unit));
        self.units[index].set_path(&path, ap_cost, &self.projection);
        tracing::debug!(unit = unit.get(), %from, %to, ap_cost, "unit moving");
        out_events.push(Event::UnitMoveStarted {
            unit,
            from,
            to,
            ap_cost,
        });
        Ok(())
    }

    fn set_overwatch(
        &mut self,
        unit: UnitId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        let index = self.unit_index(unit).ok_or(OrderError::UnknownUnit)?;
        self.units[index].set_overwatch(self.rules.squad.overwatch_cost)?;
        tracing::debug!(unit = unit.get(), "overwatch armed");
        out_events.push(Event::OverwatchSet { unit });
        Ok(())
    }

    fn clear_overwatch(
        &mut self,
        unit: UnitId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        let index = self.unit_index(unit).ok_or(OrderError::UnknownUnit)?;
        if !self.units[index].clear_overwatch() {
            return Err(OrderError::NotOnOverwatch);
        }
        out_events.push(Event::OverwatchCleared { unit });
        Ok(())
    }

    fn reload(&mut self, unit: UnitId, out_events: &mut Vec<Event>) -> Result<(), OrderError> {
        self.require_player_phase()?;
        let index = self.unit_index(unit).ok_or(OrderError::UnknownUnit)?;
        self.units[index].reload(self.rules.squad.reload_cost)?;
        out_events.push(Event::Reloaded {
            unit,
            ammo: self.units[index].ammo(),
        });
        Ok(())
    }

    fn fire(
        &mut self,
        unit: UnitId,
        target: EnemyId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_player_phase()?;
        let unit_index = self.unit_index(unit).ok_or(OrderError::UnknownUnit)?;
        let enemy_index = self.enemy_index(target).ok_or(OrderError::UnknownEnemy)?;
        let shooter = &self.units[unit_index];
        if shooter.is_moving() {
            return Err(OrderError::UnitMoving);
        }
        if shooter.ammo() == 0 {
            return Err(OrderError::NoAmmo);
        }
        if shooter.ap() < self.rules.squad.shoot_cost {
            return Err(OrderError::InsufficientAp);
        }
        let odds = calc_shot_chances(
            shooter.cell(),
            self.enemies[enemy_index].cell(),
            self.grid.view(),
            &self.rules.combat,
            0,
        )
        .ok_or(OrderError::NoLineOfSight)?;

        let _ = self.resolve_shot(unit_index, enemy_index, FireMode::Manual, odds, out_events);
        self.units[unit_index].end_turn();
        Ok(())
    }

    /// Rolls and applies a shot that already passed every precondition.
    ///
    /// Returns whether the target died.
    fn resolve_shot(
        &mut self,
        unit_index: usize,
        enemy_index: usize,
        mode: FireMode,
        odds: ShotOdds,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let rolls = ShotRolls::draw(&mut self.rng, &self.rules.combat);
        let enemy = &mut self.enemies[enemy_index];
        let result = adjudicate(odds, rolls, &self.rules.combat, enemy.health());
        let shooter = &mut self.units[unit_index];
        let _ = shooter.spend_ammo();

        let cell = enemy.cell();
        let target = enemy.id();
        let killed = result.hit && enemy.take_damage(result.damage);
        let outcome = ShotOutcome {
            shooter: shooter.id(),
            target,
            cell,
            mode,
            odds,
            hit: result.hit,
            crit: result.crit,
            damage: result.damage,
            killed,
        };
        tracing::trace!(
            hit_roll = rolls.hit_roll,
            crit_roll = rolls.crit_roll,
            hit = odds.hit,
            crit = odds.crit,
            "shot rolled"
        );
        tracing::info!("{outcome}");
        self.combat_log.push(outcome);
        out_events.push(Event::ShotResolved { outcome });

        if killed {
            let _ = self.enemies.remove(enemy_index);
            self.occupancy.vacate(cell, Occupant::Enemy(target));
            out_events.push(Event::EnemyKilled {
                enemy: target,
                cell,
            });
        }
        killed
    }

    fn end_player_turn(&mut self, out_events: &mut Vec<Event>) -> Result<(), OrderError> {
        self.require_player_phase()?;
        if self.units.iter().any(Unit::is_moving) {
            return Err(OrderError::UnitMoving);
        }
        if !self.turns.end_player_turn() {
            return Err(OrderError::NotPlayerPhase);
        }
        for enemy in &mut self.enemies {
            enemy.clear_route();
        }
        self.enemy_clock.reset();
        tracing::info!(turn = self.turns.turn(), "enemy phase");
        out_events.push(Event::PhaseChanged {
            phase: Phase::Enemy,
            turn: self.turns.turn(),
        });
        Ok(())
    }

    fn assign_enemy_route(
        &mut self,
        enemy: EnemyId,
        route: Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), OrderError> {
        self.require_enemy_phase()?;
        let index = self.enemy_index(enemy).ok_or(OrderError::UnknownEnemy)?;
        let mut previous = self.enemies[index].cell();
        for cell in &route {
            if !previous.is_adjacent(*cell) || !self.grid.passable(*cell) {
                return Err(OrderError::InvalidPath);
            }
            previous = *cell;
        }

        let steps = u32::try_from(route.len()).map_err(|_| OrderError::InvalidPath)?;
        let budget = self.enemies[index].assign_route(route, self.rules.enemy.steps_per_turn);
        out_events.push(Event::EnemyRouteAssigned {
            enemy,
            steps,
            budget,
        });
        Ok(())
    }

    fn complete_enemy_turn(&mut self, out_events: &mut Vec<Event>) -> Result<(), OrderError> {
        self.require_enemy_phase()?;
        if !self.turns.complete_enemy_turn() {
            return Err(OrderError::NotEnemyPhase);
        }
        for enemy in &mut self.enemies {
            enemy.clear_route();
        }
        self.enemy_clock.reset();
        for unit in &mut self.units {
            unit.refresh_ap();
            if unit.clear_overwatch() {
                out_events.push(Event::OverwatchCleared { unit: unit.id() });
            }
        }
        tracing::info!(turn = self.turns.turn(), "player phase");
        out_events.push(Event::PhaseChanged {
            phase: Phase::Player,
            turn: self.turns.turn(),
        });
        Ok(())
    }

    fn advance_units(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for unit in &mut self.units {
            let from = unit.cell();
            let Some(cell) = unit.update(dt) else {
                continue;
            };
            if cell != from {
                self.occupancy.vacate(from, Occupant::Unit(unit.id()));
            }
            out_events.push(Event::UnitArrived {
                unit: unit.id(),
                cell,
                ap_remaining: unit.ap(),
            });
        }
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.turns.phase() != Phase::Enemy {
            return;
        }
        if !self.enemies.iter().any(Enemy::has_pending_steps) {
            self.enemy_clock.reset();
            return;
        }

        self.enemy_clock.accumulate(dt);
        while self.enemy_clock.take_cadence() {
            let moved = self.step_enemies(out_events);
            if let Some(consecutive) = self.enemy_clock.record(moved) {
                tracing::debug!(consecutive, "enemy cadence stalled");
                out_events.push(Event::EnemyStepsStalled { consecutive });
                break;
            }
        }
    }

    /// Gives every enemy with steps left one chance to advance.
    ///
    /// Occupancy is consulted fresh for each enemy, so earlier movers can free
    /// tiles for later ones within the same cadence.
    fn step_enemies(&mut self, out_events: &mut Vec<Event>) -> bool {
        let mut moved = false;
        let order: Vec<EnemyId> = self.enemies.iter().map(Enemy::id).collect();
        for id in order {
            let Some(index) = self.enemy_index(id) else {
                continue;
            };
            let enemy = &mut self.enemies[index];
            let Some(next) = enemy.next_step() else {
                continue;
            };
            if !self.grid.passable(next) || !self.occupancy.is_free(next) {
                continue;
            }

            let from = enemy.cell();
            enemy.advance();
            self.occupancy.vacate(from, Occupant::Enemy(id));
            self.occupancy.occupy(next, Occupant::Enemy(id));
            tracing::trace!(enemy = id.get(), %from, to = %next, "enemy advanced");
            out_events.push(Event::EnemyAdvanced {
                enemy: id,
                from,
                to: next,
            });
            moved = true;

            self.trigger_overwatch(id, out_events);
        }
        moved
    }

    /// Lets every overwatching unit that can see the mover take a reaction shot.
    fn trigger_overwatch(&mut self, mover: EnemyId, out_events: &mut Vec<Event>) {
        for unit_index in 0..self.units.len() {
            let Some(enemy_index) = self.enemy_index(mover) else {
                return;
            };
            let watcher = &self.units[unit_index];
            if !watcher.overwatch() || watcher.ammo() == 0 {
                continue;
            }
            let Some(odds) = calc_shot_chances(
                watcher.cell(),
                self.enemies[enemy_index].cell(),
                self.grid.view(),
                &self.rules.combat,
                -self.rules.combat.overwatch_aim_malus,
            ) else {
                continue;
            };

            let killed =
                self.resolve_shot(unit_index, enemy_index, FireMode::Reaction, odds, out_events);
            let unit = &mut self.units[unit_index];
            let _ = unit.clear_overwatch();
            out_events.push(Event::OverwatchCleared { unit: unit.id() });
            if killed {
                return;
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let (order, outcome) = match command {
        Command::ConfigureGrid { columns, rows } => {
            let bounds = GridBounds::new(columns, rows);
            world.reset(bounds);
            tracing::info!(columns, rows, "grid configured");
            out_events.push(Event::GridConfigured { bounds });
            return;
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_units(dt, out_events);
            world.advance_enemies(dt, out_events);
            return;
        }
        Command::ToggleWall { cell } => {
            (OrderKind::ToggleWall, world.toggle_wall(cell, out_events))
        }
        Command::ToggleCrate { cell } => {
            (OrderKind::ToggleCrate, world.toggle_crate(cell, out_events))
        }
        Command::SpawnUnit { cell } => (
            OrderKind::SpawnUnit,
            world.require_player_phase().and_then(|()| {
                let unit = world.spawn_unit(cell)?;
                out_events.push(Event::UnitSpawned { unit, cell });
                Ok(())
            }),
        ),
        Command::ToggleEnemy { cell } => {
            (OrderKind::ToggleEnemy, world.toggle_enemy(cell, out_events))
        }
        Command::PlaceUnit { unit, cell } => {
            (OrderKind::PlaceUnit, world.place_unit(unit, cell, out_events))
        }
        Command::MoveUnit { unit, path } => {
            (OrderKind::Move, world.move_unit(unit, path, out_events))
        }
        Command::SetOverwatch { unit } => {
            (OrderKind::SetOverwatch, world.set_overwatch(unit, out_events))
        }
        Command::ClearOverwatch { unit } => {
            (OrderKind::ClearOverwatch, world.clear_overwatch(unit, out_events))
        }
        Command::Reload { unit } => (OrderKind::Reload, world.reload(unit, out_events)),
        Command::Fire { unit, target } => (OrderKind::Fire, world.fire(unit, target, out_events)),
        Command::EndPlayerTurn => (OrderKind::EndPlayerTurn, world.end_player_turn(out_events)),
        Command::AssignEnemyRoute { enemy, route } => (
            OrderKind::AssignEnemyRoute,
            world.assign_enemy_route(enemy, route, out_events),
        ),
        Command::CompleteEnemyTurn => (
            OrderKind::CompleteEnemyTurn,
            world.complete_enemy_turn(out_events),
        ),
    };

    if let Err(reason) = outcome {
        tracing::debug!(?order, %reason, "order rejected");
        out_events.push(Event::OrderRejected { order, reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use squad_tactics_core::{
        CellCoord, EnemyId, EnemyView, GridBounds, Occupant, OccupancyView, Phase, RulesConfig,
        ShotOdds, ShotOutcome, TerrainView, UnitId, UnitView,
    };
    use squad_tactics_system_combat::calc_shot_chances;

    use super::{GridMap, Unit, World};

    /// Dimensions of the battlefield.
    #[must_use]
    pub fn bounds(world: &World) -> GridBounds {
        world.grid.bounds()
    }

    /// Reports whether the cell lies on the battlefield.
    #[must_use]
    pub fn in_bounds(world: &World, cell: CellCoord) -> bool {
        world.grid.in_bounds(cell)
    }

    /// Reports whether the terrain of the cell can be walked on.
    #[must_use]
    pub fn passable(world: &World, cell: CellCoord) -> bool {
        world.grid.passable(cell)
    }

    /// Provides read-only access to the terrain grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Borrowed terrain view for systems.
    #[must_use]
    pub fn terrain_view(world: &World) -> TerrainView<'_> {
        world.grid.view()
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        world.occupancy.view()
    }

    /// Captures a read-only view of the squad.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.units.iter().map(Unit::snapshot).collect())
    }

    /// Provides read-only access to a single unit.
    #[must_use]
    pub fn unit(world: &World, unit: UnitId) -> Option<&Unit> {
        world.units.iter().find(|candidate| candidate.id() == unit)
    }

    /// Captures a read-only view of the enemies on the battlefield.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Active phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.turns.phase()
    }

    /// Current turn number.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turns.turn()
    }

    /// Rules the world was configured with.
    #[must_use]
    pub fn rules(world: &World) -> &RulesConfig {
        &world.rules
    }

    /// Every shot resolved since the grid was last configured, oldest first.
    #[must_use]
    pub fn combat_log(world: &World) -> &[ShotOutcome] {
        &world.combat_log
    }

    /// Consecutive enemy cadences in which nobody could move.
    #[must_use]
    pub fn stalled_cadences(world: &World) -> u32 {
        world.enemy_clock.stalled()
    }

    /// Odds of a manual shot from `unit` at `target`.
    ///
    /// `None` when either side is unknown or walls break line of sight.
    #[must_use]
    pub fn shot_chances(world: &World, unit: UnitId, target: EnemyId) -> Option<ShotOdds> {
        let shooter = self::unit(world, unit)?;
        let enemy = world.enemies.iter().find(|enemy| enemy.id() == target)?;
        calc_shot_chances(
            shooter.cell(),
            enemy.cell(),
            world.grid.view(),
            &world.rules.combat,
            0,
        )
    }

    /// Reports whether `mover` may not enter the cell.
    ///
    /// Walls, cells off the grid, and cells held by any other occupant block.
    #[must_use]
    pub fn is_blocked_for(world: &World, cell: CellCoord, mover: Occupant) -> bool {
        if !world.grid.passable(cell) {
            return true;
        }
        match world.occupancy.occupant(cell) {
            Some(occupant) => occupant != mover,
            None => false,
        }
    }
}
