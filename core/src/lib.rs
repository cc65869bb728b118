#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Squad Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{
    CombatRules, EnemyRules, IsoProjection, Layout, RulesConfig, RulesError, SquadRules,
    WorldConfig,
};

/// Turn-level state the simulation is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The player issues orders to the squad.
    Player,
    /// Enemies advance and overwatching units react.
    Enemy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => f.write_str("PLAYER"),
            Self::Enemy => f.write_str("ENEMY"),
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the battlefield with an empty grid of the provided dimensions.
    ///
    /// Terrain, units, enemies, and turn state are all reset.
    ConfigureGrid {
        /// Number of columns laid out in the grid.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
    },
    /// Flips wall membership of a cell, evicting any crate under the new wall.
    ToggleWall {
        /// Cell whose wall state should flip.
        cell: CellCoord,
    },
    /// Flips crate membership of a cell. Refused on walls.
    ToggleCrate {
        /// Cell whose crate state should flip.
        cell: CellCoord,
    },
    /// Adds a new squad member at the provided cell.
    SpawnUnit {
        /// Cell the unit starts on.
        cell: CellCoord,
    },
    /// Places an enemy on an empty cell, or removes the enemy standing there.
    ToggleEnemy {
        /// Cell to place or clear.
        cell: CellCoord,
    },
    /// Snaps a unit onto a cell immediately, bypassing movement.
    PlaceUnit {
        /// Unit to relocate.
        unit: UnitId,
        /// Destination cell.
        cell: CellCoord,
    },
    /// Starts moving a unit along the provided tile path.
    ///
    /// The path excludes the unit's current cell and ends at the destination.
    MoveUnit {
        /// Unit ordered to move.
        unit: UnitId,
        /// Ordered tiles to traverse.
        path: Vec<CellCoord>,
    },
    /// Arms overwatch for a unit, ending its turn.
    SetOverwatch {
        /// Unit entering overwatch.
        unit: UnitId,
    },
    /// Disarms overwatch for a unit without refunding action points.
    ClearOverwatch {
        /// Unit leaving overwatch.
        unit: UnitId,
    },
    /// Refills a unit's clip.
    Reload {
        /// Unit reloading.
        unit: UnitId,
    },
    /// Fires a manual shot from a unit at an enemy, ending the unit's turn.
    Fire {
        /// Unit pulling the trigger.
        unit: UnitId,
        /// Enemy being targeted.
        target: EnemyId,
    },
    /// Hands control to the enemy phase.
    EndPlayerTurn,
    /// Assigns the tiles an enemy will attempt to walk during the enemy phase.
    AssignEnemyRoute {
        /// Enemy receiving the route.
        enemy: EnemyId,
        /// Ordered tiles excluding the enemy's current cell.
        route: Vec<CellCoord>,
    },
    /// Returns control to the player once enemy actions are exhausted.
    CompleteEnemyTurn,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the battlefield was replaced with an empty grid.
    GridConfigured {
        /// Dimensions of the new grid.
        bounds: GridBounds,
    },
    /// Reports that the terrain of a cell changed.
    TerrainChanged {
        /// Cell whose terrain changed.
        cell: CellCoord,
        /// Terrain now present on the cell.
        terrain: Terrain,
    },
    /// Confirms that a unit joined the squad.
    UnitSpawned {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Confirms that a unit was snapped onto a cell.
    UnitPlaced {
        /// Unit that was relocated.
        unit: UnitId,
        /// Cell the unit now occupies.
        cell: CellCoord,
    },
    /// Confirms that an enemy was placed on the battlefield.
    EnemyPlaced {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Cell the enemy occupies.
        cell: CellCoord,
        /// Hit points the enemy starts with.
        health: u32,
    },
    /// Confirms that an enemy was removed by an editor toggle.
    EnemyRemoved {
        /// Enemy that was removed.
        enemy: EnemyId,
        /// Cell the enemy occupied.
        cell: CellCoord,
    },
    /// Confirms that a unit accepted a movement order.
    UnitMoveStarted {
        /// Unit that started moving.
        unit: UnitId,
        /// Cell the unit departed from.
        from: CellCoord,
        /// Destination cell of the move.
        to: CellCoord,
        /// Action points charged when the move completes.
        ap_cost: u32,
    },
    /// Confirms that a unit finished its movement and settled on a cell.
    UnitArrived {
        /// Unit that arrived.
        unit: UnitId,
        /// Cell the unit settled on.
        cell: CellCoord,
        /// Action points left after paying for the move.
        ap_remaining: u32,
    },
    /// Confirms that a unit armed overwatch.
    OverwatchSet {
        /// Unit on overwatch.
        unit: UnitId,
    },
    /// Confirms that a unit's overwatch was cleared.
    OverwatchCleared {
        /// Unit no longer on overwatch.
        unit: UnitId,
    },
    /// Confirms that a unit refilled its clip.
    Reloaded {
        /// Unit that reloaded.
        unit: UnitId,
        /// Rounds now loaded.
        ammo: u32,
    },
    /// Reports the structured outcome of a resolved shot.
    ShotResolved {
        /// Everything the shot did.
        outcome: ShotOutcome,
    },
    /// Reports that an enemy was killed and removed from the roster.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Cell the enemy died on.
        cell: CellCoord,
    },
    /// Confirms that an enemy accepted a route for the current enemy phase.
    EnemyRouteAssigned {
        /// Enemy that received the route.
        enemy: EnemyId,
        /// Number of tiles in the route.
        steps: u32,
        /// Number of tiles the enemy may walk this turn.
        budget: u32,
    },
    /// Confirms that an enemy moved one tile.
    EnemyAdvanced {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Cell the enemy left.
        from: CellCoord,
        /// Cell the enemy entered.
        to: CellCoord,
    },
    /// Reports that a whole enemy cadence passed without any enemy moving.
    EnemyStepsStalled {
        /// Number of consecutive stalled cadences, including this one.
        consecutive: u32,
    },
    /// Announces that the turn state machine entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
        /// Turn counter after the transition.
        turn: u32,
    },
    /// Reports that a command was refused without mutating the world.
    OrderRejected {
        /// Kind of order that was refused.
        order: OrderKind,
        /// Specific reason the order failed.
        reason: OrderError,
    },
}

/// Kinds of orders the world may refuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// [`Command::ToggleWall`].
    ToggleWall,
    /// [`Command::ToggleCrate`].
    ToggleCrate,
    /// [`Command::SpawnUnit`].
    SpawnUnit,
    /// [`Command::ToggleEnemy`].
    ToggleEnemy,
    /// [`Command::PlaceUnit`].
    PlaceUnit,
    /// [`Command::MoveUnit`].
    Move,
    /// [`Command::SetOverwatch`].
    SetOverwatch,
    /// [`Command::ClearOverwatch`].
    ClearOverwatch,
    /// [`Command::Reload`].
    Reload,
    /// [`Command::Fire`].
    Fire,
    /// [`Command::EndPlayerTurn`].
    EndPlayerTurn,
    /// [`Command::AssignEnemyRoute`].
    AssignEnemyRoute,
    /// [`Command::CompleteEnemyTurn`].
    CompleteEnemyTurn,
}

/// Reasons an order may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderError {
    /// The order is only valid during the player phase.
    NotPlayerPhase,
    /// The order is only valid during the enemy phase.
    NotEnemyPhase,
    /// No unit with the provided identifier exists.
    UnknownUnit,
    /// No enemy with the provided identifier exists.
    UnknownEnemy,
    /// The unit is still walking a previous path.
    UnitMoving,
    /// The unit cannot pay the action point cost.
    InsufficientAp,
    /// The unit has no rounds loaded.
    NoAmmo,
    /// The unit's clip is already full.
    ClipFull,
    /// The unit is already on overwatch.
    AlreadyOnOverwatch,
    /// The unit is not on overwatch.
    NotOnOverwatch,
    /// The path is empty, not contiguous, or crosses impassable tiles.
    InvalidPath,
    /// The destination or an intermediate tile is held by another occupant.
    DestinationOccupied,
    /// The target cannot be seen from the shooter's cell.
    NoLineOfSight,
    /// The cell lies outside the grid.
    OutOfBounds,
    /// The cell is held by a wall, unit, or enemy.
    Occupied,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotPlayerPhase => "not the player phase",
            Self::NotEnemyPhase => "not the enemy phase",
            Self::UnknownUnit => "unknown unit",
            Self::UnknownEnemy => "unknown enemy",
            Self::UnitMoving => "unit is moving",
            Self::InsufficientAp => "not enough action points",
            Self::NoAmmo => "no ammo",
            Self::ClipFull => "clip is full",
            Self::AlreadyOnOverwatch => "already on overwatch",
            Self::NotOnOverwatch => "not on overwatch",
            Self::InvalidPath => "invalid path",
            Self::DestinationOccupied => "destination occupied",
            Self::NoLineOfSight => "no line of sight",
            Self::OutOfBounds => "out of bounds",
            Self::Occupied => "cell occupied",
        };
        f.write_str(text)
    }
}

/// Cardinal directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row offsets of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Unique identifier assigned to a squad member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Cell one step away in the provided direction, if it stays within bounds.
    #[must_use]
    pub fn step(self, direction: Direction, bounds: GridBounds) -> Option<CellCoord> {
        let (dc, dr) = direction.offset();
        let column = u32::try_from(i64::from(self.column) + dc).ok()?;
        let row = u32::try_from(i64::from(self.row) + dr).ok()?;
        let cell = CellCoord::new(column, row);
        bounds.contains(cell).then_some(cell)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Dimensions of the rectangular battlefield grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    columns: u32,
    rows: u32,
}

impl GridBounds {
    /// Creates a new bounds descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// In-bounds cells sharing an edge with `cell`, ordered east, west, south, north.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let bounds = *self;
        [
            Direction::East,
            Direction::West,
            Direction::South,
            Direction::North,
        ]
        .into_iter()
        .filter_map(move |direction| cell.step(direction, bounds))
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Static content of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Nothing on the cell.
    #[default]
    Open,
    /// Half-cover prop: passable and transparent to line of sight.
    Crate,
    /// Full-cover obstacle: impassable and opaque to line of sight.
    Wall,
}

/// Read-only view into the dense terrain grid.
#[derive(Clone, Copy, Debug)]
pub struct TerrainView<'a> {
    cells: &'a [Terrain],
    bounds: GridBounds,
}

impl<'a> TerrainView<'a> {
    /// Captures a new terrain view backed by the provided row-major slice.
    #[must_use]
    pub fn new(cells: &'a [Terrain], bounds: GridBounds) -> Self {
        Self { cells, bounds }
    }

    /// Dimensions of the underlying grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        self.bounds.contains(cell)
    }

    /// Terrain stored for the cell, if it lies inside the grid.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<Terrain> {
        self.bounds
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell holds a wall.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.terrain(cell) == Some(Terrain::Wall)
    }

    /// Reports whether the cell holds a crate.
    #[must_use]
    pub fn is_crate(&self, cell: CellCoord) -> bool {
        self.terrain(cell) == Some(Terrain::Crate)
    }

    /// Reports whether the cell can be walked on. Out-of-bounds cells never can.
    #[must_use]
    pub fn passable(&self, cell: CellCoord) -> bool {
        matches!(self.terrain(cell), Some(Terrain::Open | Terrain::Crate))
    }

    /// Iterator over all wall cells in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = CellCoord> + 'a {
        let view = *self;
        self.bounds.cells().filter(move |cell| view.is_wall(*cell))
    }

    /// Iterator over all crate cells in row-major order.
    pub fn crates(&self) -> impl Iterator<Item = CellCoord> + 'a {
        let view = *self;
        self.bounds.cells().filter(move |cell| view.is_crate(*cell))
    }
}

/// Dynamic occupant of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// A squad member stands on, or is walking into, the cell.
    Unit(UnitId),
    /// An enemy stands on the cell.
    Enemy(EnemyId),
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<Occupant>],
    bounds: GridBounds,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<Occupant>], bounds: GridBounds) -> Self {
        Self { cells, bounds }
    }

    /// Returns the occupant of the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.bounds
            .index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether no unit or enemy holds the cell.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.occupant(cell).is_none()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }
}

/// Cover granted by the tile adjacent to one side of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoverLevel {
    /// Nothing to hide behind.
    None,
    /// A crate on that side.
    Half,
    /// A wall on that side.
    Full,
}

/// Distinguishes player-initiated shots from overwatch reactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireMode {
    /// Shot ordered by the player; ends the shooter's turn.
    Manual,
    /// Overwatch reaction; action points were paid when overwatch was armed.
    Reaction,
}

impl fmt::Display for FireMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("Shot"),
            Self::Reaction => f.write_str("OVERWATCH"),
        }
    }
}

/// Odds of a shot that has line of sight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShotOdds {
    /// Chance to hit, in percent.
    pub hit: u8,
    /// Chance that a hit is critical, in percent.
    pub crit: u8,
    /// Cover on the side of the target facing the shooter.
    pub cover: CoverLevel,
    /// Whether the target has no cover against the shooter.
    pub flanked: bool,
}

/// Structured outcome of a resolved shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShotOutcome {
    /// Unit that fired.
    pub shooter: UnitId,
    /// Enemy that was targeted.
    pub target: EnemyId,
    /// Cell the target stood on.
    pub cell: CellCoord,
    /// Manual fire or overwatch reaction.
    pub mode: FireMode,
    /// Odds the shot was resolved against.
    pub odds: ShotOdds,
    /// Whether the shot connected.
    pub hit: bool,
    /// Whether the hit was critical.
    pub crit: bool,
    /// Damage dealt; zero on a miss.
    pub damage: u32,
    /// Whether the target died.
    pub killed: bool,
}

impl fmt::Display for ShotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.hit {
            return write!(f, "{} {}: MISS", self.mode, self.cell);
        }
        write!(f, "{} {}: HIT for {}", self.mode, self.cell, self.damage)?;
        if self.crit {
            f.write_str(" (CRIT)")?;
        }
        if self.killed {
            f.write_str(" - KILL")?;
        }
        Ok(())
    }
}

/// Immutable representation of a single squad member used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Authoritative grid cell of the unit.
    pub cell: CellCoord,
    /// Continuous pixel position used for animated movement.
    pub position: Vec2,
    /// Destination of the move in progress, if any.
    pub destination: Option<CellCoord>,
    /// Action points left this turn.
    pub ap: u32,
    /// Action points restored at the start of each player phase.
    pub ap_max: u32,
    /// Rounds loaded.
    pub ammo: u32,
    /// Clip capacity.
    pub clip_max: u32,
    /// Whether the unit is on overwatch.
    pub overwatch: bool,
}

impl UnitSnapshot {
    /// Reports whether the unit is walking a path.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.destination.is_some()
    }

    /// Reports whether the unit may still act this turn.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.destination.is_none() && self.ap > 0
    }
}

/// Read-only snapshot describing all squad members.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the unit with the provided identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Snapshot of the unit standing on the provided cell.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Number of captured units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Grid cell the enemy occupies.
    pub cell: CellCoord,
    /// Remaining hit points.
    pub health: u32,
    /// Head of the assigned route, if any.
    pub next_step: Option<CellCoord>,
    /// Tiles left on the assigned route.
    pub route_remaining: u32,
    /// Tiles the enemy may still walk this turn.
    pub budget: u32,
}

impl EnemySnapshot {
    /// Reports whether the enemy still intends to move this turn.
    #[must_use]
    pub const fn has_pending_steps(&self) -> bool {
        self.budget > 0 && self.route_remaining > 0
    }
}

/// Read-only snapshot describing all enemies on the battlefield.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the enemy standing on the provided cell.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}
