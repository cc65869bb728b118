//! Tunable rules, battlefield layout, and projection settings.
//!
//! Every section deserializes with serde defaults, so partial
//! configuration files only need to name the values they override.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, GridBounds};

/// Errors raised when a configuration cannot drive a consistent simulation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// A percentage lies outside `0..=100`.
    #[error("{field} must be a percentage in 0..=100, got {value}")]
    NotAPercentage {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: i32,
    },
    /// The hit chance floor exceeds the ceiling.
    #[error("hit_floor ({floor}) exceeds hit_ceil ({ceil})")]
    HitClampInverted {
        /// Configured floor.
        floor: i32,
        /// Configured ceiling.
        ceil: i32,
    },
    /// The minimum damage exceeds the maximum damage.
    #[error("dmg_min ({min}) exceeds dmg_max ({max})")]
    DamageRangeInverted {
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// A value that must be strictly positive was zero or negative.
    #[error("{field} must be positive")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The layout references a cell outside its own grid.
    #[error("{section} entry ({column}, {row}) lies outside the {columns}x{rows} grid")]
    LayoutOutOfBounds {
        /// Layout list containing the entry.
        section: &'static str,
        /// Column of the entry.
        column: u32,
        /// Row of the entry.
        row: u32,
        /// Grid columns.
        columns: u32,
        /// Grid rows.
        rows: u32,
    },
}

/// Percentages and damage values used to resolve shots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Aim before cover and modifiers.
    pub base_aim: i32,
    /// Crit chance before flanking.
    pub base_crit: i32,
    /// Crit chance added against flanked targets.
    pub flank_crit_bonus: i32,
    /// Aim added against flanked targets.
    pub flank_aim_bonus: i32,
    /// Defense granted by full cover.
    pub cover_full_def: i32,
    /// Defense granted by half cover.
    pub cover_half_def: i32,
    /// Lowest possible hit chance.
    pub hit_floor: i32,
    /// Highest possible hit chance.
    pub hit_ceil: i32,
    /// Minimum base damage of a hit.
    pub dmg_min: u32,
    /// Maximum base damage of a hit.
    pub dmg_max: u32,
    /// Damage added by a critical hit.
    pub crit_bonus_dmg: u32,
    /// Aim removed from overwatch reaction shots.
    pub overwatch_aim_malus: i32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            base_aim: 65,
            base_crit: 10,
            flank_crit_bonus: 40,
            flank_aim_bonus: 0,
            cover_full_def: 40,
            cover_half_def: 20,
            hit_floor: 5,
            hit_ceil: 95,
            dmg_min: 3,
            dmg_max: 5,
            crit_bonus_dmg: 2,
            overwatch_aim_malus: 15,
        }
    }
}

/// Action point economy and movement speed of squad members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadRules {
    /// Action points restored each player phase.
    pub ap_max: u32,
    /// Rounds per clip.
    pub clip_max: u32,
    /// Tiles a unit may walk per action point.
    pub tiles_per_ap: u32,
    /// Action points spent on a manual shot.
    pub shoot_cost: u32,
    /// Action points spent arming overwatch.
    pub overwatch_cost: u32,
    /// Action points spent reloading.
    pub reload_cost: u32,
    /// Walking speed in pixels per second.
    pub move_speed: f32,
}

impl SquadRules {
    /// Action points a path with `steps` tiles costs.
    #[must_use]
    pub fn movement_ap_cost(&self, steps: u32) -> u32 {
        if self.tiles_per_ap == 0 {
            return steps;
        }
        steps.div_ceil(self.tiles_per_ap)
    }

    /// Longest path, in tiles, that a movement preview may show.
    #[must_use]
    pub fn preview_cap(&self) -> u32 {
        self.tiles_per_ap.saturating_mul(2)
    }
}

impl Default for SquadRules {
    fn default() -> Self {
        Self {
            ap_max: 2,
            clip_max: 3,
            tiles_per_ap: 5,
            shoot_cost: 1,
            overwatch_cost: 1,
            reload_cost: 1,
            move_speed: 220.0,
        }
    }
}

/// Enemy toughness and enemy-phase pacing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRules {
    /// Hit points of newly placed enemies.
    pub default_hp: u32,
    /// Tiles each enemy may walk per enemy phase.
    pub steps_per_turn: u32,
    /// Simulation milliseconds between enemy steps.
    pub step_interval_ms: u64,
    /// Consecutive stalled cadences after which the enemy phase yields.
    pub stall_limit: u32,
}

impl Default for EnemyRules {
    fn default() -> Self {
        Self {
            default_hp: 3,
            steps_per_turn: 6,
            step_interval_ms: 150,
            stall_limit: 8,
        }
    }
}

/// Complete ruleset for a skirmish.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Shot resolution values.
    pub combat: CombatRules,
    /// Squad action economy.
    pub squad: SquadRules,
    /// Enemy stats and pacing.
    pub enemy: EnemyRules,
}

impl RulesConfig {
    /// Checks that the rules describe a consistent simulation.
    pub fn validate(&self) -> Result<(), RulesError> {
        let combat = &self.combat;
        for (field, value) in [
            ("base_crit", combat.base_crit),
            ("hit_floor", combat.hit_floor),
            ("hit_ceil", combat.hit_ceil),
        ] {
            if !(0..=100).contains(&value) {
                return Err(RulesError::NotAPercentage { field, value });
            }
        }
        if combat.hit_floor > combat.hit_ceil {
            return Err(RulesError::HitClampInverted {
                floor: combat.hit_floor,
                ceil: combat.hit_ceil,
            });
        }
        if combat.dmg_min > combat.dmg_max {
            return Err(RulesError::DamageRangeInverted {
                min: combat.dmg_min,
                max: combat.dmg_max,
            });
        }

        let squad = &self.squad;
        if squad.tiles_per_ap == 0 {
            return Err(RulesError::NotPositive {
                field: "tiles_per_ap",
            });
        }
        if squad.move_speed.is_nan() || squad.move_speed <= 0.0 {
            return Err(RulesError::NotPositive {
                field: "move_speed",
            });
        }
        if self.enemy.step_interval_ms == 0 {
            return Err(RulesError::NotPositive {
                field: "step_interval_ms",
            });
        }
        if self.enemy.stall_limit == 0 {
            return Err(RulesError::NotPositive {
                field: "stall_limit",
            });
        }
        Ok(())
    }
}

const DEMO_COLUMNS: u32 = 20;
const DEMO_ROWS: u32 = 20;

const fn demo_columns() -> u32 {
    DEMO_COLUMNS
}

const fn demo_rows() -> u32 {
    DEMO_ROWS
}

/// Initial battlefield: grid size, terrain, and spawn points.
///
/// A missing `[layout]` table yields the demo map. A table that is present
/// starts from an empty grid of the demo size, so cell lists left out of it
/// stay empty instead of inheriting demo entries that may not fit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Number of columns.
    #[serde(default = "demo_columns")]
    pub columns: u32,
    /// Number of rows.
    #[serde(default = "demo_rows")]
    pub rows: u32,
    /// Cells holding walls.
    #[serde(default)]
    pub walls: Vec<CellCoord>,
    /// Cells holding crates.
    #[serde(default)]
    pub crates: Vec<CellCoord>,
    /// Cells squad members start on.
    #[serde(default)]
    pub unit_spawns: Vec<CellCoord>,
    /// Cells enemies start on.
    #[serde(default)]
    pub enemy_spawns: Vec<CellCoord>,
}

impl Layout {
    /// Grid dimensions described by the layout.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        GridBounds::new(self.columns, self.rows)
    }

    /// Empty layout of the provided size.
    #[must_use]
    pub fn empty(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            walls: Vec::new(),
            crates: Vec::new(),
            unit_spawns: Vec::new(),
            enemy_spawns: Vec::new(),
        }
    }

    /// Checks that every listed cell lies on the grid.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(RulesError::NotPositive {
                field: "layout dimensions",
            });
        }
        let bounds = self.bounds();
        for (section, cells) in [
            ("walls", &self.walls),
            ("crates", &self.crates),
            ("unit_spawns", &self.unit_spawns),
            ("enemy_spawns", &self.enemy_spawns),
        ] {
            if let Some(cell) = cells.iter().find(|cell| !bounds.contains(**cell)) {
                return Err(RulesError::LayoutOutOfBounds {
                    section,
                    column: cell.column(),
                    row: cell.row(),
                    columns: self.columns,
                    rows: self.rows,
                });
            }
        }
        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        let mut walls: Vec<CellCoord> = (6..14).map(|row| CellCoord::new(10, row)).collect();
        walls.extend([
            CellCoord::new(8, 5),
            CellCoord::new(9, 5),
            CellCoord::new(9, 6),
        ]);

        Self {
            columns: DEMO_COLUMNS,
            rows: DEMO_ROWS,
            walls,
            crates: vec![CellCoord::new(6, 8), CellCoord::new(11, 9)],
            unit_spawns: vec![
                CellCoord::new(3, 10),
                CellCoord::new(4, 9),
                CellCoord::new(4, 11),
                CellCoord::new(5, 10),
            ],
            enemy_spawns: vec![
                CellCoord::new(16, 8),
                CellCoord::new(15, 12),
                CellCoord::new(17, 14),
            ],
        }
    }
}

/// Isometric 2:1 diamond projection between grid cells and pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoProjection {
    /// Width of a tile diamond in pixels.
    pub tile_width: f32,
    /// Height of a tile diamond in pixels.
    pub tile_height: f32,
    /// Screen position of the top vertex of tile (0, 0).
    pub origin: Vec2,
}

impl IsoProjection {
    /// Screen position of the top vertex of the cell's diamond.
    #[must_use]
    pub fn tile_top(&self, cell: CellCoord) -> Vec2 {
        let column = cell.column() as f32;
        let row = cell.row() as f32;
        Vec2::new(
            (column - row) * self.tile_width * 0.5 + self.origin.x,
            (column + row) * self.tile_height * 0.5 + self.origin.y,
        )
    }

    /// Screen position of the centre of the cell's diamond.
    #[must_use]
    pub fn tile_center(&self, cell: CellCoord) -> Vec2 {
        self.tile_top(cell) + Vec2::new(0.0, self.tile_height * 0.5)
    }

    /// Nearest grid coordinates of a screen position.
    ///
    /// The result may lie outside any particular grid; it is `None` only when
    /// the position maps to negative coordinates.
    #[must_use]
    pub fn screen_to_grid(&self, screen: Vec2) -> Option<CellCoord> {
        let half_w = self.tile_width * 0.5;
        let half_h = self.tile_height * 0.5;
        if half_w <= 0.0 || half_h <= 0.0 {
            return None;
        }
        let delta = screen - self.origin;
        let column = ((delta.x / half_w + delta.y / half_h) * 0.5).round();
        let row = ((delta.y / half_h - delta.x / half_w) * 0.5).round();
        if column < 0.0 || row < 0.0 || column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }
}

impl Default for IsoProjection {
    fn default() -> Self {
        Self {
            tile_width: 64.0,
            tile_height: 32.0,
            origin: Vec2::new(640.0, 100.0),
        }
    }
}

/// Everything needed to start a deterministic skirmish.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Ruleset.
    pub rules: RulesConfig,
    /// Starting battlefield.
    pub layout: Layout,
    /// Pixel projection used for animated movement.
    pub projection: IsoProjection,
    /// Seed of the session random source.
    pub seed: u64,
}

impl WorldConfig {
    /// Validates rules and layout together.
    pub fn validate(&self) -> Result<(), RulesError> {
        self.rules.validate()?;
        self.layout.validate()
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            layout: Layout::default(),
            projection: IsoProjection::default(),
            seed: 1337,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_validates() {
        assert_eq!(WorldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn movement_cost_rounds_up() {
        let squad = SquadRules::default();
        assert_eq!(squad.movement_ap_cost(0), 0);
        assert_eq!(squad.movement_ap_cost(1), 1);
        assert_eq!(squad.movement_ap_cost(5), 1);
        assert_eq!(squad.movement_ap_cost(6), 2);
        assert_eq!(squad.movement_ap_cost(10), 2);
        assert_eq!(squad.preview_cap(), 10);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: WorldConfig = toml::from_str(
            r#"
            seed = 7

            [rules.combat]
            base_aim = 80

            [layout]
            columns = 8
            rows = 6
            walls = [{ column = 2, row = 3 }]
            "#,
        )
        .expect("partial configuration parses");

        assert_eq!(config.seed, 7);
        assert_eq!(config.rules.combat.base_aim, 80);
        assert_eq!(config.rules.combat.hit_ceil, 95);
        assert_eq!(config.rules.squad, SquadRules::default());
        assert_eq!(config.layout.bounds(), GridBounds::new(8, 6));
        assert_eq!(config.layout.walls, vec![CellCoord::new(2, 3)]);
        assert!(config.layout.crates.is_empty());
        assert!(config.layout.unit_spawns.is_empty());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn missing_layout_table_keeps_the_demo_map() {
        let config: WorldConfig = toml::from_str("seed = 3").expect("seed-only file parses");
        assert_eq!(config.layout, Layout::default());

        let config: WorldConfig =
            toml::from_str("[layout]\nwalls = []\n").expect("layout table parses");
        assert_eq!(config.layout.bounds(), Layout::default().bounds());
        assert!(config.layout.enemy_spawns.is_empty());
    }

    #[test]
    fn inverted_hit_clamp_is_rejected() {
        let mut rules = RulesConfig::default();
        rules.combat.hit_floor = 90;
        rules.combat.hit_ceil = 10;
        assert_eq!(
            rules.validate(),
            Err(RulesError::HitClampInverted {
                floor: 90,
                ceil: 10
            })
        );
    }

    #[test]
    fn layout_entries_must_fit_the_grid() {
        let mut layout = Layout::empty(4, 4);
        layout.crates.push(CellCoord::new(4, 0));
        assert!(matches!(
            layout.validate(),
            Err(RulesError::LayoutOutOfBounds {
                section: "crates",
                ..
            })
        ));
    }

    #[test]
    fn projection_round_trips_tile_tops() {
        let projection = IsoProjection::default();
        for cell in [
            CellCoord::new(0, 0),
            CellCoord::new(7, 3),
            CellCoord::new(19, 19),
        ] {
            assert_eq!(projection.screen_to_grid(projection.tile_top(cell)), Some(cell));
        }
        assert_eq!(
            projection.tile_center(CellCoord::new(0, 0)),
            Vec2::new(640.0, 116.0)
        );
    }
}
