#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player-phase system that turns squad input into world commands and previews.

use std::fmt;

use squad_tactics_core::{
    CellCoord, CombatRules, Command, EnemyId, Event, GridBounds, Phase, ShotOdds, SquadRules,
    TerrainView, UnitId, UnitSnapshot, UnitView,
};
use squad_tactics_system_combat::calc_shot_chances;
use squad_tactics_system_pathfinding::{movement_tiers, preview_path, MoveTiers, PathPreview};

/// Order requested by the player for the selected unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderAction {
    /// Walk to the provided cell along the shortest route.
    MoveTo(CellCoord),
    /// Shoot at the provided enemy.
    FireAt(EnemyId),
    /// Arm overwatch.
    Overwatch,
    /// Refill the clip.
    Reload,
    /// Hand the turn to the enemy.
    EndTurn,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderInput {
    /// Unit currently selected by the player.
    pub selected: Option<UnitId>,
    /// Order issued on this frame, if any.
    pub action: Option<OrderAction>,
}

impl OrderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(selected: Option<UnitId>, action: Option<OrderAction>) -> Self {
        Self { selected, action }
    }
}

/// Squad system that translates player input into commands during the player phase.
#[derive(Debug, Clone)]
pub struct SquadOrders {
    phase: Phase,
}

impl Default for SquadOrders {
    fn default() -> Self {
        Self::new()
    }
}

impl SquadOrders {
    /// Creates a new squad order system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Player,
        }
    }

    /// Consumes world events and player input to emit squad commands.
    ///
    /// Moves are only issued when a path exists within two action points of
    /// tiles and the selected unit can pay for it; every other order is passed
    /// through for the world to validate.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: OrderInput,
        units: &UnitView,
        bounds: GridBounds,
        squad: &SquadRules,
        is_blocked: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        for event in events {
            match event {
                Event::PhaseChanged { phase, .. } => self.phase = *phase,
                Event::GridConfigured { .. } => self.phase = Phase::Player,
                _ => {}
            }
        }

        if self.phase != Phase::Player {
            return;
        }
        let Some(action) = input.action else {
            return;
        };
        if action == OrderAction::EndTurn {
            out.push(Command::EndPlayerTurn);
            return;
        }
        let Some(unit) = input.selected.and_then(|id| units.get(id)) else {
            return;
        };

        match action {
            OrderAction::MoveTo(goal) => {
                let Some(preview) = path_preview(unit, goal, bounds, squad, is_blocked) else {
                    return;
                };
                if preview.affordable(unit.ap) {
                    out.push(Command::MoveUnit {
                        unit: unit.id,
                        path: preview.path,
                    });
                }
            }
            OrderAction::FireAt(target) => out.push(Command::Fire {
                unit: unit.id,
                target,
            }),
            OrderAction::Overwatch => out.push(Command::SetOverwatch { unit: unit.id }),
            OrderAction::Reload => out.push(Command::Reload { unit: unit.id }),
            OrderAction::EndTurn => {}
        }
    }
}

/// Cells the unit could walk to for one or two action points.
///
/// Units that are already walking have no range.
pub fn movement_range<F>(
    unit: &UnitSnapshot,
    bounds: GridBounds,
    squad: &SquadRules,
    is_blocked: F,
) -> MoveTiers
where
    F: Fn(CellCoord) -> bool,
{
    if unit.is_moving() {
        return MoveTiers::default();
    }
    let origin = unit.cell;
    movement_tiers(origin, squad.tiles_per_ap, unit.ap, bounds, |cell| {
        cell != origin && is_blocked(cell)
    })
}

/// Path, step count and action point cost of walking `unit` to `goal`.
pub fn path_preview<F>(
    unit: &UnitSnapshot,
    goal: CellCoord,
    bounds: GridBounds,
    squad: &SquadRules,
    is_blocked: F,
) -> Option<PathPreview>
where
    F: Fn(CellCoord) -> bool,
{
    if unit.is_moving() {
        return None;
    }
    let origin = unit.cell;
    preview_path(origin, goal, bounds, squad, |cell| {
        cell != origin && is_blocked(cell)
    })
}

/// Odds display for a hovered target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotPreview {
    /// Walls break line of sight.
    NoLineOfSight,
    /// The shot can be taken.
    Odds {
        /// Hit and crit chances.
        odds: ShotOdds,
        /// Lowest base damage.
        dmg_min: u32,
        /// Highest base damage.
        dmg_max: u32,
        /// Extra damage on a critical hit.
        crit_bonus: u32,
    },
}

impl fmt::Display for ShotPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLineOfSight => f.write_str("NO LOS"),
            Self::Odds {
                odds,
                dmg_min,
                dmg_max,
                crit_bonus,
            } => {
                write!(
                    f,
                    "HIT {}%   CRIT {}%   DMG {dmg_min}-{dmg_max}",
                    odds.hit, odds.crit
                )?;
                if *crit_bonus > 0 {
                    write!(f, "(+{crit_bonus})")?;
                }
                Ok(())
            }
        }
    }
}

/// Previews a manual shot from `shooter` at `target`.
#[must_use]
pub fn shot_preview(
    shooter: CellCoord,
    target: CellCoord,
    terrain: TerrainView<'_>,
    rules: &CombatRules,
) -> ShotPreview {
    match calc_shot_chances(shooter, target, terrain, rules, 0) {
        Some(odds) => ShotPreview::Odds {
            odds,
            dmg_min: rules.dmg_min.min(rules.dmg_max),
            dmg_max: rules.dmg_min.max(rules.dmg_max),
            crit_bonus: rules.crit_bonus_dmg,
        },
        None => ShotPreview::NoLineOfSight,
    }
}

/// Cycles the selection to the next unit that is idle and has action points.
///
/// Scanning starts after `current` and wraps around. When nobody is ready the
/// unit right after `current` is chosen anyway.
#[must_use]
pub fn next_ready_unit(units: &UnitView, current: Option<UnitId>) -> Option<UnitId> {
    let snapshots: Vec<&UnitSnapshot> = units.iter().collect();
    if snapshots.is_empty() {
        return None;
    }
    let start = current
        .and_then(|id| snapshots.iter().position(|unit| unit.id == id))
        .map_or(0, |index| (index + 1) % snapshots.len());

    let ready = (0..snapshots.len())
        .map(|offset| snapshots[(start + offset) % snapshots.len()])
        .find(|unit| unit.is_ready());
    Some(ready.unwrap_or(snapshots[start]).id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_tactics_core::{CoverLevel, Terrain};

    fn unit(id: u32, cell: CellCoord, ap: u32) -> UnitSnapshot {
        UnitSnapshot {
            id: UnitId::new(id),
            cell,
            position: Default::default(),
            destination: None,
            ap,
            ap_max: 2,
            ammo: 3,
            clip_max: 3,
            overwatch: false,
        }
    }

    #[test]
    fn cycling_skips_spent_units_and_wraps() {
        let units = UnitView::from_snapshots(vec![
            unit(0, CellCoord::new(0, 0), 2),
            unit(1, CellCoord::new(1, 0), 0),
            unit(2, CellCoord::new(2, 0), 1),
        ]);

        assert_eq!(next_ready_unit(&units, None), Some(UnitId::new(0)));
        assert_eq!(
            next_ready_unit(&units, Some(UnitId::new(0))),
            Some(UnitId::new(2))
        );
        assert_eq!(
            next_ready_unit(&units, Some(UnitId::new(2))),
            Some(UnitId::new(0))
        );
    }

    #[test]
    fn cycling_without_ready_units_still_advances() {
        let units = UnitView::from_snapshots(vec![
            unit(0, CellCoord::new(0, 0), 0),
            unit(1, CellCoord::new(1, 0), 0),
        ]);

        assert_eq!(
            next_ready_unit(&units, Some(UnitId::new(0))),
            Some(UnitId::new(1))
        );
        assert_eq!(next_ready_unit(&UnitView::default(), None), None);
    }

    #[test]
    fn shot_preview_reads_like_the_hud() {
        let bounds = GridBounds::new(5, 5);
        let mut cells = vec![Terrain::Open; bounds.cell_count()];
        let terrain = TerrainView::new(&cells, bounds);
        let rules = CombatRules::default();

        let preview = shot_preview(CellCoord::new(0, 0), CellCoord::new(4, 0), terrain, &rules);
        assert_eq!(preview.to_string(), "HIT 65%   CRIT 50%   DMG 3-5(+2)");

        cells[2] = Terrain::Wall;
        let terrain = TerrainView::new(&cells, bounds);
        let preview = shot_preview(CellCoord::new(0, 0), CellCoord::new(4, 0), terrain, &rules);
        assert_eq!(preview, ShotPreview::NoLineOfSight);
        assert_eq!(preview.to_string(), "NO LOS");
    }

    #[test]
    fn crate_cover_shows_in_preview() {
        let bounds = GridBounds::new(5, 5);
        let mut cells = vec![Terrain::Open; bounds.cell_count()];
        cells[3] = Terrain::Crate;
        let terrain = TerrainView::new(&cells, bounds);

        let preview = shot_preview(
            CellCoord::new(0, 0),
            CellCoord::new(4, 0),
            terrain,
            &CombatRules::default(),
        );

        match preview {
            ShotPreview::Odds { odds, .. } => {
                assert_eq!(odds.cover, CoverLevel::Half);
                assert!(!odds.flanked);
                assert_eq!(odds.hit, 45);
                assert_eq!(odds.crit, 10);
            }
            ShotPreview::NoLineOfSight => panic!("crates do not block sight"),
        }
    }

    #[test]
    fn range_is_empty_while_walking() {
        let mut walker = unit(0, CellCoord::new(2, 2), 2);
        walker.destination = Some(CellCoord::new(4, 2));

        let tiers = movement_range(
            &walker,
            GridBounds::new(5, 5),
            &SquadRules::default(),
            |_| false,
        );
        assert_eq!(tiers, MoveTiers::default());
    }
}
