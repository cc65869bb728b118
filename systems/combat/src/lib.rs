#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shot odds and adjudication.
//!
//! Odds depend only on terrain and the rules, so previews and resolution share
//! one calculation. Randomness is drawn up front into [`ShotRolls`] from a
//! caller-owned generator, and [`adjudicate`] turns odds plus rolls into a
//! result without touching any random state.

use rand::Rng;
use squad_tactics_core::{CellCoord, CombatRules, CoverLevel, ShotOdds, TerrainView};
use squad_tactics_system_cover::facing_cover;
use squad_tactics_system_line_of_sight::visible;

/// Computes the odds of `shooter` hitting `target`.
///
/// Returns `None` when walls break line of sight. `aim_delta` shifts aim
/// before cover is applied; overwatch passes the negated reaction malus.
#[must_use]
pub fn calc_shot_chances(
    shooter: CellCoord,
    target: CellCoord,
    terrain: TerrainView<'_>,
    rules: &CombatRules,
    aim_delta: i32,
) -> Option<ShotOdds> {
    if !visible(terrain, shooter, target) {
        return None;
    }

    let cover = facing_cover(terrain, shooter, target);
    let flanked = cover == CoverLevel::None;

    let mut aim = rules.base_aim.saturating_add(aim_delta);
    if flanked {
        aim = aim.saturating_add(rules.flank_aim_bonus);
    }
    let defense = match cover {
        CoverLevel::Full => rules.cover_full_def,
        CoverLevel::Half => rules.cover_half_def,
        CoverLevel::None => 0,
    };
    let hit = aim
        .saturating_sub(defense)
        .clamp(rules.hit_floor.min(rules.hit_ceil), rules.hit_ceil);

    let mut crit = rules.base_crit;
    if flanked {
        crit = crit.saturating_add(rules.flank_crit_bonus);
    }

    Some(ShotOdds {
        hit: as_percent(hit),
        crit: as_percent(crit),
        cover,
        flanked,
    })
}

fn as_percent(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(100)
}

/// Random draws consumed by a single shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShotRolls {
    /// Uniform roll in `1..=100`; the shot hits when it does not exceed the hit chance.
    pub hit_roll: u8,
    /// Uniform roll in `1..=100`; a hit is critical when it does not exceed the crit chance.
    pub crit_roll: u8,
    /// Base damage drawn uniformly from the configured range.
    pub damage: u32,
}

impl ShotRolls {
    /// Draws the rolls for one shot, always consuming exactly three values.
    pub fn draw<R>(rng: &mut R, rules: &CombatRules) -> Self
    where
        R: Rng + ?Sized,
    {
        let hit_roll = rng.gen_range(1..=100_u8);
        let crit_roll = rng.gen_range(1..=100_u8);
        let (low, high) = if rules.dmg_min <= rules.dmg_max {
            (rules.dmg_min, rules.dmg_max)
        } else {
            (rules.dmg_max, rules.dmg_min)
        };
        let damage = rng.gen_range(low..=high);
        Self {
            hit_roll,
            crit_roll,
            damage,
        }
    }
}

/// Outcome of a shot before it is applied to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShotResult {
    /// Whether the shot connected.
    pub hit: bool,
    /// Whether the hit was critical.
    pub crit: bool,
    /// Damage dealt; zero on a miss.
    pub damage: u32,
    /// Whether the damage meets or exceeds the target's remaining health.
    pub killed: bool,
}

/// Resolves a shot from its odds and pre-drawn rolls.
#[must_use]
pub fn adjudicate(
    odds: ShotOdds,
    rolls: ShotRolls,
    rules: &CombatRules,
    target_health: u32,
) -> ShotResult {
    let hit = rolls.hit_roll <= odds.hit;
    if !hit {
        return ShotResult {
            hit: false,
            crit: false,
            damage: 0,
            killed: false,
        };
    }

    let crit = rolls.crit_roll <= odds.crit;
    let mut damage = rolls.damage;
    if crit {
        damage = damage.saturating_add(rules.crit_bonus_dmg);
    }
    ShotResult {
        hit,
        crit,
        damage,
        killed: damage >= target_health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_tactics_core::{GridBounds, Terrain};

    fn open_field(columns: u32, rows: u32) -> Vec<Terrain> {
        vec![Terrain::Open; GridBounds::new(columns, rows).cell_count()]
    }

    #[test]
    fn flanked_target_gets_full_aim_and_bonus_crit() {
        let bounds = GridBounds::new(8, 8);
        let cells = open_field(8, 8);
        let terrain = TerrainView::new(&cells, bounds);
        let rules = CombatRules::default();

        let odds = calc_shot_chances(
            CellCoord::new(0, 0),
            CellCoord::new(5, 0),
            terrain,
            &rules,
            0,
        )
        .expect("open ground has line of sight");

        assert_eq!(
            odds,
            ShotOdds {
                hit: 65,
                crit: 50,
                cover: CoverLevel::None,
                flanked: true,
            }
        );
    }

    #[test]
    fn full_cover_and_overwatch_malus_stack() {
        let bounds = GridBounds::new(8, 8);
        let mut cells = open_field(8, 8);
        let wall = CellCoord::new(4, 3);
        if let Some(index) = bounds.index(wall) {
            cells[index] = Terrain::Wall;
        }
        let terrain = TerrainView::new(&cells, bounds);
        let rules = CombatRules::default();

        let odds = calc_shot_chances(
            CellCoord::new(3, 4),
            CellCoord::new(4, 4),
            terrain,
            &rules,
            -rules.overwatch_aim_malus,
        )
        .expect("adjacent cells always see each other");
        assert_eq!(odds.cover, CoverLevel::None);

        let odds = calc_shot_chances(
            CellCoord::new(4, 0),
            CellCoord::new(4, 4),
            terrain,
            &rules,
            -rules.overwatch_aim_malus,
        );
        assert_eq!(odds, None);

        let odds = calc_shot_chances(
            CellCoord::new(6, 0),
            CellCoord::new(4, 4),
            terrain,
            &rules,
            -rules.overwatch_aim_malus,
        )
        .expect("the diagonal clears the wall");
        assert_eq!(odds.cover, CoverLevel::Full);
        assert!(!odds.flanked);
        assert_eq!(odds.hit, 10);
        assert_eq!(odds.crit, 10);
    }

    #[test]
    fn hit_chance_never_drops_below_floor() {
        let bounds = GridBounds::new(3, 1);
        let mut cells = open_field(3, 1);
        cells[1] = Terrain::Crate;
        let terrain = TerrainView::new(&cells, bounds);
        let rules = CombatRules {
            base_aim: 10,
            ..CombatRules::default()
        };

        let odds = calc_shot_chances(
            CellCoord::new(0, 0),
            CellCoord::new(2, 0),
            terrain,
            &rules,
            -50,
        )
        .expect("crates do not block sight");
        assert_eq!(odds.cover, CoverLevel::Half);
        assert_eq!(odds.hit, 5);
    }

    #[test]
    fn adjudication_applies_crit_bonus_and_kill() {
        let rules = CombatRules::default();
        let odds = ShotOdds {
            hit: 60,
            crit: 20,
            cover: CoverLevel::None,
            flanked: true,
        };

        let crit = adjudicate(
            odds,
            ShotRolls {
                hit_roll: 60,
                crit_roll: 20,
                damage: 3,
            },
            &rules,
            5,
        );
        assert_eq!(
            crit,
            ShotResult {
                hit: true,
                crit: true,
                damage: 5,
                killed: true,
            }
        );

        let graze = adjudicate(
            odds,
            ShotRolls {
                hit_roll: 1,
                crit_roll: 21,
                damage: 4,
            },
            &rules,
            5,
        );
        assert!(graze.hit && !graze.crit && !graze.killed);
        assert_eq!(graze.damage, 4);

        let miss = adjudicate(
            odds,
            ShotRolls {
                hit_roll: 61,
                crit_roll: 1,
                damage: 5,
            },
            &rules,
            1,
        );
        assert_eq!(miss.damage, 0);
        assert!(!miss.killed);
    }
}
