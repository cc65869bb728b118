use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squad_tactics_core::{CellCoord, CombatRules, GridBounds, Terrain, TerrainView};
use squad_tactics_system_combat::{adjudicate, calc_shot_chances, ShotRolls};

const SIDE: u32 = 10;

fn cell() -> impl Strategy<Value = CellCoord> {
    (0..SIDE, 0..SIDE).prop_map(|(column, row)| CellCoord::new(column, row))
}

fn terrain_cells() -> impl Strategy<Value = Vec<Terrain>> {
    let tile = prop_oneof![
        6 => Just(Terrain::Open),
        2 => Just(Terrain::Crate),
        1 => Just(Terrain::Wall),
    ];
    prop::collection::vec(tile, (SIDE * SIDE) as usize)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn odds_respect_configured_clamps(
        shooter in cell(),
        target in cell(),
        cells in terrain_cells(),
        aim_delta in -200i32..200,
        base_aim in 0i32..150,
        base_crit in 0i32..100,
    ) {
        let terrain = TerrainView::new(&cells, GridBounds::new(SIDE, SIDE));
        let rules = CombatRules {
            base_aim,
            base_crit,
            ..CombatRules::default()
        };

        if let Some(odds) = calc_shot_chances(shooter, target, terrain, &rules, aim_delta) {
            let hit = i32::from(odds.hit);
            prop_assert!(hit >= rules.hit_floor && hit <= rules.hit_ceil);
            prop_assert!(odds.crit <= 100);
        }
    }

    #[test]
    fn drawn_rolls_stay_in_range(seed in any::<u64>(), dmg_min in 0u32..6, spread in 0u32..6) {
        let rules = CombatRules {
            dmg_min,
            dmg_max: dmg_min + spread,
            ..CombatRules::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..16 {
            let rolls = ShotRolls::draw(&mut rng, &rules);
            prop_assert!((1..=100).contains(&rolls.hit_roll));
            prop_assert!((1..=100).contains(&rolls.crit_roll));
            prop_assert!(rolls.damage >= rules.dmg_min && rolls.damage <= rules.dmg_max);
        }
    }
}

#[test]
fn same_seed_draws_same_rolls() {
    let rules = CombatRules::default();
    let mut first = ChaCha8Rng::seed_from_u64(1337);
    let mut second = ChaCha8Rng::seed_from_u64(1337);

    for _ in 0..32 {
        assert_eq!(
            ShotRolls::draw(&mut first, &rules),
            ShotRolls::draw(&mut second, &rules)
        );
    }
}

#[test]
fn certain_hit_kills_three_health_enemy_with_four_damage() {
    let cells = vec![Terrain::Open; 16];
    let terrain = TerrainView::new(&cells, GridBounds::new(4, 4));
    let rules = CombatRules {
        hit_floor: 100,
        hit_ceil: 100,
        base_crit: 0,
        flank_crit_bonus: 0,
        dmg_min: 4,
        dmg_max: 4,
        ..CombatRules::default()
    };
    let odds = calc_shot_chances(CellCoord::new(0, 0), CellCoord::new(3, 3), terrain, &rules, 0)
        .expect("open ground");
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let result = adjudicate(odds, ShotRolls::draw(&mut rng, &rules), &rules, 3);

    assert!(result.hit);
    assert!(!result.crit);
    assert_eq!(result.damage, 4);
    assert!(result.killed);
}
