use std::collections::HashSet;

use proptest::prelude::*;
use squad_tactics_core::CellCoord;
use squad_tactics_system_line_of_sight::{bresenham_line, has_los};

fn cell() -> impl Strategy<Value = CellCoord> {
    (0u32..16, 0u32..16).prop_map(|(column, row)| CellCoord::new(column, row))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn sight_is_symmetric(
        from in cell(),
        to in cell(),
        walls in prop::collection::hash_set(cell(), 0..40),
    ) {
        let blocked = |cell: CellCoord| walls.contains(&cell);
        prop_assert_eq!(has_los(from, to, blocked), has_los(to, from, blocked));
    }

    #[test]
    fn lines_connect_endpoints_with_king_moves(from in cell(), to in cell()) {
        let line = bresenham_line(from, to);
        prop_assert_eq!(line.first().copied(), Some(from));
        prop_assert_eq!(line.last().copied(), Some(to));
        for pair in line.windows(2) {
            let dc = pair[0].column().abs_diff(pair[1].column());
            let dr = pair[0].row().abs_diff(pair[1].row());
            prop_assert!(dc <= 1 && dr <= 1 && dc + dr >= 1);
        }
        let unique: HashSet<_> = line.iter().copied().collect();
        prop_assert_eq!(unique.len(), line.len());
    }

    #[test]
    fn open_ground_is_always_visible(from in cell(), to in cell()) {
        prop_assert!(has_los(from, to, |_| false));
    }
}
