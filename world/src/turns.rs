//! Player and enemy phase bookkeeping.

use squad_tactics_core::Phase;

/// Two-phase turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnManager {
    phase: Phase,
    turn: u32,
}

impl TurnManager {
    /// Starts at turn one in the player phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Player,
            turn: 1,
        }
    }

    /// Active phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current turn number, starting at one.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Hands control to the enemy. Returns `false` outside the player phase.
    pub fn end_player_turn(&mut self) -> bool {
        if self.phase != Phase::Player {
            return false;
        }
        self.phase = Phase::Enemy;
        true
    }

    /// Returns control to the player and advances the turn counter.
    /// Returns `false` outside the enemy phase.
    pub fn complete_enemy_turn(&mut self) -> bool {
        if self.phase != Phase::Enemy {
            return false;
        }
        self.phase = Phase::Player;
        self.turn = self.turn.saturating_add(1);
        true
    }
}

impl Default for TurnManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_alternate_and_turns_count_up() {
        let mut turns = TurnManager::new();
        assert!(!turns.complete_enemy_turn());
        assert!(turns.end_player_turn());
        assert!(!turns.end_player_turn());
        assert_eq!(turns.phase(), Phase::Enemy);
        assert_eq!(turns.turn(), 1);
        assert!(turns.complete_enemy_turn());
        assert_eq!((turns.phase(), turns.turn()), (Phase::Player, 2));
    }
}
