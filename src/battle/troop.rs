//! Troop types and the troop-vs-troop counter table
//!
//! Counters are fixed multipliers one troop type earns when engaging a
//! specific other troop type. Pairs not listed are neutral (1.0).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of troops making up a combat unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TroopType {
    Infantry,    // Line foot soldiers
    Cavalry,     // Mobile, decisive in pursuit
    Archer,      // Ranged
    Spearman,    // Anti-cavalry
    Crossbowman, // Heavier ranged
    Shielded,    // Defensive, anti-missile
    Navy,        // River and marsh specialists
    Siege,       // Engines and sappers
}

impl TroopType {
    pub const ALL: [TroopType; 8] = [
        TroopType::Infantry,
        TroopType::Cavalry,
        TroopType::Archer,
        TroopType::Spearman,
        TroopType::Crossbowman,
        TroopType::Shielded,
        TroopType::Navy,
        TroopType::Siege,
    ];

    /// Counter multiplier this troop type earns against `opponent`
    ///
    /// Always >= 1.0; 1.0 means no counter relationship.
    pub fn counter_bonus(&self, opponent: TroopType) -> f32 {
        use TroopType::*;
        match (*self, opponent) {
            (Infantry, Archer) => 1.2,
            (Cavalry, Infantry) => 1.3,
            (Spearman, Cavalry) => 1.3,
            (Archer, Spearman) => 1.2,
            (Crossbowman, Infantry) => 1.2,
            (Crossbowman, Spearman) => 1.2,
            (Shielded, Archer) => 1.5,
            (Shielded, Crossbowman) => 1.3,
            _ => 1.0,
        }
    }

    /// Does this troop type fight at range?
    pub fn is_ranged(&self) -> bool {
        matches!(self, TroopType::Archer | TroopType::Crossbowman)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TroopType::Infantry => "Infantry",
            TroopType::Cavalry => "Cavalry",
            TroopType::Archer => "Archer",
            TroopType::Spearman => "Spearman",
            TroopType::Crossbowman => "Crossbowman",
            TroopType::Shielded => "Shielded",
            TroopType::Navy => "Navy",
            TroopType::Siege => "Siege",
        }
    }
}

impl fmt::Display for TroopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_bonuses_never_below_one() {
        for attacker in TroopType::ALL {
            for defender in TroopType::ALL {
                assert!(attacker.counter_bonus(defender) >= 1.0);
            }
        }
    }

    #[test]
    fn test_spearmen_counter_cavalry() {
        assert_eq!(TroopType::Spearman.counter_bonus(TroopType::Cavalry), 1.3);
        assert_eq!(TroopType::Cavalry.counter_bonus(TroopType::Spearman), 1.0);
    }

    #[test]
    fn test_navy_and_siege_have_no_counters() {
        for opponent in TroopType::ALL {
            assert_eq!(TroopType::Navy.counter_bonus(opponent), 1.0);
            assert_eq!(TroopType::Siege.counter_bonus(opponent), 1.0);
        }
    }

    #[test]
    fn test_ranged_types() {
        assert!(TroopType::Archer.is_ranged());
        assert!(TroopType::Crossbowman.is_ranged());
        assert!(!TroopType::Shielded.is_ranged());
    }
}
