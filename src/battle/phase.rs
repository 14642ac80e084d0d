//! Phases of a combat round

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five ordered sub-stages of a combat round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Deployment,
    Ranged,
    Melee,
    Pursuit,
    Retreat, // Terminal for the round
}

impl BattlePhase {
    pub const ALL: [BattlePhase; 5] = [
        BattlePhase::Deployment,
        BattlePhase::Ranged,
        BattlePhase::Melee,
        BattlePhase::Pursuit,
        BattlePhase::Retreat,
    ];

    /// Next phase within the same round, `None` after Retreat
    pub fn next(&self) -> Option<BattlePhase> {
        match self {
            BattlePhase::Deployment => Some(BattlePhase::Ranged),
            BattlePhase::Ranged => Some(BattlePhase::Melee),
            BattlePhase::Melee => Some(BattlePhase::Pursuit),
            BattlePhase::Pursuit => Some(BattlePhase::Retreat),
            BattlePhase::Retreat => None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn name(&self) -> &'static str {
        match self {
            BattlePhase::Deployment => "Deployment",
            BattlePhase::Ranged => "Ranged",
            BattlePhase::Melee => "Melee",
            BattlePhase::Pursuit => "Pursuit",
            BattlePhase::Retreat => "Retreat",
        }
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
