//! Battle event log
//!
//! Append-only record of notable events, each with a human-readable
//! description for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::battle::phase::BattlePhase;
use crate::battle::side::Side;
use crate::battle::tactics::Tactic;
use crate::battle::troop::TroopType;
use crate::core::types::{Round, UnitId};

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub round: Round,
    /// None for events outside any phase (opening, duel, verdict)
    pub phase: Option<BattlePhase>,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    DuelFought { winner: Side },
    PhaseStarted,
    PowerAssessed { attacker: f32, defender: f32 },
    TacticTriggered { side: Side, tactic: Tactic },
    CounterTriggered { side: Side, troop: TroopType, countered: TroopType },
    Casualties { side: Side, amount: u32 },
    MoraleShifted { side: Side, delta: i32 },
    UnitAnnihilated { side: Side, unit_id: UnitId },
    SideAnnihilated { side: Side },
    MoraleCollapsed { side: Side },
    BattleEnded { winner: Option<Side> },
}

/// Ordered log of a whole battle
///
/// Tracks the round and phase currently being resolved so that callers
/// only supply the event itself.
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
    round: Round,
    phase: Option<BattlePhase>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent events with this round and phase
    pub fn set_cursor(&mut self, round: Round, phase: Option<BattlePhase>) {
        self.round = round;
        self.phase = phase;
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String) {
        self.events.push(BattleEvent {
            round: self.round,
            phase: self.phase,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Descriptions in order, as handed to the presentation layer
    pub fn descriptions(&self) -> Vec<String> {
        self.events.iter().map(|e| e.description.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_stamped_with_cursor() {
        let mut log = BattleEventLog::new();
        log.push(BattleEventType::BattleStarted, "start".into());
        log.set_cursor(2, Some(BattlePhase::Melee));
        log.push(BattleEventType::PhaseStarted, "melee".into());

        assert_eq!(log.len(), 2);
        assert_eq!(log.events[0].round, 0);
        assert_eq!(log.events[0].phase, None);
        assert_eq!(log.events[1].round, 2);
        assert_eq!(log.events[1].phase, Some(BattlePhase::Melee));
        assert_eq!(log.descriptions(), vec!["start", "melee"]);
    }
}
