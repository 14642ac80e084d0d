//! Single combat between champions before the first round
//!
//! The winner's troops take heart and the loser's waver.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::commander::{Commander, Skill};
use crate::battle::constants::{
    DUEL_INTELLIGENCE_WEIGHT, DUEL_ROLL_MAX, DUEL_ROLL_MIN, DUEL_SKILL_MULTIPLIER,
    DUEL_STRENGTH_WEIGHT,
};
use crate::battle::morale::shift_morale;
use crate::battle::side::Side;
use crate::battle::units::CombatUnit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub winner: Side,
    pub attacker_champion: String,
    pub defender_champion: String,
    pub attacker_power: f32,
    pub defender_power: f32,
    /// Absolute power difference
    pub advantage: f32,
}

impl DuelOutcome {
    pub fn winner_name(&self) -> &str {
        match self.winner {
            Side::Attacker => &self.attacker_champion,
            Side::Defender => &self.defender_champion,
        }
    }

    pub fn loser_name(&self) -> &str {
        match self.winner {
            Side::Attacker => &self.defender_champion,
            Side::Defender => &self.attacker_champion,
        }
    }
}

/// Fighting power of one champion for one duel
///
/// strength * 0.7 + intelligence * 0.3 + d20, times 1.25 for duellists.
pub fn duel_power<R: Rng>(champion: &Commander, rng: &mut R) -> f32 {
    let roll = rng.gen_range(DUEL_ROLL_MIN..=DUEL_ROLL_MAX);
    let power = champion.strength as f32 * DUEL_STRENGTH_WEIGHT
        + champion.intelligence as f32 * DUEL_INTELLIGENCE_WEIGHT
        + roll as f32;

    if champion.has_skill(Skill::Duel) {
        power * DUEL_SKILL_MULTIPLIER
    } else {
        power
    }
}

/// Fight the duel; the defender holds on a tie
pub fn resolve_duel<R: Rng>(attacker: &Commander, defender: &Commander, rng: &mut R) -> DuelOutcome {
    let attacker_power = duel_power(attacker, rng);
    let defender_power = duel_power(defender, rng);

    let winner = if attacker_power > defender_power {
        Side::Attacker
    } else {
        Side::Defender
    };

    tracing::debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        attacker_power,
        defender_power,
        ?winner,
        "duel resolved"
    );

    DuelOutcome {
        winner,
        attacker_champion: attacker.name.clone(),
        defender_champion: defender.name.clone(),
        attacker_power,
        defender_power,
        advantage: (attacker_power - defender_power).abs(),
    }
}

/// Raise the winners' morale and lower the losers' by `swing`, per unit
pub fn apply_duel_morale(winners: &mut [CombatUnit], losers: &mut [CombatUnit], swing: u32) {
    let swing = swing.min(i32::MAX as u32) as i32;
    shift_morale(winners, swing);
    shift_morale(losers, -swing);
}
