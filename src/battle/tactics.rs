//! Tactics: probabilistic special effects tied to phase and terrain
//!
//! A side's tactics are rolled once per phase. Every tactic that triggers
//! multiplies the power of all of that side's units for the phase.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::phase::BattlePhase;
use crate::battle::side::Side;
use crate::battle::terrain::Terrain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tactic {
    /// Set the field alight; needs something to burn
    FireAttack,
    /// Troops lying in wait; only springs during deployment
    Ambush,
}

impl Tactic {
    pub fn trigger_chance(&self) -> f32 {
        match self {
            Tactic::FireAttack => 0.3,
            Tactic::Ambush => 0.4,
        }
    }

    pub fn power_multiplier(&self) -> f32 {
        match self {
            Tactic::FireAttack => 1.5,
            Tactic::Ambush => 1.3,
        }
    }

    /// Can this tactic fire in the given phase on the given terrain?
    pub fn applies(&self, phase: BattlePhase, terrain: Terrain) -> bool {
        match self {
            Tactic::FireAttack => terrain.is_flammable(),
            Tactic::Ambush => phase == BattlePhase::Deployment,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tactic::FireAttack => "fire attack",
            Tactic::Ambush => "ambush",
        }
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tactics that triggered for one side in one phase
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TacticRolls {
    pub triggered: Vec<Tactic>,
}

impl TacticRolls {
    pub fn none() -> Self {
        Self::default()
    }

    /// Roll every applicable tactic once, logging each that triggers
    pub fn roll<R: Rng>(
        tactics: &[Tactic],
        side: Side,
        phase: BattlePhase,
        terrain: Terrain,
        rng: &mut R,
        log: &mut BattleEventLog,
    ) -> Self {
        let mut triggered = Vec::new();

        for &tactic in tactics {
            if !tactic.applies(phase, terrain) {
                continue;
            }
            if rng.gen::<f32>() < tactic.trigger_chance() {
                tracing::trace!(?side, ?tactic, ?phase, "tactic triggered");
                log.push(
                    BattleEventType::TacticTriggered { side, tactic },
                    format!("The {} launches a successful {}!", side, tactic),
                );
                triggered.push(tactic);
            }
        }

        Self { triggered }
    }

    /// Combined power multiplier of all triggered tactics
    pub fn multiplier(&self) -> f32 {
        self.triggered
            .iter()
            .map(|t| t.power_multiplier())
            .product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fire_needs_flammable_terrain() {
        assert!(Tactic::FireAttack.applies(BattlePhase::Melee, Terrain::Forest));
        assert!(Tactic::FireAttack.applies(BattlePhase::Ranged, Terrain::City));
        assert!(!Tactic::FireAttack.applies(BattlePhase::Melee, Terrain::Plain));
    }

    #[test]
    fn test_ambush_only_in_deployment() {
        assert!(Tactic::Ambush.applies(BattlePhase::Deployment, Terrain::Plain));
        for phase in [BattlePhase::Ranged, BattlePhase::Melee, BattlePhase::Pursuit, BattlePhase::Retreat] {
            assert!(!Tactic::Ambush.applies(phase, Terrain::Forest));
        }
    }

    #[test]
    fn test_inapplicable_tactics_never_trigger() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut log = BattleEventLog::new();

        for _ in 0..100 {
            let rolls = TacticRolls::roll(
                &[Tactic::FireAttack, Tactic::Ambush],
                Side::Attacker,
                BattlePhase::Melee,
                Terrain::Plain,
                &mut rng,
                &mut log,
            );
            assert!(rolls.triggered.is_empty());
            assert_eq!(rolls.multiplier(), 1.0);
        }
        assert!(log.is_empty());
    }

    #[test]
    fn test_trigger_rate_near_chance() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut log = BattleEventLog::new();
        let trials = 2000;

        let mut hits = 0;
        for _ in 0..trials {
            let rolls = TacticRolls::roll(
                &[Tactic::Ambush],
                Side::Defender,
                BattlePhase::Deployment,
                Terrain::Forest,
                &mut rng,
                &mut log,
            );
            if !rolls.triggered.is_empty() {
                hits += 1;
                assert!((rolls.multiplier() - 1.3).abs() < 1e-6);
            }
        }

        let rate = hits as f32 / trials as f32;
        assert!((rate - 0.4).abs() < 0.05, "rate was {}", rate);
        assert_eq!(log.len(), hits);
    }

    #[test]
    fn test_multiplier_stacks() {
        let rolls = TacticRolls {
            triggered: vec![Tactic::FireAttack, Tactic::Ambush],
        };
        assert!((rolls.multiplier() - 1.95).abs() < 1e-5);
    }
}
