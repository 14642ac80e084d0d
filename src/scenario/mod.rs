//! Battle scenarios described in TOML
//!
//! A scenario carries everything needed to fight one battle: terrain,
//! round budget, both sides, and optionally a seed and a config override.

pub mod loader;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::commander::Commander;
use crate::battle::execution::Battle;
use crate::battle::side::Side;
use crate::battle::tactics::Tactic;
use crate::battle::terrain::Terrain;
use crate::battle::units::CombatUnit;
use crate::core::config::BattleConfig;
use crate::core::error::Result;
use crate::core::types::Round;

pub use loader::{load_scenario, parse_scenario};

fn default_max_rounds() -> Round {
    5
}

/// One side as written in a scenario file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideSpec {
    pub units: Vec<CombatUnit>,
    #[serde(default)]
    pub commanders: Vec<Commander>,
    /// Overrides the tactics derived from commander skills when present
    #[serde(default)]
    pub tactics: Option<Vec<Tactic>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleScenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: Round,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub config: Option<BattleConfig>,
    pub attacker: SideSpec,
    pub defender: SideSpec,
}

impl BattleScenario {
    pub fn side(&self, side: Side) -> &SideSpec {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    /// Set up a battle over this scenario's units
    ///
    /// The units and commanders are fought over in place, so the scenario
    /// holds the aftermath once the battle is dropped.
    pub fn battle<R: Rng>(&mut self, rng: R) -> Result<Battle<'_, R>> {
        let attacker_tactics = self.attacker.tactics.clone();
        let defender_tactics = self.defender.tactics.clone();

        let mut battle = Battle::new(
            &mut self.attacker.units,
            &mut self.defender.units,
            &mut self.attacker.commanders,
            &mut self.defender.commanders,
            self.terrain,
            self.max_rounds,
            rng,
        )?;

        if let Some(config) = &self.config {
            battle = battle.with_config(config.clone())?;
        }
        if let Some(tactics) = attacker_tactics {
            battle = battle.with_tactics(Side::Attacker, tactics);
        }
        if let Some(tactics) = defender_tactics {
            battle = battle.with_tactics(Side::Defender, tactics);
        }

        Ok(battle)
    }
}
