//! Battle resolution - phase-by-phase combat between two sides
//!
//! Each round walks Deployment -> Ranged -> Melee -> Pursuit -> Retreat.
//! Every phase weighs both sides' power, inflicts casualties and shifts
//! morale, until a side is annihilated, breaks, or the rounds run out.

pub mod commander;
pub mod constants;
pub mod duel;
pub mod events;
pub mod execution;
pub mod morale;
pub mod phase;
pub mod power;
pub mod resolution;
pub mod side;
pub mod tactics;
pub mod terrain;
pub mod troop;
pub mod units;

// Re-exports for convenient access
pub use commander::{Commander, Skill};
pub use constants::*;
pub use duel::{apply_duel_morale, duel_power, resolve_duel, DuelOutcome};
pub use events::{BattleEvent, BattleEventLog, BattleEventType};
pub use execution::{Battle, BattleResult, PhaseStep, Termination};
pub use morale::{apply_phase_morale, has_collapsed, phase_morale_delta};
pub use phase::BattlePhase;
pub use power::{compute_power, side_power, CounterBonus, PowerContext, UnitPower};
pub use resolution::{
    apply_casualties, casualty_rates, distribute_casualties, power_ratio,
    resolve_phase_casualties, ArmsPresence, CasualtyRates, PhaseCasualties,
};
pub use side::{troop_total, BattleSide, Side};
pub use tactics::{Tactic, TacticRolls};
pub use terrain::Terrain;
pub use troop::TroopType;
pub use units::CombatUnit;
