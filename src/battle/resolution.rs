//! Casualty resolution for one phase
//!
//! Power ratio -> casualty rate per side -> absolute casualties ->
//! proportional distribution across each side's units.

use rand::Rng;

use crate::battle::constants::{
    ARCHER_INFLICT_MULTIPLIER, ARCHER_RECEIVE_MULTIPLIER, CAVALRY_PURSUIT_MULTIPLIER,
};
use crate::battle::events::BattleEventLog;
use crate::battle::phase::BattlePhase;
use crate::battle::power::{side_power, PowerContext};
use crate::battle::side::{BattleSide, Side};
use crate::battle::tactics::TacticRolls;
use crate::battle::terrain::Terrain;
use crate::battle::troop::TroopType;
use crate::battle::units::CombatUnit;
use crate::core::config::BattleConfig;
use crate::core::types::UnitId;

/// Fraction of each side lost in a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CasualtyRates {
    pub attacker: f32,
    pub defender: f32,
}

/// Outcome of one phase's casualty resolution
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCasualties {
    pub attacker_power: f32,
    pub defender_power: f32,
    pub rates: CasualtyRates,
    pub attacker: u32,
    pub defender: u32,
    /// Side sizes before this phase's casualties
    pub attacker_size_before: u32,
    pub defender_size_before: u32,
    pub annihilated: Vec<(Side, UnitId)>,
}

/// Attacker power over defender power
///
/// A side with no power at all faces an overwhelming ratio instead of a
/// division by zero; two powerless sides are even.
pub fn power_ratio(attacker_power: f32, defender_power: f32, config: &BattleConfig) -> f32 {
    let attacker_dead = attacker_power <= 0.0;
    let defender_dead = defender_power <= 0.0;

    match (attacker_dead, defender_dead) {
        (true, true) => 1.0,
        (false, true) => config.zero_power_ratio,
        (true, false) => 1.0 / config.zero_power_ratio,
        (false, false) => attacker_power / defender_power.max(1.0),
    }
}

/// Which arms each side still fields, as far as casualty rates care
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmsPresence {
    pub attacker_ranged: bool,
    pub defender_ranged: bool,
    pub attacker_cavalry: bool,
}

impl ArmsPresence {
    pub fn of(attacker: &BattleSide<'_>, defender: &BattleSide<'_>) -> Self {
        Self {
            attacker_ranged: attacker.fields(|t| t.is_ranged()),
            defender_ranged: defender.fields(|t| t.is_ranged()),
            attacker_cavalry: attacker.fields(|t| t == TroopType::Cavalry),
        }
    }
}

/// Casualty rates for both sides, clamped to [0, max_casualty_rate]
///
/// The stronger side's rate shrinks by the power ratio and the weaker
/// side's grows by it. In the ranged phase a side with archers facing a
/// side without them inflicts more and suffers less; in the pursuit an
/// attacking cavalry presence punishes the defender.
pub fn casualty_rates(
    ratio: f32,
    phase: BattlePhase,
    arms: ArmsPresence,
    config: &BattleConfig,
) -> CasualtyRates {
    let base = config.base_casualty_rate;
    let mut defender = base * ratio;
    let mut attacker = base / ratio;

    match phase {
        BattlePhase::Ranged => {
            if arms.attacker_ranged && !arms.defender_ranged {
                defender *= ARCHER_INFLICT_MULTIPLIER;
                attacker *= ARCHER_RECEIVE_MULTIPLIER;
            } else if arms.defender_ranged && !arms.attacker_ranged {
                attacker *= ARCHER_INFLICT_MULTIPLIER;
                defender *= ARCHER_RECEIVE_MULTIPLIER;
            }
        }
        BattlePhase::Pursuit if arms.attacker_cavalry => {
            defender *= CAVALRY_PURSUIT_MULTIPLIER;
        }
        _ => {}
    }

    let clamp = |rate: f32| {
        if rate.is_nan() {
            0.0
        } else {
            rate.clamp(0.0, config.max_casualty_rate)
        }
    };

    CasualtyRates {
        attacker: clamp(attacker),
        defender: clamp(defender),
    }
}

/// floor(total size * rate)
pub fn absolute_casualties(total_size: u32, rate: f32) -> u32 {
    let casualties = (total_size as f64 * rate as f64).floor() as u32;
    casualties.min(total_size)
}

/// Split `total` casualties across units in proportion to their size
///
/// Each active unit takes floor(total * size / total_size); the last active
/// unit absorbs the rounding remainder. Any share exceeding a unit's size
/// spills over to units with room left, so the shares always sum to
/// `min(total, total_size)`.
pub fn distribute_casualties(units: &[CombatUnit], total: u32) -> Vec<u32> {
    let mut shares = vec![0u32; units.len()];
    let total_size: u64 = units.iter().map(|u| u.size as u64).sum();
    if total == 0 || total_size == 0 {
        return shares;
    }

    let total = (total as u64).min(total_size);
    let last_active = units.iter().rposition(|u| u.is_active());

    let mut assigned = 0u64;
    for (index, unit) in units.iter().enumerate() {
        if !unit.is_active() {
            continue;
        }
        let share = if Some(index) == last_active {
            total - assigned
        } else {
            total * unit.size as u64 / total_size
        };
        shares[index] = share as u32;
        assigned += share;
    }

    // Spill anything a unit cannot absorb onto the others, in order
    let mut overflow = 0u32;
    for (share, unit) in shares.iter_mut().zip(units) {
        if *share > unit.size {
            overflow += *share - unit.size;
            *share = unit.size;
        }
    }
    for (share, unit) in shares.iter_mut().zip(units) {
        if overflow == 0 {
            break;
        }
        let room = unit.size - *share;
        let extra = room.min(overflow);
        *share += extra;
        overflow -= extra;
    }

    shares
}

/// Distribute and apply casualties; returns the ids of units wiped out
pub fn apply_casualties(units: &mut [CombatUnit], total: u32) -> Vec<UnitId> {
    let shares = distribute_casualties(units, total);
    let mut annihilated = Vec::new();

    for (unit, share) in units.iter_mut().zip(shares) {
        let was_active = unit.is_active();
        unit.take_casualties(share);
        if was_active && !unit.is_active() {
            annihilated.push(unit.id);
        }
    }

    annihilated
}

/// Resolve one phase: roll tactics, weigh power, inflict casualties
pub fn resolve_phase_casualties<R: Rng>(
    attacker: &mut BattleSide<'_>,
    defender: &mut BattleSide<'_>,
    phase: BattlePhase,
    terrain: Terrain,
    rng: &mut R,
    config: &BattleConfig,
    log: &mut BattleEventLog,
) -> PhaseCasualties {
    let attacker_rolls =
        TacticRolls::roll(&attacker.tactics, Side::Attacker, phase, terrain, rng, log);
    let defender_rolls =
        TacticRolls::roll(&defender.tactics, Side::Defender, phase, terrain, rng, log);

    let attacker_types = attacker.active_troop_types();
    let defender_types = defender.active_troop_types();

    let attacker_power = side_power(
        attacker,
        &PowerContext {
            phase,
            terrain,
            side: Side::Attacker,
            tactics: &attacker_rolls,
            opposing: &defender_types,
        },
        log,
    );
    let defender_power = side_power(
        defender,
        &PowerContext {
            phase,
            terrain,
            side: Side::Defender,
            tactics: &defender_rolls,
            opposing: &attacker_types,
        },
        log,
    );

    let ratio = power_ratio(attacker_power, defender_power, config);
    let rates = casualty_rates(ratio, phase, ArmsPresence::of(attacker, defender), config);

    let attacker_size_before = attacker.total_size();
    let defender_size_before = defender.total_size();
    let attacker_casualties = absolute_casualties(attacker_size_before, rates.attacker);
    let defender_casualties = absolute_casualties(defender_size_before, rates.defender);

    tracing::debug!(
        ?phase,
        attacker_power,
        defender_power,
        ratio,
        attacker_rate = rates.attacker,
        defender_rate = rates.defender,
        attacker_casualties,
        defender_casualties,
        "phase casualties resolved"
    );

    let mut annihilated: Vec<(Side, UnitId)> = apply_casualties(attacker.units, attacker_casualties)
        .into_iter()
        .map(|id| (Side::Attacker, id))
        .collect();
    annihilated.extend(
        apply_casualties(defender.units, defender_casualties)
            .into_iter()
            .map(|id| (Side::Defender, id)),
    );

    PhaseCasualties {
        attacker_power,
        defender_power,
        rates,
        attacker: attacker_casualties,
        defender: defender_casualties,
        attacker_size_before,
        defender_size_before,
        annihilated,
    }
}
