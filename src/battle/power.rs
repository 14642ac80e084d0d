//! Effective combat power of a unit for one phase
//!
//! power = size * morale * training
//!       * terrain * (1 + equipment + experience) * fatigue
//!       * commander * arms * tactics * counter

use crate::battle::commander::Commander;
use crate::battle::constants::{
    EQUIPMENT_BONUS_PER_LEVEL, EXPERIENCE_BONUS_PER_POINT, FORTIFICATION_BONUS, MELEE_LINE_BONUS,
    PURSUIT_CAVALRY_BONUS, RANGED_VOLLEY_BONUS, SHIELD_WALL_BONUS,
};
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::phase::BattlePhase;
use crate::battle::side::{BattleSide, Side};
use crate::battle::tactics::TacticRolls;
use crate::battle::terrain::Terrain;
use crate::battle::troop::TroopType;
use crate::battle::units::CombatUnit;

/// Everything about the phase that shapes a side's power
#[derive(Debug, Clone, Copy)]
pub struct PowerContext<'a> {
    pub phase: BattlePhase,
    pub terrain: Terrain,
    /// Role of the side whose units are being evaluated
    pub side: Side,
    pub tactics: &'a TacticRolls,
    /// Primary types of the opposing side's active units
    pub opposing: &'a [TroopType],
}

/// A counter relationship that boosted a unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterBonus {
    pub troop: TroopType,
    pub countered: TroopType,
    pub multiplier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPower {
    pub power: f32,
    pub counter: Option<CounterBonus>,
}

/// size * morale% * training%
pub fn base_power(unit: &CombatUnit) -> f32 {
    unit.size as f32 * (unit.morale as f32 / 100.0) * (unit.training as f32 / 100.0)
}

/// Terrain effect, blended across primary and secondary troop types
pub fn terrain_factor(unit: &CombatUnit, terrain: Terrain) -> f32 {
    let primary = terrain.effect_on(unit.primary_type);
    match unit.secondary_type {
        Some(secondary) => {
            primary * (1.0 - unit.secondary_ratio)
                + terrain.effect_on(secondary) * unit.secondary_ratio
        }
        None => primary,
    }
}

/// 1 + equipment bonus + experience bonus
pub fn veterancy_factor(unit: &CombatUnit) -> f32 {
    1.0 + unit.equipment_level as f32 * EQUIPMENT_BONUS_PER_LEVEL
        + unit.experience as f32 * EXPERIENCE_BONUS_PER_POINT
}

pub fn fatigue_factor(unit: &CombatUnit) -> f32 {
    (1.0 - unit.fatigue as f32 / 100.0).max(0.0)
}

pub fn commander_factor(unit: &CombatUnit, commander: Option<&Commander>) -> f32 {
    commander
        .map(|c| c.command_bonus(unit.primary_type))
        .unwrap_or(1.0)
}

/// Bonus for the arm that shines in this phase
///
/// The attacking side's archers open the ranged exchange, its line
/// infantry carries the melee and its cavalry runs down the pursuit. The
/// defending side's shields blunt missile fire, and otherwise it fights
/// from its walls on fortified terrain.
pub fn arms_factor(unit: &CombatUnit, phase: BattlePhase, terrain: Terrain, side: Side) -> f32 {
    let troop = unit.primary_type;
    match side {
        Side::Attacker => match phase {
            BattlePhase::Ranged if troop.is_ranged() => RANGED_VOLLEY_BONUS,
            BattlePhase::Melee if matches!(troop, TroopType::Infantry | TroopType::Spearman) => {
                MELEE_LINE_BONUS
            }
            BattlePhase::Pursuit if troop == TroopType::Cavalry => PURSUIT_CAVALRY_BONUS,
            _ => 1.0,
        },
        Side::Defender => {
            if phase == BattlePhase::Ranged && troop == TroopType::Shielded {
                SHIELD_WALL_BONUS
            } else if terrain.is_fortified() {
                FORTIFICATION_BONUS
            } else {
                1.0
            }
        }
    }
}

/// Strongest counter a defending unit holds over the attackers
///
/// Attacking units get no counter bonus.
pub fn counter_factor(unit: &CombatUnit, side: Side, opposing: &[TroopType]) -> Option<CounterBonus> {
    if side != Side::Defender {
        return None;
    }

    opposing
        .iter()
        .map(|&countered| CounterBonus {
            troop: unit.primary_type,
            countered,
            multiplier: unit.primary_type.counter_bonus(countered),
        })
        .filter(|c| c.multiplier > 1.0)
        .fold(None, |best: Option<CounterBonus>, c| match best {
            Some(b) if b.multiplier >= c.multiplier => Some(b),
            _ => Some(c),
        })
}

/// Effective power of one unit; zero for annihilated units
pub fn compute_power(
    unit: &CombatUnit,
    ctx: &PowerContext<'_>,
    commander: Option<&Commander>,
) -> UnitPower {
    if !unit.is_active() {
        return UnitPower {
            power: 0.0,
            counter: None,
        };
    }

    let counter = counter_factor(unit, ctx.side, ctx.opposing);
    let power = base_power(unit)
        * terrain_factor(unit, ctx.terrain)
        * veterancy_factor(unit)
        * fatigue_factor(unit)
        * commander_factor(unit, commander)
        * arms_factor(unit, ctx.phase, ctx.terrain, ctx.side)
        * ctx.tactics.multiplier()
        * counter.map(|c| c.multiplier).unwrap_or(1.0);

    UnitPower {
        power: power.max(0.0),
        counter,
    }
}

/// Total power of a side's active units, logging each counter triggered
pub fn side_power(side: &BattleSide<'_>, ctx: &PowerContext<'_>, log: &mut BattleEventLog) -> f32 {
    let mut total = 0.0;

    for (index, unit) in side.units.iter().enumerate() {
        if !unit.is_active() {
            continue;
        }

        let result = compute_power(unit, ctx, side.commander_for(index));
        if let Some(counter) = result.counter {
            tracing::trace!(?counter, "counter triggered");
            log.push(
                BattleEventType::CounterTriggered {
                    side: ctx.side,
                    troop: counter.troop,
                    countered: counter.countered,
                },
                format!(
                    "{} counters {} and gains a combat bonus!",
                    counter.troop, counter.countered
                ),
            );
        }
        total += result.power;
    }

    total
}
