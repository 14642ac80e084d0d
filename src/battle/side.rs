//! The two opposing sides of a battle
//!
//! A side borrows its units and commanders from the caller; the battle
//! mutates them in place and the caller keeps ownership.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::commander::Commander;
use crate::battle::tactics::Tactic;
use crate::battle::troop::TroopType;
use crate::battle::units::CombatUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Attacker => "attacker",
            Side::Defender => "defender",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Troops across `units`, summed wide enough never to overflow
pub fn troop_total(units: &[CombatUnit]) -> u64 {
    units.iter().map(|u| u.size as u64).sum()
}

/// Saturates at `u32::MAX`; `Battle::new` refuses armies that large
fn saturating_total(units: &[CombatUnit]) -> u32 {
    troop_total(units).min(u32::MAX as u64) as u32
}

/// Units, commanders and tactics fighting for one side
#[derive(Debug)]
pub struct BattleSide<'a> {
    pub side: Side,
    pub units: &'a mut [CombatUnit],
    /// `commanders[i]` leads `units[i]`
    pub commanders: &'a mut [Commander],
    pub tactics: Vec<Tactic>,
    initial_size: u32,
}

impl<'a> BattleSide<'a> {
    /// Tactics start out as those the commanders' skills unlock
    pub fn new(side: Side, units: &'a mut [CombatUnit], commanders: &'a mut [Commander]) -> Self {
        let mut tactics = Vec::new();
        for tactic in commanders.iter().flat_map(|c| c.derived_tactics()) {
            if !tactics.contains(&tactic) {
                tactics.push(tactic);
            }
        }

        let initial_size = saturating_total(units);

        Self {
            side,
            units,
            commanders,
            tactics,
            initial_size,
        }
    }

    /// Replace the active tactics, dropping duplicates
    pub fn set_tactics(&mut self, tactics: impl IntoIterator<Item = Tactic>) {
        self.tactics.clear();
        for tactic in tactics {
            if !self.tactics.contains(&tactic) {
                self.tactics.push(tactic);
            }
        }
    }

    /// Commander assigned to the unit at `index`
    pub fn commander_for(&self, index: usize) -> Option<&Commander> {
        self.commanders.get(index)
    }

    pub fn total_size(&self) -> u32 {
        saturating_total(self.units)
    }

    /// Total size when the battle began
    pub fn initial_size(&self) -> u32 {
        self.initial_size
    }

    pub fn active_units(&self) -> impl Iterator<Item = &CombatUnit> {
        self.units.iter().filter(|u| u.is_active())
    }

    pub fn is_annihilated(&self) -> bool {
        self.total_size() == 0
    }

    /// Size-weighted average morale of the units still standing
    pub fn average_morale(&self) -> f32 {
        let total = troop_total(self.units);
        if total == 0 {
            return 0.0;
        }

        let weighted: f64 = self
            .active_units()
            .map(|u| u.size as f64 * u.morale as f64)
            .sum();
        (weighted / total as f64) as f32
    }

    /// Fraction of the starting strength still on the field
    pub fn survivor_ratio(&self) -> f32 {
        if self.initial_size == 0 {
            return 0.0;
        }
        self.total_size() as f32 / self.initial_size as f32
    }

    /// Does any active unit have a matching primary type?
    pub fn fields(&self, predicate: impl Fn(TroopType) -> bool) -> bool {
        self.active_units().any(|u| predicate(u.primary_type))
    }

    /// Primary types of every active unit, in order
    pub fn active_troop_types(&self) -> Vec<TroopType> {
        self.active_units().map(|u| u.primary_type).collect()
    }

    /// The strongest fighter among the commanders
    pub fn champion(&self) -> Option<&Commander> {
        // First of equals wins the honour
        self.commanders
            .iter()
            .rev()
            .max_by_key(|c| c.strength)
    }

    /// Headcount per primary type, e.g. "Infantry(5000), Archer(1000)"
    pub fn composition(&self) -> String {
        let mut by_type: BTreeMap<&'static str, u32> = BTreeMap::new();
        for unit in self.units.iter() {
            *by_type.entry(unit.primary_type.name()).or_default() += unit.size;
        }
        by_type
            .iter()
            .map(|(name, size)| format!("{}({})", name, size))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Commander names, or "none"
    pub fn commander_names(&self) -> String {
        if self.commanders.is_empty() {
            return "none".into();
        }
        self.commanders
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::commander::Skill;

    #[test]
    fn test_opposite() {
        assert_eq!(Side::Attacker.opposite(), Side::Defender);
        assert_eq!(Side::Defender.opposite(), Side::Attacker);
    }

    #[test]
    fn test_tactics_derived_from_skills_without_duplicates() {
        let mut units = vec![CombatUnit::new(TroopType::Infantry, 100, 50, 50)];
        let mut commanders = vec![
            Commander::new("A", 50, 50, 50, 50, 50).with_skill(Skill::FireAttack),
            Commander::new("B", 50, 50, 50, 50, 50)
                .with_skill(Skill::FireAttack)
                .with_skill(Skill::Ambush),
        ];
        let side = BattleSide::new(Side::Attacker, &mut units, &mut commanders);

        assert_eq!(side.tactics, vec![Tactic::FireAttack, Tactic::Ambush]);
    }

    #[test]
    fn test_average_morale_is_size_weighted() {
        let mut units = vec![
            CombatUnit::new(TroopType::Infantry, 300, 80, 50),
            CombatUnit::new(TroopType::Archer, 100, 40, 50),
            CombatUnit::new(TroopType::Cavalry, 0, 10, 50),
        ];
        let mut commanders = vec![];
        let side = BattleSide::new(Side::Defender, &mut units, &mut commanders);

        assert!((side.average_morale() - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_sizes_beyond_u32_saturate() {
        let mut units = vec![
            CombatUnit::new(TroopType::Infantry, 3_000_000_000, 80, 50),
            CombatUnit::new(TroopType::Infantry, 3_000_000_000, 40, 50),
        ];
        let mut commanders = vec![];
        let side = BattleSide::new(Side::Attacker, &mut units, &mut commanders);

        assert_eq!(troop_total(side.units), 6_000_000_000);
        assert_eq!(side.total_size(), u32::MAX);
        assert_eq!(side.initial_size(), u32::MAX);
        assert!((side.average_morale() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_survivor_ratio() {
        let mut units = vec![CombatUnit::new(TroopType::Infantry, 1000, 50, 50)];
        let mut commanders = vec![];
        let mut side = BattleSide::new(Side::Attacker, &mut units, &mut commanders);

        side.units[0].take_casualties(400);
        assert!((side.survivor_ratio() - 0.6).abs() < 1e-6);
        assert_eq!(side.initial_size(), 1000);
    }

    #[test]
    fn test_champion_is_strongest_first_of_equals() {
        let mut units = vec![CombatUnit::new(TroopType::Infantry, 100, 50, 50)];
        let mut commanders = vec![
            Commander::new("First", 50, 90, 50, 50, 50),
            Commander::new("Weak", 50, 40, 50, 50, 50),
            Commander::new("Second", 50, 90, 50, 50, 50),
        ];
        let side = BattleSide::new(Side::Attacker, &mut units, &mut commanders);

        assert_eq!(side.champion().unwrap().name, "First");
    }

    #[test]
    fn test_composition_and_names() {
        let mut units = vec![
            CombatUnit::new(TroopType::Infantry, 300, 50, 50),
            CombatUnit::new(TroopType::Archer, 100, 50, 50),
            CombatUnit::new(TroopType::Infantry, 200, 50, 50),
        ];
        let mut commanders = vec![];
        let side = BattleSide::new(Side::Attacker, &mut units, &mut commanders);

        assert_eq!(side.composition(), "Archer(100), Infantry(500)");
        assert_eq!(side.commander_names(), "none");
        assert!(side.fields(|t| t.is_ranged()));
        assert!(!side.fields(|t| t == TroopType::Cavalry));
    }
}
