//! Combat units: one deployed army block
//!
//! Units are created by the caller before battle, mutated in place during
//! each phase, and never removed. A unit at size 0 stays in its side's
//! collection as a marker of annihilation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::commander::Commander;
use crate::battle::constants::{
    CASUALTY_MORALE_FACTOR, DEFAULT_EQUIPMENT_LEVEL, FATIGUE_MAX, MORALE_MAX, MORALE_MIN,
    REST_FATIGUE_PER_DAY, REST_MORALE_PER_DAY, TRAINING_FATIGUE_PER_DAY, TRAINING_GAIN_PER_DAY,
    TRAINING_LEADERSHIP_FACTOR, TRAINING_MAX,
};
use crate::battle::troop::TroopType;
use crate::core::types::UnitId;

fn default_equipment_level() -> u32 {
    DEFAULT_EQUIPMENT_LEVEL
}

/// A deployed block of troops of (mostly) uniform type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatUnit {
    #[serde(default)]
    pub id: UnitId,
    pub primary_type: TroopType,
    #[serde(default)]
    pub secondary_type: Option<TroopType>,
    /// Fraction of the unit that fights as `secondary_type`
    #[serde(default)]
    pub secondary_ratio: f32,
    pub size: u32,
    pub morale: u32,
    pub training: u32,
    #[serde(default)]
    pub fatigue: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default = "default_equipment_level")]
    pub equipment_level: u32,
}

impl CombatUnit {
    pub fn new(primary_type: TroopType, size: u32, morale: u32, training: u32) -> Self {
        let mut unit = Self {
            id: UnitId::new(),
            primary_type,
            secondary_type: None,
            secondary_ratio: 0.0,
            size,
            morale,
            training,
            fatigue: 0,
            experience: 0,
            equipment_level: DEFAULT_EQUIPMENT_LEVEL,
        };
        unit.clamp_attributes();
        unit
    }

    /// Mix in a secondary troop type making up `ratio` of the unit
    pub fn with_secondary(mut self, secondary_type: TroopType, ratio: f32) -> Self {
        self.secondary_type = Some(secondary_type);
        self.secondary_ratio = ratio;
        self.clamp_attributes();
        self
    }

    pub fn with_fatigue(mut self, fatigue: u32) -> Self {
        self.fatigue = fatigue.min(FATIGUE_MAX);
        self
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_equipment_level(mut self, level: u32) -> Self {
        self.equipment_level = level;
        self
    }

    /// Force every attribute back inside its declared bounds
    ///
    /// Used after deserialization, where values come straight from a file.
    pub fn clamp_attributes(&mut self) {
        self.morale = self.morale.clamp(MORALE_MIN, MORALE_MAX);
        self.training = self.training.min(TRAINING_MAX);
        self.fatigue = self.fatigue.min(FATIGUE_MAX);

        if !self.secondary_ratio.is_finite() {
            self.secondary_ratio = 0.0;
        }
        self.secondary_ratio = self.secondary_ratio.clamp(0.0, 1.0);

        // A secondary type identical to the primary is no mix at all
        if self.secondary_type == Some(self.primary_type) {
            self.secondary_type = None;
        }
        if self.secondary_type.is_none() {
            self.secondary_ratio = 0.0;
        }
    }

    /// Still has troops on the field?
    pub fn is_active(&self) -> bool {
        self.size > 0
    }

    /// Apply casualties, clamped at the unit's own size
    ///
    /// Returns the casualties actually taken. Survivors lose morale in
    /// proportion to the fraction of the unit lost.
    pub fn take_casualties(&mut self, amount: u32) -> u32 {
        if self.size == 0 || amount == 0 {
            return 0;
        }

        let taken = amount.min(self.size);
        let fraction_lost = taken as f32 / self.size as f32;
        self.size -= taken;

        if self.size > 0 {
            let morale_drop = (fraction_lost * CASUALTY_MORALE_FACTOR) as i32;
            self.adjust_morale(-morale_drop);
        }

        taken
    }

    /// Shift morale by `delta`, clamped to [MORALE_MIN, MORALE_MAX]
    pub fn adjust_morale(&mut self, delta: i32) {
        let morale = self.morale as i64 + delta as i64;
        self.morale = morale.clamp(MORALE_MIN as i64, MORALE_MAX as i64) as u32;
    }

    /// Add fatigue, clamped at FATIGUE_MAX
    pub fn add_fatigue(&mut self, amount: u32) {
        self.fatigue = self.fatigue.saturating_add(amount).min(FATIGUE_MAX);
    }

    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    /// Rest for `days`: morale recovers and fatigue drains
    pub fn rest(&mut self, days: u32) {
        let recovered = days.saturating_mul(REST_MORALE_PER_DAY);
        self.morale = self.morale.saturating_add(recovered).min(MORALE_MAX);
        self.fatigue = self
            .fatigue
            .saturating_sub(days.saturating_mul(REST_FATIGUE_PER_DAY));
    }

    /// Drill for `days`, optionally under a commander whose leadership
    /// speeds up the gain. Training tires the troops.
    pub fn train(&mut self, days: u32, commander: Option<&Commander>) {
        let mut gain = days as f32 * TRAINING_GAIN_PER_DAY;
        if let Some(commander) = commander {
            gain *= 1.0 + commander.leadership as f32 * TRAINING_LEADERSHIP_FACTOR;
        }

        let training = (self.training as f32 + gain).round() as u32;
        self.training = training.min(TRAINING_MAX);
        self.add_fatigue(days.saturating_mul(TRAINING_FATIGUE_PER_DAY));
    }

    /// Absorb `other` into this unit
    ///
    /// A different primary type becomes (or feeds) the secondary share; a
    /// third type is folded into the primary share. Morale and training
    /// are size-weighted, fatigue takes the worse of the two.
    ///
    /// Hands `other` back untouched if the merged size would not fit in a
    /// `u32`.
    pub fn merge(&mut self, other: CombatUnit) -> std::result::Result<(), CombatUnit> {
        let Some(total) = self.size.checked_add(other.size) else {
            return Err(other);
        };
        if total == 0 {
            return Ok(());
        }

        let mut primary_amount = self.size as f32 * (1.0 - self.secondary_ratio);
        let mut secondary_amount = self.size as f32 * self.secondary_ratio;

        if other.primary_type == self.primary_type {
            primary_amount += other.size as f32;
        } else if self.secondary_type.is_none() {
            self.secondary_type = Some(other.primary_type);
            secondary_amount += other.size as f32;
        } else if self.secondary_type == Some(other.primary_type) {
            secondary_amount += other.size as f32;
        } else {
            primary_amount += other.size as f32;
        }

        let (own, incoming) = (self.size as f32, other.size as f32);
        let weight =
            |a: u32, b: u32| ((a as f32 * own + b as f32 * incoming) / total as f32).round() as u32;
        self.morale = weight(self.morale, other.morale);
        self.training = weight(self.training, other.training);

        self.secondary_ratio = secondary_amount / (primary_amount + secondary_amount);
        self.size = total;
        self.fatigue = self.fatigue.max(other.fatigue);
        self.experience = self.experience.saturating_add(other.experience);
        self.clamp_attributes();
        Ok(())
    }

    /// Detach `size` troops as a new unit with the same attributes
    ///
    /// Returns None unless `0 < size < self.size`.
    pub fn split_off(&mut self, size: u32) -> Option<CombatUnit> {
        if size == 0 || size >= self.size {
            return None;
        }

        self.size -= size;
        Some(CombatUnit {
            id: UnitId::new(),
            size,
            ..self.clone()
        })
    }
}

impl fmt::Display for CombatUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.secondary_type {
            Some(secondary) => write!(
                f,
                "{}/{} mixed - {}",
                self.primary_type, secondary, self.size
            ),
            None => write!(f, "{} - {}", self.primary_type, self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_attributes() {
        let unit = CombatUnit::new(TroopType::Infantry, 100, 3, 250);
        assert_eq!(unit.morale, MORALE_MIN);
        assert_eq!(unit.training, TRAINING_MAX);
        assert_eq!(unit.equipment_level, DEFAULT_EQUIPMENT_LEVEL);
    }

    #[test]
    fn test_secondary_ratio_ignored_without_secondary() {
        let mut unit = CombatUnit::new(TroopType::Infantry, 100, 50, 50);
        unit.secondary_ratio = 0.4;
        unit.clamp_attributes();
        assert_eq!(unit.secondary_ratio, 0.0);

        let same = CombatUnit::new(TroopType::Cavalry, 100, 50, 50)
            .with_secondary(TroopType::Cavalry, 0.3);
        assert!(same.secondary_type.is_none());
        assert_eq!(same.secondary_ratio, 0.0);
    }

    #[test]
    fn test_take_casualties_reduces_size_and_morale() {
        let mut unit = CombatUnit::new(TroopType::Infantry, 1000, 80, 60);
        let taken = unit.take_casualties(100);

        assert_eq!(taken, 100);
        assert_eq!(unit.size, 900);
        // 10% lost -> 2 morale
        assert_eq!(unit.morale, 78);
    }

    #[test]
    fn test_casualties_equal_to_size_annihilate() {
        let mut unit = CombatUnit::new(TroopType::Archer, 250, 60, 60);
        let taken = unit.take_casualties(250);

        assert_eq!(taken, 250);
        assert_eq!(unit.size, 0);
        assert!(!unit.is_active());
    }

    #[test]
    fn test_oversized_casualties_clamped() {
        let mut unit = CombatUnit::new(TroopType::Archer, 250, 60, 60);
        let taken = unit.take_casualties(10_000);

        assert_eq!(taken, 250);
        assert_eq!(unit.size, 0);

        // Nothing left to lose
        assert_eq!(unit.take_casualties(5), 0);
    }

    #[test]
    fn test_casualty_morale_never_below_floor() {
        let mut unit = CombatUnit::new(TroopType::Infantry, 100, 12, 60);
        unit.take_casualties(90);
        assert_eq!(unit.morale, MORALE_MIN);
    }

    #[test]
    fn test_adjust_morale_clamped() {
        let mut unit = CombatUnit::new(TroopType::Infantry, 100, 95, 60);
        unit.adjust_morale(20);
        assert_eq!(unit.morale, MORALE_MAX);
        unit.adjust_morale(-500);
        assert_eq!(unit.morale, MORALE_MIN);
    }

    #[test]
    fn test_fatigue_clamped() {
        let mut unit = CombatUnit::new(TroopType::Infantry, 100, 50, 60).with_fatigue(90);
        unit.add_fatigue(30);
        assert_eq!(unit.fatigue, FATIGUE_MAX);
    }

    #[test]
    fn test_rest_recovers() {
        let mut unit = CombatUnit::new(TroopType::Infantry, 100, 50, 60).with_fatigue(40);
        unit.rest(3);
        assert_eq!(unit.morale, 65);
        assert_eq!(unit.fatigue, 10);

        unit.rest(30);
        assert_eq!(unit.morale, MORALE_MAX);
        assert_eq!(unit.fatigue, 0);
    }

    #[test]
    fn test_commander_speeds_training() {
        let commander = Commander::new("Drillmaster", 100, 50, 50, 50, 50);

        let mut plain = CombatUnit::new(TroopType::Spearman, 100, 50, 40);
        let mut drilled = plain.clone();

        plain.train(10, None);
        drilled.train(10, Some(&commander));

        assert_eq!(plain.training, 45);
        assert_eq!(drilled.training, 50);
        assert_eq!(plain.fatigue, 50);
    }

    #[test]
    fn test_merge_same_type() {
        let mut a = CombatUnit::new(TroopType::Infantry, 300, 80, 60);
        let b = CombatUnit::new(TroopType::Infantry, 100, 40, 20).with_fatigue(30);

        a.merge(b).unwrap();

        assert_eq!(a.size, 400);
        assert_eq!(a.morale, 70);
        assert_eq!(a.training, 50);
        assert_eq!(a.fatigue, 30);
        assert!(a.secondary_type.is_none());
    }

    #[test]
    fn test_merge_different_type_creates_secondary() {
        let mut a = CombatUnit::new(TroopType::Infantry, 300, 80, 60);
        let b = CombatUnit::new(TroopType::Archer, 100, 80, 60);

        a.merge(b).unwrap();

        assert_eq!(a.size, 400);
        assert_eq!(a.secondary_type, Some(TroopType::Archer));
        assert!((a.secondary_ratio - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_merge_third_type_folds_into_primary() {
        let mut a = CombatUnit::new(TroopType::Infantry, 300, 80, 60)
            .with_secondary(TroopType::Archer, 0.5);
        let b = CombatUnit::new(TroopType::Cavalry, 100, 80, 60);

        a.merge(b).unwrap();

        assert_eq!(a.secondary_type, Some(TroopType::Archer));
        // 150 archers out of 400
        assert!((a.secondary_ratio - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_merge_refuses_oversized_result() {
        let mut a = CombatUnit::new(TroopType::Infantry, 3_000_000_000, 80, 60);
        let b = CombatUnit::new(TroopType::Archer, 3_000_000_000, 40, 20);
        let b_id = b.id;

        let returned = a.merge(b).unwrap_err();

        assert_eq!(returned.id, b_id);
        assert_eq!(returned.size, 3_000_000_000);
        assert_eq!(a.size, 3_000_000_000);
        assert_eq!(a.morale, 80);
        assert!(a.secondary_type.is_none());
    }

    #[test]
    fn test_split_off() {
        let mut unit = CombatUnit::new(TroopType::Cavalry, 1000, 70, 60).with_experience(12);
        let detached = unit.split_off(400).unwrap();

        assert_eq!(unit.size, 600);
        assert_eq!(detached.size, 400);
        assert_eq!(detached.experience, 12);
        assert_ne!(detached.id, unit.id);

        assert!(unit.split_off(0).is_none());
        assert!(unit.split_off(600).is_none());
    }

    #[test]
    fn test_display() {
        let unit = CombatUnit::new(TroopType::Infantry, 5000, 80, 70);
        assert_eq!(unit.to_string(), "Infantry - 5000");

        let mixed = unit.with_secondary(TroopType::Archer, 0.3);
        assert_eq!(mixed.to_string(), "Infantry/Archer mixed - 5000");
    }

    #[test]
    fn test_deserialize_defaults() {
        let unit: CombatUnit =
            toml::from_str("primary_type = \"Cavalry\"\nsize = 800\nmorale = 70\ntraining = 65")
                .unwrap();
        assert_eq!(unit.fatigue, 0);
        assert_eq!(unit.equipment_level, DEFAULT_EQUIPMENT_LEVEL);
        assert!(unit.secondary_type.is_none());
    }
}
