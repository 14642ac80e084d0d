//! Commanders (generals) attached to a side's units
//!
//! A commander is assigned to the unit at the same index of its side and
//! grants leadership and troop-specific power bonuses. Skills are a closed
//! set checked by membership.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::constants::LEADERSHIP_BONUS_PER_POINT;
use crate::battle::tactics::Tactic;
use crate::battle::troop::TroopType;
use crate::core::types::CommanderId;

/// Special abilities a commander may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    FireAttack,
    WaterStrategy,
    Ambush,
    FormationBreak,
    Charge,
    IronDefense,
    Counter,
    Inspire,
    Logistics,
    Siege,
    Duel,
    Wisdom,
}

impl Skill {
    /// Battlefield tactic this skill makes available, if any
    pub fn tactic(&self) -> Option<Tactic> {
        match self {
            Skill::FireAttack => Some(Tactic::FireAttack),
            Skill::Ambush => Some(Tactic::Ambush),
            _ => None,
        }
    }
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commander {
    #[serde(default)]
    pub id: CommanderId,
    pub name: String,
    pub leadership: u32,
    pub strength: u32,
    pub intelligence: u32,
    pub politics: u32,
    pub charisma: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub skills: BTreeSet<Skill>,
    /// Extra power fraction for units of a given primary type
    #[serde(default)]
    pub troop_bonus: HashMap<TroopType, f32>,
}

impl Commander {
    pub fn new(
        name: impl Into<String>,
        leadership: u32,
        strength: u32,
        intelligence: u32,
        politics: u32,
        charisma: u32,
    ) -> Self {
        Self {
            id: CommanderId::new(),
            name: name.into(),
            leadership,
            strength,
            intelligence,
            politics,
            charisma,
            level: 1,
            experience: 0,
            skills: BTreeSet::new(),
            troop_bonus: HashMap::new(),
        }
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.insert(skill);
        self
    }

    pub fn with_troop_bonus(mut self, troop: TroopType, bonus: f32) -> Self {
        self.troop_bonus.insert(troop, bonus);
        self
    }

    /// Returns false if the skill was already known
    pub fn add_skill(&mut self, skill: Skill) -> bool {
        self.skills.insert(skill)
    }

    /// Returns false if the skill was not known
    pub fn remove_skill(&mut self, skill: Skill) -> bool {
        self.skills.remove(&skill)
    }

    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    pub fn troop_bonus_for(&self, troop: TroopType) -> f32 {
        self.troop_bonus.get(&troop).copied().unwrap_or(0.0)
    }

    /// Power multiplier granted to the unit this commander leads
    pub fn command_bonus(&self, troop: TroopType) -> f32 {
        1.0 + self.leadership as f32 * LEADERSHIP_BONUS_PER_POINT + self.troop_bonus_for(troop)
    }

    /// Experience hook; leveling rules belong to the progression layer
    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    /// Overall rating used for rosters and auto-assignment
    pub fn rating(&self) -> u32 {
        let attributes = self.leadership as f32 * 2.0
            + self.strength as f32 * 1.5
            + self.intelligence as f32 * 1.2
            + self.politics as f32 * 0.5
            + self.charisma as f32 * 0.8;
        let skill_bonus = self.skills.len() as u32 * 10;
        let level_bonus = self.level * 5;

        attributes.round() as u32 + skill_bonus + level_bonus
    }

    /// Tactics this commander's skills unlock, in skill order
    pub fn derived_tactics(&self) -> Vec<Tactic> {
        self.skills.iter().filter_map(|s| s.tactic()).collect()
    }
}

impl fmt::Display for Commander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
