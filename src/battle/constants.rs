//! Battle system constants - fixed rule values in one place
//!
//! Tunable knobs live in `core::config`; these are the bounds and
//! multipliers that define the rules themselves.

// Unit attribute bounds
pub const MORALE_MIN: u32 = 10;
pub const MORALE_MAX: u32 = 100;
pub const TRAINING_MAX: u32 = 100;
pub const FATIGUE_MAX: u32 = 100;
pub const DEFAULT_EQUIPMENT_LEVEL: u32 = 1;

// Power factors
pub const EQUIPMENT_BONUS_PER_LEVEL: f32 = 0.1;
pub const EXPERIENCE_BONUS_PER_POINT: f32 = 0.0001;
pub const LEADERSHIP_BONUS_PER_POINT: f32 = 0.005;

// Phase-specific arms bonuses
pub const RANGED_VOLLEY_BONUS: f32 = 1.2; // Archers/crossbowmen loosing first
pub const MELEE_LINE_BONUS: f32 = 1.1; // Infantry/spearmen in the press
pub const PURSUIT_CAVALRY_BONUS: f32 = 1.3; // Cavalry running down the broken
pub const SHIELD_WALL_BONUS: f32 = 1.3; // Shielded troops under missile fire
pub const FORTIFICATION_BONUS: f32 = 1.25; // Defending walls or a pass

// Phase-specific casualty adjustments
pub const CASUALTY_RATE_CAP: f32 = 0.3; // No side loses more per phase
pub const ARCHER_INFLICT_MULTIPLIER: f32 = 1.5;
pub const ARCHER_RECEIVE_MULTIPLIER: f32 = 0.7;
pub const CAVALRY_PURSUIT_MULTIPLIER: f32 = 1.8;

// Morale lost per whole unit-fraction of casualties (10% lost = 2 morale)
pub const CASUALTY_MORALE_FACTOR: f32 = 20.0;

// Duel
pub const DUEL_STRENGTH_WEIGHT: f32 = 0.7;
pub const DUEL_INTELLIGENCE_WEIGHT: f32 = 0.3;
pub const DUEL_ROLL_MIN: u32 = 1;
pub const DUEL_ROLL_MAX: u32 = 20;
pub const DUEL_SKILL_MULTIPLIER: f32 = 1.25;

// Unit upkeep
pub const REST_MORALE_PER_DAY: u32 = 5;
pub const REST_FATIGUE_PER_DAY: u32 = 10;
pub const TRAINING_GAIN_PER_DAY: f32 = 0.5;
pub const TRAINING_LEADERSHIP_FACTOR: f32 = 0.01;
pub const TRAINING_FATIGUE_PER_DAY: u32 = 5;
