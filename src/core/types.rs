//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for combat units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for commanders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommanderId(pub Uuid);

impl CommanderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommanderId {
    fn default() -> Self {
        Self::new()
    }
}

/// Round counter within a battle
pub type Round = u32;
