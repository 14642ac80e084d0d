//! Battlefield terrain and the troop-vs-terrain effect table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::troop::TroopType;

/// Terrain the whole battle is fought on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Plain,
    Mountain,
    Forest,
    River,
    Marsh,
    City, // Walled, favours the defender
    Fort, // Pass or fortress, favours the defender
}

impl Terrain {
    pub const ALL: [Terrain; 7] = [
        Terrain::Plain,
        Terrain::Mountain,
        Terrain::Forest,
        Terrain::River,
        Terrain::Marsh,
        Terrain::City,
        Terrain::Fort,
    ];

    /// Does the defending side fight from fortifications here?
    pub fn is_fortified(&self) -> bool {
        matches!(self, Terrain::City | Terrain::Fort)
    }

    /// Can fire be set here?
    pub fn is_flammable(&self) -> bool {
        matches!(self, Terrain::Forest | Terrain::City)
    }

    /// Power multiplier for `troop` fighting on this terrain
    ///
    /// Fortified terrain has no per-troop entry and is neutral (1.0); its
    /// advantage comes from the defender bonus instead.
    pub fn effect_on(&self, troop: TroopType) -> f32 {
        use Terrain::*;
        use TroopType::*;
        match (troop, *self) {
            (_, City) | (_, Fort) => 1.0,

            (Infantry, Plain) => 1.0,
            (Infantry, Mountain) => 0.9,
            (Infantry, Forest) => 0.9,
            (Infantry, River) => 0.7,
            (Infantry, Marsh) => 0.8,

            (Cavalry, Plain) => 1.2,
            (Cavalry, Mountain) => 0.6,
            (Cavalry, Forest) => 0.7,
            (Cavalry, River) => 0.5,
            (Cavalry, Marsh) => 0.6,

            (Archer | Crossbowman, Plain) => 1.0,
            (Archer | Crossbowman, Mountain) => 1.1,
            (Archer | Crossbowman, Forest) => 0.8,
            (Archer | Crossbowman, River) => 0.9,
            (Archer | Crossbowman, Marsh) => 0.8,

            (Spearman, Plain) => 1.0,
            (Spearman, Mountain) => 0.9,
            (Spearman, Forest) => 0.9,
            (Spearman, River) => 0.7,
            (Spearman, Marsh) => 0.8,

            (Shielded, Plain) => 1.0,
            (Shielded, Mountain) => 0.9,
            (Shielded, Forest) => 0.9,
            (Shielded, River) => 0.7,
            (Shielded, Marsh) => 0.7,

            (Navy, Plain) => 0.6,
            (Navy, Mountain) => 0.5,
            (Navy, Forest) => 0.5,
            (Navy, River) => 1.5,
            (Navy, Marsh) => 1.2,

            (Siege, Plain) => 0.9,
            (Siege, Mountain) => 0.7,
            (Siege, Forest) => 0.7,
            (Siege, River) => 0.5,
            (Siege, Marsh) => 0.6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Plain => "Plain",
            Terrain::Mountain => "Mountain",
            Terrain::Forest => "Forest",
            Terrain::River => "River",
            Terrain::Marsh => "Marsh",
            Terrain::City => "City",
            Terrain::Fort => "Fort",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
