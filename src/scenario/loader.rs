//! Load battle scenarios from TOML files

use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::scenario::BattleScenario;

/// Parse a scenario from TOML text
///
/// Unit attributes are clamped into their bounds and a config override is
/// validated, so a loaded scenario is always ready to fight.
pub fn parse_scenario(contents: &str) -> Result<BattleScenario> {
    let mut scenario: BattleScenario = toml::from_str(contents)?;

    for unit in scenario
        .attacker
        .units
        .iter_mut()
        .chain(scenario.defender.units.iter_mut())
    {
        unit.clamp_attributes();
    }

    if let Some(config) = &scenario.config {
        config.validate()?;
    }

    Ok(scenario)
}

/// Load a scenario file, naming it after the file stem if it has no name
pub fn load_scenario(path: impl AsRef<Path>) -> Result<BattleScenario> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mut scenario = parse_scenario(&contents)?;

    if scenario.name.is_empty() {
        if let Some(stem) = path.file_stem() {
            scenario.name = stem.to_string_lossy().into_owned();
        }
    }

    tracing::debug!(name = %scenario.name, path = ?path, "scenario loaded");
    Ok(scenario)
}
