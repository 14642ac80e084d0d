//! Battle execution loop
//!
//! Opening (log + optional duel), then per phase:
//! tactics -> power -> casualties -> morale -> experience -> termination.
//! Rounds run Deployment through Retreat until one side is annihilated,
//! one side's morale collapses, or the round budget runs out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::commander::Commander;
use crate::battle::duel::{apply_duel_morale, resolve_duel, DuelOutcome};
use crate::battle::events::{BattleEvent, BattleEventLog, BattleEventType};
use crate::battle::morale::{apply_phase_morale, has_collapsed};
use crate::battle::phase::BattlePhase;
use crate::battle::resolution::{resolve_phase_casualties, PhaseCasualties};
use crate::battle::side::{troop_total, BattleSide, Side};
use crate::battle::tactics::Tactic;
use crate::battle::terrain::Terrain;
use crate::battle::units::CombatUnit;
use crate::core::config::{config, BattleConfig};
use crate::core::error::{BattleError, Result};
use crate::core::types::Round;

/// Why the battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Annihilation,
    MoraleCollapse,
    /// Round budget exhausted: a draw
    RoundLimit,
}

/// Final record of a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    /// None on a draw
    pub winner: Option<Side>,
    pub loser: Option<Side>,
    pub is_decisive: bool,
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
    pub battle_log: Vec<String>,
    pub exp_gained: u32,
    pub termination: Termination,
    pub rounds_fought: Round,
    pub phases_fought: u32,
    pub duel: Option<DuelOutcome>,
}

impl BattleResult {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    pub fn casualties(&self, side: Side) -> u32 {
        match side {
            Side::Attacker => self.attacker_casualties,
            Side::Defender => self.defender_casualties,
        }
    }

    pub fn total_casualties(&self) -> u32 {
        self.attacker_casualties.saturating_add(self.defender_casualties)
    }
}

/// What a single `step_phase` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep {
    pub round: Round,
    pub phase: BattlePhase,
    pub ended: bool,
}

/// A battle between two caller-owned sides
///
/// Units and commanders are borrowed mutably for the battle's lifetime and
/// updated in place; drop the battle to read them back.
pub struct Battle<'a, R> {
    attacker: BattleSide<'a>,
    defender: BattleSide<'a>,
    terrain: Terrain,
    max_rounds: Round,
    config: BattleConfig,
    rng: R,

    // Progress
    started: bool,
    round: Round,
    phase: BattlePhase,
    last_step: Option<PhaseStep>,
    phases_fought: u32,

    // Running totals
    attacker_casualties: u32,
    defender_casualties: u32,

    log: BattleEventLog,
    duel: Option<DuelOutcome>,
    result: Option<BattleResult>,
}

impl<'a, R: Rng> Battle<'a, R> {
    /// Set up a battle
    ///
    /// Fails if either side brings no troops, if both armies together
    /// exceed `u32::MAX` troops, or if the round budget is zero. On success
    /// every unit's attributes are clamped into bounds; nothing else
    /// changes until the first phase runs.
    pub fn new(
        attacker_units: &'a mut [CombatUnit],
        defender_units: &'a mut [CombatUnit],
        attacker_commanders: &'a mut [Commander],
        defender_commanders: &'a mut [Commander],
        terrain: Terrain,
        max_rounds: Round,
        rng: R,
    ) -> Result<Self> {
        for (side, units) in [
            (Side::Attacker, &*attacker_units),
            (Side::Defender, &*defender_units),
        ] {
            if units.is_empty() {
                return Err(BattleError::InvalidConfiguration(format!(
                    "the {} has no units",
                    side
                )));
            }
            if units.iter().all(|u| !u.is_active()) {
                return Err(BattleError::InvalidConfiguration(format!(
                    "the {} has no troops left",
                    side
                )));
            }
        }
        let troops = troop_total(attacker_units) + troop_total(defender_units);
        if troops > u32::MAX as u64 {
            return Err(BattleError::InvalidConfiguration(format!(
                "{} troops on the field, at most {} supported",
                troops,
                u32::MAX
            )));
        }
        if max_rounds == 0 {
            return Err(BattleError::InvalidConfiguration(
                "max_rounds must be at least 1".into(),
            ));
        }

        for unit in attacker_units.iter_mut().chain(defender_units.iter_mut()) {
            unit.clamp_attributes();
        }

        Ok(Self {
            attacker: BattleSide::new(Side::Attacker, attacker_units, attacker_commanders),
            defender: BattleSide::new(Side::Defender, defender_units, defender_commanders),
            terrain,
            max_rounds,
            config: config().clone(),
            rng,
            started: false,
            round: 1,
            phase: BattlePhase::Deployment,
            last_step: None,
            phases_fought: 0,
            attacker_casualties: 0,
            defender_casualties: 0,
            log: BattleEventLog::new(),
            duel: None,
            result: None,
        })
    }

    /// Override the process-wide config for this battle
    pub fn with_config(mut self, config: BattleConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Replace the tactics a side will attempt
    pub fn with_tactics(mut self, side: Side, tactics: impl IntoIterator<Item = Tactic>) -> Self {
        self.side_mut(side).set_tactics(tactics);
        self
    }

    pub fn side(&self, side: Side) -> &BattleSide<'a> {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BattleSide<'a> {
        match side {
            Side::Attacker => &mut self.attacker,
            Side::Defender => &mut self.defender,
        }
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn max_rounds(&self) -> Round {
        self.max_rounds
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Round of the next phase to run (1-based)
    pub fn round(&self) -> Round {
        self.round
    }

    /// Next phase to run
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&BattleResult> {
        self.result.as_ref()
    }

    pub fn duel(&self) -> Option<&DuelOutcome> {
        self.duel.as_ref()
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.log.events
    }

    /// Run phases until the battle ends
    pub fn run_to_completion(&mut self) -> BattleResult {
        loop {
            if let Some(result) = &self.result {
                return result.clone();
            }
            self.step_phase();
        }
    }

    /// Execute exactly one phase and advance the state machine
    ///
    /// Once the battle has ended this is a no-op reporting the last phase.
    pub fn step_phase(&mut self) -> PhaseStep {
        if self.result.is_some() {
            let last = self.last_step.unwrap_or(PhaseStep {
                round: self.round,
                phase: self.phase,
                ended: true,
            });
            return PhaseStep { ended: true, ..last };
        }

        if !self.started {
            self.open();
        }

        let round = self.round;
        let phase = self.phase;
        self.conduct_phase(round, phase);
        self.phases_fought += 1;

        let ended = if let Some((loser, termination)) = self.check_termination() {
            self.finish(Some(loser.opposite()), termination);
            true
        } else {
            match phase.next() {
                Some(next) => {
                    self.phase = next;
                    false
                }
                None if round >= self.max_rounds => {
                    self.finish(None, Termination::RoundLimit);
                    true
                }
                None => {
                    self.round += 1;
                    self.phase = BattlePhase::Deployment;
                    false
                }
            }
        };

        let step = PhaseStep {
            round,
            phase,
            ended,
        };
        self.last_step = Some(step);
        step
    }

    /// Opening log and the champions' duel
    fn open(&mut self) {
        self.started = true;
        self.log.set_cursor(0, None);

        tracing::info!(
            terrain = ?self.terrain,
            attacker_size = self.attacker.total_size(),
            defender_size = self.defender.total_size(),
            max_rounds = self.max_rounds,
            "battle started"
        );

        self.log.push(
            BattleEventType::BattleStarted,
            format!("Battle begins on {} terrain", self.terrain),
        );
        for side in [&self.attacker, &self.defender] {
            let line = format!(
                "{}: {} troops [{}], commanders: {}",
                capitalize(side.side.name()),
                side.total_size(),
                side.composition(),
                side.commander_names()
            );
            self.log.push(BattleEventType::BattleStarted, line);
        }

        if self.attacker.commanders.is_empty() || self.defender.commanders.is_empty() {
            return;
        }
        if self.rng.gen::<f32>() >= self.config.duel_chance {
            return;
        }

        let (Some(attacker), Some(defender)) = (self.attacker.champion(), self.defender.champion())
        else {
            return;
        };
        let outcome = resolve_duel(attacker, defender, &mut self.rng);

        self.log.push(
            BattleEventType::DuelFought {
                winner: outcome.winner,
            },
            format!(
                "{} defeats {} in single combat! The {}'s troops are emboldened.",
                outcome.winner_name(),
                outcome.loser_name(),
                outcome.winner
            ),
        );

        let swing = self.config.duel_morale_swing;
        match outcome.winner {
            Side::Attacker => apply_duel_morale(self.attacker.units, self.defender.units, swing),
            Side::Defender => apply_duel_morale(self.defender.units, self.attacker.units, swing),
        }
        self.duel = Some(outcome);
    }

    fn conduct_phase(&mut self, round: Round, phase: BattlePhase) {
        self.log.set_cursor(round, Some(phase));
        self.log.push(
            BattleEventType::PhaseStarted,
            format!("Round {} - {} phase", round, phase),
        );

        let report = resolve_phase_casualties(
            &mut self.attacker,
            &mut self.defender,
            phase,
            self.terrain,
            &mut self.rng,
            &self.config,
            &mut self.log,
        );

        self.log.push(
            BattleEventType::PowerAssessed {
                attacker: report.attacker_power,
                defender: report.defender_power,
            },
            format!(
                "Power: attacker {:.0} vs defender {:.0}",
                report.attacker_power, report.defender_power
            ),
        );

        self.attacker_casualties += report.attacker;
        self.defender_casualties += report.defender;
        self.log_casualties(&report);

        let delta = apply_phase_morale(self.attacker.units, self.defender.units, &report);
        if delta != 0 {
            let (gainer, loser) = if delta > 0 {
                (Side::Attacker, Side::Defender)
            } else {
                (Side::Defender, Side::Attacker)
            };
            self.log.push(
                BattleEventType::MoraleShifted {
                    side: gainer,
                    delta: delta.abs(),
                },
                format!(
                    "The {}'s morale rises by {} while the {}'s falls",
                    gainer,
                    delta.abs(),
                    loser
                ),
            );
        }

        self.award_phase_experience(report.attacker + report.defender);

        tracing::debug!(
            round,
            ?phase,
            attacker_remaining = self.attacker.total_size(),
            defender_remaining = self.defender.total_size(),
            attacker_morale = self.attacker.average_morale(),
            defender_morale = self.defender.average_morale(),
            "phase complete"
        );
    }

    fn log_casualties(&mut self, report: &PhaseCasualties) {
        for (side, amount) in [
            (Side::Attacker, report.attacker),
            (Side::Defender, report.defender),
        ] {
            let remaining = self.side(side).total_size();
            self.log.push(
                BattleEventType::Casualties { side, amount },
                format!(
                    "The {} loses {} troops ({} remain)",
                    side, amount, remaining
                ),
            );
        }

        for &(side, unit_id) in &report.annihilated {
            let troop = self
                .side(side)
                .units
                .iter()
                .find(|u| u.id == unit_id)
                .map(|u| u.primary_type.name())
                .unwrap_or("unknown");
            self.log.push(
                BattleEventType::UnitAnnihilated { side, unit_id },
                format!("The {}'s {} unit has been wiped out", side, troop),
            );
        }
    }

    /// Units still standing learn from every phase; commanders from the
    /// bloodshed they oversee
    fn award_phase_experience(&mut self, phase_casualties: u32) {
        let unit_exp = self.config.unit_experience_per_phase;
        let commander_exp = phase_casualties
            .checked_div(self.config.commander_experience_divisor)
            .unwrap_or(0)
            .max(1);

        for side in [&mut self.attacker, &mut self.defender] {
            for unit in side.units.iter_mut().filter(|u| u.is_active()) {
                unit.gain_experience(unit_exp);
            }
            for commander in side.commanders.iter_mut() {
                commander.gain_experience(commander_exp);
            }
        }
    }

    /// The losing side and why, if the battle is over
    ///
    /// The attacker is checked first, so if both sides break at once the
    /// defender holds the field.
    fn check_termination(&mut self) -> Option<(Side, Termination)> {
        let threshold = self.config.morale_collapse_threshold;

        for side in [Side::Attacker, Side::Defender] {
            let battle_side = self.side(side);
            let (annihilated, morale) = (battle_side.is_annihilated(), battle_side.average_morale());

            if annihilated {
                self.log.push(
                    BattleEventType::SideAnnihilated { side },
                    format!("The {}'s army has been annihilated!", side),
                );
                return Some((side, Termination::Annihilation));
            }

            if has_collapsed(morale, threshold) {
                self.log.push(
                    BattleEventType::MoraleCollapsed { side },
                    format!("The {}'s morale collapses and the army flees!", side),
                );
                return Some((side, Termination::MoraleCollapse));
            }
        }

        None
    }

    fn finish(&mut self, winner: Option<Side>, termination: Termination) {
        self.log.set_cursor(self.round, None);

        match winner {
            Some(side) => {
                let fatigue = self.config.victory_fatigue;
                for unit in self.side_mut(side).units.iter_mut() {
                    unit.add_fatigue(fatigue);
                }
            }
            None => {
                let fatigue = self.config.draw_fatigue;
                for side in [&mut self.attacker, &mut self.defender] {
                    for unit in side.units.iter_mut() {
                        unit.add_fatigue(fatigue);
                    }
                }
            }
        }

        let is_decisive = winner
            .map(|side| self.side(side).survivor_ratio() >= self.config.decisive_survivor_ratio)
            .unwrap_or(false);

        let total_casualties = self.attacker_casualties + self.defender_casualties;
        let exp_gained = total_casualties
            .checked_div(self.config.result_experience_divisor)
            .unwrap_or(0)
            .max(self.config.min_result_experience);

        let verdict = match winner {
            Some(side) if is_decisive => format!("The {} wins a decisive victory!", side),
            Some(side) => format!("The {} wins the battle.", side),
            None => "The battle ends in a draw.".to_string(),
        };
        self.log.push(BattleEventType::BattleEnded { winner }, verdict);
        self.log.push(
            BattleEventType::BattleEnded { winner },
            format!(
                "Casualties - attacker: {}, defender: {}",
                self.attacker_casualties, self.defender_casualties
            ),
        );

        tracing::info!(
            ?winner,
            ?termination,
            is_decisive,
            attacker_casualties = self.attacker_casualties,
            defender_casualties = self.defender_casualties,
            rounds = self.round,
            "battle ended"
        );

        self.result = Some(BattleResult {
            winner,
            loser: winner.map(|w| w.opposite()),
            is_decisive,
            attacker_casualties: self.attacker_casualties,
            defender_casualties: self.defender_casualties,
            battle_log: self.log.descriptions(),
            exp_gained,
            termination,
            rounds_fought: self.round,
            phases_fought: self.phases_fought,
            duel: self.duel.clone(),
        });
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
