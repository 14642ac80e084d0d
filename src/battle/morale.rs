//! Morale tracking
//!
//! After every phase the side that bled relatively less gains morale and
//! the other side loses the same amount. Sides whose size-weighted
//! average morale falls under the collapse threshold break.

use crate::battle::resolution::PhaseCasualties;
use crate::battle::units::CombatUnit;

/// Percentage of `total` lost; zero for an empty side
pub fn loss_percent(casualties: u32, total: u32) -> f32 {
    if total == 0 {
        return 0.0;
    }
    casualties as f32 * 100.0 / total as f32
}

/// Morale shift for the attacker after a phase
///
/// Half the gap between the defender's and the attacker's percentage
/// losses, truncated toward zero. The defender shifts by the negation.
pub fn phase_morale_delta(casualties: &PhaseCasualties) -> i32 {
    let defender_loss = loss_percent(casualties.defender, casualties.defender_size_before);
    let attacker_loss = loss_percent(casualties.attacker, casualties.attacker_size_before);
    ((defender_loss - attacker_loss) / 2.0) as i32
}

/// Shift every unit's morale by `delta`, clamped per unit
pub fn shift_morale(units: &mut [CombatUnit], delta: i32) {
    for unit in units.iter_mut() {
        unit.adjust_morale(delta);
    }
}

/// Apply the post-phase morale swing to both sides
///
/// Returns the attacker's shift.
pub fn apply_phase_morale(
    attacker_units: &mut [CombatUnit],
    defender_units: &mut [CombatUnit],
    casualties: &PhaseCasualties,
) -> i32 {
    let delta = phase_morale_delta(casualties);
    if delta != 0 {
        shift_morale(attacker_units, delta);
        shift_morale(defender_units, -delta);
    }
    delta
}

/// Has this side's size-weighted morale fallen under `threshold`?
pub fn has_collapsed(average_morale: f32, threshold: f32) -> bool {
    average_morale < threshold
}
