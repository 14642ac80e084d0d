//! Property tests for casualty distribution and attribute bounds

use kingdoms_battle::battle::*;
use kingdoms_battle::core::BattleConfig;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn troop_type() -> impl Strategy<Value = TroopType> {
    prop::sample::select(TroopType::ALL.to_vec())
}

fn terrain() -> impl Strategy<Value = Terrain> {
    prop::sample::select(Terrain::ALL.to_vec())
}

fn unit() -> impl Strategy<Value = CombatUnit> {
    (troop_type(), 0u32..5000, 0u32..150, 0u32..150, 0u32..150).prop_map(
        |(troop, size, morale, training, fatigue)| {
            CombatUnit::new(troop, size, morale, training).with_fatigue(fatigue)
        },
    )
}

/// Troop types with no arms bonus, no counters and no archer or cavalry
/// casualty adjustments
fn neutral_troop() -> impl Strategy<Value = TroopType> {
    prop::sample::select(vec![TroopType::Navy, TroopType::Siege])
}

fn open_terrain() -> impl Strategy<Value = Terrain> {
    prop::sample::select(
        Terrain::ALL
            .iter()
            .copied()
            .filter(|t| !t.is_fortified())
            .collect::<Vec<_>>(),
    )
}

fn neutral_unit() -> impl Strategy<Value = CombatUnit> {
    (neutral_troop(), 1000u32..5000, 30u32..=100, 30u32..=100).prop_map(
        |(troop, size, morale, training)| CombatUnit::new(troop, size, morale, training),
    )
}

proptest! {
    #[test]
    fn prop_distribution_conserves_total(
        sizes in prop::collection::vec(0u32..10_000, 1..8),
        total in 0u32..50_000,
    ) {
        let units: Vec<CombatUnit> = sizes
            .iter()
            .map(|&size| CombatUnit::new(TroopType::Infantry, size, 50, 50))
            .collect();
        let side_size: u32 = sizes.iter().sum();

        let shares = distribute_casualties(&units, total);

        prop_assert_eq!(shares.len(), units.len());
        prop_assert_eq!(shares.iter().sum::<u32>(), total.min(side_size));
        for (share, unit) in shares.iter().zip(&units) {
            prop_assert!(*share <= unit.size);
            if unit.size == 0 {
                prop_assert_eq!(*share, 0);
            }
        }
    }

    #[test]
    fn prop_casualty_rates_bounded(
        ratio in 0.0001f32..10_000.0,
        phase in prop::sample::select(BattlePhase::ALL.to_vec()),
        attacker_ranged: bool,
        defender_ranged: bool,
        attacker_cavalry: bool,
    ) {
        let config = BattleConfig::default();
        let arms = ArmsPresence { attacker_ranged, defender_ranged, attacker_cavalry };
        let rates = casualty_rates(ratio, phase, arms, &config);

        prop_assert!((0.0..=config.max_casualty_rate).contains(&rates.attacker));
        prop_assert!((0.0..=config.max_casualty_rate).contains(&rates.defender));
        prop_assert!(rates.attacker.max(rates.defender) <= CASUALTY_RATE_CAP);
    }

    #[test]
    fn prop_power_never_negative(
        unit in unit(),
        terrain in terrain(),
        phase in prop::sample::select(BattlePhase::ALL.to_vec()),
        opposing in prop::collection::vec(troop_type(), 0..4),
        defending: bool,
    ) {
        let none = TacticRolls::none();
        let side = if defending { Side::Defender } else { Side::Attacker };
        let ctx = PowerContext { phase, terrain, side, tactics: &none, opposing: &opposing };

        let power = compute_power(&unit, &ctx, None).power;
        prop_assert!(power >= 0.0);
        prop_assert!(power.is_finite());
    }

    #[test]
    fn prop_battle_keeps_units_in_bounds(
        attackers in prop::collection::vec(unit(), 1..4),
        defenders in prop::collection::vec(unit(), 1..4),
        terrain in terrain(),
        max_rounds in 1u32..4,
        seed: u64,
    ) {
        let mut attackers = attackers;
        let mut defenders = defenders;
        prop_assume!(attackers.iter().any(|u| u.size > 0));
        prop_assume!(defenders.iter().any(|u| u.size > 0));

        let start_attackers: u32 = attackers.iter().map(|u| u.size).sum();
        let start_defenders: u32 = defenders.iter().map(|u| u.size).sum();

        let (mut ca, mut cd): (Vec<Commander>, Vec<Commander>) = (Vec::new(), Vec::new());
        let result = Battle::new(
            &mut attackers,
            &mut defenders,
            &mut ca,
            &mut cd,
            terrain,
            max_rounds,
            ChaCha8Rng::seed_from_u64(seed),
        )
        .map(|mut battle| battle.run_to_completion());
        prop_assert!(result.is_ok());
        let result = result.unwrap();

        prop_assert!(result.rounds_fought <= max_rounds);
        prop_assert!(result.phases_fought <= max_rounds * 5);

        let end_attackers: u32 = attackers.iter().map(|u| u.size).sum();
        let end_defenders: u32 = defenders.iter().map(|u| u.size).sum();
        prop_assert_eq!(start_attackers - end_attackers, result.attacker_casualties);
        prop_assert_eq!(start_defenders - end_defenders, result.defender_casualties);

        for unit in attackers.iter().chain(defenders.iter()) {
            prop_assert!((10..=100).contains(&unit.morale));
            prop_assert!(unit.fatigue <= 100);
            prop_assert!(unit.training <= 100);
        }
    }

    #[test]
    fn prop_mirrored_sides_suffer_equally(
        units in prop::collection::vec(neutral_unit(), 1..4),
        terrain in open_terrain(),
        max_rounds in 1u32..4,
        seed: u64,
    ) {
        let mut attackers = units.clone();
        let mut defenders = units;
        let (mut ca, mut cd): (Vec<Commander>, Vec<Commander>) = (Vec::new(), Vec::new());

        let battle = Battle::new(
            &mut attackers,
            &mut defenders,
            &mut ca,
            &mut cd,
            terrain,
            max_rounds,
            ChaCha8Rng::seed_from_u64(seed),
        );
        prop_assert!(battle.is_ok());
        let mut battle = battle.unwrap();
        let result = battle.run_to_completion();

        let mut phases = 0;
        for event in battle.events() {
            if let BattleEventType::PowerAssessed { attacker, defender } = &event.event_type {
                prop_assert_eq!(*attacker, *defender);
                phases += 1;
            }
        }
        prop_assert_eq!(phases, result.phases_fought);
        drop(battle);

        prop_assert_eq!(result.attacker_casualties, result.defender_casualties);
        for (a, d) in attackers.iter().zip(&defenders) {
            prop_assert_eq!(a.size, d.size);
            prop_assert_eq!(a.morale, d.morale);
        }
    }
}
