//! Property-based tests for selection, rotation and clock invariants

use proptest::prelude::*;
use shadow_drill::config::WorkoutConfig;
use shadow_drill::moves::{MoveCatalog, MoveId};
use shadow_drill::workout::{hold_duration, RotationPicker, WorkoutClock, WorkoutSession};

fn catalog_id_strategy() -> impl Strategy<Value = MoveId> {
    (1u64..=10).prop_map(MoveId)
}

proptest! {
    #[test]
    fn toggling_twice_restores_selection(ids in prop::collection::vec(catalog_id_strategy(), 0..12), target in catalog_id_strategy()) {
        let mut catalog = MoveCatalog::default();
        for id in &ids {
            catalog.toggle(*id);
        }
        let before: Vec<MoveId> = catalog.selected().iter().map(|m| m.id).collect();

        catalog.toggle(target);
        catalog.toggle(target);

        let after: Vec<MoveId> = catalog.selected().iter().map(|m| m.id).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn picks_always_come_from_the_selection(seed in any::<u64>(), ids in prop::collection::vec(catalog_id_strategy(), 1..10), draws in 1usize..50) {
        let mut catalog = MoveCatalog::default();
        for id in &ids {
            if !catalog.get(*id).map(|m| m.selected).unwrap_or(false) {
                catalog.toggle(*id);
            }
        }
        let selected = catalog.selected();
        let mut picker = RotationPicker::from_seed(Some(seed));

        let mut previous = None;
        for _ in 0..draws {
            let pick = picker.pick(&selected, previous).unwrap();
            prop_assert!(selected.iter().any(|m| m.id == pick.id));
            previous = Some(pick.id);
        }
    }

    #[test]
    fn hold_scales_inversely_with_speed(secs in 1u32..=60, speed in 0.5f64..=2.0) {
        let hold = hold_duration(secs, speed).as_secs_f64();
        prop_assert!((hold - secs as f64 / speed).abs() < 1e-6);
        prop_assert!(hold >= secs as f64 / 2.0 - 1e-6);
        prop_assert!(hold <= secs as f64 * 2.0 + 1e-6);
    }

    #[test]
    fn clock_never_reports_its_bound(minutes in 1u32..=3, ticks in 0u32..400) {
        let mut clock = WorkoutClock::new(minutes);
        for _ in 0..ticks {
            clock.tick();
            prop_assert!(clock.elapsed_seconds() < clock.total_seconds());
            prop_assert_eq!(
                clock.elapsed_seconds() + clock.remaining_seconds(),
                clock.total_seconds()
            );
        }
    }

    #[test]
    fn rejected_settings_leave_session_unchanged(minutes in 0u32..200, speed in -1.0f64..4.0) {
        let mut session = WorkoutSession::new("prop", &WorkoutConfig::default());
        let accepted_minutes = session.set_workout_duration(minutes);
        prop_assert_eq!(accepted_minutes, (1..=60).contains(&minutes));
        if !accepted_minutes {
            prop_assert_eq!(session.workout_duration_minutes(), 5);
        }

        let accepted_speed = session.set_playback_speed(speed);
        prop_assert_eq!(accepted_speed, (0.5..=2.0).contains(&speed));
        if !accepted_speed {
            prop_assert_eq!(session.playback_speed(), 1.0);
        }
    }
}
