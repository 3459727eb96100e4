//! Property-based invariant tests for the pull-to-collapse tracker.
//!
//! 1. `Release` never appears without a preceding `Pull` in the same gesture
//! 2. The eligibility carried by `Release` matches the last `Pull`
//! 3. Eligibility always agrees with the threshold on the emitted translation
//! 4. No panics on arbitrary sample sequences

use proptest::prelude::*;
use unfold_core::pull::{InterceptResult, PullConfig, PullEvent, PullTracker, TouchEvent};

// ── Strategies ──────────────────────────────────────────────────────────

fn touch_strategy() -> impl Strategy<Value = TouchEvent> {
    prop_oneof![
        1 => (0.0f32..400.0, 0.0f32..800.0).prop_map(|(x, y)| TouchEvent::Down { x, y }),
        6 => (0.0f32..400.0, 0.0f32..800.0).prop_map(|(x, y)| TouchEvent::Move { x, y }),
        1 => (0.0f32..400.0, 0.0f32..800.0).prop_map(|(x, y)| TouchEvent::Up { x, y }),
        1 => Just(TouchEvent::Cancel),
    ]
}

fn allow(_: f32, _: f32, _: bool) -> InterceptResult {
    InterceptResult::Ignored
}

proptest! {
    #[test]
    fn release_follows_pull(events in prop::collection::vec(touch_strategy(), 0..64)) {
        let config = PullConfig::default();
        let mut tracker = PullTracker::new(config.clone());
        let mut translation = 0.0f32;
        let mut last_pull: Option<bool> = None;

        for event in events {
            if matches!(event, TouchEvent::Down { .. }) {
                last_pull = None;
            }
            match tracker.process(event, translation, allow) {
                Some(PullEvent::Pull { current_translation_y, collapse_eligible, .. }) => {
                    prop_assert_eq!(
                        collapse_eligible,
                        current_translation_y.abs() >= config.collapse_threshold
                    );
                    translation = current_translation_y;
                    last_pull = Some(collapse_eligible);
                }
                Some(PullEvent::Release { collapse_eligible }) => {
                    let Some(expected) = last_pull.take() else {
                        return Err(TestCaseError::fail("release without pull"));
                    };
                    if matches!(event, TouchEvent::Cancel) {
                        prop_assert!(!collapse_eligible);
                    } else {
                        prop_assert_eq!(collapse_eligible, expected);
                    }
                    translation = 0.0;
                }
                None => {}
            }
        }
    }

    #[test]
    fn vetoed_gestures_never_emit(events in prop::collection::vec(touch_strategy(), 0..64)) {
        let mut tracker = PullTracker::default();
        for event in events {
            let out = tracker.process(event, 0.0, |_, _, _| InterceptResult::Intercepted);
            prop_assert!(out.is_none());
        }
    }
}
