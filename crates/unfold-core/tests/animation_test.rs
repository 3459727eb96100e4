//! Integration tests for the animation module.

use std::time::Duration;
use unfold_core::animation::*;

const MS_100: Duration = Duration::from_millis(100);
const SEC_1: Duration = Duration::from_secs(1);

#[test]
fn tween_duration_tracking() {
    let mut tween = Tween::new(0.0, 1.0, SEC_1);
    for _ in 0..1000 {
        tween.tick(Duration::from_millis(1));
    }
    assert!(tween.is_complete(), "1000x1ms should complete 1s tween");
}

#[test]
fn frame_sized_ticks_reach_target() {
    let mut tween = Tween::new(80.0, 1920.0, Duration::from_millis(250)).easing(fast_out_slow_in);
    let mut frames = 0;
    while !tween.is_complete() {
        tween.tick(Duration::from_millis(16));
        frames += 1;
    }
    assert_eq!(frames, 16);
    assert_eq!(tween.current(), 1920.0);
}

#[test]
fn delayed_tween_starts_after_delay() {
    let mut tween = Tween::new(1.0, 0.0, MS_100).delay(MS_100);
    tween.tick(MS_100);
    assert_eq!(tween.current(), 1.0);
    assert!(!tween.is_complete());
    tween.tick(MS_100);
    assert!(tween.is_complete());
    assert_eq!(tween.current(), 0.0);
}

#[test]
fn decreasing_tween_stays_between_endpoints() {
    let mut tween = Tween::new(200.0, 0.0, SEC_1).easing(ease_in_out);
    for _ in 0..100 {
        tween.tick(Duration::from_millis(10));
        let v = tween.current();
        assert!((0.0..=200.0).contains(&v), "out of range: {v}");
    }
}

#[test]
fn easing_functions_are_monotonic() {
    for easing in [
        linear,
        ease_in,
        ease_out,
        ease_in_out,
        ease_in_cubic,
        ease_out_cubic,
        fast_out_slow_in,
    ] {
        let mut prev = 0.0f32;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let v = easing(t);
            assert!(v >= prev - 0.001, "easing should be monotonic at t={}", t);
            prev = v;
        }
    }
}
