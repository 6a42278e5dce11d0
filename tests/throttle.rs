use std::time::Duration;

use clats::{LoadThrottle, NoThrottle, SystemLoadThrottle, ThrottleConfig};

#[test]
fn no_throttle_never_pauses() {
    let throttle = NoThrottle;
    for _ in 0..100 {
        assert!(!throttle.should_pause());
    }
    assert_eq!(throttle.pause_duration(), Duration::ZERO);
}

#[test]
fn pause_duration_comes_from_config() {
    let throttle = SystemLoadThrottle::new(ThrottleConfig {
        pause_ms: 42,
        ..ThrottleConfig::default()
    });
    assert_eq!(throttle.pause_duration(), Duration::from_millis(42));
}

#[test]
fn samples_are_rate_limited() {
    let throttle = SystemLoadThrottle::new(ThrottleConfig {
        sample_interval_ms: 60_000,
        ..ThrottleConfig::default()
    });
    let _ = throttle.should_pause();
    let first = throttle.state();
    for _ in 0..1_000 {
        let _ = throttle.should_pause();
    }
    assert_eq!(throttle.state(), first);
}

#[test]
fn shared_across_threads() {
    let throttle = std::sync::Arc::new(SystemLoadThrottle::new(ThrottleConfig::default()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let throttle = throttle.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let _ = throttle.should_pause();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let load = throttle.state().last_load_percent;
    assert!(load.is_finite());
}
