#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::thread;
use std::time::Duration;

use organism_core::metrics::{HistogramVec, MetricOpts, Registry};

const BUCKETS: [f64; 6] = [0.05, 0.1, 0.25, 0.5, 0.75, 1.0];
const BRAIN: [(&str, &str); 1] = [("service", "brain-service")];

fn latency(reg: &Registry) -> std::sync::Arc<HistogramVec> {
    reg.register_histogram(
        MetricOpts::new("http_request_duration_seconds", "latency").label_names(&["service"]),
        BUCKETS.to_vec(),
    )
    .unwrap()
}

#[test]
fn observation_lands_in_every_bucket_at_or_above_it() {
    let reg = Registry::new();
    let h = latency(&reg);
    assert_eq!(h.buckets(), BUCKETS);

    for v in [0.0, 0.05, 0.07, 0.3, 0.75, 2.0] {
        h.observe(&BRAIN, v).unwrap();
    }

    let snap = h.snapshot_for(&BRAIN).unwrap();
    let counts: Vec<u64> = snap.buckets.iter().map(|(_, c)| *c).collect();
    // le=0.05 holds 0.0 and the exact boundary 0.05; 2.0 only reaches +Inf
    assert_eq!(counts, [2, 3, 3, 4, 5, 5]);
    assert_eq!(snap.count, 6);
    assert!((snap.sum - 3.17).abs() < 1e-9);
}

#[test]
fn bucket_membership_matches_bound_comparison() {
    let values = [0.01, 0.05, 0.051, 0.1, 0.2, 0.49, 0.5, 0.9, 1.0, 1.5];
    for v in values {
        let reg = Registry::new();
        let h = latency(&reg);
        h.observe(&BRAIN, v).unwrap();
        let snap = h.snapshot_for(&BRAIN).unwrap();
        for (le, count) in snap.buckets {
            let expected = u64::from(v <= le);
            assert_eq!(count, expected, "v={v} le={le}");
        }
    }
}

#[test]
fn invalid_observations_leave_registry_untouched() {
    let reg = Registry::new();
    let h = latency(&reg);
    h.observe(&BRAIN, 0.2).unwrap();
    let before = reg.render();

    for bad in [-0.001, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = h.observe(&BRAIN, bad).unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_OBSERVATION");
        assert!(!err.is_fatal());
    }
    // an unseen label set must not be created by a rejected value
    h.observe(&[("service", "ghost")], -1.0).unwrap_err();

    assert_eq!(reg.render(), before);
    assert!(h.snapshot_for(&[("service", "ghost")]).is_none());
}

#[test]
fn timer_observes_once_on_drop() {
    let reg = Registry::new();
    let child = latency(&reg).with_labels(&BRAIN).unwrap();

    {
        let _timer = child.start_timer();
        thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(child.count(), 1);
    assert!(child.sum() >= 0.02);
}

#[test]
fn timer_observes_once_on_early_return() {
    fn work(child: &organism_core::metrics::Histogram, fail: bool) -> Result<(), &'static str> {
        let _timer = child.start_timer();
        if fail {
            return Err("early");
        }
        Ok(())
    }

    let reg = Registry::new();
    let child = latency(&reg).with_labels(&BRAIN).unwrap();
    work(&child, true).unwrap_err();
    work(&child, false).unwrap();
    assert_eq!(child.count(), 2);
}

#[test]
fn explicit_observe_duration_is_not_repeated_by_drop() {
    let reg = Registry::new();
    let child = latency(&reg).with_labels(&BRAIN).unwrap();

    let timer = child.start_timer();
    thread::sleep(Duration::from_millis(5));
    let waited = timer.elapsed();
    assert!(waited >= Duration::from_millis(5));
    assert_eq!(child.count(), 0);
    let secs = timer.observe_duration().unwrap();

    assert!(secs >= waited.as_secs_f64());
    assert_eq!(child.count(), 1);
    assert!((child.sum() - secs).abs() < 1e-12);
}
