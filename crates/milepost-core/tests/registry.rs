#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use milepost_core::{MetricDefinition, Registry};

fn duration_def() -> MetricDefinition {
    MetricDefinition::histogram(
        "http_request_duration_seconds",
        "HTTP request latency.",
        &["method", "route", "status_code"],
    )
}

#[test]
fn duplicate_registration_fails() {
    let mut reg = Registry::new();
    reg.register(duration_def()).expect("first must register");
    let err = reg.register(duration_def()).expect_err("second must fail");
    assert!(err.to_string().contains("duplicate metric"));
}

#[test]
fn observe_rejects_mismatched_labels() {
    let mut reg = Registry::new();
    let h = reg.register(duration_def()).unwrap();

    // Missing one declared label.
    let err = reg
        .observe(h, &[("method", "GET"), ("route", "/x")], 0.1)
        .expect_err("must reject");
    assert!(err.to_string().contains("unknown labels"));

    // Right arity, wrong key.
    let err = reg
        .observe(
            h,
            &[("method", "GET"), ("route", "/x"), ("path", "/x/1")],
            0.1,
        )
        .expect_err("must reject");
    assert!(err.to_string().contains("unknown labels"));

    // Nothing was recorded.
    assert!(!reg.snapshot().contains("_count{method"));
}

#[test]
fn counter_op_on_histogram_is_kind_mismatch() {
    let mut reg = Registry::new();
    let h = reg.register(duration_def()).unwrap();
    let err = reg
        .inc(h, &[("method", "GET"), ("route", "/x"), ("status_code", "200")])
        .expect_err("must reject");
    assert!(err.to_string().contains("not a counter"));
}

#[test]
fn observation_round_trip() {
    let mut reg = Registry::new();
    let h = reg.register(duration_def()).unwrap();

    let d = 0.042_f64;
    reg.observe(
        h,
        &[("method", "GET"), ("route", "/x"), ("status_code", "200")],
        d,
    )
    .unwrap();

    let snap = reg.snapshot();
    let series = "method=\"GET\",route=\"/x\",status_code=\"200\"";
    assert!(snap.contains(&format!(
        "http_request_duration_seconds_count{{{series}}} 1"
    )));

    // Sum within floating point tolerance of the observed duration.
    let sum_line = snap
        .lines()
        .find(|l| l.starts_with("http_request_duration_seconds_sum"))
        .expect("sum line present");
    let sum: f64 = sum_line.rsplit(' ').next().unwrap().parse().unwrap();
    assert!((sum - d).abs() < 1e-9, "sum {sum} should be ~{d}");

    // 42ms lands in the 0.05 bucket but not the 0.025 one.
    assert!(snap.contains(&format!(
        "http_request_duration_seconds_bucket{{{series},le=\"0.025\"}} 0"
    )));
    assert!(snap.contains(&format!(
        "http_request_duration_seconds_bucket{{{series},le=\"0.05\"}} 1"
    )));
    assert!(snap.contains(&format!(
        "http_request_duration_seconds_bucket{{{series},le=\"+Inf\"}} 1"
    )));
}

#[test]
fn label_order_does_not_matter_for_recording() {
    let mut reg = Registry::new();
    let h = reg.register(duration_def()).unwrap();

    reg.observe(
        h,
        &[("status_code", "200"), ("method", "GET"), ("route", "/x")],
        0.01,
    )
    .unwrap();
    reg.observe(
        h,
        &[("method", "GET"), ("route", "/x"), ("status_code", "200")],
        0.01,
    )
    .unwrap();

    // Both observations hit the same series.
    assert!(reg.snapshot().contains(
        "http_request_duration_seconds_count{method=\"GET\",route=\"/x\",status_code=\"200\"} 2"
    ));
}

#[test]
fn counters_accumulate() {
    let mut reg = Registry::new();
    let h = reg
        .register(MetricDefinition::counter(
            "rejections_total",
            "Rejected requests.",
            &["reason"],
        ))
        .unwrap();

    reg.inc(h, &[("reason", "quota")]).unwrap();
    reg.add(h, &[("reason", "quota")], 4).unwrap();

    assert!(reg
        .snapshot()
        .contains("rejections_total{reason=\"quota\"} 5"));
}

#[test]
fn concurrent_observations_lose_no_updates() {
    let mut reg = Registry::new();
    let h = reg.register(duration_def()).unwrap();
    let reg = Arc::new(reg);

    const THREADS: usize = 8;
    const PER_THREAD: usize = 50;

    let mut handles = vec![];
    for _ in 0..THREADS {
        let reg = Arc::clone(&reg);
        handles.push(thread::spawn(move || {
            for _ in 0..PER_THREAD {
                reg.observe(
                    h,
                    &[("method", "GET"), ("route", "/x"), ("status_code", "200")],
                    0.001,
                )
                .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = THREADS * PER_THREAD;
    assert!(reg.snapshot().contains(&format!(
        "http_request_duration_seconds_count{{method=\"GET\",route=\"/x\",status_code=\"200\"}} {expected}"
    )));
}
