#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use milepost_core::{MetricDefinition, Registry};

#[test]
fn metrics_render_in_declaration_order() {
    let mut reg = Registry::new();
    let b = reg
        .register(MetricDefinition::counter("bbb_total", "Second alphabetically.", &[]))
        .unwrap();
    let a = reg
        .register(MetricDefinition::counter("aaa_total", "First alphabetically.", &[]))
        .unwrap();

    reg.inc(b, &[]).unwrap();
    reg.inc(a, &[]).unwrap();

    let snap = reg.snapshot();
    let b_at = snap.find("# TYPE bbb_total").unwrap();
    let a_at = snap.find("# TYPE aaa_total").unwrap();
    assert!(b_at < a_at, "declaration order must win over name order");
}

#[test]
fn series_within_a_metric_are_sorted() {
    let mut reg = Registry::new();
    let h = reg
        .register(MetricDefinition::counter("hits_total", "Hits.", &["route"]))
        .unwrap();

    reg.inc(h, &[("route", "/zebra")]).unwrap();
    reg.inc(h, &[("route", "/alpha")]).unwrap();

    let snap = reg.snapshot();
    let alpha = snap.find("route=\"/alpha\"").unwrap();
    let zebra = snap.find("route=\"/zebra\"").unwrap();
    assert!(alpha < zebra);

    // Two snapshots of the same state are identical modulo the uptime line.
    let strip = |s: &str| {
        s.lines()
            .filter(|l| !l.contains("milepost_process_uptime_seconds"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip(&snap), strip(&reg.snapshot()));
}

#[test]
fn zero_label_counter_renders_without_braces() {
    let mut reg = Registry::new();
    let h = reg
        .register(MetricDefinition::counter("boots_total", "Process boots.", &[]))
        .unwrap();
    reg.inc(h, &[]).unwrap();

    assert!(reg.snapshot().contains("\nboots_total 1\n"));
}

#[test]
fn label_values_are_escaped() {
    let mut reg = Registry::new();
    let h = reg
        .register(MetricDefinition::counter("odd_total", "Odd labels.", &["v"]))
        .unwrap();
    reg.inc(h, &[("v", "a\"b\\c\nd")]).unwrap();

    assert!(reg.snapshot().contains(r#"odd_total{v="a\"b\\c\nd"} 1"#));
}

#[test]
fn help_and_type_lines_present() {
    let mut reg = Registry::new();
    reg.register(MetricDefinition::histogram(
        "latency_seconds",
        "Latency in seconds.",
        &["route"],
    ))
    .unwrap();

    let snap = reg.snapshot();
    assert!(snap.contains("# HELP latency_seconds Latency in seconds.\n"));
    assert!(snap.contains("# TYPE latency_seconds histogram\n"));
}

#[test]
fn uptime_gauge_is_appended() {
    let reg = Registry::new();
    let snap = reg.snapshot();
    assert!(snap.contains("# TYPE milepost_process_uptime_seconds gauge"));
    let line = snap
        .lines()
        .find(|l| l.starts_with("milepost_process_uptime_seconds "))
        .expect("uptime sample present");
    let v: f64 = line.rsplit(' ').next().unwrap().parse().unwrap();
    assert!(v >= 0.0);
}
