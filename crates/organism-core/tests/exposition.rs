#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use organism_core::metrics::{LabelSet, MetricOpts, Registry, SeriesValue};

#[test]
fn counter_text_format() {
    let reg = Registry::new();
    let c = reg
        .register_counter(
            MetricOpts::new(
                "http_requests_total",
                "Total number of HTTP requests processed, representing the organism's pulse.",
            )
            .label_names(&["service"]),
        )
        .unwrap();
    c.inc_by(&[("service", "heart-service")], 5).unwrap();

    let expected = "\
# HELP http_requests_total Total number of HTTP requests processed, representing the organism's pulse.
# TYPE http_requests_total counter
http_requests_total{service=\"heart-service\"} 5
";
    assert_eq!(reg.render(), expected);
}

#[test]
fn histogram_text_format() {
    let reg = Registry::new();
    let h = reg
        .register_histogram(
            MetricOpts::new("http_request_duration_seconds", "Latency.").label_names(&["service"]),
            vec![0.05, 0.1, 1.0],
        )
        .unwrap();
    h.observe(&[("service", "brain-service")], 0.25).unwrap();
    h.observe(&[("service", "brain-service")], 0.5).unwrap();

    let expected = "\
# HELP http_request_duration_seconds Latency.
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_bucket{service=\"brain-service\",le=\"0.05\"} 0
http_request_duration_seconds_bucket{service=\"brain-service\",le=\"0.1\"} 0
http_request_duration_seconds_bucket{service=\"brain-service\",le=\"1\"} 2
http_request_duration_seconds_bucket{service=\"brain-service\",le=\"+Inf\"} 2
http_request_duration_seconds_sum{service=\"brain-service\"} 0.75
http_request_duration_seconds_count{service=\"brain-service\"} 2
";
    assert_eq!(reg.render(), expected);
}

#[test]
fn unlabelled_metrics_render_and_unobserved_ones_are_omitted() {
    let reg = Registry::new();
    let c = reg.register_counter(MetricOpts::new("plain_total", "p")).unwrap();
    reg.register_histogram(MetricOpts::new("idle_seconds", "never observed"), vec![1.0])
        .unwrap();
    let h = reg
        .register_histogram(MetricOpts::new("bare_seconds", "b"), vec![2.5])
        .unwrap();
    c.inc(&[]).unwrap();
    h.observe(&[], 1.0).unwrap();

    let text = reg.render();
    assert!(text.contains("\nplain_total 1\n"));
    assert!(!text.contains("idle_seconds"));
    assert!(text.contains("plain_total 1\n# HELP bare_seconds b\n"));
    assert!(text.contains("bare_seconds_bucket{le=\"2.5\"} 1\n"));
    assert!(text.contains("bare_seconds_bucket{le=\"+Inf\"} 1\n"));
    assert!(text.contains("bare_seconds_sum 1\n"));
    assert!(text.contains("bare_seconds_count 1\n"));
}

#[test]
fn label_sets_render_sorted_and_escaped() {
    let reg = Registry::new();
    let c = reg
        .register_counter(
            MetricOpts::new("organ_total", "a \\ b\nc").label_names(&["service", "zone"]),
        )
        .unwrap();
    c.inc(&[("zone", "b"), ("service", "lung")]).unwrap();
    c.inc(&[("service", "heart \"main\"\n"), ("zone", "a")]).unwrap();
    c.inc(&[("service", "kidney\\left"), ("zone", "a")]).unwrap();

    let lines: Vec<String> = reg.gather().lines().collect();
    assert_eq!(
        lines,
        [
            "# HELP organ_total a \\\\ b\\nc",
            "# TYPE organ_total counter",
            "organ_total{service=\"heart \\\"main\\\"\\n\",zone=\"a\"} 1",
            "organ_total{service=\"kidney\\\\left\",zone=\"a\"} 1",
            "organ_total{service=\"lung\",zone=\"b\"} 1",
        ]
    );
}

#[test]
fn render_is_idempotent_and_lines_restartable() {
    let reg = Registry::new();
    let c = reg
        .register_counter(MetricOpts::new("beats_total", "b").label_names(&["service"]))
        .unwrap();
    let h = reg
        .register_histogram(MetricOpts::new("lat_seconds", "l"), vec![0.1, 0.2])
        .unwrap();
    c.inc(&[("service", "heart-service")]).unwrap();
    h.observe(&[], 0.15).unwrap();

    let first = reg.render();
    let second = reg.render();
    assert_eq!(first, second);

    let exposition = reg.gather();
    let a: Vec<String> = exposition.lines().collect();
    let b: Vec<String> = exposition.lines().collect();
    assert_eq!(a, b);
    assert_eq!(exposition.to_string(), first);

    // reading never creates or bumps a series
    assert_eq!(c.get(&[("service", "heart-service")]), Some(1));
    assert_eq!(h.snapshot_for(&[]).unwrap().count, 1);
}

#[test]
fn family_lookup_exposes_snapshots() {
    let reg = Registry::new();
    let c = reg
        .register_counter(MetricOpts::new("beats_total", "b").label_names(&["service"]))
        .unwrap();
    c.inc_by(&[("service", "heart-service")], 3).unwrap();

    let exposition = reg.gather();
    let family = exposition.family("beats_total").unwrap();
    assert_eq!(
        family.series_for(&[("service", "heart-service")]),
        Some(&SeriesValue::Counter(3))
    );
    assert!(exposition.family("missing").is_none());
}

#[test]
fn large_and_small_values_use_exponent_form() {
    let reg = Registry::new();
    let c = reg
        .register_counter(MetricOpts::new("big_total", "b").label_names(&["service"]))
        .unwrap();
    c.inc_by(&[("service", "heart-service")], 1_234_567).unwrap();
    c.inc_by(&[("service", "lung")], 100_000).unwrap();
    let h = reg
        .register_histogram(
            MetricOpts::new("tiny_seconds", "t"),
            vec![0.00001, 0.0001, 1_000_000.0],
        )
        .unwrap();
    h.observe(&[], 0.000001).unwrap();

    let text = reg.render();
    assert!(text.contains("big_total{service=\"heart-service\"} 1.234567e+06\n"));
    assert!(text.contains("big_total{service=\"lung\"} 100000\n"));
    assert!(text.contains("tiny_seconds_bucket{le=\"1e-05\"} 1\n"));
    assert!(text.contains("tiny_seconds_bucket{le=\"0.0001\"} 1\n"));
    assert!(text.contains("tiny_seconds_bucket{le=\"1e+06\"} 1\n"));
    assert!(text.contains("tiny_seconds_sum 1e-06\n"));
}

#[test]
fn series_label_sets_are_sorted_pairs() {
    let reg = Registry::new();
    let c = reg
        .register_counter(MetricOpts::new("organ_total", "o").label_names(&["zone", "service"]))
        .unwrap();
    c.inc(&[("zone", "a"), ("service", "lung")]).unwrap();
    let plain = reg.register_counter(MetricOpts::new("plain_total", "p")).unwrap();
    plain.inc(&[]).unwrap();

    let exposition = reg.gather();
    let labels = &exposition.family("organ_total").unwrap().series[0].labels;
    let pairs: Vec<(&str, &str)> = labels
        .pairs()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(pairs, [("service", "lung"), ("zone", "a")]);
    assert_eq!(*labels, LabelSet::new(&[("zone", "a"), ("service", "lung")]));
    assert!(!labels.is_empty());

    let plain_labels = &exposition.family("plain_total").unwrap().series[0].labels;
    assert!(plain_labels.is_empty());
}
