//! Point-in-time snapshots and the Prometheus text exposition (format 0.0.4).

use std::fmt;

use super::labels::{escape_help, LabelSet};

/// Content type served alongside [`Exposition`] text.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Histogram => "histogram",
        }
    }
}

/// Cumulative bucket counts, sum and count of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// `(upper_bound, cumulative_count)` in ascending bound order.
    pub buckets: Vec<(f64, u64)>,
    pub sum: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Counter(u64),
    Histogram(HistogramSnapshot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: LabelSet,
    pub value: SeriesValue,
}

/// All series of one registered metric, sorted by label set.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub kind: MetricType,
    pub series: Vec<Series>,
}

impl MetricFamily {
    /// Find a series by its exact label pairs.
    pub fn series_for(&self, labels: &[(&str, &str)]) -> Option<&SeriesValue> {
        let key = LabelSet::new(labels);
        self.series.iter().find(|s| s.labels == key).map(|s| &s.value)
    }

    fn header_lines(&self) -> [String; 2] {
        [
            format!("# HELP {} {}", self.name, escape_help(&self.help)),
            format!("# TYPE {} {}", self.name, self.kind.as_str()),
        ]
    }
}

impl Series {
    fn lines(&self, name: &str) -> Vec<String> {
        let label_str = self.labels.render_inner();
        match &self.value {
            SeriesValue::Counter(v) => vec![format!(
                "{}{} {}",
                name,
                braces(&label_str),
                fmt_float(*v as f64)
            )],
            SeriesValue::Histogram(h) => {
                let prefix = if label_str.is_empty() {
                    String::new()
                } else {
                    format!("{},", label_str)
                };
                let mut out = Vec::with_capacity(h.buckets.len() + 3);
                for (le, count) in &h.buckets {
                    out.push(format!(
                        "{}_bucket{{{}le=\"{}\"}} {}",
                        name,
                        prefix,
                        fmt_float(*le),
                        fmt_float(*count as f64)
                    ));
                }
                let count = fmt_float(h.count as f64);
                out.push(format!("{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count));
                out.push(format!("{}_sum{} {}", name, braces(&label_str), fmt_float(h.sum)));
                out.push(format!("{}_count{} {}", name, braces(&label_str), count));
                out
            }
        }
    }
}

/// A consistent-per-series snapshot of a registry, ready to be rendered.
///
/// [`Exposition::lines`] is lazy and can be iterated any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Exposition {
    families: Vec<MetricFamily>,
}

impl Exposition {
    pub(crate) fn new(families: Vec<MetricFamily>) -> Self {
        Self { families }
    }

    pub fn families(&self) -> &[MetricFamily] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Exposition lines, without trailing newlines. Families without any
    /// series are skipped entirely.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.families
            .iter()
            .filter(|family| !family.series.is_empty())
            .flat_map(|family| {
                family
                    .header_lines()
                    .into_iter()
                    .chain(family.series.iter().flat_map(move |s| s.lines(&family.name)))
            })
    }
}

impl fmt::Display for Exposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn braces(label_str: &str) -> String {
    if label_str.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", label_str)
    }
}

/// Shortest round-trip float text in the exposition's spelling: `+Inf`,
/// `-Inf`, `NaN`, and exponent form (`1e-05`, `1.234567e+06`) when the
/// decimal exponent is below -4 or at least 6.
pub(crate) fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest digits as `<mantissa>e<exp>`
    let sci = format!("{:e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };
    if (-4..6).contains(&exp) {
        format!("{}", v)
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
    }
}
