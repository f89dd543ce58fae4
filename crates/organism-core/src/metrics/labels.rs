//! Metric descriptors, label sets and name validation.

use crate::error::{OrganismError, Result};

/// Label names reserved by the exposition format.
const BUCKET_LABEL: &str = "le";

/// A sorted set of `name="value"` pairs identifying one series of a metric.
///
/// Pairs are kept sorted by name so two label sets built in a different order
/// compare (and render) identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelSet(Vec<(String, String)>);

impl LabelSet {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let mut key: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();
        Self(key)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as `k1="v1",k2="v2"` (no braces), values escaped.
    pub(crate) fn render_inner(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Name, help text and declared label names of one registered metric.
#[derive(Debug, Clone)]
pub struct MetricOpts {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl MetricOpts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label_names: Vec::new(),
        }
    }

    /// Declare the label names every series of this metric must carry.
    pub fn label_names(mut self, names: &[&str]) -> Self {
        self.label_names = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// Validated descriptor shared by counters and histograms.
#[derive(Debug)]
pub(crate) struct Desc {
    pub(crate) name: String,
    pub(crate) help: String,
    label_names: Vec<String>,
}

impl Desc {
    pub(crate) fn new(opts: MetricOpts, histogram: bool) -> Result<Self> {
        if !is_valid_metric_name(&opts.name) {
            return Err(OrganismError::InvalidName(format!(
                "metric name {:?}",
                opts.name
            )));
        }

        let mut label_names = opts.label_names;
        for l in &label_names {
            if !is_valid_label_name(l) {
                return Err(OrganismError::InvalidName(format!(
                    "label name {:?} on {}",
                    l, opts.name
                )));
            }
            if histogram && l == BUCKET_LABEL {
                return Err(OrganismError::InvalidName(format!(
                    "label name \"le\" is reserved on histogram {}",
                    opts.name
                )));
            }
        }
        label_names.sort();
        let declared = label_names.len();
        label_names.dedup();
        if label_names.len() != declared {
            return Err(OrganismError::InvalidName(format!(
                "duplicate label name on {}",
                opts.name
            )));
        }

        Ok(Self {
            name: opts.name,
            help: opts.help,
            label_names,
        })
    }

    /// Build the label set for a series, checking it matches the declaration.
    pub(crate) fn resolve(&self, labels: &[(&str, &str)]) -> Result<LabelSet> {
        let set = LabelSet::new(labels);
        let matches = set.0.len() == self.label_names.len()
            && set
                .0
                .iter()
                .zip(&self.label_names)
                .all(|((k, _), declared)| k == declared);
        if !matches {
            return Err(OrganismError::InvalidLabels(format!(
                "{} expects labels {:?}",
                self.name, self.label_names
            )));
        }
        Ok(set)
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, excluding the reserved `__` prefix.
pub fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Helper to escape label values.
pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Helper to escape HELP text (quotes are left alone).
pub(crate) fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}
