// Macro-averaged precision, recall and F1 over a fixed label universe.
//
// The universe is the set of ground-truth labels in the full dataset, built
// once per run and passed to every per-group score. Labels that never occur
// in a group still take part in the macro average, so groups are scored on
// the same footing and missing labels show up explicitly.
//
// Per label:
//   precision = TP / (TP + FP)
//   recall    = TP / (TP + FN)
//   f1        = 2TP / (2TP + FP + FN)   (harmonic mean of the two)
//
// Whenever a denominator is zero the ZeroDivision policy decides the value.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::Serialize;

use crate::db::models::EvalMetrics;

/// What a metric becomes when its denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroDivision {
    /// The value is undefined (`None`) and left out of the macro mean.
    #[default]
    Undefined,
    /// The value is 1.0 and counts toward the macro mean.
    One,
}

impl ZeroDivision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZeroDivision::Undefined => "undefined",
            ZeroDivision::One => "one",
        }
    }

    fn fill(&self) -> Option<f64> {
        match self {
            ZeroDivision::Undefined => None,
            ZeroDivision::One => Some(1.0),
        }
    }
}

impl std::fmt::Display for ZeroDivision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ZeroDivision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "undefined" | "nan" | "none" => Ok(ZeroDivision::Undefined),
            "one" | "1" | "1.0" => Ok(ZeroDivision::One),
            other => Err(format!(
                "unknown zero-division policy '{other}' (expected undefined or one)"
            )),
        }
    }
}

/// The distinct ground-truth labels of a dataset, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUniverse {
    labels: Vec<String>,
}

impl LabelUniverse {
    /// Collect distinct labels, keeping the order of first appearance.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let labels = labels
            .into_iter()
            .filter(|l| seen.insert(*l))
            .map(str::to_string)
            .collect();
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Precision, recall and F1 for a single label, plus how many rows had it
/// as ground truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1_score: Option<f64>,
    pub support: usize,
}

/// Per-label scores in universe order, and their macro average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub labels: Vec<LabelScore>,
    pub macro_avg: EvalMetrics,
}

impl ClassificationReport {
    /// Look up one label's scores.
    pub fn label(&self, label: &str) -> Option<&LabelScore> {
        self.labels.iter().find(|s| s.label == label)
    }
}

#[derive(Default, Clone, Copy)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

/// Score a subset of `(ground_truth, predicted)` pairs against the universe.
///
/// Predictions outside the universe only count as misses for the true
/// label; there is no row in the report for them.
pub fn classification_report<'a, I>(
    pairs: I,
    universe: &LabelUniverse,
    policy: ZeroDivision,
) -> ClassificationReport
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let index: HashMap<&str, usize> = universe
        .labels()
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let mut counts = vec![Counts::default(); universe.len()];

    for (actual, predicted) in pairs {
        if actual == predicted {
            if let Some(&i) = index.get(actual) {
                counts[i].tp += 1;
            }
            continue;
        }
        if let Some(&i) = index.get(actual) {
            counts[i].fn_ += 1;
        }
        if let Some(&i) = index.get(predicted) {
            counts[i].fp += 1;
        }
    }

    let labels: Vec<LabelScore> = universe
        .labels()
        .iter()
        .zip(counts.iter())
        .map(|(label, c)| LabelScore {
            label: label.clone(),
            precision: ratio(c.tp, c.tp + c.fp, policy),
            recall: ratio(c.tp, c.tp + c.fn_, policy),
            f1_score: ratio(2 * c.tp, 2 * c.tp + c.fp + c.fn_, policy),
            support: c.tp + c.fn_,
        })
        .collect();

    let macro_avg = EvalMetrics {
        precision: macro_mean(labels.iter().map(|s| s.precision)),
        recall: macro_mean(labels.iter().map(|s| s.recall)),
        f1_score: macro_mean(labels.iter().map(|s| s.f1_score)),
    };

    ClassificationReport { labels, macro_avg }
}

/// Shorthand for the macro average only.
pub fn macro_metrics<'a, I>(pairs: I, universe: &LabelUniverse, policy: ZeroDivision) -> EvalMetrics
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    classification_report(pairs, universe, policy).macro_avg
}

fn ratio(num: usize, den: usize, policy: ZeroDivision) -> Option<f64> {
    if den == 0 {
        policy.fill()
    } else {
        Some(num as f64 / den as f64)
    }
}

/// Unweighted mean of the defined values; `None` if there are none.
fn macro_mean<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .flatten()
        .fold((0.0_f64, 0_usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
