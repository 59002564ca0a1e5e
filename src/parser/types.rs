use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One entry of tast's `results.json`.
///
/// Only the fields the translation needs are decoded; the rest of the record
/// (timings, search flags, ...) is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TastRecord {
    pub name: String,

    #[serde(default)]
    pub skip_reason: String,

    /// `null` when the test raised no errors
    #[serde(default)]
    pub errors: Option<Value>,

    #[serde(default)]
    pub out_dir: PathBuf,
}

/// `results-chart.json` entry type that cannot be reported as a single value
pub const LIST_OF_SCALAR_VALUES: &str = "list_of_scalar_values";

/// Leaf of a results-chart: one performance metric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartEntry {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub units: String,

    #[serde(default)]
    pub value: Value,
}

/// group name → sub-metric name → entry, in file order
pub type ResultsChart = serde_json::Map<String, Value>;
