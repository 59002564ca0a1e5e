use super::types::{ChartEntry, ResultsChart, TastRecord, LIST_OF_SCALAR_VALUES};
use crate::error::CriticalFailure;
use crate::report::types::{Measurement, TestCaseResult, Verdict};
use crate::utils::config::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Skip wins over errors; anything else passes
pub fn verdict(record: &TastRecord) -> Verdict {
    if !record.skip_reason.is_empty() {
        return Verdict::Skip;
    }
    if has_errors(record.errors.as_ref()) {
        return Verdict::Fail;
    }
    Verdict::Pass
}

fn has_errors(errors: Option<&Value>) -> bool {
    match errors {
        None | Some(Value::Null) => false,
        Some(Value::Array(list)) => !list.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

pub fn to_result(record: &TastRecord) -> TestCaseResult {
    TestCaseResult {
        name: record.name.clone(),
        verdict: verdict(record),
        out_dir: record.out_dir.clone(),
        measurements: Vec::new(),
    }
}

/// Decode `results.json`; a missing, malformed or empty manifest is critical
pub fn load_manifest(config: &Config) -> Result<Vec<TastRecord>, CriticalFailure> {
    let path = config.results_file();
    if !path.is_file() {
        log::error!("{} not found", path.display());
        return Err(CriticalFailure::ResultsMissing);
    }

    let raw = fs::read_to_string(&path).map_err(|e| {
        log::error!("Failed to read {}: {}", path.display(), e);
        CriticalFailure::NoResults
    })?;
    let records = parse_manifest(&raw).map_err(|e| {
        log::error!("Failed to decode {}: {}", path.display(), e);
        CriticalFailure::NoResults
    })?;

    if records.is_empty() {
        log::error!("{} holds no test results", path.display());
        return Err(CriticalFailure::NoResults);
    }
    Ok(records)
}

pub fn parse_manifest(raw: &str) -> serde_json::Result<Vec<TastRecord>> {
    // `null` decodes to no records, like an empty array
    let records: Option<Vec<TastRecord>> = serde_json::from_str(raw)?;
    Ok(records.unwrap_or_default())
}

/// Read `<out_dir>/results-chart.json` if the test produced one
pub fn load_chart(out_dir: &Path) -> Result<Option<ResultsChart>> {
    let path = Config::results_chart_file(out_dir);
    if !path.is_file() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let chart = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(Some(chart))
}

/// Flatten a results-chart into measurements, skipping list-valued entries
pub fn parse_measurements(chart: &ResultsChart) -> Vec<Measurement> {
    let mut measurements = Vec::new();

    for (group, cases) in chart {
        let Some(cases) = cases.as_object() else {
            log::warn!("Results-chart group '{}' is not an object, skipping", group);
            continue;
        };

        for (sub_name, data) in cases {
            let name = format!("{}.{}", group, sub_name);
            let entry: ChartEntry = match serde_json::from_value(data.clone()) {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Malformed results-chart entry {}: {}, skipping", name, e);
                    continue;
                }
            };

            if entry.kind == LIST_OF_SCALAR_VALUES {
                log::warn!(
                    "Unsupported data type '{}', skipping {}",
                    LIST_OF_SCALAR_VALUES,
                    name
                );
                continue;
            }

            let Some(value) = scalar_text(&entry.value) else {
                log::warn!("Results-chart entry {} has no scalar value, skipping", name);
                continue;
            };

            measurements.push(Measurement {
                name,
                value,
                units: entry.units,
            });
        }
    }

    measurements
}

/// Text passed to `--measurement`; `None` for null, arrays and objects
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> TastRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_skip_wins_over_errors() {
        let r = record(json!({
            "name": "t2", "skipReason": "flaky", "errors": ["x"], "outDir": "/tmp/b"
        }));
        assert_eq!(verdict(&r), Verdict::Skip);
    }

    #[test]
    fn test_errors_fail() {
        let r = record(json!({
            "name": "t", "skipReason": "",
            "errors": [{"reason": "timeout", "file": "x.go", "line": 3}],
            "outDir": "/tmp/t"
        }));
        assert_eq!(verdict(&r), Verdict::Fail);
    }

    #[test]
    fn test_null_errors_pass() {
        let r = record(json!({
            "name": "t1", "skipReason": "", "errors": null, "outDir": "/tmp/a"
        }));
        assert_eq!(verdict(&r), Verdict::Pass);
        let result = to_result(&r);
        assert_eq!(result.name, "t1");
        assert_eq!(result.out_dir, Path::new("/tmp/a"));
        assert!(!result.has_measurements());
    }

    #[test]
    fn test_empty_error_list_passes() {
        let r = record(json!({"name": "t", "skipReason": "", "errors": []}));
        assert_eq!(verdict(&r), Verdict::Pass);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let r = record(json!({"name": "only.Name", "start": "2022-01-01T00:00:00Z"}));
        assert_eq!(r.skip_reason, "");
        assert_eq!(r.errors, None);
        assert_eq!(verdict(&r), Verdict::Pass);
    }

    #[test]
    fn test_parse_manifest_rejects_garbage() {
        assert!(parse_manifest("{not json").is_err());
        assert!(parse_manifest("{\"name\": \"t\"}").is_err());
        assert!(parse_manifest("null").unwrap().is_empty());
        assert!(parse_manifest("[]").unwrap().is_empty());
    }

    #[test]
    fn test_measurement_names_and_values() {
        let chart: ResultsChart = serde_json::from_value(json!({
            "g": {"m1": {"type": "scalar", "units": "ms", "value": 5}},
            "boot": {
                "time": {"type": "scalar", "units": "s", "value": 1.5},
                "samples": {"type": "list_of_scalar_values", "units": "s", "values": [1, 2]},
                "label": {"type": "scalar", "units": "", "value": "fast"}
            }
        }))
        .unwrap();

        let measurements = parse_measurements(&chart);
        let names: Vec<&str> = measurements.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["g.m1", "boot.time", "boot.label"]);

        assert_eq!(measurements[0].value, "5");
        assert_eq!(measurements[0].units, "ms");
        assert_eq!(measurements[1].value, "1.5");
        assert_eq!(measurements[2].value, "fast");
    }

    #[test]
    fn test_list_entries_never_reported() {
        let chart: ResultsChart = serde_json::from_value(json!({
            "a": {"b": {"type": "list_of_scalar_values", "units": "ms", "value": [1, 2, 3]}}
        }))
        .unwrap();
        assert!(parse_measurements(&chart).is_empty());
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let chart: ResultsChart = serde_json::from_value(json!({
            "a": {"no_type": {"units": "ms", "value": 1}, "ok": {"type": "scalar", "value": 2}},
            "b": 7
        }))
        .unwrap();
        let measurements = parse_measurements(&chart);
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].name, "a.ok");
        assert_eq!(measurements[0].units, "");
    }

    #[test]
    fn test_non_scalar_values_skipped() {
        let chart: ResultsChart = serde_json::from_value(json!({
            "g": {
                "missing": {"type": "scalar", "units": "ms"},
                "null": {"type": "scalar", "units": "ms", "value": null},
                "array": {"type": "scalar", "units": "ms", "value": [1, 2]},
                "object": {"type": "scalar", "units": "ms", "value": {"a": 1}},
                "flag": {"type": "scalar", "units": "", "value": true},
                "ok": {"type": "scalar", "units": "ms", "value": 7}
            }
        }))
        .unwrap();

        let measurements = parse_measurements(&chart);
        let pairs: Vec<(&str, &str)> = measurements
            .iter()
            .map(|m| (m.name.as_str(), m.value.as_str()))
            .collect();
        assert_eq!(pairs, [("g.flag", "true"), ("g.ok", "7")]);
    }

    #[test]
    fn test_load_manifest_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_results_dir(dir.path());
        assert_eq!(load_manifest(&config), Err(CriticalFailure::ResultsMissing));

        fs::write(config.results_file(), "[{]").unwrap();
        assert_eq!(load_manifest(&config), Err(CriticalFailure::NoResults));

        fs::write(config.results_file(), "[]").unwrap();
        assert_eq!(load_manifest(&config), Err(CriticalFailure::NoResults));

        fs::write(
            config.results_file(),
            r#"[{"name":"t1","skipReason":"","errors":null,"outDir":"/tmp/a"}]"#,
        )
        .unwrap();
        assert_eq!(load_manifest(&config).unwrap().len(), 1);
    }

    #[test]
    fn test_load_chart() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_chart(dir.path()).unwrap().is_none());

        fs::write(dir.path().join("results-chart.json"), "oops").unwrap();
        assert!(load_chart(dir.path()).is_err());

        fs::write(
            dir.path().join("results-chart.json"),
            r#"{"g":{"m1":{"type":"scalar","units":"ms","value":5}}}"#,
        )
        .unwrap();
        let chart = load_chart(dir.path()).unwrap().unwrap();
        assert_eq!(parse_measurements(&chart).len(), 1);
    }
}
