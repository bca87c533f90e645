//! Measurement Sources
//!
//! Readers for the two formats benchmark harnesses produce:
//! - CSV with a `Size,Threads,Schedule,Chunk,Time` header (case-insensitive,
//!   extra columns ignored)
//! - JSON, either an array of records or the nested
//!   `{"<size>": {"<threads>": {"<label>": time}}}` table

use crate::error::ScaleError;
use crate::measurement::MeasurementRecord;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Read records from CSV
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<MeasurementRecord>, ScaleError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        records.push(row.deserialize(Some(&headers))?);
    }
    Ok(records)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDataset {
    Records(Vec<MeasurementRecord>),
    Nested(BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>),
}

/// Read records from JSON
pub fn read_json<R: Read>(reader: R) -> Result<Vec<MeasurementRecord>, ScaleError> {
    match serde_json::from_reader::<_, JsonDataset>(reader)? {
        JsonDataset::Records(records) => Ok(records),
        JsonDataset::Nested(table) => flatten_nested(table),
    }
}

fn flatten_nested(
    table: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>,
) -> Result<Vec<MeasurementRecord>, ScaleError> {
    let mut records = Vec::new();
    for (size_key, threads_map) in table {
        let size: u64 = size_key
            .trim()
            .parse()
            .map_err(|_| ScaleError::schema(&size_key, "size key is not an integer"))?;
        for (threads_key, configs) in threads_map {
            let threads: u32 = threads_key
                .trim()
                .parse()
                .map_err(|_| ScaleError::schema(&threads_key, "thread key is not an integer"))?;
            for (label, time) in configs {
                records.push(MeasurementRecord {
                    size,
                    threads,
                    schedule: label,
                    chunk: None,
                    time,
                });
            }
        }
    }
    Ok(records)
}

/// Read records from a file, picking the format from its extension
pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<MeasurementRecord>, ScaleError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    match extension.as_deref() {
        Some("csv") => read_csv(file),
        Some("json") => read_json(file),
        _ => Err(ScaleError::InvalidArgument(format!(
            "unsupported input format for {} (expected .csv or .json)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultStore;
    use crate::error::ErrorKind;
    use std::io::Write;

    const HARNESS_CSV: &str = "\
Size,Threads,Schedule,Chunk,Time,Speedup,Efficiency
512,1,sequential,,0.120000,1.0000,1.0000
512,8,static,16,0.022000,5.4545,0.6818
512,8,static,1,0.028000,4.2857,0.5357
512,8,dynamic,16,0.023000,5.2174,0.6522
";

    #[test]
    fn test_read_harness_csv() {
        let records = read_csv(HARNESS_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].chunk, None);
        assert_eq!(records[1].chunk, Some(16));

        let store = ResultStore::load_records(records, "sequential").unwrap();
        assert_eq!(store.thread_counts(512), vec![1, 8]);
    }

    #[test]
    fn test_read_csv_with_labels() {
        let csv = "size,threads,config,time\n64,1,sequential,0.5\n64,2,guided_4,0.3\n";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[1].schedule, "guided_4");
        assert!(ResultStore::load_records(records, "sequential").is_ok());
    }

    #[test]
    fn test_read_csv_bad_number() {
        let csv = "size,threads,schedule,chunk,time\n64,one,static,4,0.3\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Source);
    }

    #[test]
    fn test_read_nested_json() {
        let json = r#"{
            "512": {
                "1": {"sequential": 0.12, "static_16": 0.12},
                "8": {"static_16": 0.022, "dynamic_16": 0.023}
            }
        }"#;
        let records = read_json(json.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);

        let store = ResultStore::load_records(records, "sequential").unwrap();
        assert_eq!(store.configs_for(512, 8).len(), 2);
    }

    #[test]
    fn test_read_nested_json_bad_size_key() {
        let json = r#"{"big": {"1": {"sequential": 0.1}}}"#;
        let err = read_json(json.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_read_record_json() {
        let json = r#"[
            {"size": 128, "threads": 1, "schedule": "sequential", "time": 0.0009},
            {"size": 128, "threads": 4, "schedule": "static", "chunk": 64, "time": 0.0012}
        ]"#;
        let records = read_json(json.as_bytes()).unwrap();
        assert_eq!(records[1].chunk, Some(64));
    }

    #[test]
    fn test_read_path_dispatch() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("results.csv");
        std::fs::File::create(&csv_path)
            .unwrap()
            .write_all(HARNESS_CSV.as_bytes())
            .unwrap();
        assert_eq!(read_path(&csv_path).unwrap().len(), 4);

        let txt_path = dir.path().join("results.txt");
        std::fs::write(&txt_path, "whatever").unwrap();
        let err = read_path(&txt_path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let missing = dir.path().join("missing.csv");
        assert_eq!(read_path(&missing).unwrap_err().kind(), ErrorKind::Source);
    }
}
