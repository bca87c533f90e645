//! CSV Output
//!
//! One row per measurement, in the column layout benchmark harnesses emit, so
//! the file can be fed back in as input or opened in a spreadsheet.

use crate::report::Report;

/// Column header of the CSV report
pub const CSV_HEADER: [&str; 7] = [
    "Size",
    "Threads",
    "Schedule",
    "Chunk",
    "Time",
    "Speedup",
    "Efficiency",
];

/// Generate a CSV report (efficiency in percent)
pub fn generate_csv_report(report: &Report) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for section in &report.sizes {
        for row in &section.rows {
            writer.write_record([
                section.size.to_string(),
                row.threads.to_string(),
                row.schedule.clone(),
                row.chunk.map(|c| c.to_string()).unwrap_or_default(),
                format!("{:.6}", row.time),
                format!("{:.4}", row.speedup),
                format!("{:.2}", row.efficiency),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
