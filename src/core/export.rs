use crate::domain::model::{AnalysisResult, ComparisonRow, MinuteSample};
use crate::utils::error::{Result, SimError};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "simulation_output.zip";

#[derive(Debug, Serialize)]
struct WaitTimeRow {
    minute: u32,
    efficiency: f64,
    passed_vehicles: f64,
    wait_seconds: f64,
    congestion_pct: u32,
}

impl From<&MinuteSample> for WaitTimeRow {
    fn from(sample: &MinuteSample) -> Self {
        Self {
            minute: sample.minute,
            efficiency: sample.efficiency,
            passed_vehicles: sample.passed_vehicles,
            wait_seconds: sample.wait_seconds,
            congestion_pct: (sample.congestion_level() * 100.0) as u32,
        }
    }
}

fn write_rows<T: Serialize>(delimiter: u8, rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| SimError::IoError(e.into_error()))
}

pub fn wait_times_csv(samples: &[MinuteSample]) -> Result<Vec<u8>> {
    write_rows(b',', samples.iter().map(WaitTimeRow::from))
}

pub fn wait_times_tsv(samples: &[MinuteSample]) -> Result<Vec<u8>> {
    write_rows(b'\t', samples.iter().map(WaitTimeRow::from))
}

pub fn comparison_csv(rows: &[ComparisonRow]) -> Result<Vec<u8>> {
    write_rows(b',', rows)
}

/// Packs the per-minute series, the catalog comparison and the summary into
/// one archive.
pub fn build_archive(analysis: &AnalysisResult) -> Result<Vec<u8>> {
    let entries = [
        ("wait_times.csv", wait_times_csv(&analysis.samples)?),
        ("wait_times.tsv", wait_times_tsv(&analysis.samples)?),
        ("comparison.csv", comparison_csv(&analysis.comparison)?),
        (
            "summary.json",
            serde_json::to_vec_pretty(&analysis.summary)?,
        ),
    ];

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in &entries {
        zip.start_file::<_, ()>(*name, FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;

    tracing::debug!("Built archive with {} entries", entries.len());
    Ok(cursor.into_inner())
}
