//! Rendering of samples and catalogs for the command line

use crate::settings::OutputFormat;
use road_sample_lib::{ImageRequest, ImageryConfig, RoadCatalog, Sample, SurveyRecord, SurveyReport};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of survey output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    pub index: usize,
    pub bearing: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub fn sample_rows(samples: &[Sample], imagery: Option<&ImageryConfig>) -> Vec<SampleRow> {
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| SampleRow {
            index,
            bearing: sample.bearing,
            latitude: sample.latitude(),
            longitude: sample.longitude(),
            url: imagery.map(|config| {
                ImageRequest::new(
                    config,
                    sample.bearing,
                    sample.latitude(),
                    sample.longitude(),
                )
                .url()
            }),
        })
        .collect()
}

/// Buffered writer to `path`, or stdout when no path is given
pub fn open(path: Option<&Path>) -> Result<Box<dyn Write>, OutputError> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

pub fn write_samples<W: Write + ?Sized>(
    out: &mut W,
    rows: &[SampleRow],
    format: OutputFormat,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for row in rows {
                write!(
                    out,
                    "{}\t{}\t{}\t{}",
                    row.index, row.bearing, row.latitude, row.longitude
                )?;
                if let Some(url) = &row.url {
                    write!(out, "\t{url}")?;
                }
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Survey results as consumed by the map: records plus the point to center on
#[derive(Debug, Serialize)]
pub struct SurveyOutput<'a> {
    /// `(latitude, longitude)` of the bounding box center, absent for an empty survey
    pub center: Option<(f64, f64)>,
    pub detected: usize,
    pub records: Vec<SurveyRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SurveyRow<'a> {
    #[serde(flatten)]
    pub record: &'a SurveyRecord,
    pub marker_color: &'a str,
}

/// Detected records are drawn in their label's color, the rest in gray
pub fn marker_color(record: &SurveyRecord) -> &str {
    if record.is_detected() {
        &record.label
    } else {
        "gray"
    }
}

impl<'a> SurveyOutput<'a> {
    pub fn new(report: &'a SurveyReport) -> Self {
        Self {
            center: report.center(),
            detected: report.detected_count(),
            records: report
                .records
                .iter()
                .map(|record| SurveyRow {
                    record,
                    marker_color: marker_color(record),
                })
                .collect(),
        }
    }
}

pub fn write_survey<W: Write + ?Sized>(
    out: &mut W,
    report: &SurveyReport,
    format: OutputFormat,
) -> Result<(), OutputError> {
    let output = SurveyOutput::new(report);
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &output)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for row in &output.records {
                let record = row.record;
                write!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    record.index, record.latitude, record.longitude, record.heading, record.label
                )?;
                if let Some(plot) = &record.plot_path {
                    write!(out, "\t{}", plot.display())?;
                }
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

pub fn write_catalog<W: Write + ?Sized>(
    out: &mut W,
    catalog: &RoadCatalog,
    format: OutputFormat,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, catalog)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for (region, references) in catalog.iter() {
                writeln!(out, "{region}: {}", references.join(", "))?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
