use clap::{Parser, ValueEnum};
use road_sample_lib::PipelineConfig;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Road Survey - sample evenly spaced, direction-aware survey points along road geometries
pub struct Settings {
    /// GPX files with road geometries (track name = road reference, track type = region)
    #[clap(short, long, value_name = "FILE", required = true)]
    pub gpx_files: Vec<PathBuf>,

    /// Road reference to sample (all roads when omitted)
    #[clap(short, long)]
    pub reference: Option<String>,

    /// Region identifier to sample (all regions when omitted)
    #[clap(long)]
    pub region: Option<String>,

    /// Vertex stride: one candidate for every N-th pair of adjacent vertices
    #[clap(short, long, default_value = "5")]
    pub step: usize,

    /// Minimum distance between samples in kilometres
    #[clap(short = 'd', long, default_value = "2.0")]
    pub min_distance_km: f64,

    /// List regions and their road references instead of sampling
    #[clap(long, default_value = "false")]
    pub list: bool,

    /// Include the street-level imagery request URL of every sample (STREETVIEW_* env vars)
    #[clap(long, default_value = "false")]
    pub urls: bool,

    /// Survey mode: directory holding the downloaded photographs, named as in `--urls` output
    #[clap(long, value_name = "DIR", requires = "classifier")]
    pub images: Option<PathBuf>,

    /// Classifier program, run as `<program> <image> <index>`; prints the label, then an
    /// optional plot path
    #[clap(long, value_name = "PROGRAM", requires = "images")]
    pub classifier: Option<PathBuf>,

    /// Output format
    #[clap(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl Settings {
    /// Parse settings from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(self.step, self.min_distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["road-survey", "--gpx-files", "roads.gpx"]);
        assert_eq!(settings.gpx_files, vec![PathBuf::from("roads.gpx")]);
        assert_eq!(settings.pipeline_config(), PipelineConfig::default());
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(settings.reference.is_none());
        assert!(settings.region.is_none());
        assert!(!settings.list);
        assert!(!settings.urls);
        assert!(settings.images.is_none());
        assert!(settings.classifier.is_none());
    }

    #[test]
    fn test_full_arguments() {
        let settings = Settings::parse_from([
            "road-survey",
            "-g",
            "a.gpx",
            "-g",
            "b.gpx",
            "--reference",
            "A-7",
            "--region",
            "ES-AN",
            "--step",
            "1",
            "-d",
            "0.5",
            "--format",
            "text",
            "--urls",
        ]);

        assert_eq!(settings.gpx_files.len(), 2);
        assert_eq!(settings.reference.as_deref(), Some("A-7"));
        assert_eq!(settings.region.as_deref(), Some("ES-AN"));
        assert_eq!(settings.pipeline_config(), PipelineConfig::new(1, 0.5));
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(settings.urls);
    }

    #[test]
    fn test_survey_mode_arguments() {
        let settings = Settings::parse_from([
            "road-survey",
            "-g",
            "roads.gpx",
            "--images",
            "data/images",
            "--classifier",
            "./detect-blue",
        ]);
        assert_eq!(settings.images, Some(PathBuf::from("data/images")));
        assert_eq!(settings.classifier, Some(PathBuf::from("./detect-blue")));

        // Each needs the other
        assert!(
            Settings::try_parse_from(["road-survey", "-g", "roads.gpx", "--images", "dir"])
                .is_err()
        );
        assert!(
            Settings::try_parse_from(["road-survey", "-g", "roads.gpx", "--classifier", "c"])
                .is_err()
        );
    }

    #[test]
    fn test_gpx_files_required() {
        assert!(Settings::try_parse_from(["road-survey"]).is_err());
    }
}
