//! Road Survey command line tool
//!
//! Loads road geometries from GPX files and either lists the regions and road
//! references they contain, runs the sampling pipeline and prints the resulting
//! survey points, or (with `--images` and `--classifier`) surveys those points and
//! prints the classified records for the results map.

mod collaborators;
mod logging;
mod output;
mod settings;

use collaborators::{CommandClassifier, DirectoryFetcher};
use road_sample_lib::{
    GpxRepository, ImageryConfig, RoadCatalog, SampleError, SegmentPipeline, Survey,
};
use settings::Settings;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Output(#[from] output::OutputError),
}

fn main() -> ExitCode {
    let settings = Settings::from_cli();
    let _guard = logging::setup_logging_and_profiling();
    tracing::info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg_attr(feature = "profiling", profiling::function)]
fn run(settings: &Settings) -> Result<(), CliError> {
    let repository = GpxRepository::load_from_files(settings.gpx_files.clone())?;
    let mut out = output::open(settings.output.as_deref())?;

    if settings.list {
        let catalog = RoadCatalog::from_repository(&repository)?;
        tracing::info!("Found {} regions", catalog.region_count());
        output::write_catalog(&mut out, &catalog, settings.format)?;
        return Ok(());
    }

    // The pipeline swallows configuration errors into an empty result; report them here instead
    let config = settings.pipeline_config();
    config.validate()?;

    let survey_mode = settings.images.is_some() && settings.classifier.is_some();
    let imagery = if settings.urls || survey_mode {
        let imagery = ImageryConfig::from_env();
        imagery.validate()?;
        Some(imagery)
    } else {
        None
    };

    let pipeline = SegmentPipeline::with_config(&repository, config);
    let samples = pipeline.get_segment_data(settings.reference.as_deref(), settings.region.as_deref());
    if samples.is_empty() {
        tracing::warn!(
            reference = ?settings.reference,
            region = ?settings.region,
            "No valid data available for the selected road"
        );
    }

    if let (Some(images), Some(program), Some(imagery)) =
        (&settings.images, &settings.classifier, &imagery)
    {
        let survey = Survey::new(
            imagery.clone(),
            DirectoryFetcher::new(images),
            CommandClassifier::new(program),
        );
        let report = survey.run(&samples, |done, total| {
            tracing::info!("{}/{} segments processed", done, total);
        });
        tracing::info!(
            "Survey finished: {} of {} segments detected",
            report.detected_count(),
            report.len()
        );
        output::write_survey(&mut out, &report, settings.format)?;
        return Ok(());
    }

    let rows = output::sample_rows(&samples, imagery.as_ref().filter(|_| settings.urls));
    output::write_samples(&mut out, &rows, settings.format)?;
    Ok(())
}
