//! SegmentPipeline - repository → traversal → filter orchestration
//!
//! This is the single entry point used by survey drivers. It never fails: every problem
//! (repository errors, missing or unsupported geometries, malformed coordinates, bad
//! configuration) is logged and degrades to "contributes nothing", so callers only ever
//! see a populated or an empty sample list.

use crate::filter::DEFAULT_MIN_DISTANCE_KM;
use crate::traversal::{self, DEFAULT_STEP};
use crate::{
    GeometryRepository, GreedyDistanceFilter, Result, RoadFeature, Sample, SampleError,
    SampleFilter,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the sampling pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Vertex stride: one candidate for every `step`-th pair of adjacent vertices.
    /// Default: 5
    pub step: usize,
    /// Minimum geodesic spacing between retained samples, in kilometres.
    /// Default: 2.0
    pub min_distance_km: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            min_distance_km: DEFAULT_MIN_DISTANCE_KM,
        }
    }
}

impl PipelineConfig {
    pub fn new(step: usize, min_distance_km: f64) -> Self {
        Self {
            step,
            min_distance_km,
        }
    }

    /// Check that the stride is positive and the distance finite and non-negative
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(SampleError::InvalidStep(self.step));
        }
        if !self.min_distance_km.is_finite() || self.min_distance_km < 0.0 {
            return Err(SampleError::InvalidConfig(format!(
                "minimum distance must be a non-negative number of kilometres, got {}",
                self.min_distance_km
            )));
        }
        Ok(())
    }
}

/// Turns the road features of a repository into an ordered, deduplicated sample list
pub struct SegmentPipeline<R, F = GreedyDistanceFilter> {
    repository: R,
    config: PipelineConfig,
    filter: F,
}

impl<R: GeometryRepository> SegmentPipeline<R> {
    /// Create a pipeline with the default configuration
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, PipelineConfig::default())
    }

    /// Create a pipeline using the greedy distance filter for `config.min_distance_km`
    pub fn with_config(repository: R, config: PipelineConfig) -> Self {
        let filter = GreedyDistanceFilter::new(config.min_distance_km);
        Self::with_filter(repository, config, filter)
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<R: GeometryRepository, F: SampleFilter> SegmentPipeline<R, F> {
    /// Create a pipeline with a custom deduplication filter
    ///
    /// `config.min_distance_km` is not passed to `filter`; it is up to the caller to
    /// configure the filter consistently.
    pub fn with_filter(repository: R, config: PipelineConfig, filter: F) -> Self {
        Self {
            repository,
            config,
            filter,
        }
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Samples for all roads matching the optional reference and region filters
    ///
    /// Returns an empty list when nothing matches or anything goes wrong; the reason is
    /// logged.
    pub fn get_segment_data(&self, reference: Option<&str>, region: Option<&str>) -> Vec<Sample> {
        match self.try_segment_data(reference, region) {
            Ok(samples) => {
                tracing::info!(
                    "Sampled {} points for reference {:?} in region {:?}",
                    samples.len(),
                    reference,
                    region
                );
                samples
            }
            Err(e) => {
                tracing::warn!(
                    "Error retrieving segment data for reference {:?} in region {:?}: {}",
                    reference,
                    region,
                    e
                );
                Vec::new()
            }
        }
    }

    fn try_segment_data(&self, reference: Option<&str>, region: Option<&str>) -> Result<Vec<Sample>> {
        self.config.validate()?;

        let features = self.repository.fetch(reference, region)?;
        if features.is_empty() {
            tracing::info!(
                "No data available for reference {:?} in region {:?}",
                reference,
                region
            );
            return Ok(Vec::new());
        }

        let candidates = self.candidates(&features);
        Ok(self.filter.filter(candidates))
    }

    /// Unfiltered candidates of all features, concatenated in feature order
    ///
    /// Features without a geometry, or with a geometry that is not a line, are skipped.
    pub fn candidates(&self, features: &[RoadFeature]) -> Vec<Sample> {
        let mut candidates = Vec::new();

        for (index, feature) in features.iter().enumerate() {
            let Some(geometry) = &feature.geometry else {
                tracing::debug!("Dropping feature {} ({:?}): missing geometry", index, feature.reference);
                continue;
            };

            match traversal::traverse_geometry(geometry, self.config.step) {
                Ok(samples) => {
                    tracing::debug!(
                        "Feature {} ({:?}) produced {} candidates",
                        index,
                        feature.reference,
                        samples.len()
                    );
                    candidates.extend(samples);
                }
                Err(e) => {
                    tracing::warn!("Skipping feature {} ({:?}): {}", index, feature.reference, e);
                }
            }
        }

        candidates
    }
}

/// One-shot helper: sample the roads of `repository` with an explicit stride and spacing
pub fn get_segment_data<R: GeometryRepository + ?Sized>(
    repository: &R,
    reference: Option<&str>,
    region: Option<&str>,
    step: usize,
    min_distance_km: f64,
) -> Vec<Sample> {
    SegmentPipeline::with_config(repository, PipelineConfig::new(step, min_distance_km))
        .get_segment_data(reference, region)
}
