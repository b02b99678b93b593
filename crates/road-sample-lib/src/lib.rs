//! Road Sample Library - Geometric Sampling of Road Networks
//!
//! This library turns road geometries into an ordered list of survey samples: a compass
//! bearing plus a point on the road, spaced far enough apart that each one is worth a
//! street-level photograph. It also defines the collaborators around that core (geometry
//! repositories, imagery requests and the survey driver that consumes samples).
//!
//! # Architecture
//!
//! - **[`azimuth`]**: Bearing and midpoint of a single coordinate pair
//! - **[`traversal`]**: Strided walk over single and multi-part line geometries
//! - **[`SampleFilter`]**: Minimum-distance deduplication, [`GreedyDistanceFilter`] by default
//! - **[`SegmentPipeline`]**: Repository → traversal → filter orchestration
//! - **[`GeometryRepository`]**: Source of road features ([`GpxRepository`], [`MemoryRepository`])
//! - **[`Survey`]**: Drives image fetch and classification once per sample
//!
//! # Performance Characteristics
//!
//! - **Traversal**: O(N / step) per polyline
//! - **Filter**: O(C × K) where C=candidates, K=accepted samples
//! - **Memory**: O(C) per pipeline invocation, nothing is cached between runs

pub mod azimuth;
mod catalog;
mod filter;
pub mod imagery;
mod pipeline;
mod repository;
mod sample;
mod survey;
pub mod traversal;

// Public API exports
pub use catalog::RoadCatalog;
pub use filter::{GreedyDistanceFilter, SampleFilter, geodesic_distance_km};
pub use imagery::{ImageRequest, ImageryConfig};
pub use pipeline::{PipelineConfig, SegmentPipeline, get_segment_data};
pub use repository::{GeometryRepository, GpxRepository, MemoryRepository, RoadFeature};
pub use sample::Sample;
pub use survey::{
    Classification, Detection, ImageFetcher, RegionClassifier, Survey, SurveyRecord,
    SurveyReport, UNKNOWN_LABEL, attempt_headings,
};

/// Error types for the sampling pipeline and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(&'static str),

    #[error("Malformed coordinate pair: ({x1}, {y1}) -> ({x2}, {y2})")]
    MalformedCoordinate { x1: f64, y1: f64, x2: f64, y2: f64 },

    #[error("Invalid step: {0} (must be at least 1)")]
    InvalidStep(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Image fetch failed: {0}")]
    ImageFetch(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SampleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(MemoryRepository) -> SegmentPipeline<MemoryRepository> = SegmentPipeline::new;
        let _: fn() -> PipelineConfig = PipelineConfig::default;
        let _: fn() -> RoadCatalog = RoadCatalog::default;
    }

    #[test]
    fn test_error_display() {
        let err = SampleError::InvalidStep(0);
        assert_eq!(err.to_string(), "Invalid step: 0 (must be at least 1)");

        let err = SampleError::UnsupportedGeometry("Polygon");
        assert_eq!(err.to_string(), "Unsupported geometry type: Polygon");
    }
}
