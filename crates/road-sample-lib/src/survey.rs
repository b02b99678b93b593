//! Survey driver: one photograph and one classification per sample
//!
//! The photograph provider and the color classifier are collaborators behind the
//! [`ImageFetcher`] and [`RegionClassifier`] traits. The driver decides which headings
//! to try, tolerates their failures, reports progress, and returns all results as one
//! batch in sample order.

use crate::{ImageRequest, ImageryConfig, Result, Sample};
use geo::{Coord, Rect};
use std::path::{Path, PathBuf};

/// Label recorded when no attempt produced a classification
pub const UNKNOWN_LABEL: &str = "unknown";

/// Outcome of classifying the region of interest of one photograph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The target color was found; carries its label (e.g. "blue")
    Detected(String),
    Unknown,
}

impl Classification {
    pub fn label(&self) -> &str {
        match self {
            Classification::Detected(label) => label,
            Classification::Unknown => UNKNOWN_LABEL,
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Classification::Unknown)
    }
}

/// Classifier output: the verdict plus an optional diagnostic plot
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub classification: Classification,
    pub plot_path: Option<PathBuf>,
}

/// Downloads a photograph and returns where it was stored
pub trait ImageFetcher {
    fn fetch(&self, request: &ImageRequest) -> Result<PathBuf>;
}

/// Classifies the dominant color in the region of interest of a photograph
pub trait RegionClassifier {
    /// `index` is the position of the sample in the survey, for naming artifacts
    fn classify(&self, image: &Path, index: usize) -> Result<Detection>;
}

/// Result for one sample
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurveyRecord {
    /// Position of the sample in the input sequence
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
    /// Heading of the last classified photograph, or the sample bearing if none was
    pub heading: f64,
    /// Classification label, [`UNKNOWN_LABEL`] when nothing was detected
    pub label: String,
    pub plot_path: Option<PathBuf>,
}

impl SurveyRecord {
    #[inline]
    pub fn is_detected(&self) -> bool {
        self.label != UNKNOWN_LABEL
    }
}

/// All records of a survey run, in sample order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurveyReport {
    pub records: Vec<SurveyRecord>,
}

impl SurveyReport {
    /// Bounding box of all record locations (x = longitude, y = latitude)
    pub fn bounding_box(&self) -> Option<Rect<f64>> {
        let first = self.records.first()?;
        let mut min = Coord {
            x: first.longitude,
            y: first.latitude,
        };
        let mut max = min;

        for record in &self.records[1..] {
            min.x = min.x.min(record.longitude);
            min.y = min.y.min(record.latitude);
            max.x = max.x.max(record.longitude);
            max.y = max.y.max(record.latitude);
        }

        Some(Rect::new(min, max))
    }

    /// Center of the bounding box as `(latitude, longitude)`, used to center the map
    pub fn center(&self) -> Option<(f64, f64)> {
        self.bounding_box().map(|bbox| {
            let center = bbox.center();
            (center.y, center.x)
        })
    }

    pub fn detected_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_detected()).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Runs fetch + classify over a sample sequence
pub struct Survey<Fe, Cl> {
    imagery: ImageryConfig,
    fetcher: Fe,
    classifier: Cl,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<Fe: ImageFetcher, Cl: RegionClassifier> Survey<Fe, Cl> {
    pub fn new(imagery: ImageryConfig, fetcher: Fe, classifier: Cl) -> Self {
        Self {
            imagery,
            fetcher,
            classifier,
        }
    }

    /// Process every sample in order and return the batch of records
    ///
    /// `progress(done, total)` is called after each sample.
    pub fn run<P: FnMut(usize, usize)>(&self, samples: &[Sample], mut progress: P) -> SurveyReport {
        let total = samples.len();
        let mut records = Vec::with_capacity(total);

        for (index, sample) in samples.iter().enumerate() {
            tracing::info!(
                "Processing segment {}/{}: heading={}, location=({}, {})",
                index + 1,
                total,
                sample.bearing,
                sample.latitude(),
                sample.longitude()
            );
            records.push(self.process_sample(index, sample));
            progress(index + 1, total);
        }

        SurveyReport { records }
    }

    /// Photograph a sample facing along the road, then facing back if that was inconclusive
    ///
    /// The second attempt covers vehicles seen from the rear instead of the front.
    pub fn process_sample(&self, index: usize, sample: &Sample) -> SurveyRecord {
        let mut record = SurveyRecord {
            index,
            latitude: sample.latitude(),
            longitude: sample.longitude(),
            heading: sample.bearing,
            label: UNKNOWN_LABEL.to_string(),
            plot_path: None,
        };

        for (attempt, heading) in attempt_headings(sample.bearing).into_iter().enumerate() {
            tracing::debug!(
                "Attempt {} for segment {}: heading={}",
                attempt + 1,
                index + 1,
                heading
            );

            let Some(detection) = self.attempt(index, sample, heading) else {
                continue;
            };

            record.heading = heading;
            record.label = detection.classification.label().to_string();
            record.plot_path = detection.plot_path;

            if !detection.classification.is_unknown() {
                break;
            }
        }

        record
    }

    fn attempt(&self, index: usize, sample: &Sample, heading: f64) -> Option<Detection> {
        let request = ImageRequest::new(&self.imagery, heading, sample.latitude(), sample.longitude());

        let image = match self.fetcher.fetch(&request) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Failed to fetch image for segment {}: {}", index + 1, e);
                return None;
            }
        };

        match self.classifier.classify(&image, index) {
            Ok(detection) => Some(detection),
            Err(e) => {
                tracing::warn!(
                    "Failed to classify {} for segment {}: {}",
                    image.display(),
                    index + 1,
                    e
                );
                None
            }
        }
    }
}

/// Headings to try for a sample: along the road, then the opposite direction
pub fn attempt_headings(bearing: f64) -> [f64; 2] {
    [bearing, (bearing + 180.0).rem_euclid(360.0)]
}
