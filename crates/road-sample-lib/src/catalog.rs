//! Region → road reference index used to pick what to survey

use crate::{GeometryRepository, Result, RoadFeature};
use std::collections::BTreeMap;

/// Road references grouped by region
///
/// Regions are sorted; references keep the order in which the repository first
/// returned them and appear once per region.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadCatalog {
    regions: BTreeMap<String, Vec<String>>,
}

impl RoadCatalog {
    /// Build the catalog from every feature of a repository
    pub fn from_repository<R: GeometryRepository + ?Sized>(repository: &R) -> Result<Self> {
        Ok(Self::from_features(&repository.fetch(None, None)?))
    }

    /// Build the catalog from a list of features
    ///
    /// Features with a blank or missing reference or region are skipped.
    pub fn from_features(features: &[RoadFeature]) -> Self {
        let mut catalog = Self::default();
        for feature in features {
            if let (Some(region), Some(reference)) = (&feature.region, &feature.reference) {
                catalog.insert(region, reference);
            }
        }
        catalog
    }

    /// Add a reference under a region; returns false when blank or already present
    pub fn insert(&mut self, region: &str, reference: &str) -> bool {
        let (region, reference) = (region.trim(), reference.trim());
        if region.is_empty() || reference.is_empty() {
            return false;
        }

        let references = self.regions.entry(region.to_string()).or_default();
        if references.iter().any(|r| r == reference) {
            return false;
        }
        references.push(reference.to_string());
        true
    }

    /// All regions, sorted
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Road references of a region (empty if the region is unknown)
    pub fn references(&self, region: &str) -> &[String] {
        self.regions
            .get(region.trim())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over (region, references) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.regions
            .iter()
            .map(|(region, refs)| (region.as_str(), refs.as_slice()))
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
