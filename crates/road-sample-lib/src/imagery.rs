//! Street-level imagery request model
//!
//! [`ImageryConfig`] replaces process-wide provider settings with an explicit value that
//! is handed to whoever performs the request. [`ImageRequest`] describes a single
//! photograph: where, facing which way, and with which camera settings.

use crate::{Result, SampleError};
use std::str::FromStr;

/// Street View Static API endpoint
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/streetview";

/// Environment variable names read by [`ImageryConfig::from_env`]
pub const ENV_API_KEY: &str = "STREETVIEW_API_KEY";
pub const ENV_FOV: &str = "STREETVIEW_FOV";
pub const ENV_PITCH: &str = "STREETVIEW_PITCH";
pub const ENV_SIZE: &str = "STREETVIEW_SIZE";

/// Camera and provider settings shared by every request of a survey
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageryConfig {
    /// Provider endpoint
    pub base_url: String,
    /// Provider API key
    pub api_key: String,
    /// Horizontal field of view in degrees. Default: 50
    pub fov: f64,
    /// Camera pitch in degrees, negative looks down at the road. Default: -40
    pub pitch: f64,
    /// Image size as "WIDTHxHEIGHT". Default: "640x640"
    pub size: String,
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            fov: 50.0,
            pitch: -40.0,
            size: "640x640".to_string(),
        }
    }
}

impl ImageryConfig {
    /// Read settings from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unparsable values fall back to defaults
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup(ENV_API_KEY).unwrap_or(defaults.api_key),
            fov: parse_var(&lookup, ENV_FOV).unwrap_or(defaults.fov),
            pitch: parse_var(&lookup, ENV_PITCH).unwrap_or(defaults.pitch),
            size: lookup(ENV_SIZE).unwrap_or(defaults.size),
            base_url: defaults.base_url,
        }
    }

    /// Image width and height in pixels
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let (width, height) = self.size.trim().split_once('x')?;
        Some((width.parse().ok()?, height.parse().ok()?))
    }

    /// Check the camera settings against the provider limits
    pub fn validate(&self) -> Result<()> {
        if !(self.fov > 0.0 && self.fov <= 120.0) {
            return Err(SampleError::InvalidConfig(format!(
                "field of view must be within (0, 120] degrees, got {}",
                self.fov
            )));
        }
        if !(-90.0..=90.0).contains(&self.pitch) {
            return Err(SampleError::InvalidConfig(format!(
                "pitch must be within [-90, 90] degrees, got {}",
                self.pitch
            )));
        }
        match self.dimensions() {
            Some((w, h)) if w > 0 && h > 0 => Ok(()),
            _ => Err(SampleError::InvalidConfig(format!(
                "size must look like 640x640, got {:?}",
                self.size
            ))),
        }
    }
}

fn parse_var<T: FromStr, F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, value);
            None
        }
    }
}

/// A single photograph to fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub base_url: String,
    pub api_key: String,
    pub fov: f64,
    pub pitch: f64,
    pub size: String,
    /// Camera heading in degrees clockwise from north
    pub heading: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl ImageRequest {
    pub fn new(config: &ImageryConfig, heading: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            fov: config.fov,
            pitch: config.pitch,
            size: config.size.clone(),
            heading,
            latitude,
            longitude,
        }
    }

    /// Provider query parameters, in the order the provider documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("fov", self.fov.to_string()),
            ("heading", self.heading.to_string()),
            ("location", format!("{},{}", self.latitude, self.longitude)),
            ("pitch", self.pitch.to_string()),
            ("size", self.size.clone()),
        ]
    }

    /// Full request URL
    ///
    /// Values are inserted verbatim: every parameter is numeric or an API key, both of
    /// which only use URL-safe characters.
    pub fn url(&self) -> String {
        let query: Vec<String> = self
            .query_pairs()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{}?{}", self.base_url, query.join("&"))
    }

    /// Deterministic file name for the downloaded photograph
    pub fn file_name(&self) -> String {
        format!("{}_{}_heading_{}.jpg", self.latitude, self.longitude, self.heading)
    }
}
