//! Board configuration.

use crate::container::{ContainerBox, ContainerGeometry, FixedContainer, ViewportContainer};
use crate::decoration::DEFAULT_PHOTO_ENDPOINT;
use crate::shapes::Geometry;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// How the container box is determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContainerConfig {
    /// Explicit box.
    Fixed {
        #[serde(default)]
        top: f64,
        #[serde(default)]
        left: f64,
        width: f64,
        height: f64,
    },
    /// A fraction of the host viewport on each axis.
    Viewport {
        viewport_width: f64,
        viewport_height: f64,
        #[serde(default = "default_fraction")]
        fraction_x: f64,
        #[serde(default = "default_fraction")]
        fraction_y: f64,
    },
}

fn default_fraction() -> f64 {
    ViewportContainer::DEFAULT_FRACTION
}

impl Default for ContainerConfig {
    /// 80% of a 1000x750 viewport, i.e. an 800x600 box.
    fn default() -> Self {
        Self::Viewport {
            viewport_width: 1000.0,
            viewport_height: 750.0,
            fraction_x: ViewportContainer::DEFAULT_FRACTION,
            fraction_y: ViewportContainer::DEFAULT_FRACTION,
        }
    }
}

impl ContainerConfig {
    /// Build the container provider described by this configuration.
    pub fn build(&self) -> Box<dyn ContainerGeometry> {
        match *self {
            ContainerConfig::Fixed {
                top,
                left,
                width,
                height,
            } => Box::new(FixedContainer::new(ContainerBox::new(
                Point::new(left, top),
                Size::new(width, height),
            ))),
            ContainerConfig::Viewport {
                viewport_width,
                viewport_height,
                fraction_x,
                fraction_y,
            } => Box::new(ViewportContainer::new(
                Size::new(viewport_width, viewport_height),
                Size::new(fraction_x, fraction_y),
            )),
        }
    }
}

/// Decorative image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Fetch a background photo for each new rectangle.
    pub enabled: bool,
    /// JSON photo catalog URL.
    pub endpoint: String,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_PHOTO_ENDPOINT.to_string(),
        }
    }
}

/// Top-level board configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub container: ContainerConfig,
    /// Geometry of rectangles added without explicit geometry.
    pub default_rectangle: Geometry,
    pub decorations: DecorationConfig,
}

impl BoardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded board configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the values that the engine relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        let bounds = self.container.build().container_box();
        if !bounds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "container box {}x{} has no positive area",
                bounds.width(),
                bounds.height()
            )));
        }
        if !self.default_rectangle.has_positive_area() {
            return Err(ConfigError::Invalid(format!(
                "default rectangle size {}x{} is not positive",
                self.default_rectangle.width(),
                self.default_rectangle.height()
            )));
        }
        Ok(())
    }
}
