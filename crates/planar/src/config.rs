//! Kernel configuration loaded from TOML.
//!
//! Every key is optional; missing keys fall back to the kernel defaults.
//!
//! ```toml
//! session_tolerance = 0.01
//!
//! [tolerance]
//! dist = 1e-3
//! flatness = 5e-4
//!
//! [mesh]
//! strategy = "delaunay"
//! subdivision_count = 4
//! subdivision_ratio = 1.0
//!
//! [grid]
//! dx = 0.5
//! dy = 0.5
//! snap = true
//! ```

use std::path::Path;

use anyhow::Context;
use planar_kernel_math::Tolerance;
use planar_kernel_mesh::MeshStrategy;
use planar_kernel_model::{CurveCollector, Grid, Model, SegmentSubdivision};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The text is not valid TOML for a [`KernelConfig`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be written out.
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value is out of range.
    #[error("invalid configuration value `{key}`: {reason}")]
    Value {
        /// Dotted key of the offending value.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Geometric tolerances, mirrored from [`Tolerance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Coordinate coincidence distance.
    pub dist: f64,
    /// Curve-parameter coincidence.
    pub param: f64,
    /// Tight coordinate equality.
    pub coord: f64,
    /// Straightness tolerance for flattening.
    pub flatness: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Tolerance::DEFAULT.into()
    }
}

impl From<Tolerance> for ToleranceConfig {
    fn from(tol: Tolerance) -> Self {
        Self {
            dist: tol.dist,
            param: tol.param,
            coord: tol.coord,
            flatness: tol.flatness,
        }
    }
}

impl From<ToleranceConfig> for Tolerance {
    fn from(cfg: ToleranceConfig) -> Self {
        Self {
            dist: cfg.dist,
            param: cfg.param,
            coord: cfg.coord,
            flatness: cfg.flatness,
        }
    }
}

/// Mesh defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Strategy used when none is chosen explicitly.
    pub strategy: MeshStrategy,
    /// Subdivision count given to new segments.
    pub subdivision_count: usize,
    /// Last-to-first interval ratio given to new segments.
    pub subdivision_ratio: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        let sub = SegmentSubdivision::default();
        Self {
            strategy: MeshStrategy::default(),
            subdivision_count: sub.count,
            subdivision_ratio: sub.ratio,
        }
    }
}

/// Input grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Spacing along x.
    pub dx: f64,
    /// Spacing along y.
    pub dy: f64,
    /// Whether input points snap to grid nodes.
    pub snap: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        let grid = Grid::default();
        Self {
            dx: grid.dx,
            dy: grid.dy,
            snap: grid.snap,
        }
    }
}

/// Kernel configuration: tolerances, session tolerance, mesh and grid defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KernelConfig {
    /// End point attraction distance for intersections.
    /// Defaults to `tolerance.dist` when absent.
    pub session_tolerance: Option<f64>,
    /// Geometric tolerances.
    pub tolerance: ToleranceConfig,
    /// Mesh defaults.
    pub mesh: MeshConfig,
    /// Input grid.
    pub grid: GridConfig,
}

impl KernelConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("cannot load configuration {}", path.display()))?;
        log::info!("configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Write the configuration file.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text)
            .with_context(|| format!("cannot write configuration {}", path.display()))?;
        log::info!("configuration saved to {}", path.display());
        Ok(())
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tolerance;
        let positive = [
            ("tolerance.dist", t.dist),
            ("tolerance.param", t.param),
            ("tolerance.coord", t.coord),
            ("tolerance.flatness", t.flatness),
            ("mesh.subdivision_ratio", self.mesh.subdivision_ratio),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Value {
                    key,
                    reason: "must be a positive number",
                });
            }
        }
        if let Some(s) = self.session_tolerance {
            if !(s.is_finite() && s >= 0.0) {
                return Err(ConfigError::Value {
                    key: "session_tolerance",
                    reason: "must be a non-negative number",
                });
            }
        }
        if self.mesh.subdivision_count == 0 {
            return Err(ConfigError::Value {
                key: "mesh.subdivision_count",
                reason: "must be at least 1",
            });
        }
        if self.grid.dx <= 0.0 || self.grid.dy <= 0.0 {
            return Err(ConfigError::Value {
                key: "grid",
                reason: "spacing must be positive",
            });
        }
        Ok(())
    }

    /// Modeling tolerances.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance.into()
    }

    /// Subdivision given to new segments.
    pub fn subdivision(&self) -> SegmentSubdivision {
        SegmentSubdivision::new(self.mesh.subdivision_count, self.mesh.subdivision_ratio)
    }

    /// Input grid.
    pub fn grid(&self) -> Grid {
        Grid {
            dx: self.grid.dx,
            dy: self.grid.dy,
            snap: self.grid.snap,
        }
    }

    /// A curve collector using the configured tolerances.
    pub fn collector(&self) -> CurveCollector {
        CurveCollector::new(self.tolerance.dist, self.tolerance.flatness)
    }

    /// An empty model set up with this configuration.
    pub fn build_model(&self) -> Model {
        let tol = self.tolerance();
        let mut model = Model::with_tolerance(tol);
        model.set_current_tolerance(self.session_tolerance.unwrap_or(tol.dist));
        model.set_default_subdivision(self.subdivision());
        model
    }
}
