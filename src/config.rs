use crate::constants::*;
use crate::simulation::{RuleVariant, Topology};
use thiserror::Error;

// Boards larger than this are almost certainly a typo and would make the
// display field allocation explode.
pub const MAX_BOARD_DIM: usize = 4096;

// wgpu's default max_texture_dimension_2d; the display field becomes a
// texture of exactly this footprint, so reject it here instead of at
// device-validation time.
pub const MAX_FIELD_DIM: usize = 8192;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[error("board dimension {0} exceeds maximum {MAX_BOARD_DIM}")]
    DimensionTooLarge(usize),
    #[error("supersample factor must be positive")]
    ZeroSupersample,
    #[error("generation period must be positive, got {0}")]
    NonPositivePeriod(f64),
    #[error("fade constant must lie in (0, 1), got {0}")]
    FadeConstOutOfRange(f32),
    #[error("initial density must lie in [0, 1], got {0}")]
    DensityOutOfRange(f64),
    #[error("display field dimension {0} exceeds maximum {MAX_FIELD_DIM}")]
    FieldTooLarge(usize),
}

/// Which component performs the generation step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Host-loop evaluator; the display field is expanded on the CPU after
    /// each completed generation.
    Cpu,
    /// Compute-dispatch evaluator on ping-pong storage buffers; the fragment
    /// shader reads the last-completed board every frame.
    Gpu,
}

/// Immutable parameter block, supplied once at startup and read-only
/// thereafter by every core component.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub topology: Topology,
    pub rule: RuleVariant,
    pub fade_const: f32,
    /// Seconds per generation.
    pub period: f64,
    /// Samples per cell edge in the display field.
    pub supersample: usize,
    /// Write a one-sample dark ring around each cell block.
    pub grid_lines: bool,
    pub backend: Backend,
    /// Probability that a seeded cell starts alive.
    pub initial_density: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            topology: Topology::Mobius,
            rule: RuleVariant::Fade,
            fade_const: FADE_CONST,
            period: PERIOD,
            supersample: TEX_SCALE,
            grid_lines: true,
            backend: Backend::Cpu,
            initial_density: INITIAL_DENSITY,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat-board preset: dense grid, strict rule, fullscreen-quad view.
    pub fn flat_board() -> Self {
        Self {
            width: 400,
            height: 400,
            topology: Topology::Flat,
            rule: RuleVariant::Strict,
            period: 0.005,
            supersample: 2,
            grid_lines: false,
            ..Self::default()
        }
    }

    /// Rejects parameter combinations that would lead to undefined indexing
    /// or degenerate scheduling. Called once before any board is allocated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_BOARD_DIM {
            return Err(ConfigError::DimensionTooLarge(self.width));
        }
        if self.height > MAX_BOARD_DIM {
            return Err(ConfigError::DimensionTooLarge(self.height));
        }
        if self.supersample == 0 {
            return Err(ConfigError::ZeroSupersample);
        }
        if self.width * self.supersample > MAX_FIELD_DIM {
            return Err(ConfigError::FieldTooLarge(self.width * self.supersample));
        }
        if self.height * self.supersample > MAX_FIELD_DIM {
            return Err(ConfigError::FieldTooLarge(self.height * self.supersample));
        }
        if !(self.period > 0.0) {
            return Err(ConfigError::NonPositivePeriod(self.period));
        }
        if !(self.fade_const > 0.0 && self.fade_const < 1.0) {
            return Err(ConfigError::FadeConstOutOfRange(self.fade_const));
        }
        // gen_bool panics outside [0, 1]; reject here so construction never
        // gets that far.
        if !(0.0..=1.0).contains(&self.initial_density) {
            return Err(ConfigError::DensityOutOfRange(self.initial_density));
        }
        Ok(())
    }
}
