use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{SolverError, SolverResult};

/// Grid refinement factors the solver is validated for.
pub const SUPPORTED_SCALES: [usize; 2] = [8, 12];

/// Run parameters of the kernel. All fields except `scale` carry the
/// defaults of the validated configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunParams {
    /// Refine the input grid by this factor
    pub scale: usize,
    /// Inflow Mach number
    #[serde(default = "default_mach_number")]
    pub mach_number: f64,
    /// Multiplier on the second-order damping term
    #[serde(default = "default_damping")]
    pub second_order_damping: f64,
    /// Multiplier on the fourth-order damping term
    #[serde(default = "default_damping")]
    pub fourth_order_damping: f64,
    /// Number of time steps to run
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Collapse the per-cell timestep to its global minimum
    /// (time-accurate mode) instead of local time-stepping
    #[serde(default = "default_time_accurate")]
    pub time_accurate: bool,
}

fn default_mach_number() -> f64 {
    0.7
}

fn default_damping() -> f64 {
    1.0
}

fn default_iterations() -> usize {
    100
}

fn default_time_accurate() -> bool {
    true
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            scale: SUPPORTED_SCALES[0],
            mach_number: default_mach_number(),
            second_order_damping: default_damping(),
            fourth_order_damping: default_damping(),
            iterations: default_iterations(),
            time_accurate: default_time_accurate(),
        }
    }
}

impl RunParams {
    /// Validated parameter set for one of the supported scales.
    pub fn with_scale(scale: usize) -> SolverResult<Self> {
        let params = RunParams {
            scale,
            ..RunParams::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn from_json(input: &str) -> SolverResult<Self> {
        let params: RunParams = serde_json::from_str(input)
            .map_err(|e| SolverError::config(format!("failed to parse run parameters: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_file(path: impl AsRef<Path>) -> SolverResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SolverError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        RunParams::from_json(&content)
    }

    pub fn validate(&self) -> SolverResult<()> {
        if !SUPPORTED_SCALES.contains(&self.scale) {
            return Err(SolverError::config(format!(
                "unsupported scale {}; supported scales are {:?}",
                self.scale, SUPPORTED_SCALES
            )));
        }
        if !(self.mach_number > 0.0) {
            return Err(SolverError::config(format!(
                "mach_number must be positive, got {}",
                self.mach_number
            )));
        }
        if self.second_order_damping < 0.0 || self.fourth_order_damping < 0.0 {
            return Err(SolverError::config(
                "damping multipliers must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
