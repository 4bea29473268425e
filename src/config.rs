use crate::error::{FluError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_GRID_SIZE: usize = 25;
pub const DEFAULT_MAX_ITER: usize = 30;
pub const DEFAULT_SWEEP_MAX_ITER: usize = 60;

/// Parameters of a single run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid_size: usize,
    pub prob_susceptible: f64,
    pub prob_infectious: f64,
    pub max_iter: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            grid_size: DEFAULT_GRID_SIZE,
            prob_susceptible: 0.5,
            prob_infectious: 0.1,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl SimulationConfig {
    pub fn new(prob_susceptible: f64, prob_infectious: f64, max_iter: usize) -> Self {
        SimulationConfig {
            prob_susceptible,
            prob_infectious,
            max_iter,
            ..Default::default()
        }
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Never configured directly, always whatever is left over.
    pub fn prob_immune(&self) -> f64 {
        1. - self.prob_susceptible - self.prob_infectious
    }

    pub fn validate(&self) -> Result<()> {
        validate_probabilities(self.prob_susceptible, self.prob_infectious)?;
        if self.max_iter == 0 {
            return Err(FluError::ZeroMaxIter);
        }
        if self.grid_size == 0 {
            return Err(FluError::EmptyGrid);
        }
        Ok(())
    }
}

pub fn validate_probabilities(prob_susceptible: f64, prob_infectious: f64) -> Result<()> {
    for (name, value) in [
        ("prob_susceptible", prob_susceptible),
        ("prob_infectious", prob_infectious),
    ] {
        // NaN fails this check too
        if !(0. ..=1.).contains(&value) {
            return Err(FluError::ProbabilityOutOfRange { name, value });
        }
    }
    if prob_susceptible + prob_infectious > 1. {
        return Err(FluError::ProbabilitiesExceedOne {
            susceptible: prob_susceptible,
            infectious: prob_infectious,
        });
    }
    Ok(())
}

/// Parameters of a full probability sweep and its output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub grid_size: usize,
    pub max_iter: usize,
    /// Base seed, item k runs with `seed + k`. Drawn from entropy when absent.
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    /// Edge length of one person in the rendered frames.
    pub cell_pixels: u32,
    pub frame_delay_ms: u32,
    /// Write animated GIFs next to the summary.
    pub render: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            grid_size: DEFAULT_GRID_SIZE,
            max_iter: DEFAULT_SWEEP_MAX_ITER,
            seed: None,
            output_dir: PathBuf::from("flu_output"),
            cell_pixels: 16,
            frame_delay_ms: 2000,
            render: true,
        }
    }
}

impl SweepConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: SweepConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(FluError::ZeroMaxIter);
        }
        if self.grid_size == 0 {
            return Err(FluError::EmptyGrid);
        }
        if self.cell_pixels == 0 {
            return Err(FluError::ZeroCellPixels);
        }
        Ok(())
    }
}
