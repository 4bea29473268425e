use crate::config::{SimulationConfig, SweepConfig};
use crate::error::{FluError, Result};
use crate::grid::{Grid, HealthCounts};
use crate::simulation::run;
use indicatif::ParallelProgressIterator;
use itertools::iproduct;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// One probability pair of the sweep. Probabilities are held in tenths so
/// that the pair never sums past one through rounding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SweepItem {
    pub index: usize,
    pub susceptible_tenths: u8,
    pub infectious_tenths: u8,
}

impl SweepItem {
    pub fn prob_susceptible(&self) -> f64 {
        self.susceptible_tenths as f64 / 10.
    }

    pub fn prob_infectious(&self) -> f64 {
        self.infectious_tenths as f64 / 10.
    }

    pub fn immune_tenths(&self) -> u8 {
        10 - self.susceptible_tenths - self.infectious_tenths
    }

    pub fn prob_immune(&self) -> f64 {
        self.immune_tenths() as f64 / 10.
    }

    /// File stem used by the renderers, e.g. `s0.3_i0.2`.
    pub fn label(&self) -> String {
        format!(
            "s{:.1}_i{:.1}",
            self.prob_susceptible(),
            self.prob_infectious()
        )
    }

    pub fn simulation_config(&self, sweep: &SweepConfig) -> SimulationConfig {
        SimulationConfig::new(self.prob_susceptible(), self.prob_infectious(), sweep.max_iter)
            .with_grid_size(sweep.grid_size)
    }
}

/// Susceptible share 0.1..=0.9, and for each of them every infectious share
/// from 0.1 up to whatever is left.
pub fn work_items() -> Vec<SweepItem> {
    iproduct!(1..=9u8, 1..=9u8)
        .filter(|(s, i)| s + i <= 10)
        .enumerate()
        .map(|(index, (s, i))| SweepItem {
            index,
            susceptible_tenths: s,
            infectious_tenths: i,
        })
        .collect()
}

/// A finished run, handed to every sink.
#[derive(Clone, Debug)]
pub struct RunRecord {
    pub item: SweepItem,
    pub seed: u64,
    pub snapshots: Vec<Grid>,
}

/// Consumer of finished runs, e.g. an animation exporter. Called from
/// worker threads.
pub trait SnapshotSink: Sync {
    fn consume(&self, record: &RunRecord) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub label: String,
    pub prob_susceptible: f64,
    pub prob_infectious: f64,
    pub prob_immune: f64,
    pub seed: u64,
    pub snapshots: usize,
    pub counts: Vec<HealthCounts>,
}

impl From<&RunRecord> for RunSummary {
    fn from(record: &RunRecord) -> Self {
        RunSummary {
            label: record.item.label(),
            prob_susceptible: record.item.prob_susceptible(),
            prob_infectious: record.item.prob_infectious(),
            prob_immune: record.item.prob_immune(),
            seed: record.seed,
            snapshots: record.snapshots.len(),
            counts: record.snapshots.iter().map(Grid::counts).collect(),
        }
    }
}

pub fn item_seed(base_seed: u64, item: &SweepItem) -> u64 {
    base_seed.wrapping_add(item.index as u64)
}

/// Simulate a single work item with its own generator.
pub fn run_item(item: SweepItem, config: &SweepConfig, base_seed: u64) -> Result<RunRecord> {
    let seed = item_seed(base_seed, &item);
    let mut rng = SmallRng::seed_from_u64(seed);
    let snapshots = run(&item.simulation_config(config), &mut rng)?;
    Ok(RunRecord {
        item,
        seed,
        snapshots,
    })
}

/// Run every work item in parallel and pass each result to all `sinks`.
/// Summaries come back in work-item order.
pub fn run_sweep(config: &SweepConfig, sinks: &[&dyn SnapshotSink]) -> Result<Vec<RunSummary>> {
    config.validate()?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let items = work_items();
    info!(
        "sweeping {} parameter pairs on a {}x{} grid, base seed {}",
        items.len(),
        config.grid_size,
        config.grid_size,
        base_seed
    );

    let num_items = items.len() as u64;
    let results: Vec<Result<RunSummary>> = items
        .into_par_iter()
        .progress_count(num_items)
        .map(|item| {
            let record = run_item(item, config, base_seed)?;
            for sink in sinks {
                sink.consume(&record)?;
            }
            debug!("{} done", record.item.label());
            Ok(RunSummary::from(&record))
        })
        .collect();

    results.into_iter().collect()
}

pub fn write_summary(path: &Path, summaries: &[RunSummary]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, summaries)?;
    writer.flush().map_err(FluError::from)
}
