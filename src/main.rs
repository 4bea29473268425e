use anyhow::Context;
use clap::Parser;
use flu_automaton::render::GifSink;
use flu_automaton::sweep::{run_sweep, write_summary, SnapshotSink};
use flu_automaton::SweepConfig;
use log::info;
use std::path::PathBuf;

/// Sweep initial susceptible/infectious shares and render every run.
#[derive(Debug, Parser)]
#[command(name = "flu_sweep", version)]
struct Args {
    /// JSON file with a full sweep configuration. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    grid_size: Option<usize>,

    #[arg(long)]
    max_iter: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    cell_pixels: Option<u32>,

    #[arg(long)]
    frame_delay_ms: Option<u32>,

    /// Only write summary.json, skip the GIFs.
    #[arg(long)]
    no_render: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::from_json_file(path)
                .with_context(|| format!("reading {}", path.display()))?,
            None => SweepConfig::default(),
        };
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(n) = self.grid_size {
            config.grid_size = n;
        }
        if let Some(n) = self.max_iter {
            config.max_iter = n;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(px) = self.cell_pixels {
            config.cell_pixels = px;
        }
        if let Some(ms) = self.frame_delay_ms {
            config.frame_delay_ms = ms;
        }
        if self.no_render {
            config.render = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;

    let gif_sink = if config.render {
        Some(
            GifSink::create(&config.output_dir, config.cell_pixels, config.frame_delay_ms)
                .with_context(|| format!("creating {}", config.output_dir.display()))?,
        )
    } else {
        None
    };
    let sinks: Vec<&dyn SnapshotSink> = gif_sink
        .iter()
        .map(|sink| sink as &dyn SnapshotSink)
        .collect();

    let summaries = run_sweep(&config, &sinks)?;

    let summary_path = config.output_dir.join("summary.json");
    write_summary(&summary_path, &summaries)?;
    info!(
        "{} runs finished, summary in {}",
        summaries.len(),
        summary_path.display()
    );
    Ok(())
}
