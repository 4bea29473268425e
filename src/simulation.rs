use crate::config::{validate_probabilities, SimulationConfig, DEFAULT_GRID_SIZE};
use crate::error::{FluError, Result};
use crate::grid::{Grid, Health, Status};
use crate::padded::PaddedGrid;
use log::{debug, trace};
use rand::Rng;

/* Initialisation */

/// Fill a `size` x `size` grid at random. Each person is independently
/// susceptible with `prob_susceptible`, infectious (day 1 or 2) with
/// `prob_infectious` and immune (day 3 to 7) otherwise.
pub fn init_grid<R: Rng + ?Sized>(
    size: usize,
    prob_susceptible: f64,
    prob_infectious: f64,
    rng: &mut R,
) -> Result<Grid> {
    // nothing may be drawn from rng before this
    validate_probabilities(prob_susceptible, prob_infectious)?;
    if size == 0 {
        return Err(FluError::EmptyGrid);
    }

    let cells = (0..size * size)
        .map(|_| {
            let draw: f64 = rng.gen();
            let code = if draw < prob_susceptible {
                Status::SUSCEPTIBLE.code()
            } else if draw < prob_susceptible + prob_infectious {
                rng.gen_range(Status::FIRST_INFECTIOUS_DAY.code()..=Status::LAST_INFECTIOUS_DAY.code())
            } else {
                rng.gen_range(Status::FIRST_IMMUNE_DAY.code()..=Status::LAST_IMMUNE_DAY.code())
            };
            Status::from_code(code)
        })
        .collect();
    Ok(Grid::from_cells(size, cells))
}

/* Propagation */

/// Advance the population by one tick. Only people who were infectious at
/// the start of the tick spread, so infection travels one cell per tick.
pub fn step(grid: &Grid) -> Grid {
    let mut padded = PaddedGrid::extend(grid);
    let contagious = padded.infectious_coordinates();
    for xy in contagious {
        padded.spread(xy);
    }
    padded.finalize();
    padded.strip()
}

/// Run from a fresh random grid until nobody is left outside the susceptible
/// pool or `config.max_iter` snapshots exist. Element 0 is the initial grid.
pub fn run<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Vec<Grid>> {
    config.validate()?;
    let initial = init_grid(
        config.grid_size,
        config.prob_susceptible,
        config.prob_infectious,
        rng,
    )?;
    let mut snapshots = vec![initial];

    // the check looks at the newest snapshot before stepping past it
    while snapshots.len() < config.max_iter {
        let last = match snapshots.last() {
            Some(last) if last.someone_is_not_susceptible() => last,
            _ => break,
        };
        let next = step(last);
        let counts = next.counts();
        trace!(
            "tick {}: {}={} {}={} {}={}",
            snapshots.len(),
            Health::Susceptible,
            counts.susceptible,
            Health::Infectious,
            counts.infectious,
            Health::Immune,
            counts.immune
        );
        snapshots.push(next);
    }

    debug!(
        "s={} i={} finished after {} snapshots",
        config.prob_susceptible,
        config.prob_infectious,
        snapshots.len()
    );
    Ok(snapshots)
}

/// [`run`] on the default 25x25 grid.
pub fn simulate<R: Rng + ?Sized>(
    prob_susceptible: f64,
    prob_infectious: f64,
    max_iter: usize,
    rng: &mut R,
) -> Result<Vec<Grid>> {
    run(
        &SimulationConfig::new(prob_susceptible, prob_infectious, max_iter)
            .with_grid_size(DEFAULT_GRID_SIZE),
        rng,
    )
}
