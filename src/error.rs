use thiserror::Error;

#[derive(Debug, Error)]
pub enum FluError {
    #[error("probability {name} = {value} is not inside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error(
        "susceptible ({susceptible}) and infectious ({infectious}) probabilities add up to more than 1"
    )]
    ProbabilitiesExceedOne { susceptible: f64, infectious: f64 },

    #[error("max_iter must be at least 1")]
    ZeroMaxIter,

    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("status code {0} is outside 0..=7")]
    InvalidStatus(u8),

    #[error("grid is not square: row {row} has {actual} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("cell_pixels must be at least 1")]
    ZeroCellPixels,

    #[error("a {grid_size}x{grid_size} grid at {cell_pixels} pixels per cell does not fit in a frame")]
    FrameTooLarge { grid_size: usize, cell_pixels: u32 },

    #[error("cannot render an empty snapshot sequence")]
    NoSnapshots,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = FluError> = std::result::Result<T, E>;
