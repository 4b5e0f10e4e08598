use thiserror::Error;

/// Errors that abort a generation call or a CLI run.
///
/// Search and placement exhaustion are not errors: they show up as empty
/// routes or short feature lists.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("map must be at least {min}x{min} tiles, got {rows}x{columns}")]
    InvalidDimensions { rows: usize, columns: usize, min: usize },

    /// No wide-ground biome is large enough to host the start and exit.
    #[error("no wide-ground biome larger than {min_size} tiles to place start/exit")]
    NoStartBiome { min_size: usize },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type GenResult<T> = Result<T, GenError>;
