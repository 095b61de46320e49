use thiserror::Error;

/// Errors from the fallible edges of terrain generation.
///
/// The pipeline itself is total; these come from argument checking,
/// settings validation, ship placement and export.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Grid size was negative
    #[error("invalid grid size {0}: must be zero or positive")]
    InvalidGridSize(i64),
    /// Height layer weights do not sum to 1.0
    #[error("height layer weights must sum to 1.0, got {sum}")]
    InvalidWeights {
        /// Actual sum of the configured weights
        sum: f64,
    },
    /// Biome thresholds are not strictly ascending
    #[error("biome thresholds must be strictly ascending: {0:?}")]
    InvalidThresholds([f64; 5]),
    /// A noise layer scale is not a finite number
    #[error("noise layer '{layer}' has non-finite scale {scale}")]
    InvalidScale {
        /// Layer name
        layer: &'static str,
        /// Offending scale
        scale: f64,
    },
    /// Rows of a grid do not form a square
    #[error("grid has {size} rows but row {row} has {len} cells")]
    NonSquareGrid {
        /// Number of rows
        size: usize,
        /// First offending row
        row: usize,
        /// Length of that row
        len: usize,
    },
    /// Ship could not be fitted onto the available sea tiles
    #[error("could not place ship '{ship}' after {attempts} attempts")]
    ShipPlacement {
        /// Ship name
        ship: String,
        /// Number of placement attempts made
        attempts: usize,
    },
    /// Not enough free cells for the opening misses
    #[error("could not reveal {wanted} misses after {attempts} attempts")]
    RevealMoves {
        /// Number of misses requested
        wanted: usize,
        /// Number of draws made
        attempts: usize,
    },
    /// Bad command-line argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Font file could not be parsed
    #[error("font file '{0}' is not a valid TrueType font")]
    Font(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result alias for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
