use std::io;

use thiserror::Error;

use crate::geom::Point;

/// Errors reported by [`Grid`](crate::Grid) mutation and the grid file format.
#[derive(Debug, Error)]
pub enum GridError {
    /// A search engine holds the grid's exclusivity claim.
    #[error("grid is claimed by a search engine")]
    Claimed,

    #[error("position {0} is outside the grid")]
    OutOfBounds(Point),

    /// The input ended before the named section was fully read.
    #[error("grid data truncated while reading {0}")]
    Truncated(&'static str),

    #[error("invalid grid header: {0}")]
    InvalidHeader(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
