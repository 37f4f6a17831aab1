//! Core types for waypoint pathfinding.
//!
//! This crate provides the terrain model searched by `waypath-search`:
//! geometry primitives, the shared-handle [`Grid`] with its exclusivity
//! [`GridClaim`], and the binary grid file format.

pub mod error;
pub mod format;
pub mod geom;
pub mod grid;

pub use error::GridError;
pub use format::{GridDecoder, GridEncoder};
pub use geom::{Point, Range, RangeIter};
pub use grid::{DEFAULT_COST, Grid, GridClaim};
