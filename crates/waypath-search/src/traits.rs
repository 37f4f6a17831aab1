use waypath_core::{Grid, Point};

/// Estimate of the remaining cost of a waypoint chain.
///
/// `chain` is the full chain of one ordering (spawn, waypoints, destination)
/// and `progress` is the number of chain entries already reached; the next
/// unreached waypoint is `chain[progress]`. Implementations must return a
/// non-negative value and must handle `progress == chain.len()`.
pub trait Heuristic {
    fn estimate(&self, grid: &Grid, position: Point, chain: &[Point], progress: usize) -> f32;
}

impl<F> Heuristic for F
where
    F: Fn(&Grid, Point, &[Point], usize) -> f32,
{
    #[inline]
    fn estimate(&self, grid: &Grid, position: Point, chain: &[Point], progress: usize) -> f32 {
        self(grid, position, chain, progress)
    }
}
