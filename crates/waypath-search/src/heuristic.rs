//! The shipped heuristic family.
//!
//! | Variant | Estimate | Admissible |
//! |---|---|---|
//! | [`Zero`](HeuristicKind::Zero) | 0 | always |
//! | [`ChainedManhattan`](HeuristicKind::ChainedManhattan) | Manhattan length through every remaining waypoint | on terrain with costs ≥ 1 |
//! | [`ChainedCrow`](HeuristicKind::ChainedCrow) | as above, skipping the next waypoint | on terrain with costs ≥ 1 |
//! | [`Folly`](HeuristicKind::Folly) | Manhattan distance to the next waypoint only | no guarantee |

use std::fmt;
use std::str::FromStr;

use waypath_core::{Grid, Point};

use crate::distance::{chain_length, manhattan};
use crate::traits::Heuristic;

/// One of the four built-in heuristics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeuristicKind {
    /// Dijkstra: uniform-cost exploration.
    Zero,
    /// A*: chained Manhattan distance through all remaining waypoints.
    #[default]
    ChainedManhattan,
    /// Chained Manhattan measured from the waypoint after the next one.
    ChainedCrow,
    /// Distance to the next waypoint only.
    Folly,
}

impl HeuristicKind {
    /// Every variant, in menu order.
    pub const ALL: [HeuristicKind; 4] = [
        HeuristicKind::ChainedManhattan,
        HeuristicKind::Zero,
        HeuristicKind::ChainedCrow,
        HeuristicKind::Folly,
    ];

    /// Display label of the algorithm the heuristic turns the search into.
    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::Zero => "Dijkstra",
            HeuristicKind::ChainedManhattan => "A*",
            HeuristicKind::ChainedCrow => "Dijkstra's Crow",
            HeuristicKind::Folly => "Dijkstra's Folly",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown heuristic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHeuristic(pub String);

impl fmt::Display for UnknownHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown heuristic `{}` (expected astar, dijkstra, crow or folly)",
            self.0
        )
    }
}

impl std::error::Error for UnknownHeuristic {}

impl FromStr for HeuristicKind {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "dijkstra" => Ok(HeuristicKind::Zero),
            "astar" | "a*" | "manhattan" | "chained-manhattan" => {
                Ok(HeuristicKind::ChainedManhattan)
            }
            "crow" | "chained-crow" => Ok(HeuristicKind::ChainedCrow),
            "folly" => Ok(HeuristicKind::Folly),
            _ => Err(UnknownHeuristic(s.to_string())),
        }
    }
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, _grid: &Grid, position: Point, chain: &[Point], progress: usize) -> f32 {
        let estimate = match self {
            HeuristicKind::Zero => 0,
            HeuristicKind::ChainedManhattan => chained(position, chain, progress),
            HeuristicKind::ChainedCrow => chained(position, chain, progress + 1),
            HeuristicKind::Folly => folly(position, chain, progress),
        };
        estimate as f32
    }
}

/// Distance from `position` to `chain[from]`, then along the rest of the chain.
fn chained(position: Point, chain: &[Point], from: usize) -> i32 {
    match chain.get(from) {
        Some(&next) => manhattan(position, next) + chain_length(&chain[from..]),
        None => 0,
    }
}

fn folly(position: Point, chain: &[Point], progress: usize) -> i32 {
    let Some(&next) = chain.get(progress) else {
        return 0;
    };
    let at_previous = progress > 0 && chain[progress - 1] == position;
    if position == next || at_previous {
        return 0;
    }
    manhattan(position, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Grid, Vec<Point>) {
        let grid = Grid::new(10, 10, Point::new(0, 0), Point::new(9, 9));
        let chain = vec![
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(4, 4),
            Point::new(9, 9),
        ];
        (grid, chain)
    }

    #[test]
    fn zero_is_always_zero() {
        let (g, chain) = setup();
        for progress in 0..=chain.len() {
            assert_eq!(
                HeuristicKind::Zero.estimate(&g, Point::new(3, 7), &chain, progress),
                0.0
            );
        }
    }

    #[test]
    fn chained_manhattan_sums_remaining_legs() {
        let (g, chain) = setup();
        let h = HeuristicKind::ChainedManhattan;
        // (1,0) -> (4,0) = 3, (4,0) -> (4,4) = 4, (4,4) -> (9,9) = 10
        assert_eq!(h.estimate(&g, Point::new(1, 0), &chain, 1), 17.0);
        // from spawn before anything is reached
        assert_eq!(h.estimate(&g, Point::new(0, 0), &chain, 0), 18.0);
        assert_eq!(h.estimate(&g, Point::new(9, 9), &chain, 3), 0.0);
        assert_eq!(h.estimate(&g, Point::new(9, 9), &chain, 4), 0.0);
    }

    #[test]
    fn crow_skips_the_next_waypoint() {
        let (g, chain) = setup();
        let h = HeuristicKind::ChainedCrow;
        // next is (4,0); measure (1,0) -> (4,4) = 7, then (4,4) -> (9,9) = 10
        assert_eq!(h.estimate(&g, Point::new(1, 0), &chain, 1), 17.0);
        assert_eq!(h.estimate(&g, Point::new(5, 5), &chain, 3), 0.0);
        assert!(
            h.estimate(&g, Point::new(2, 6), &chain, 1)
                <= HeuristicKind::ChainedManhattan.estimate(&g, Point::new(2, 6), &chain, 1)
        );
    }

    #[test]
    fn folly_only_looks_at_next_waypoint() {
        let (g, chain) = setup();
        let h = HeuristicKind::Folly;
        assert_eq!(h.estimate(&g, Point::new(1, 0), &chain, 1), 3.0);
        assert_eq!(h.estimate(&g, Point::new(4, 0), &chain, 1), 0.0);
        // standing on the previous waypoint
        assert_eq!(h.estimate(&g, Point::new(4, 0), &chain, 2), 0.0);
        assert_eq!(h.estimate(&g, Point::new(4, 1), &chain, 2), 3.0);
        assert_eq!(h.estimate(&g, Point::new(4, 1), &chain, 4), 0.0);
    }

    #[test]
    fn parse_names() {
        assert_eq!("astar".parse(), Ok(HeuristicKind::ChainedManhattan));
        assert_eq!("Dijkstra".parse(), Ok(HeuristicKind::Zero));
        assert_eq!("crow".parse(), Ok(HeuristicKind::ChainedCrow));
        assert_eq!("folly".parse(), Ok(HeuristicKind::Folly));
        assert!("bfs".parse::<HeuristicKind>().is_err());
        assert_eq!(HeuristicKind::ChainedCrow.to_string(), "Dijkstra's Crow");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn kinds_use_snake_case() {
        let json = serde_json::to_string(&HeuristicKind::ChainedManhattan).unwrap();
        assert_eq!(json, "\"chained_manhattan\"");
        let back: HeuristicKind = serde_json::from_str("\"folly\"").unwrap();
        assert_eq!(back, HeuristicKind::Folly);
    }
}
