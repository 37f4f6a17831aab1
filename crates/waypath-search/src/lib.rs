//! Incremental waypoint search over weighted grids.
//!
//! A [`PathFinder`] finds a cheap route from a grid's spawn through all of
//! its waypoints, in whichever order turns out cheapest, to its destination.
//! Every ordering of the waypoints is searched at once over a single shared
//! [`Frontier`], one expansion per [`PathFinder::step`], so callers can
//! animate or inspect the search as it goes.
//!
//! The heuristic decides which algorithm the search behaves like:
//!
//! | [`HeuristicKind`] | Behaves like |
//! |---|---|
//! | `Zero` | Dijkstra |
//! | `ChainedManhattan` | A* |
//! | `ChainedCrow` | A* with a weaker estimate |
//! | `Folly` | greedy toward the next waypoint |
//!
//! Any closure `Fn(&Grid, Point, &[Point], usize) -> f32` is a [`Heuristic`]
//! as well.

mod config;
mod distance;
mod frontier;
mod heuristic;
mod neighbors;
mod orderings;
mod pathfinder;
mod traits;

pub use config::{IMPASSABLE_COST, SearchConfig};
pub use distance::{chain_length, manhattan};
pub use frontier::{Frontier, FrontierEntry};
pub use heuristic::{HeuristicKind, UnknownHeuristic};
pub use neighbors::Neighbors;
pub use orderings::{factorial, orderings};
pub use pathfinder::{PathFinder, SearchStatus};
pub use traits::Heuristic;
