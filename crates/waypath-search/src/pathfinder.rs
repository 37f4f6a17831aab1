//! The incremental multi-ordering search engine.
//!
//! A [`PathFinder`] searches every ordering of the grid's waypoints at once.
//! Each ordering owns a [`Branch`] (cost table, predecessor table, committed
//! path prefix, progress index) while all of them share one [`Frontier`].
//! Every call to [`PathFinder::step`] pops exactly one frontier entry and
//! expands it, so a caller can observe the search between steps.

use std::collections::HashMap;

use waypath_core::{Grid, GridClaim, Point};

use crate::config::SearchConfig;
use crate::frontier::{Frontier, FrontierEntry};
use crate::heuristic::HeuristicKind;
use crate::neighbors::Neighbors;
use crate::orderings::orderings;
use crate::traits::Heuristic;

/// Outcome of a search so far.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    Completed,
    Failed,
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// Search state of one ordering.
#[derive(Debug, Default)]
struct Branch {
    /// Best known cost per cell, within the current segment.
    cost: HashMap<usize, f32>,
    /// Predecessor per cell, within the current segment.
    previous: HashMap<usize, Point>,
    /// Positions of completed segments, oldest first. The waypoint that
    /// starts the current segment is not included.
    committed: Vec<Point>,
    /// Number of chain entries reached.
    progress: usize,
}

/// Follow predecessors back from `from`; the result starts with `from` and
/// ends at the start of the segment.
fn walk_segment(grid: &Grid, previous: &HashMap<usize, Point>, from: Point) -> Vec<Point> {
    let mut path = vec![from];
    let mut cur = from;
    // Bounded by the table size so a zero-cost cycle can never hang the walk.
    while path.len() <= previous.len() {
        let Some(&prev) = grid.key(cur).and_then(|k| previous.get(&k)) else {
            break;
        };
        path.push(prev);
        cur = prev;
    }
    path
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug)]
struct Current {
    position: Point,
    cost: f32,
    heuristic: f32,
    ordering: usize,
}

/// Incremental A*-family search through every ordering of a grid's
/// waypoints.
///
/// The engine holds the grid's [`GridClaim`] for its whole lifetime, so the
/// grid cannot be mutated while a search is in progress. Dropping the engine
/// releases the claim.
///
/// Construction never fails: without a grid, or when the grid is already
/// claimed, the engine is *inert*. An inert engine never steps and reports
/// [`failed`](Self::failed).
pub struct PathFinder<H = HeuristicKind> {
    claim: Option<GridClaim>,
    heuristic: H,
    config: SearchConfig,
    chains: Vec<Vec<Point>>,
    branches: Vec<Branch>,
    frontier: Frontier,
    checked: HashMap<usize, u32>,
    current: Current,
    steps: u64,
    neighbors: Neighbors,
}

impl<H: Heuristic> PathFinder<H> {
    /// Create an engine for `grid` with the default [`SearchConfig`].
    pub fn new<'a>(grid: impl Into<Option<&'a Grid>>, heuristic: H) -> Self {
        Self::with_config(grid, heuristic, SearchConfig::default())
    }

    /// Create an engine for `grid`, claiming it for the engine's lifetime.
    pub fn with_config<'a>(
        grid: impl Into<Option<&'a Grid>>,
        heuristic: H,
        config: SearchConfig,
    ) -> Self {
        let mut pf = Self {
            claim: None,
            heuristic,
            config,
            chains: Vec::new(),
            branches: Vec::new(),
            frontier: Frontier::new(),
            checked: HashMap::new(),
            current: Current {
                position: Point::ZERO,
                cost: 0.0,
                heuristic: 0.0,
                ordering: 0,
            },
            steps: 0,
            neighbors: Neighbors::new(),
        };

        let Some(grid) = grid.into() else {
            log::error!("pathfinder was given no grid; search is inert");
            return pf;
        };
        match grid.acquire_exclusive() {
            Ok(claim) => pf.claim = Some(claim),
            Err(e) => {
                log::error!("pathfinder could not claim the grid ({e}); search is inert");
                return pf;
            }
        }
        pf.setup(grid);
        pf
    }

    fn setup(&mut self, grid: &Grid) {
        let spawn = grid.spawn();
        let waypoints = grid.waypoints();
        if waypoints.len() > 8 {
            log::warn!(
                "{} waypoints give {} orderings; setup may be slow",
                waypoints.len(),
                crate::orderings::factorial(waypoints.len())
            );
        }
        self.chains = orderings(spawn, &waypoints, grid.destination());
        log::debug!(
            "searching {} ordering(s) of {} waypoint(s)",
            self.chains.len(),
            waypoints.len()
        );

        self.current.position = spawn;
        self.current.heuristic = self.heuristic.estimate(grid, spawn, &self.chains[0], 0);

        let spawn_key = grid.key(spawn);
        if spawn_key.is_none() {
            log::warn!("spawn {spawn} is outside the grid; nothing to search");
        }
        for (ordering, chain) in self.chains.iter().enumerate() {
            let mut branch = Branch::default();
            if let Some(key) = spawn_key {
                branch.cost.insert(key, 0.0);
                self.frontier.push(FrontierEntry {
                    estimate: self.heuristic.estimate(grid, spawn, chain, 0),
                    ordering,
                    position: spawn,
                });
            }
            self.branches.push(branch);
        }
    }

    /// Perform one frontier expansion.
    ///
    /// Does nothing once the search has [`completed`](Self::completed) or
    /// [`failed`](Self::failed).
    pub fn step(&mut self) {
        if self.completed() || self.failed() {
            return;
        }
        let Some(grid) = self.claim.as_ref().map(|c| c.grid().clone()) else {
            return;
        };
        let Some(FrontierEntry {
            ordering, position, ..
        }) = self.frontier.pop()
        else {
            return;
        };

        let branch = &mut self.branches[ordering];
        let chain = &self.chains[ordering];
        let Some(key) = grid.key(position) else {
            return;
        };
        let Some(&cost) = branch.cost.get(&key) else {
            log::debug!("skipping stale frontier entry {position} of ordering {ordering}");
            return;
        };
        *self.checked.entry(key).or_insert(0) += 1;
        self.steps += 1;

        // Capture the next waypoint. Repeats only for consecutive duplicates
        // in the chain.
        while chain.get(branch.progress) == Some(&position) {
            let segment = walk_segment(&grid, &branch.previous, position);
            branch.committed.extend(segment[1..].iter().rev());

            self.frontier.purge(ordering);
            branch.cost.clear();
            branch.previous.clear();
            branch.cost.insert(key, cost);
            branch.progress += 1;
            log::debug!(
                "ordering {ordering} reached {position} ({}/{}) at cost {cost}",
                branch.progress,
                chain.len()
            );
        }

        self.current = Current {
            position,
            cost,
            heuristic: self.heuristic.estimate(&grid, position, chain, branch.progress),
            ordering,
        };

        if branch.progress == chain.len() {
            log::debug!(
                "ordering {ordering} completed after {} steps with cost {cost}",
                self.steps
            );
        } else {
            let threshold = self.config.impassable_threshold;
            let next = self
                .neighbors
                .cardinal(position, |n| grid.is_passable(n, threshold));
            for &n in next {
                let Some(nk) = grid.key(n) else {
                    continue;
                };
                let tentative = cost + grid.cost(n);
                if branch.cost.get(&nk).is_none_or(|&known| tentative < known) {
                    branch.cost.insert(nk, tentative);
                    branch.previous.insert(nk, position);
                    let h = self.heuristic.estimate(&grid, n, chain, branch.progress);
                    self.frontier.push(FrontierEntry {
                        estimate: tentative + h,
                        ordering,
                        position: n,
                    });
                }
            }
        }

        if cfg!(debug_assertions) && !self.progress_consistent() {
            log::error!(
                "ordering {ordering}: path does not visit its chain up to progress {}",
                self.current_progress()
            );
        }
    }

    /// Step until the search completes, fails, or `max_steps` expansions have
    /// been performed by this call.
    pub fn run(&mut self, max_steps: usize) -> SearchStatus {
        for _ in 0..max_steps {
            if self.status() != SearchStatus::Running {
                break;
            }
            self.step();
        }
        self.status()
    }

    /// Step until the search completes or fails.
    pub fn run_to_end(&mut self) -> SearchStatus {
        while self.status() == SearchStatus::Running {
            self.step();
        }
        self.status()
    }
}

impl<H> PathFinder<H> {
    /// The claimed grid, or `None` for an inert engine.
    #[inline]
    pub fn grid(&self) -> Option<&Grid> {
        self.claim.as_ref().map(GridClaim::grid)
    }

    #[inline]
    pub fn is_inert(&self) -> bool {
        self.claim.is_none()
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Whether the ordering reported as current has reached every entry of
    /// its chain, destination included.
    pub fn completed(&self) -> bool {
        match (
            self.branches.get(self.current.ordering),
            self.chains.get(self.current.ordering),
        ) {
            (Some(branch), Some(chain)) => branch.progress == chain.len(),
            _ => false,
        }
    }

    /// Whether the frontier ran dry before any ordering completed.
    pub fn failed(&self) -> bool {
        self.frontier.is_empty() && !self.completed()
    }

    pub fn status(&self) -> SearchStatus {
        if self.completed() {
            SearchStatus::Completed
        } else if self.failed() {
            SearchStatus::Failed
        } else {
            SearchStatus::Running
        }
    }

    /// The current ordering's path, most recent position first: the walk from
    /// the current position back to the start of its segment, followed by the
    /// committed prefix of earlier segments.
    pub fn current_path(&self) -> Vec<Point> {
        let (Some(grid), Some(branch)) = (self.grid(), self.branches.get(self.current.ordering))
        else {
            return Vec::new();
        };
        let mut path = walk_segment(grid, &branch.previous, self.current.position);
        path.extend(branch.committed.iter().rev());
        path
    }

    /// Chain `[spawn, waypoints…, destination]` of the current ordering.
    pub fn current_waypoint_chain(&self) -> &[Point] {
        self.chains
            .get(self.current.ordering)
            .map_or(&[], Vec::as_slice)
    }

    /// Number of chain entries the current ordering has reached.
    pub fn current_progress(&self) -> usize {
        self.branches
            .get(self.current.ordering)
            .map_or(0, |b| b.progress)
    }

    #[inline]
    pub fn current_ordering(&self) -> usize {
        self.current.ordering
    }

    #[inline]
    pub fn current_position(&self) -> Point {
        self.current.position
    }

    /// Committed cost of the current position.
    #[inline]
    pub fn current_cost(&self) -> f32 {
        self.current.cost
    }

    /// Heuristic estimate at the current position.
    #[inline]
    pub fn current_heuristic(&self) -> f32 {
        self.current.heuristic
    }

    /// How many times `p` has been popped from the frontier, over all
    /// orderings.
    pub fn checked(&self, p: Point) -> u32 {
        self.grid()
            .and_then(|g| g.key(p))
            .and_then(|k| self.checked.get(&k).copied())
            .unwrap_or(0)
    }

    /// Number of orderings being searched.
    #[inline]
    pub fn ordering_count(&self) -> usize {
        self.chains.len()
    }

    /// Chains of every ordering, in ordering-index order.
    #[inline]
    pub fn orderings(&self) -> &[Vec<Point>] {
        &self.chains
    }

    /// Number of pending frontier entries across all orderings.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Number of expansions performed so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether the current path visits the current chain in order, up to
    /// exactly [`current_progress`](Self::current_progress) entries.
    pub fn progress_consistent(&self) -> bool {
        if self.steps == 0 {
            return true;
        }
        let chain = self.current_waypoint_chain();
        let mut reached = 0;
        for p in self.current_path().iter().rev() {
            while chain.get(reached) == Some(p) {
                reached += 1;
            }
        }
        reached == self.current_progress()
    }
}
