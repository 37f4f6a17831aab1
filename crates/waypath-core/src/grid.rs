//! The terrain [`Grid`] searched by the pathfinder, and its exclusivity
//! [`GridClaim`].
//!
//! A `Grid` is a *handle* onto shared terrain. Cloning a `Grid` yields another
//! handle to the **same** storage, so a renderer can keep reading a grid while
//! a search engine holds its claim. Mutation goes through setters that refuse
//! to touch the terrain while a claim exists.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::GridError;
use crate::geom::{Point, Range};

/// Traversal cost of cells without an explicit override.
pub const DEFAULT_COST: f32 = 1.0;

// ---------------------------------------------------------------------------
// Internal shared terrain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct Terrain {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) spawn: Point,
    pub(crate) destination: Point,
    pub(crate) waypoints: Vec<Point>,
    pub(crate) default_cost: f32,
    /// Sparse per-cell overrides keyed by [`Grid::key`].
    pub(crate) costs: HashMap<usize, f32>,
    pub(crate) claimed: bool,
}

impl Terrain {
    pub(crate) fn new(width: i32, height: i32, spawn: Point, destination: Point) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            spawn,
            destination,
            waypoints: Vec::new(),
            default_cost: DEFAULT_COST,
            costs: HashMap::new(),
            claimed: false,
        }
    }

    #[inline]
    fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    pub(crate) fn key(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.x as usize * self.height as usize + p.y as usize)
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A weighted 2D terrain with a spawn, a destination and an ordered list of
/// intermediate waypoints.
///
/// Cloning produces another handle to the same terrain.
#[derive(Debug, Clone)]
pub struct Grid {
    terrain: Rc<RefCell<Terrain>>,
}

impl Grid {
    /// Create a grid of the given dimensions where every cell costs
    /// [`DEFAULT_COST`] and there are no waypoints.
    pub fn new(width: i32, height: i32, spawn: Point, destination: Point) -> Self {
        Self::from_terrain(Terrain::new(width, height, spawn, destination))
    }

    pub(crate) fn from_terrain(terrain: Terrain) -> Self {
        Self {
            terrain: Rc::new(RefCell::new(terrain)),
        }
    }

    /// Whether two handles refer to the same terrain.
    #[inline]
    pub fn ptr_eq(&self, other: &Grid) -> bool {
        Rc::ptr_eq(&self.terrain, &other.terrain)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Size as a `Point` (x = width, y = height).
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds().size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.terrain.borrow().width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.terrain.borrow().height
    }

    /// The rectangle `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        let t = self.terrain.borrow();
        Range::new(0, 0, t.width, t.height)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.terrain.borrow().contains(p)
    }

    #[inline]
    pub fn spawn(&self) -> Point {
        self.terrain.borrow().spawn
    }

    #[inline]
    pub fn destination(&self) -> Point {
        self.terrain.borrow().destination
    }

    /// Intermediate waypoints in insertion order.
    pub fn waypoints(&self) -> Vec<Point> {
        self.terrain.borrow().waypoints.clone()
    }

    #[inline]
    pub fn default_cost(&self) -> f32 {
        self.terrain.borrow().default_cost
    }

    /// Traversal cost of `p`: its override if one is set, else the default
    /// cost.
    pub fn cost(&self, p: Point) -> f32 {
        let t = self.terrain.borrow();
        t.key(p)
            .and_then(|k| t.costs.get(&k).copied())
            .unwrap_or(t.default_cost)
    }

    /// Whether `p` is inside the grid and cheaper than `threshold`.
    pub fn is_passable(&self, p: Point, threshold: f32) -> bool {
        self.contains(p) && self.cost(p) < threshold
    }

    // -----------------------------------------------------------------------
    // Key packing
    // -----------------------------------------------------------------------

    /// Pack an in-bounds position into a scalar key (`x * height + y`).
    ///
    /// Returns `None` outside the grid. Keys are only meaningful for this
    /// grid's dimensions.
    #[inline]
    pub fn key(&self, p: Point) -> Option<usize> {
        self.terrain.borrow().key(p)
    }

    /// Inverse of [`key`](Grid::key).
    #[inline]
    pub fn unpack(&self, key: usize) -> Point {
        let h = (self.height().max(1)) as usize;
        Point::new((key / h) as i32, (key % h) as i32)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    fn mutate(&self, what: &str, f: impl FnOnce(&mut Terrain)) -> Result<(), GridError> {
        let mut t = self.terrain.borrow_mut();
        if t.claimed {
            log::warn!("grid is claimed by a search, can not {what}");
            return Err(GridError::Claimed);
        }
        f(&mut t);
        Ok(())
    }

    pub fn set_spawn(&self, spawn: Point) -> Result<(), GridError> {
        self.mutate("set spawn", |t| t.spawn = spawn)
    }

    pub fn set_destination(&self, destination: Point) -> Result<(), GridError> {
        self.mutate("set destination", |t| t.destination = destination)
    }

    /// Append a waypoint. Duplicates are kept.
    pub fn add_waypoint(&self, waypoint: Point) -> Result<(), GridError> {
        self.mutate("add waypoint", |t| t.waypoints.push(waypoint))
    }

    /// Remove every occurrence of `waypoint`.
    pub fn remove_waypoint(&self, waypoint: Point) -> Result<(), GridError> {
        self.mutate("remove waypoint", |t| t.waypoints.retain(|&w| w != waypoint))
    }

    /// Set the cost of every cell that has no explicit override.
    pub fn set_default_cost(&self, cost: f32) -> Result<(), GridError> {
        self.mutate("set default cost", |t| t.default_cost = cost)
    }

    /// Override the cost of a single cell.
    pub fn set_cost(&self, p: Point, cost: f32) -> Result<(), GridError> {
        let Some(key) = self.key(p) else {
            return Err(GridError::OutOfBounds(p));
        };
        self.mutate("set cost", |t| {
            t.costs.insert(key, cost);
        })
    }

    // -----------------------------------------------------------------------
    // Exclusivity
    // -----------------------------------------------------------------------

    /// Whether a [`GridClaim`] currently exists for this grid.
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.terrain.borrow().claimed
    }

    /// Take the grid's single exclusivity slot.
    ///
    /// While the returned claim lives, every setter is rejected with
    /// [`GridError::Claimed`]. Dropping the claim releases the slot.
    pub fn acquire_exclusive(&self) -> Result<GridClaim, GridError> {
        let mut t = self.terrain.borrow_mut();
        if t.claimed {
            return Err(GridError::Claimed);
        }
        t.claimed = true;
        Ok(GridClaim { grid: self.clone() })
    }
}

// ---------------------------------------------------------------------------
// GridClaim
// ---------------------------------------------------------------------------

/// Proof of exclusive use of a [`Grid`]. Its existence *is* the claim.
#[derive(Debug)]
#[must_use = "the claim is released as soon as it is dropped"]
pub struct GridClaim {
    grid: Grid,
}

impl GridClaim {
    /// The claimed grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Release the claim explicitly. Equivalent to dropping it.
    pub fn release(self) {}
}

impl Drop for GridClaim {
    fn drop(&mut self) {
        self.grid.terrain.borrow_mut().claimed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(4, 3, Point::new(0, 0), Point::new(3, 2))
    }

    #[test]
    fn new_grid_uses_default_cost() {
        let g = grid();
        assert_eq!(g.size(), Point::new(4, 3));
        assert_eq!(g.cost(Point::new(2, 1)), DEFAULT_COST);
        assert!(g.waypoints().is_empty());
    }

    #[test]
    fn cost_override_and_default() {
        let g = grid();
        g.set_cost(Point::new(1, 1), 10.0).unwrap();
        g.set_default_cost(2.0).unwrap();
        assert_eq!(g.cost(Point::new(1, 1)), 10.0);
        assert_eq!(g.cost(Point::new(0, 1)), 2.0);
        assert!(g.is_passable(Point::new(1, 1), 1000.0));
        assert!(!g.is_passable(Point::new(1, 1), 5.0));
        assert!(!g.is_passable(Point::new(4, 0), 1000.0));
    }

    #[test]
    fn set_cost_outside_is_rejected() {
        let g = grid();
        assert!(matches!(
            g.set_cost(Point::new(4, 0), 3.0),
            Err(GridError::OutOfBounds(_))
        ));
    }

    #[test]
    fn key_is_injective_and_reversible() {
        let g = grid();
        let mut seen = std::collections::HashSet::new();
        for p in g.bounds() {
            let k = g.key(p).unwrap();
            assert!(seen.insert(k));
            assert_eq!(g.unpack(k), p);
        }
        assert_eq!(g.key(Point::new(-1, 0)), None);
        assert_eq!(g.key(Point::new(0, 3)), None);
    }

    #[test]
    fn remove_waypoint_removes_all_occurrences() {
        let g = grid();
        g.add_waypoint(Point::new(1, 1)).unwrap();
        g.add_waypoint(Point::new(2, 2)).unwrap();
        g.add_waypoint(Point::new(1, 1)).unwrap();
        g.remove_waypoint(Point::new(1, 1)).unwrap();
        assert_eq!(g.waypoints(), vec![Point::new(2, 2)]);
    }

    #[test]
    fn claim_is_exclusive() {
        let g = grid();
        let claim = g.acquire_exclusive().unwrap();
        assert!(g.is_claimed());
        assert!(claim.grid().ptr_eq(&g));
        assert!(matches!(g.acquire_exclusive(), Err(GridError::Claimed)));
        drop(claim);
        assert!(!g.is_claimed());
        assert!(g.acquire_exclusive().is_ok());
    }

    #[test]
    fn setters_rejected_while_claimed() {
        let g = grid();
        let view = g.clone();
        let claim = g.acquire_exclusive().unwrap();

        assert!(matches!(view.set_spawn(Point::new(1, 1)), Err(GridError::Claimed)));
        assert!(view.set_destination(Point::new(1, 1)).is_err());
        assert!(view.add_waypoint(Point::new(1, 1)).is_err());
        assert!(view.remove_waypoint(Point::new(1, 1)).is_err());
        assert!(view.set_default_cost(5.0).is_err());
        assert!(view.set_cost(Point::new(1, 1), 5.0).is_err());

        assert_eq!(view.spawn(), Point::new(0, 0));
        assert_eq!(view.destination(), Point::new(3, 2));
        assert!(view.waypoints().is_empty());
        assert_eq!(view.cost(Point::new(1, 1)), DEFAULT_COST);

        claim.release();
        view.set_spawn(Point::new(1, 1)).unwrap();
        assert_eq!(g.spawn(), Point::new(1, 1));
    }
}
