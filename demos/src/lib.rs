//! Terminal front end shared by the `waypath` binary.
//!
//! Demonstrates: seeded terrain generation, heuristic selection, paced
//! stepping of a [`PathFinder`], and ASCII rendering of the search state.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use waypath_core::{Grid, GridError, Point};
use waypath_search::{IMPASSABLE_COST, PathFinder, SearchStatus};

pub const DEFAULT_WIDTH: i32 = 40;
pub const DEFAULT_HEIGHT: i32 = 20;

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Terrain legend. Each kind maps to one traversal cost.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Terrain {
    Path,
    Black,
    Bridge,
    Grass,
    River,
    Tree,
    Rock,
    Wall,
    Flame,
    Sword,
}

impl Terrain {
    pub const ALL: [Terrain; 10] = [
        Terrain::Path,
        Terrain::Black,
        Terrain::Bridge,
        Terrain::Grass,
        Terrain::River,
        Terrain::Tree,
        Terrain::Rock,
        Terrain::Wall,
        Terrain::Flame,
        Terrain::Sword,
    ];

    pub fn cost(self) -> f32 {
        match self {
            Terrain::Path => 1.0,
            Terrain::Black => 1.0078125,
            Terrain::Bridge => 1.5,
            Terrain::Grass => 2.0,
            Terrain::River => 10.0,
            Terrain::Tree => 1001.0,
            Terrain::Rock => 1200.0,
            Terrain::Wall => 1221.0,
            Terrain::Flame => 1532.0,
            Terrain::Sword => 2556.0,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Terrain::Path => ' ',
            Terrain::Black => ',',
            Terrain::Bridge => '=',
            Terrain::Grass => '"',
            Terrain::River => '~',
            Terrain::Tree => 'T',
            Terrain::Rock => '^',
            Terrain::Wall => '#',
            Terrain::Flame => '&',
            Terrain::Sword => '!',
        }
    }

    /// The terrain whose cost is exactly `cost`.
    pub fn from_cost(cost: f32) -> Option<Terrain> {
        Terrain::ALL.into_iter().find(|t| t.cost() == cost)
    }

    pub fn is_passable(self) -> bool {
        self.cost() < IMPASSABLE_COST
    }
}

/// Glyph drawn for a cell of the given cost; `?` when no terrain matches.
pub fn cost_glyph(cost: f32) -> char {
    Terrain::from_cost(cost).map_or('?', Terrain::glyph)
}

// ---------------------------------------------------------------------------
// Map generation
// ---------------------------------------------------------------------------

/// Relative weights of the terrain kinds placed by [`generate`].
const TERRAIN_WEIGHTS: [(Terrain, u32); 7] = [
    (Terrain::Path, 50),
    (Terrain::Grass, 18),
    (Terrain::Black, 6),
    (Terrain::Bridge, 4),
    (Terrain::River, 8),
    (Terrain::Tree, 8),
    (Terrain::Rock, 6),
];

fn random_terrain(rng: &mut impl Rng) -> Terrain {
    let total: u32 = TERRAIN_WEIGHTS.iter().map(|&(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (terrain, weight) in TERRAIN_WEIGHTS {
        if roll < weight {
            return terrain;
        }
        roll -= weight;
    }
    Terrain::Path
}

/// Generate a random map with spawn in the top-left corner, destination in
/// the bottom-right corner and `waypoints` distinct passable waypoints.
///
/// The same seed always yields the same grid. Fewer waypoints are placed when
/// the map has no room for them.
pub fn generate(width: i32, height: i32, waypoints: usize, seed: u64) -> Result<Grid, GridError> {
    let (width, height) = (width.max(1), height.max(1));
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let spawn = Point::ZERO;
    let destination = Point::new(width - 1, height - 1);
    let grid = Grid::new(width, height, spawn, destination);

    for p in grid.bounds() {
        let terrain = random_terrain(&mut rng);
        if terrain != Terrain::Path {
            grid.set_cost(p, terrain.cost())?;
        }
    }
    grid.set_cost(spawn, Terrain::Path.cost())?;
    grid.set_cost(destination, Terrain::Path.cost())?;

    let mut placed: Vec<Point> = Vec::with_capacity(waypoints);
    let attempts = grid.bounds().len() * 4;
    for _ in 0..attempts {
        if placed.len() == waypoints {
            break;
        }
        let p = Point::new(rng.random_range(0..width), rng.random_range(0..height));
        let taken = p == spawn || p == destination || placed.contains(&p);
        if taken || grid.cost(p) >= IMPASSABLE_COST {
            continue;
        }
        grid.add_waypoint(p)?;
        placed.push(p);
    }
    if placed.len() < waypoints {
        log::warn!(
            "only placed {} of {waypoints} waypoints on a {width}x{height} map",
            placed.len()
        );
    }
    log::info!("generated {width}x{height} map with seed {seed}");
    Ok(grid)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw the grid of `pf` with the current path, markers and visited cells.
///
/// Markers: `S` spawn, `D` destination, `1`..`9` waypoints in insertion
/// order (`W` past the ninth), `*` current path, `.` cells popped at least
/// once. Everything else shows its terrain glyph.
pub fn render<H>(pf: &PathFinder<H>) -> String {
    let Some(grid) = pf.grid() else {
        return String::new();
    };
    let path = pf.current_path();
    let waypoints = grid.waypoints();

    let mut out = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = Point::new(x, y);
            let c = if p == grid.spawn() {
                'S'
            } else if p == grid.destination() {
                'D'
            } else if let Some(i) = waypoints.iter().position(|&w| w == p) {
                char::from_digit(i as u32 + 1, 10).unwrap_or('W')
            } else if path.contains(&p) {
                '*'
            } else if pf.checked(p) > 0 {
                '.'
            } else {
                cost_glyph(grid.cost(p))
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// One status line: heuristic, outcome, cost, progress and step count.
pub fn summary<H: fmt::Display>(pf: &PathFinder<H>) -> String {
    let outcome = match pf.status() {
        SearchStatus::Running => "running",
        SearchStatus::Completed => "completed",
        SearchStatus::Failed => "failed",
    };
    format!(
        "{}: {outcome}, cost {}, {}/{} reached, ordering {} of {}, {} steps",
        pf.heuristic(),
        pf.current_cost(),
        pf.current_progress(),
        pf.current_waypoint_chain().len(),
        pf.current_ordering() + 1,
        pf.ordering_count(),
        pf.steps()
    )
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Pacing presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Speed {
    Slow,
    #[default]
    Fast,
    Faster,
    Fastest,
    Ludicrous,
}

impl Speed {
    pub const ALL: [Speed; 5] = [
        Speed::Slow,
        Speed::Fast,
        Speed::Faster,
        Speed::Fastest,
        Speed::Ludicrous,
    ];

    /// Steps per tick; `None` runs the search to the end in one tick.
    pub fn steps_per_tick(self) -> Option<usize> {
        match self {
            Speed::Slow => Some(1),
            Speed::Fast => Some(2),
            Speed::Faster => Some(4),
            Speed::Fastest => Some(16),
            Speed::Ludicrous => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Fast => "fast",
            Speed::Faster => "faster",
            Speed::Fastest => "fastest",
            Speed::Ludicrous => "ludicrous",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Speed::ALL
            .into_iter()
            .find(|speed| speed.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown speed `{s}`"))
    }
}

/// Paces a [`PathFinder`] at a fixed number of steps per tick.
pub struct Driver<H> {
    pf: PathFinder<H>,
    speed: Speed,
    ticks: u64,
}

impl<H: waypath_search::Heuristic> Driver<H> {
    pub fn new(pf: PathFinder<H>, speed: Speed) -> Self {
        Self {
            pf,
            speed,
            ticks: 0,
        }
    }

    /// Advance the search by one tick's worth of steps.
    pub fn tick(&mut self) -> SearchStatus {
        self.ticks += 1;
        match self.speed.steps_per_tick() {
            Some(n) => self.pf.run(n),
            None => self.pf.run_to_end(),
        }
    }

    /// Tick until the search ends, calling `on_tick` after every tick.
    pub fn finish(&mut self, mut on_tick: impl FnMut(&PathFinder<H>)) -> SearchStatus {
        loop {
            let status = self.tick();
            on_tick(&self.pf);
            if status != SearchStatus::Running {
                return status;
            }
        }
    }

    pub fn pathfinder(&self) -> &PathFinder<H> {
        &self.pf
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn into_inner(self) -> PathFinder<H> {
        self.pf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypath_core::GridEncoder;
    use waypath_search::HeuristicKind;

    fn encoded(grid: &Grid) -> Vec<u8> {
        let mut enc = GridEncoder::new(Vec::new());
        enc.encode(grid).unwrap();
        enc.into_inner()
    }

    #[test]
    fn terrain_costs_round_trip() {
        for t in Terrain::ALL {
            assert_eq!(Terrain::from_cost(t.cost()), Some(t));
        }
        assert_eq!(cost_glyph(3.25), '?');
        assert!(Terrain::River.is_passable());
        assert!(!Terrain::Tree.is_passable());
    }

    #[test]
    fn generate_is_seeded() {
        let a = generate(12, 8, 3, 7).unwrap();
        let b = generate(12, 8, 3, 7).unwrap();
        assert_eq!(encoded(&a), encoded(&b));
        let c = generate(12, 8, 3, 8).unwrap();
        assert_ne!(encoded(&a), encoded(&c));
    }

    #[test]
    fn generated_markers_are_passable() {
        let grid = generate(16, 10, 4, 99).unwrap();
        assert_eq!(grid.spawn(), Point::new(0, 0));
        assert_eq!(grid.destination(), Point::new(15, 9));
        assert_eq!(grid.cost(grid.spawn()), 1.0);
        assert_eq!(grid.cost(grid.destination()), 1.0);

        let wps = grid.waypoints();
        assert_eq!(wps.len(), 4);
        for (i, w) in wps.iter().enumerate() {
            assert!(grid.contains(*w));
            assert!(grid.cost(*w) < IMPASSABLE_COST);
            assert!(!wps[i + 1..].contains(w));
            assert_ne!(*w, grid.spawn());
            assert_ne!(*w, grid.destination());
        }
        for p in grid.bounds() {
            assert_ne!(cost_glyph(grid.cost(p)), '?');
        }
    }

    #[test]
    fn generate_caps_waypoints_to_free_cells() {
        let grid = generate(2, 2, 5, 1).unwrap();
        assert!(grid.waypoints().len() <= 2);
    }

    #[test]
    fn render_marks_path_and_waypoints() {
        let grid = Grid::new(5, 3, Point::new(0, 0), Point::new(4, 0));
        grid.add_waypoint(Point::new(2, 2)).unwrap();
        grid.set_cost(Point::new(0, 2), Terrain::Wall.cost()).unwrap();

        let mut pf = PathFinder::new(&grid, HeuristicKind::ChainedManhattan);
        let before = render(&pf);
        assert_eq!(before, "S   D\n     \n# 1  \n");

        assert_eq!(pf.run_to_end(), SearchStatus::Completed);
        let after = render(&pf);
        let lines: Vec<&str> = after.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == 5));
        assert!(after.contains('*'));
        assert!(after.starts_with('S'));
        assert_eq!(lines[2].chars().nth(2), Some('1'));
        assert_eq!(lines[2].chars().next(), Some('#'));
    }

    #[test]
    fn render_inert_is_empty() {
        let pf = PathFinder::new(None::<&Grid>, HeuristicKind::Zero);
        assert_eq!(render(&pf), "");
    }

    #[test]
    fn summary_names_heuristic() {
        let grid = Grid::new(3, 1, Point::new(0, 0), Point::new(2, 0));
        let mut pf = PathFinder::new(&grid, HeuristicKind::Zero);
        pf.run_to_end();
        let line = summary(&pf);
        assert!(line.starts_with("Dijkstra: completed, cost 2"), "{line}");
    }

    #[test]
    fn speed_presets() {
        assert_eq!("Slow".parse(), Ok(Speed::Slow));
        assert_eq!("ludicrous".parse(), Ok(Speed::Ludicrous));
        assert!("warp".parse::<Speed>().is_err());
        let steps: Vec<_> = Speed::ALL.iter().map(|s| s.steps_per_tick()).collect();
        assert_eq!(steps, vec![Some(1), Some(2), Some(4), Some(16), None]);
    }

    #[test]
    fn driver_paces_steps() {
        let grid = Grid::new(10, 1, Point::new(0, 0), Point::new(9, 0));
        let pf = PathFinder::new(&grid, HeuristicKind::Zero);
        let mut driver = Driver::new(pf, Speed::Faster);
        assert_eq!(driver.tick(), SearchStatus::Running);
        assert_eq!(driver.pathfinder().steps(), 4);

        driver.set_speed(Speed::Slow);
        driver.tick();
        assert_eq!(driver.pathfinder().steps(), 5);

        let mut frames = 0;
        assert_eq!(driver.finish(|_| frames += 1), SearchStatus::Completed);
        assert_eq!(driver.pathfinder().steps(), 10);
        assert_eq!(frames, 5);
        assert_eq!(driver.ticks(), 7);
    }

    #[test]
    fn ludicrous_finishes_in_one_tick() {
        let grid = generate(12, 12, 2, 3).unwrap();
        let pf = PathFinder::new(&grid, HeuristicKind::ChainedManhattan);
        let mut driver = Driver::new(pf, Speed::Ludicrous);
        assert_ne!(driver.tick(), SearchStatus::Running);
        assert_eq!(driver.ticks(), 1);
    }
}
