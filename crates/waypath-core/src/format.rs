//! Grid persistence.
//!
//! Provides [`GridEncoder`] and [`GridDecoder`] for storing a [`Grid`] as a
//! fixed-width binary record.
//!
//! ## Wire format
//!
//! All fields are little-endian:
//! ```text
//! [width: i32] [height: i32]
//! [spawn.x: i32] [spawn.y: i32]
//! [destination.x: i32] [destination.y: i32]
//! [waypoint_count: i32]
//! for each waypoint:
//!   [x: i32] [y: i32]
//! for x in 0..width:
//!   for y in 0..height:
//!     [cost: f32]
//! ```
//!
//! Every cell cost is stored explicitly, so a decoded grid carries an
//! override for every cell.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::GridError;
use crate::geom::Point;
use crate::grid::{Grid, Terrain};

/// Upper bound on cells accepted from a header.
const MAX_CELLS: usize = 1 << 28;

/// Cost table capacity reserved up front; the table grows as cells are read.
const PREALLOC_CELLS: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// GridEncoder
// ---------------------------------------------------------------------------

/// Encodes [`Grid`]s to a byte-oriented writer.
pub struct GridEncoder<W: Write> {
    writer: W,
}

impl<W: Write> GridEncoder<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_point(&mut self, p: Point) -> io::Result<()> {
        self.writer.write_all(&p.x.to_le_bytes())?;
        self.writer.write_all(&p.y.to_le_bytes())
    }

    /// Write a single grid.
    pub fn encode(&mut self, grid: &Grid) -> io::Result<()> {
        let size = grid.size();
        self.write_point(size)?;
        self.write_point(grid.spawn())?;
        self.write_point(grid.destination())?;

        let waypoints = grid.waypoints();
        let count = i32::try_from(waypoints.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many waypoints"))?;
        self.writer.write_all(&count.to_le_bytes())?;
        for w in waypoints {
            self.write_point(w)?;
        }

        for x in 0..size.x {
            for y in 0..size.y {
                let cost = grid.cost(Point::new(x, y));
                self.writer.write_all(&cost.to_le_bytes())?;
            }
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the encoder, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

// ---------------------------------------------------------------------------
// GridDecoder
// ---------------------------------------------------------------------------

/// Decodes [`Grid`]s from a byte-oriented reader.
pub struct GridDecoder<R: Read> {
    reader: R,
}

impl<R: Read> GridDecoder<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_word(&mut self, section: &'static str) -> Result<[u8; 4], GridError> {
        let mut buf = [0u8; 4];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(GridError::Truncated(section))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_i32(&mut self, section: &'static str) -> Result<i32, GridError> {
        self.read_word(section).map(i32::from_le_bytes)
    }

    fn read_point(&mut self, section: &'static str) -> Result<Point, GridError> {
        let x = self.read_i32(section)?;
        let y = self.read_i32(section)?;
        Ok(Point::new(x, y))
    }

    /// Read one grid.
    pub fn decode(&mut self) -> Result<Grid, GridError> {
        let size = self.read_point("size")?;
        if size.x < 0 || size.y < 0 {
            return Err(GridError::InvalidHeader(format!(
                "negative dimensions {}x{}",
                size.x, size.y
            )));
        }
        let cells = (size.x as usize)
            .checked_mul(size.y as usize)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or_else(|| {
                GridError::InvalidHeader(format!("grid too large: {}x{}", size.x, size.y))
            })?;

        let spawn = self.read_point("spawn")?;
        let destination = self.read_point("destination")?;

        let count = self.read_i32("waypoint count")?;
        if count < 0 {
            return Err(GridError::InvalidHeader(format!(
                "negative waypoint count {count}"
            )));
        }
        let mut waypoints = Vec::with_capacity((count as usize).min(1024));
        for _ in 0..count {
            waypoints.push(self.read_point("waypoints")?);
        }

        let mut terrain = Terrain::new(size.x, size.y, spawn, destination);
        terrain.waypoints = waypoints;
        let mut costs = HashMap::with_capacity(cells.min(PREALLOC_CELLS));
        for x in 0..size.x {
            for y in 0..size.y {
                let cost = f32::from_le_bytes(self.read_word("cell costs")?);
                if let Some(key) = terrain.key(Point::new(x, y)) {
                    costs.insert(key, cost);
                }
            }
        }
        terrain.costs = costs;

        Ok(Grid::from_terrain(terrain))
    }

    /// Consume the decoder, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

impl Grid {
    /// Load a grid from a file in the binary grid format.
    pub fn load(path: impl AsRef<Path>) -> Result<Grid, GridError> {
        let file = File::open(path)?;
        GridDecoder::new(BufReader::new(file)).decode()
    }

    /// Save this grid to a file in the binary grid format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GridError> {
        let file = File::create(path)?;
        let mut enc = GridEncoder::new(BufWriter::new(file));
        enc.encode(self)?;
        enc.flush()?;
        Ok(())
    }
}
