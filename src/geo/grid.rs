//! Region spec and the bounding-box grid generated from it.

use crate::error::LocatorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of a step tolerated as floating-point noise at the range boundary.
const STEP_TOLERANCE: f64 = 1e-9;

/// Upper bound on the tiles one region may expand to.
pub const MAX_TILES: usize = 1_000_000;

/// Direction in which an axis is walked from start toward end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Increasing,
    Decreasing,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Increasing => 1.0,
            Direction::Decreasing => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increasing => write!(f, "increasing"),
            Direction::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Closed interval on one axis, written as `[start, end]` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
}

impl AxisRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Number of tile centers on this axis: `floor(|end - start| / step) + 1`.
    ///
    /// `None` when the count does not fit in a `usize`.
    pub fn steps(&self, step: f64) -> Option<usize> {
        let span = ((self.end - self.start).abs() / step + STEP_TOLERANCE).floor();
        if !span.is_finite() || span >= usize::MAX as f64 {
            return None;
        }
        (span as usize).checked_add(1)
    }

    fn center(&self, index: usize, step: f64, direction: Direction) -> f64 {
        self.start + direction.sign() * index as f64 * step
    }

    fn walkable(&self, direction: Direction) -> bool {
        match direction {
            Direction::Increasing => self.start <= self.end,
            Direction::Decreasing => self.start >= self.end,
        }
    }
}

impl From<(f64, f64)> for AxisRange {
    fn from((start, end): (f64, f64)) -> Self {
        Self { start, end }
    }
}

impl From<AxisRange> for (f64, f64) {
    fn from(range: AxisRange) -> Self {
        (range.start, range.end)
    }
}

/// One latitude stripe paired with the longitude span to sweep across it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileRange {
    pub lat: AxisRange,
    pub lng: AxisRange,
}

impl TileRange {
    pub fn new(lat: (f64, f64), lng: (f64, f64)) -> Self {
        Self { lat: lat.into(), lng: lng.into() }
    }

    /// Tile centers on each axis, or `None` if either overflows.
    fn steps(&self, step: f64) -> Option<(usize, usize)> {
        Some((self.lat.steps(step)?, self.lng.steps(step)?))
    }
}

/// Query rectangle sent to the map search endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub center_lat: f64,
    pub center_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
    pub sw_lat: f64,
    pub sw_lng: f64,
}

impl BoundingBox {
    /// Builds the box centered on `(lat, lng)` extending `half_width` on every side.
    pub fn around(lat: f64, lng: f64, half_width: f64) -> Self {
        Self {
            center_lat: lat,
            center_lng: lng,
            ne_lat: lat + half_width,
            ne_lng: lng + half_width,
            sw_lat: lat - half_width,
            sw_lng: lng - half_width,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.center_lat, self.center_lng)
    }
}

/// Ordered list of tile ranges plus the walking rules shared by all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    /// Half the side of a tile, also the distance between tile centers.
    pub half_width: f64,

    #[serde(default = "default_lat_direction")]
    pub lat_direction: Direction,

    #[serde(default)]
    pub lng_direction: Direction,

    pub ranges: Vec<TileRange>,
}

fn default_lat_direction() -> Direction {
    Direction::Decreasing
}

impl Default for RegionSpec {
    /// Iberian peninsula, the Canaries, Madeira and the Azores.
    fn default() -> Self {
        Self {
            half_width: 1.5,
            lat_direction: Direction::Decreasing,
            lng_direction: Direction::Increasing,
            ranges: vec![
                TileRange::new((47.0, 30.0), (-13.0, 8.0)),
                TileRange::new((30.0, 27.0), (-20.0, -12.0)),
                TileRange::new((32.75, 32.75), (-17.0, -17.0)),
                TileRange::new((38.5, 38.5), (-28.5, -28.5)),
            ],
        }
    }
}

impl RegionSpec {
    /// Checks the half-width, that every range can be walked in its axis direction
    /// and that the region expands to at most [`MAX_TILES`] tiles.
    pub fn validate(&self) -> Result<(), LocatorError> {
        if !self.half_width.is_finite() || self.half_width <= 0.0 {
            return Err(LocatorError::InvalidRegion(format!(
                "half_width must be a positive number, got {}",
                self.half_width
            )));
        }

        for (i, range) in self.ranges.iter().enumerate() {
            for (axis, span, direction) in [
                ("lat", range.lat, self.lat_direction),
                ("lng", range.lng, self.lng_direction),
            ] {
                if !span.start.is_finite() || !span.end.is_finite() {
                    return Err(LocatorError::InvalidRegion(format!(
                        "range {} {} bounds must be finite",
                        i, axis
                    )));
                }
                if !span.walkable(direction) {
                    return Err(LocatorError::InvalidRegion(format!(
                        "range {} {} ({}, {}) cannot be walked {}",
                        i, axis, span.start, span.end, direction
                    )));
                }
            }
        }

        match self.tile_count() {
            Some(count) if count <= MAX_TILES => Ok(()),
            Some(count) => Err(LocatorError::InvalidRegion(format!(
                "region expands to {} tiles, more than {}",
                count, MAX_TILES
            ))),
            None => Err(LocatorError::InvalidRegion(format!(
                "half_width {} is too small for the configured ranges",
                self.half_width
            ))),
        }
    }

    /// Lazily yields every tile. Calling again restarts from the first tile.
    pub fn tiles(&self) -> Tiles<'_> {
        Tiles { spec: self, range: 0, lat: 0, lng: 0 }
    }

    /// Total number of tiles `tiles()` will yield, `None` on overflow.
    pub fn tile_count(&self) -> Option<usize> {
        self.ranges.iter().try_fold(0usize, |total, range| {
            let (lat_steps, lng_steps) = range.steps(self.half_width)?;
            total.checked_add(lat_steps.checked_mul(lng_steps)?)
        })
    }
}

/// Iterator over the tiles of a [`RegionSpec`], latitude-major within each range.
pub struct Tiles<'a> {
    spec: &'a RegionSpec,
    range: usize,
    lat: usize,
    lng: usize,
}

impl Iterator for Tiles<'_> {
    type Item = BoundingBox;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.spec.half_width;

        while let Some(range) = self.spec.ranges.get(self.range) {
            // A range too fine to count is skipped; validate() rejects it up front.
            let (lat_steps, lng_steps) = range.steps(step).unwrap_or((0, 0));

            if self.lat >= lat_steps {
                self.range += 1;
                self.lat = 0;
                self.lng = 0;
                continue;
            }

            let lat = range.lat.center(self.lat, step, self.spec.lat_direction);
            let lng = range.lng.center(self.lng, step, self.spec.lng_direction);

            self.lng += 1;
            if self.lng >= lng_steps {
                self.lng = 0;
                self.lat += 1;
            }

            return Some(BoundingBox::around(lat, lng, step));
        }

        None
    }
}
