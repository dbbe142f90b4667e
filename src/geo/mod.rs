//! Geographic tiling of the search area.

pub mod grid;

pub use grid::{AxisRange, BoundingBox, Direction, RegionSpec, TileRange, Tiles};
