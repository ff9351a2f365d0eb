//! **tilenav-core**: core types for tile-grid navigation.
//!
//! This crate provides the foundational types shared by the *tilenav*
//! crates: the two coordinate spaces ([`TilePos`] for the coarse navigation
//! grid, [`WorldPos`] for sub-tile positions), tile rectangles ([`Range`])
//! and a dense walkability map ([`WalkGrid`]).

pub mod geom;
pub mod grid;

pub use geom::{Range, RangeIter, TILE_SIZE, TilePos, WorldPos};
pub use grid::{GridError, WalkGrid};
