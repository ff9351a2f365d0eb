//! Per-frame pathfinding for units on a tile grid.
//!
//! Two searches answer "how does a unit get from here to there":
//!
//! - **Flood** breadth-first search ([`SearchGrid::flood_path`])
//! - **Heuristic** best-first search guided by an octagonal distance
//!   estimate ([`SearchGrid::heuristic_path`])
//!
//! [`PathService`] wraps them for game code. Unit queries go through a
//! bounded LRU [`PathCache`] and a per-frame memo of regions that could not
//! be reached; area queries always flood-search the current map.
//!
//! The map is never owned here. Callers hand in collaborators:
//!
//! | Trait | Answers |
//! |---|---|
//! | [`Walkable`] | can a unit stand on this tile |
//! | [`RegionResolver`] | which region holds this tile |
//! | [`FrameClock`] | what frame is it |
//!
//! Closures implement all three, and [`WalkGrid`](tilenav_core::WalkGrid)
//! and [`RegionGrid`] cover the common grid-backed case.

mod cache;
mod config;
mod distance;
mod error;
mod flood;
mod heuristic;
mod neighbors;
mod path;
mod regions;
mod searchgrid;
mod service;
mod traits;

pub use cache::{PathCache, PathKey};
pub use config::{DEFAULT_CACHE_CAPACITY, PathConfig, SearchEngine};
pub use distance::{approx_distance, chebyshev, manhattan};
pub use error::PathError;
pub use neighbors::{FLOOD_DIRS, HEURISTIC_DIRS, cuts_corner};
pub use path::{BOUNDARY_CORRECTION, Path, UNREACHABLE_DISTANCE, boundary_corrected_distance, route_distance};
pub use regions::RegionGrid;
pub use searchgrid::SearchGrid;
pub use service::{PathService, PathStats};
pub use traits::{FrameClock, RegionId, RegionResolver, Walkable};
