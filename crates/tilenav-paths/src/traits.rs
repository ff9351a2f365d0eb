use tilenav_core::{TilePos, WalkGrid};

/// Opaque handle of a coherent walkable zone.
///
/// Only used as the granularity of the per-frame unreachable memo.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(pub u32);

/// Walkability oracle. The only thing a search needs to know about the map.
pub trait Walkable {
    /// Whether a unit may stand on `p`.
    fn is_walkable(&self, p: TilePos) -> bool;
}

/// Maps tiles to the region containing them.
pub trait RegionResolver {
    /// Region of `p`, or `None` if `p` lies in no region (blocked, off-map).
    fn region_of(&self, p: TilePos) -> Option<RegionId>;
}

/// Simulation tick counter. Frame 0 means "not started yet".
pub trait FrameClock {
    /// The current frame. Never decreases.
    fn current_frame(&self) -> u32;
}

impl<F: Fn(TilePos) -> bool> Walkable for F {
    #[inline]
    fn is_walkable(&self, p: TilePos) -> bool {
        self(p)
    }
}

impl Walkable for WalkGrid {
    #[inline]
    fn is_walkable(&self, p: TilePos) -> bool {
        WalkGrid::is_walkable(self, p)
    }
}

impl<F: Fn(TilePos) -> Option<RegionId>> RegionResolver for F {
    #[inline]
    fn region_of(&self, p: TilePos) -> Option<RegionId> {
        self(p)
    }
}

impl<F: Fn() -> u32> FrameClock for F {
    #[inline]
    fn current_frame(&self) -> u32 {
        self()
    }
}

impl FrameClock for u32 {
    #[inline]
    fn current_frame(&self) -> u32 {
        *self
    }
}
