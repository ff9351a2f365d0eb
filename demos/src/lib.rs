//! Shared skirmish model used by the tilenav demos.
//!
//! Demonstrates: a seeded obstacle map, region labelling, unit paths cached
//! across frames, the per-frame unreachable memo (a sealed vault no unit can
//! enter), and uncached area checks before committing a wall.

use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use tilenav_core::{Range, TILE_SIZE, TilePos, WalkGrid, WorldPos};
use tilenav_paths::{PathConfig, PathError, PathService, PathStats, RegionGrid, RegionId};

pub const MAP_WIDTH: i32 = 64;
pub const MAP_HEIGHT: i32 = 48;
pub const UNITS: usize = 40;
const RALLY_POINTS: usize = 3;
/// Percent of tiles turned into rubble.
const RUBBLE: i32 = 22;
/// Frames between wall placement attempts.
const BUILD_EVERY: u32 = 10;
const CACHE_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Unit {
    pub pos: WorldPos,
    route: Vec<TilePos>,
    next: usize,
}

impl Unit {
    fn idle(&self) -> bool {
        self.next >= self.route.len()
    }
}

// ---------------------------------------------------------------------------
// Skirmish
// ---------------------------------------------------------------------------

/// Counters for things the simulation did, next to [`PathStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub frames: u32,
    pub arrivals: u32,
    pub walls_built: u32,
    pub walls_rejected: u32,
    pub path: PathStats,
}

pub struct Skirmish {
    map: WalkGrid,
    regions: RegionGrid,
    service: PathService,
    units: Vec<Unit>,
    /// Open rally points, all in one region.
    rallies: Vec<TilePos>,
    /// Center of the sealed vault.
    vault: TilePos,
    frame: u32,
    report: Report,
    rng: StdRng,
}

impl Skirmish {
    pub fn new(seed: u64) -> Result<Self, PathError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let (map, vault) = generate_map(&mut rng);
        let regions = RegionGrid::label(map.bounds(), &map);
        let service = PathService::new(map.bounds(), &PathConfig::with_capacity(CACHE_CAPACITY))?;

        let main = largest_region(&regions);
        let rallies = (0..RALLY_POINTS)
            .map(|_| random_floor_in(&regions, main, &mut rng))
            .collect();
        let units = (0..UNITS)
            .map(|_| {
                let tile = random_floor_in(&regions, main, &mut rng);
                let pos = WorldPos::new(
                    tile.origin().x + rng.random_range(0..TILE_SIZE),
                    tile.origin().y + rng.random_range(0..TILE_SIZE),
                );
                Unit {
                    pos,
                    route: Vec::new(),
                    next: 0,
                }
            })
            .collect();

        Ok(Self {
            map,
            regions,
            service,
            units,
            rallies,
            vault,
            frame: 0,
            report: Report::default(),
            rng,
        })
    }

    pub fn map(&self) -> &WalkGrid {
        &self.map
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn rallies(&self) -> &[TilePos] {
        &self.rallies
    }

    pub fn vault(&self) -> TilePos {
        self.vault
    }

    pub fn report(&self) -> Report {
        Report {
            frames: self.frame,
            path: self.service.stats(),
            ..self.report
        }
    }

    /// Advance one frame: idle units pick a goal, moving units take a step,
    /// and every few frames a wall is proposed.
    pub fn step(&mut self) {
        self.frame += 1;
        let frame = self.frame;

        for unit in &mut self.units {
            if !unit.idle() {
                let tile = unit.route[unit.next];
                if self.map.is_walkable(tile) {
                    unit.pos = tile.center();
                    unit.next += 1;
                    if unit.idle() {
                        self.report.arrivals += 1;
                    }
                } else {
                    // Walled in since the route was planned.
                    unit.route.clear();
                    unit.next = 0;
                }
                continue;
            }

            // One goal in four is the vault, which no one can reach.
            let goal = if self.rng.random_range(0..4) == 0 {
                self.vault
            } else {
                self.rallies[self.rng.random_range(0..self.rallies.len())]
            };
            let path = self.service.compute_unit_path(
                unit.pos,
                goal.center(),
                &self.map,
                &self.regions,
                &frame,
            );
            unit.route = path.tiles().to_vec();
            // The first tile is where the unit already stands.
            unit.next = unit.route.len().min(1);
        }

        if frame % BUILD_EVERY == 0 {
            self.propose_wall();
        }
    }

    /// Try to wall off a random tile, keeping the rally points connected.
    fn propose_wall(&mut self) {
        let candidate = random_floor(&self.map, &mut self.rng);
        let occupied = self.rallies.contains(&candidate)
            || self.units.iter().any(|u| u.pos.tile() == candidate);
        if occupied {
            self.report.walls_rejected += 1;
            return;
        }

        let map = &self.map;
        let with_wall = |p: TilePos| p != candidate && map.is_walkable(p);

        let keeps_connected = self.rallies.windows(2).all(|pair| {
            self.service
                .compute_area_path(pair[0].center(), pair[1].center(), &with_wall)
                .is_reachable()
        });
        if !keeps_connected {
            log::debug!("frame {}: wall at {candidate} would split the rallies", self.frame);
            self.report.walls_rejected += 1;
            return;
        }

        self.map.set(candidate, false);
        self.regions = RegionGrid::label(self.map.bounds(), &self.map);
        // Cached routes may cross the new wall.
        self.service.clear_cache();
        self.report.walls_built += 1;
    }
}

// ---------------------------------------------------------------------------
// Map generation
// ---------------------------------------------------------------------------

/// Scatter rubble over an open map and seal a vault in the bottom-right
/// corner. Returns the map and the vault's center tile.
fn generate_map(rng: &mut impl Rng) -> (WalkGrid, TilePos) {
    let mut map = WalkGrid::new(MAP_WIDTH, MAP_HEIGHT);
    for p in map.bounds() {
        if rng.random_range(0..100) < RUBBLE {
            map.set(p, false);
        }
    }

    let vault = Range::new(MAP_WIDTH - 12, MAP_HEIGHT - 12, MAP_WIDTH - 2, MAP_HEIGHT - 2);
    map.fill(vault, false);
    let inside = Range::new(vault.min.x + 1, vault.min.y + 1, vault.max.x - 1, vault.max.y - 1);
    map.fill(inside, true);
    let center = TilePos::new(
        (inside.min.x + inside.max.x) / 2,
        (inside.min.y + inside.max.y) / 2,
    );
    (map, center)
}

/// The region with the most tiles.
fn largest_region(regions: &RegionGrid) -> RegionId {
    let mut sizes = vec![0usize; regions.count()];
    for p in regions.range() {
        if let Some(RegionId(id)) = regions.region_at(p) {
            sizes[id as usize] += 1;
        }
    }
    let best = sizes
        .iter()
        .enumerate()
        .max_by_key(|&(_, n)| *n)
        .map_or(0, |(i, _)| i);
    RegionId(best as u32)
}

fn random_tile(rng: &mut impl Rng) -> TilePos {
    TilePos::new(rng.random_range(0..MAP_WIDTH), rng.random_range(0..MAP_HEIGHT))
}

/// Find a random walkable tile.
fn random_floor(map: &WalkGrid, rng: &mut impl Rng) -> TilePos {
    loop {
        let p = random_tile(rng);
        if map.is_walkable(p) {
            return p;
        }
    }
}

/// Find a random tile of `region`.
fn random_floor_in(regions: &RegionGrid, region: RegionId, rng: &mut impl Rng) -> TilePos {
    loop {
        let p = random_tile(rng);
        if regions.region_at(p) == Some(region) {
            return p;
        }
    }
}
