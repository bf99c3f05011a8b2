#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Streaming world index for Word Meadow.
//!
//! The [`WorldIndex`] owns every region generated during a session, keyed by
//! [`RegionCoord`]. Regions are created on demand and stay cached; the active
//! set only decides which of them are considered in scope around the observer.

mod region;

use std::collections::{BTreeSet, HashMap};

use word_meadow_core::{CellKind, RegionCoord, TileCoord};

pub use region::{Entity, Region};

/// Default radius, in regions, of the streamed neighbourhood.
pub const DEFAULT_RENDER_DISTANCE: u32 = 2;

/// Configuration parameters required to construct the world index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    render_distance: u32,
}

impl WorldConfig {
    /// Creates a configuration with the provided render distance.
    #[must_use]
    pub const fn new(render_distance: u32) -> Self {
        Self { render_distance }
    }

    /// Radius, in regions, of the streamed neighbourhood.
    #[must_use]
    pub const fn render_distance(&self) -> u32 {
        self.render_distance
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_DISTANCE)
    }
}

/// Tile-level queries an actor needs while moving and targeting.
pub trait TileQuery {
    /// Reports whether the tile can be entered. Unknown tiles are impassable.
    fn is_passable(&mut self, tile: TileCoord) -> bool;

    /// Kind of the entity standing on the tile, if the tile is materialized.
    fn entity_kind_at(&mut self, tile: TileCoord) -> Option<CellKind>;
}

/// Difference between two consecutive active sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveSetChange {
    /// Regions that entered the active set, in ascending order.
    pub activated: Vec<RegionCoord>,
    /// Regions that left the active set, in ascending order.
    pub deactivated: Vec<RegionCoord>,
}

impl ActiveSetChange {
    /// Whether the active set stayed the same.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activated.is_empty() && self.deactivated.is_empty()
    }
}

/// Registry of generated regions plus the active set around the observer.
#[derive(Debug, Default)]
pub struct WorldIndex {
    config: WorldConfig,
    regions: HashMap<RegionCoord, Region>,
    active: BTreeSet<RegionCoord>,
    center: Option<RegionCoord>,
    generated: u64,
}

impl WorldIndex {
    /// Creates an empty world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates an empty world using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            regions: HashMap::new(),
            active: BTreeSet::new(),
            center: None,
            generated: 0,
        }
    }

    /// Configuration the world was created with.
    #[must_use]
    pub const fn config(&self) -> WorldConfig {
        self.config
    }

    /// Returns the cached region, generating and caching it when absent.
    ///
    /// Regions whose tiles fall outside tile space are never generated.
    pub fn region_or_generate(&mut self, coord: RegionCoord) -> Option<&mut Region> {
        if !coord.has_tiles() {
            tracing::trace!(x = coord.x(), y = coord.y(), "region outside tile space");
            return None;
        }
        let generated = &mut self.generated;
        Some(self.regions.entry(coord).or_insert_with(|| {
            *generated += 1;
            Region::generate(coord)
        }))
    }

    /// Returns the cached region without generating it.
    #[must_use]
    pub fn region(&self, coord: RegionCoord) -> Option<&Region> {
        self.regions.get(&coord)
    }

    /// Cell kind of the tile, generating its region when needed.
    pub fn tile(&mut self, tile: TileCoord) -> Option<CellKind> {
        self.region_or_generate(tile.region())?.kind_at(tile.local())
    }

    /// Whether the tile can be entered. Unresolvable tiles are impassable.
    pub fn is_passable(&mut self, tile: TileCoord) -> bool {
        self.tile(tile).map_or(false, CellKind::passable)
    }

    /// Recomputes the active set around `center`.
    ///
    /// Calling this repeatedly with the same centre is a no-op. Regions that
    /// leave the active set remain cached.
    pub fn update_active_set(&mut self, center: RegionCoord) -> ActiveSetChange {
        if self.center == Some(center) {
            return ActiveSetChange::default();
        }
        self.center = Some(center);

        let next = neighbourhood(center, self.config.render_distance);
        for coord in &next {
            let _ = self.region_or_generate(*coord);
        }

        let change = ActiveSetChange {
            activated: next.difference(&self.active).copied().collect(),
            deactivated: self.active.difference(&next).copied().collect(),
        };
        self.active = next;

        tracing::debug!(
            x = center.x(),
            y = center.y(),
            activated = change.activated.len(),
            deactivated = change.deactivated.len(),
            cached = self.regions.len(),
            "active set updated"
        );

        change
    }

    /// Coordinates of the active regions in ascending order.
    pub fn active_regions(&self) -> impl Iterator<Item = RegionCoord> + '_ {
        self.active.iter().copied()
    }

    /// Whether the region is part of the active set.
    #[must_use]
    pub fn is_active(&self, coord: RegionCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Every entity of every active region, building entity lists on demand.
    pub fn active_entities(&mut self) -> Vec<&Entity> {
        for coord in &self.active {
            if let Some(region) = self.regions.get_mut(coord) {
                let _ = region.entities();
            }
        }

        self.active
            .iter()
            .filter_map(|coord| self.regions.get(coord))
            .filter_map(Region::built_entities)
            .flatten()
            .collect()
    }

    /// Entity on the tile, searched only among materialized regions.
    pub fn entity_at(&mut self, tile: TileCoord) -> Option<&Entity> {
        self.regions
            .get_mut(&tile.region())?
            .entity_at(tile.local())
    }

    /// Mutable entity on the tile, searched only among materialized regions.
    pub fn entity_at_mut(&mut self, tile: TileCoord) -> Option<&mut Entity> {
        self.regions
            .get_mut(&tile.region())?
            .entity_at_mut(tile.local())
    }

    /// Number of region generations performed so far.
    #[must_use]
    pub const fn generated_count(&self) -> u64 {
        self.generated
    }

    /// Number of regions currently cached.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.regions.len()
    }

    /// Drops a cached region that is not active.
    ///
    /// Returns `false` when the region is active or was not cached. A later
    /// access regenerates an identical grid, but entity flags are lost.
    pub fn evict(&mut self, coord: RegionCoord) -> bool {
        if self.active.contains(&coord) {
            return false;
        }
        self.regions.remove(&coord).is_some()
    }
}

impl TileQuery for WorldIndex {
    fn is_passable(&mut self, tile: TileCoord) -> bool {
        WorldIndex::is_passable(self, tile)
    }

    fn entity_kind_at(&mut self, tile: TileCoord) -> Option<CellKind> {
        self.entity_at(tile).map(Entity::kind)
    }
}

fn neighbourhood(center: RegionCoord, radius: u32) -> BTreeSet<RegionCoord> {
    let reach = i32::try_from(radius).unwrap_or(i32::MAX);
    let limit = f64::from(radius) * 1.5;
    let mut coords = BTreeSet::new();

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let manhattan = f64::from(dx.unsigned_abs() + dy.unsigned_abs());
            if manhattan > limit {
                continue;
            }
            let (Some(x), Some(y)) = (center.x().checked_add(dx), center.y().checked_add(dy))
            else {
                continue;
            };
            let coord = RegionCoord::new(x, y);
            if coord.has_tiles() {
                let _ = coords.insert(coord);
            }
        }
    }

    coords
}

/// Read-only queries that never generate regions.
pub mod query {
    use word_meadow_core::{CellKind, RegionCoord, TileCoord};

    use super::{Entity, WorldIndex};

    /// Cell kind of a tile whose region is already cached.
    #[must_use]
    pub fn loaded_tile(world: &WorldIndex, tile: TileCoord) -> Option<CellKind> {
        world.region(tile.region())?.kind_at(tile.local())
    }

    /// Entity on a tile whose region has already built its entities.
    #[must_use]
    pub fn built_entity(world: &WorldIndex, tile: TileCoord) -> Option<&Entity> {
        let index = tile.local().index()?;
        world
            .region(tile.region())?
            .built_entities()?
            .get(index)
    }

    /// Coordinates of the active regions in ascending order.
    #[must_use]
    pub fn active_regions(world: &WorldIndex) -> Vec<RegionCoord> {
        world.active_regions().collect()
    }

    /// Entities of the active regions whose entity lists are already built.
    #[must_use]
    pub fn built_active_entities(world: &WorldIndex) -> Vec<&Entity> {
        world
            .active_regions()
            .filter_map(|coord| world.region(coord))
            .filter_map(|region| region.built_entities())
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbourhood_respects_manhattan_cut() {
        let coords = neighbourhood(RegionCoord::new(0, 0), 2);
        // 5x5 square minus the four corners at distance 4 > 3.
        assert_eq!(coords.len(), 21);
        assert!(!coords.contains(&RegionCoord::new(2, 2)));
        assert!(coords.contains(&RegionCoord::new(2, 1)));
        assert!(coords.contains(&RegionCoord::new(-2, 0)));
    }

    #[test]
    fn neighbourhood_of_zero_radius_is_the_centre() {
        let coords = neighbourhood(RegionCoord::new(5, -5), 0);
        assert_eq!(coords.into_iter().collect::<Vec<_>>(), vec![RegionCoord::new(5, -5)]);
    }

    #[test]
    fn neighbourhood_clips_at_integer_limits() {
        let coords = neighbourhood(RegionCoord::new(i32::MAX, i32::MIN), 1);
        assert!(coords.is_empty());
    }

    #[test]
    fn neighbourhood_clips_at_the_edge_of_tile_space() {
        let (max, min) = (RegionCoord::MAX_TILED, RegionCoord::MIN_TILED);
        let coords = neighbourhood(RegionCoord::new(max, min), 1);
        assert_eq!(
            coords.into_iter().collect::<Vec<_>>(),
            vec![
                RegionCoord::new(max - 1, min),
                RegionCoord::new(max, min),
                RegionCoord::new(max, min + 1),
            ]
        );
    }

    #[test]
    fn regions_outside_tile_space_are_never_generated() {
        let mut world = WorldIndex::new();
        assert!(world.region_or_generate(RegionCoord::new(200_000_000, 0)).is_none());
        assert_eq!(world.generated_count(), 0);

        let change = world.update_active_set(RegionCoord::new(200_000_000, 0));
        assert!(change.activated.is_empty());
        assert!(world.active_entities().is_empty());
        assert_eq!(world.cached_count(), 0);

        let edge = RegionCoord::new(RegionCoord::MAX_TILED, 0);
        let _ = world.update_active_set(edge);
        assert!(world.is_active(edge));
        let corner = TileCoord::new(i32::MAX, 15);
        assert_eq!(world.entity_at(corner).map(Entity::position), Some(corner));
        assert!(world
            .active_regions()
            .all(|coord| coord.x() <= RegionCoord::MAX_TILED));
    }

    #[test]
    fn region_or_generate_caches_regions() {
        let mut world = WorldIndex::new();
        assert!(world.region_or_generate(RegionCoord::new(1, 1)).is_some());
        assert!(world.region_or_generate(RegionCoord::new(1, 1)).is_some());
        assert_eq!(world.generated_count(), 1);
        assert_eq!(world.cached_count(), 1);
    }

    #[test]
    fn evict_refuses_active_regions() {
        let mut world = WorldIndex::new();
        let _ = world.update_active_set(RegionCoord::new(0, 0));
        assert!(!world.evict(RegionCoord::new(0, 0)));
        let _ = world.region_or_generate(RegionCoord::new(9, 9));
        assert!(world.evict(RegionCoord::new(9, 9)));
        assert!(!world.evict(RegionCoord::new(9, 9)));
    }
}
