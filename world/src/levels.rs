//! Level data provider consumed by the world.
//!
//! The catalog is an opaque lookup keyed by [`LevelId`]. Every built-in level
//! starts from the same shared floor and boss-room wall before adding its own
//! tiles.

use std::collections::BTreeMap;

use ghost_void_core::{Aabb, LevelId, Tile, TileKind, Vector2};
use serde::{Deserialize, Serialize};

/// Region the avatar is confined to when a level does not specify one.
pub const DEFAULT_BOUNDS: Aabb = Aabb::new(
    Vector2::new(-1_000.0, -1_000.0),
    Vector2::new(2_000.0, 1_000.0),
);

const SHARED_TILES: [Tile; 2] = [
    Tile::new(
        TileKind::Platform,
        Vector2::new(-100.0, 10.0),
        Vector2::new(1_000.0, 20.0),
    ),
    Tile::new(
        TileKind::Platform,
        Vector2::new(500.0, -100.0),
        Vector2::new(520.0, 10.0),
    ),
];

/// Tiles and spawn point that make up a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    tiles: Vec<Tile>,
    spawn_point: Vector2,
    #[serde(default = "default_bounds")]
    bounds: Aabb,
}

impl LevelData {
    /// Creates level data from an ordered tile list and a spawn point.
    #[must_use]
    pub fn new(tiles: Vec<Tile>, spawn_point: Vector2) -> Self {
        Self {
            tiles,
            spawn_point,
            bounds: DEFAULT_BOUNDS,
        }
    }

    /// Replaces the region the avatar is confined to.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = bounds;
        self
    }

    /// Ordered tiles of the level.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Designated spawn point.
    #[must_use]
    pub const fn spawn_point(&self) -> Vector2 {
        self.spawn_point
    }

    /// Region the avatar is confined to.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }
}

fn default_bounds() -> Aabb {
    DEFAULT_BOUNDS
}

/// Lookup of level data keyed by level identifier.
#[derive(Clone, Debug, Default)]
pub struct LevelCatalog {
    levels: BTreeMap<LevelId, LevelData>,
}

impl LevelCatalog {
    /// Creates a catalog with no levels.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the catalog of canonical levels shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(
            LevelId::new(0),
            LevelData::new(
                with_shared_tiles([
                    Tile::new(
                        TileKind::Platform,
                        Vector2::new(-400.0, 20.0),
                        Vector2::new(400.0, 25.0),
                    ),
                    Tile::new(
                        TileKind::Platform,
                        Vector2::new(-200.0, 15.0),
                        Vector2::new(-100.0, 16.0),
                    ),
                    Tile::new(
                        TileKind::Platform,
                        Vector2::new(100.0, 15.0),
                        Vector2::new(200.0, 16.0),
                    ),
                ]),
                Vector2::new(0.0, 10.0),
            ),
        );
        catalog.insert(
            LevelId::new(1),
            LevelData::new(
                with_shared_tiles([
                    Tile::new(
                        TileKind::Platform,
                        Vector2::new(-200.0, 50.0),
                        Vector2::new(1_200.0, 60.0),
                    ),
                    Tile::new(
                        TileKind::Spikes,
                        Vector2::new(100.0, 48.0),
                        Vector2::new(200.0, 50.0),
                    ),
                    Tile::new(
                        TileKind::BossGate,
                        Vector2::new(900.0, 0.0),
                        Vector2::new(920.0, 50.0),
                    ),
                ]),
                Vector2::new(-50.0, 40.0),
            ),
        );
        catalog.insert(
            LevelId::new(2),
            LevelData::new(
                with_shared_tiles([
                    Tile::new(
                        TileKind::Ladder,
                        Vector2::new(300.0, -60.0),
                        Vector2::new(310.0, 10.0),
                    ),
                    Tile::new(
                        TileKind::Platform,
                        Vector2::new(260.0, -65.0),
                        Vector2::new(340.0, -60.0),
                    ),
                    Tile::new(
                        TileKind::Empty,
                        Vector2::new(-100.0, -40.0),
                        Vector2::new(0.0, 10.0),
                    ),
                ]),
                Vector2::new(250.0, 0.0),
            ),
        );
        catalog
    }

    /// Adds or replaces the data for `level`.
    pub fn insert(&mut self, level: LevelId, data: LevelData) {
        let _ = self.levels.insert(level, data);
    }

    /// Looks up the data for `level`.
    #[must_use]
    pub fn get(&self, level: LevelId) -> Option<&LevelData> {
        self.levels.get(&level)
    }

    /// Iterator over the defined level identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = LevelId> + '_ {
        self.levels.keys().copied()
    }
}

fn with_shared_tiles<const N: usize>(specific: [Tile; N]) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(SHARED_TILES.len() + N);
    tiles.extend_from_slice(&SHARED_TILES);
    tiles.extend_from_slice(&specific);
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_levels_share_floor_and_wall() {
        let catalog = LevelCatalog::builtin();
        for level in catalog.ids() {
            let data = catalog.get(level).expect("level present");
            assert_eq!(&data.tiles()[..2], &SHARED_TILES);
        }
    }

    #[test]
    fn builtin_catalog_defines_three_levels() {
        let ids: Vec<u32> = LevelCatalog::builtin().ids().map(|id| id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn empty_catalog_has_no_levels() {
        assert!(LevelCatalog::empty().get(LevelId::new(0)).is_none());
    }
}
