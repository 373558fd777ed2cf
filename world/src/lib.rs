#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Ghost Void.
//!
//! The [`World`] owns the tiles of the currently loaded level and answers
//! solidity queries against them. Tile sets are swapped wholesale: a level
//! load either installs the complete tile set of the requested level or leaves
//! the previous one untouched.

pub mod avatar;
pub mod levels;
pub mod physics;

use ghost_void_core::{Aabb, LevelError, LevelId, Tile, TileKind, Vector2};

pub use avatar::Avatar;
pub use levels::{LevelCatalog, LevelData};

/// Represents the authoritative level state.
#[derive(Debug)]
pub struct World {
    catalog: LevelCatalog,
    current_level: Option<LevelId>,
    tiles: Vec<Tile>,
    spawn_point: Vector2,
    bounds: Aabb,
}

impl World {
    /// Creates a world backed by the built-in level catalog with no level loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(LevelCatalog::builtin())
    }

    /// Creates a world backed by the provided level catalog with no level loaded.
    #[must_use]
    pub fn with_catalog(catalog: LevelCatalog) -> Self {
        Self {
            catalog,
            current_level: None,
            tiles: Vec::new(),
            spawn_point: Vector2::ZERO,
            bounds: levels::DEFAULT_BOUNDS,
        }
    }

    /// Replaces the tile set with the canonical tiles of `level`.
    ///
    /// Unknown levels fail with [`LevelError::NotFound`] and leave the
    /// previously loaded level fully intact.
    pub fn load_level(&mut self, level: LevelId) -> Result<&LevelData, LevelError> {
        let data = self
            .catalog
            .get(level)
            .ok_or(LevelError::NotFound(level))?;

        self.tiles = data.tiles().to_vec();
        self.spawn_point = data.spawn_point();
        self.bounds = data.bounds();
        self.current_level = Some(level);

        tracing::info!(
            level = level.get(),
            tiles = self.tiles.len(),
            spawn_x = self.spawn_point.x,
            spawn_y = self.spawn_point.y,
            "level loaded"
        );
        Ok(data)
    }

    /// Appends a solid platform spanning `width` by `height` from `origin`.
    ///
    /// The platform lives until the next level load.
    pub fn spawn_plane(
        &mut self,
        origin: Vector2,
        width: f32,
        height: f32,
    ) -> Result<Tile, LevelError> {
        let valid_extent = |extent: f32| extent.is_finite() && extent > 0.0;
        if !origin.is_finite() || !valid_extent(width) || !valid_extent(height) {
            return Err(LevelError::InvalidPlane);
        }

        let tile = Tile {
            kind: TileKind::Platform,
            bounds: Aabb::from_origin_and_size(origin, width, height),
        };
        self.tiles.push(tile);
        tracing::info!(
            x = origin.x,
            y = origin.y,
            width,
            height,
            "plane spawned"
        );
        Ok(tile)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ghost_void_core::{Aabb, LevelId, Tile, Vector2};

    use super::World;

    /// Tiles of the current level in definition order.
    #[must_use]
    pub fn tiles(world: &World) -> &[Tile] {
        &world.tiles
    }

    /// Iterator over the tiles that block movement.
    pub fn solid_tiles(world: &World) -> impl Iterator<Item = &Tile> {
        world.tiles.iter().filter(|tile| tile.is_solid())
    }

    /// Spawn point of the current level, or the origin before any level loads.
    #[must_use]
    pub fn spawn_point(world: &World) -> Vector2 {
        world.spawn_point
    }

    /// Last successfully loaded level.
    #[must_use]
    pub fn current_level(world: &World) -> Option<LevelId> {
        world.current_level
    }

    /// Region the avatar is confined to.
    #[must_use]
    pub fn bounds(world: &World) -> Aabb {
        world.bounds
    }

    /// Reports whether `point` lies inside a solid tile.
    ///
    /// Tile bounds are closed: a point on an edge or corner of a solid tile
    /// counts as solid. Points covered only by non-solid tiles are not solid.
    #[must_use]
    pub fn is_solid(world: &World, point: Vector2) -> bool {
        solid_tiles(world).any(|tile| tile.bounds.contains(point))
    }
}
