//! # ruletile
//!
//! A rule-based tile map engine: sprite atlases sliced into addressable
//! slots, a session-wide tile registry, neighbor-rule autotiling, and a
//! JSON save format that round-trips the whole session.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ruletile::prelude::*;
//!
//! let mut atlas = SpriteAtlas::new("terrain", "terrain.png", SlicingSettings::default());
//! atlas.mark_loaded(Vector2::new(48, 48)); // dimensions from the host's decoder
//!
//! let mut registry = TileRegistry::new();
//! registry.set_atlases(vec![atlas])?;
//!
//! let grass = registry.create_rule_tile("grass");
//! let mut grid = TileGrid::new(Vector2::new(32, 32), Vector2::new(16, 16))?;
//! grid.set_cell(4, 4, Some(grass))?;
//!
//! render_grid(&grid, &registry, &mut my_canvas);
//! ```
//!
//! ## Crate Structure
//!
//! This umbrella crate re-exports the ruletile_* sub-crates:
//!
//! - [`core`] - Data model (SpriteAtlas, Tile, TileRegistry, TileGrid)
//! - [`autotile`] - The neighbor-rule resolver
//! - [`runtime`] - Host integration (image loading, restore, rendering)

/// Data model: atlases, tiles, the registry, grids, and save records.
pub use ruletile_core as core;

/// Neighbor-rule resolution for rule tiles.
pub use ruletile_autotile as autotile;

/// Host integration: image loading, project restore, rendering.
pub use ruletile_runtime as runtime;

/// The most common imports in one place.
pub mod prelude {
    pub use ruletile_autotile::resolve;
    pub use ruletile_core::{
        NeighborRule, ProjectRecord, RuleClause, RuleTile, SlicingSettings, SpriteAtlas, Tile,
        TileGrid, TileId, TileRegistry, Vector2,
    };
    pub use ruletile_runtime::{load_project, render_grid, Blitter, ImageLoader};
}
