//! Core data structures for the ruletile engine
//!
//! This crate provides the fundamental types for rule-based tile maps:
//! - `SpriteAtlas` - A source image sliced into a grid of sprite slots
//! - `Tile` - Basic (fixed slot) or Rule (neighbor-dependent) tiles
//! - `TileRegistry` - Session-wide tile table with id renumbering
//! - `TileGrid` - A fixed-size map of tile references
//! - `ProjectRecord` - Self-contained save format for a whole session

mod atlas;
mod grid;
mod project;
mod registry;
mod tile;
mod vector2;

pub use atlas::{AtlasError, ImageState, SlicingSettings, SlotRect, SpriteAtlas};
pub use grid::{GridError, TileGrid};
pub use project::{AtlasRecord, GridRecord, ProjectError, ProjectRecord, SpecialTileRecord};
pub use registry::{IdRemap, RegistryError, TileRegistry};
pub use tile::{
    BasicTile, ClauseError, InvalidNeighborRule, NeighborRule, RuleClause, RuleTile, Tile, TileId,
};
pub use vector2::Vector2;
