//! Neighbor-rule autotiling for ruletile
//!
//! This crate resolves a rule tile into a concrete basic tile by
//! inspecting the tiles surrounding a map position. Painting one
//! logical terrain then renders correct edges and corners on its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use ruletile_autotile::resolve;
//! use ruletile_core::{Tile, TileGrid, TileRegistry};
//!
//! fn resolved_sprite(
//!     grid: &TileGrid,
//!     registry: &TileRegistry,
//!     col: i32,
//!     row: i32,
//! ) -> Option<u32> {
//!     let Some(Tile::Rule(rule)) = grid.tile_at(col, row, registry).ok()? else {
//!         return None;
//!     };
//!     // Out-of-bounds lookups come back as None, which counts as a
//!     // "different" neighbor at the map border.
//!     resolve(rule, col, row, |c, r| grid.cell(c, r).ok().flatten())
//! }
//! ```

pub mod resolver;

pub use resolver::{clause_matches, resolve};

// Re-export ruletile_core
pub use ruletile_core;
