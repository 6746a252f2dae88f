//! Host integration for the ruletile engine
//!
//! This crate connects the core data model to an embedding host:
//! - `ImageLoader` - the host decodes atlas images; the engine only
//!   needs their pixel dimensions
//! - `load_project` - restore a saved session, loading every image
//!   before any tile registration
//! - `Blitter` / `render_grid` - render a grid through an abstract
//!   "copy atlas region to target" primitive
//!
//! # Example
//!
//! ```rust,ignore
//! use ruletile_runtime::{load_project, render_grid, ImageLoader};
//! use ruletile_core::ProjectRecord;
//!
//! let record = ProjectRecord::from_json(&std::fs::read_to_string("map.json")?)?;
//! let (grid, registry) = load_project(&record, &mut my_loader)?;
//! render_grid(&grid, &registry, &mut my_canvas);
//! ```

pub mod loader;
pub mod render;

pub use loader::{load_project, ImageLoadError, ImageLoader, ProjectLoadError};
pub use render::{render_grid, Blitter};

// Re-export the crates this one builds on
pub use ruletile_autotile;
pub use ruletile_core;
