//! Grid rendering through a host blit primitive
//!
//! The engine does not draw anything itself. [`render_grid`] walks the
//! cells in row-major order and asks the host [`Blitter`] to copy atlas
//! regions to the target surface; rule tiles go through the resolver
//! first. A bad cell degrades to a marker and a diagnostic - one broken
//! tile never blocks the rest of the map.

use log::{debug, warn};

use ruletile_autotile::resolve;
use ruletile_core::{BasicTile, SlotRect, SpriteAtlas, Tile, TileGrid, TileRegistry, Vector2};

/// Blit-target abstraction supplied by the render host.
pub trait Blitter {
    /// Copy `src` pixels from the atlas image to the destination
    /// rectangle on the target surface.
    fn blit(&mut self, atlas: &SpriteAtlas, src: SlotRect, dest_pos: Vector2, dest_size: Vector2);

    /// Editor overlay for cells holding a rule tile.
    fn rule_marker(&mut self, _dest_pos: Vector2, _dest_size: Vector2) {}

    /// Marker for cells whose tile reference cannot be resolved.
    fn missing_marker(&mut self, _dest_pos: Vector2, _dest_size: Vector2) {}
}

/// Render every cell of `grid`, resolving rule tiles against their
/// neighbors in the same grid.
pub fn render_grid(grid: &TileGrid, registry: &TileRegistry, target: &mut dyn Blitter) {
    let size = grid.map_size();
    let cell_size = grid.tile_render_size();

    for row in 0..size.y {
        for col in 0..size.x {
            let Ok(Some(id)) = grid.cell(col, row) else {
                continue;
            };
            let dest_pos = Vector2::new(col * cell_size.x, row * cell_size.y);

            match registry.get_tile(id) {
                None => {
                    warn!("cell ({col}, {row}) references unknown tile {id}");
                    target.missing_marker(dest_pos, cell_size);
                }
                Some(Tile::Basic(basic)) => {
                    blit_basic(basic, registry, target, dest_pos, cell_size);
                }
                Some(Tile::Rule(rule)) => {
                    // Out-of-bounds neighbors read as absent, never as an error.
                    let resolved = resolve(rule, col, row, |c, r| grid.cell(c, r).ok().flatten());
                    match resolved.map(|rid| (rid, registry.get_tile(rid))) {
                        Some((_, Some(Tile::Basic(basic)))) => {
                            blit_basic(basic, registry, target, dest_pos, cell_size);
                            target.rule_marker(dest_pos, cell_size);
                        }
                        Some((rid, Some(Tile::Rule(_)))) => {
                            warn!(
                                "rule tile '{}' resolved to tile {rid}, which is itself a rule tile",
                                rule.name
                            );
                            target.missing_marker(dest_pos, cell_size);
                        }
                        Some((rid, None)) => {
                            warn!("rule tile '{}' resolved to unknown tile {rid}", rule.name);
                            target.missing_marker(dest_pos, cell_size);
                        }
                        None => {
                            // No clause matched and the rule has no default.
                            debug!(
                                "rule tile '{}' produced no sprite at ({col}, {row})",
                                rule.name
                            );
                            target.rule_marker(dest_pos, cell_size);
                        }
                    }
                }
            }
        }
    }
}

fn blit_basic(
    basic: &BasicTile,
    registry: &TileRegistry,
    target: &mut dyn Blitter,
    dest_pos: Vector2,
    dest_size: Vector2,
) {
    let Some(atlas) = registry.atlas(&basic.atlas_id) else {
        warn!(
            "tile '{}' references unknown atlas '{}'",
            basic.name, basic.atlas_id
        );
        target.missing_marker(dest_pos, dest_size);
        return;
    };
    match atlas.tile_rect(basic.index_in_atlas) {
        Ok(rect) => target.blit(atlas, rect, dest_pos, dest_size),
        Err(err) => {
            warn!("tile '{}': {err}", basic.name);
            target.missing_marker(dest_pos, dest_size);
        }
    }
}
