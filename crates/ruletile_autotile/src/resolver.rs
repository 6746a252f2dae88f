//! The neighbor-rule resolver.
//!
//! The entry point is [`resolve`]: given a rule tile and a map position,
//! it walks the tile's clause list in order and returns the first match.
//! Everything below that is an internal helper.

use log::warn;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ruletile_core::{ClauseError, NeighborRule, RuleClause, RuleTile, TileId};

/// Resolve `rule` at `(col, row)`.
///
/// Clauses are a user-authored priority list: the first clause whose
/// every filter cell passes wins, regardless of later clauses. When
/// none match, the rule's default is returned. The neighbor callback
/// reports the tile id occupying a grid position, `None` for empty or
/// out-of-bounds cells — absent neighbors count as "different", so
/// edge-facing clauses match naturally at the map border.
pub fn resolve<F>(rule: &RuleTile, col: i32, row: i32, neighbor: F) -> Option<TileId>
where
    F: Fn(i32, i32) -> Option<TileId>,
{
    for (clause_index, clause) in rule.rules.iter().enumerate() {
        if !clause.is_selectable() {
            // Authoring leftover with no output; never matches.
            continue;
        }
        match clause_matches(rule.id, clause, col, row, &neighbor) {
            Ok(true) => {
                if let Some(id) = select_output(clause, clause_index, col, row) {
                    return Some(id);
                }
            }
            Ok(false) => {}
            Err(err) => {
                warn!("rule tile '{}': skipping clause {clause_index}: {err}", rule.name);
            }
        }
    }
    rule.default
}

/// Test one clause against the neighborhood of `(col, row)`.
///
/// `Same` and `Different` compare the neighbor's id against the rule
/// tile's own id — "is this logically the same terrain" — not against
/// whatever sprite that neighbor resolves to. A single failing cell
/// short-circuits the clause.
pub fn clause_matches<F>(
    rule_id: TileId,
    clause: &RuleClause,
    col: i32,
    row: i32,
    neighbor: &F,
) -> Result<bool, ClauseError>
where
    F: Fn(i32, i32) -> Option<TileId>,
{
    let k = clause.filter_extent()? as i32;
    let half = k / 2;
    for dy in 0..k {
        for dx in 0..k {
            let constraint = clause.neighbor_filter[(dy * k + dx) as usize];
            if constraint == NeighborRule::Unset {
                continue;
            }
            let occupant = neighbor(col + dx - half, row + dy - half);
            let same = occupant == Some(rule_id);
            let passes = match constraint {
                NeighborRule::Same => same,
                NeighborRule::Different => !same,
                NeighborRule::Unset => true,
            };
            if !passes {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Pick the matched clause's output sprite.
///
/// Multi-candidate clauses choose with a `SmallRng` seeded from the cell
/// position and clause index, so repeated renders of one cell are stable
/// while different cells vary.
fn select_output(clause: &RuleClause, clause_index: usize, col: i32, row: i32) -> Option<TileId> {
    if !clause.random.is_empty() {
        let mut rng = SmallRng::seed_from_u64(position_seed(col, row, clause_index));
        let pick = rng.gen_range(0..clause.random.len());
        return Some(clause.random[pick]);
    }
    clause.tile
}

fn position_seed(col: i32, row: i32, clause_index: usize) -> u64 {
    let pos = ((col as u32 as u64) << 32) | row as u32 as u64;
    pos ^ (clause_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
