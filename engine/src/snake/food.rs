use std::collections::HashSet;

use crate::log;
use crate::session_rng::SessionRng;
use super::geometry::cell_count;
use super::types::Position;

pub const FOOD_SAMPLE_ATTEMPTS: usize = 100;

/// Picks a free cell for the next food item.
///
/// Random cells are tried first; once the attempts run out the grid is
/// scanned row by row so a nearly full board still gets food. Returns `None`
/// only when no cell is free.
pub fn place_food(
    occupied: &HashSet<Position>,
    dimension: i32,
    rng: &mut SessionRng,
) -> Option<Position> {
    if dimension <= 0 {
        return None;
    }

    let attempts = if occupied.len() < cell_count(dimension) {
        FOOD_SAMPLE_ATTEMPTS
    } else {
        0
    };

    for _ in 0..attempts {
        let pos = Position::new(rng.random_range(0..dimension), rng.random_range(0..dimension));
        if !occupied.contains(&pos) {
            return Some(pos);
        }
    }

    let fallback = (0..dimension)
        .flat_map(|y| (0..dimension).map(move |x| Position::new(x, y)))
        .find(|pos| !occupied.contains(pos));

    match fallback {
        Some(pos) => log!("Food placed by scan at {} after {} random misses", pos, attempts),
        None => log!("No free cell left for food on a {}x{} grid", dimension, dimension),
    }
    fallback
}
