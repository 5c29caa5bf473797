use super::types::{Direction, Position};

/// One cell along `direction`; no wraparound.
pub fn next_position(pos: Position, direction: Direction) -> Position {
    let (dx, dy) = direction.delta();
    Position::new(pos.x + dx, pos.y + dy)
}

pub fn is_out_of_bounds(pos: Position, dimension: i32) -> bool {
    pos.x < 0 || pos.x >= dimension || pos.y < 0 || pos.y >= dimension
}

pub fn grid_center(dimension: i32) -> i32 {
    dimension / 2
}

pub fn cell_count(dimension: i32) -> usize {
    (dimension.max(0) as usize).pow(2)
}
