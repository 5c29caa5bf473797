use super::types::Position;

/// Linear scan; sequences are bounded by the grid's cell count.
pub fn collides_with<'a, I>(pos: Position, sequence: I) -> bool
where
    I: IntoIterator<Item = &'a Position>,
{
    sequence.into_iter().any(|segment| *segment == pos)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    #[test]
    fn test_hits_any_member() {
        let body = [Position::new(3, 3), Position::new(2, 3), Position::new(1, 3)];
        assert!(collides_with(Position::new(2, 3), &body));
        assert!(collides_with(Position::new(1, 3), &body));
        assert!(!collides_with(Position::new(3, 2), &body));
    }

    #[test]
    fn test_empty_sequence_never_collides() {
        let empty: Vec<Position> = Vec::new();
        assert!(!collides_with(Position::new(0, 0), &empty));
    }

    #[test]
    fn test_works_over_deque_slices() {
        let body: VecDeque<Position> = [Position::new(4, 4), Position::new(4, 5)].into_iter().collect();
        assert!(collides_with(Position::new(4, 5), body.iter().skip(1)));
        assert!(!collides_with(Position::new(4, 4), body.iter().skip(1)));
    }
}
