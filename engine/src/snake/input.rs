use super::types::{Direction, GameMode, Player};

/// Minimum dominant-axis travel, in input units, for a swipe to count.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Decoded keyboard keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
}

impl Key {
    /// Accepts browser-style key names (`"ArrowUp"`) and WASD in either case.
    pub fn parse(name: &str) -> Option<Key> {
        match name {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "w" | "W" => Some(Key::W),
            "a" | "A" => Some(Key::A),
            "s" | "S" => Some(Key::S),
            "d" | "D" => Some(Key::D),
            _ => None,
        }
    }

    fn is_arrow(&self) -> bool {
        matches!(self, Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight)
    }

    fn direction(&self) -> Direction {
        match self {
            Key::ArrowUp | Key::W => Direction::Up,
            Key::ArrowDown | Key::S => Direction::Down,
            Key::ArrowLeft | Key::A => Direction::Left,
            Key::ArrowRight | Key::D => Direction::Right,
        }
    }
}

/// Both key sets steer P1 alone; with two players, WASD is P1 and the
/// arrows are P2.
pub fn resolve_key(key: Key, mode: GameMode) -> (Player, Direction) {
    let player = match mode {
        GameMode::TwoPlayer if key.is_arrow() => Player::P2,
        _ => Player::P1,
    };
    (player, key.direction())
}

/// Classifies a swipe by its dominant axis. Ties count as vertical. `+y`
/// points down the screen.
pub fn resolve_swipe(dx: f32, dy: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx.abs() > SWIPE_THRESHOLD {
            return Some(if dx > 0.0 { Direction::Right } else { Direction::Left });
        }
    } else if dy.abs() > SWIPE_THRESHOLD {
        return Some(if dy > 0.0 { Direction::Down } else { Direction::Up });
    }
    None
}

/// Input as it arrives from a transport, applied by `SnakeGame::apply_intent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputIntent {
    Turn { player: Player, direction: Direction },
    Key(Key),
    Swipe { player: Player, dx: f32, dy: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::parse("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::parse("W"), Some(Key::W));
        assert_eq!(Key::parse("d"), Some(Key::D));
        assert_eq!(Key::parse("x"), None);
        assert_eq!(Key::parse("arrowup"), None);
    }

    #[test]
    fn test_single_player_keys_all_steer_p1() {
        assert_eq!(resolve_key(Key::ArrowUp, GameMode::Single), (Player::P1, Direction::Up));
        assert_eq!(resolve_key(Key::S, GameMode::Single), (Player::P1, Direction::Down));
    }

    #[test]
    fn test_two_player_key_split() {
        assert_eq!(resolve_key(Key::A, GameMode::TwoPlayer), (Player::P1, Direction::Left));
        assert_eq!(resolve_key(Key::ArrowRight, GameMode::TwoPlayer), (Player::P2, Direction::Right));
    }

    #[test]
    fn test_swipe_dominant_axis() {
        assert_eq!(resolve_swipe(80.0, 10.0), Some(Direction::Right));
        assert_eq!(resolve_swipe(-80.0, 40.0), Some(Direction::Left));
        assert_eq!(resolve_swipe(5.0, 31.0), Some(Direction::Down));
        assert_eq!(resolve_swipe(5.0, -31.0), Some(Direction::Up));
    }

    #[test]
    fn test_short_swipes_are_ignored() {
        assert_eq!(resolve_swipe(30.0, 0.0), None);
        assert_eq!(resolve_swipe(0.0, -29.5), None);
        assert_eq!(resolve_swipe(0.0, 0.0), None);
    }

    #[test]
    fn test_diagonal_tie_counts_as_vertical() {
        assert_eq!(resolve_swipe(50.0, 50.0), Some(Direction::Down));
        assert_eq!(resolve_swipe(50.0, -50.0), Some(Direction::Up));
    }
}
