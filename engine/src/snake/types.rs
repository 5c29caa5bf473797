use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A grid cell. Coordinates are signed so that a head one step past the
/// border can still be represented and rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Screen-style delta: `y` grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Small, GridSize::Medium, GridSize::Large];

    /// Side length of the square play area in cells.
    pub fn dimension(&self) -> i32 {
        match self {
            GridSize::Small => 15,
            GridSize::Medium => 20,
            GridSize::Large => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GridSize::Small => "small",
            GridSize::Medium => "medium",
            GridSize::Large => "large",
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(GridSize::Small),
            "medium" => Ok(GridSize::Medium),
            "large" => Ok(GridSize::Large),
            other => Err(format!("Unknown grid size '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Single,
    TwoPlayer,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::TwoPlayer => "two_player",
        }
    }

    pub fn toggled(&self) -> GameMode {
        match self {
            GameMode::Single => GameMode::TwoPlayer,
            GameMode::TwoPlayer => GameMode::Single,
        }
    }

    pub fn players(&self) -> &'static [Player] {
        match self {
            GameMode::Single => &[Player::P1],
            GameMode::TwoPlayer => &[Player::P1, Player::P2],
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(GameMode::Single),
            "two_player" | "two-player" => Ok(GameMode::TwoPlayer),
            other => Err(format!("Unknown game mode '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub fn index(&self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    pub fn other(&self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::P1 => f.write_str("P1"),
            Player::P2 => f.write_str("P2"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    OtherSnakeCollision,
    HeadOnCollision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_pairs() {
        for direction in Direction::ALL {
            assert!(direction.is_opposite(&direction.opposite()));
            assert!(!direction.is_opposite(&direction));
        }
        assert!(!Direction::Up.is_opposite(&Direction::Left));
    }

    #[test]
    fn test_grid_size_names() {
        for size in GridSize::ALL {
            assert_eq!(size.as_str().parse::<GridSize>().unwrap(), size);
        }
        assert_eq!(" Large ".parse::<GridSize>().unwrap().dimension(), 30);
        assert!("huge".parse::<GridSize>().is_err());
        assert_eq!(GridSize::default(), GridSize::Medium);
    }

    #[test]
    fn test_game_mode_names() {
        assert_eq!("two_player".parse::<GameMode>().unwrap(), GameMode::TwoPlayer);
        assert_eq!(GameMode::Single.toggled(), GameMode::TwoPlayer);
        assert_eq!(GameMode::TwoPlayer.players(), &[Player::P1, Player::P2]);
    }
}
