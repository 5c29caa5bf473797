pub mod collision;
pub mod entity;
pub mod food;
pub mod game;
pub mod geometry;
pub mod input;
pub mod settings;
pub mod types;

pub use collision::collides_with;
pub use entity::{INITIAL_SNAKE_LENGTH, Snake};
pub use food::place_food;
pub use game::{GameSnapshot, SnakeGame, SnakeSnapshot, TickOutcome};
pub use geometry::{is_out_of_bounds, next_position};
pub use input::{InputIntent, Key, SWIPE_THRESHOLD, resolve_key, resolve_swipe};
pub use settings::{FOOD_REWARD, GameSettings};
pub use types::{DeathReason, Direction, GameMode, GameStatus, GridSize, Player, Position};
