use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use snake_engine::SessionRng;
use snake_engine::snake::{Direction, GameSnapshot, Player, Position, is_out_of_bounds, next_position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    Efficient,
    Random,
}

pub struct BotController;

impl BotController {
    pub fn calculate_move(
        kind: BotKind,
        player: Player,
        snapshot: &GameSnapshot,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        match kind {
            BotKind::Efficient => Self::efficient_pathfinding(player, snapshot, rng),
            BotKind::Random => Self::random_valid_move(player, snapshot, rng),
        }
    }

    fn efficient_pathfinding(
        player: Player,
        snapshot: &GameSnapshot,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        let snake = snapshot.snakes.iter().find(|s| s.player == player)?;
        let head = *snake.segments.first()?;
        let Some(food) = snapshot.food else {
            return Self::random_valid_move(player, snapshot, rng);
        };

        let best = Self::valid_directions(snake.direction)
            .into_iter()
            .filter(|dir| Self::is_safe_position(next_position(head, *dir), player, snapshot))
            .min_by_key(|dir| Self::manhattan_distance(next_position(head, *dir), food));

        best.or_else(|| Self::random_valid_move(player, snapshot, rng))
    }

    fn random_valid_move(
        player: Player,
        snapshot: &GameSnapshot,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        let snake = snapshot.snakes.iter().find(|s| s.player == player)?;
        let head = *snake.segments.first()?;

        let safe_directions: Vec<Direction> = Self::valid_directions(snake.direction)
            .into_iter()
            .filter(|dir| Self::is_safe_position(next_position(head, *dir), player, snapshot))
            .collect();

        if safe_directions.is_empty() {
            Some(snake.direction)
        } else {
            let idx = rng.random_range(0..safe_directions.len());
            Some(safe_directions[idx])
        }
    }

    fn valid_directions(current: Direction) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(&current))
            .collect()
    }

    fn manhattan_distance(a: Position, b: Position) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    /// Own tail is treated as free because it moves away this tick, unless
    /// the move eats and the snake keeps its tail.
    fn is_safe_position(pos: Position, player: Player, snapshot: &GameSnapshot) -> bool {
        if is_out_of_bounds(pos, snapshot.dimension) {
            return false;
        }

        let growing = snapshot.food == Some(pos);
        snapshot.snakes.iter().all(|snake| {
            let cells = if snake.player == player && !growing {
                &snake.segments[..snake.segments.len().saturating_sub(1)]
            } else {
                &snake.segments[..]
            };
            !cells.contains(&pos)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_engine::snake::{GameMode, GameStatus, GridSize, SnakeSnapshot};
    use std::time::Duration;

    fn snapshot(segments: Vec<Position>, direction: Direction, food: Option<Position>) -> GameSnapshot {
        GameSnapshot {
            status: GameStatus::Playing,
            grid_size: GridSize::Small,
            dimension: 15,
            mode: GameMode::Single,
            snakes: vec![SnakeSnapshot {
                player: Player::P1,
                segments,
                direction,
                score: 0,
                death_reason: None,
            }],
            food,
            high_score: 0,
            winner: None,
            muted: false,
            tick_interval: Duration::from_millis(150),
            tick_count: 0,
        }
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_efficient_bot_heads_for_food() {
        let mut rng = SessionRng::new(1);
        let state = snapshot(vec![p(5, 5), p(4, 5), p(3, 5)], Direction::Right, Some(p(5, 1)));
        assert_eq!(
            BotController::calculate_move(BotKind::Efficient, Player::P1, &state, &mut rng),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_efficient_bot_avoids_wall() {
        let mut rng = SessionRng::new(1);
        let state = snapshot(vec![p(14, 5), p(13, 5), p(12, 5)], Direction::Right, Some(p(14, 14)));
        assert_eq!(
            BotController::calculate_move(BotKind::Efficient, Player::P1, &state, &mut rng),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_random_bot_only_picks_safe_moves() {
        let mut rng = SessionRng::new(9);
        // Boxed in on the right and below; only Up is safe.
        let state = snapshot(
            vec![p(14, 14), p(13, 14), p(13, 13), p(12, 13)],
            Direction::Right,
            None,
        );
        for _ in 0..20 {
            assert_eq!(
                BotController::calculate_move(BotKind::Random, Player::P1, &state, &mut rng),
                Some(Direction::Up)
            );
        }
    }

    #[test]
    fn test_tail_is_blocked_when_the_move_eats() {
        let mut rng = SessionRng::new(1);
        let coiled = vec![p(5, 5), p(5, 6), p(6, 6), p(6, 5)];

        let state = snapshot(coiled.clone(), Direction::Up, Some(p(6, 5)));
        for kind in [BotKind::Efficient, BotKind::Random] {
            let choice = BotController::calculate_move(kind, Player::P1, &state, &mut rng);
            assert!(matches!(choice, Some(Direction::Up | Direction::Left)));
        }

        let state = snapshot(coiled, Direction::Up, Some(p(9, 5)));
        assert_eq!(
            BotController::calculate_move(BotKind::Efficient, Player::P1, &state, &mut rng),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_missing_player_yields_none() {
        let mut rng = SessionRng::new(1);
        let state = snapshot(vec![p(5, 5)], Direction::Right, None);
        assert_eq!(
            BotController::calculate_move(BotKind::Efficient, Player::P2, &state, &mut rng),
            None
        );
    }
}
