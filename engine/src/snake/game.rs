use std::collections::HashSet;
use std::time::Duration;

use crate::config::Validate;
use crate::events::{GameEvent, GameEventListener};
use crate::log;
use crate::persistence::{
    GAME_MODE_KEY, GRID_SIZE_KEY, HIGH_SCORE_KEY, MUTED_KEY, PreferenceStore, Preferences,
    save_preference,
};
use crate::session_rng::SessionRng;
use super::collision::collides_with;
use super::entity::{INITIAL_SNAKE_LENGTH, Snake};
use super::food::place_food;
use super::geometry::{grid_center, is_out_of_bounds, next_position};
use super::input::{InputIntent, resolve_key, resolve_swipe};
use super::settings::{FOOD_REWARD, GameSettings};
use super::types::{DeathReason, Direction, GameMode, GameStatus, GridSize, Player, Position};

/// What a call to [`SnakeGame::tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not playing; nothing changed.
    Skipped,
    /// Every snake moved. `eaters` lists the players that ate this tick.
    Moved { eaters: Vec<Player> },
    /// At least one snake died; no snake moved.
    GameOver { winner: Option<Player> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnakeSnapshot {
    pub player: Player,
    pub segments: Vec<Position>,
    pub direction: Direction,
    pub score: u32,
    pub death_reason: Option<DeathReason>,
}

/// Read-only view handed to rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub grid_size: GridSize,
    pub dimension: i32,
    pub mode: GameMode,
    pub snakes: Vec<SnakeSnapshot>,
    pub food: Option<Position>,
    pub high_score: u32,
    pub winner: Option<Player>,
    pub muted: bool,
    pub tick_interval: Duration,
    pub tick_count: u64,
}

/// The whole simulation: snakes, food, scores and the status machine.
///
/// Mutation happens only through `&mut self`, so a host that shares the game
/// between its tick loop and its input path has to serialize access (the
/// tick loop in this crate uses a `tokio::sync::Mutex`).
pub struct SnakeGame<P: PreferenceStore, E: GameEventListener> {
    snakes: Vec<Snake>,
    food: Option<Position>,
    status: GameStatus,
    grid_size: GridSize,
    mode: GameMode,
    winner: Option<Player>,
    high_score: u32,
    muted: bool,
    settings: GameSettings,
    tick_count: u64,
    rng: SessionRng,
    store: P,
    listener: E,
}

impl<P: PreferenceStore, E: GameEventListener> SnakeGame<P, E> {
    pub fn new(settings: GameSettings, store: P, listener: E, rng: SessionRng) -> Self {
        let preferences = Preferences::load(&store);
        log!(
            "Loaded preferences: grid {}, mode {}, high score {}, muted {}",
            preferences.grid_size,
            preferences.mode,
            preferences.high_score,
            preferences.muted
        );

        let mut game = Self {
            snakes: Vec::new(),
            food: None,
            status: GameStatus::Idle,
            grid_size: preferences.grid_size,
            mode: preferences.mode,
            winner: None,
            high_score: preferences.high_score,
            muted: preferences.muted,
            settings,
            tick_count: 0,
            rng,
            store,
            listener,
        };
        game.init_round();
        game
    }

    pub fn start_game(&mut self) {
        if !matches!(self.status, GameStatus::Idle | GameStatus::GameOver) {
            return;
        }
        self.init_round();
        self.status = GameStatus::Playing;
        log!("Game started ({}, {})", self.mode, self.grid_size);
    }

    pub fn pause_game(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
        }
    }

    pub fn resume_game(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
        }
    }

    pub fn reset_game(&mut self) {
        self.init_round();
        self.status = GameStatus::Idle;
    }

    /// Only allowed between games; resets the board to `Idle`.
    pub fn change_grid_size(&mut self, grid_size: GridSize) {
        if !self.between_games() {
            return;
        }
        self.grid_size = grid_size;
        save_preference(&self.store, GRID_SIZE_KEY, grid_size.as_str());
        self.reset_game();
        log!("Grid size changed to {}", grid_size);
    }

    /// Only allowed between games; resets the board to `Idle`.
    pub fn toggle_two_player(&mut self) {
        if !self.between_games() {
            return;
        }
        self.mode = self.mode.toggled();
        save_preference(&self.store, GAME_MODE_KEY, self.mode.as_str());
        self.reset_game();
        log!("Game mode changed to {}", self.mode);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        save_preference(&self.store, MUTED_KEY, &self.muted.to_string());
    }

    pub fn set_tick_interval_ms(&mut self, tick_interval_ms: u32) -> Result<(), String> {
        let settings = GameSettings { tick_interval_ms };
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Buffers the next direction for `player`. Returns `false` when the
    /// request is dropped: not playing, no such snake, or a 180° reversal of
    /// the committed direction.
    pub fn submit_direction(&mut self, player: Player, direction: Direction) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let Some(snake) = self.snakes.get_mut(player.index()) else {
            return false;
        };
        if direction.is_opposite(&snake.direction) {
            return false;
        }
        snake.pending_direction = Some(direction);
        true
    }

    /// A finished swipe starts a new game from `Idle`/`GameOver`; while
    /// playing it steers `player`.
    pub fn submit_swipe(&mut self, player: Player, dx: f32, dy: f32) -> bool {
        match self.status {
            GameStatus::Idle | GameStatus::GameOver => {
                self.start_game();
                true
            }
            GameStatus::Playing => match resolve_swipe(dx, dy) {
                Some(direction) => self.submit_direction(player, direction),
                None => false,
            },
            GameStatus::Paused => false,
        }
    }

    pub fn apply_intent(&mut self, intent: InputIntent) -> bool {
        match intent {
            InputIntent::Turn { player, direction } => self.submit_direction(player, direction),
            InputIntent::Key(key) => {
                let (player, direction) = resolve_key(key, self.mode);
                self.submit_direction(player, direction)
            }
            InputIntent::Swipe { player, dx, dy } => self.submit_swipe(player, dx, dy),
        }
    }

    /// Advances every snake by one cell.
    ///
    /// Candidate heads are computed from one snapshot of all snakes and every
    /// collision is judged against that snapshot before anything moves, so
    /// the outcome does not depend on which snake is processed first.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return TickOutcome::Skipped;
        }

        for snake in &mut self.snakes {
            snake.commit_direction();
        }

        let candidates: Vec<Position> = self
            .snakes
            .iter()
            .map(|snake| next_position(snake.head(), snake.direction))
            .collect();

        let deaths: Vec<Option<DeathReason>> = (0..self.snakes.len())
            .map(|index| self.death_reason(index, &candidates))
            .collect();

        if deaths.iter().any(Option::is_some) {
            return self.finish(&deaths, &candidates);
        }

        let food = self.food;
        let mut eaters = Vec::new();
        for (index, head) in candidates.into_iter().enumerate() {
            let grow = Some(head) == food;
            self.snakes[index].advance(head, grow);
            if grow {
                eaters.push(self.players()[index]);
            }
        }

        for player in &eaters {
            let snake = &mut self.snakes[player.index()];
            snake.score += FOOD_REWARD;
            let score = snake.score;
            log!("[{}] ate food at {}. Score: {}", player, snake.head(), score);
            self.record_score(score);
            self.notify(GameEvent::FoodEaten);
        }

        if !eaters.is_empty() {
            self.food = place_food(&self.occupied(), self.dimension(), &mut self.rng);
        }

        self.tick_count += 1;
        TickOutcome::Moved { eaters }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub fn dimension(&self) -> i32 {
        self.grid_size.dimension()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn snake(&self, player: Player) -> Option<&Snake> {
        self.snakes.get(player.index())
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self, player: Player) -> u32 {
        self.snake(player).map_or(0, |snake| snake.score)
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.tick_interval()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let snakes = self
            .snakes
            .iter()
            .zip(self.players())
            .map(|(snake, player)| SnakeSnapshot {
                player: *player,
                segments: snake.body.iter().copied().collect(),
                direction: snake.direction,
                score: snake.score,
                death_reason: snake.death_reason,
            })
            .collect();

        GameSnapshot {
            status: self.status,
            grid_size: self.grid_size,
            dimension: self.dimension(),
            mode: self.mode,
            snakes,
            food: self.food,
            high_score: self.high_score,
            winner: self.winner,
            muted: self.muted,
            tick_interval: self.tick_interval(),
            tick_count: self.tick_count,
        }
    }

    fn players(&self) -> &'static [Player] {
        self.mode.players()
    }

    fn between_games(&self) -> bool {
        matches!(self.status, GameStatus::Idle | GameStatus::GameOver)
    }

    fn init_round(&mut self) {
        let dimension = self.dimension();
        let center = grid_center(dimension);

        self.snakes = self
            .players()
            .iter()
            .map(|player| match player {
                Player::P1 => Snake::new(
                    Position::new(center, center - 1),
                    Direction::Right,
                    INITIAL_SNAKE_LENGTH,
                ),
                Player::P2 => Snake::new(
                    Position::new(center, center + 1),
                    Direction::Left,
                    INITIAL_SNAKE_LENGTH,
                ),
            })
            .collect();
        self.winner = None;
        self.tick_count = 0;
        self.food = place_food(&self.occupied(), dimension, &mut self.rng);
    }

    fn occupied(&self) -> HashSet<Position> {
        self.snakes
            .iter()
            .flat_map(|snake| snake.body.iter().copied())
            .collect()
    }

    fn death_reason(&self, index: usize, candidates: &[Position]) -> Option<DeathReason> {
        let snake = &self.snakes[index];
        let head = candidates[index];

        if is_out_of_bounds(head, self.dimension()) {
            return Some(DeathReason::WallCollision);
        }

        let growing = Some(head) == self.food;
        if collides_with(head, snake.self_hazard(growing)) {
            return Some(DeathReason::SelfCollision);
        }

        for (other_index, other) in self.snakes.iter().enumerate() {
            if other_index == index {
                continue;
            }
            if collides_with(head, &other.body) {
                return Some(DeathReason::OtherSnakeCollision);
            }
            if candidates[other_index] == head {
                return Some(DeathReason::HeadOnCollision);
            }
        }

        None
    }

    fn finish(&mut self, deaths: &[Option<DeathReason>], candidates: &[Position]) -> TickOutcome {
        let players = self.players();
        for ((snake, death), player) in self.snakes.iter_mut().zip(deaths).zip(players) {
            if let Some(reason) = death {
                snake.death_reason = Some(*reason);
                log!("[{}] died: {:?} at {}", player, reason, candidates[player.index()]);
            }
        }

        let dead: Vec<Player> = players
            .iter()
            .zip(deaths)
            .filter(|(_, death)| death.is_some())
            .map(|(player, _)| *player)
            .collect();

        self.winner = match (self.mode, dead.as_slice()) {
            (GameMode::TwoPlayer, [loser]) => Some(loser.other()),
            _ => None,
        };
        self.status = GameStatus::GameOver;
        log!("Game over after {} ticks. Winner: {:?}", self.tick_count, self.winner);
        self.notify(GameEvent::GameOver);

        TickOutcome::GameOver {
            winner: self.winner,
        }
    }

    fn record_score(&mut self, score: u32) {
        if score > self.high_score {
            self.high_score = score;
            save_preference(&self.store, HIGH_SCORE_KEY, &score.to_string());
        }
    }

    /// Listeners hear every event. Muting is theirs to honor through
    /// [`GameSnapshot::muted`].
    fn notify(&mut self, event: GameEvent) {
        self.listener.on_event(event);
    }

    #[cfg(test)]
    fn set_snake(&mut self, player: Player, segments: &[Position], direction: Direction) {
        self.snakes[player.index()] = Snake::from_segments(segments.iter().copied(), direction)
            .expect("test snake needs at least one segment");
    }

    #[cfg(test)]
    fn set_food(&mut self, food: Option<Position>) {
        self.food = food;
    }
}
