mod bot_controller;
mod runner_config;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use clap::Parser;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use snake_engine::config::Validate;
use snake_engine::snake::{GameMode, GridSize, InputIntent, SnakeGame, TickOutcome};
use snake_engine::{
    ChannelEventListener, GameEvent, GameEventListener, PreferenceStore, SessionRng, TickLoop,
    YamlFilePreferenceStore, log, logger,
};

use bot_controller::{BotController, BotKind};
use runner_config::{RunnerConfig, default_config_path, get_config_manager};

const FRAME: Duration = Duration::from_millis(16);

type RunnerGame = SnakeGame<YamlFilePreferenceStore, ChannelEventListener>;

/// An intent tagged with the game it was decided for.
struct RoundIntent {
    round: u32,
    intent: InputIntent,
}

/// Applies queued intents to the shared game. Intents from an earlier round
/// than `current_round` are dropped, so a finished game cannot steer the next.
fn spawn_intent_pump<P, E>(
    game: Arc<Mutex<SnakeGame<P, E>>>,
    mut intents: mpsc::UnboundedReceiver<RoundIntent>,
    current_round: Arc<AtomicU32>,
) -> JoinHandle<()>
where
    P: PreferenceStore + Send + 'static,
    E: GameEventListener + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(RoundIntent { round, intent }) = intents.recv().await {
            if round != current_round.load(Ordering::SeqCst) {
                continue;
            }
            game.lock().await.apply_intent(intent);
        }
    })
}

#[derive(Parser)]
#[command(name = "snake_runner", about = "Runs bot-driven snake games on the simulation core")]
struct Args {
    /// Path to the YAML config; defaults to snake_runner_config.yaml next to the binary
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    grid_size: Option<GridSize>,

    #[arg(long)]
    two_player: bool,

    #[arg(long)]
    tick_ms: Option<u32>,

    #[arg(long)]
    games: Option<u32>,

    #[arg(long, value_enum)]
    bot: Option<BotKind>,

    #[arg(long)]
    seed: Option<u64>,

    /// Preference file holding the high score and last used settings
    #[arg(long)]
    prefs: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

impl Args {
    fn apply_to(&self, mut config: RunnerConfig) -> RunnerConfig {
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if self.two_player {
            config.two_player = true;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(games) = self.games {
            config.games = games;
        }
        if let Some(bot) = self.bot {
            config.bot = bot;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(ref prefs) = self.prefs {
            config.preferences_file = prefs.clone();
        }
        config
    }
}

/// Asks the bot for every snake's next turn and queues the ones that change course.
async fn steer_bots(
    game: &Mutex<RunnerGame>,
    bot: BotKind,
    rng: &mut SessionRng,
    round: u32,
    intents: &mpsc::UnboundedSender<RoundIntent>,
) {
    let snapshot = game.lock().await.snapshot();
    for snake in &snapshot.snakes {
        if let Some(direction) = BotController::calculate_move(bot, snake.player, &snapshot, rng)
            && direction != snake.direction
        {
            let intent = InputIntent::Turn {
                player: snake.player,
                direction,
            };
            if intents.send(RoundIntent { round, intent }).is_err() {
                log!("Intent pump stopped, dropping turn for {}", snake.player);
            }
        }
    }
}

async fn log_scores(game: &Mutex<RunnerGame>) {
    let state = game.lock().await;
    for snake in state.snakes() {
        log!("  score: {}, length: {}, death: {:?}", snake.score, snake.len(), snake.death_reason);
    }
    log!("  high score: {}", state.high_score());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config_manager = get_config_manager(&config_path);
    let config = config_manager.get_or_create_config().or_else(|e| {
        log!("Could not create {}: {}", config_path, e);
        config_manager.get_config()
    })?;
    let config = args.apply_to(config);
    config.validate()?;
    log!("Loaded config from {}: {:?}", config_path, config);

    let game_rng = match config.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let mut bot_rng = SessionRng::new(game_rng.seed().wrapping_add(1));
    log!("Session seed: {}", game_rng.seed());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                GameEvent::FoodEaten => log!("Food eaten"),
                GameEvent::GameOver => log!("Game over"),
            }
        }
    });

    let store = YamlFilePreferenceStore::from_file(&config.preferences_file);
    let mut game = SnakeGame::new(
        config.game_settings(),
        store,
        ChannelEventListener::new(event_tx),
        game_rng,
    );
    if game.grid_size() != config.grid_size {
        game.change_grid_size(config.grid_size);
    }
    let wanted_mode = if config.two_player {
        GameMode::TwoPlayer
    } else {
        GameMode::Single
    };
    if game.mode() != wanted_mode {
        game.toggle_two_player();
    }
    game.set_tick_interval_ms(config.tick_interval_ms)?;
    log!("Starting with high score {}", game.high_score());

    let game = Arc::new(Mutex::new(game));

    let round = Arc::new(AtomicU32::new(0));
    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    spawn_intent_pump(game.clone(), intent_rx, round.clone());

    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let mut tick_loop = TickLoop::spawn(game.clone(), FRAME, Some(outcome_tx));

    game.lock().await.start_game();
    steer_bots(&game, config.bot, &mut bot_rng, 0, &intent_tx).await;

    let mut games_finished = 0;
    let mut ticks_this_game = 0u64;

    loop {
        tokio::select! {
            outcome = outcome_rx.recv() => {
                let Some(outcome) = outcome else {
                    log!("Tick loop stopped unexpectedly");
                    break;
                };
                match outcome {
                    TickOutcome::Skipped => continue,
                    TickOutcome::Moved { .. } => {
                        ticks_this_game += 1;
                        if ticks_this_game < config.max_ticks_per_game {
                            steer_bots(&game, config.bot, &mut bot_rng, round.load(Ordering::SeqCst), &intent_tx).await;
                            continue;
                        }
                        games_finished += 1;
                        log!("Game {} hit the {} tick limit", games_finished, config.max_ticks_per_game);
                        log_scores(&game).await;
                        game.lock().await.reset_game();
                    }
                    TickOutcome::GameOver { winner } => {
                        games_finished += 1;
                        match winner {
                            Some(player) => log!("Game {} over after {} ticks, winner: {}", games_finished, ticks_this_game, player),
                            None => log!("Game {} over after {} ticks", games_finished, ticks_this_game),
                        }
                        log_scores(&game).await;
                    }
                }

                if games_finished >= config.games {
                    break;
                }
                ticks_this_game = 0;
                let next_round = round.fetch_add(1, Ordering::SeqCst) + 1;
                game.lock().await.start_game();
                steer_bots(&game, config.bot, &mut bot_rng, next_round, &intent_tx).await;
            }
            _ = tokio::signal::ctrl_c() => {
                log!("Shutdown signal received");
                break;
            }
        }
    }

    tick_loop.stop();
    log!("Finished {} games, high score {}", games_finished, game.lock().await.high_score());

    Ok(())
}
