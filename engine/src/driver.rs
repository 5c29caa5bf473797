use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};

use crate::events::GameEventListener;
use crate::log;
use crate::persistence::PreferenceStore;
use crate::snake::{GameStatus, SnakeGame, TickOutcome};

/// Decides when the next fixed-step tick is due, independent of how often
/// it is polled.
#[derive(Clone, Debug)]
pub struct TickDriver {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl TickDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns `true` when a tick should run now.
    ///
    /// While `running` is false the last timestamp is forgotten, so the first
    /// poll after a resume only re-arms the driver. After firing the
    /// reference point moves forward by one interval, keeping any leftover;
    /// if that still leaves a full interval of backlog it snaps to `now`
    /// instead of firing a burst.
    pub fn poll(&mut self, now: Instant, running: bool) -> bool {
        if !running {
            self.last_fired = None;
            return false;
        }

        let Some(last_fired) = self.last_fired else {
            self.last_fired = Some(now);
            return false;
        };

        if now.saturating_duration_since(last_fired) < self.interval {
            return false;
        }

        let next = last_fired + self.interval;
        self.last_fired = if now.saturating_duration_since(next) >= self.interval {
            Some(now)
        } else {
            Some(next)
        };
        true
    }
}

/// Background task that polls a [`TickDriver`] every `frame` and ticks the
/// shared game when it fires.
pub struct TickLoop {
    handle: Option<JoinHandle<()>>,
}

impl TickLoop {
    /// The tick interval is re-read from the game on every frame, so it can
    /// change while the loop runs. Outcomes are forwarded to `outcomes` when
    /// a sender is given.
    pub fn spawn<P, E>(
        game: Arc<Mutex<SnakeGame<P, E>>>,
        frame: Duration,
        outcomes: Option<UnboundedSender<TickOutcome>>,
    ) -> Self
    where
        P: PreferenceStore + Send + 'static,
        E: GameEventListener + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut frames = interval(frame);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut driver = TickDriver::new(game.lock().await.tick_interval());

            loop {
                frames.tick().await;

                let mut state = game.lock().await;
                driver.set_interval(state.tick_interval());
                let running = state.status() == GameStatus::Playing;
                if !driver.poll(Instant::now(), running) {
                    continue;
                }

                let outcome = state.tick();
                drop(state);

                if let Some(ref sender) = outcomes
                    && sender.send(outcome).is_err()
                {
                    log!("Tick outcome receiver dropped");
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Safe to call any number of times.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoopEventListener;
    use crate::persistence::InMemoryPreferenceStore;
    use crate::session_rng::SessionRng;
    use crate::snake::GameSettings;
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    const INTERVAL: Duration = Duration::from_millis(150);

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_first_poll_only_arms() {
        let start = Instant::now();
        let mut driver = TickDriver::new(INTERVAL);
        assert!(!driver.poll(start, true));
        assert!(!driver.poll(start + ms(149), true));
        assert!(driver.poll(start + ms(150), true));
    }

    #[test]
    fn test_fires_once_per_interval_regardless_of_poll_rate() {
        let start = Instant::now();
        let mut driver = TickDriver::new(INTERVAL);
        driver.poll(start, true);

        let fired = (1..=100)
            .filter(|frame| driver.poll(start + ms(frame * 16), true))
            .count();
        // 1600ms of 16ms frames at 150ms per tick.
        assert_eq!(fired, 10);
    }

    #[test]
    fn test_leftover_time_is_kept() {
        let start = Instant::now();
        let mut driver = TickDriver::new(INTERVAL);
        driver.poll(start, true);
        assert!(driver.poll(start + ms(170), true));
        // Next reference point is 150, not 170.
        assert!(driver.poll(start + ms(300), true));
    }

    #[test]
    fn test_long_stall_does_not_burst() {
        let start = Instant::now();
        let mut driver = TickDriver::new(INTERVAL);
        driver.poll(start, true);
        assert!(driver.poll(start + ms(1000), true));
        assert!(!driver.poll(start + ms(1001), true));
        assert!(driver.poll(start + ms(1150), true));
    }

    #[test]
    fn test_stopping_clears_timestamp() {
        let start = Instant::now();
        let mut driver = TickDriver::new(INTERVAL);
        driver.poll(start, true);
        assert!(!driver.poll(start + ms(100), false));
        assert!(!driver.poll(start + ms(5000), true));
        assert!(!driver.poll(start + ms(5100), true));
        assert!(driver.poll(start + ms(5150), true));
    }

    #[test]
    fn test_interval_change_applies_to_next_poll() {
        let start = Instant::now();
        let mut driver = TickDriver::new(INTERVAL);
        driver.poll(start, true);
        driver.set_interval(ms(60));
        assert!(driver.poll(start + ms(60), true));
        assert_eq!(driver.interval(), ms(60));
    }

    fn shared_game() -> Arc<Mutex<SnakeGame<InMemoryPreferenceStore, NoopEventListener>>> {
        let mut game = SnakeGame::new(
            GameSettings::default(),
            InMemoryPreferenceStore::new(),
            NoopEventListener,
            SessionRng::new(17),
        );
        game.start_game();
        Arc::new(Mutex::new(game))
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_ticks_at_fixed_rate() {
        let game = shared_game();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tick_loop = TickLoop::spawn(game.clone(), ms(10), Some(tx));

        sleep(ms(1000)).await;
        let ticks = game.lock().await.tick_count();
        assert!((5..=7).contains(&ticks), "unexpected tick count {}", ticks);
        assert!(matches!(rx.try_recv(), Ok(TickOutcome::Moved { .. })));

        tick_loop.stop();
        assert!(!tick_loop.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks_and_resume_does_not_catch_up() {
        let game = shared_game();
        let _tick_loop = TickLoop::spawn(game.clone(), ms(10), None);

        sleep(ms(320)).await;
        game.lock().await.pause_game();
        let paused_at = game.lock().await.tick_count();

        sleep(ms(2000)).await;
        assert_eq!(game.lock().await.tick_count(), paused_at);

        game.lock().await.resume_game();
        sleep(ms(100)).await;
        assert_eq!(game.lock().await.tick_count(), paused_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let game = shared_game();
        let mut tick_loop = TickLoop::spawn(game.clone(), ms(10), None);
        tick_loop.stop();
        tick_loop.stop();

        sleep(ms(1000)).await;
        assert_eq!(game.lock().await.tick_count(), 0);
    }
}
