use tokio::sync::mpsc::UnboundedSender;

use crate::log;

/// Moments the audio side reacts to. No payload; the kind is the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten,
    GameOver,
}

/// Called synchronously from inside the tick that produced the event.
pub trait GameEventListener {
    fn on_event(&mut self, event: GameEvent);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventListener;

impl GameEventListener for NoopEventListener {
    fn on_event(&mut self, _event: GameEvent) {}
}

/// Forwards events to an async consumer. A closed receiver is logged and
/// otherwise ignored.
#[derive(Clone, Debug)]
pub struct ChannelEventListener {
    sender: UnboundedSender<GameEvent>,
}

impl ChannelEventListener {
    pub fn new(sender: UnboundedSender<GameEvent>) -> Self {
        Self { sender }
    }
}

impl GameEventListener for ChannelEventListener {
    fn on_event(&mut self, event: GameEvent) {
        if self.sender.send(event).is_err() {
            log!("Event receiver dropped, {:?} not delivered", event);
        }
    }
}
