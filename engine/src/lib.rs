//! Deterministic simulation core for a grid snake game.
//!
//! The crate owns the rules (movement, collisions, food, scoring and the
//! game status machine) and a fixed-step tick driver. Rendering, audio and
//! the storage medium for preferences live with the host, which plugs in
//! through [`persistence::PreferenceStore`] and [`events::GameEventListener`].

pub mod config;
pub mod driver;
pub mod events;
pub mod logger;
pub mod persistence;
pub mod session_rng;
pub mod snake;

pub use driver::{TickDriver, TickLoop};
pub use events::{ChannelEventListener, GameEvent, GameEventListener, NoopEventListener};
pub use persistence::{
    InMemoryPreferenceStore, PreferenceError, PreferenceStore, Preferences,
    YamlFilePreferenceStore,
};
pub use session_rng::SessionRng;
