//! Game logic for the Sequential Hot Potato Game
//!
//! A population of players is offered a decaying potato one at a time.
//! Each player accepts or declines according to a fixed strategy; the
//! engine records the acceptance chain and the payoffs until the potato
//! expires or nobody is left to pass it on to.
//!
//! This crate is compiled to:
//! - Native (for simulations and tests)
//! - WASM (for browser replay, behind the `wasm` feature)

mod config;
mod context;
mod error;
mod game;
mod player;
mod potato;
mod provider;
mod random;
mod status;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{build_game, GameConfig, GameKind, PlayerSpec, PotatoConfig};
pub use context::DecisionContext;
pub use error::{ConfigError, StatusError};
pub use game::{Game, GameResult, GameState, OfferRecord};
pub use player::{Player, PlayerId};
pub use potato::{Decay, Potato};
pub use provider::{DecisionProvider, FixedProvider, ScriptedProvider, INVALID_INPUT_MSG};
pub use random::SeededRng;
pub use status::{GameStatus, EMPTY_CHAIN};
pub use strategy::{describe_strategy, Decision, Strategy, StrategyInfo, STRATEGY_MENU};
