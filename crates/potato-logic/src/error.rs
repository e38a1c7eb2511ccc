//! Error types

use thiserror::Error;

use crate::player::PlayerId;

/// Fatal configuration errors raised while building a game
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown strategy variant tag {0} (expected 1..=9)")]
    UnknownVariant(u8),

    #[error("{variant} player is missing parameter `{param}`")]
    MissingParam {
        variant: &'static str,
        param: &'static str,
    },

    #[error("parameter `{param}` out of range (got {value})")]
    OutOfRange { param: &'static str, value: f64 },

    #[error("potato {field} must be a non-negative number (got {value})")]
    NegativePotato { field: &'static str, value: f64 },

    #[error("player id {0} appears more than once")]
    DuplicateId(PlayerId),

    #[error("homogeneous game requires every player to share one strategy")]
    MixedPopulation,

    #[error("invalid game config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected mutation of a `GameStatus`
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("player {0} is not in the active population")]
    NotActive(PlayerId),

    #[error("game already ended")]
    Ended,
}
