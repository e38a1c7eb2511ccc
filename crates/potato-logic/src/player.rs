//! Players: an identity bound to one strategy

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::Strategy;

pub type PlayerId = u32;

/// A participant in the game
///
/// Identity and equality are by `id` only. Deserializing goes through
/// `Player::new`, so a stored trace cannot smuggle in bad parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawPlayer")]
pub struct Player {
    id: PlayerId,
    strategy: Strategy,
}

#[derive(Deserialize)]
struct RawPlayer {
    id: PlayerId,
    strategy: Strategy,
}

impl TryFrom<RawPlayer> for Player {
    type Error = ConfigError;

    fn try_from(raw: RawPlayer) -> Result<Self, Self::Error> {
        Player::new(raw.id, raw.strategy)
    }
}

impl Player {
    /// Create a player, rejecting out-of-range strategy parameters
    pub fn new(id: PlayerId, strategy: Strategy) -> Result<Self, ConfigError> {
        strategy.validate()?;
        Ok(Self { id, strategy })
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.strategy.name(), self.id)
    }
}
