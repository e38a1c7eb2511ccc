//! Construction boundary: turning raw configuration into a `Game`

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::Game;
use crate::player::{Player, PlayerId};
use crate::potato::Potato;
use crate::strategy::{Strategy, STRATEGY_MENU};

/// Potato parameters as supplied by a front-end
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PotatoConfig {
    pub lifetime: u32,
    pub base_gain: f64,
    pub base_loss: f64,
}

impl PotatoConfig {
    pub fn validate(&self) -> Result<Potato, ConfigError> {
        check_non_negative("base_gain", self.base_gain)?;
        check_non_negative("base_loss", self.base_loss)?;
        Ok(Potato::new(self.lifetime, self.base_gain, self.base_loss))
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativePotato { field, value })
    }
}

/// One player as supplied by a front-end: a variant tag (see
/// `STRATEGY_MENU`) plus whichever parameters that variant needs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub variant: u8,
    pub id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prob: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altruism: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_alter_belief: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alter_accept_belief: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_to_risk: Option<f64>,
}

impl PlayerSpec {
    pub fn new(variant: u8, id: PlayerId) -> Self {
        Self { variant, id, ..Default::default() }
    }

    /// Resolve the tag into a strategy
    pub fn strategy(&self) -> Result<Strategy, ConfigError> {
        let variant = STRATEGY_MENU
            .get((self.variant as usize).wrapping_sub(1))
            .map(|info| info.name)
            .ok_or(ConfigError::UnknownVariant(self.variant))?;
        let need = |param: &'static str, value: Option<f64>| {
            value.ok_or(ConfigError::MissingParam { variant, param })
        };

        let strategy = match self.variant {
            1 => Strategy::Rational,
            2 => Strategy::Gullible,
            3 => Strategy::Barnum { prob: need("prob", self.prob)? },
            4 => Strategy::Myopic {
                threshold: self
                    .threshold
                    .ok_or(ConfigError::MissingParam { variant, param: "threshold" })?,
            },
            5 => Strategy::Stochastic { weight: need("weight", self.weight)? },
            6 => Strategy::DirectAltruist {
                altruism: need("altruism", self.altruism)?,
                help_alter_belief: need("help_alter_belief", self.help_alter_belief)?,
            },
            7 => Strategy::Benthamite {
                alter_accept_belief: need("alter_accept_belief", self.alter_accept_belief)?,
            },
            8 => Strategy::Coalitional {
                acceptance_to_risk: need("acceptance_to_risk", self.acceptance_to_risk)?,
            },
            9 => Strategy::Input,
            other => return Err(ConfigError::UnknownVariant(other)),
        };
        Ok(strategy)
    }

    pub fn to_player(&self) -> Result<Player, ConfigError> {
        Player::new(self.id, self.strategy()?)
    }
}

/// Whether a game may mix strategy variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    /// Every player shares one variant
    Homogeneous,
    #[default]
    Mixed,
}

/// Complete game configuration, as read from JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub potato: PotatoConfig,
    pub players: Vec<PlayerSpec>,
    #[serde(default)]
    pub kind: GameKind,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn build(&self) -> Result<Game, ConfigError> {
        if self.kind == GameKind::Homogeneous {
            if let Some(first) = self.players.first() {
                if self.players.iter().any(|p| p.variant != first.variant) {
                    return Err(ConfigError::MixedPopulation);
                }
            }
        }
        build_game(self.potato, &self.players)
    }
}

/// Build a game from a potato config and player specs, in seating order
///
/// Any invalid tag, missing or out-of-range parameter, or repeated id is
/// a fatal error; nothing is retried here.
pub fn build_game(potato: PotatoConfig, players: &[PlayerSpec]) -> Result<Game, ConfigError> {
    let potato = potato.validate()?;

    let mut seen = HashSet::with_capacity(players.len());
    let players = players
        .iter()
        .map(|spec| {
            if !seen.insert(spec.id) {
                return Err(ConfigError::DuplicateId(spec.id));
            }
            spec.to_player()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Game::new(potato, players))
}
