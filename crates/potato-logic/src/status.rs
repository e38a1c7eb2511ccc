//! Bookkeeping for a single game run

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StatusError;
use crate::player::{Player, PlayerId};

/// Marker printed for an empty chain
pub const EMPTY_CHAIN: &str = "∅";

/// Status of a Sequential Hot Potato Game
///
/// `active_population` holds players who never got the potato, in seating
/// order. `chain` holds acceptors in acceptance order. `turn` counts
/// acceptances, so `turn == chain.len()` always holds. Once `game_ended`
/// is set nothing changes any more.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameStatus {
    active_population: Vec<Player>,
    chain: Vec<Player>,
    turn: u32,
    num_of_players: u32,
    total_payoff: f64,
    game_ended: bool,
    payoffs: BTreeMap<PlayerId, f64>,
}

impl GameStatus {
    pub fn new(players: Vec<Player>) -> Self {
        let payoffs = players.iter().map(|p| (p.id(), 0.0)).collect();
        Self {
            num_of_players: players.len() as u32,
            active_population: players,
            chain: Vec::new(),
            turn: 0,
            total_payoff: 0.0,
            game_ended: false,
            payoffs,
        }
    }

    pub fn active_population(&self) -> &[Player] {
        &self.active_population
    }

    pub fn chain(&self) -> &[Player] {
        &self.chain
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn num_of_players(&self) -> u32 {
        self.num_of_players
    }

    pub fn total_payoff(&self) -> f64 {
        self.total_payoff
    }

    pub fn game_ended(&self) -> bool {
        self.game_ended
    }

    /// Payoff accumulated by one player (0 for unknown ids)
    pub fn payoff_of(&self, id: PlayerId) -> f64 {
        self.payoffs.get(&id).copied().unwrap_or(0.0)
    }

    pub fn payoffs(&self) -> &BTreeMap<PlayerId, f64> {
        &self.payoffs
    }

    /// Whoever accepted last and currently holds the potato
    pub fn holder(&self) -> Option<&Player> {
        self.chain.last()
    }

    /// Move `player` from the active population to the end of the chain
    pub fn record_acceptance(&mut self, player: &Player) -> Result<(), StatusError> {
        if self.game_ended {
            return Err(StatusError::Ended);
        }
        let index = self
            .active_population
            .iter()
            .position(|p| p == player)
            .ok_or(StatusError::NotActive(player.id()))?;
        self.accept_at(index);
        Ok(())
    }

    /// Index-based acceptance used by the game loop, which already
    /// holds a valid index into the active population
    pub(crate) fn accept_at(&mut self, index: usize) {
        if self.game_ended {
            return;
        }
        debug_assert!(
            index < self.active_population.len(),
            "accept_at index {index} out of range for {} active players",
            self.active_population.len()
        );
        if index >= self.active_population.len() {
            return;
        }
        let player = self.active_population.remove(index);
        self.chain.push(player);
        self.turn += 1;
    }

    pub(crate) fn credit(&mut self, id: PlayerId, amount: f64) {
        if self.game_ended {
            return;
        }
        *self.payoffs.entry(id).or_insert(0.0) += amount;
        self.total_payoff += amount;
    }

    pub(crate) fn end(&mut self) {
        self.game_ended = true;
    }

    /// Space-separated chain in acceptance order, or `∅` when empty
    pub fn chain_listing(&self) -> String {
        if self.chain.is_empty() {
            return EMPTY_CHAIN.to_string();
        }
        self.chain
            .iter()
            .map(Player::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chain of players that partake in the game: {}", self.chain_listing())
    }
}
