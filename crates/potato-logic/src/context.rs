//! Read-only view handed to a player when it is offered the potato

use crate::player::Player;
use crate::potato::Potato;
use crate::provider::DecisionProvider;
use crate::random::SeededRng;
use crate::status::GameStatus;
use crate::strategy::Decision;

/// Everything a strategy may look at while deciding
///
/// Game state is borrowed immutably. The RNG stream and the provider are
/// borrowed mutably because drawing or asking advances them.
pub struct DecisionContext<'a> {
    potato: &'a Potato,
    status: &'a GameStatus,
    player: &'a Player,
    rng: &'a mut SeededRng,
    provider: &'a mut dyn DecisionProvider,
}

impl<'a> DecisionContext<'a> {
    pub fn new(
        potato: &'a Potato,
        status: &'a GameStatus,
        player: &'a Player,
        rng: &'a mut SeededRng,
        provider: &'a mut dyn DecisionProvider,
    ) -> Self {
        Self { potato, status, player, rng, provider }
    }

    pub fn potato(&self) -> &Potato {
        self.potato
    }

    pub fn status(&self) -> &GameStatus {
        self.status
    }

    /// The player being offered the potato
    pub fn player(&self) -> &Player {
        self.player
    }

    pub fn lifetime(&self) -> u32 {
        self.potato.lifetime()
    }

    /// Someone already holds the potato and would be paid on acceptance
    pub fn has_holder(&self) -> bool {
        self.status.holder().is_some()
    }

    /// Unserved players other than the decider
    pub fn others_unserved(&self) -> u32 {
        self.status
            .active_population()
            .iter()
            .filter(|p| p.id() != self.player.id())
            .count() as u32
    }

    /// Handoffs still possible after the decider accepts
    pub fn onward_handoffs(&self) -> u32 {
        self.handoffs_with_lifetime(self.lifetime())
    }

    pub(crate) fn handoffs_with_lifetime(&self, lifetime: u32) -> u32 {
        lifetime.saturating_sub(1).min(self.others_unserved())
    }

    /// Estimated chance of ending up as the final holder
    pub fn stuck_risk(&self) -> f64 {
        1.0 / (self.onward_handoffs() as f64 + 1.0)
    }

    /// Expected personal payoff of accepting
    pub fn acceptance_value(&self) -> f64 {
        let risk = self.stuck_risk();
        (1.0 - risk) * self.potato.base_gain() - risk * self.potato.base_loss()
    }

    /// Fraction of the other unserved players sharing the decider's strategy
    pub fn same_type_share(&self) -> f64 {
        let others = self.others_unserved();
        if others == 0 {
            return 0.0;
        }
        let same = self
            .status
            .active_population()
            .iter()
            .filter(|p| p.id() != self.player.id())
            .filter(|p| p.strategy().same_kind(self.player.strategy()))
            .count();
        same as f64 / others as f64
    }

    /// Draw one value in `[0, 1)` from this offer's stream
    pub fn draw(&mut self) -> f64 {
        self.rng.next_unit()
    }

    /// Hand the decision to the external provider
    pub fn ask(&mut self) -> Decision {
        let prompt = format!(
            "Player {} is offered the hot potato ({} ticks left, gain {}, loss {}). Accept?",
            self.player.id(),
            self.potato.lifetime(),
            self.potato.base_gain(),
            self.potato.base_loss(),
        );
        self.provider.decide(&prompt)
    }
}
