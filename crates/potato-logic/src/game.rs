//! Game execution engine

use serde::{Deserialize, Serialize};

use crate::context::DecisionContext;
use crate::player::{Player, PlayerId};
use crate::potato::{Decay, Potato};
use crate::provider::DecisionProvider;
use crate::random::SeededRng;
use crate::status::GameStatus;
use crate::strategy::Decision;

/// Turn state machine: `Running` until one of the terminal states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Running,
    /// The potato's lifetime ran out
    Expired,
    /// Nobody is left to pass the potato on to
    Exhausted,
}

/// Result of a single offer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferRecord {
    pub offer: u32,
    pub player: PlayerId,
    pub decision: Decision,
    pub lifetime_after: u32,
    pub total_payoff_after: f64,
}

/// Result of a complete game
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameResult {
    pub status: GameStatus,
    pub outcome: GameState,
    pub offers: Vec<OfferRecord>,
}

/// A single run of the Sequential Hot Potato Game
///
/// Offers go round the unserved players in seating order. A player who
/// declines stays unserved and may be offered again later; a player who
/// accepts joins the chain and pays out the previous holder.
#[derive(Clone, Debug)]
pub struct Game {
    potato: Potato,
    status: GameStatus,
    state: GameState,
    cursor: usize,
    offers: u32,
}

impl Game {
    pub fn new(potato: Potato, players: Vec<Player>) -> Self {
        log::info!(
            "new game: {} players, lifetime {}, gain {}, loss {}",
            players.len(),
            potato.lifetime(),
            potato.base_gain(),
            potato.base_loss(),
        );
        Self {
            potato,
            status: GameStatus::new(players),
            state: GameState::Running,
            cursor: 0,
            offers: 0,
        }
    }

    pub fn potato(&self) -> &Potato {
        &self.potato
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Play until a terminal state is reached
    ///
    /// # Arguments
    /// * `seed` - Randomness seed for Barnum/Stochastic draws
    /// * `game_index` - Index of this game, mixed into the seed
    /// * `provider` - Answers offers made to Input players
    pub fn run(
        mut self,
        seed: &[u8; 32],
        game_index: u32,
        provider: &mut dyn DecisionProvider,
    ) -> GameResult {
        let rng = SeededRng::new(seed, game_index);
        let mut offers = Vec::with_capacity(self.potato.lifetime() as usize);

        while let Some(record) = self.step(&rng, provider) {
            offers.push(record);
        }

        GameResult {
            status: self.status,
            outcome: self.state,
            offers,
        }
    }

    /// Make one offer, or settle the game if it can no longer continue
    ///
    /// Returns `None` once the game is over.
    pub fn step(
        &mut self,
        rng: &SeededRng,
        provider: &mut dyn DecisionProvider,
    ) -> Option<OfferRecord> {
        if self.state != GameState::Running {
            return None;
        }

        // the last unserved player would have nobody to pass to
        let unserved = self.status.active_population().len();
        if unserved < 2 {
            self.finish(GameState::Exhausted);
            return None;
        }

        if let Decay::Expired = self.potato.decay() {
            self.finish(GameState::Expired);
            return None;
        }

        let offer = self.offers;
        self.offers += 1;

        let index = self.cursor % unserved;
        let player = self.status.active_population()[index];
        let mut offer_rng = rng.for_offer(offer);

        let decision = {
            let mut ctx = DecisionContext::new(
                &self.potato,
                &self.status,
                &player,
                &mut offer_rng,
                &mut *provider,
            );
            player.strategy().decide(&mut ctx)
        };

        match decision {
            Decision::Accept => {
                if let Some(holder) = self.status.holder().map(Player::id) {
                    self.status.credit(holder, self.potato.base_gain());
                }
                self.status.accept_at(index);
                // the next player slid into this slot
                self.cursor = index;
            }
            Decision::Decline => {
                self.cursor = index + 1;
            }
        }

        log::debug!(
            "offer {} -> {}: {:?} (lifetime {}, turn {})",
            offer,
            player,
            decision,
            self.potato.lifetime(),
            self.status.turn(),
        );

        Some(OfferRecord {
            offer,
            player: player.id(),
            decision,
            lifetime_after: self.potato.lifetime(),
            total_payoff_after: self.status.total_payoff(),
        })
    }

    /// Debit the final holder and freeze the status
    fn finish(&mut self, state: GameState) {
        if let Some(holder) = self.status.holder().map(Player::id) {
            self.status.credit(holder, -self.potato.base_loss());
        }
        self.status.end();
        self.state = state;

        log::info!(
            "game over ({:?}) after {} offers: turn {}, total payoff {}",
            state,
            self.offers,
            self.status.turn(),
            self.status.total_payoff(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FixedProvider, ScriptedProvider};
    use crate::strategy::Strategy;
    use proptest::prelude::*;
    use proptest::strategy::Strategy as _;

    const SEED: [u8; 32] = [42u8; 32];

    fn population(n: u32, strategy: Strategy) -> Vec<Player> {
        (1..=n).map(|id| Player::new(id, strategy).unwrap()).collect()
    }

    fn play(potato: Potato, players: Vec<Player>) -> GameResult {
        Game::new(potato, players).run(&SEED, 0, &mut FixedProvider(Decision::Decline))
    }

    fn assert_exact(result: &GameResult, turn: u32, chain: usize, payoff: f64) {
        assert_eq!(result.status.turn(), turn);
        assert_eq!(result.status.chain().len(), chain);
        assert_eq!(result.status.total_payoff(), payoff);
        assert!(result.status.game_ended());
    }

    #[test]
    fn test_barnum_all_rational() {
        let result = play(Potato::new(5, 5.0, 10.0), population(10, Strategy::Barnum { prob: 1.0 }));
        assert_exact(&result, 0, 0, 0.0);
        assert_eq!(result.outcome, GameState::Expired);
        assert_eq!(result.status.chain_listing(), "∅");
    }

    #[test]
    fn test_barnum_all_gullible() {
        let result = play(Potato::new(5, 5.0, 10.0), population(10, Strategy::Barnum { prob: 0.0 }));
        assert_exact(&result, 4, 4, 5.0);
        assert_eq!(result.outcome, GameState::Expired);
    }

    #[test]
    fn test_stochastic_always_accept() {
        let result = play(
            Potato::new(10, 100.0, 200.0),
            population(5, Strategy::Stochastic { weight: 0.0 }),
        );
        assert_exact(&result, 4, 4, 100.0);
        assert_eq!(result.outcome, GameState::Exhausted);
    }

    #[test]
    fn test_stochastic_always_decline() {
        let result = play(
            Potato::new(10, 100.0, 200.0),
            population(5, Strategy::Stochastic { weight: 1.0 }),
        );
        assert_exact(&result, 0, 0, 0.0);
    }

    #[test]
    fn test_barnum_one_rational_bounded_loss() {
        for seed in 0..50u8 {
            let mut players: Vec<Player> = (1..=4)
                .map(|id| {
                    let prob = (id as f64 * 0.37 + seed as f64 * 0.11).fract();
                    Player::new(id, Strategy::Barnum { prob }).unwrap()
                })
                .collect();
            players.push(Player::new(5, Strategy::Barnum { prob: 1.0 }).unwrap());

            let result = Game::new(Potato::new(5, 5.0, 10.0), players)
                .run(&[seed; 32], 0, &mut FixedProvider(Decision::Decline));
            assert!(result.status.total_payoff() >= -10.0);
        }
    }

    #[test]
    fn test_payoff_ledger() {
        let result = play(Potato::new(5, 5.0, 10.0), population(10, Strategy::Gullible));

        // 1..3 passed the potato on, 4 was left holding it
        assert_eq!(result.status.payoff_of(1), 5.0);
        assert_eq!(result.status.payoff_of(2), 5.0);
        assert_eq!(result.status.payoff_of(3), 5.0);
        assert_eq!(result.status.payoff_of(4), -10.0);
        assert_eq!(result.status.payoff_of(5), 0.0);
        assert_eq!(result.status.chain_listing(), "Gullible(1) Gullible(2) Gullible(3) Gullible(4)");
    }

    #[test]
    fn test_decliners_stay_eligible() {
        // 1 declines, 2 accepts, then 3 declines and 1 is asked again
        let players = vec![
            Player::new(1, Strategy::Input).unwrap(),
            Player::new(2, Strategy::Gullible).unwrap(),
            Player::new(3, Strategy::Rational).unwrap(),
        ];
        let mut provider = ScriptedProvider::new([Decision::Decline, Decision::Accept]);
        let result = Game::new(Potato::new(10, 1.0, 1.0), players).run(&SEED, 0, &mut provider);

        let order: Vec<_> = result.offers.iter().map(|o| o.player).collect();
        assert_eq!(order, vec![1, 2, 3, 1]);
        assert_eq!(result.status.chain().iter().map(Player::id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(result.outcome, GameState::Exhausted);
        assert_eq!(provider.remaining(), 0);
    }

    #[test]
    fn test_single_player_exhausted_immediately() {
        let result = play(Potato::new(5, 1.0, 1.0), population(1, Strategy::Gullible));
        assert_eq!(result.outcome, GameState::Exhausted);
        assert!(result.offers.is_empty());
        assert_exact(&result, 0, 0, 0.0);
    }

    #[test]
    fn test_zero_lifetime_expires_immediately() {
        let result = play(Potato::new(0, 1.0, 1.0), population(3, Strategy::Gullible));
        assert_eq!(result.outcome, GameState::Expired);
        assert!(result.offers.is_empty());
    }

    #[test]
    fn test_step_after_end_is_noop() {
        let rng = SeededRng::new(&SEED, 0);
        let mut provider = FixedProvider(Decision::Decline);
        let mut game = Game::new(Potato::new(2, 1.0, 1.0), population(3, Strategy::Rational));

        while game.step(&rng, &mut provider).is_some() {}
        assert_eq!(game.state(), GameState::Expired);

        let snapshot = game.status().clone();
        assert!(game.step(&rng, &mut provider).is_none());
        assert_eq!(game.status().turn(), snapshot.turn());
        assert_eq!(game.potato().lifetime(), 0);
    }

    #[test]
    fn test_offer_trace() {
        let result = play(Potato::new(4, 2.0, 3.0), population(5, Strategy::Gullible));
        let payoffs: Vec<_> = result.offers.iter().map(|o| o.total_payoff_after).collect();
        assert_eq!(payoffs, vec![0.0, 2.0, 4.0]);
        let lifetimes: Vec<_> = result.offers.iter().map(|o| o.lifetime_after).collect();
        assert_eq!(lifetimes, vec![3, 2, 1]);
    }

    #[test]
    fn test_replay_determinism() {
        let players: Vec<Player> = (1..=8)
            .map(|id| Player::new(id, Strategy::Stochastic { weight: 0.6 }).unwrap())
            .collect();
        let game = Game::new(Potato::new(12, 3.0, 7.0), players);

        let r1 = game.clone().run(&SEED, 3, &mut FixedProvider(Decision::Decline));
        let r2 = game.run(&SEED, 3, &mut FixedProvider(Decision::Decline));

        assert_eq!(r1.offers, r2.offers);
        assert_eq!(r1.status.chain(), r2.status.chain());
        assert_eq!(r1.status.total_payoff(), r2.status.total_payoff());
    }

    #[test]
    fn test_result_serializes() {
        let result = play(Potato::new(5, 5.0, 10.0), population(3, Strategy::Gullible));
        let json = serde_json::to_string(&result).unwrap();
        let back: GameResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.outcome, result.outcome);
        assert_eq!(back.offers, result.offers);
        assert_eq!(back.status.chain(), result.status.chain());
    }

    fn arb_strategy() -> impl proptest::strategy::Strategy<Value = Strategy> {
        use crate::strategy::Strategy as S;
        prop_oneof![
            Just(S::Rational),
            Just(S::Gullible),
            (0.0..=1.0f64).prop_map(|prob| S::Barnum { prob }),
            (0u32..20).prop_map(|threshold| S::Myopic { threshold }),
            (0.0..=1.0f64).prop_map(|weight| S::Stochastic { weight }),
            (0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(altruism, help_alter_belief)| {
                S::DirectAltruist { altruism, help_alter_belief }
            }),
            (0.0..=1.0f64).prop_map(|alter_accept_belief| S::Benthamite { alter_accept_belief }),
            (0.0..=1.0f64).prop_map(|acceptance_to_risk| S::Coalitional { acceptance_to_risk }),
            Just(S::Input),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(
            strategies in prop::collection::vec(arb_strategy(), 0..12),
            lifetime in 0u32..20,
            gain in 0.0..100.0f64,
            loss in 0.0..100.0f64,
            seed in any::<[u8; 32]>(),
            answers in prop::collection::vec(any::<bool>(), 0..20),
        ) {
            let players: Vec<Player> = strategies
                .iter()
                .enumerate()
                .map(|(i, s)| Player::new(i as u32, *s).unwrap())
                .collect();
            let n = players.len();
            let answers = answers
                .into_iter()
                .map(|a| if a { Decision::Accept } else { Decision::Decline });

            let rng = SeededRng::new(&seed, 0);
            let mut provider = ScriptedProvider::new(answers);
            let mut game = Game::new(Potato::new(lifetime, gain, loss), players);
            let mut steps = 0u32;

            while game.step(&rng, &mut provider).is_some() {
                steps += 1;
                let status = game.status();
                prop_assert_eq!(status.chain().len() as u32, status.turn());
                prop_assert_eq!(status.active_population().len() + status.chain().len(), n);
            }

            let status = game.status();
            prop_assert!(status.game_ended());
            prop_assert!(game.state() != GameState::Running);
            prop_assert!(steps <= lifetime);
            prop_assert!(steps as usize <= n + lifetime as usize);

            let mut ids: Vec<_> = status.chain().iter().map(Player::id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), status.chain().len());

            let ledger: f64 = status.payoffs().values().sum();
            prop_assert!((ledger - status.total_payoff()).abs() < 1e-6);

            // (k - 1) gains, one loss
            let k = status.turn() as f64;
            let expected = if k == 0.0 { 0.0 } else { (k - 1.0) * gain - loss };
            prop_assert!((status.total_payoff() - expected).abs() < 1e-6);
        }

        #[test]
        fn prop_replay_is_identical(
            strategies in prop::collection::vec(arb_strategy(), 0..10),
            lifetime in 0u32..15,
            seed in any::<[u8; 32]>(),
            game_index in any::<u32>(),
        ) {
            let players: Vec<Player> = strategies
                .iter()
                .enumerate()
                .map(|(i, s)| Player::new(i as u32, *s).unwrap())
                .collect();
            let game = Game::new(Potato::new(lifetime, 5.0, 10.0), players);

            let r1 = game.clone().run(&seed, game_index, &mut FixedProvider(Decision::Accept));
            let r2 = game.run(&seed, game_index, &mut FixedProvider(Decision::Accept));

            prop_assert_eq!(r1.offers, r2.offers);
            prop_assert_eq!(r1.status.chain(), r2.status.chain());
            prop_assert_eq!(r1.outcome, r2.outcome);
        }
    }
}
