//! Strategy definitions and decision rules

use std::mem;

use serde::{Deserialize, Serialize};

use crate::context::DecisionContext;
use crate::error::ConfigError;

/// Answer to an offer of the potato
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Accept,
    Decline,
}

/// The closed set of player strategies, with their parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Never takes the potato.
    Rational,
    /// Always takes the potato.
    Gullible,
    /// Believes others may be irrational; `prob` is the belief that they
    /// are Barnum players themselves. Accepts with probability `1 - prob`.
    Barnum { prob: f64 },
    /// Cannot see past `threshold` ticks. A longer game looks infinite and
    /// is played rationally.
    Myopic { threshold: u32 },
    /// Static stochastic process. Accepts with probability `1 - weight`.
    Stochastic { weight: f64 },
    /// Accepts on behalf of an unserved beneficiary.
    DirectAltruist { altruism: f64, help_alter_belief: f64 },
    /// Maximizes the total payoff of the population.
    Benthamite { alter_accept_belief: f64 },
    /// Weighs the benefit of a coalition with same-type players.
    Coalitional { acceptance_to_risk: f64 },
    /// Defers to the external decision provider.
    Input,
}

/// Menu entry for one strategy variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StrategyInfo {
    pub index: u8,
    pub name: &'static str,
    pub description: &'static str,
}

/// All strategy variants, indexed by their configuration tag
pub static STRATEGY_MENU: [StrategyInfo; 9] = [
    StrategyInfo {
        index: 1,
        name: "Rational",
        description: "Never takes the hot potato.",
    },
    StrategyInfo {
        index: 2,
        name: "Gullible",
        description: "Always takes the hot potato.",
    },
    StrategyInfo {
        index: 3,
        name: "Barnum",
        description: "Aware that irrational players may be around, so it may take the hot potato depending on them.",
    },
    StrategyInfo {
        index: 4,
        name: "Myopic",
        description: "Cannot see the end of a game longer than its reasoning horizon. A game that looks infinite is played rationally, otherwise it takes the potato.",
    },
    StrategyInfo {
        index: 5,
        name: "Stochastic",
        description: "Treats taking the hot potato as a static stochastic process, independent of other players.",
    },
    StrategyInfo {
        index: 6,
        name: "Direct Altruist",
        description: "Cares about a beneficiary among the players that have not had the hot potato yet.",
    },
    StrategyInfo {
        index: 7,
        name: "Benthamite",
        description: "Maximizes the total payoff of the game rather than its own, unless it expects someone else to take the risk.",
    },
    StrategyInfo {
        index: 8,
        name: "Coalitional",
        description: "Forms a coalition with players of the same type to get a better payoff.",
    },
    StrategyInfo {
        index: 9,
        name: "Input",
        description: "The decision is provided from outside the engine.",
    },
];

impl Strategy {
    /// Configuration tag, `1..=9`
    pub fn tag(&self) -> u8 {
        match self {
            Strategy::Rational => 1,
            Strategy::Gullible => 2,
            Strategy::Barnum { .. } => 3,
            Strategy::Myopic { .. } => 4,
            Strategy::Stochastic { .. } => 5,
            Strategy::DirectAltruist { .. } => 6,
            Strategy::Benthamite { .. } => 7,
            Strategy::Coalitional { .. } => 8,
            Strategy::Input => 9,
        }
    }

    pub fn info(&self) -> &'static StrategyInfo {
        &STRATEGY_MENU[self.tag() as usize - 1]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::DirectAltruist { .. } => "DirectAltruist",
            _ => self.info().name,
        }
    }

    /// Same variant, ignoring parameters
    pub fn same_kind(&self, other: &Strategy) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// Check every probability/belief lies in `[0, 1]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Strategy::Barnum { prob } => check_unit("prob", prob),
            Strategy::Stochastic { weight } => check_unit("weight", weight),
            Strategy::DirectAltruist { altruism, help_alter_belief } => {
                check_unit("altruism", altruism)?;
                check_unit("help_alter_belief", help_alter_belief)
            }
            Strategy::Benthamite { alter_accept_belief } => {
                check_unit("alter_accept_belief", alter_accept_belief)
            }
            Strategy::Coalitional { acceptance_to_risk } => {
                check_unit("acceptance_to_risk", acceptance_to_risk)
            }
            Strategy::Rational | Strategy::Gullible | Strategy::Myopic { .. } | Strategy::Input => {
                Ok(())
            }
        }
    }

    /// Decide whether to take the potato
    ///
    /// Barnum and Stochastic draw exactly one value from the context's
    /// stream, Input blocks on the provider, everything else is a pure
    /// function of the parameters and the context.
    pub fn decide(&self, ctx: &mut DecisionContext) -> Decision {
        match *self {
            Strategy::Rational => Decision::Decline,
            Strategy::Gullible => Decision::Accept,
            Strategy::Barnum { prob } => decide_by_draw(prob, ctx),
            Strategy::Myopic { threshold } => decide_myopic(threshold, ctx),
            Strategy::Stochastic { weight } => decide_by_draw(weight, ctx),
            Strategy::DirectAltruist { altruism, help_alter_belief } => {
                decide_direct_altruist(altruism, help_alter_belief, ctx)
            }
            Strategy::Benthamite { alter_accept_belief } => {
                decide_benthamite(alter_accept_belief, ctx)
            }
            Strategy::Coalitional { acceptance_to_risk } => {
                decide_coalitional(acceptance_to_risk, ctx)
            }
            Strategy::Input => ctx.ask(),
        }
    }
}

fn check_unit(param: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { param, value })
    }
}

fn accept_if(cond: bool) -> Decision {
    if cond {
        Decision::Accept
    } else {
        Decision::Decline
    }
}

/// Accept with probability `1 - decline_prob`
///
/// `u` is in `[0, 1)`, so 1.0 never accepts and 0.0 always does.
fn decide_by_draw(decline_prob: f64, ctx: &mut DecisionContext) -> Decision {
    accept_if(ctx.draw() >= decline_prob)
}

/// Myopic: a lifetime beyond the horizon looks infinite
fn decide_myopic(threshold: u32, ctx: &DecisionContext) -> Decision {
    accept_if(ctx.lifetime() <= threshold)
}

/// Direct altruist: help a beneficiary when the weighted benefit exceeds
/// the expected personal cost
fn decide_direct_altruist(
    altruism: f64,
    help_alter_belief: f64,
    ctx: &DecisionContext,
) -> Decision {
    // beneficiary is some other unserved player
    if ctx.others_unserved() == 0 {
        return Decision::Decline;
    }

    let survive = 1.0 - ctx.stuck_risk();
    let benefit = altruism * (1.0 - help_alter_belief) * ctx.potato().base_gain() * survive;
    let cost = (-ctx.acceptance_value()).max(0.0);

    accept_if(benefit > cost)
}

/// Benthamite: compare the social delta of accepting now against the
/// delta expected if someone else accepts one tick later
fn decide_benthamite(alter_accept_belief: f64, ctx: &DecisionContext) -> Decision {
    let gain = ctx.potato().base_gain();
    let loss = ctx.potato().base_loss();

    let social_delta = |handoffs: u32| {
        if ctx.has_holder() {
            gain
        } else {
            handoffs as f64 * gain - loss
        }
    };

    let now = social_delta(ctx.onward_handoffs());
    let later = social_delta(ctx.handoffs_with_lifetime(ctx.lifetime().saturating_sub(1)));

    accept_if(now > alter_accept_belief * later)
}

/// Coalitional: the coalition benefit must exceed the risk tolerance
fn decide_coalitional(acceptance_to_risk: f64, ctx: &DecisionContext) -> Decision {
    let benefit = ctx.same_type_share() * (1.0 - ctx.stuck_risk());
    accept_if(benefit > 1.0 - acceptance_to_risk)
}

/// Human-readable description of a strategy and its parameters
pub fn describe_strategy(strategy: &Strategy) -> String {
    let mut desc = strategy.info().description.to_string();

    match *strategy {
        Strategy::Barnum { prob } => {
            desc.push_str(&format!(" Believes {:.0}% of others are Barnum players.", prob * 100.0));
        }
        Strategy::Myopic { threshold } => {
            desc.push_str(&format!(" Sees {} ticks ahead.", threshold));
        }
        Strategy::Stochastic { weight } => {
            desc.push_str(&format!(" Accepts {:.0}% of the time.", (1.0 - weight) * 100.0));
        }
        Strategy::DirectAltruist { altruism, help_alter_belief } => {
            desc.push_str(&format!(
                " Altruism {:.2}, belief others help {:.2}.",
                altruism, help_alter_belief
            ));
        }
        Strategy::Benthamite { alter_accept_belief } => {
            desc.push_str(&format!(" Belief others accept {:.2}.", alter_accept_belief));
        }
        Strategy::Coalitional { acceptance_to_risk } => {
            desc.push_str(&format!(" Risk acceptance {:.2}.", acceptance_to_risk));
        }
        Strategy::Rational | Strategy::Gullible | Strategy::Input => {}
    }

    desc
}
