//! External decision providers for `Input` players

use std::collections::VecDeque;

use crate::strategy::Decision;

/// Diagnostic interactive front-ends print before re-prompting
pub const INVALID_INPUT_MSG: &str = "Invalid input, retrying...";

/// Source of decisions for players whose strategy is delegated
///
/// Implementations block until they have a valid answer; validation and
/// retrying of raw input happens on their side, never in the engine.
pub trait DecisionProvider {
    fn decide(&mut self, prompt: &str) -> Decision;
}

/// Always answers the same way
#[derive(Clone, Copy, Debug)]
pub struct FixedProvider(pub Decision);

impl DecisionProvider for FixedProvider {
    fn decide(&mut self, _prompt: &str) -> Decision {
        self.0
    }
}

/// Replays a recorded sequence of answers
///
/// Declines once the recording runs out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    answers: VecDeque<Decision>,
    prompts: Vec<String>,
}

impl ScriptedProvider {
    pub fn new(answers: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl DecisionProvider for ScriptedProvider {
    fn decide(&mut self, prompt: &str) -> Decision {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(decision) => decision,
            None => {
                log::warn!("scripted provider exhausted, declining");
                Decision::Decline
            }
        }
    }
}
