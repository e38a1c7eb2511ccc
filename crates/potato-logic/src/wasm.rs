//! WASM bindings for browser game replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::{describe_strategy, Decision, GameConfig, PlayerSpec, ScriptedProvider, STRATEGY_MENU};

/// Replay a game with full offer-by-offer details
///
/// # Arguments
/// * `config_json` - JSON serialized GameConfig
/// * `seed` - 32-byte randomness seed
/// * `game_index` - Index of this game
/// * `answers` - Recorded answers for Input players, in offer order (non-zero = accept)
///
/// # Returns
/// JSON serialized GameResult
#[wasm_bindgen]
pub fn replay_game(
    config_json: &str,
    seed: &[u8],
    game_index: u32,
    answers: &[u8],
) -> Result<JsValue, JsError> {
    let config = GameConfig::from_json(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    let game = config
        .build()
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;

    let seed_arr: [u8; 32] = seed
        .try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))?;

    let mut provider = ScriptedProvider::new(answers.iter().map(|&a| {
        if a != 0 {
            Decision::Accept
        } else {
            Decision::Decline
        }
    }));

    let result = game.run(&seed_arr, game_index, &mut provider);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get all available strategy variants
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&STRATEGY_MENU[..])
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get human-readable description of a player spec
#[wasm_bindgen]
pub fn describe_player(spec_json: &str) -> Result<String, JsError> {
    let spec: PlayerSpec = serde_json::from_str(spec_json)
        .map_err(|e| JsError::new(&format!("Invalid player: {}", e)))?;
    let strategy = spec
        .strategy()
        .map_err(|e| JsError::new(&format!("Invalid player: {}", e)))?;

    Ok(describe_strategy(&strategy))
}
