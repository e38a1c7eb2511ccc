//! The hot potato: lifetime countdown and flat payoffs

use serde::{Deserialize, Serialize};

/// Result of aging the potato by one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decay {
    /// Still circulating, with this many ticks left
    Alive(u32),
    /// Lifetime reached zero
    Expired,
}

/// The circulating item
///
/// `base_gain` is credited to a holder who manages to pass the potato on,
/// `base_loss` is debited from whoever is left holding it at the end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Potato {
    lifetime: u32,
    base_gain: f64,
    base_loss: f64,
}

impl Potato {
    /// Callers go through `PotatoConfig::validate` for untrusted values.
    pub fn new(lifetime: u32, base_gain: f64, base_loss: f64) -> Self {
        Self { lifetime, base_gain, base_loss }
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn base_gain(&self) -> f64 {
        self.base_gain
    }

    pub fn base_loss(&self) -> f64 {
        self.base_loss
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime == 0
    }

    /// Age the potato by one tick
    ///
    /// Saturates at zero: an expired potato stays expired.
    pub fn decay(&mut self) -> Decay {
        self.lifetime = self.lifetime.saturating_sub(1);
        match self.lifetime {
            0 => Decay::Expired,
            left => Decay::Alive(left),
        }
    }
}
