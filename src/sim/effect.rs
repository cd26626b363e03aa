//! Timed status effects carried by enemies
//!
//! An effect only tracks its own clock. What it does to the host (speed change,
//! burn damage) is applied by [`super::Enemy`].

use serde::{Deserialize, Serialize};

use crate::tuning::EffectSpec;

/// Status effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Multiplies speed by (1 - strength); stacks multiplicatively
    Slow,
    /// Speed forced to zero; beats any slow
    Stun,
    /// strength damage per second; stacks additively
    Burn,
}

/// A single status effect instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    kind: EffectKind,
    strength: f32,
    /// Seconds remaining
    remaining: f32,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, strength: f32, duration: f32) -> Self {
        Self {
            kind,
            strength,
            remaining: duration,
        }
    }

    pub fn slow(strength: f32, duration: f32) -> Self {
        Self::new(EffectKind::Slow, strength, duration)
    }

    pub fn stun(duration: f32) -> Self {
        Self::new(EffectKind::Stun, 1.0, duration)
    }

    pub fn burn(damage_per_sec: f32, duration: f32) -> Self {
        Self::new(EffectKind::Burn, damage_per_sec, duration)
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Count down by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

impl From<EffectSpec> for StatusEffect {
    fn from(spec: EffectSpec) -> Self {
        Self::new(spec.kind, spec.strength, spec.duration)
    }
}
