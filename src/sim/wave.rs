//! Wave composition and spawn pacing
//!
//! Waves are generated from the run seed and the wave number, so replaying a
//! run produces the same enemies in the same order.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use crate::tuning::WaveTuning;

/// Spawn queue and countdowns for the current wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDirector {
    /// Current wave (1-based, 0 before the first wave)
    pub wave: u32,
    /// Enemies still to be released this wave
    pub queue: VecDeque<EnemyKind>,
    /// Seconds until the next release
    pub spawn_timer: f32,
    /// Seconds left in the current breather
    pub breather_timer: f32,
}

impl WaveDirector {
    pub fn new(tuning: &WaveTuning) -> Self {
        Self {
            wave: 0,
            queue: VecDeque::new(),
            spawn_timer: 0.0,
            breather_timer: tuning.first_breather_secs,
        }
    }

    /// Advance to the next wave and fill the spawn queue. Returns the enemy count.
    pub fn begin_wave(&mut self, seed: u64, tuning: &WaveTuning) -> u32 {
        self.wave += 1;
        self.queue = generate_wave(seed, self.wave, tuning).into();
        self.spawn_timer = 0.0;
        self.breather_timer = 0.0;
        self.queue.len() as u32
    }

    /// Count down the breather. Returns true when it has run out.
    pub fn tick_breather(&mut self, dt: f32) -> bool {
        self.breather_timer -= dt;
        self.breather_timer <= 0.0
    }

    pub fn start_breather(&mut self, tuning: &WaveTuning) {
        self.breather_timer = tuning.breather_secs;
    }

    /// Release at most one queued enemy per frame
    pub fn next_spawn(&mut self, dt: f32, tuning: &WaveTuning) -> Option<EnemyKind> {
        if self.queue.is_empty() {
            return None;
        }
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return None;
        }
        self.spawn_timer += tuning.spawn_interval_for(self.wave);
        self.queue.pop_front()
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn health_multiplier(&self, tuning: &WaveTuning) -> f32 {
        tuning.health_multiplier(self.wave.max(1))
    }
}

/// Enemy lineup for a 1-based wave number
pub fn generate_wave(seed: u64, wave: u32, tuning: &WaveTuning) -> Vec<EnemyKind> {
    // Decorrelate neighbouring waves of the same run
    let wave_seed = seed ^ (wave as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = Pcg32::seed_from_u64(wave_seed);

    let count = tuning.enemy_count(wave);
    let trojans = wave >= tuning.trojan_unlock_wave;
    let viruses = wave >= tuning.virus_unlock_wave;

    let lineup: Vec<EnemyKind> = (0..count)
        .map(|_| {
            let roll: u32 = rng.random_range(0..100);
            if trojans && roll < 15 {
                EnemyKind::TrojanHorse
            } else if viruses && roll < 45 {
                EnemyKind::VirusBot
            } else {
                EnemyKind::DataCrawler
            }
        })
        .collect();

    log::debug!(
        "Wave {}: {} enemies ({} crawlers, {} viruses, {} trojans)",
        wave,
        lineup.len(),
        lineup.iter().filter(|k| **k == EnemyKind::DataCrawler).count(),
        lineup.iter().filter(|k| **k == EnemyKind::VirusBot).count(),
        lineup.iter().filter(|k| **k == EnemyKind::TrojanHorse).count(),
    );

    lineup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_wave_is_deterministic() {
        let tuning = WaveTuning::default();
        assert_eq!(generate_wave(42, 7, &tuning), generate_wave(42, 7, &tuning));
    }

    #[test]
    fn test_early_waves_are_crawlers_only() {
        let tuning = WaveTuning::default();
        for wave in 1..tuning.virus_unlock_wave {
            let lineup = generate_wave(1234, wave, &tuning);
            assert_eq!(lineup.len() as u32, tuning.enemy_count(wave));
            assert!(lineup.iter().all(|k| *k == EnemyKind::DataCrawler));
        }
    }

    #[test]
    fn test_no_trojans_before_unlock() {
        let tuning = WaveTuning::default();
        for seed in 0..20 {
            let lineup = generate_wave(seed, tuning.trojan_unlock_wave - 1, &tuning);
            assert!(!lineup.contains(&EnemyKind::TrojanHorse));
        }
    }

    #[test]
    fn test_later_waves_mix_kinds() {
        let tuning = WaveTuning::default();
        let lineup: Vec<_> = (0..10)
            .flat_map(|seed| generate_wave(seed, 10, &tuning))
            .collect();
        for kind in EnemyKind::ALL {
            assert!(lineup.contains(&kind), "missing {:?}", kind);
        }
    }

    #[test]
    fn test_spawn_pacing() {
        let tuning = WaveTuning::default();
        let mut director = WaveDirector::new(&tuning);
        let count = director.begin_wave(5, &tuning);
        assert_eq!(director.wave, 1);
        assert_eq!(count, tuning.enemy_count(1));

        // First enemy comes out immediately
        assert!(director.next_spawn(0.0, &tuning).is_some());
        // Next one waits a full interval
        assert!(director.next_spawn(0.6, &tuning).is_none());
        assert!(director.next_spawn(0.6, &tuning).is_some());

        let mut released = 2;
        while director.next_spawn(tuning.spawn_interval, &tuning).is_some() {
            released += 1;
        }
        assert_eq!(released, count);
        assert!(director.is_exhausted());
    }

    #[test]
    fn test_breather_countdown() {
        let tuning = WaveTuning::default();
        let mut director = WaveDirector::new(&tuning);
        assert!(!director.tick_breather(tuning.first_breather_secs - 1.0));
        assert!(director.tick_breather(1.0));
    }
}
