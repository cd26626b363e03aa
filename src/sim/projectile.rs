//! Homing projectiles
//!
//! A projectile locks onto one enemy at launch and re-aims at it every frame.
//! It resolves exactly once: on a hit, when the target is gone, or when it has
//! flown too far.

use glam::Vec2;

use super::effect::StatusEffect;
use super::enemy::{Enemy, EnemyId};
use super::tower::TowerId;
use crate::tuning::ProjectileTuning;

/// How a projectile resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impact {
    /// Struck the target; `killed` if that hit was lethal
    Hit {
        target: EnemyId,
        damage: f32,
        killed: bool,
    },
    /// Target died or left the field before contact
    TargetLost,
    /// Exceeded max travel distance
    Expired,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub source: TowerId,
    pub position: Vec2,
    /// Re-aimed every frame
    pub velocity: Vec2,
    target: EnemyId,
    damage: f32,
    speed: f32,
    effect: Option<StatusEffect>,
    resolved: bool,
    distance_traveled: f32,
}

impl Projectile {
    pub fn new(
        source: TowerId,
        position: Vec2,
        target: EnemyId,
        damage: f32,
        speed: f32,
        effect: Option<StatusEffect>,
    ) -> Self {
        Self {
            source,
            position,
            velocity: Vec2::ZERO,
            target,
            damage,
            speed,
            effect,
            resolved: false,
            distance_traveled: 0.0,
        }
    }

    /// Advance one frame toward `target` (the live enemy this projectile tracks,
    /// or `None` if it has been pruned).
    ///
    /// Returns the impact on the frame the projectile resolves, `None` while in
    /// flight or after it has already resolved.
    pub fn update(
        &mut self,
        dt: f32,
        target: Option<&mut Enemy>,
        limits: &ProjectileTuning,
    ) -> Option<Impact> {
        if self.resolved {
            return None;
        }
        let Some(target) = target.filter(|t| t.is_alive() && t.id() == self.target) else {
            self.resolved = true;
            return Some(Impact::TargetLost);
        };

        self.velocity = (target.position() - self.position).normalize_or_zero() * self.speed;
        let step = self.velocity * dt;
        self.position += step;
        self.distance_traveled += step.length();

        if self.distance_traveled > limits.max_travel {
            self.resolved = true;
            return Some(Impact::Expired);
        }

        if self.position.distance_squared(target.position()) < limits.hit_radius_sq() {
            target.take_damage(self.damage);
            if let Some(effect) = self.effect {
                target.add_status_effect(effect);
            }
            self.resolved = true;
            return Some(Impact::Hit {
                target: self.target,
                damage: self.damage,
                killed: !target.is_alive(),
            });
        }

        None
    }

    pub fn target(&self) -> EnemyId {
        self.target
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn effect(&self) -> Option<&StatusEffect> {
        self.effect.as_ref()
    }

    pub fn has_resolved(&self) -> bool {
        self.resolved
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effect::EffectKind;
    use crate::sim::enemy::EnemyKind;
    use crate::tuning::EnemyStats;

    fn target_at(pos: Vec2) -> Enemy {
        let stats = EnemyStats {
            max_health: 50.0,
            speed: 0.0,
            reward: 10,
            damage_to_base: 5,
        };
        Enemy::new(EnemyId(7), EnemyKind::DataCrawler, vec![pos], &stats).unwrap()
    }

    fn shot(effect: Option<StatusEffect>) -> Projectile {
        Projectile::new(TowerId(1), Vec2::ZERO, EnemyId(7), 15.0, 100.0, effect)
    }

    #[test]
    fn test_homes_and_hits() {
        let limits = ProjectileTuning::default();
        let mut enemy = target_at(Vec2::new(50.0, 0.0));
        let mut p = shot(None);

        // 25px per frame: 25 away, then on top of it
        assert_eq!(p.update(0.25, Some(&mut enemy), &limits), None);
        assert!((p.velocity - Vec2::new(100.0, 0.0)).length() < 1e-4);
        let impact = p.update(0.25, Some(&mut enemy), &limits);
        assert_eq!(
            impact,
            Some(Impact::Hit {
                target: EnemyId(7),
                damage: 15.0,
                killed: false,
            })
        );
        assert!(p.has_resolved());
        assert_eq!(enemy.health(), 35.0);
    }

    #[test]
    fn test_re_aims_at_moved_target() {
        let limits = ProjectileTuning::default();
        let mut enemy = target_at(Vec2::new(100.0, 0.0));
        let mut p = shot(None);
        p.update(0.1, Some(&mut enemy), &limits);

        enemy.set_position(Vec2::new(10.0, 100.0));
        p.update(0.1, Some(&mut enemy), &limits);
        let dir = p.velocity.normalize();
        let expected = (Vec2::new(10.0, 100.0) - Vec2::new(10.0, 0.0)).normalize();
        assert!((dir - expected).length() < 1e-4);
    }

    #[test]
    fn test_no_double_hit() {
        let limits = ProjectileTuning::default();
        let mut enemy = target_at(Vec2::new(5.0, 0.0));
        let mut p = shot(None);
        assert!(matches!(
            p.update(0.01, Some(&mut enemy), &limits),
            Some(Impact::Hit { .. })
        ));
        let health = enemy.health();
        assert_eq!(p.update(0.01, Some(&mut enemy), &limits), None);
        assert_eq!(p.update(1.0, Some(&mut enemy), &limits), None);
        assert_eq!(enemy.health(), health);
    }

    #[test]
    fn test_scenario_e_target_dies_first() {
        let limits = ProjectileTuning::default();
        let mut enemy = target_at(Vec2::new(5.0, 0.0));
        let mut p = shot(None);
        enemy.take_damage(1000.0);

        assert_eq!(
            p.update(0.01, Some(&mut enemy), &limits),
            Some(Impact::TargetLost)
        );
        assert!(p.has_resolved());
        assert_eq!(enemy.health(), 0.0);
    }

    #[test]
    fn test_pruned_target_resolves() {
        let limits = ProjectileTuning::default();
        let mut p = shot(None);
        assert_eq!(p.update(0.1, None, &limits), Some(Impact::TargetLost));
        assert!(p.has_resolved());
    }

    #[test]
    fn test_expires_after_max_travel() {
        let limits = ProjectileTuning {
            hit_radius: 1.0,
            max_travel: 50.0,
        };
        let mut enemy = target_at(Vec2::new(500.0, 0.0));
        let mut p = shot(None);
        assert_eq!(p.update(0.4, Some(&mut enemy), &limits), None);
        assert_eq!(p.update(0.4, Some(&mut enemy), &limits), Some(Impact::Expired));
        assert_eq!(enemy.health(), 50.0);
    }

    #[test]
    fn test_attaches_effect_on_hit() {
        let limits = ProjectileTuning::default();
        let mut enemy = target_at(Vec2::new(1.0, 0.0));
        let mut p = shot(Some(StatusEffect::slow(0.5, 2.0)));
        p.update(0.01, Some(&mut enemy), &limits);
        assert!(enemy.has_effect(EffectKind::Slow));
    }

    #[test]
    fn test_lethal_hit_reports_kill() {
        let limits = ProjectileTuning::default();
        let mut enemy = target_at(Vec2::new(1.0, 0.0));
        let mut p = Projectile::new(TowerId(1), Vec2::ZERO, EnemyId(7), 80.0, 100.0, None);
        let impact = p.update(0.01, Some(&mut enemy), &limits);
        assert!(matches!(impact, Some(Impact::Hit { killed: true, .. })));
        assert!(!enemy.is_alive());
    }
}
