/// 隕石術 (meteor)
///
/// 地面目標技能 - 延遲落下的多段範圍傷害
///
/// 功能：
/// - 在落點接連降下多顆隕石，每顆間隔 impact_interval
/// - 延遲效果掛在共用時鐘上，瞄準模式凍結時一併暫停

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::AbilityEffect;

/// 隕石術處理器
pub struct MeteorHandler;

impl MeteorHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for MeteorHandler {
    fn ability_id(&self) -> &str {
        "meteor"
    }

    fn execute(&self, ctx: &CastContext, config: &AbilityConfig) -> Vec<AbilityEffect> {
        let center = match ctx.target_point {
            Some(point) => point,
            None => return Vec::new(),
        };

        let damage = config.extra_value("damage_per_impact").unwrap_or(25.0);
        let radius = config.extra_value("radius").unwrap_or(4.0);
        let impact_count = config.extra_int("impact_count").unwrap_or(3);
        let impact_delay = config.extra_value("impact_delay").unwrap_or(1.2);
        let impact_interval = config.extra_value("impact_interval").unwrap_or(0.4);

        let mut effects = Vec::with_capacity(impact_count as usize);
        for impact in 0..impact_count {
            effects.push(AbilityEffect::Delayed {
                delay: impact_delay + impact as f32 * impact_interval,
                effects: vec![AbilityEffect::AreaDamage {
                    center,
                    radius,
                    amount: damage,
                }],
            });
        }
        effects
    }
}

impl Default for MeteorHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AbilityKind, CombatWorld, PlayerPose, TargetId, WorldPoint};
    use std::collections::HashMap;
    use vek::{Rgba, Vec3};

    struct TestPose;
    impl PlayerPose for TestPose {
        fn position(&self) -> WorldPoint {
            Vec3::zero()
        }
        fn look_direction(&self) -> Vec3<f32> {
            Vec3::new(0.0, -1.0, 0.0)
        }
        fn camera_position(&self) -> WorldPoint {
            Vec3::zero()
        }
    }

    struct TestWorld;
    impl CombatWorld for TestWorld {
        fn apply_damage(&mut self, _t: TargetId, _a: f32, _p: WorldPoint, _l: &str) {}
        fn apply_heal_player(&mut self, _amount: f32) {}
        fn apply_status(&mut self, _t: TargetId, _m: &str, _v: f32, _d: Option<f32>, _s: &str) {}
        fn clear_statuses(&mut self, _source_ability: &str) {}
        fn targets_in_radius(&self, _c: WorldPoint, _r: f32) -> Vec<TargetId> {
            Vec::new()
        }
        fn player_health(&self) -> (f32, f32) {
            (100.0, 100.0)
        }
    }

    fn test_config() -> AbilityConfig {
        let mut extra = HashMap::new();
        extra.insert("impact_count".to_string(), serde_json::Value::from(3));
        extra.insert("impact_delay".to_string(), serde_json::Value::from(1.0));
        extra.insert("impact_interval".to_string(), serde_json::Value::from(0.5));
        AbilityConfig {
            id: "meteor".to_string(),
            name: "隕石術".to_string(),
            description: "測試".to_string(),
            kind: AbilityKind::Targeted,
            cooldown: 15.0,
            resource_cost: 14.0,
            required_level: 5,
            active_duration: None,
            starts_unlocked: false,
            indicator_radius: 4.0,
            indicator_color: Rgba::new(1.0, 0.25, 0.15, 0.35),
            extra,
        }
    }

    #[test]
    fn test_impacts_are_staggered() {
        let handler = MeteorHandler::new();
        let pose = TestPose;
        let world = TestWorld;
        let ctx = CastContext {
            target_point: Some(Vec3::new(3.0, 0.0, 3.0)),
            pose: &pose,
            world: &world,
        };

        let effects = handler.execute(&ctx, &test_config());
        assert_eq!(effects.len(), 3);

        let delays: Vec<f32> = effects
            .iter()
            .map(|e| match e {
                AbilityEffect::Delayed { delay, .. } => *delay,
                other => panic!("預期延遲效果，得到 {:?}", other),
            })
            .collect();
        assert_eq!(delays, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_no_target_point_yields_no_effects() {
        let handler = MeteorHandler::new();
        let pose = TestPose;
        let world = TestWorld;
        let ctx = CastContext {
            target_point: None,
            pose: &pose,
            world: &world,
        };
        assert!(handler.execute(&ctx, &test_config()).is_empty());
    }
}
