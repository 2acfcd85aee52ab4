/// 絕地回春 (second_wind)
///
/// 被動技能 - 低血量自動治療
///
/// 功能：
/// - 生命值比例低於 health_threshold 時自動觸發
/// - 觸發後進入共用冷卻，冷卻期間不再觸發
/// - 不可手動施放

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::AbilityEffect;

/// 絕地回春處理器
pub struct SecondWindHandler;

impl SecondWindHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for SecondWindHandler {
    fn ability_id(&self) -> &str {
        "second_wind"
    }

    fn passive_trigger(&self, ctx: &CastContext, config: &AbilityConfig) -> bool {
        let threshold = config.extra_value("health_threshold").unwrap_or(0.3);
        let (current, max) = ctx.world.player_health();
        max > 0.0 && current / max < threshold
    }

    fn execute(&self, _ctx: &CastContext, config: &AbilityConfig) -> Vec<AbilityEffect> {
        let amount = config.extra_value("heal_amount").unwrap_or(30.0);
        vec![AbilityEffect::HealPlayer { amount }]
    }
}

impl Default for SecondWindHandler {
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

    struct TestWorld {
        health: (f32, f32),
    }
    impl CombatWorld for TestWorld {
        fn apply_damage(&mut self, _t: TargetId, _a: f32, _p: WorldPoint, _l: &str) {}
        fn apply_heal_player(&mut self, _amount: f32) {}
        fn apply_status(&mut self, _t: TargetId, _m: &str, _v: f32, _d: Option<f32>, _s: &str) {}
        fn clear_statuses(&mut self, _source_ability: &str) {}
        fn targets_in_radius(&self, _c: WorldPoint, _r: f32) -> Vec<TargetId> {
            Vec::new()
        }
        fn player_health(&self) -> (f32, f32) {
            self.health
        }
    }

    fn test_config() -> AbilityConfig {
        let mut extra = HashMap::new();
        extra.insert("health_threshold".to_string(), serde_json::Value::from(0.3));
        extra.insert("heal_amount".to_string(), serde_json::Value::from(30.0));
        AbilityConfig {
            id: "second_wind".to_string(),
            name: "絕地回春".to_string(),
            description: "測試".to_string(),
            kind: AbilityKind::Passive,
            cooldown: 60.0,
            resource_cost: 0.0,
            required_level: 2,
            active_duration: None,
            starts_unlocked: true,
            indicator_radius: 2.5,
            indicator_color: Rgba::new(1.0, 0.45, 0.1, 0.35),
            extra,
        }
    }

    #[test]
    fn test_triggers_only_below_threshold() {
        let handler = SecondWindHandler::new();
        let pose = TestPose;

        let healthy = TestWorld {
            health: (80.0, 100.0),
        };
        let ctx = CastContext {
            target_point: None,
            pose: &pose,
            world: &healthy,
        };
        assert!(!handler.passive_trigger(&ctx, &test_config()));

        let wounded = TestWorld {
            health: (20.0, 100.0),
        };
        let ctx = CastContext {
            target_point: None,
            pose: &pose,
            world: &wounded,
        };
        assert!(handler.passive_trigger(&ctx, &test_config()));
    }
}
