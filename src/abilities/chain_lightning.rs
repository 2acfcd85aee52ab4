/// 連鎖閃電 (chain_lightning)
///
/// 地面目標技能 - 多段跳躍傷害
///
/// 功能：
/// - 對落點搜尋半徑內的敵人依序跳躍
/// - 每跳傷害按 jump_falloff 遞減
/// - 命中的敵人短暫緩速
/// - 範圍內沒有敵人時施放被拒絕，不消耗資源

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::AbilityEffect;

/// 連鎖閃電處理器
pub struct ChainLightningHandler;

impl ChainLightningHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for ChainLightningHandler {
    fn ability_id(&self) -> &str {
        "chain_lightning"
    }

    fn extra_precondition(&self, ctx: &CastContext, config: &AbilityConfig) -> bool {
        // 範圍內必須至少有一個可跳躍的目標
        match ctx.target_point {
            Some(point) => {
                let search_radius = config.extra_value("search_radius").unwrap_or(6.0);
                !ctx.world.targets_in_radius(point, search_radius).is_empty()
            }
            None => false,
        }
    }

    fn execute(&self, ctx: &CastContext, config: &AbilityConfig) -> Vec<AbilityEffect> {
        let point = match ctx.target_point {
            Some(point) => point,
            None => return Vec::new(),
        };

        let damage = config.extra_value("damage").unwrap_or(28.0);
        let search_radius = config.extra_value("search_radius").unwrap_or(6.0);
        let max_jumps = config.extra_int("max_jumps").unwrap_or(4) as usize;
        let jump_falloff = config.extra_value("jump_falloff").unwrap_or(0.8);
        let slow_multiplier = config.extra_value("slow_multiplier").unwrap_or(0.6);
        let slow_duration = config.extra_value("slow_duration").unwrap_or(2.5);

        let mut targets = ctx.world.targets_in_radius(point, search_radius);
        targets.truncate(max_jumps);

        let mut effects = Vec::with_capacity(targets.len() * 2);
        for (jump, target) in targets.into_iter().enumerate() {
            effects.push(AbilityEffect::Damage {
                target,
                amount: damage * jump_falloff.powi(jump as i32),
            });
            effects.push(AbilityEffect::ApplyStatus {
                target,
                modifier_type: "move_speed_multiplier".to_string(),
                value: slow_multiplier,
                duration: Some(slow_duration),
            });
        }
        effects
    }
}

impl Default for ChainLightningHandler {
    fn default() -> Self {
        Self::new()
    }
}
