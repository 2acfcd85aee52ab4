/// 石膚術 (stone_skin)
///
/// 持續型技能 - 短時間傷害免疫
///
/// 功能：
/// - 啟用期間免疫所有傷害，移動速度下降
/// - 持續時間到自動解除

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::{AbilityEffect, EffectTag};

/// 石膚術處理器
pub struct StoneSkinHandler;

impl StoneSkinHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for StoneSkinHandler {
    fn ability_id(&self) -> &str {
        "stone_skin"
    }

    fn execute(&self, _ctx: &CastContext, _config: &AbilityConfig) -> Vec<AbilityEffect> {
        Vec::new()
    }

    fn effect_tags(&self, config: &AbilityConfig) -> Vec<EffectTag> {
        vec![
            EffectTag::Invulnerable,
            EffectTag::MoveSpeedMultiplier(config.extra_value("move_speed_multiplier").unwrap_or(0.7)),
        ]
    }
}

impl Default for StoneSkinHandler {
    fn default() -> Self {
        Self::new()
    }
}
