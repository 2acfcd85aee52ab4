/// 戰鬥狂怒 (battle_rage)
///
/// 切換技能 - 狂怒姿態
///
/// 功能：
/// - 開啟時提高傷害、降低移動速度，持續到再次切換
/// - 倍率透過效果標籤宣告，由管理器疊加計算
/// - 短冷卻只用來防止連續快速切換

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::{AbilityEffect, EffectTag};

/// 戰鬥狂怒處理器
pub struct BattleRageHandler;

impl BattleRageHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for BattleRageHandler {
    fn ability_id(&self) -> &str {
        "battle_rage"
    }

    fn execute(&self, _ctx: &CastContext, _config: &AbilityConfig) -> Vec<AbilityEffect> {
        // 姿態本身沒有即時效果，倍率全部走標籤
        Vec::new()
    }

    fn effect_tags(&self, config: &AbilityConfig) -> Vec<EffectTag> {
        vec![
            EffectTag::DamageMultiplier(config.extra_value("damage_multiplier").unwrap_or(1.3)),
            EffectTag::MoveSpeedMultiplier(
                config.extra_value("move_speed_multiplier").unwrap_or(0.85),
            ),
        ]
    }
}

impl Default for BattleRageHandler {
    fn default() -> Self {
        Self::new()
    }
}
