/// 背水一戰 (dead_mans_rally)
///
/// 持續型技能 - 獎勵進攻的增傷姿態
///
/// 功能：
/// - 啟用時標記周圍敵人（受到傷害提高）並提高自身傷害
/// - 啟用期間每次擊殺隨機重置一個冷卻中的技能
/// - 結束時清掉還活著的敵人身上的標記；已死亡的目標由世界端
///   容忍跳過

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::{AbilityEffect, EffectTag};

/// 背水一戰處理器
pub struct DeadMansRallyHandler;

impl DeadMansRallyHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for DeadMansRallyHandler {
    fn ability_id(&self) -> &str {
        "dead_mans_rally"
    }

    fn execute(&self, ctx: &CastContext, config: &AbilityConfig) -> Vec<AbilityEffect> {
        let rally_radius = config.extra_value("rally_radius").unwrap_or(8.0);
        let damage_taken = config.extra_value("damage_taken_multiplier").unwrap_or(1.25);
        let center = ctx.pose.position();

        let targets = ctx.world.targets_in_radius(center, rally_radius);
        let mut effects = Vec::with_capacity(targets.len());
        for target in targets {
            effects.push(AbilityEffect::ApplyStatus {
                target,
                modifier_type: "damage_taken_multiplier".to_string(),
                value: damage_taken,
                // 標記跟著技能走，停用時由清理掛鉤移除
                duration: None,
            });
        }
        effects
    }

    fn on_deactivate(&self, _config: &AbilityConfig) -> Vec<AbilityEffect> {
        vec![AbilityEffect::ClearStatuses]
    }

    fn effect_tags(&self, config: &AbilityConfig) -> Vec<EffectTag> {
        vec![
            EffectTag::DamageMultiplier(config.extra_value("damage_multiplier").unwrap_or(1.2)),
            EffectTag::CooldownResetOnKill,
        ]
    }
}

impl Default for DeadMansRallyHandler {
    fn default() -> Self {
        Self::new()
    }
}
