/// 治癒術 (heal)
///
/// 起始技能 - 瞬發自我治療
///
/// 功能：
/// - 立即恢復生命值，超過上限由世界端夾住
/// - 恢復量由設定檔 heal_amount 決定

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::AbilityEffect;

/// 治癒術處理器
pub struct HealHandler;

impl HealHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for HealHandler {
    fn ability_id(&self) -> &str {
        "heal"
    }

    fn execute(&self, _ctx: &CastContext, config: &AbilityConfig) -> Vec<AbilityEffect> {
        let amount = config.extra_value("heal_amount").unwrap_or(20.0);
        vec![AbilityEffect::HealPlayer { amount }]
    }
}

impl Default for HealHandler {
    fn default() -> Self {
        Self::new()
    }
}
