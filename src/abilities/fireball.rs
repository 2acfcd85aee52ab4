/// 火球術 (fireball)
///
/// 起始技能 - 地面目標範圍傷害
///
/// 功能：
/// - 透過瞄準模式選取落點
/// - 對落點半徑內所有敵人造成傷害

use crate::ability::{AbilityHandler, CastContext};
use crate::config::AbilityConfig;
use crate::types::AbilityEffect;

/// 火球術處理器
pub struct FireballHandler;

impl FireballHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AbilityHandler for FireballHandler {
    fn ability_id(&self) -> &str {
        "fireball"
    }

    fn execute(&self, ctx: &CastContext, config: &AbilityConfig) -> Vec<AbilityEffect> {
        let center = match ctx.target_point {
            Some(point) => point,
            None => return Vec::new(),
        };

        let damage = config.extra_value("damage").unwrap_or(35.0);
        let radius = config.extra_value("radius").unwrap_or(3.0);

        vec![AbilityEffect::AreaDamage {
            center,
            radius,
            amount: damage,
        }]
    }
}

impl Default for FireballHandler {
    fn default() -> Self {
        Self::new()
    }
}
