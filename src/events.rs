/// 技能事件 - 一對多通知
///
/// 管理器把事件累積在佇列裡，宿主（UI、音效）每幀用
/// drain_events 取走，取代引擎訊號的廣播語意

use crate::types::{ActivationError, WorldPoint};

#[derive(Debug, Clone, PartialEq)]
pub enum AbilityEvent {
    /// 技能成功施放
    Activated { ability_id: String },
    /// 技能啟動失敗（冷卻中、資源不足等可預期結果）
    ActivationFailed {
        ability_id: String,
        reason: ActivationError,
    },
    /// 持續/切換技能停用
    Deactivated { ability_id: String },
    CooldownStarted { ability_id: String, duration: f32 },
    CooldownFinished { ability_id: String },
    /// 管理操作強制冷卻歸零
    CooldownReset { ability_id: String },
    Unlocked { ability_id: String, is_spell: bool },
    TargetingOpened { ability_id: String },
    TargetingConfirmed {
        ability_id: String,
        point: WorldPoint,
    },
    TargetingCancelled { ability_id: String },
    /// 快捷列格位綁定的是消耗品，由物品系統接手
    ConsumableRequested { item_id: String },
}
