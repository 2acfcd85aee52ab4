/// 技能實例與處理器介面
///
/// Ability 持有單一技能的執行期狀態（冷卻、持續時間、解鎖、
/// 瞄準結果），AbilityHandler 提供各技能的行為掛鉤。狀態轉移：
/// - Instant/Targeted: Ready -> OnCooldown -> Ready
/// - Duration: Ready -> Active -> OnCooldown -> Ready
/// - Toggle: Ready <-> Active（再次施放即關閉）
/// - Passive: 由各自條件自動觸發，僅受共用冷卻閘制

use crate::config::AbilityConfig;
use crate::events::AbilityEvent;
use crate::resource_pool::ResourcePool;
use crate::types::{
    AbilityEffect, AbilityKind, ActivationError, CombatWorld, EffectTag, PlayerPose, WorldPoint,
};

/// 施放上下文 - 傳給處理器的唯讀世界視圖
pub struct CastContext<'a> {
    /// 瞄準模式解析出的目標點（Targeted 技能才有）
    pub target_point: Option<WorldPoint>,
    pub pose: &'a dyn PlayerPose,
    pub world: &'a dyn CombatWorld,
}

/// 技能處理器 trait - 每個技能實作自己的行為掛鉤
pub trait AbilityHandler: Send + Sync {
    /// 獲取技能識別碼
    fn ability_id(&self) -> &str;

    /// 技能專屬的額外前置條件，預設不設限
    fn extra_precondition(&self, _ctx: &CastContext, _config: &AbilityConfig) -> bool {
        true
    }

    /// 產生技能效果，由管理器套用到世界
    fn execute(&self, ctx: &CastContext, config: &AbilityConfig) -> Vec<AbilityEffect>;

    /// 停用時的清理掛鉤
    /// 回傳的效果同樣由管理器套用；受影響的實體可能已經消失，
    /// 清理必須能容忍失效參照
    fn on_deactivate(&self, _config: &AbilityConfig) -> Vec<AbilityEffect> {
        Vec::new()
    }

    /// 被動技能的自動觸發條件
    fn passive_trigger(&self, _ctx: &CastContext, _config: &AbilityConfig) -> bool {
        false
    }

    /// 啟用期間對外宣告的效果標籤
    fn effect_tags(&self, _config: &AbilityConfig) -> Vec<EffectTag> {
        Vec::new()
    }
}

/// 啟動檢查通過後要走的路徑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivationPath {
    /// 正常施放
    Start,
    /// 切換技能已啟用，這次施放是對稱的關閉開關
    ToggleOff,
}

/// 技能實例 - 靜態設定加執行期狀態
pub struct Ability {
    config: AbilityConfig,
    handler: Box<dyn AbilityHandler>,
    /// 剩餘冷卻時間，不在冷卻時夾在 0
    cooldown_remaining: f32,
    is_active: bool,
    /// 持續時間剩餘；None 表示沒有倒數（未啟用，或切換技能的無限持續）
    active_duration_remaining: Option<f32>,
    is_unlocked: bool,
    /// 瞄準模式解析出的目標點，施放前由管理器寫入
    target_position: Option<WorldPoint>,
}

impl Ability {
    pub fn new(config: AbilityConfig, handler: Box<dyn AbilityHandler>) -> Self {
        debug_assert_eq!(
            handler.ability_id(),
            config.id,
            "處理器與設定的技能識別碼不一致"
        );
        let is_unlocked = config.starts_unlocked;
        Self {
            config,
            handler,
            cooldown_remaining: 0.0,
            is_active: false,
            active_duration_remaining: None,
            is_unlocked,
            target_position: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &AbilityConfig {
        &self.config
    }

    pub fn kind(&self) -> AbilityKind {
        self.config.kind
    }

    pub fn handler(&self) -> &dyn AbilityHandler {
        self.handler.as_ref()
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.cooldown_remaining > 0.0
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn active_duration_remaining(&self) -> Option<f32> {
        self.active_duration_remaining
    }

    pub fn is_unlocked(&self) -> bool {
        self.is_unlocked
    }

    pub(crate) fn set_unlocked(&mut self, unlocked: bool) {
        self.is_unlocked = unlocked;
    }

    pub fn target_position(&self) -> Option<WorldPoint> {
        self.target_position
    }

    pub(crate) fn set_target_position(&mut self, point: WorldPoint) {
        self.target_position = Some(point);
    }

    pub(crate) fn clear_target_position(&mut self) {
        self.target_position = None;
    }

    /// 每幀推進冷卻與持續時間
    ///
    /// dt 是縮放後的增量時間，時鐘凍結時為零，計時自然停擺。
    /// 回傳這一幀是否因持續時間到期而停用（清理由管理器接手）
    pub(crate) fn update(&mut self, dt: f32, events: &mut Vec<AbilityEvent>) -> bool {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
            if self.cooldown_remaining == 0.0 {
                events.push(AbilityEvent::CooldownFinished {
                    ability_id: self.config.id.clone(),
                });
            }
        }

        if self.is_active && self.config.kind == AbilityKind::Duration {
            if let Some(remaining) = self.active_duration_remaining {
                let next = (remaining - dt).max(0.0);
                self.active_duration_remaining = Some(next);
                // 大時間步也只停用一次：到期即走 deactivate，之後 is_active 為否
                if next == 0.0 {
                    return self.deactivate(events);
                }
            }
        }

        false
    }

    /// 啟動前置檢查，依序硬拒絕；不產生任何副作用
    pub(crate) fn check_activation(
        &self,
        pool: &ResourcePool,
    ) -> Result<ActivationPath, ActivationError> {
        // 切換技能已啟用時走對稱關閉路徑，不受冷卻與資源限制
        if self.config.kind == AbilityKind::Toggle && self.is_active {
            return Ok(ActivationPath::ToggleOff);
        }
        if self.config.kind == AbilityKind::Passive {
            return Err(ActivationError::PassiveNotCastable);
        }
        if self.is_on_cooldown() {
            return Err(ActivationError::OnCooldown(self.cooldown_remaining));
        }
        if !pool.can_afford(self.config.resource_cost) {
            return Err(ActivationError::InsufficientResource {
                required: self.config.resource_cost,
                available: pool.current(),
            });
        }
        if self.config.kind == AbilityKind::Targeted && self.target_position.is_none() {
            return Err(ActivationError::MissingTarget);
        }
        Ok(ActivationPath::Start)
    }

    /// 完成施放：扣資源、開始冷卻，持續/切換技能進入啟用狀態
    pub(crate) fn commit_start(&mut self, pool: &mut ResourcePool, events: &mut Vec<AbilityEvent>) {
        pool.consume(self.config.resource_cost);
        self.begin_cooldown(events);

        match self.config.kind {
            AbilityKind::Duration => {
                self.is_active = true;
                self.active_duration_remaining = Some(self.config.active_duration.unwrap_or(0.0));
            }
            AbilityKind::Toggle => {
                self.is_active = true;
                // 切換技能沒有倒數，持續到再次切換
                self.active_duration_remaining = None;
            }
            _ => {}
        }
    }

    fn begin_cooldown(&mut self, events: &mut Vec<AbilityEvent>) {
        self.cooldown_remaining = self.config.cooldown.max(0.0);
        if self.cooldown_remaining > 0.0 {
            events.push(AbilityEvent::CooldownStarted {
                ability_id: self.config.id.clone(),
                duration: self.cooldown_remaining,
            });
        }
    }

    /// 停用技能；可重複呼叫，未啟用時為 no-op
    pub(crate) fn deactivate(&mut self, events: &mut Vec<AbilityEvent>) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.active_duration_remaining = None;
        events.push(AbilityEvent::Deactivated {
            ability_id: self.config.id.clone(),
        });
        true
    }

    /// 管理操作：強制冷卻歸零並通知，絕不影響啟用狀態
    pub(crate) fn reset_cooldown(&mut self, events: &mut Vec<AbilityEvent>) {
        self.cooldown_remaining = 0.0;
        events.push(AbilityEvent::CooldownReset {
            ability_id: self.config.id.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AbilityKind;
    use std::collections::HashMap;
    use vek::Rgba;

    struct NullHandler {
        id: &'static str,
    }

    impl AbilityHandler for NullHandler {
        fn ability_id(&self) -> &str {
            self.id
        }

        fn execute(&self, _ctx: &CastContext, _config: &AbilityConfig) -> Vec<AbilityEffect> {
            Vec::new()
        }
    }

    fn test_config(id: &str, kind: AbilityKind, cooldown: f32) -> AbilityConfig {
        AbilityConfig {
            id: id.to_string(),
            name: "測試技能".to_string(),
            description: "測試".to_string(),
            kind,
            cooldown,
            resource_cost: 0.0,
            required_level: 0,
            active_duration: Some(5.0),
            starts_unlocked: true,
            indicator_radius: 2.5,
            indicator_color: Rgba::new(1.0, 0.45, 0.1, 0.35),
            extra: HashMap::new(),
        }
    }

    fn test_ability(kind: AbilityKind, cooldown: f32) -> Ability {
        Ability::new(
            test_config("probe", kind, cooldown),
            Box::new(NullHandler { id: "probe" }),
        )
    }

    #[test]
    fn test_cooldown_counts_down_and_clamps() {
        let mut ability = test_ability(AbilityKind::Instant, 5.0);
        let mut pool = ResourcePool::new(10.0);
        let mut events = Vec::new();

        ability.commit_start(&mut pool, &mut events);
        assert_eq!(ability.cooldown_remaining(), 5.0);

        ability.update(2.0, &mut events);
        assert_eq!(ability.cooldown_remaining(), 3.0);

        // 大時間步夾在零，且發出一次冷卻結束事件
        ability.update(100.0, &mut events);
        assert_eq!(ability.cooldown_remaining(), 0.0);
        let finished = events
            .iter()
            .filter(|e| matches!(e, AbilityEvent::CooldownFinished { .. }))
            .count();
        assert_eq!(finished, 1);
    }

    #[test]
    fn test_activation_rejected_while_on_cooldown() {
        let mut ability = test_ability(AbilityKind::Instant, 5.0);
        let mut pool = ResourcePool::new(10.0);
        let mut events = Vec::new();

        ability.commit_start(&mut pool, &mut events);
        let result = ability.check_activation(&pool);
        assert!(matches!(result, Err(ActivationError::OnCooldown(_))));
    }

    #[test]
    fn test_duration_expires_exactly_once_under_large_step() {
        let mut ability = test_ability(AbilityKind::Duration, 0.0);
        let mut pool = ResourcePool::new(10.0);
        let mut events = Vec::new();

        ability.commit_start(&mut pool, &mut events);
        assert!(ability.is_active());
        assert_eq!(ability.active_duration_remaining(), Some(5.0));

        // 100 秒的時間步打在 5 秒持續上，也只停用一次
        let deactivated = ability.update(100.0, &mut events);
        assert!(deactivated);
        assert!(!ability.is_active());

        let deactivations = events
            .iter()
            .filter(|e| matches!(e, AbilityEvent::Deactivated { .. }))
            .count();
        assert_eq!(deactivations, 1);

        // 再推進不會再停用
        assert!(!ability.update(1.0, &mut events));
    }

    #[test]
    fn test_toggle_second_activation_is_off_switch() {
        let mut ability = test_ability(AbilityKind::Toggle, 0.0);
        let pool = ResourcePool::new(10.0);

        assert_eq!(
            ability.check_activation(&pool).unwrap(),
            ActivationPath::Start
        );
        let mut pool = pool;
        let mut events = Vec::new();
        ability.commit_start(&mut pool, &mut events);
        assert!(ability.is_active());
        assert_eq!(ability.active_duration_remaining(), None);

        // 再次施放走關閉路徑，即使掛著冷卻也一樣
        assert_eq!(
            ability.check_activation(&pool).unwrap(),
            ActivationPath::ToggleOff
        );
        assert!(ability.deactivate(&mut events));
        assert!(!ability.is_active());

        // 重複停用是 no-op
        assert!(!ability.deactivate(&mut events));
    }

    #[test]
    fn test_passive_cannot_be_cast_manually() {
        let ability = test_ability(AbilityKind::Passive, 30.0);
        let pool = ResourcePool::new(10.0);
        assert_eq!(
            ability.check_activation(&pool),
            Err(ActivationError::PassiveNotCastable)
        );
    }

    #[test]
    fn test_targeted_requires_target_position() {
        let mut ability = test_ability(AbilityKind::Targeted, 1.0);
        let pool = ResourcePool::new(10.0);

        assert_eq!(
            ability.check_activation(&pool),
            Err(ActivationError::MissingTarget)
        );

        ability.set_target_position(vek::Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(
            ability.check_activation(&pool).unwrap(),
            ActivationPath::Start
        );
    }

    #[test]
    fn test_reset_cooldown_keeps_active_state() {
        let mut ability = test_ability(AbilityKind::Duration, 20.0);
        let mut pool = ResourcePool::new(10.0);
        let mut events = Vec::new();

        ability.commit_start(&mut pool, &mut events);
        assert!(ability.is_on_cooldown());
        assert!(ability.is_active());

        ability.reset_cooldown(&mut events);
        assert_eq!(ability.cooldown_remaining(), 0.0);
        assert!(ability.is_active());
    }
}
