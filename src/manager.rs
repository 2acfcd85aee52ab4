/// 技能管理器 - 系統的唯一入口
///
/// 持有技能註冊表、快捷列、解鎖集合、資源池、時鐘、延遲效果
/// 排程器與瞄準會話，其他系統一律透過這裡的公開操作讀寫技能
/// 狀態。協作者（射線、傷害結算、UI 狀態）在建構時注入，不用
/// 全域單例。
///
/// 幀序約定：宿主每幀先呼叫 update 再分派輸入。冷卻與持續時間
/// 的遞減發生在輸入處理之前，同一幀結束的冷卻在同一幀就能再
/// 施放。

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use crate::ability::{Ability, AbilityHandler, ActivationPath, CastContext};
use crate::clock::GameClock;
use crate::config::AbilityConfig;
use crate::events::AbilityEvent;
use crate::hotbar::{Hotbar, SlotBinding};
use crate::resource_pool::ResourcePool;
use crate::scheduler::EffectScheduler;
use crate::targeting::TargetingSession;
use crate::types::{
    AbilityEffect, AbilityKind, ActivationError, CombatWorld, EffectTag, PlayerPose,
    RegistryError, TargetingResolver, UiBlockState,
};

pub struct AbilityManager {
    clock: GameClock,
    resource_pool: ResourcePool,
    /// 每秒回魔速率，吃縮放後的時間
    resource_regen_rate: f32,
    /// 註冊表用 BTreeMap，遍歷順序固定
    abilities: BTreeMap<String, Ability>,
    hotbar: Hotbar,
    scheduler: EffectScheduler,
    /// 同時間最多一個瞄準會話
    targeting: Option<TargetingSession>,
    pose: Box<dyn PlayerPose>,
    resolver: Box<dyn TargetingResolver>,
    world: Box<dyn CombatWorld>,
    ui: Box<dyn UiBlockState>,
    /// 宿主每幀取走的事件佇列
    events: Vec<AbilityEvent>,
    /// 瞄準會話關閉後，下一個 tick 再斷言一次指標模式
    pointer_reassert_pending: bool,
}

impl AbilityManager {
    pub fn new(
        clock: GameClock,
        resource_pool: ResourcePool,
        pose: Box<dyn PlayerPose>,
        resolver: Box<dyn TargetingResolver>,
        world: Box<dyn CombatWorld>,
        ui: Box<dyn UiBlockState>,
    ) -> Self {
        Self {
            clock,
            resource_pool,
            resource_regen_rate: 0.0,
            abilities: BTreeMap::new(),
            hotbar: Hotbar::new(),
            scheduler: EffectScheduler::new(),
            targeting: None,
            pose,
            resolver,
            world,
            ui,
            events: Vec::new(),
            pointer_reassert_pending: false,
        }
    }

    /// 設定每秒回魔速率
    pub fn with_resource_regen(mut self, rate_per_second: f32) -> Self {
        self.resource_regen_rate = rate_per_second.max(0.0);
        self
    }

    // ------------------------------------------------------------------
    // 註冊與查詢
    // ------------------------------------------------------------------

    /// 註冊技能；重複識別碼是作者錯誤，拒絕並大聲記錄
    pub fn register(
        &mut self,
        config: AbilityConfig,
        handler: Box<dyn AbilityHandler>,
    ) -> Result<(), RegistryError> {
        if self.abilities.contains_key(&config.id) {
            log::error!("技能 {} 已註冊，拒絕重複註冊", config.id);
            return Err(RegistryError::DuplicateId(config.id.clone()));
        }
        if config.kind == AbilityKind::Duration && config.active_duration.is_none() {
            log::warn!("持續型技能 {} 未設定持續時間", config.id);
        }
        log::info!("註冊技能: {} ({:?})", config.id, config.kind);
        self.abilities
            .insert(config.id.clone(), Ability::new(config, handler));
        Ok(())
    }

    pub fn ability(&self, ability_id: &str) -> Option<&Ability> {
        self.abilities.get(ability_id)
    }

    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn resource_pool(&self) -> &ResourcePool {
        &self.resource_pool
    }

    /// 外部補魔入口（藥水等），資源池本體不外借
    pub fn restore_resource(&mut self, amount: f32) {
        self.resource_pool.restore(amount);
    }

    /// 取走累積的事件（UI、音效每幀輪詢）
    pub fn drain_events(&mut self) -> Vec<AbilityEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // 幀更新
    // ------------------------------------------------------------------

    /// 每幀推進：時鐘 -> 回魔 -> 技能計時 -> 延遲效果 -> 被動觸發
    ///
    /// 必須在當幀輸入分派之前呼叫
    pub fn update(&mut self, real_dt: f32) {
        let dt = self.clock.advance(real_dt);

        // 回魔與時鐘同源，瞄準凍結時自然停止
        self.resource_pool.regenerate(self.resource_regen_rate, dt);

        let mut expired = Vec::new();
        for ability in self.abilities.values_mut() {
            if ability.update(dt, &mut self.events) {
                expired.push(ability.id().to_string());
            }
        }
        for ability_id in expired {
            self.run_deactivation_cleanup(&ability_id);
        }

        for (source_ability, effects) in self.scheduler.collect_due(dt) {
            self.apply_effects(&source_ability, effects);
        }

        self.update_passives();

        // 防禦性重複斷言：會話關閉後的下一個 tick，若指標模式被
        // 其他系統搶走，再退出一次
        if self.pointer_reassert_pending {
            self.pointer_reassert_pending = false;
            if self.targeting.is_none() {
                self.resolver.exit_targeting_mode();
            }
        }
    }

    // ------------------------------------------------------------------
    // 啟動入口
    // ------------------------------------------------------------------

    /// 依識別碼啟動技能
    ///
    /// Targeted 技能沒有現成目標點時改開瞄準會話，施放發生在
    /// 確認手勢；回傳值表示請求是否被受理
    pub fn activate_by_id(&mut self, ability_id: &str) -> bool {
        let decision = match self.abilities.get(ability_id) {
            None => Err(ActivationError::UnknownAbility(ability_id.to_string())),
            Some(ability) if !ability.is_unlocked() => Err(ActivationError::NotUnlocked),
            Some(ability) => ability.check_activation(&self.resource_pool).map(|_| ()),
        };

        match decision {
            Ok(()) => self.activate_resolved(ability_id),
            Err(ActivationError::MissingTarget) => {
                if self.is_targeting_for(ability_id) {
                    // 同一技能的會話已開啟，出口只有確認/取消手勢
                    log::debug!("瞄準模式已開啟，忽略重複請求: {}", ability_id);
                    false
                } else {
                    self.open_targeting(ability_id);
                    true
                }
            }
            Err(reason) => {
                self.report_failure(ability_id, reason);
                false
            }
        }
    }

    /// 啟動快捷列格位；消耗品綁定優先於技能
    pub fn activate_hotbar_slot(&mut self, row: usize, column: usize) {
        // 模態視窗開啟時抑制快捷列輸入
        if self.ui.is_any_modal_open() {
            log::debug!("模態視窗開啟中，忽略快捷列輸入: ({}, {})", row, column);
            return;
        }

        let binding = self.hotbar.get(row, column).cloned();
        match binding {
            Some(SlotBinding::Consumable(item_id)) => {
                log::debug!("快捷列請求消耗品: {}", item_id);
                self.events.push(AbilityEvent::ConsumableRequested { item_id });
            }
            Some(SlotBinding::Ability(ability_id)) => {
                self.activate_by_id(&ability_id);
            }
            None => log::debug!("快捷列格位未綁定: ({}, {})", row, column),
        }
    }

    fn activate_resolved(&mut self, ability_id: &str) -> bool {
        match self.try_activate_internal(ability_id) {
            Ok(()) => true,
            Err(reason) => {
                self.report_failure(ability_id, reason);
                false
            }
        }
    }

    fn report_failure(&mut self, ability_id: &str, reason: ActivationError) {
        log::debug!("技能 {} 啟動失敗: {}", ability_id, reason);
        self.events.push(AbilityEvent::ActivationFailed {
            ability_id: ability_id.to_string(),
            reason,
        });
    }

    /// 完整的啟動流程；失敗時不留下任何狀態變化
    fn try_activate_internal(&mut self, ability_id: &str) -> Result<(), ActivationError> {
        let (started, effects) = {
            let ability = match self.abilities.get_mut(ability_id) {
                Some(a) => a,
                None => return Err(ActivationError::UnknownAbility(ability_id.to_string())),
            };
            if !ability.is_unlocked() {
                return Err(ActivationError::NotUnlocked);
            }

            match ability.check_activation(&self.resource_pool)? {
                ActivationPath::ToggleOff => {
                    let effects = if ability.deactivate(&mut self.events) {
                        ability.handler().on_deactivate(ability.config())
                    } else {
                        Vec::new()
                    };
                    (false, effects)
                }
                ActivationPath::Start => {
                    let ctx = CastContext {
                        target_point: ability.target_position(),
                        pose: self.pose.as_ref(),
                        world: self.world.as_ref(),
                    };
                    let precondition_ok =
                        ability.handler().extra_precondition(&ctx, ability.config());
                    let effects = if precondition_ok {
                        ability.handler().execute(&ctx, ability.config())
                    } else {
                        Vec::new()
                    };
                    // 瞄準結果用過即丟，避免過期目標點繞過瞄準模式
                    ability.clear_target_position();
                    if !precondition_ok {
                        return Err(ActivationError::PreconditionFailed);
                    }
                    ability.commit_start(&mut self.resource_pool, &mut self.events);
                    (true, effects)
                }
            }
        };

        if started {
            log::info!("技能施放: {}", ability_id);
            self.events.push(AbilityEvent::Activated {
                ability_id: ability_id.to_string(),
            });
        } else {
            log::info!("切換技能關閉: {}", ability_id);
        }
        self.apply_effects(ability_id, effects);
        Ok(())
    }

    /// 把處理器回傳的效果資料套用到世界
    fn apply_effects(&mut self, source_ability: &str, effects: Vec<AbilityEffect>) {
        let damage_multiplier = self.damage_multiplier();
        let source_position = self.pose.position();

        for effect in effects {
            match effect {
                AbilityEffect::Damage { target, amount } => {
                    self.world.apply_damage(
                        target,
                        amount * damage_multiplier,
                        source_position,
                        source_ability,
                    );
                }
                AbilityEffect::AreaDamage {
                    center,
                    radius,
                    amount,
                } => {
                    let targets = self.world.targets_in_radius(center, radius);
                    for target in targets {
                        self.world.apply_damage(
                            target,
                            amount * damage_multiplier,
                            center,
                            source_ability,
                        );
                    }
                }
                AbilityEffect::HealPlayer { amount } => {
                    self.world.apply_heal_player(amount);
                }
                AbilityEffect::ApplyStatus {
                    target,
                    modifier_type,
                    value,
                    duration,
                } => {
                    self.world
                        .apply_status(target, &modifier_type, value, duration, source_ability);
                }
                AbilityEffect::ClearStatuses => {
                    self.world.clear_statuses(source_ability);
                }
                AbilityEffect::Delayed { delay, effects } => {
                    self.scheduler.schedule(source_ability, delay, effects);
                }
            }
        }
    }

    fn run_deactivation_cleanup(&mut self, ability_id: &str) {
        let effects = match self.abilities.get(ability_id) {
            Some(ability) => ability.handler().on_deactivate(ability.config()),
            None => return,
        };
        self.apply_effects(ability_id, effects);
    }

    // ------------------------------------------------------------------
    // 被動技能
    // ------------------------------------------------------------------

    fn update_passives(&mut self) {
        let mut triggered = Vec::new();
        for (ability_id, ability) in &self.abilities {
            if ability.kind() != AbilityKind::Passive
                || !ability.is_unlocked()
                || ability.is_on_cooldown()
                || !self.resource_pool.can_afford(ability.config().resource_cost)
            {
                continue;
            }
            let ctx = CastContext {
                target_point: None,
                pose: self.pose.as_ref(),
                world: self.world.as_ref(),
            };
            if ability.handler().passive_trigger(&ctx, ability.config()) {
                triggered.push(ability_id.clone());
            }
        }
        for ability_id in triggered {
            self.trigger_passive(&ability_id);
        }
    }

    fn trigger_passive(&mut self, ability_id: &str) {
        let effects = {
            let ability = match self.abilities.get_mut(ability_id) {
                Some(a) => a,
                None => return,
            };
            if ability.is_on_cooldown()
                || !self.resource_pool.can_afford(ability.config().resource_cost)
            {
                return;
            }
            let ctx = CastContext {
                target_point: None,
                pose: self.pose.as_ref(),
                world: self.world.as_ref(),
            };
            let effects = ability.handler().execute(&ctx, ability.config());
            ability.commit_start(&mut self.resource_pool, &mut self.events);
            effects
        };

        log::info!("被動技能自動觸發: {}", ability_id);
        self.events.push(AbilityEvent::Activated {
            ability_id: ability_id.to_string(),
        });
        self.apply_effects(ability_id, effects);
    }

    // ------------------------------------------------------------------
    // 瞄準會話
    // ------------------------------------------------------------------

    pub fn is_targeting(&self) -> bool {
        self.targeting.is_some()
    }

    pub fn targeting_ability_id(&self) -> Option<&str> {
        self.targeting.as_ref().map(|s| s.ability_id())
    }

    fn is_targeting_for(&self, ability_id: &str) -> bool {
        self.targeting
            .as_ref()
            .map(|s| s.ability_id() == ability_id)
            .unwrap_or(false)
    }

    fn open_targeting(&mut self, ability_id: &str) {
        // 後到者優先：先強制關閉上一個還開著的會話
        if let Some(stale) = self.targeting.take() {
            let stale_id = stale.ability_id().to_string();
            log::warn!("瞄準請求被新請求搶占: {} -> {}", stale_id, ability_id);
            stale.close(&mut self.clock, self.resolver.as_mut());
            self.pointer_reassert_pending = true;
            self.events.push(AbilityEvent::TargetingCancelled {
                ability_id: stale_id,
            });
        }

        let (radius, color) = match self.abilities.get(ability_id) {
            Some(ability) => (
                ability.config().indicator_radius,
                ability.config().indicator_color,
            ),
            None => return,
        };
        let session = TargetingSession::open(
            ability_id,
            radius,
            color,
            &mut self.clock,
            self.resolver.as_mut(),
        );
        self.targeting = Some(session);
        self.events.push(AbilityEvent::TargetingOpened {
            ability_id: ability_id.to_string(),
        });
    }

    /// 確認手勢：解析目標點、交給技能、嘗試施放；無論成敗都關閉會話
    pub fn confirm_targeting(&mut self) -> bool {
        let session = match self.targeting.take() {
            Some(s) => s,
            None => return false,
        };
        let ability_id = session.ability_id().to_string();
        let point = session.resolve_point(self.pose.as_ref(), self.resolver.as_ref());

        // 技能在開啟與確認之間消失時視同取消
        // （註冊後不會移除技能，這是防禦性處理）
        let activated = match self.abilities.get_mut(&ability_id) {
            Some(ability) => {
                ability.set_target_position(point);
                self.events.push(AbilityEvent::TargetingConfirmed {
                    ability_id: ability_id.clone(),
                    point,
                });
                self.activate_resolved(&ability_id)
            }
            None => {
                log::warn!("瞄準中的技能已不存在，視同取消: {}", ability_id);
                self.events.push(AbilityEvent::TargetingCancelled {
                    ability_id: ability_id.clone(),
                });
                false
            }
        };

        session.close(&mut self.clock, self.resolver.as_mut());
        self.pointer_reassert_pending = true;
        activated
    }

    /// 取消手勢：直接關閉會話，不碰技能
    pub fn cancel_targeting(&mut self) {
        if let Some(session) = self.targeting.take() {
            let ability_id = session.ability_id().to_string();
            session.close(&mut self.clock, self.resolver.as_mut());
            self.pointer_reassert_pending = true;
            self.events
                .push(AbilityEvent::TargetingCancelled { ability_id });
        }
    }

    // ------------------------------------------------------------------
    // 快捷列
    // ------------------------------------------------------------------

    pub fn assign_hotbar_ability(&mut self, row: usize, column: usize, ability_id: &str) {
        if !self.abilities.contains_key(ability_id) {
            log::warn!("綁定的技能尚未註冊: {}", ability_id);
        }
        self.hotbar
            .assign(row, column, SlotBinding::Ability(ability_id.to_string()));
    }

    pub fn assign_hotbar_consumable(&mut self, row: usize, column: usize, item_id: &str) {
        self.hotbar
            .assign(row, column, SlotBinding::Consumable(item_id.to_string()));
    }

    pub fn clear_hotbar_slot(&mut self, row: usize, column: usize) {
        self.hotbar.clear(row, column);
    }

    pub fn hotbar_binding(&self, row: usize, column: usize) -> Option<&SlotBinding> {
        self.hotbar.get(row, column)
    }

    // ------------------------------------------------------------------
    // 解鎖
    // ------------------------------------------------------------------

    /// 解鎖技能；不存在或已解鎖時失敗
    pub fn unlock(&mut self, ability_id: &str) -> bool {
        match self.abilities.get_mut(ability_id) {
            None => {
                log::warn!("解鎖失敗，技能不存在: {}", ability_id);
                false
            }
            Some(ability) if ability.is_unlocked() => {
                log::warn!("技能已解鎖: {}", ability_id);
                false
            }
            Some(ability) => {
                ability.set_unlocked(true);
                let is_spell = ability.config().is_spell();
                log::info!("解鎖技能: {} (法術: {})", ability_id, is_spell);
                self.events.push(AbilityEvent::Unlocked {
                    ability_id: ability_id.to_string(),
                    is_spell,
                });
                true
            }
        }
    }

    pub fn is_unlocked(&self, ability_id: &str) -> bool {
        self.abilities
            .get(ability_id)
            .map(|a| a.is_unlocked())
            .unwrap_or(false)
    }

    pub fn unlocked_abilities(&self) -> Vec<&Ability> {
        self.abilities.values().filter(|a| a.is_unlocked()).collect()
    }

    /// 玩家等級達標即可解鎖的技能清單（純查詢，不變動狀態）
    pub fn available_at_level(&self, level: i32) -> Vec<&Ability> {
        self.abilities
            .values()
            .filter(|a| a.config().required_level <= level)
            .collect()
    }

    /// 存檔合約：匯出解鎖集合，格式由存檔協作者決定
    pub fn export_unlocked_ids(&self) -> BTreeSet<String> {
        self.abilities
            .iter()
            .filter(|(_, a)| a.is_unlocked())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// 存檔合約：以存檔內容重設解鎖集合（起始技能一律保持解鎖）
    pub fn import_unlocked_ids(&mut self, ids: &BTreeSet<String>) {
        for unknown in ids.iter().filter(|id| !self.abilities.contains_key(*id)) {
            log::warn!("存檔中的技能不存在，跳過: {}", unknown);
        }
        for (ability_id, ability) in &mut self.abilities {
            let unlocked = ids.contains(ability_id) || ability.config().starts_unlocked;
            ability.set_unlocked(unlocked);
        }
    }

    // ------------------------------------------------------------------
    // 跨技能衍生查詢
    // ------------------------------------------------------------------

    pub fn is_ability_active(&self, ability_id: &str) -> bool {
        self.abilities
            .get(ability_id)
            .map(|a| a.is_active())
            .unwrap_or(false)
    }

    fn active_effect_tags(&self) -> Vec<EffectTag> {
        self.abilities
            .values()
            .filter(|a| a.is_active())
            .flat_map(|a| a.handler().effect_tags(a.config()))
            .collect()
    }

    /// 移動速度倍率 - 啟用中技能宣告標籤的乘積
    pub fn move_speed_multiplier(&self) -> f32 {
        self.active_effect_tags()
            .iter()
            .filter_map(|tag| match tag {
                EffectTag::MoveSpeedMultiplier(m) => Some(*m),
                _ => None,
            })
            .product()
    }

    /// 傷害倍率 - 啟用中技能宣告標籤的乘積
    pub fn damage_multiplier(&self) -> f32 {
        self.active_effect_tags()
            .iter()
            .filter_map(|tag| match tag {
                EffectTag::DamageMultiplier(m) => Some(*m),
                _ => None,
            })
            .product()
    }

    /// 敵方緩速倍率
    pub fn enemy_slow_multiplier(&self) -> f32 {
        self.active_effect_tags()
            .iter()
            .filter_map(|tag| match tag {
                EffectTag::EnemySlowMultiplier(m) => Some(*m),
                _ => None,
            })
            .product()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.active_effect_tags()
            .iter()
            .any(|tag| matches!(tag, EffectTag::Invulnerable))
    }

    /// 均勻隨機挑一個冷卻中的技能（排除指定識別碼）
    pub fn random_on_cooldown_ability(&self, exclude: &str) -> Option<String> {
        let candidates: Vec<&String> = self
            .abilities
            .iter()
            .filter(|(id, a)| a.is_on_cooldown() && id.as_str() != exclude)
            .map(|(id, _)| id)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let idx = rand::rng().random_range(0..candidates.len());
        Some(candidates[idx].clone())
    }

    /// 強制冷卻歸零（獎勵型機制用），不影響啟用狀態
    pub fn reset_cooldown(&mut self, ability_id: &str) -> bool {
        match self.abilities.get_mut(ability_id) {
            Some(ability) => {
                ability.reset_cooldown(&mut self.events);
                true
            }
            None => false,
        }
    }

    /// 擊殺通知：啟用中帶 CooldownResetOnKill 標籤的技能，各自
    /// 隨機重置一個冷卻中的技能（不含標籤持有者）
    pub fn on_enemy_killed(&mut self) {
        let carriers: Vec<String> = self
            .abilities
            .iter()
            .filter(|(_, a)| {
                a.is_active()
                    && a.handler()
                        .effect_tags(a.config())
                        .contains(&EffectTag::CooldownResetOnKill)
            })
            .map(|(id, _)| id.clone())
            .collect();

        for carrier in carriers {
            if let Some(target) = self.random_on_cooldown_ability(&carrier) {
                log::info!("擊殺獎勵：重置技能冷卻 {}", target);
                self.reset_cooldown(&target);
            }
        }
    }
}
