/// 共用型別與外部協作者介面
///
/// 技能系統不直接接觸引擎：射線檢測、傷害結算、UI 狀態都透過
/// 這裡的 trait 由宿主提供，實體一律以不透明識別碼表示

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vek::{Rgba, Vec3};

/// 外部實體識別碼，由宿主發放；本系統不解參照，
/// 協作者必須容忍已失效的識別碼（跳過而非出錯）
pub type TargetId = Uuid;

/// 世界座標點
pub type WorldPoint = Vec3<f32>;

/// 技能類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Instant,  // 瞬發技能，施放後直接進冷卻
    Targeted, // 需要先透過瞄準模式解析地面目標點
    Duration, // 持續一段時間後自動停用
    Toggle,   // 持續到再次切換，無自動到期
    Passive,  // 不可手動施放，由各自條件自動觸發
}

/// 技能啟用期間對外宣告的效果標籤
///
/// 管理器以疊加方式計算全域倍率（移動速度、傷害、緩速），
/// 取代逐一硬編碼的「這個技能是不是某某」檢查
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    MoveSpeedMultiplier(f32),
    DamageMultiplier(f32),
    EnemySlowMultiplier(f32),
    Invulnerable,
    /// 擊殺敵人時隨機重置一個冷卻中的技能
    CooldownResetOnKill,
}

/// 技能效果 - 處理器回傳的純資料，由管理器套用到世界
#[derive(Debug, Clone)]
pub enum AbilityEffect {
    /// 單體傷害
    Damage { target: TargetId, amount: f32 },
    /// 範圍傷害，命中名單由世界查詢決定
    AreaDamage {
        center: WorldPoint,
        radius: f32,
        amount: f32,
    },
    /// 治療玩家
    HealPlayer { amount: f32 },
    /// 對目標掛上狀態修改（減速、易傷等）
    ApplyStatus {
        target: TargetId,
        modifier_type: String,
        value: f32,
        duration: Option<f32>,
    },
    /// 移除此技能來源掛出的所有狀態（停用清理用）
    ClearStatuses,
    /// 延遲執行，掛在共用時鐘上（時鐘凍結時一併暫停）
    Delayed {
        delay: f32,
        effects: Vec<AbilityEffect>,
    },
}

/// 玩家姿態查詢介面
pub trait PlayerPose {
    fn position(&self) -> WorldPoint;
    fn look_direction(&self) -> Vec3<f32>;
    fn camera_position(&self) -> WorldPoint;
}

/// 目標點解析介面
///
/// 射線檢測由宿主實作；進出瞄準模式時的指標/攝影機切換與
/// 範圍指示器顯示也掛在這裡
pub trait TargetingResolver {
    /// 對場景發出射線，命中地板或牆面時回傳世界座標點
    fn resolve_world_point(
        &self,
        origin: WorldPoint,
        direction: Vec3<f32>,
        max_distance: f32,
    ) -> Option<WorldPoint>;

    /// 進入瞄準模式：切換指標/攝影機並顯示指定大小的範圍指示器
    fn enter_targeting_mode(&mut self, radius: f32, color: Rgba<f32>);

    /// 離開瞄準模式：隱藏指示器並還原指標/攝影機
    /// 必須可重複呼叫，關閉後的下一個 tick 會再斷言一次
    fn exit_targeting_mode(&mut self);
}

/// 戰鬥世界介面 - 傷害、治療、狀態與範圍查詢
///
/// 所有接受 TargetId 的方法都必須容忍已失效的識別碼
pub trait CombatWorld {
    fn apply_damage(
        &mut self,
        target: TargetId,
        amount: f32,
        source_position: WorldPoint,
        source_label: &str,
    );
    fn apply_heal_player(&mut self, amount: f32);
    fn apply_status(
        &mut self,
        target: TargetId,
        modifier_type: &str,
        value: f32,
        duration: Option<f32>,
        source_ability: &str,
    );
    /// 移除指定技能來源掛出的所有狀態；目標已消失時靜默跳過
    fn clear_statuses(&mut self, source_ability: &str);
    fn targets_in_radius(&self, center: WorldPoint, radius: f32) -> Vec<TargetId>;
    /// 玩家生命值 (目前, 上限)
    fn player_health(&self) -> (f32, f32);
}

/// UI 阻擋狀態查詢，模態視窗開啟時抑制快捷列輸入
pub trait UiBlockState {
    fn is_any_modal_open(&self) -> bool;
}

/// 技能啟動失敗原因
///
/// 全部屬於可預期、可恢復的使用者層結果，以回傳值表示，
/// 絕不跨越公開介面拋出 panic
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActivationError {
    #[error("技能 {0} 不存在")]
    UnknownAbility(String),
    #[error("技能尚未解鎖")]
    NotUnlocked,
    #[error("技能冷卻中（剩餘 {0:.1} 秒）")]
    OnCooldown(f32),
    #[error("法力不足（需要 {required}，目前 {available}）")]
    InsufficientResource { required: f32, available: f32 },
    #[error("缺少目標位置")]
    MissingTarget,
    #[error("被動技能無法手動施放")]
    PassiveNotCastable,
    #[error("技能前置條件不滿足")]
    PreconditionFailed,
}

/// 註冊階段的設定錯誤
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("技能 {0} 已註冊，拒絕重複註冊")]
    DuplicateId(String),
}
