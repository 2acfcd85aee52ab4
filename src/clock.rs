/// 虛擬時鐘 - 技能系統共用的時間來源
///
/// 時鐘以純量倍率推進，倍率可以降到零（凍結）。冷卻、持續時間、
/// 回魔與延遲效果全部吃縮放後的增量時間，所以凍結時鐘會讓這些
/// 邏輯自然停擺，不需要各自處理暫停。
///
/// 倍率歸零只允許瞄準模式做（見 targeting 模組），且一定還原
/// 開啟前捕捉到的倍率，而不是寫死 1.0。

pub struct GameClock {
    /// 累計虛擬時間（秒）
    time: f64,
    /// 目前速度倍率，0.0 表示凍結
    scale: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            scale: 1.0,
        }
    }

    /// 以自訂基礎倍率建立（支援預設速度不是 1.0 的遊戲）
    pub fn with_scale(scale: f32) -> Self {
        Self {
            time: 0.0,
            scale: scale.max(0.0),
        }
    }

    /// 推進時鐘，回傳縮放後的增量時間
    pub fn advance(&mut self, real_dt: f32) -> f32 {
        let scaled = real_dt.max(0.0) * self.scale;
        self.time += scaled as f64;
        scaled
    }

    /// 累計虛擬時間（秒）
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        debug_assert!(scale >= 0.0, "時鐘倍率不可為負: {}", scale);
        self.scale = scale.max(0.0);
        log::debug!("時鐘倍率設置為: {}", self.scale);
    }

    pub fn is_frozen(&self) -> bool {
        self.scale == 0.0
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
