/// 瞄準模式 - 時間虛擬化的目標點選取
///
/// 開啟時把共用時鐘凍結（倍率歸零），讓玩家慢慢放範圍技能；
/// 這會讓整個遊戲的時間驅動邏輯一起停擺，是刻意的設計取捨。
/// 同時間最多存在一個會話，由管理器以後到者優先仲裁。
///
/// 關閉時一定還原開啟當下捕捉的倍率（不是寫死 1.0），並先還原
/// 指標/攝影機模式再放開時鐘；下一個 tick 管理器會再斷言一次
/// 指標模式，防備其他系統在中間搶走。

use vek::{Rgba, Vec3};

use crate::clock::GameClock;
use crate::types::{PlayerPose, TargetingResolver, WorldPoint};

/// 射線檢測與水平面回退共用的最大瞄準距離
pub const MAX_TARGETING_DISTANCE: f32 = 60.0;

/// 瞄準會話 - 同時間最多一個
pub struct TargetingSession {
    ability_id: String,
    indicator_radius: f32,
    indicator_color: Rgba<f32>,
    /// 開啟當下的時鐘倍率，關閉時原樣還原
    saved_clock_scale: f32,
}

impl TargetingSession {
    /// 開啟會話：捕捉時鐘倍率、凍結時鐘、切進瞄準模式
    pub(crate) fn open(
        ability_id: &str,
        indicator_radius: f32,
        indicator_color: Rgba<f32>,
        clock: &mut GameClock,
        resolver: &mut dyn TargetingResolver,
    ) -> Self {
        let saved_clock_scale = clock.scale();
        clock.set_scale(0.0);
        resolver.enter_targeting_mode(indicator_radius, indicator_color);
        log::info!(
            "進入瞄準模式: {} (還原倍率 {})",
            ability_id,
            saved_clock_scale
        );

        Self {
            ability_id: ability_id.to_string(),
            indicator_radius,
            indicator_color,
            saved_clock_scale,
        }
    }

    pub fn ability_id(&self) -> &str {
        &self.ability_id
    }

    pub fn indicator_radius(&self) -> f32 {
        self.indicator_radius
    }

    pub fn indicator_color(&self) -> Rgba<f32> {
        self.indicator_color
    }

    pub fn saved_clock_scale(&self) -> f32 {
        self.saved_clock_scale
    }

    /// 解析目標點：優先對場景射線檢測，失敗時取視線與玩家所在
    /// 高度水平面的交點，保證一定回傳一個點
    pub(crate) fn resolve_point(
        &self,
        pose: &dyn PlayerPose,
        resolver: &dyn TargetingResolver,
    ) -> WorldPoint {
        let origin = pose.camera_position();
        let direction = pose.look_direction();

        if let Some(point) = resolver.resolve_world_point(origin, direction, MAX_TARGETING_DISTANCE)
        {
            return point;
        }

        ground_plane_fallback(origin, direction, pose.position().y)
    }

    /// 關閉會話：確認、取消與被搶占都收斂到這裡
    ///
    /// 先還原指標/攝影機模式，再放開時鐘倍率；順序刻意固定，
    /// 避免其他系統在時間恢復的同一瞬間搶指標
    pub(crate) fn close(self, clock: &mut GameClock, resolver: &mut dyn TargetingResolver) {
        resolver.exit_targeting_mode();
        clock.set_scale(self.saved_clock_scale);
        log::info!("離開瞄準模式: {}", self.ability_id);
    }
}

/// 視線射線與 y = elevation 水平面的交點
///
/// 射線近乎水平或朝上時交不到平面，改取視線方向最遠點再投影
/// 到該平面，讓確認手勢永遠有結果而不是失敗
pub(crate) fn ground_plane_fallback(
    origin: WorldPoint,
    direction: Vec3<f32>,
    elevation: f32,
) -> WorldPoint {
    let dir = if direction.magnitude_squared() > f32::EPSILON {
        direction.normalized()
    } else {
        Vec3::new(0.0, -1.0, 0.0)
    };

    if dir.y < -1.0e-4 {
        let t = (elevation - origin.y) / dir.y;
        if (0.0..=MAX_TARGETING_DISTANCE).contains(&t) {
            return origin + dir * t;
        }
    }

    let mut point = origin + dir * MAX_TARGETING_DISTANCE;
    point.y = elevation;
    point
}
