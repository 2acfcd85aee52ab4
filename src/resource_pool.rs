/// 資源池 - 法術施放的消耗性資源（法力）
///
/// 不變量：0 <= current <= max。呼叫端必須先用 can_afford 把關
/// 再 consume；沒把關就呼叫屬於程式錯誤，除錯組建會斷言，
/// 發行組建則夾到零而不是讓狀態壞掉。

pub struct ResourcePool {
    current: f32,
    max: f32,
}

impl ResourcePool {
    /// 建立滿載的資源池
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// 以指定存量建立（超出上限時夾到上限）
    pub fn with_current(current: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// 扣除資源；前置條件是 can_afford 已成立
    pub fn consume(&mut self, cost: f32) {
        debug_assert!(
            self.can_afford(cost),
            "未經 can_afford 檢查就呼叫 consume: cost={} current={}",
            cost,
            self.current
        );
        self.current = (self.current - cost.max(0.0)).max(0.0);
    }

    /// 恢復資源，夾在上限
    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    /// 按縮放後的經過時間回復資源
    /// elapsed 來自共用時鐘，瞄準模式凍結時自然停止回復
    pub fn regenerate(&mut self, rate_per_second: f32, elapsed: f32) {
        if rate_per_second > 0.0 && elapsed > 0.0 {
            self.restore(rate_per_second * elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_and_restore_stay_in_bounds() {
        let mut pool = ResourcePool::with_current(10.0, 50.0);
        assert!(pool.can_afford(3.0));
        pool.consume(3.0);
        assert_eq!(pool.current(), 7.0);

        pool.restore(100.0);
        assert_eq!(pool.current(), 50.0);
    }

    #[test]
    fn test_cannot_afford_more_than_current() {
        let pool = ResourcePool::with_current(2.0, 50.0);
        assert!(!pool.can_afford(3.0));
        assert!(pool.can_afford(2.0));
    }

    #[test]
    fn test_regenerate_scales_with_elapsed() {
        let mut pool = ResourcePool::with_current(0.0, 20.0);
        pool.regenerate(4.0, 2.5);
        assert_eq!(pool.current(), 10.0);

        // 時鐘凍結時 elapsed 為零，不回復
        pool.regenerate(4.0, 0.0);
        assert_eq!(pool.current(), 10.0);
    }

    #[test]
    fn test_with_current_clamps() {
        let pool = ResourcePool::with_current(80.0, 50.0);
        assert_eq!(pool.current(), 50.0);
    }
}
