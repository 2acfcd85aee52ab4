/// 延遲效果排程器
///
/// 延遲落地的技能效果（隕石落點、定時清理）掛在這裡，用縮放後
/// 的增量時間推進。與冷卻共用同一時鐘，所以瞄準模式凍結時鐘時
/// 飛行中的延遲效果也一併暫停，不會用獨立計時器偷跑。

use crate::types::AbilityEffect;

/// 待執行的延遲效果
pub struct PendingEffect {
    pub source_ability: String,
    pub remaining: f32,
    pub effects: Vec<AbilityEffect>,
}

pub struct EffectScheduler {
    pending: Vec<PendingEffect>,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, source_ability: &str, delay: f32, effects: Vec<AbilityEffect>) {
        self.pending.push(PendingEffect {
            source_ability: source_ability.to_string(),
            remaining: delay.max(0.0),
            effects,
        });
    }

    /// 推進並取出到期的效果，依來源技能分組回傳
    pub fn collect_due(&mut self, dt: f32) -> Vec<(String, Vec<AbilityEffect>)> {
        let mut due = Vec::new();
        let mut remaining = Vec::new();

        for mut entry in self.pending.drain(..) {
            entry.remaining -= dt;
            if entry.remaining <= 0.0 {
                due.push((entry.source_ability, entry.effects));
            } else {
                remaining.push(entry);
            }
        }

        self.pending = remaining;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for EffectScheduler {
    fn default() -> Self {
        Self::new()
    }
}
