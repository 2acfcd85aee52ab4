/// 快捷列 - 三列十格的固定格位表
///
/// 格位存的是技能或消耗品的識別碼參照，不持有技能本體。
/// 越界座標是刻意的寬容邊界：靜默忽略並留下診斷，不當錯誤。

use serde::{Deserialize, Serialize};

pub const HOTBAR_ROWS: usize = 3;
pub const HOTBAR_COLUMNS: usize = 10;

/// 格位綁定：技能或消耗品，互斥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotBinding {
    Ability(String),
    Consumable(String),
}

pub struct Hotbar {
    slots: Vec<Option<SlotBinding>>,
}

impl Hotbar {
    pub fn new() -> Self {
        Self {
            slots: vec![None; HOTBAR_ROWS * HOTBAR_COLUMNS],
        }
    }

    fn index(row: usize, column: usize) -> Option<usize> {
        if row < HOTBAR_ROWS && column < HOTBAR_COLUMNS {
            Some(row * HOTBAR_COLUMNS + column)
        } else {
            None
        }
    }

    pub fn assign(&mut self, row: usize, column: usize, binding: SlotBinding) {
        match Self::index(row, column) {
            Some(idx) => self.slots[idx] = Some(binding),
            None => log::warn!("快捷列座標越界，忽略綁定: ({}, {})", row, column),
        }
    }

    pub fn clear(&mut self, row: usize, column: usize) {
        match Self::index(row, column) {
            Some(idx) => self.slots[idx] = None,
            None => log::warn!("快捷列座標越界，忽略清除: ({}, {})", row, column),
        }
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&SlotBinding> {
        Self::index(row, column).and_then(|idx| self.slots[idx].as_ref())
    }
}

impl Default for Hotbar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_get() {
        let mut hotbar = Hotbar::new();
        hotbar.assign(0, 0, SlotBinding::Ability("fireball".to_string()));
        hotbar.assign(2, 9, SlotBinding::Consumable("health_potion".to_string()));

        assert_eq!(
            hotbar.get(0, 0),
            Some(&SlotBinding::Ability("fireball".to_string()))
        );
        assert_eq!(
            hotbar.get(2, 9),
            Some(&SlotBinding::Consumable("health_potion".to_string()))
        );
        assert_eq!(hotbar.get(1, 5), None);
    }

    #[test]
    fn test_out_of_range_assign_is_noop() {
        let mut hotbar = Hotbar::new();
        hotbar.assign(5, 3, SlotBinding::Ability("heal".to_string()));
        assert_eq!(hotbar.get(5, 3), None);

        hotbar.assign(0, 10, SlotBinding::Ability("heal".to_string()));
        for column in 0..HOTBAR_COLUMNS {
            assert_eq!(hotbar.get(0, column), None);
        }
    }

    #[test]
    fn test_clear_and_rebind() {
        let mut hotbar = Hotbar::new();
        hotbar.assign(1, 1, SlotBinding::Ability("heal".to_string()));
        hotbar.clear(1, 1);
        assert_eq!(hotbar.get(1, 1), None);

        // 越界清除同樣靜默
        hotbar.clear(9, 9);

        hotbar.assign(1, 1, SlotBinding::Consumable("mana_potion".to_string()));
        assert_eq!(
            hotbar.get(1, 1),
            Some(&SlotBinding::Consumable("mana_potion".to_string()))
        );
    }
}
