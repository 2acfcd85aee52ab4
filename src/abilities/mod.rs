/// 內建技能模組
///
/// 此模組包含隨附的技能實作，一個技能一個文件
///
/// 命名規則：
/// - 技能文件：{技能ID}.rs，如 fireball.rs
/// - 數值平衡放在 ability-configs/abilities.yaml，程式只讀取

pub mod battle_rage;
pub mod chain_lightning;
pub mod dead_mans_rally;
pub mod fireball;
pub mod heal;
pub mod meteor;
pub mod second_wind;
pub mod stone_skin;

use crate::ability::AbilityHandler;
use crate::config::AbilityBook;
use crate::manager::AbilityManager;

/// 內建技能書設定
pub const DEFAULT_ABILITY_CONFIG: &str = include_str!("../../ability-configs/abilities.yaml");

/// 內建技能的處理器清單
pub fn default_handlers() -> Vec<Box<dyn AbilityHandler>> {
    vec![
        Box::new(heal::HealHandler::new()),
        Box::new(fireball::FireballHandler::new()),
        Box::new(chain_lightning::ChainLightningHandler::new()),
        Box::new(meteor::MeteorHandler::new()),
        Box::new(battle_rage::BattleRageHandler::new()),
        Box::new(stone_skin::StoneSkinHandler::new()),
        Box::new(dead_mans_rally::DeadMansRallyHandler::new()),
        Box::new(second_wind::SecondWindHandler::new()),
    ]
}

/// 以內建設定註冊整套技能
pub fn register_defaults(manager: &mut AbilityManager) -> Result<(), anyhow::Error> {
    let mut book = AbilityBook::new();
    book.load_from_yaml(DEFAULT_ABILITY_CONFIG)?;

    for handler in default_handlers() {
        let ability_id = handler.ability_id().to_string();
        match book.take(&ability_id) {
            Some(config) => manager.register(config, handler)?,
            None => {
                return Err(anyhow::anyhow!("內建設定缺少技能: {}", ability_id));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::GameClock;
    use crate::resource_pool::ResourcePool;
    use crate::types::{CombatWorld, PlayerPose, TargetId, TargetingResolver, UiBlockState, WorldPoint};
    use vek::{Rgba, Vec3};

    struct NullPose;
    impl PlayerPose for NullPose {
        fn position(&self) -> WorldPoint {
            Vec3::zero()
        }
        fn look_direction(&self) -> Vec3<f32> {
            Vec3::new(0.0, -1.0, 0.0)
        }
        fn camera_position(&self) -> WorldPoint {
            Vec3::zero()
        }
    }

    struct NullResolver;
    impl TargetingResolver for NullResolver {
        fn resolve_world_point(
            &self,
            _origin: WorldPoint,
            _direction: Vec3<f32>,
            _max_distance: f32,
        ) -> Option<WorldPoint> {
            None
        }
        fn enter_targeting_mode(&mut self, _radius: f32, _color: Rgba<f32>) {}
        fn exit_targeting_mode(&mut self) {}
    }

    struct NullWorld;
    impl CombatWorld for NullWorld {
        fn apply_damage(&mut self, _t: TargetId, _a: f32, _p: WorldPoint, _l: &str) {}
        fn apply_heal_player(&mut self, _amount: f32) {}
        fn apply_status(
            &mut self,
            _t: TargetId,
            _m: &str,
            _v: f32,
            _d: Option<f32>,
            _s: &str,
        ) {
        }
        fn clear_statuses(&mut self, _source_ability: &str) {}
        fn targets_in_radius(&self, _c: WorldPoint, _r: f32) -> Vec<TargetId> {
            Vec::new()
        }
        fn player_health(&self) -> (f32, f32) {
            (100.0, 100.0)
        }
    }

    struct NullUi;
    impl UiBlockState for NullUi {
        fn is_any_modal_open(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_register_defaults_loads_whole_roster() {
        let mut manager = AbilityManager::new(
            GameClock::new(),
            ResourcePool::new(50.0),
            Box::new(NullPose),
            Box::new(NullResolver),
            Box::new(NullWorld),
            Box::new(NullUi),
        );
        register_defaults(&mut manager).unwrap();

        assert_eq!(manager.ability_count(), default_handlers().len());
        for handler in default_handlers() {
            assert!(manager.ability(handler.ability_id()).is_some());
        }

        // 起始技能預設解鎖，其餘上鎖
        assert!(manager.is_unlocked("heal"));
        assert!(manager.is_unlocked("fireball"));
        assert!(!manager.is_unlocked("meteor"));
    }

    #[test]
    fn test_register_defaults_twice_rejects_duplicates() {
        let mut manager = AbilityManager::new(
            GameClock::new(),
            ResourcePool::new(50.0),
            Box::new(NullPose),
            Box::new(NullResolver),
            Box::new(NullWorld),
            Box::new(NullUi),
        );
        register_defaults(&mut manager).unwrap();
        assert!(register_defaults(&mut manager).is_err());
    }
}
