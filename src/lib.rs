/// 技能執行期系統
///
/// 動作遊戲的玩家技能/法術執行期：冷卻與資源結算、啟動仲裁、
/// 時間虛擬化的瞄準模式，以及快捷列輸入分派。單執行緒、逐幀
/// 合作式推進；所有「等待」都是幀間狀態，不是阻塞呼叫。
///
/// 幀序約定：宿主每幀先呼叫 AbilityManager::update 再分派輸入

pub mod abilities;
pub mod ability;
pub mod clock;
pub mod config;
pub mod events;
pub mod hotbar;
pub mod manager;
pub mod resource_pool;
pub mod scheduler;
pub mod targeting;
pub mod types;

// Re-export commonly used types
pub use crate::ability::{Ability, AbilityHandler, CastContext};
pub use crate::clock::GameClock;
pub use crate::config::{AbilityBook, AbilityConfig};
pub use crate::events::AbilityEvent;
pub use crate::hotbar::{Hotbar, SlotBinding, HOTBAR_COLUMNS, HOTBAR_ROWS};
pub use crate::manager::AbilityManager;
pub use crate::resource_pool::ResourcePool;
pub use crate::scheduler::EffectScheduler;
pub use crate::targeting::{TargetingSession, MAX_TARGETING_DISTANCE};
pub use crate::types::*;
