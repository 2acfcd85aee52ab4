/// 技能設定 - 技能的靜態資料
///
/// 數值（傷害、半徑、冷卻）屬於平衡配置而非設計，全部放在
/// 設定檔；處理器用 extra 表讀取自訂數值並附帶程式內預設值

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vek::Rgba;

use crate::types::AbilityKind;

/// 技能設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityConfig {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: AbilityKind,

    /// 成功施放後的最短再施放間隔（秒）
    #[serde(default)]
    pub cooldown: f32,
    /// 法力消耗，大於零的技能屬於法術
    #[serde(default)]
    pub resource_cost: f32,
    /// 玩家等級門檻
    #[serde(default)]
    pub required_level: i32,
    /// Duration 類技能的持續時間（秒）
    #[serde(default)]
    pub active_duration: Option<f32>,
    /// 起始技能預設解鎖
    #[serde(default)]
    pub starts_unlocked: bool,

    /// 瞄準模式的範圍指示器大小與顏色
    #[serde(default = "default_indicator_radius")]
    pub indicator_radius: f32,
    #[serde(default = "default_indicator_color")]
    pub indicator_color: Rgba<f32>,

    /// 自訂數值
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_indicator_radius() -> f32 {
    2.5
}

fn default_indicator_color() -> Rgba<f32> {
    Rgba::new(1.0, 0.45, 0.1, 0.35)
}

impl AbilityConfig {
    /// 消耗資源的技能屬於法術（解鎖通知的分類用途）
    pub fn is_spell(&self) -> bool {
        self.resource_cost > 0.0
    }

    /// 從 extra 表讀取自訂數值
    pub fn extra_value(&self, key: &str) -> Option<f32> {
        self.extra
            .get(key)
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
    }

    /// 從 extra 表讀取自訂整數值
    pub fn extra_int(&self, key: &str) -> Option<u32> {
        self.extra.get(key).and_then(|v| v.as_u64()).map(|v| v as u32)
    }
}

/// 技能書 - 設定檔載入與查詢
pub struct AbilityBook {
    configs: HashMap<String, AbilityConfig>,
}

impl AbilityBook {
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// 從文件載入設定，依副檔名判斷格式
    pub fn load_from_file(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let content = std::fs::read_to_string(path)?;

        if path.ends_with(".yaml") || path.ends_with(".yml") {
            self.load_from_yaml(&content)?;
        } else if path.ends_with(".json") {
            self.load_from_json(&content)?;
        } else {
            return Err(anyhow::anyhow!("不支援的檔案格式: {}", path));
        }

        Ok(())
    }

    /// 從YAML載入，頂層鍵就是技能識別碼
    pub fn load_from_yaml(&mut self, content: &str) -> Result<(), anyhow::Error> {
        let configs: HashMap<String, AbilityConfig> = serde_yaml::from_str(content)?;

        for (id, mut config) in configs {
            config.id = id.clone();
            self.configs.insert(id, config);
        }

        Ok(())
    }

    /// 從JSON載入
    pub fn load_from_json(&mut self, content: &str) -> Result<(), anyhow::Error> {
        let configs: HashMap<String, AbilityConfig> = serde_json::from_str(content)?;

        for (id, mut config) in configs {
            config.id = id.clone();
            self.configs.insert(id, config);
        }

        Ok(())
    }

    pub fn get(&self, ability_id: &str) -> Option<&AbilityConfig> {
        self.configs.get(ability_id)
    }

    pub fn take(&mut self, ability_id: &str) -> Option<AbilityConfig> {
        self.configs.remove(ability_id)
    }

    pub fn register_config(&mut self, config: AbilityConfig) {
        self.configs.insert(config.id.clone(), config);
    }

    pub fn all(&self) -> &HashMap<String, AbilityConfig> {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl Default for AbilityBook {
    fn default() -> Self {
        Self::new()
    }
}
