use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::ai::AiConfig;
use crate::game::{GameMode, Mark};

const DEFAULT_THINK_DELAY_MS: u32 = 380;
const DEFAULT_THINK_JITTER_MS: u32 = 180;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ConfigError {
    InvalidJson { message: String },
    InvalidMode { value: String },
    InvalidMark { value: String },
}

/// 会话配置，前端以 JSON 传入，缺省字段取默认值。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub starter: Mark,
    pub think_delay_ms: u32,
    pub think_jitter_ms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::VsComputer,
            starter: Mark::X,
            think_delay_ms: DEFAULT_THINK_DELAY_MS,
            think_jitter_ms: DEFAULT_THINK_JITTER_MS,
            seed: None,
            verbose: false,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|error| ConfigError::InvalidJson {
            message: error.to_string(),
        })
    }

    pub fn from_optional_json(json: Option<&str>) -> Result<Self, ConfigError> {
        match json.map(str::trim) {
            Some(json) if !json.is_empty() => Self::from_json(json),
            _ => Ok(Self::default()),
        }
    }

    pub fn ai_config(&self) -> AiConfig {
        AiConfig::new(
            Duration::from_millis(self.think_delay_ms as u64),
            Duration::from_millis(self.think_jitter_ms as u64),
        )
    }
}

pub fn parse_mode(value: &str) -> Result<GameMode, ConfigError> {
    GameMode::from_str(value).map_err(|_| ConfigError::InvalidMode {
        value: value.to_string(),
    })
}

pub fn parse_mark(value: &str) -> Result<Mark, ConfigError> {
    Mark::from_str(value).map_err(|_| ConfigError::InvalidMark {
        value: value.to_string(),
    })
}
