use crate::game::constants::{
    DEFAULT_GOAL, DEFAULT_SNAKE_RATE_MS, MAX_SNAKE_RATE_MS, MIN_SNAKE_RATE_MS,
};
use crate::game::types::MatchRules;
use anyhow::bail;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub public_dir: PathBuf,
    pub rules: MatchRules,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let snake_rate_ms = env::var("SNAKE_RATE_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SNAKE_RATE_MS)
            .clamp(MIN_SNAKE_RATE_MS, MAX_SNAKE_RATE_MS);
        let goal = env::var("GOAL")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(DEFAULT_GOAL);

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
            public_dir: env::var("PUBLIC_DIR")
                .map(|value| value.trim().to_string())
                .ok()
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            rules: MatchRules {
                goal,
                snake_rate: Duration::from_millis(snake_rate_ms),
                ..MatchRules::default()
            },
        }
        .validate()
    }

    fn validate(self) -> anyhow::Result<Self> {
        if self.rules.goal == 0 {
            bail!("GOAL must be at least 1");
        }
        Ok(self)
    }
}
