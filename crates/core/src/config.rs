// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration surface: `.noface/config.toml`, parsed with defaults.

use crate::worker::MAX_WORKERS;
use serde::{Deserialize, Serialize};

fn default_build_command() -> String {
    "make build".to_string()
}

fn default_test_command() -> String {
    "make test".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_build_command")]
    pub build_command: String,
    #[serde(default = "default_test_command")]
    pub test_command: String,
}

fn default_implementer() -> String {
    "claude".to_string()
}

fn default_reviewer() -> String {
    "codex".to_string()
}

fn default_timeout_seconds() -> u64 {
    900
}

fn default_num_workers() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "default_implementer")]
    pub implementer: String,
    #[serde(default = "default_reviewer")]
    pub reviewer: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            implementer: default_implementer(),
            reviewer: default_reviewer(),
            timeout_seconds: default_timeout_seconds(),
            num_workers: default_num_workers(),
        }
    }
}

impl AgentsConfig {
    /// Clamps `num_workers` into `[1, MAX_WORKERS]` and rejects a non-positive timeout.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.num_workers = self.num_workers.clamp(1, MAX_WORKERS);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerMode {
    Interval,
    EventDriven,
}

fn default_true() -> bool {
    true
}

fn default_planner_interval() -> u64 {
    5
}

fn default_quality_interval() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassesConfig {
    #[serde(default = "default_true")]
    pub planner_enabled: bool,
    #[serde(default = "default_planner_interval")]
    pub planner_interval: u64,
    #[serde(default)]
    pub planner_mode: PlannerMode,
    #[serde(default = "default_true")]
    pub quality_enabled: bool,
    #[serde(default = "default_quality_interval")]
    pub quality_interval: u64,
}

impl Default for PassesConfig {
    fn default() -> Self {
        Self {
            planner_enabled: true,
            planner_interval: default_planner_interval(),
            planner_mode: PlannerMode::default(),
            quality_enabled: true,
            quality_interval: default_quality_interval(),
        }
    }
}

impl Default for PlannerMode {
    fn default() -> Self {
        PlannerMode::Interval
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerType {
    Beads,
    Github,
}

impl Default for TrackerType {
    fn default() -> Self {
        TrackerType::Beads
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub r#type: TrackerType,
    #[serde(default = "default_true")]
    pub sync_to_github: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            r#type: TrackerType::default(),
            sync_to_github: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub dry_run: bool,
    /// `0` means unlimited.
    #[serde(default)]
    pub max_iterations: u64,
    #[serde(default)]
    pub verbose: bool,
}

/// Full `.noface/config.toml` surface, recognised options per §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub passes: PassesConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("agents.timeout_seconds must be greater than 0")]
    InvalidTimeout,
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    /// Parses `contents` as TOML and validates it, applying the defaults
    /// documented in §6.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(contents)?;
        config.agents.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
