use crate::controller::RenamePolicy;
use crate::model::{Rules, DEFAULT_NAME, DEFAULT_SLEEP_THRESHOLD, STAT_MAX};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("rename reject chance must be within 0.0..=1.0, got {0}")]
    RejectChance(f64),
    #[error("sleep threshold must be at most 100, got {0}")]
    SleepThreshold(u8),
    #[error("maximum name length must be at least 1")]
    NameLength,
    #[error("fps cap must be within 1..=240, got {0}")]
    FpsCap(u32),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    pub fps_cap: u32,
    pub enable_color: bool,
    pub seed: Option<u64>,
    pub decay_interval_ms: u64,
    pub frame_interval_ms: u64,
    pub sleep_threshold: u8,
    pub max_name_len: usize,
    pub rename_reject_chance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            fps_cap: 30,
            enable_color: true,
            seed: None,
            decay_interval_ms: 1000,
            frame_interval_ms: 500,
            sleep_threshold: DEFAULT_SLEEP_THRESHOLD,
            max_name_len: 6,
            rename_reject_chance: 0.30,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decay_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("decay interval"));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("frame interval"));
        }
        if !(0.0..=1.0).contains(&self.rename_reject_chance) {
            return Err(ConfigError::RejectChance(self.rename_reject_chance));
        }
        if self.sleep_threshold > STAT_MAX {
            return Err(ConfigError::SleepThreshold(self.sleep_threshold));
        }
        if self.max_name_len == 0 {
            return Err(ConfigError::NameLength);
        }
        if self.fps_cap == 0 || self.fps_cap > 240 {
            return Err(ConfigError::FpsCap(self.fps_cap));
        }
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            sleep_threshold: self.sleep_threshold,
        }
    }

    pub fn rename_policy(&self) -> RenamePolicy {
        RenamePolicy {
            max_len: self.max_name_len,
            reject_chance: self.rename_reject_chance,
            ..RenamePolicy::default()
        }
    }

    pub fn decay_interval(&self) -> Duration {
        Duration::from_millis(self.decay_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

pub struct Paths {
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "virtual-pet", "VirtualPet")
        .context("could not resolve project directories")?;
    Ok(paths_in(proj.data_local_dir()))
}

/// Creating `dir` is best effort: explicit `--config`/`--log-file` paths
/// don't need it.
fn paths_in(dir: &Path) -> Paths {
    if let Err(err) = fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), %err, "could not create data directory");
    }
    Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("virtual-pet.log"),
    }
}

/// Reads settings, falling back to defaults when the file is missing or bad.
pub fn load_settings(path: &Path) -> Settings {
    let Ok(s) = fs::read_to_string(path) else {
        return Settings::default();
    };
    match serde_json::from_str::<Settings>(&s) {
        Ok(v) => v,
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring malformed settings file");
            Settings::default()
        }
    }
}
