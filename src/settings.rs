use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::ranking::FilterMultiplier;
use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringSettings {
    pub neighbor_count: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            neighbor_count: ScoringConfig::DEFAULT_NEIGHBOR_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSettings {
    /// Multiplier applied when the host re-enters a channel with a filter on.
    pub default_multiplier: Option<FilterMultiplier>,
    /// How many matching videos the host tries to keep visible.
    pub target_visible_count: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            default_multiplier: None,
            target_visible_count: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub scoring: ScoringSettings,
    pub filter: FilterSettings,
}

impl EngineSettings {
    /// A zero neighbor count could never score anything, so it falls back to
    /// the default.
    pub fn scoring_config(&self) -> ScoringConfig {
        match self.scoring.neighbor_count {
            0 => ScoringConfig::default(),
            count => ScoringConfig::with_neighbor_count(count),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err}", path.display());
                EngineSettings::default()
            })
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> EngineSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        self.settings().scoring_config()
    }

    pub fn update_scoring(&self, scoring: ScoringSettings) -> Result<()> {
        self.update(|data| data.scoring = scoring)
    }

    pub fn update_filter(&self, filter: FilterSettings) -> Result<()> {
        self.update(|data| data.filter = filter)
    }

    fn update(&self, apply: impl FnOnce(&mut EngineSettings)) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        apply(&mut *guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: EngineSettings = serde_json::from_str(&contents)?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        assert_eq!(store.settings(), EngineSettings::default());
        assert_eq!(store.scoring_config(), ScoringConfig::default());
    }

    #[test]
    fn updates_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update_scoring(ScoringSettings { neighbor_count: 6 })
            .unwrap();
        store
            .update_filter(FilterSettings {
                default_multiplier: Some(FilterMultiplier::X5),
                target_visible_count: 30,
            })
            .unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        let settings = reopened.settings();
        assert_eq!(settings.scoring.neighbor_count, 6);
        assert_eq!(settings.filter.default_multiplier, Some(FilterMultiplier::X5));
        assert_eq!(settings.filter.target_visible_count, 30);
        assert_eq!(reopened.scoring_config().neighbor_count, 6);
    }

    #[test]
    fn partial_and_corrupt_files_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{"scoring": {"neighborCount": 0}}"#).unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.settings().filter, FilterSettings::default());
        assert_eq!(store.scoring_config(), ScoringConfig::default());

        fs::write(&path, "not json").unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.settings(), EngineSettings::default());
        assert!(store.reload().is_err());
    }
}
