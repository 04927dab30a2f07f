use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use survey::{SlideSpec, SurveyPlan};
use tracing::info;

pub const DEFAULT_SETTINGS_PATH: &str = "survey.toml";
/// Participant counter, kept beside the results so `survey.toml` is never
/// rewritten.
pub const PARTICIPANT_FILE: &str = "participant.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind_addr: String,
    pub osc_bind: String,
    pub results_dir: PathBuf,
    pub plan: SurveyPlan,
    pub settings_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            osc_bind: sensor::DEFAULT_BIND.into(),
            results_dir: PathBuf::from("./results"),
            plan: SurveyPlan::default(),
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }
}

impl Settings {
    pub fn participant_path(&self) -> PathBuf {
        self.results_dir.join(PARTICIPANT_FILE)
    }
}

/// On-disk form; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    #[serde(default)]
    bind_addr: Option<String>,
    #[serde(default)]
    osc_bind: Option<String>,
    #[serde(default)]
    results_dir: Option<PathBuf>,
    #[serde(default)]
    slides: Option<Vec<SlideSpec>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ParticipantState {
    #[serde(default)]
    next_participant: u32,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let path = env::var("SURVEY__SETTINGS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let mut settings = load_settings_from(&path)?;
    apply_env_overrides(&mut settings, |key| env::var(key).ok());
    Ok(settings)
}

/// Defaults overlaid with the TOML file at `path`, if there is one.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings {
        settings_path: path.to_path_buf(),
        ..Settings::default()
    };

    let file_cfg: FileSettings = read_toml(path)?;
    if let Some(v) = file_cfg.bind_addr {
        settings.bind_addr = v;
    }
    if let Some(v) = file_cfg.osc_bind {
        settings.osc_bind = v;
    }
    if let Some(v) = file_cfg.results_dir {
        settings.results_dir = v;
    }
    if let Some(slides) = file_cfg.slides {
        settings.plan = SurveyPlan { slides };
    }

    Ok(settings)
}

pub(crate) fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SURVEY__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("SURVEY__OSC_BIND") {
        settings.osc_bind = v;
    }
    if let Some(v) = lookup("SURVEY__RESULTS_DIR") {
        settings.results_dir = PathBuf::from(v);
    }
}

/// The participant number the next session will get.
pub fn peek_participant(path: &Path) -> anyhow::Result<u32> {
    let state: ParticipantState = read_toml(path)?;
    Ok(state.next_participant)
}

/// Claims the next participant number and stores the incremented counter,
/// creating the file and its directory if needed.
pub fn advance_participant(path: &Path) -> anyhow::Result<u32> {
    let mut state: ParticipantState = read_toml(path)?;
    let participant = state.next_participant;
    state.next_participant = participant + 1;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
    }
    let raw = toml::to_string(&state).context("failed to encode participant counter")?;
    fs::write(path, raw)
        .with_context(|| format!("failed to update participant file '{}'", path.display()))?;
    info!(participant, path = %path.display(), "advanced participant counter");
    Ok(participant)
}

/// Missing files read as the default value.
fn read_toml<T: Default + DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    toml::from_str(&raw).with_context(|| format!("invalid settings file '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
