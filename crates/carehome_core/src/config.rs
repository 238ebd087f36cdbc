//! Facility configuration.
//!
//! # Responsibility
//! - Describe ward topology, roster limits and bootstrap accounts.
//! - Parse JSON configuration and reject layouts that cannot be built.
//!
//! # Invariants
//! - `FacilityConfig::default()` describes two 19-bed wards with room
//!   layout `[1, 2, 4, 4, 4, 4]`.
//! - Ward ids and bed prefixes are unique, so bed ids are unique.

use crate::engine::shift_validator::RosterLimits;
use crate::model::resident::Gender;
use crate::model::topology::Topology;
use crate::model::ward::Ward;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const DEFAULT_ROOM_LAYOUT: [usize; 6] = [1, 2, 4, 4, 4, 4];
const DEFAULT_PASSWORD: &str = "password";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardConfig {
    pub id: String,
    /// Prefix for bed ids, e.g. `W1` gives `W1-B1`.
    pub bed_prefix: String,
    #[serde(default)]
    pub preferred_gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    pub wards: Vec<WardConfig>,
    /// Room sizes in ward order; applied to every ward.
    pub room_layout: Vec<usize>,
    pub limits: RosterLimits,
    /// Creates `manager`, `doctor` and `nurse` accounts on bootstrap.
    pub seed_default_accounts: bool,
    pub default_password: String,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            wards: vec![
                WardConfig {
                    id: "Ward 1".to_string(),
                    bed_prefix: "W1".to_string(),
                    preferred_gender: Some(Gender::Male),
                },
                WardConfig {
                    id: "Ward 2".to_string(),
                    bed_prefix: "W2".to_string(),
                    preferred_gender: Some(Gender::Female),
                },
            ],
            room_layout: DEFAULT_ROOM_LAYOUT.to_vec(),
            limits: RosterLimits::default(),
            seed_default_accounts: true,
            default_password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl FacilityConfig {
    /// Parses and validates a JSON document; absent fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wards.is_empty() {
            return Err(ConfigError::Invalid("at least one ward is required".to_string()));
        }
        let mut ids = HashSet::new();
        let mut prefixes = HashSet::new();
        for ward in &self.wards {
            if ward.id.trim().is_empty() || ward.bed_prefix.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "ward id and bed prefix must not be empty".to_string(),
                ));
            }
            if !ids.insert(ward.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate ward id `{}`", ward.id)));
            }
            if !prefixes.insert(ward.bed_prefix.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate bed prefix `{}`",
                    ward.bed_prefix
                )));
            }
        }

        if self.room_layout.is_empty() {
            return Err(ConfigError::Invalid("room layout must not be empty".to_string()));
        }
        if self.room_layout.contains(&0) {
            return Err(ConfigError::Invalid("room size must be at least 1".to_string()));
        }

        let limits = &self.limits;
        if limits.nurse_daily_hours < 0
            || limits.doctor_daily_hours < 0
            || limits.doctor_coverage_hours < 0
        {
            return Err(ConfigError::Invalid("roster limits must not be negative".to_string()));
        }
        if self.seed_default_accounts && self.default_password.is_empty() {
            return Err(ConfigError::Invalid(
                "default password is required when seeding accounts".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the vacant bed topology described by this config.
    pub fn build_topology(&self) -> Topology {
        let wards = self
            .wards
            .iter()
            .map(|ward| {
                Ward::new(
                    ward.id.clone(),
                    &ward.bed_prefix,
                    ward.preferred_gender,
                    &self.room_layout,
                )
            })
            .collect();
        Topology::new(wards)
    }
}
