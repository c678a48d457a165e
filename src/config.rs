use crate::algos::Strategy;
use crate::assigner::Settings;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

const DEFAULT_GROUPS_PER_PEERGROUP: NonZeroUsize = NonZeroUsize::new(3).unwrap();
const DEFAULT_MAX_TRIES: NonZeroUsize = NonZeroUsize::new(1000).unwrap();

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub database: Database,
    #[serde(default)]
    pub peergroups: PeerGroups,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Database {
    pub url: String,
    /// Course iteration to work on instead of the active one.
    pub scope: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeerGroups {
    pub groups_per_peergroup: NonZeroUsize,
    pub max_tries: NonZeroUsize,
    pub strategy: Strategy,
    pub seed: Option<u64>,
}

impl Default for PeerGroups {
    fn default() -> Self {
        PeerGroups {
            groups_per_peergroup: DEFAULT_GROUPS_PER_PEERGROUP,
            max_tries: DEFAULT_MAX_TRIES,
            strategy: Strategy::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(file_name).wrap_err_with(|| {
            format!("cannot load configuration file {}", file_name.display())
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Config> {
        toml::from_str(content).wrap_err("cannot parse configuration file")
    }

    /// Assignment settings, with the strategy possibly overridden.
    pub fn settings(&self, strategy: Option<Strategy>) -> Settings {
        Settings {
            groups_per_peergroup: self.peergroups.groups_per_peergroup,
            max_tries: self.peergroups.max_tries,
            strategy: strategy.unwrap_or(self.peergroups.strategy),
        }
    }
}
