pub use self::algo::{Algo, Step};
pub use self::repair::Repair;
pub use self::reshuffle::Reshuffle;

use crate::model::Partition;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::fmt;

mod algo;
mod repair;
mod reshuffle;

/// Search strategy used to build the peer groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Reshuffle every project until a valid layout shows up.
    #[default]
    Reshuffle,
    /// Shuffle once, then repair violating groups by swapping members.
    Repair,
}

impl Strategy {
    pub fn build(self, partition: Partition, rng: StdRng) -> Box<dyn Algo> {
        match self {
            Strategy::Reshuffle => Box::new(Reshuffle::new(partition, rng)),
            Strategy::Repair => Box::new(Repair::new(partition, rng)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Reshuffle => write!(f, "reshuffle"),
            Strategy::Repair => write!(f, "repair"),
        }
    }
}
