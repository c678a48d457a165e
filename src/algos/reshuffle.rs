use super::{Algo, Step};
use crate::model::Partition;
use rand::rngs::StdRng;
use tracing::trace;

/// Shuffle the whole list of projects at every try and keep the first
/// layout in which no group violates a constraint. When the budget runs
/// out, the last shuffle stands.
pub struct Reshuffle {
    partition: Partition,
    rng: StdRng,
    tries: usize,
}

impl Reshuffle {
    pub fn new(partition: Partition, rng: StdRng) -> Reshuffle {
        Reshuffle {
            partition,
            rng,
            tries: 0,
        }
    }
}

impl Algo for Reshuffle {
    fn name(&self) -> &'static str {
        "reshuffle"
    }

    fn commits_initial_layout(&self) -> bool {
        false
    }

    fn step(&mut self) -> Step {
        self.partition.shuffle(&mut self.rng);
        self.tries += 1;
        let violations = self.partition.violations();
        if violations.is_empty() {
            Step::Solved
        } else {
            trace!(
                attempt = %self.tries,
                violating_groups = %violations.len(),
                "Rejecting shuffle",
            );
            Step::Continue
        }
    }

    fn get_partition(&self) -> &Partition {
        &self.partition
    }
}
