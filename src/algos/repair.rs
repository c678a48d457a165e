use super::{Algo, Step};
use crate::model::Partition;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::trace;

/// Shuffle once, then repair the layout locally: a violating group gives
/// one of its colliding members away in exchange for a random project
/// from another group. Groups touched by a swap are verified again.
pub struct Repair {
    partition: Partition,
    rng: StdRng,
    dirty: Vec<usize>,
    is_dirty: Vec<bool>,
}

impl Repair {
    pub fn new(mut partition: Partition, mut rng: StdRng) -> Repair {
        partition.shuffle(&mut rng);
        let groups = partition.groups();
        Repair {
            partition,
            rng,
            dirty: (0..groups).collect(),
            is_dirty: vec![true; groups],
        }
    }

    fn mark_dirty(&mut self, group: usize) {
        if !self.is_dirty[group] {
            self.is_dirty[group] = true;
            self.dirty.push(group);
        }
    }

    /// Take any group awaiting verification.
    fn pop_dirty(&mut self) -> Option<usize> {
        if self.dirty.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.dirty.len());
        let group = self.dirty.swap_remove(index);
        self.is_dirty[group] = false;
        Some(group)
    }

    /// Groups still awaiting verification.
    pub fn pending(&self) -> &[usize] {
        &self.dirty
    }
}

impl Algo for Repair {
    fn name(&self) -> &'static str {
        "repair"
    }

    fn commits_initial_layout(&self) -> bool {
        true
    }

    fn step(&mut self) -> Step {
        let Some(group) = self.pop_dirty() else {
            return Step::Solved;
        };
        let check = self.partition.check(group);
        let Some(candidate) = self.partition.exchange_candidate(group, &check.verdict) else {
            return Step::Continue;
        };
        let other = self.rng.random_range(0..self.partition.len());
        let other_group = self.partition.group_of(other);
        if other_group == group {
            // No progress this round, the group stays dirty.
            trace!(group = %group, "Exchange partner drawn from the same group");
            self.mark_dirty(group);
            return Step::Continue;
        }
        trace!(
            from = %group,
            to = %other_group,
            reason = %check.verdict,
            moved = %self.partition.project(candidate),
            exchanged_with = %self.partition.project(other),
            "Swapping projects",
        );
        self.partition.swap(candidate, other);
        self.mark_dirty(group);
        self.mark_dirty(other_group);
        Step::Swapped(candidate, other)
    }

    fn get_partition(&self) -> &Partition {
        &self.partition
    }
}
