use crate::model::Partition;

/// Result of spending one try of the search budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Every group satisfies the constraints.
    Solved,
    /// Keep searching.
    Continue,
    /// Both projects exchanged their groups.
    Swapped(usize, usize),
}

pub trait Algo {
    fn name(&self) -> &'static str;

    /// Whether the layout in place before the first step is a real
    /// assignment that must be written back right away.
    fn commits_initial_layout(&self) -> bool;

    fn step(&mut self) -> Step;

    fn get_partition(&self) -> &Partition;
}
