use super::Project;
use crate::checks::{self, GroupCheck, Verdict};
use rand::Rng;
use rand::seq::SliceRandom;
use std::num::NonZeroUsize;

/// Projects split into consecutive chunks of `group_size`. Projects and
/// groups are designated by their position, the last group receives the
/// remainder.
#[derive(Debug, Clone)]
pub struct Partition {
    projects: Vec<Project>,
    group_size: NonZeroUsize,
    group_of: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl Partition {
    /// Lay out the projects in the order they are given.
    pub fn new(projects: Vec<Project>, group_size: NonZeroUsize) -> Partition {
        let order = (0..projects.len()).collect::<Vec<_>>();
        let mut partition = Partition {
            projects,
            group_size,
            group_of: Vec::new(),
            members: Vec::new(),
        };
        partition.lay_out(&order);
        partition
    }

    /// Number of groups needed to host `projects` projects.
    pub fn groups_needed(projects: usize, group_size: NonZeroUsize) -> usize {
        projects.div_ceil(group_size.get())
    }

    fn lay_out(&mut self, order: &[usize]) {
        self.group_of = vec![0; self.projects.len()];
        self.members = Vec::with_capacity(Self::groups_needed(order.len(), self.group_size));
        for (group, chunk) in order.chunks(self.group_size.get()).enumerate() {
            for &project in chunk {
                self.group_of[project] = group;
            }
            self.members.push(chunk.to_vec());
        }
    }

    /// Replace the whole layout by a uniformly shuffled one.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order = (0..self.projects.len()).collect::<Vec<_>>();
        order.shuffle(rng);
        self.lay_out(&order);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn groups(&self) -> usize {
        self.members.len()
    }

    pub fn project(&self, project: usize) -> &Project {
        &self.projects[project]
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn group_of(&self, project: usize) -> usize {
        self.group_of[project]
    }

    pub fn members(&self, group: usize) -> &[usize] {
        &self.members[group]
    }

    pub fn check(&self, group: usize) -> GroupCheck {
        checks::check_group(self.members[group].iter().map(|&p| &self.projects[p]))
    }

    pub fn is_clean(&self) -> bool {
        (0..self.groups()).all(|g| self.check(g).is_clean())
    }

    /// Groups violating a constraint, in group order.
    pub fn violations(&self) -> Vec<(usize, GroupCheck)> {
        (0..self.groups())
            .map(|g| (g, self.check(g)))
            .filter(|(_, check)| !check.is_clean())
            .collect()
    }

    /// First member of `group` involved in the collision designated by
    /// `verdict`.
    pub fn exchange_candidate(&self, group: usize, verdict: &Verdict) -> Option<usize> {
        self.members[group].iter().copied().find(|&p| {
            let project = &self.projects[p];
            match verdict {
                Verdict::Clean => false,
                Verdict::SharedClient(client) => project.client() == Some(client.as_str()),
                Verdict::SharedTeamLead(tl) => project.tl == Some(*tl),
            }
        })
    }

    /// Exchange the groups of two projects. Each one takes the position the
    /// other held in its group.
    pub fn swap(&mut self, a: usize, b: usize) {
        let (ga, gb) = (self.group_of[a], self.group_of[b]);
        assert_ne!(ga, gb, "cannot swap projects of the same group");
        let pa = self.members[ga]
            .iter()
            .position(|&p| p == a)
            .expect("project not found in its group");
        let pb = self.members[gb]
            .iter()
            .position(|&p| p == b)
            .expect("project not found in its group");
        self.members[ga][pa] = b;
        self.members[gb][pb] = a;
        self.group_of[a] = gb;
        self.group_of[b] = ga;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TlId;
    use crate::model::fixtures::{distinct, project};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let p = Partition::new(distinct(7), size(3));
        assert_eq!(p.groups(), 3);
        assert_eq!(p.members(0), &[0, 1, 2]);
        assert_eq!(p.members(1), &[3, 4, 5]);
        assert_eq!(p.members(2), &[6]);
        assert_eq!(p.group_of(4), 1);
        assert!(p.is_clean());
    }

    #[test]
    fn test_groups_needed() {
        assert_eq!(Partition::groups_needed(0, size(3)), 0);
        assert_eq!(Partition::groups_needed(6, size(3)), 2);
        assert_eq!(Partition::groups_needed(7, size(3)), 3);
        assert_eq!(Partition::groups_needed(5, size(1)), 5);
    }

    #[test]
    fn test_swap() {
        let mut p = Partition::new(distinct(6), size(3));
        p.swap(1, 5);
        assert_eq!(p.members(0), &[0, 5, 2]);
        assert_eq!(p.members(1), &[3, 4, 1]);
        assert_eq!(p.group_of(1), 1);
        assert_eq!(p.group_of(5), 0);
    }

    #[test]
    #[should_panic(expected = "same group")]
    fn test_swap_same_group() {
        let mut p = Partition::new(distinct(6), size(3));
        p.swap(0, 2);
    }

    #[test]
    fn test_exchange_candidate() {
        let projects = vec![
            project(1, "a@x", Some(1)),
            project(2, "b@x", Some(2)),
            project(3, "b@x", Some(2)),
            project(4, "d@x", Some(4)),
        ];
        let p = Partition::new(projects, size(4));
        let check = p.check(0);
        assert_eq!(check.verdict, Verdict::SharedClient("b@x".into()));
        assert_eq!(p.exchange_candidate(0, &check.verdict), Some(1));
        assert_eq!(
            p.exchange_candidate(0, &Verdict::SharedTeamLead(TlId(4))),
            Some(3)
        );
        assert_eq!(p.exchange_candidate(0, &Verdict::Clean), None);
    }

    #[test]
    fn test_violations() {
        let projects = vec![
            project(1, "a@x", Some(1)),
            project(2, "b@x", Some(1)),
            project(3, "c@x", Some(3)),
            project(4, "d@x", Some(4)),
        ];
        let p = Partition::new(projects, size(2));
        let violations = p.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].0, 0);
        assert_eq!(violations[0].1.verdict, Verdict::SharedTeamLead(TlId(1)));
        assert!(!p.is_clean());
    }

    proptest! {
        #[test]
        fn shuffled_layout_covers_every_project(n in 1usize..60, group_size in 1usize..8, seed: u64) {
            let mut p = Partition::new(distinct(n), size(group_size));
            p.shuffle(&mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(p.groups(), n.div_ceil(group_size));
            let mut seen = vec![0; n];
            for g in 0..p.groups() {
                if g + 1 < p.groups() {
                    prop_assert_eq!(p.members(g).len(), group_size);
                } else {
                    prop_assert!(!p.members(g).is_empty() && p.members(g).len() <= group_size);
                }
                for &m in p.members(g) {
                    seen[m] += 1;
                    prop_assert_eq!(p.group_of(m), g);
                }
            }
            prop_assert!(seen.iter().all(|&c| c == 1));
        }
    }
}
