use crate::algos::{Step, Strategy};
use crate::checks::Verdict;
use crate::error::{AssignError, StoreError};
use crate::model::{Partition, PeerGroup, PeerGroupId, ScopeId};
use crate::store::Store;
use rand::rngs::StdRng;
use std::num::NonZeroUsize;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target number of projects in each peer group.
    pub groups_per_peergroup: NonZeroUsize,
    /// Search budget, in tries.
    pub max_tries: NonZeroUsize,
    pub strategy: Strategy,
}

/// A peer group still violating a constraint once the search is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub peer_group: PeerGroup,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub groups_created: usize,
    pub tries_used: usize,
    pub fully_satisfied: bool,
    pub violations: Vec<Violation>,
    /// Groups whose members have no known client or no known team lead.
    pub anomalies: Vec<PeerGroup>,
}

impl AssignmentResult {
    /// Nothing to assign, hence nothing violated.
    pub fn empty() -> Self {
        AssignmentResult {
            fully_satisfied: true,
            ..AssignmentResult::default()
        }
    }
}

/// Keeps track of what the store knows, so that only actual changes get
/// written, one project at a time.
struct WriteBack<'g> {
    groups: &'g [PeerGroup],
    written: Vec<Option<PeerGroupId>>,
}

impl<'g> WriteBack<'g> {
    fn new(groups: &'g [PeerGroup], projects: usize) -> Self {
        WriteBack {
            groups,
            written: vec![None; projects],
        }
    }

    async fn project<S: Store>(
        &mut self,
        store: &mut S,
        partition: &Partition,
        project: usize,
    ) -> Result<(), StoreError> {
        let group = self.groups[partition.group_of(project)].id;
        if self.written[project] != Some(group) {
            store
                .set_peer_group(partition.project(project).id, group)
                .await?;
            self.written[project] = Some(group);
        }
        Ok(())
    }

    async fn all<S: Store>(&mut self, store: &mut S, partition: &Partition) -> Result<(), StoreError> {
        for project in 0..partition.len() {
            self.project(store, partition, project).await?;
        }
        Ok(())
    }
}

/// Split the active projects of a course iteration into peer groups.
pub struct PeerGroupAssigner {
    settings: Settings,
}

impl PeerGroupAssigner {
    pub fn new(settings: Settings) -> Self {
        PeerGroupAssigner { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Create the peer groups of `scope` and assign every active project to
    /// one of them. Refuses to run if `scope` already has peer groups.
    ///
    /// Not finding a layout satisfying every constraint is not an error:
    /// the best effort is kept and the violating groups are reported.
    ///
    /// Store calls are not rolled back. If one fails once the peer groups
    /// are created, they stay behind, partially populated, and the next run
    /// is refused until they are deleted with [`Store::delete_peer_groups`].
    #[instrument(skip_all, fields(scope = %scope, strategy = %self.settings.strategy))]
    pub async fn assign<S: Store>(
        &self,
        store: &mut S,
        scope: ScopeId,
        rng: StdRng,
    ) -> Result<AssignmentResult, AssignError> {
        let existing = store.peer_groups(scope).await?;
        if !existing.is_empty() {
            return Err(AssignError::PreconditionFailed {
                scope,
                existing: existing.len(),
            });
        }
        let projects = store.active_projects(scope).await?;
        if projects.is_empty() {
            info!("No active project, nothing to assign");
            return Ok(AssignmentResult::empty());
        }

        let count = Partition::groups_needed(projects.len(), self.settings.groups_per_peergroup);
        let mut groups = Vec::with_capacity(count);
        for number in 1..=count {
            groups.push(store.create_peer_group(scope, number as u32).await?);
        }
        info!(projects = %projects.len(), groups = %count, "Created peer groups");

        let partition = Partition::new(projects, self.settings.groups_per_peergroup);
        let mut algo = self.settings.strategy.build(partition, rng);
        let mut write_back = WriteBack::new(&groups, algo.get_partition().len());
        if algo.commits_initial_layout() {
            write_back.all(store, algo.get_partition()).await?;
        }

        let mut tries = 0;
        while tries < self.settings.max_tries.get() {
            match algo.step() {
                Step::Solved => break,
                Step::Continue => {}
                Step::Swapped(a, b) => {
                    write_back.project(store, algo.get_partition(), a).await?;
                    write_back.project(store, algo.get_partition(), b).await?;
                }
            }
            tries += 1;
        }
        write_back.all(store, algo.get_partition()).await?;
        debug!(algorithm = %algo.name(), tries = %tries, "Search finished");

        let partition = algo.get_partition();
        let mut violations = Vec::new();
        let mut anomalies = Vec::new();
        for (index, group) in groups.iter().enumerate() {
            let check = partition.check(index);
            if check.is_anomalous() {
                warn!(
                    peer_group = %group.number,
                    distinct_clients = %check.distinct_clients,
                    distinct_team_leads = %check.distinct_team_leads,
                    "Peer group members lack client or team lead information",
                );
                anomalies.push(group.clone());
            }
            if !check.is_clean() {
                violations.push(Violation {
                    peer_group: group.clone(),
                    verdict: check.verdict,
                });
            }
        }
        if violations.is_empty() {
            info!(tries = %tries, "Every peer group satisfies the constraints");
        } else {
            warn!(
                tries = %tries,
                violating_groups = %violations.len(),
                "Keeping a partial solution",
            );
        }
        Ok(AssignmentResult {
            groups_created: count,
            tries_used: tries,
            fully_satisfied: violations.is_empty(),
            violations,
            anomalies,
        })
    }
}
