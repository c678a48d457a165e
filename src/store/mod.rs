#![allow(async_fn_in_trait)]

pub use self::memory::MemoryStore;
pub use self::sql::SqlStore;

use crate::error::StoreError;
use crate::model::{PeerGroup, PeerGroupId, Project, ProjectId, ScopeId};

mod memory;
mod sql;

/// Persistent home of projects and peer groups. Every call is durable on
/// its own, callers needing mutual exclusion must provide it.
pub trait Store {
    /// The course iteration currently running.
    async fn active_scope(&mut self) -> Result<ScopeId, StoreError>;

    async fn active_projects(&mut self, scope: ScopeId) -> Result<Vec<Project>, StoreError>;

    async fn peer_groups(&mut self, scope: ScopeId) -> Result<Vec<PeerGroup>, StoreError>;

    async fn create_peer_group(
        &mut self,
        scope: ScopeId,
        number: u32,
    ) -> Result<PeerGroup, StoreError>;

    async fn set_peer_group(
        &mut self,
        project: ProjectId,
        group: PeerGroupId,
    ) -> Result<(), StoreError>;

    /// Delete the peer groups of `scope` and detach their projects. Return
    /// the number of deleted groups.
    async fn delete_peer_groups(&mut self, scope: ScopeId) -> Result<usize, StoreError>;
}
