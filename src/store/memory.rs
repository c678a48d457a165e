use super::Store;
use crate::error::StoreError;
use crate::model::{PeerGroup, PeerGroupId, Project, ProjectId, ScopeId};

/// Store kept in memory. Every project write is recorded in order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    active: Option<ScopeId>,
    projects: Vec<(ScopeId, Project)>,
    peer_groups: Vec<PeerGroup>,
    next_id: i64,
    writes: Vec<(ProjectId, PeerGroupId)>,
}

impl MemoryStore {
    pub fn new(active: ScopeId) -> MemoryStore {
        MemoryStore {
            active: Some(active),
            next_id: 1,
            ..MemoryStore::default()
        }
    }

    pub fn with_projects(mut self, scope: ScopeId, projects: Vec<Project>) -> MemoryStore {
        self.projects.extend(projects.into_iter().map(|p| (scope, p)));
        self
    }

    /// Copy the projects and peer groups of `scope` out of another store.
    pub async fn snapshot<S: Store>(source: &mut S, scope: ScopeId) -> Result<Self, StoreError> {
        let projects = source.active_projects(scope).await?;
        let peer_groups = source.peer_groups(scope).await?;
        let next_id = peer_groups.iter().map(|g| g.id.0).max().unwrap_or(0) + 1;
        Ok(MemoryStore {
            active: Some(scope),
            projects: projects.into_iter().map(|p| (scope, p)).collect(),
            peer_groups,
            next_id,
            writes: Vec::new(),
        })
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().map(|(_, p)| p).find(|p| p.id == id)
    }

    /// Project writes, oldest first.
    pub fn writes(&self) -> &[(ProjectId, PeerGroupId)] {
        &self.writes
    }
}

impl Store for MemoryStore {
    async fn active_scope(&mut self) -> Result<ScopeId, StoreError> {
        self.active.ok_or(StoreError::NoActiveScope)
    }

    async fn active_projects(&mut self, scope: ScopeId) -> Result<Vec<Project>, StoreError> {
        Ok(self
            .projects
            .iter()
            .filter(|(s, _)| *s == scope)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn peer_groups(&mut self, scope: ScopeId) -> Result<Vec<PeerGroup>, StoreError> {
        let mut groups = self
            .peer_groups
            .iter()
            .filter(|g| g.bp == scope)
            .cloned()
            .collect::<Vec<_>>();
        groups.sort_by_key(|g| g.number);
        Ok(groups)
    }

    async fn create_peer_group(
        &mut self,
        scope: ScopeId,
        number: u32,
    ) -> Result<PeerGroup, StoreError> {
        let group = PeerGroup {
            id: PeerGroupId(self.next_id),
            bp: scope,
            number,
        };
        self.next_id += 1;
        self.peer_groups.push(group.clone());
        Ok(group)
    }

    async fn set_peer_group(
        &mut self,
        project: ProjectId,
        group: PeerGroupId,
    ) -> Result<(), StoreError> {
        let (_, p) = self
            .projects
            .iter_mut()
            .find(|(_, p)| p.id == project)
            .ok_or(StoreError::UnknownProject(project))?;
        p.peer_group = Some(group);
        self.writes.push((project, group));
        Ok(())
    }

    async fn delete_peer_groups(&mut self, scope: ScopeId) -> Result<usize, StoreError> {
        let (deleted, kept): (Vec<_>, Vec<_>) = self
            .peer_groups
            .drain(..)
            .partition(|g| g.bp == scope);
        self.peer_groups = kept;
        for (_, p) in &mut self.projects {
            if p.peer_group.is_some_and(|id| deleted.iter().any(|g| g.id == id)) {
                p.peer_group = None;
            }
        }
        Ok(deleted.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::distinct;

    #[tokio::test]
    async fn test_projects_are_scoped() {
        let mut store = MemoryStore::new(ScopeId(2))
            .with_projects(ScopeId(1), distinct(2))
            .with_projects(ScopeId(2), distinct(3));
        assert_eq!(store.active_scope().await.unwrap(), ScopeId(2));
        assert_eq!(store.active_projects(ScopeId(1)).await.unwrap().len(), 2);
        assert_eq!(store.active_projects(ScopeId(2)).await.unwrap().len(), 3);
        assert!(store.active_projects(ScopeId(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_detaches_projects() {
        let mut store = MemoryStore::new(ScopeId(1)).with_projects(ScopeId(1), distinct(2));
        let first = store.create_peer_group(ScopeId(1), 1).await.unwrap();
        let other = store.create_peer_group(ScopeId(9), 1).await.unwrap();
        assert_ne!(first.id, other.id);
        store.set_peer_group(ProjectId(1), first.id).await.unwrap();
        assert_eq!(store.delete_peer_groups(ScopeId(1)).await.unwrap(), 1);
        assert!(store.peer_groups(ScopeId(1)).await.unwrap().is_empty());
        assert_eq!(store.peer_groups(ScopeId(9)).await.unwrap(), vec![other]);
        assert_eq!(store.project(ProjectId(1)).unwrap().peer_group, None);
        assert_eq!(store.writes(), &[(ProjectId(1), first.id)]);
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let mut store = MemoryStore::new(ScopeId(1));
        let err = store
            .set_peer_group(ProjectId(4), PeerGroupId(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownProject(ProjectId(4))));
    }

    #[tokio::test]
    async fn test_snapshot() {
        let mut source = MemoryStore::new(ScopeId(1)).with_projects(ScopeId(1), distinct(3));
        let group = source.create_peer_group(ScopeId(1), 1).await.unwrap();
        let mut copy = MemoryStore::snapshot(&mut source, ScopeId(1)).await.unwrap();
        assert_eq!(copy.active_projects(ScopeId(1)).await.unwrap().len(), 3);
        let created = copy.create_peer_group(ScopeId(1), 2).await.unwrap();
        assert!(created.id.0 > group.id.0);
        assert!(copy.writes().is_empty());
    }
}
