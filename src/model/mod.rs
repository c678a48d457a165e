pub use self::partition::Partition;
pub use self::peer_group::{PeerGroup, PeerGroupId, ScopeId};
pub use self::project::{Project, ProjectId, TlId};

mod partition;
mod peer_group;
mod project;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn project(id: i64, ag_mail: &str, tl: Option<i64>) -> Project {
        Project {
            id: ProjectId(id),
            nr: id as u32,
            title: format!("Project {id}"),
            ag_mail: ag_mail.to_owned(),
            tl: tl.map(TlId),
            peer_group: None,
        }
    }

    /// Projects with pairwise distinct clients and team leads.
    pub fn distinct(n: usize) -> Vec<Project> {
        (1..=n as i64)
            .map(|i| project(i, &format!("ag{i}@example.org"), Some(i)))
            .collect()
    }
}
