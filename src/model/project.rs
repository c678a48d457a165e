use super::PeerGroupId;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProjectId(pub i64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team lead supervising a project.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TlId(pub i64);

impl fmt::Display for TlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TL #{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub nr: u32,
    pub title: String,
    /// Client ("AG") contact, identifies the client. Empty when unknown.
    pub ag_mail: String,
    pub tl: Option<TlId>,
    pub peer_group: Option<PeerGroupId>,
}

impl Project {
    pub fn client(&self) -> Option<&str> {
        if self.ag_mail.is_empty() {
            None
        } else {
            Some(&self.ag_mail)
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.nr, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;

    #[test]
    fn test_client() {
        let p = fixtures::project(1, "ag@example.org", None);
        assert_eq!(p.client(), Some("ag@example.org"));
        let p = fixtures::project(2, "", Some(3));
        assert_eq!(p.client(), None);
        assert_eq!(p.to_string(), "2: Project 2");
    }
}
