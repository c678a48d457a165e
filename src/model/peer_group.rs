use std::fmt;

/// A course iteration ("BP"). Peer groups never outlive their scope.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(pub i64);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BP #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PeerGroupId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerGroup {
    pub id: PeerGroupId,
    pub bp: ScopeId,
    pub number: u32,
}

impl fmt::Display for PeerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Peer group {}", self.number)
    }
}
