use crate::model::{Project, TlId};
use std::fmt;

/// Outcome of checking the exclusion constraints of one peer group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Clean,
    /// Several members share this client.
    SharedClient(String),
    /// Several members share this team lead.
    SharedTeamLead(TlId),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Clean => write!(f, "clean"),
            Verdict::SharedClient(ag_mail) => write!(f, "shared AG {ag_mail}"),
            Verdict::SharedTeamLead(tl) => write!(f, "shared {tl}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCheck {
    pub verdict: Verdict,
    pub distinct_clients: usize,
    pub distinct_team_leads: usize,
}

impl GroupCheck {
    pub fn is_clean(&self) -> bool {
        self.verdict == Verdict::Clean
    }

    /// A group in which no member knows its client or its team lead
    /// points to incomplete data upstream.
    pub fn is_anomalous(&self) -> bool {
        self.distinct_clients == 0 || self.distinct_team_leads == 0
    }
}

/// Count the occurrences of each key, in order of first appearance.
fn tally<K: PartialEq>(keys: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        if let Some((_, n)) = counts.iter_mut().find(|(k, _)| *k == key) {
            *n += 1;
        } else {
            counts.push((key, 1));
        }
    }
    counts
}

/// Most frequent key if it occurs more than once. On ties the key seen
/// first wins.
fn collision<K>(counts: Vec<(K, usize)>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (key, n) in counts {
        if n > 1 && best.as_ref().is_none_or(|&(_, m)| n > m) {
            best = Some((key, n));
        }
    }
    best.map(|(key, _)| key)
}

/// Check that no two members share a client or a team lead. Members without
/// a client or a team lead never collide with each other.
pub fn check_group<'a>(members: impl IntoIterator<Item = &'a Project>) -> GroupCheck {
    let members = members.into_iter().collect::<Vec<_>>();
    let clients = tally(members.iter().filter_map(|p| p.client()));
    let team_leads = tally(members.iter().filter_map(|p| p.tl));
    let (distinct_clients, distinct_team_leads) = (clients.len(), team_leads.len());
    let verdict = if let Some(client) = collision(clients) {
        Verdict::SharedClient(client.to_owned())
    } else if let Some(tl) = collision(team_leads) {
        Verdict::SharedTeamLead(tl)
    } else {
        Verdict::Clean
    };
    GroupCheck {
        verdict,
        distinct_clients,
        distinct_team_leads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::project;

    #[test]
    fn test_no_collision() {
        let group = [
            project(1, "a@x", Some(1)),
            project(2, "b@x", Some(2)),
            project(3, "c@x", Some(3)),
        ];
        let check = check_group(&group);
        assert!(check.is_clean());
        assert!(!check.is_anomalous());
        assert_eq!(check.distinct_clients, 3);
        assert_eq!(check.distinct_team_leads, 3);
    }

    #[test]
    fn test_single_collision() {
        let group = [
            project(1, "a@x", Some(1)),
            project(2, "b@x", Some(1)),
            project(3, "c@x", Some(3)),
        ];
        assert_eq!(check_group(&group).verdict, Verdict::SharedTeamLead(TlId(1)));
        let group = [project(1, "a@x", Some(1)), project(2, "a@x", Some(2))];
        assert_eq!(
            check_group(&group).verdict,
            Verdict::SharedClient("a@x".into())
        );
    }

    #[test]
    fn test_client_collision_reported_first() {
        let group = [
            project(1, "a@x", Some(1)),
            project(2, "b@x", Some(1)),
            project(3, "b@x", Some(3)),
        ];
        assert_eq!(
            check_group(&group).verdict,
            Verdict::SharedClient("b@x".into())
        );
    }

    #[test]
    fn test_majority_identifier() {
        let group = [
            project(1, "a@x", Some(1)),
            project(2, "b@x", Some(2)),
            project(3, "a@x", Some(3)),
            project(4, "b@x", Some(4)),
            project(5, "b@x", Some(5)),
        ];
        assert_eq!(
            check_group(&group).verdict,
            Verdict::SharedClient("b@x".into())
        );
        // Ties go to the identifier seen first.
        let group = [
            project(1, "a@x", Some(7)),
            project(2, "b@x", Some(9)),
            project(3, "c@x", Some(9)),
            project(4, "d@x", Some(7)),
        ];
        assert_eq!(check_group(&group).verdict, Verdict::SharedTeamLead(TlId(7)));
    }

    #[test]
    fn test_missing_identifiers() {
        let group = [
            project(1, "a@x", None),
            project(2, "b@x", None),
            project(3, "", Some(1)),
            project(4, "", Some(2)),
        ];
        let check = check_group(&group);
        assert!(check.is_clean());
        assert!(!check.is_anomalous());
        let group = [project(1, "a@x", None), project(2, "b@x", None)];
        let check = check_group(&group);
        assert!(check.is_clean());
        assert!(check.is_anomalous());
        assert_eq!(check.distinct_team_leads, 0);
    }
}
