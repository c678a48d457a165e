use crate::assigner::AssignmentResult;
use crate::model::{PeerGroup, Project};
use serde::Serialize;
use std::io;

/// One-line notice for the operator.
pub fn summary(result: &AssignmentResult) -> String {
    if result.groups_created == 0 {
        return "No active project, no peer group created".to_owned();
    }
    if result.fully_satisfied {
        format!(
            "Created {} peer groups after {} tries, every constraint is satisfied",
            result.groups_created, result.tries_used
        )
    } else {
        let unresolved = result
            .violations
            .iter()
            .map(|v| v.peer_group.number.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Created {} peer groups after {} tries, constraints still violated in peer groups {}",
            result.groups_created, result.tries_used, unresolved
        )
    }
}

fn members<'a>(projects: &'a [Project], group: &PeerGroup) -> Vec<&'a Project> {
    let mut members = projects
        .iter()
        .filter(|p| p.peer_group == Some(group.id))
        .collect::<Vec<_>>();
    members.sort_by_key(|p| p.nr);
    members
}

pub fn display_details(projects: &[Project], groups: &[PeerGroup]) {
    for group in groups {
        println!("{group}:");
        for p in members(projects, group) {
            print!("  - {p} (AG {}", p.client().unwrap_or("?"));
            match p.tl {
                Some(tl) => println!(", {tl})"),
                None => println!(", no TL)"),
            }
        }
        println!();
    }
}

pub fn display_summary(result: &AssignmentResult) {
    println!("{}", summary(result));
    for v in &result.violations {
        println!("  - {}: {}", v.peer_group, v.verdict);
    }
    if !result.anomalies.is_empty() {
        println!("Peer groups with missing AG or TL information:");
        for g in &result.anomalies {
            println!("  - {g}");
        }
    }
}

#[derive(Serialize)]
struct Row<'a> {
    peer_group: u32,
    nr: u32,
    title: &'a str,
    ag_mail: &'a str,
    tl: Option<i64>,
}

/// Export the members of every peer group, one project per row.
pub fn write_csv<W: io::Write>(
    writer: W,
    projects: &[Project],
    groups: &[PeerGroup],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for group in groups {
        for p in members(projects, group) {
            wtr.serialize(Row {
                peer_group: group.number,
                nr: p.nr,
                title: &p.title,
                ag_mail: &p.ag_mail,
                tl: p.tl.map(|tl| tl.0),
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
