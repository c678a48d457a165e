use clap::Parser;
use eyre::{Result, WrapErr};
use peersolver::algos::Strategy;
use peersolver::config::Config;
use peersolver::model::{PeerGroup, Project, ScopeId};
use peersolver::store::{MemoryStore, SqlStore, Store};
use peersolver::{AssignmentResult, PeerGroupAssigner, report};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Use FILE instead of peersolver.toml
    #[arg(short, long, value_name = "FILE", default_value = "peersolver.toml")]
    config: PathBuf,
    /// Do not write back results to database
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Delete the existing peer groups of the course iteration first
    #[arg(long)]
    reset: bool,
    /// Search strategy, overrides the configuration file
    #[arg(short, long)]
    strategy: Option<Strategy>,
    /// Seed for the random generator, overrides the configuration file
    #[arg(long)]
    seed: Option<u64>,
    /// Export the peer groups to FILE as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
    /// Set verbosity level
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

async fn run<S: Store>(
    store: &mut S,
    assigner: &PeerGroupAssigner,
    scope: ScopeId,
    reset: bool,
    rng: StdRng,
) -> Result<(AssignmentResult, Vec<Project>, Vec<PeerGroup>)> {
    if reset {
        let deleted = store
            .delete_peer_groups(scope)
            .await
            .wrap_err("cannot delete existing peer groups")?;
        info!(scope = %scope, deleted = %deleted, "Deleted existing peer groups");
    }
    let result = assigner.assign(store, scope, rng).await?;
    let projects = store
        .active_projects(scope)
        .await
        .wrap_err("cannot reload projects")?;
    let groups = store
        .peer_groups(scope)
        .await
        .wrap_err("cannot reload peer groups")?;
    Ok((result, projects, groups))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(level(args.verbose))
        .with_writer(std::io::stderr)
        .init();
    let config = Config::load(&args.config)?;
    let assigner = PeerGroupAssigner::new(config.settings(args.strategy));
    let rng = match args.seed.or(config.peergroups.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut store = SqlStore::connect(&config.database.url)
        .await
        .wrap_err("cannot connect to database")?;
    let scope = match config.database.scope {
        Some(id) => ScopeId(id),
        None => store
            .active_scope()
            .await
            .wrap_err("cannot determine the active BP")?,
    };
    info!(
        scope = %scope,
        groups_per_peergroup = %assigner.settings().groups_per_peergroup,
        max_tries = %assigner.settings().max_tries,
        strategy = %assigner.settings().strategy,
        "Assigning peer groups",
    );
    let (result, projects, groups) = if args.dry_run {
        let mut memory = MemoryStore::snapshot(&mut store, scope)
            .await
            .wrap_err("cannot load projects")?;
        run(&mut memory, &assigner, scope, args.reset, rng).await?
    } else {
        run(&mut store, &assigner, scope, args.reset, rng).await?
    };
    report::display_details(&projects, &groups);
    report::display_summary(&result);
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path)
            .wrap_err_with(|| format!("cannot create {}", path.display()))?;
        report::write_csv(file, &projects, &groups).wrap_err("cannot export peer groups")?;
    }
    if !result.fully_satisfied {
        warn!(
            violating_groups = %result.violations.len(),
            "Some peer groups violate the exclusion constraints"
        );
    }
    Ok(())
}
