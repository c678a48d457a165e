use crate::model::{ProjectId, ScopeId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("no active BP found")]
    NoActiveScope,
    #[error("{0} BPs are marked as active")]
    SeveralActiveScopes(usize),
    #[error("unknown project {0}")]
    UnknownProject(ProjectId),
    #[error("{what} {value} does not fit in a database column")]
    OutOfRange { what: &'static str, value: i64 },
}

#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    #[error("{existing} peer groups already exist for {scope}, delete them first")]
    PreconditionFailed { scope: ScopeId, existing: usize },
    #[error("cannot access the project store")]
    Store(#[from] StoreError),
}
