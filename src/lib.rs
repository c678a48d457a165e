pub mod algos;
pub mod assigner;
pub mod checks;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod store;

pub use crate::assigner::{AssignmentResult, PeerGroupAssigner, Settings, Violation};
pub use crate::error::{AssignError, StoreError};
