pub mod service;
pub mod state;

pub use service::RefreshService;
pub use state::{
    FailureKind, FetchFailure, RefreshOutcome, RefreshState, RefreshTrigger, Snapshot,
};
