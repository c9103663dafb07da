use thiserror::Error;

/// Rejected American odds input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OddsError {
    #[error("odds value is not a finite number")]
    NotFinite,

    #[error("American odds must be at least +100 or at most -100, got {0}")]
    OutOfRange(f64),
}

/// Failure to obtain a slate from the schedule providers.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("no schedule sources are configured")]
    NoSources,

    #[error(
        "Failed to fetch game data: all {attempts} source(s) failed or timed out \
         (last error from {last_source}: {last_error}). The service may be temporarily unavailable."
    )]
    AllSourcesFailed {
        attempts: usize,
        last_source: String,
        last_error: String,
    },
}
