use thiserror::Error;

/// Errors surfaced by a hand-off run.
///
/// Queue operations themselves never fail; everything here comes from the
/// edges of a run: the output sink, a crashed phase thread, or a bad
/// configuration document.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("failed to write report line: {0}")]
    Io(#[from] std::io::Error),

    #[error("{phase} phase panicked")]
    PhasePanicked { phase: &'static str },

    #[error("invalid run configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("channel capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    #[error("item range starting at {start} with {count} items does not fit in i64")]
    ItemRangeOverflow { start: i64, count: usize },
}

pub type Result<T, E = HandoffError> = std::result::Result<T, E>;
