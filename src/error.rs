use thiserror::Error;

/// Errors surfaced before or around a search. The search itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read phrase source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
