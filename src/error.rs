use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: map size {size} is below the minimum of 6")]
    InvalidConfiguration { size: usize },
    #[error("no free spawn tile found after {attempts} attempts")]
    SpawnExhausted { attempts: usize },
    #[error("invalid layout: {0}")]
    Layout(String),
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
