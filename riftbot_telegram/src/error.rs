use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(anyhow::Error),

    #[error("backend exchange error: {0}")]
    Exchange(anyhow::Error),

    #[error("match enrichment error: {0}")]
    Enrich(#[from] riftbot_league::Error),
}
