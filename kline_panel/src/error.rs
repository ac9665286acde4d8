use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    /// Every slot in the buffer is absent; callers keep the previous frame.
    #[error("no valid bars to scale")]
    NoValidData,

    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FeedError),

    #[error("layout does not fit the display: {0}")]
    Layout(String),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected http status {0}")]
    Status(u16),

    #[error("could not decode bars: {0}")]
    Decode(String),

    #[error("fetch worker unavailable")]
    Worker,
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Decode(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
}
