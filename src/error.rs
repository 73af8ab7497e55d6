use thiserror::Error;

/// Failure while fetching or decoding the trends feed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(u16),

    #[error("feed could not be decoded: {0}")]
    Decode(String),
}

impl From<quick_xml::Error> for FetchError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Failure while posting the message to the chat platform.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("message post failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("message post returned HTTP {0}")]
    Status(u16),

    #[error("message post rejected: {0}")]
    Api(String),

    #[error("unexpected message post response: {0}")]
    Decode(String),
}

/// Everything that can end the handling of one inbound request.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("geo not found")]
    RegionNotFound,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Post(#[from] PostError),
}

/// Startup configuration problems. These stop the process before it serves.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is empty")]
    MissingCredential(&'static str),

    #[error("feed_url_template must contain {{region}}: {0}")]
    InvalidFeedTemplate(String),
}
