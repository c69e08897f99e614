use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Server responded with status {0}")]
    UnexpectedStatus(u16),

    #[error("Job {job_id} did not finish after {attempts} status checks")]
    PollLimitReached { job_id: String, attempts: u32 },
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Configuration(err.to_string())
    }
}
