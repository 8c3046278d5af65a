//! Failures the bootstrap distinguishes

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BootstrapError {
    #[error("{0} must be set")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("authentication against admin database failed: {0}")]
    AuthenticationFailed(String),

    #[error("could not reach database: {0}")]
    Connection(String),

    #[error("user {username} already exists on database {database}")]
    UserAlreadyExists { username: String, database: String },

    #[error("not authorized to create users: {0}")]
    Unauthorized(String),

    #[error("createUser failed: {0}")]
    Command(String),
}

impl BootstrapError {
    /// Bootstrap step the failure belongs to, as reported in logs and telemetry.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) | Self::InvalidConfig(_) => "read_config",
            Self::AuthenticationFailed(_) | Self::Connection(_) => "authenticate",
            Self::UserAlreadyExists { .. } | Self::Unauthorized(_) | Self::Command(_) => {
                "create_user"
            }
        }
    }
}
