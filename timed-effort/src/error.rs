use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("timed-effort: Transport error on joint={} : {}", joint_name, message)]
    Transport { joint_name: String, message: String },
    #[error("timed-effort: Timeout {:?} waiting for joint={}", timeout, joint_name)]
    Timeout {
        joint_name: String,
        timeout: Duration,
    },
    #[error("timed-effort: Invalid command for joint={:?} : {}", joint_name, message)]
    InvalidCommand { joint_name: String, message: String },
    #[error("timed-effort: Timeline of joint={} panicked : {}", joint_name, message)]
    TaskPanicked { joint_name: String, message: String },
    #[error("timed-effort: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns `true` if the error comes from the remote call itself rather
    /// than from the command that was about to be sent.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Timeout { .. })
    }
}
