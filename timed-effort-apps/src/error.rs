use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("timed-effort-apps: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("timed-effort-apps: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("timed-effort-apps: Config {} requires ros2 feature.", .0)]
    ConfigRequireRos2(String),
    #[error("timed-effort-apps: Invalid config {} : {}", .0, .1)]
    InvalidConfig(String, String),
    #[error("timed-effort-apps: Failed to stop joints {:?}.", .0)]
    StopFailed(Vec<String>),
    #[error("timed-effort-apps: timed-effort: {:?}", .0)]
    TimedEffort(#[from] timed_effort::Error),
}
