use std::time::Duration;

use crate::error::Error;

/// Hold time of the zero effort command issued after every primary command.
pub const DEFAULT_STOP_HOLD: Duration = Duration::from_secs(1);

/// Effort to apply to one joint, starting at `start_time` for `duration`.
///
/// `start_time` is an offset from the time origin tracked by the remote
/// actuator service, not a local wall-clock instant.
#[derive(Debug, Clone, PartialEq)]
pub struct JointEffortCommand {
    joint_name: String,
    effort: f64,
    start_time: Duration,
    duration: Duration,
}

impl JointEffortCommand {
    /// Creates a new command.
    ///
    /// Fails if `joint_name` is empty or `effort` is not finite.
    pub fn new(
        joint_name: impl Into<String>,
        effort: f64,
        start_time: Duration,
        duration: Duration,
    ) -> Result<Self, Error> {
        let joint_name = joint_name.into();
        if joint_name.trim().is_empty() {
            return Err(Error::InvalidCommand {
                joint_name,
                message: "joint name is empty".to_owned(),
            });
        }
        if !effort.is_finite() {
            return Err(Error::InvalidCommand {
                joint_name,
                message: format!("effort must be finite, got {effort}"),
            });
        }
        Ok(Self {
            joint_name,
            effort,
            start_time,
            duration,
        })
    }

    pub fn joint_name(&self) -> &str {
        &self.joint_name
    }

    pub fn effort(&self) -> f64 {
        self.effort
    }

    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Instant at which this command stops acting.
    pub fn end_time(&self) -> Option<Duration> {
        self.start_time.checked_add(self.duration)
    }

    /// Marshals this command into the record expected by the remote
    /// `ApplyJointEffort` service.
    pub fn to_request(&self) -> Result<ApplyJointEffortRequest, Error> {
        Ok(ApplyJointEffortRequest {
            joint_name: self.joint_name.clone(),
            effort: self.effort,
            start_time: RemoteTime::from_duration(&self.joint_name, self.start_time)?,
            duration: RemoteTime::from_duration(&self.joint_name, self.duration)?,
        })
    }
}

/// Seconds and sub-second remainder, as carried on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteTime {
    pub sec: i32,
    pub nanosec: u32,
}

impl RemoteTime {
    fn from_duration(joint_name: &str, duration: Duration) -> Result<Self, Error> {
        let sec = i32::try_from(duration.as_secs()).map_err(|_| Error::InvalidCommand {
            joint_name: joint_name.to_owned(),
            message: format!("{duration:?} does not fit in a 32-bit seconds field"),
        })?;
        Ok(Self {
            sec,
            nanosec: duration.subsec_nanos(),
        })
    }
}

/// Request record of `gazebo_msgs/srv/ApplyJointEffort`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyJointEffortRequest {
    pub joint_name: String,
    pub effort: f64,
    pub start_time: RemoteTime,
    pub duration: RemoteTime,
}

/// Response of the remote service for a single call.
///
/// `success == false` is a rejection by the remote side (unknown joint, out
/// of range effort, ...). It is a normal value, not an [`Error`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOutcome {
    pub success: bool,
    pub status_message: String,
}

impl CallOutcome {
    pub fn accepted(status_message: impl Into<String>) -> Self {
        Self {
            success: true,
            status_message: status_message.into(),
        }
    }

    pub fn rejected(status_message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_message: status_message.into(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        !self.success
    }
}

/// The two-step timeline of one joint: the primary command and the zero
/// effort command derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EffortTask {
    primary_command: JointEffortCommand,
    stop_command: JointEffortCommand,
}

impl EffortTask {
    /// Creates a task whose stop command starts right when `primary_command`
    /// ends and holds zero effort for `stop_hold`.
    ///
    /// Both commands must be representable on the wire, so that a task never
    /// gets its primary sent while its stop cannot be.
    pub fn new(primary_command: JointEffortCommand, stop_hold: Duration) -> Result<Self, Error> {
        let stop_start = primary_command
            .end_time()
            .ok_or_else(|| Error::InvalidCommand {
                joint_name: primary_command.joint_name.clone(),
                message: format!(
                    "start time {:?} + duration {:?} overflows",
                    primary_command.start_time, primary_command.duration
                ),
            })?;
        let stop_command = JointEffortCommand {
            joint_name: primary_command.joint_name.clone(),
            effort: 0.0,
            start_time: stop_start,
            duration: stop_hold,
        };
        primary_command.to_request()?;
        stop_command.to_request()?;
        Ok(Self {
            primary_command,
            stop_command,
        })
    }

    pub fn with_default_stop_hold(primary_command: JointEffortCommand) -> Result<Self, Error> {
        Self::new(primary_command, DEFAULT_STOP_HOLD)
    }

    pub fn joint_name(&self) -> &str {
        self.primary_command.joint_name()
    }

    pub fn primary_command(&self) -> &JointEffortCommand {
        &self.primary_command
    }

    pub fn stop_command(&self) -> &JointEffortCommand {
        &self.stop_command
    }
}
