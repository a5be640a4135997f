use std::{fmt, sync::Arc, time::Duration};

use tracing::{error, info, warn};

use crate::{
    command::{CallOutcome, EffortTask, JointEffortCommand},
    error::Error,
    traits::EffortClient,
};

/// What happened on one joint's timeline.
///
/// The stop step always succeeded at the transport level, otherwise the run
/// would have returned an error. Its outcome may still be a rejection.
#[derive(Debug)]
pub struct TimelineOutcome {
    pub joint_name: String,
    pub primary: Result<CallOutcome, Error>,
    pub stop: CallOutcome,
}

impl TimelineOutcome {
    /// Returns `true` if the primary command was applied as requested.
    pub fn is_primary_applied(&self) -> bool {
        matches!(&self.primary, Ok(outcome) if outcome.success)
    }
}

/// Drives the two-step timeline of a single joint.
pub struct EffortScheduler<C: ?Sized> {
    client: Arc<C>,
    call_timeout: Option<Duration>,
}

impl<C> EffortScheduler<C>
where
    C: EffortClient + ?Sized,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            call_timeout: None,
        }
    }

    /// Bounds the wait for each remote call.
    pub fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    /// Applies the primary command, then always applies the stop command.
    ///
    /// The stop command is submitted only after the primary's outcome has
    /// been observed, whatever that outcome is. Fails only if the stop step
    /// itself could not be completed.
    pub async fn run(&self, task: &EffortTask) -> Result<TimelineOutcome, Error> {
        let joint_name = task.joint_name();

        info!(joint_name, "Applying effort");
        let primary = self.call(task.primary_command()).await;
        match &primary {
            Ok(outcome) if outcome.success => info!(
                joint_name,
                success = outcome.success,
                message = %outcome.status_message,
                "response"
            ),
            Ok(outcome) => warn!(
                joint_name,
                success = outcome.success,
                message = %outcome.status_message,
                "response"
            ),
            Err(e) => warn!(joint_name, "failed to apply effort: {e}"),
        }

        info!(joint_name, "Stopping");
        let stop = self
            .call(task.stop_command())
            .await
            .inspect_err(|e| error!(joint_name, "failed to stop: {e}"))?;
        if stop.success {
            info!(
                joint_name,
                success = stop.success,
                message = %stop.status_message,
                "stop response"
            );
        } else {
            warn!(
                joint_name,
                success = stop.success,
                message = %stop.status_message,
                "stop response"
            );
        }
        info!(joint_name, "effort stopped");

        Ok(TimelineOutcome {
            joint_name: joint_name.to_owned(),
            primary,
            stop,
        })
    }

    async fn call(&self, command: &JointEffortCommand) -> Result<CallOutcome, Error> {
        info!(
            joint_name = command.joint_name(),
            effort = command.effort(),
            start_time = ?command.start_time(),
            duration = ?command.duration(),
            "submit"
        );
        self.client
            .submit(command)?
            .wait_with_timeout(command.joint_name(), self.call_timeout)
            .await
    }
}

impl<C: ?Sized> fmt::Debug for EffortScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffortScheduler")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}
