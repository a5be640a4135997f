use auto_impl::auto_impl;

use crate::{command::JointEffortCommand, error::Error, pending_call::PendingCall};

/// Submits effort commands to a remote actuator service.
#[auto_impl(&, Box, Arc)]
pub trait EffortClient: Send + Sync {
    /// Sends `command` and returns a future that waits for the outcome.
    ///
    /// # Implementation
    ///
    /// The request must be on its way when this returns: the returned
    /// [`PendingCall`] only observes the response. Every call must produce
    /// exactly one remote request, even for a command identical to a
    /// previous one.
    ///
    /// The same client is shared by several timelines at once, so it must
    /// tolerate concurrent outstanding calls.
    fn submit(&self, command: &JointEffortCommand) -> Result<PendingCall<'static>, Error>;
}
