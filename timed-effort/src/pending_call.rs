use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt};

use crate::{command::CallOutcome, error::Error};

/// A remote call that has been sent and whose outcome is not known yet.
///
/// Resolves to the [`CallOutcome`] reported by the remote side, or to an
/// [`Error`] if the transport failed. Dropping it does not cancel the call:
/// the actuation has already been scheduled on the remote side.
#[must_use = "dropping a PendingCall discards the outcome of a call that was already sent"]
pub struct PendingCall<'a> {
    future: BoxFuture<'a, Result<CallOutcome, Error>>,
}

impl<'a> PendingCall<'a> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<CallOutcome, Error>> + Send + 'a,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// Creates a call that is already resolved.
    pub fn ready(result: Result<CallOutcome, Error>) -> Self {
        Self::new(futures::future::ready(result))
    }

    /// Waits for the outcome, giving up after `timeout` if one is given.
    pub async fn wait_with_timeout(
        self,
        joint_name: &str,
        timeout: Option<Duration>,
    ) -> Result<CallOutcome, Error> {
        match timeout {
            Some(timeout) => tokio::time::timeout(timeout, self)
                .await
                .map_err(|_| Error::Timeout {
                    joint_name: joint_name.to_owned(),
                    timeout,
                })?,
            None => self.await,
        }
    }
}

impl Future for PendingCall<'_> {
    type Output = Result<CallOutcome, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingCall<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall").finish_non_exhaustive()
    }
}
