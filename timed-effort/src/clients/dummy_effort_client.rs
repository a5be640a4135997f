use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use tracing::debug;

use crate::{
    command::{CallOutcome, JointEffortCommand},
    error::Error,
    pending_call::PendingCall,
    traits::EffortClient,
};

/// Scripted answer of [`DummyEffortClient`] to one call.
#[derive(Debug, Clone, PartialEq)]
pub enum DummyResponse {
    Accept,
    Reject(String),
    TransportFailure(String),
}

/// Dummy EffortClient for dry runs or tests.
///
/// Records every submitted command. Answers are taken from a per-joint queue
/// filled with [`push_response`](Self::push_response); when the queue of a
/// joint is empty the call is accepted.
#[derive(Debug, Default)]
pub struct DummyEffortClient {
    pub submitted: Mutex<Vec<JointEffortCommand>>,
    responses: Mutex<HashMap<String, VecDeque<DummyResponse>>>,
    latency: Mutex<HashMap<String, Duration>>,
}

impl DummyEffortClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the answer to the next unanswered call for `joint_name`.
    pub fn push_response(&self, joint_name: &str, response: DummyResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry(joint_name.to_owned())
            .or_default()
            .push_back(response);
    }

    /// Delays the outcome of every call for `joint_name`.
    pub fn set_latency(&self, joint_name: &str, latency: Duration) {
        self.latency
            .lock()
            .unwrap()
            .insert(joint_name.to_owned(), latency);
    }

    pub fn submitted_commands(&self) -> Vec<JointEffortCommand> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submitted_commands_for(&self, joint_name: &str) -> Vec<JointEffortCommand> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.joint_name() == joint_name)
            .cloned()
            .collect()
    }
}

impl EffortClient for DummyEffortClient {
    fn submit(&self, command: &JointEffortCommand) -> Result<PendingCall<'static>, Error> {
        // Marshal like a real transport would, so invalid commands fail here.
        let request = command.to_request()?;
        debug!(?request, "DummyEffortClient: submit");
        self.submitted.lock().unwrap().push(command.clone());

        let response = self
            .responses
            .lock()
            .unwrap()
            .get_mut(command.joint_name())
            .and_then(|queue| queue.pop_front())
            .unwrap_or(DummyResponse::Accept);
        let latency = self
            .latency
            .lock()
            .unwrap()
            .get(command.joint_name())
            .copied();
        let joint_name = command.joint_name().to_owned();

        Ok(PendingCall::new(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            match response {
                DummyResponse::Accept => Ok(CallOutcome::accepted("")),
                DummyResponse::Reject(message) => Ok(CallOutcome::rejected(message)),
                DummyResponse::TransportFailure(message) => {
                    Err(Error::Transport { joint_name, message })
                }
            }
        }))
    }
}
