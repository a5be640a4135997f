use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use r2r::{
    builtin_interfaces::msg as builtin_msg, gazebo_msgs::srv::ApplyJointEffort, QosProfile,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use timed_effort::{
    ApplyJointEffortRequest, CallOutcome, EffortClient, Error, JointEffortCommand, PendingCall,
    RemoteTime,
};
use tracing::{debug, info};

use crate::spinner::Spinner;

const SPIN_PERIOD: Duration = Duration::from_millis(10);

/// `timed_effort::EffortClient` implementation for the gazebo
/// `ApplyJointEffort` service.
///
/// The client owns its node and spins it in the background until dropped.
pub struct Ros2EffortClient {
    client: Mutex<r2r::Client<ApplyJointEffort::Service>>,
    node: Arc<Mutex<r2r::Node>>,
    service_name: String,
    _spinner: Spinner,
}

impl Ros2EffortClient {
    /// Creates a node named `node_name` in `namespace` and a client of the
    /// service named `service_name` on it.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(node_name: &str, namespace: &str, service_name: &str) -> Result<Self, Error> {
        let ctx = r2r::Context::create().map_err(anyhow::Error::from)?;
        let mut node =
            r2r::Node::create(ctx, node_name, namespace).map_err(anyhow::Error::from)?;
        let client = node
            .create_client::<ApplyJointEffort::Service>(service_name, QosProfile::default())
            .map_err(|e| Error::Transport {
                joint_name: String::new(),
                message: format!("failed to create client for {service_name}: {e}"),
            })?;
        let node = Arc::new(Mutex::new(node));
        debug!(node_name, namespace, service_name, "ros2 effort client created");
        Ok(Self {
            client: Mutex::new(client),
            _spinner: Spinner::start(node.clone(), SPIN_PERIOD),
            node,
            service_name: service_name.to_owned(),
        })
    }

    /// Creates a client as described by `config`.
    pub fn new_from_config(config: &Ros2EffortClientConfig) -> Result<Self, Error> {
        Self::new(&config.node_name, &config.namespace, &config.service_name)
    }

    /// Name of the service this client calls.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Waits until the service is available.
    ///
    /// An unreachable service is reported as a transport error after
    /// `timeout`.
    pub async fn wait_for_service(&self, timeout: Duration) -> Result<(), Error> {
        let transport_error = |message: String| Error::Transport {
            joint_name: String::new(),
            message,
        };
        let is_available = {
            let client = self.client.lock();
            self.node
                .lock()
                .is_available(&*client)
                .map_err(|e| transport_error(format!("{}: {e}", self.service_name)))?
        };
        info!(service_name = %self.service_name, "waiting for service");
        tokio::time::timeout(timeout, is_available)
            .await
            .map_err(|_| {
                transport_error(format!(
                    "service {} is not available after {timeout:?}",
                    self.service_name
                ))
            })?
            .map_err(|e| transport_error(format!("{}: {e}", self.service_name)))?;
        info!(service_name = %self.service_name, "service available");
        Ok(())
    }
}

impl EffortClient for Ros2EffortClient {
    fn submit(&self, command: &JointEffortCommand) -> Result<PendingCall<'static>, Error> {
        let request = to_request_msg(command.to_request()?);
        debug!(?request, service_name = %self.service_name, "send request");
        let joint_name = command.joint_name().to_owned();
        let response = self
            .client
            .lock()
            .request(&request)
            .map_err(|e| Error::Transport {
                joint_name: joint_name.clone(),
                message: format!("r2r request error: {e:?}"),
            })?;
        Ok(PendingCall::new(async move {
            let response = response.await.map_err(|e| Error::Transport {
                joint_name,
                message: format!("r2r response error: {e:?}"),
            })?;
            Ok(from_response_msg(response))
        }))
    }
}

impl std::fmt::Debug for Ros2EffortClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ros2EffortClient")
            .field("service_name", &self.service_name)
            .finish_non_exhaustive()
    }
}

fn to_time_msg(time: RemoteTime) -> builtin_msg::Time {
    builtin_msg::Time {
        sec: time.sec,
        nanosec: time.nanosec,
    }
}

fn to_duration_msg(time: RemoteTime) -> builtin_msg::Duration {
    builtin_msg::Duration {
        sec: time.sec,
        nanosec: time.nanosec,
    }
}

fn to_request_msg(request: ApplyJointEffortRequest) -> ApplyJointEffort::Request {
    ApplyJointEffort::Request {
        joint_name: request.joint_name,
        effort: request.effort,
        start_time: to_time_msg(request.start_time),
        duration: to_duration_msg(request.duration),
    }
}

fn from_response_msg(response: ApplyJointEffort::Response) -> CallOutcome {
    CallOutcome {
        success: response.success,
        status_message: response.status_message,
    }
}

/// Configuration for `Ros2EffortClient`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Ros2EffortClientConfig {
    /// Service name for gazebo_msgs/ApplyJointEffort.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Name of the node created for the client.
    #[serde(default = "default_node_name")]
    pub node_name: String,
    /// Namespace of the node.
    #[serde(default)]
    pub namespace: String,
    /// How long to wait for the service before giving up.
    #[serde(default = "default_wait_for_service_timeout_sec")]
    pub wait_for_service_timeout_sec: f64,
}

impl Default for Ros2EffortClientConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            node_name: default_node_name(),
            namespace: String::new(),
            wait_for_service_timeout_sec: default_wait_for_service_timeout_sec(),
        }
    }
}

fn default_service_name() -> String {
    "/apply_joint_effort".to_owned()
}

fn default_node_name() -> String {
    "apply_effort_client".to_owned()
}

fn default_wait_for_service_timeout_sec() -> f64 {
    10.0
}
