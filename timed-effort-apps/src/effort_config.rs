use std::{collections::HashSet, path::Path, str::FromStr, sync::Arc, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use timed_effort::{DummyEffortClient, EffortClient, EffortTask, JointEffortCommand};
#[cfg(feature = "ros2")]
use timed_effort_ros2::{Ros2EffortClient, Ros2EffortClientConfig};
use tracing::{debug, warn};

use crate::Error;

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[serde(tag = "type", content = "args")]
#[serde(deny_unknown_fields)]
#[non_exhaustive] // The variants will increase depending on the feature flag.
pub enum EffortClientConfig {
    /// Accepts every command without sending it anywhere.
    Dummy,
    #[cfg(feature = "ros2")]
    Ros2 { config: Ros2EffortClientConfig },
    // Not public API.
    // A dummy variant to catch that there is a config that requires the ros2 feature.
    #[doc(hidden)]
    #[cfg(not(feature = "ros2"))]
    #[serde(rename = "Ros2")]
    __Ros2 {
        #[schemars(schema_with = "any_schema")]
        config: toml::Value,
    },
}

impl Default for EffortClientConfig {
    fn default() -> Self {
        #[cfg(feature = "ros2")]
        {
            EffortClientConfig::Ros2 {
                config: Ros2EffortClientConfig::default(),
            }
        }
        #[cfg(not(feature = "ros2"))]
        {
            EffortClientConfig::Dummy
        }
    }
}

// Schema for dummy fields.
#[cfg(not(feature = "ros2"))]
fn any_schema(_gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
    schemars::schema::Schema::Bool(true)
}

/// Timeline of one joint, in whole seconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct JointTaskConfig {
    pub joint_name: String,
    pub effort: f64,
    pub start_time_s: i64,
    pub duration_s: i64,
}

impl JointTaskConfig {
    pub fn to_primary_command(&self) -> Result<JointEffortCommand, Error> {
        let seconds = |key: &str, value: i64| {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| {
                    Error::InvalidConfig(
                        format!("{}.{key}", self.joint_name),
                        format!("must not be negative, got {value}"),
                    )
                })
        };
        Ok(JointEffortCommand::new(
            self.joint_name.clone(),
            self.effort,
            seconds("start_time_s", self.start_time_s)?,
            seconds("duration_s", self.duration_s)?,
        )?)
    }
}

/// Parses `NAME=EFFORT,START_S,DURATION_S`.
impl FromStr for JointTaskConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| Error::InvalidConfig(s.to_owned(), message.to_owned());
        let (joint_name, values) = s
            .split_once('=')
            .ok_or_else(|| invalid("expected NAME=EFFORT,START_S,DURATION_S"))?;
        let values: Vec<_> = values.split(',').map(str::trim).collect();
        let &[effort, start_time_s, duration_s] = &values[..] else {
            return Err(invalid("expected 3 comma separated values after `=`"));
        };
        Ok(Self {
            joint_name: joint_name.trim().to_owned(),
            effort: effort.parse().map_err(|_| invalid("invalid effort"))?,
            start_time_s: start_time_s
                .parse()
                .map_err(|_| invalid("invalid start time"))?,
            duration_s: duration_s.parse().map_err(|_| invalid("invalid duration"))?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EffortConfig {
    // Plain values first: toml cannot serialize them after a table.
    /// How long the zero effort is held after each task.
    #[serde(default = "default_stop_duration_s")]
    pub stop_duration_s: u64,
    /// Upper bound of the wait for each remote call. Unbounded if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_sec: Option<f64>,
    /// If not empty, every task must target one of these joints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_joint_names: Vec<String>,

    #[serde(default)]
    pub client_config: EffortClientConfig,
    #[serde(default)]
    pub tasks: Vec<JointTaskConfig>,
}

impl Default for EffortConfig {
    fn default() -> Self {
        Self {
            stop_duration_s: default_stop_duration_s(),
            call_timeout_sec: None,
            known_joint_names: vec![],
            client_config: EffortClientConfig::default(),
            tasks: vec![
                JointTaskConfig {
                    joint_name: "wheel_left_joint".to_owned(),
                    effort: 1.0,
                    start_time_s: 30,
                    duration_s: 2,
                },
                JointTaskConfig {
                    joint_name: "wheel_right_joint".to_owned(),
                    effort: 1.0,
                    start_time_s: 30,
                    duration_s: 3,
                },
            ],
        }
    }
}

fn default_stop_duration_s() -> u64 {
    1
}

impl EffortConfig {
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_str(
            &std::fs::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            &path,
        )
    }

    pub fn from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        let config: EffortConfig =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;

        // Returns an error if a config requires ros2 feature but ros2 feature is disabled.
        #[cfg(not(feature = "ros2"))]
        {
            if matches!(config.client_config, EffortClientConfig::__Ros2 { .. }) {
                return Err(Error::ConfigRequireRos2("client_config".into()));
            }
        }

        debug!("{:?}", config);
        Ok(config)
    }

    pub fn call_timeout(&self) -> Result<Option<Duration>, Error> {
        self.call_timeout_sec
            .map(|sec| {
                Duration::try_from_secs_f64(sec).map_err(|e| {
                    Error::InvalidConfig("call_timeout_sec".to_owned(), e.to_string())
                })
            })
            .transpose()
    }

    /// Builds one task per configured joint.
    ///
    /// Fails without building anything if a task is invalid, targets an
    /// unknown joint, or targets a joint that already has a task.
    pub fn create_tasks(&self) -> Result<Vec<EffortTask>, Error> {
        if self.tasks.is_empty() {
            warn!("no task is configured");
        }
        let known: HashSet<&str> = self.known_joint_names.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let stop_hold = Duration::from_secs(self.stop_duration_s);
        self.tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let key = || format!("tasks[{i}]");
                if !known.is_empty() && !known.contains(task.joint_name.as_str()) {
                    return Err(Error::InvalidConfig(
                        key(),
                        format!("unknown joint {:?}", task.joint_name),
                    ));
                }
                if !seen.insert(task.joint_name.as_str()) {
                    return Err(Error::InvalidConfig(
                        key(),
                        format!("joint {:?} has more than one task", task.joint_name),
                    ));
                }
                Ok(EffortTask::new(task.to_primary_command()?, stop_hold)?)
            })
            .collect()
    }

    /// Creates the client described by `client_config`.
    ///
    /// For ROS2 this waits until the service is available.
    pub async fn create_client(&self) -> Result<Arc<dyn EffortClient>, Error> {
        match &self.client_config {
            EffortClientConfig::Dummy => {
                warn!("Dummy client is used: no effort is actually applied");
                Ok(Arc::new(DummyEffortClient::new()))
            }
            #[cfg(feature = "ros2")]
            EffortClientConfig::Ros2 { config } => {
                let client = Ros2EffortClient::new_from_config(config)?;
                let timeout = Duration::try_from_secs_f64(config.wait_for_service_timeout_sec)
                    .map_err(|e| {
                        Error::InvalidConfig(
                            "client_config.args.config.wait_for_service_timeout_sec".to_owned(),
                            e.to_string(),
                        )
                    })?;
                client.wait_for_service(timeout).await?;
                Ok(Arc::new(client))
            }
            #[cfg(not(feature = "ros2"))]
            EffortClientConfig::__Ros2 { .. } => {
                Err(Error::ConfigRequireRos2("client_config".into()))
            }
        }
    }
}
