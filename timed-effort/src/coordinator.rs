use std::{sync::Arc, time::Duration};

use tracing::{debug, error, info};

use crate::{
    command::EffortTask,
    error::Error,
    scheduler::{EffortScheduler, TimelineOutcome},
    traits::EffortClient,
};

/// Settled timeline of one joint.
#[derive(Debug)]
pub struct TimelineResult {
    pub joint_name: String,
    pub result: Result<TimelineOutcome, Error>,
}

/// Per-joint results of [`TimelineCoordinator::run_all`], in task order.
#[derive(Debug, Default)]
pub struct TimelineReport {
    pub results: Vec<TimelineResult>,
}

impl TimelineReport {
    /// Returns `true` if every joint's stop command went through.
    pub fn is_safe(&self) -> bool {
        self.results.iter().all(|r| r.result.is_ok())
    }

    /// Joints whose timeline failed, which means their stop step failed.
    pub fn failed_joints(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.result.is_err())
            .map(|r| r.joint_name.as_str())
            .collect()
    }

    /// Joints whose primary command was rejected or could not be delivered,
    /// even though their timeline settled.
    pub fn primary_failures(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| matches!(&r.result, Ok(outcome) if !outcome.is_primary_applied()))
            .map(|r| r.joint_name.as_str())
            .collect()
    }

    pub fn get(&self, joint_name: &str) -> Option<&TimelineResult> {
        self.results.iter().find(|r| r.joint_name == joint_name)
    }
}

/// Runs the timelines of several joints concurrently.
#[derive(Debug)]
pub struct TimelineCoordinator<C: ?Sized> {
    scheduler: Arc<EffortScheduler<C>>,
}

impl<C> TimelineCoordinator<C>
where
    C: EffortClient + ?Sized + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self::from_scheduler(EffortScheduler::new(client))
    }

    pub fn with_call_timeout(client: Arc<C>, call_timeout: Option<Duration>) -> Self {
        Self::from_scheduler(EffortScheduler::new(client).with_call_timeout(call_timeout))
    }

    pub fn from_scheduler(scheduler: EffortScheduler<C>) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
        }
    }

    pub fn scheduler(&self) -> &EffortScheduler<C> {
        &self.scheduler
    }

    /// Starts one timeline per task at once and waits until all of them have
    /// settled.
    ///
    /// A failing or panicking timeline never cancels the others. This does
    /// not sleep until the start times: the remote service honors them.
    ///
    /// Must be called within a tokio runtime.
    pub async fn run_all(&self, tasks: Vec<EffortTask>) -> TimelineReport {
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let scheduler = self.scheduler.clone();
                let joint_name = task.joint_name().to_owned();
                debug!(%joint_name, "spawning timeline");
                let handle = tokio::spawn(async move { scheduler.run(&task).await });
                (joint_name, handle)
            })
            .collect();

        let mut report = TimelineReport::default();
        for (joint_name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(Error::TaskPanicked {
                    joint_name: joint_name.clone(),
                    message: e.to_string(),
                }),
            };
            match &result {
                Ok(_) => info!(%joint_name, "timeline settled"),
                Err(e) => error!(%joint_name, "timeline failed: {e}"),
            }
            report.results.push(TimelineResult { joint_name, result });
        }
        report
    }
}
