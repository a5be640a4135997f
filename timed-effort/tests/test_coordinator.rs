use std::{sync::Arc, time::Duration};

use timed_effort::*;

fn task(joint_name: &str, effort: f64, start: u64, duration: u64) -> EffortTask {
    EffortTask::with_default_stop_hold(
        JointEffortCommand::new(
            joint_name,
            effort,
            Duration::from_secs(start),
            Duration::from_secs(duration),
        )
        .unwrap(),
    )
    .unwrap()
}

fn expected(joint_name: &str, effort: f64, start: u64, duration: u64) -> JointEffortCommand {
    JointEffortCommand::new(
        joint_name,
        effort,
        Duration::from_secs(start),
        Duration::from_secs(duration),
    )
    .unwrap()
}

#[tokio::test]
async fn test_two_wheels() {
    let client = Arc::new(DummyEffortClient::new());
    let coordinator = TimelineCoordinator::new(client.clone());

    let report = coordinator
        .run_all(vec![
            task("wheel_left_joint", 1.0, 30, 2),
            task("wheel_right_joint", 1.0, 30, 3),
        ])
        .await;

    assert!(report.is_safe());
    assert!(report.failed_joints().is_empty());
    assert!(report.primary_failures().is_empty());
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].joint_name, "wheel_left_joint");
    assert_eq!(report.results[1].joint_name, "wheel_right_joint");

    assert_eq!(
        client.submitted_commands_for("wheel_left_joint"),
        vec![
            expected("wheel_left_joint", 1.0, 30, 2),
            expected("wheel_left_joint", 0.0, 32, 1),
        ]
    );
    assert_eq!(
        client.submitted_commands_for("wheel_right_joint"),
        vec![
            expected("wheel_right_joint", 1.0, 30, 3),
            expected("wheel_right_joint", 0.0, 33, 1),
        ]
    );
    assert_eq!(client.submitted_commands().len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_cross_talk() {
    let client = Arc::new(DummyEffortClient::new());
    let joints: Vec<String> = (0..8).map(|i| format!("joint_{i}")).collect();
    for (i, joint) in joints.iter().enumerate() {
        client.set_latency(joint, Duration::from_millis(5 * (i as u64 % 3)));
    }
    let tasks = joints
        .iter()
        .enumerate()
        .map(|(i, joint)| task(joint, i as f64 + 0.5, i as u64, i as u64 + 1))
        .collect();

    let report = TimelineCoordinator::new(client.clone()).run_all(tasks).await;
    assert!(report.is_safe());

    for (i, joint) in joints.iter().enumerate() {
        let i = i as u64;
        assert_eq!(
            client.submitted_commands_for(joint),
            vec![
                expected(joint, i as f64 + 0.5, i, i + 1),
                expected(joint, 0.0, 2 * i + 1, 1),
            ],
            "{joint}"
        );
    }
    assert_eq!(client.submitted_commands().len(), 16);
}

#[tokio::test]
async fn test_timelines_run_concurrently() {
    let client = Arc::new(DummyEffortClient::new());
    client.set_latency("slow", Duration::from_millis(200));
    let coordinator = TimelineCoordinator::new(client.clone());

    let report = coordinator
        .run_all(vec![task("slow", 1.0, 0, 1), task("fast", 1.0, 0, 1)])
        .await;
    assert!(report.is_safe());

    // "fast" finishes its whole timeline while "slow" waits for its primary.
    let order: Vec<_> = client
        .submitted_commands()
        .iter()
        .map(|c| (c.joint_name().to_owned(), c.effort()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("slow".to_owned(), 1.0),
            ("fast".to_owned(), 1.0),
            ("fast".to_owned(), 0.0),
            ("slow".to_owned(), 0.0),
        ]
    );
}

#[tokio::test]
async fn test_stop_failure_does_not_affect_sibling() {
    let client = Arc::new(DummyEffortClient::new());
    client.push_response("wheel_left_joint", DummyResponse::Accept);
    client.push_response(
        "wheel_left_joint",
        DummyResponse::TransportFailure("service died".into()),
    );
    client.set_latency("wheel_right_joint", Duration::from_millis(20));
    let coordinator = TimelineCoordinator::new(client.clone());

    let report = coordinator
        .run_all(vec![
            task("wheel_left_joint", 1.0, 30, 2),
            task("wheel_right_joint", 1.0, 30, 3),
        ])
        .await;

    assert!(!report.is_safe());
    assert_eq!(report.failed_joints(), vec!["wheel_left_joint"]);
    let left = report.get("wheel_left_joint").unwrap();
    assert!(matches!(left.result, Err(Error::Transport { .. })));
    let right = report.get("wheel_right_joint").unwrap();
    let right = right.result.as_ref().unwrap();
    assert!(right.is_primary_applied());
    assert!(right.stop.success);
    assert_eq!(client.submitted_commands_for("wheel_right_joint").len(), 2);
}

#[tokio::test]
async fn test_primary_failures_are_reported_separately() {
    let client = Arc::new(DummyEffortClient::new());
    client.push_response("a", DummyResponse::Reject("unknown joint".into()));
    client.push_response("b", DummyResponse::TransportFailure("timeout".into()));
    let coordinator = TimelineCoordinator::new(client.clone());

    let report = coordinator
        .run_all(vec![task("a", 1.0, 0, 1), task("b", 1.0, 0, 1), task("c", 1.0, 0, 1)])
        .await;

    assert!(report.is_safe());
    assert_eq!(report.primary_failures(), vec!["a", "b"]);
    assert_eq!(client.submitted_commands().len(), 6);
}

#[derive(Debug)]
struct PanickingClient;

impl EffortClient for PanickingClient {
    fn submit(&self, command: &JointEffortCommand) -> Result<PendingCall<'static>, Error> {
        if command.joint_name() == "broken" {
            panic!("broken client");
        }
        Ok(PendingCall::ready(Ok(CallOutcome::accepted(""))))
    }
}

#[tokio::test]
async fn test_panicking_timeline_is_isolated() {
    let coordinator = TimelineCoordinator::new(Arc::new(PanickingClient));
    let report = coordinator
        .run_all(vec![task("broken", 1.0, 0, 1), task("ok", 1.0, 0, 1)])
        .await;
    assert_eq!(report.failed_joints(), vec!["broken"]);
    assert!(matches!(
        report.get("broken").unwrap().result,
        Err(Error::TaskPanicked { .. })
    ));
    assert!(report.get("ok").unwrap().result.is_ok());
}

#[tokio::test]
async fn test_empty_task_list() {
    let coordinator = TimelineCoordinator::new(Arc::new(DummyEffortClient::new()));
    let report = coordinator.run_all(vec![]).await;
    assert!(report.is_safe());
    assert!(report.results.is_empty());
}
