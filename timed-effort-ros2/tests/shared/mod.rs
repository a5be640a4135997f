use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use timed_effort_ros2::r2r;

fn unique_suffix() -> usize {
    static COUNT: AtomicUsize = AtomicUsize::new(0);
    COUNT.fetch_add(1, Ordering::Relaxed)
}

pub fn test_node_name() -> String {
    format!("test_timed_effort_ros2_node_{}", unique_suffix())
}

pub fn test_service_name() -> String {
    format!("/test_apply_joint_effort_{}", unique_suffix())
}

pub const TEST_NAMESPACE: &str = "timed_effort_ros2_test";

/// Creates a node for the server side of a test.
pub fn test_server_node() -> r2r::Node {
    let ctx = r2r::Context::create().unwrap();
    r2r::Node::create(ctx, &test_node_name(), TEST_NAMESPACE).unwrap()
}

/// Spins `node` on the current runtime for the rest of the test.
pub fn spin_in_background(mut node: r2r::Node) {
    tokio::spawn(async move {
        loop {
            node.spin_once(Duration::ZERO);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });
}
