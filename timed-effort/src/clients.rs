mod dummy_effort_client;

pub use dummy_effort_client::*;
