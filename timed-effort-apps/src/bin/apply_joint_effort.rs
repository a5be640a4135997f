use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use schemars::schema_for;
use timed_effort::TimelineCoordinator;
use timed_effort_apps::{
    utils::{check_report, init_tracing},
    EffortConfig, JointTaskConfig,
};
use tracing::debug;

/// Applies timed efforts to joints, then zeroes them.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_BIN_NAME"))]
struct Args {
    /// Path to the setting file.
    #[arg(short, long, env = "TIMED_EFFORT_CONFIG_PATH")]
    config_path: Option<PathBuf>,
    /// Task as NAME=EFFORT,START_S,DURATION_S. Can be repeated. These replace
    /// the tasks of the setting file.
    #[arg(short, long = "task", value_name = "TASK")]
    tasks: Vec<JointTaskConfig>,
    /// Prints the default setting as TOML.
    #[arg(long)]
    show_default_config: bool,
    /// Prints the JSON schema of the setting file.
    #[arg(long)]
    show_config_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    debug!(?args);

    if args.show_default_config {
        print!("{}", toml::to_string(&EffortConfig::default())?);
        return Ok(());
    }
    if args.show_config_schema {
        let schema = schema_for!(EffortConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let mut config = match args.config_path {
        Some(config_path) => EffortConfig::try_new(config_path)?,
        None => EffortConfig::default(),
    };
    if !args.tasks.is_empty() {
        config.tasks = args.tasks;
    }

    let tasks = config.create_tasks()?;
    let client = config.create_client().await?;
    let coordinator = TimelineCoordinator::with_call_timeout(client, config.call_timeout()?);
    let report = coordinator.run_all(tasks).await;
    check_report(&report)?;
    Ok(())
}
