//! MongoDB init hook
//!
//! Runs ONCE against a freshly started instance, from the container's
//! initialization hook. Exits non-zero when authentication or user creation
//! fails; a second run against the same data fails at user creation.

use anyhow::Result;
use common::{init_logging, Telemetry, TelemetryEvent};
use mongo_init::{run, BootstrapConfig, BootstrapError, MongoConnector};
use std::env;
use tracing::{error, info};

async fn report_failure(telemetry: &Telemetry, node: &str, err: &BootstrapError) {
    error!(error = %err, phase = err.phase(), "Bootstrap failed");
    telemetry
        .send(TelemetryEvent::BootstrapFailed {
            node: node.to_string(),
            error: err.to_string(),
            phase: err.phase().to_string(),
        })
        .await;
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _guard = init_logging("mongo-init");

    let telemetry = Telemetry::from_env("mongo-init");
    let node_name = env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());

    info!("Mongo init starting...");

    let config = match BootstrapConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            report_failure(&telemetry, &node_name, &e).await;
            std::process::exit(1);
        }
    };

    telemetry
        .send(TelemetryEvent::BootstrapStarted {
            node: node_name.clone(),
            database: config.app_user.database.clone(),
        })
        .await;

    let connector = MongoConnector::new(&config);
    let report = match run(&connector, &config).await {
        Ok(r) => r,
        Err(e) => {
            report_failure(&telemetry, &node_name, &e).await;
            std::process::exit(1);
        }
    };

    info!(
        username = %report.username,
        database = %report.database,
        roles = ?report.roles,
        "User created"
    );

    telemetry
        .send(TelemetryEvent::BootstrapCompleted {
            node: node_name,
            duration_ms: report.duration_ms,
            users_created: vec![report.username],
        })
        .await;

    info!(duration_ms = report.duration_ms, "Mongo init completed");

    Ok(())
}
