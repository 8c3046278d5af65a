//! Telemetry for reporting bootstrap events
//!
//! Events are always logged locally. When `MONGO_INIT_TELEMETRY_URL` is set they
//! are also posted there as JSON; delivery problems never fail the caller.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the telemetry endpoint.
pub const TELEMETRY_URL_ENV: &str = "MONGO_INIT_TELEMETRY_URL";

/// All telemetry events the bootstrap can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TelemetryEvent {
    /// Bootstrap process started
    BootstrapStarted { node: String, database: String },

    /// Bootstrap completed successfully
    BootstrapCompleted {
        node: String,
        duration_ms: u64,
        users_created: Vec<String>,
    },

    /// Bootstrap failed
    BootstrapFailed {
        node: String,
        error: String,
        phase: String,
    },
}

impl TelemetryEvent {
    /// Get the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BootstrapStarted { .. } => "MONGO_INIT_BOOTSTRAP_STARTED",
            Self::BootstrapCompleted { .. } => "MONGO_INIT_BOOTSTRAP_COMPLETED",
            Self::BootstrapFailed { .. } => "MONGO_INIT_BOOTSTRAP_FAILED",
        }
    }

    /// Convert event to a human-readable message.
    pub fn message(&self) -> String {
        match self {
            Self::BootstrapStarted { node, database } => {
                format!("Bootstrap started on {} for database {}", node, database)
            }
            Self::BootstrapCompleted {
                node,
                duration_ms,
                users_created,
            } => {
                format!(
                    "Bootstrap completed on {} in {}ms (users: {})",
                    node,
                    duration_ms,
                    users_created.join(", ")
                )
            }
            Self::BootstrapFailed { node, error, phase } => {
                format!("Bootstrap failed on {} during {}: {}", node, phase, error)
            }
        }
    }
}

/// Telemetry client for bootstrap events.
#[derive(Clone)]
pub struct Telemetry {
    client: Client,
    endpoint: Option<String>,
    component: String,
}

impl Telemetry {
    /// Create a telemetry client from environment variables.
    pub fn from_env(component: &str) -> Self {
        let endpoint = std::env::var(TELEMETRY_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty());
        Self::new(component, endpoint)
    }

    pub fn new(component: &str, endpoint: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint,
            component: component.to_string(),
        }
    }

    /// Build the JSON body posted for an event.
    pub fn payload(&self, event: &TelemetryEvent) -> serde_json::Value {
        json!({
            "event": event.event_type(),
            "message": event.message(),
            "component": self.component,
            "data": event,
        })
    }

    /// Log an event and deliver it to the endpoint, if configured.
    ///
    /// Awaited inline so a terminal event is out before the process exits.
    pub async fn send(&self, event: TelemetryEvent) {
        info!(event = %event.event_type(), "{}", event.message());

        let Some(endpoint) = &self.endpoint else {
            return;
        };

        match self
            .client
            .post(endpoint)
            .json(&self.payload(&event))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                warn!("Telemetry got status {}", resp.status());
            }
            Err(e) => {
                warn!("Telemetry send failed: {}", e);
            }
        }
    }
}
