//! JSON-lines method channel over stdio
//!
//! One request object per stdin line, one response or event object per
//! stdout line. A single writer task owns stdout.

use std::io::{self, BufRead};
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::error::MALFORMED_REQUEST;
use crate::application::{ErrorEnvelope, NotificationPlugin, PluginError};
use crate::domain::relay::OutboundEvent;
use crate::domain::request::parse_arguments;
use crate::infrastructure::NativeCenter;

/// Inject a tap on a notification the native center knows about
pub const SIMULATE_TAP: &str = "simulateTap";
/// Inject an action button press or text reply
pub const SIMULATE_ACTION: &str = "simulateAction";
/// Deliver every scheduled notification that is due now
pub const DELIVER_DUE: &str = "deliverDue";

const UNKNOWN_NOTIFICATION: &str = "unknown_notification";

/// A method call read from stdin
#[derive(Debug, Deserialize)]
pub struct HostRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Reply to a single request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HostResponse {
    Result { id: Value, result: Value },
    Error { id: Value, error: ErrorEnvelope },
}

impl HostResponse {
    fn from_outcome(id: Value, outcome: Result<Value, ErrorEnvelope>) -> Self {
        match outcome {
            Ok(result) => Self::Result { id, result },
            Err(error) => Self::Error { id, error },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateTapArgs {
    id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateActionArgs {
    id: i64,
    action_id: String,
    #[serde(default)]
    input: Option<String>,
}

/// Plugin plus the native center it runs against
pub struct Host {
    plugin: NotificationPlugin,
    center: NativeCenter,
}

impl Host {
    pub fn new(plugin: NotificationPlugin, center: NativeCenter) -> Self {
        Self { plugin, center }
    }

    pub fn plugin(&self) -> &NotificationPlugin {
        &self.plugin
    }

    /// Handle one raw stdin line
    pub async fn handle_line(&self, line: &str) -> HostResponse {
        match serde_json::from_str::<HostRequest>(line) {
            Ok(request) => {
                let outcome = self.call(&request.method, request.arguments).await;
                HostResponse::from_outcome(request.id, outcome)
            }
            Err(e) => {
                debug!(error = %e, "Unreadable request line");
                HostResponse::Error {
                    id: Value::Null,
                    error: ErrorEnvelope {
                        code: MALFORMED_REQUEST.to_string(),
                        message: format!("Invalid request: {}", e),
                        details: None,
                    },
                }
            }
        }
    }

    /// Dispatch a call to the host simulation methods or the plugin
    pub async fn call(&self, method: &str, arguments: Value) -> Result<Value, ErrorEnvelope> {
        match method {
            SIMULATE_TAP => {
                let args: SimulateTapArgs = parse_arguments(&arguments).map_err(envelope)?;
                let callback = self
                    .center
                    .tap(args.id)
                    .await
                    .ok_or_else(|| unknown_notification(args.id))?;
                Ok(json!(self.plugin.deliver_native(&callback).await))
            }
            SIMULATE_ACTION => {
                let args: SimulateActionArgs = parse_arguments(&arguments).map_err(envelope)?;
                let callback = self
                    .center
                    .action(args.id, &args.action_id, args.input)
                    .await
                    .ok_or_else(|| unknown_notification(args.id))?;
                Ok(json!(self.plugin.deliver_native(&callback).await))
            }
            DELIVER_DUE => Ok(json!(self.center.deliver_due().await)),
            _ => self.plugin.handle(method, arguments).await,
        }
    }
}

fn envelope(err: impl Into<PluginError>) -> ErrorEnvelope {
    ErrorEnvelope::from(err.into())
}

fn unknown_notification(id: i64) -> ErrorEnvelope {
    ErrorEnvelope {
        code: UNKNOWN_NOTIFICATION.to_string(),
        message: format!("No notification with id {} in the native center", id),
        details: None,
    }
}

/// Read stdin lines on a dedicated thread.
///
/// The channel closes at end of input. The thread is detached so a pending
/// read never holds up shutdown.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Write events and responses as JSON lines until both channels close.
///
/// Events are drained first so an event emitted before a response was
/// produced is also written before it.
pub async fn write_lines<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut events: mpsc::UnboundedReceiver<OutboundEvent>,
    mut responses: mpsc::UnboundedReceiver<HostResponse>,
) -> io::Result<()> {
    loop {
        let encoded = tokio::select! {
            biased;
            Some(event) = events.recv() => serde_json::to_string(&event),
            Some(response) = responses.recv() => serde_json::to_string(&response),
            else => break,
        };

        let line = match encoded {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to encode outbound message");
                continue;
            }
        };

        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
