//! Event relay
//!
//! A task draining one inbound queue into the outbound event channel. The
//! lifecycle it owns decides what is emitted and when; the plugin reads
//! launch details through a [`RelayHandle`].

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::relay::{
    Interaction, LaunchDetails, LifecycleState, OutboundEvent, RelayLifecycle,
};

/// Messages accepted by the relay task
#[derive(Debug)]
pub enum RelayMessage {
    Interaction(Interaction),
    /// Complete initialization; the sender is signalled once the held event
    /// (if any) has been emitted
    MarkInitialized(oneshot::Sender<()>),
}

/// The relay task is no longer running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Event relay is not running")]
pub struct RelayClosed;

/// Receiving end of the relay, run as a task
pub struct EventRelay {
    inbound: mpsc::UnboundedReceiver<RelayMessage>,
    outbound: mpsc::UnboundedSender<OutboundEvent>,
    lifecycle: Arc<Mutex<RelayLifecycle>>,
}

/// Cloneable sending end of the relay
#[derive(Clone)]
pub struct RelayHandle {
    inbound: mpsc::UnboundedSender<RelayMessage>,
    lifecycle: Arc<Mutex<RelayLifecycle>>,
}

/// Create a relay emitting into `outbound`
pub fn relay_channel(outbound: mpsc::UnboundedSender<OutboundEvent>) -> (EventRelay, RelayHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    let lifecycle = Arc::new(Mutex::new(RelayLifecycle::new()));
    (
        EventRelay {
            inbound: rx,
            outbound,
            lifecycle: Arc::clone(&lifecycle),
        },
        RelayHandle {
            inbound: tx,
            lifecycle,
        },
    )
}

fn lock(lifecycle: &Mutex<RelayLifecycle>) -> MutexGuard<'_, RelayLifecycle> {
    lifecycle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EventRelay {
    /// Spawn the relay on the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process messages until every handle is dropped
    pub async fn run(mut self) {
        while let Some(message) = self.inbound.recv().await {
            self.handle(message);
        }
        debug!("Event relay stopped");
    }

    fn handle(&self, message: RelayMessage) {
        match message {
            RelayMessage::Interaction(interaction) => {
                let emitted = lock(&self.lifecycle).receive(interaction);
                match emitted {
                    Some(event) => self.emit(event),
                    None => debug!("Holding notification tap until initialized"),
                }
            }
            RelayMessage::MarkInitialized(ack) => {
                let flushed = lock(&self.lifecycle).mark_initialized();
                match flushed {
                    Ok(held) => {
                        info!(flushed = held.is_some(), "Event relay initialized");
                        if let Some(event) = held {
                            self.emit(event);
                        }
                    }
                    Err(e) => debug!("{}", e),
                }
                let _ = ack.send(());
            }
        }
    }

    fn emit(&self, event: OutboundEvent) {
        if self.outbound.send(event).is_err() {
            debug!("Outbound channel closed, dropping event");
        }
    }
}

impl RelayHandle {
    /// Queue an interaction for the relay
    pub fn deliver(&self, interaction: Interaction) -> Result<(), RelayClosed> {
        self.inbound
            .send(RelayMessage::Interaction(interaction))
            .map_err(|_| RelayClosed)
    }

    /// Mark the host initialized and wait until any held event is emitted
    pub async fn mark_initialized(&self) -> Result<(), RelayClosed> {
        let (ack, done) = oneshot::channel();
        self.inbound
            .send(RelayMessage::MarkInitialized(ack))
            .map_err(|_| RelayClosed)?;
        done.await.map_err(|_| RelayClosed)
    }

    pub fn launch_details(&self) -> LaunchDetails {
        lock(&self.lifecycle).launch_details()
    }

    pub fn state(&self) -> LifecycleState {
        lock(&self.lifecycle).state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(payload: &str) -> Interaction {
        Interaction::Default {
            payload: Some(payload.to_string()),
        }
    }

    #[tokio::test]
    async fn held_tap_is_flushed_before_ack() {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (relay, handle) = relay_channel(out_tx);
        relay.spawn();

        handle.deliver(tap("p1")).unwrap();
        handle.mark_initialized().await.unwrap();

        assert_eq!(
            out_rx.try_recv().unwrap(),
            OutboundEvent::SelectNotification(Some("p1".into()))
        );
        assert!(out_rx.try_recv().is_err());
        assert_eq!(handle.state(), LifecycleState::Initialized);
        assert!(handle.launch_details().notification_launched_app);
    }

    #[tokio::test]
    async fn second_initialize_is_acked_without_effect() {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (relay, handle) = relay_channel(out_tx);
        relay.spawn();

        handle.mark_initialized().await.unwrap();
        handle.mark_initialized().await.unwrap();
        assert!(out_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_relay_reports_error() {
        let (out_tx, _out_rx) = mpsc::unbounded_channel();
        let (relay, handle) = relay_channel(out_tx);
        drop(relay);

        assert_eq!(handle.deliver(tap("p")), Err(RelayClosed));
        assert_eq!(handle.mark_initialized().await, Err(RelayClosed));
    }
}
