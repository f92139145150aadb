// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Background notification delivery.
//!
//! Handlers enqueue [`DeliveryJob`]s on a [`ChannelQueue`] and return
//! immediately. A single worker task drains the channel, holding the
//! persistence lock only while reading or updating notification records.

use std::sync::Arc;

use freight_desk_api::{
    DeliveryJob, DeliveryQueue, NotificationTransport, PendingDelivery, prepare_delivery,
    record_delivery_outcome,
};
use freight_desk_persistence::Persistence;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, warn};

/// Delivery queue backed by an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    tx: mpsc::UnboundedSender<DeliveryJob>,
}

impl ChannelQueue {
    /// Creates a queue and the receiver the worker drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DeliveryJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DeliveryQueue for ChannelQueue {
    fn enqueue(&self, job: DeliveryJob) {
        if let Err(e) = self.tx.send(job) {
            warn!(job = ?e.0, "Delivery worker is gone, dropping job");
        }
    }
}

/// Drains `rx` until every sender is dropped.
pub async fn run_delivery_worker<T>(
    persistence: Arc<Mutex<Persistence>>,
    transport: T,
    mut rx: mpsc::UnboundedReceiver<DeliveryJob>,
) where
    T: NotificationTransport,
{
    while let Some(job) = rx.recv().await {
        match job {
            DeliveryJob::Stored { notification_id } => {
                let pending = {
                    let mut persistence = persistence.lock().await;
                    prepare_delivery(&mut persistence, notification_id)
                };
                match pending {
                    Ok(PendingDelivery::Outbound(message)) => {
                        let outcome = transport.send(&message);
                        let mut persistence = persistence.lock().await;
                        if let Err(e) =
                            record_delivery_outcome(&mut persistence, notification_id, &outcome)
                        {
                            error!(notification_id, error = %e, "Failed to record delivery outcome");
                        }
                    }
                    Ok(PendingDelivery::InApp | PendingDelivery::Skip) => {
                        debug!(notification_id, "Nothing to send");
                    }
                    Err(e) => {
                        error!(notification_id, error = %e, "Failed to load notification");
                    }
                }
            }
            DeliveryJob::Direct(message) => {
                if let Err(e) = transport.send(&message) {
                    warn!(channel = message.channel.as_str(), error = %e, "Direct delivery failed");
                }
            }
        }
    }
    debug!("Delivery worker stopped");
}
