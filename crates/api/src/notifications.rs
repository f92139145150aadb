// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification dispatch and delivery.
//!
//! Dispatch runs after a workflow change has committed. It persists one
//! `PENDING` record per channel and hands a delivery job to a queue; the
//! delivery side resolves the recipient's address, sends through a
//! transport and records `SENT` or `FAILED`. Failures here never undo the
//! change that triggered the notice.

use freight_desk_domain::{NotificationChannel, NotificationStatus};
use freight_desk_persistence::{
    NewNotification, NotificationData, Persistence, PersistenceError, UserData, UserDirectory,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::Role;
use crate::error::ApiError;

/// A message to be sent to one or more users.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// The subject line.
    pub subject: String,
    /// The message body.
    pub body: String,
    /// Structured data for clients (record IDs, reference numbers).
    pub meta: Option<Value>,
    /// Whether the notice should also go out by SMS.
    pub sms: bool,
}

impl Notice {
    /// Creates a notice delivered in-app and by email.
    #[must_use]
    pub fn new(subject: &str, body: String, meta: Option<Value>) -> Self {
        Self {
            subject: subject.to_string(),
            body,
            meta,
            sms: false,
        }
    }

    /// Also deliver the notice by SMS to recipients with a phone number.
    #[must_use]
    pub const fn with_sms(mut self) -> Self {
        self.sms = true;
        self
    }
}

/// A message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The channel to send on (`EMAIL` or `SMS`).
    pub channel: NotificationChannel,
    /// The email address or phone number.
    pub address: String,
    /// The subject line.
    pub subject: String,
    /// The message body.
    pub body: String,
}

/// Work handed to the delivery worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryJob {
    /// Deliver a persisted notification record.
    Stored {
        /// The notification to deliver.
        notification_id: i64,
    },
    /// Send a message that is never persisted (one-time codes).
    Direct(OutboundMessage),
}

/// Accepts delivery jobs for asynchronous processing.
pub trait DeliveryQueue: Send + Sync {
    /// Queues a job. Must not block.
    fn enqueue(&self, job: DeliveryJob);
}

/// Transport failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The provider refused the message.
    #[error("Transport rejected {channel} message: {reason}")]
    Rejected {
        channel: &'static str,
        reason: String,
    },
    /// The transport does not handle this channel.
    #[error("No transport configured for {channel}")]
    UnsupportedChannel { channel: &'static str },
}

/// Sends outbound messages over an external channel.
pub trait NotificationTransport: Send + Sync {
    /// Sends one message.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the message could not be sent.
    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// A transport that writes messages to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl NotificationTransport for LogTransport {
    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if message.channel == NotificationChannel::System {
            return Err(TransportError::UnsupportedChannel {
                channel: message.channel.as_str(),
            });
        }
        info!(
            channel = message.channel.as_str(),
            address = %message.address,
            subject = %message.subject,
            "Delivered notification"
        );
        Ok(())
    }
}

/// What the worker must do for a stored notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelivery {
    /// In-app notification, already visible; nothing to send.
    InApp,
    /// Send this message, then record the outcome.
    Outbound(OutboundMessage),
    /// The record is gone or no longer pending.
    Skip,
}

/// Persists and queues a notice for one user.
///
/// Creates a `SYSTEM` and an `EMAIL` record, plus an `SMS` record when the
/// notice asks for it and the user has a phone number.
///
/// # Returns
///
/// The IDs of the created notification records.
///
/// # Errors
///
/// Returns an error if a record cannot be stored.
pub fn dispatch(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    recipient: &UserData,
    notice: &Notice,
) -> Result<Vec<i64>, ApiError> {
    let mut channels: Vec<NotificationChannel> =
        vec![NotificationChannel::System, NotificationChannel::Email];
    if notice.sms && recipient.phone.as_deref().is_some_and(|p| !p.trim().is_empty()) {
        channels.push(NotificationChannel::Sms);
    }

    let mut ids: Vec<i64> = Vec::with_capacity(channels.len());
    for channel in channels {
        let notification_id: i64 = persistence.create_notification(&NewNotification {
            user_id: recipient.user_id,
            channel,
            subject: notice.subject.clone(),
            body: notice.body.clone(),
            meta: notice.meta.clone(),
        })?;
        queue.enqueue(DeliveryJob::Stored { notification_id });
        ids.push(notification_id);
    }

    debug!(
        user_id = recipient.user_id,
        subject = %notice.subject,
        records = ids.len(),
        "Dispatched notification"
    );
    Ok(ids)
}

/// Resolves the active users holding a role.
///
/// # Errors
///
/// Returns an error if the directory lookup fails.
pub fn recipients_for_role<D: UserDirectory + ?Sized>(
    directory: &mut D,
    role: Role,
) -> Result<Vec<UserData>, ApiError> {
    Ok(directory.users_with_role(role.as_str())?)
}

/// Dispatches a notice to every listed user.
///
/// # Returns
///
/// The number of users notified.
///
/// # Errors
///
/// Returns the first dispatch error; earlier recipients keep their records.
pub fn notify_users(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    recipients: &[UserData],
    notice: &Notice,
) -> Result<usize, ApiError> {
    for recipient in recipients {
        dispatch(persistence, queue, recipient, notice)?;
    }
    Ok(recipients.len())
}

/// Dispatches a notice to every active user with `role`.
///
/// # Errors
///
/// Returns an error if the lookup or a dispatch fails.
pub fn notify_role(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    role: Role,
    notice: &Notice,
) -> Result<usize, ApiError> {
    let recipients: Vec<UserData> = recipients_for_role(persistence, role)?;
    notify_users(persistence, queue, &recipients, notice)
}

/// Dispatches a notice to one user by ID.
///
/// # Errors
///
/// Returns an error if the lookup or the dispatch fails.
pub fn notify_user(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    user_id: i64,
    notice: &Notice,
) -> Result<usize, ApiError> {
    match persistence.find_user(user_id)? {
        Some(recipient) => {
            dispatch(persistence, queue, &recipient, notice)?;
            Ok(1)
        }
        None => Ok(0),
    }
}

/// Logs a failed post-commit dispatch without failing the request.
pub fn log_dispatch_outcome(subject: &str, outcome: &Result<usize, ApiError>) {
    match outcome {
        Ok(recipients) => debug!(subject, recipients, "Notification fan-out complete"),
        Err(err) => warn!(subject, error = %err, "Notification dispatch failed"),
    }
}

/// Loads a stored notification and works out what to send.
///
/// `SYSTEM` notifications are marked `SENT` here.
///
/// # Errors
///
/// Returns an error if the record or its recipient cannot be read.
pub fn prepare_delivery(
    persistence: &mut Persistence,
    notification_id: i64,
) -> Result<PendingDelivery, ApiError> {
    let Some(notification) = persistence.get_notification(notification_id)? else {
        return Ok(PendingDelivery::Skip);
    };
    if notification.status != NotificationStatus::Pending {
        return Ok(PendingDelivery::Skip);
    }

    if notification.channel == NotificationChannel::System {
        persistence.set_notification_status(notification_id, NotificationStatus::Sent)?;
        return Ok(PendingDelivery::InApp);
    }

    let recipient: Option<UserData> = persistence.find_user(notification.user_id)?;
    let address: Option<String> = recipient.and_then(|user| match notification.channel {
        NotificationChannel::Sms => user.phone,
        _ => Some(user.email),
    });

    let Some(address) = address else {
        warn!(
            notification_id,
            channel = notification.channel.as_str(),
            "No address for notification recipient"
        );
        persistence.set_notification_status(notification_id, NotificationStatus::Failed)?;
        return Ok(PendingDelivery::Skip);
    };

    Ok(PendingDelivery::Outbound(outbound_for(&notification, address)))
}

fn outbound_for(notification: &NotificationData, address: String) -> OutboundMessage {
    OutboundMessage {
        channel: notification.channel,
        address,
        subject: notification.subject.clone(),
        body: notification.body.clone(),
    }
}

/// Records the result of sending a stored notification.
///
/// # Errors
///
/// Returns an error if the status cannot be written.
pub fn record_delivery_outcome(
    persistence: &mut Persistence,
    notification_id: i64,
    outcome: &Result<(), TransportError>,
) -> Result<(), PersistenceError> {
    let status: NotificationStatus = match outcome {
        Ok(()) => NotificationStatus::Sent,
        Err(err) => {
            warn!(notification_id, error = %err, "Notification delivery failed");
            NotificationStatus::Failed
        }
    };
    persistence.set_notification_status(notification_id, status)
}

/// Processes one delivery job to completion on the calling thread.
///
/// # Errors
///
/// Returns an error if the notification status cannot be read or written.
/// Transport failures are recorded, not returned.
pub fn deliver(
    persistence: &mut Persistence,
    transport: &dyn NotificationTransport,
    job: &DeliveryJob,
) -> Result<(), ApiError> {
    match job {
        DeliveryJob::Stored { notification_id } => {
            if let PendingDelivery::Outbound(message) =
                prepare_delivery(persistence, *notification_id)?
            {
                let outcome: Result<(), TransportError> = transport.send(&message);
                record_delivery_outcome(persistence, *notification_id, &outcome)?;
            }
            Ok(())
        }
        DeliveryJob::Direct(message) => {
            if let Err(err) = transport.send(message) {
                warn!(channel = message.channel.as_str(), error = %err, "Direct message failed");
            }
            Ok(())
        }
    }
}
