// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Mutex;

use freight_desk_domain::{NotificationChannel, NotificationStatus};
use serde_json::json;

use super::helpers::{
    CSE_EMAIL, PRICING_EMAIL, RecordingQueue, SALES_EMAIL, actor, demo_user, seeded_persistence,
};
use crate::handlers::notifications::{
    list_notifications, mark_all_notifications_read, mark_notification_read,
};
use crate::{
    ApiError, DeliveryJob, Notice, NotificationTransport, OutboundMessage, PendingDelivery, Role,
    TransportError, deliver, dispatch, notify_role, prepare_delivery,
};

/// Records sent messages; fails every send when `reject` is set.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
    reject: bool,
}

impl NotificationTransport for RecordingTransport {
    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if self.reject {
            return Err(TransportError::Rejected {
                channel: message.channel.as_str(),
                reason: String::from("mailbox full"),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

fn notice() -> Notice {
    Notice::new(
        "Rate Request Response Received",
        String::from("Pricing answered RR17000001"),
        Some(json!({ "rateRequestId": 1 })),
    )
}

fn stored_ids(jobs: &[DeliveryJob]) -> Vec<i64> {
    jobs.iter()
        .filter_map(|job| match job {
            DeliveryJob::Stored { notification_id } => Some(*notification_id),
            DeliveryJob::Direct(_) => None,
        })
        .collect()
}

#[test]
fn test_dispatch_creates_system_and_email_records() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let sales = demo_user(&mut persistence, SALES_EMAIL);

    let ids = dispatch(&mut persistence, &queue, &sales, &notice()).unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(stored_ids(&queue.jobs()), ids);
    let stored = persistence.list_notifications_for_user(sales.user_id).unwrap();
    let mut channels: Vec<NotificationChannel> = stored.iter().map(|n| n.channel).collect();
    channels.sort_by_key(|c| c.as_str());
    assert_eq!(
        channels,
        vec![NotificationChannel::Email, NotificationChannel::System]
    );
    assert!(stored.iter().all(|n| n.status == NotificationStatus::Pending));
}

#[test]
fn test_sms_only_when_asked_and_phone_known() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let mut sales = demo_user(&mut persistence, SALES_EMAIL);

    let ids = dispatch(&mut persistence, &queue, &sales, &notice().with_sms()).unwrap();
    assert_eq!(ids.len(), 3);

    sales.phone = None;
    let ids = dispatch(&mut persistence, &queue, &sales, &notice().with_sms()).unwrap();
    assert_eq!(ids.len(), 2);
}

#[test]
fn test_notify_role_reaches_each_holder() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();

    let notified = notify_role(&mut persistence, &queue, Role::Pricing, &notice()).unwrap();

    assert_eq!(notified, 1);
    let pricing = demo_user(&mut persistence, PRICING_EMAIL);
    assert_eq!(
        persistence
            .list_system_notifications(pricing.user_id, None)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_delivery_marks_records_sent() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let transport = RecordingTransport::default();
    let sales = demo_user(&mut persistence, SALES_EMAIL);
    dispatch(&mut persistence, &queue, &sales, &notice().with_sms()).unwrap();

    for job in queue.jobs() {
        deliver(&mut persistence, &transport, &job).unwrap();
    }

    let sent = transport.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().any(|m| m.address == SALES_EMAIL));
    assert!(
        sent.iter()
            .any(|m| m.channel == NotificationChannel::Sms && Some(&m.address) == sales.phone.as_ref())
    );
    let stored = persistence.list_notifications_for_user(sales.user_id).unwrap();
    assert!(stored.iter().all(|n| n.status == NotificationStatus::Sent));
    assert!(stored.iter().all(|n| n.sent_at.is_some()));
}

#[test]
fn test_transport_failure_marks_record_failed() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let transport = RecordingTransport {
        reject: true,
        ..RecordingTransport::default()
    };
    let sales = demo_user(&mut persistence, SALES_EMAIL);
    dispatch(&mut persistence, &queue, &sales, &notice()).unwrap();

    for job in queue.jobs() {
        deliver(&mut persistence, &transport, &job).unwrap();
    }

    let stored = persistence.list_notifications_for_user(sales.user_id).unwrap();
    let email = stored
        .iter()
        .find(|n| n.channel == NotificationChannel::Email)
        .unwrap();
    assert_eq!(email.status, NotificationStatus::Failed);
    let in_app = stored
        .iter()
        .find(|n| n.channel == NotificationChannel::System)
        .unwrap();
    assert_eq!(in_app.status, NotificationStatus::Sent);
}

#[test]
fn test_delivered_record_is_skipped_on_redelivery() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let transport = RecordingTransport::default();
    let sales = demo_user(&mut persistence, SALES_EMAIL);
    let ids = dispatch(&mut persistence, &queue, &sales, &notice()).unwrap();

    assert_eq!(
        prepare_delivery(&mut persistence, ids[0]).unwrap(),
        PendingDelivery::InApp
    );
    for job in queue.jobs() {
        deliver(&mut persistence, &transport, &job).unwrap();
        deliver(&mut persistence, &transport, &job).unwrap();
    }

    assert_eq!(transport.sent.lock().unwrap().len(), 1);
    assert_eq!(
        prepare_delivery(&mut persistence, 9_999).unwrap(),
        PendingDelivery::Skip
    );
}

#[test]
fn test_inbox_read_tracking() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let sales_user = demo_user(&mut persistence, SALES_EMAIL);
    dispatch(&mut persistence, &queue, &sales_user, &notice()).unwrap();
    dispatch(&mut persistence, &queue, &sales_user, &notice()).unwrap();
    let sales = actor(&mut persistence, SALES_EMAIL);

    let inbox = list_notifications(&mut persistence, &sales).unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|n| n.channel == NotificationChannel::System));

    let read = mark_notification_read(&mut persistence, &sales, inbox[0].notification_id).unwrap();
    assert!(read.read_at.is_some());

    // One in-app and two email records remain unread
    let all = mark_all_notifications_read(&mut persistence, &sales).unwrap();
    assert_eq!(all.marked, 3);
}

#[test]
fn test_cannot_read_someone_elses_notification() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let sales_user = demo_user(&mut persistence, SALES_EMAIL);
    let ids = dispatch(&mut persistence, &queue, &sales_user, &notice()).unwrap();
    let cse = actor(&mut persistence, CSE_EMAIL);

    let err = mark_notification_read(&mut persistence, &cse, ids[0]).unwrap_err();

    assert_eq!(
        err,
        ApiError::ResourceNotFound {
            resource_type: String::from("Notification"),
            message: String::from("Notification not found"),
        }
    );
}
