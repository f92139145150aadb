// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for users, sessions and password reset codes.

use crate::tests::{actor_for, create_test_cause, demo_user, seeded_persistence};
use crate::{
    AuditLogFilter, NewUser, Persistence, PersistenceError, format_sql_timestamp, verify_password,
};
use freight_desk_audit::{Action, AuditEvent, StateSnapshot};
use freight_desk_domain::UserStatus;
use time::{Duration, OffsetDateTime};

fn in_minutes(minutes: i64) -> String {
    format_sql_timestamp(OffsetDateTime::now_utc() + Duration::minutes(minutes)).unwrap()
}

fn session_event(name: &str, user: &crate::UserData) -> AuditEvent {
    AuditEvent::new_global(
        actor_for(user),
        create_test_cause(),
        Action::new(name.to_string(), None),
        StateSnapshot::new(String::from("session=none")),
        StateSnapshot::new(String::from("session=none")),
    )
}

#[test]
fn test_email_lookup_is_case_insensitive() {
    let mut persistence = seeded_persistence();

    let user = persistence
        .get_user_by_email("  Sales@Freight.COM ")
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "sales@freight.com");
    assert_eq!(user.role, "SALES");
}

#[test]
fn test_passwords_are_stored_hashed() {
    let mut persistence = seeded_persistence();
    let user = demo_user(&mut persistence, "admin@freight.com");

    assert_ne!(user.password_hash, "admin123");
    assert!(verify_password("admin123", &user.password_hash).unwrap());
    assert!(!verify_password("wrong-password", &user.password_hash).unwrap());
}

#[test]
fn test_duplicate_email_is_rejected() {
    let mut persistence = seeded_persistence();

    let result = persistence.create_user(&NewUser {
        email: String::from("ADMIN@freight.com"),
        name: String::from("Second Admin"),
        phone: None,
        role: String::from("ADMIN"),
        status: UserStatus::Active,
        sbu_id: None,
        password: String::from("another123"),
    });
    assert!(result.is_err());
}

#[test]
fn test_session_lifecycle() {
    let mut persistence = seeded_persistence();
    let user = demo_user(&mut persistence, "cse@freight.com");

    let session_id = persistence
        .create_session("token-abc", user.user_id, "ACCESS", &in_minutes(60))
        .unwrap();
    let session = persistence
        .get_session_by_token("token-abc")
        .unwrap()
        .unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.token_kind, "ACCESS");

    persistence.touch_session(session_id).unwrap();
    persistence.delete_session("token-abc").unwrap();
    assert!(persistence.get_session_by_token("token-abc").unwrap().is_none());
}

#[test]
fn test_expired_sessions_are_purged() {
    let mut persistence = seeded_persistence();
    let user = demo_user(&mut persistence, "cse@freight.com");

    persistence
        .create_session("stale", user.user_id, "ACCESS", &in_minutes(-5))
        .unwrap();
    persistence
        .create_session("fresh", user.user_id, "REFRESH", &in_minutes(5))
        .unwrap();

    assert_eq!(persistence.delete_expired_sessions().unwrap(), 1);
    assert!(persistence.get_session_by_token("stale").unwrap().is_none());
    assert!(persistence.get_session_by_token("fresh").unwrap().is_some());
}

#[test]
fn test_login_and_logout_are_audited() {
    let mut persistence = seeded_persistence();
    let user = demo_user(&mut persistence, "sales@freight.com");

    persistence
        .record_login(user.user_id, &session_event("LOGIN", &user))
        .unwrap();
    let reloaded = persistence.get_user_by_id(user.user_id).unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());

    persistence
        .create_session("a", user.user_id, "ACCESS", &in_minutes(60))
        .unwrap();
    persistence
        .create_session("b", user.user_id, "REFRESH", &in_minutes(60))
        .unwrap();
    let revoked = persistence
        .record_logout(user.user_id, &session_event("LOGOUT", &user))
        .unwrap();
    assert_eq!(revoked, 2);

    let entries = persistence
        .query_audit_log(&AuditLogFilter {
            actor_user_id: Some(user.user_id),
            ..AuditLogFilter::default()
        })
        .unwrap();
    let actions: Vec<&str> = entries.iter().map(|entry| entry.action.as_str()).collect();
    assert_eq!(actions, vec!["LOGOUT", "LOGIN"]);
}

#[test]
fn test_replacing_a_reset_code_invalidates_the_previous_one() {
    let mut persistence = seeded_persistence();
    let user = demo_user(&mut persistence, "pricing@freight.com");

    persistence
        .replace_otp(user.user_id, "hash-one", &in_minutes(10))
        .unwrap();
    let second = persistence
        .replace_otp(user.user_id, "hash-two", &in_minutes(10))
        .unwrap();

    let live = persistence.live_otps_for_user(user.user_id).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].otp_id, second);
}

#[test]
fn test_expired_reset_codes_are_not_live() {
    let mut persistence = seeded_persistence();
    let user = demo_user(&mut persistence, "pricing@freight.com");

    persistence
        .replace_otp(user.user_id, "hash", &in_minutes(-1))
        .unwrap();
    assert!(persistence.live_otps_for_user(user.user_id).unwrap().is_empty());
}

#[test]
fn test_password_reset_consumes_code_and_revokes_sessions() {
    let mut persistence: Persistence = seeded_persistence();
    let user = demo_user(&mut persistence, "mgmt@freight.com");

    let otp_id = persistence
        .replace_otp(user.user_id, "hash", &in_minutes(10))
        .unwrap();
    persistence
        .create_session("mgmt-token", user.user_id, "ACCESS", &in_minutes(60))
        .unwrap();

    let event = session_event("PASSWORD_RESET", &user);
    persistence
        .complete_password_reset(user.user_id, otp_id, "newSecret9", &event)
        .unwrap();

    let reloaded = persistence.get_user_by_id(user.user_id).unwrap().unwrap();
    assert!(verify_password("newSecret9", &reloaded.password_hash).unwrap());
    assert!(persistence.get_session_by_token("mgmt-token").unwrap().is_none());
    assert!(persistence.live_otps_for_user(user.user_id).unwrap().is_empty());

    // A consumed code cannot be used twice
    let replay = persistence.complete_password_reset(user.user_id, otp_id, "other999x", &event);
    assert!(matches!(replay, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_hash_cost_is_configurable_and_bounded() {
    let persistence = Persistence::new_in_memory()
        .unwrap()
        .with_hash_cost(crate::MIN_HASH_COST)
        .unwrap();

    let hash: String = persistence.hash_secret("482913").unwrap();
    assert!(hash.starts_with("$2b$04$"));
    assert!(verify_password("482913", &hash).unwrap());

    let too_cheap = Persistence::new_in_memory().unwrap().with_hash_cost(3);
    assert!(matches!(
        too_cheap,
        Err(PersistenceError::InitializationError(_))
    ));
}

#[test]
fn test_seeded_users_are_hashed_at_the_configured_cost() {
    let mut persistence = seeded_persistence();

    let sales = demo_user(&mut persistence, "sales@freight.com");

    assert!(sales.password_hash.starts_with("$2b$04$"));
    assert!(verify_password("sales123", &sales.password_hash).unwrap());
}
