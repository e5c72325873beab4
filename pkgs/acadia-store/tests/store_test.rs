//! Conversation store tests
//!
//! Covers the unread-count invariant, message ordering, read-state
//! idempotence, and duplicate prevention.

use chrono::{DateTime, Duration, TimeZone, Utc};

use acadia_store::{
    ConversationStore, MessageBody, MessageDraft, SenderType, StoreError, StudentProfile,
};

fn profile(name: &str) -> StudentProfile {
    StudentProfile {
        name: name.to_string(),
        email: format!("{}@students.acadia.test", name.to_lowercase()),
        avatar_url: None,
    }
}

fn text(sender: SenderType, text: &str, timestamp: DateTime<Utc>) -> MessageDraft {
    MessageDraft {
        sender,
        body: MessageBody::Text {
            text: text.to_string(),
        },
        timestamp,
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

#[test]
fn test_create_conversation_starts_empty() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    assert_eq!(conv.student_id, "s-1");
    assert_eq!(conv.unread_count, 0);
    assert!(conv.last_message.is_none());
    assert!(!conv.is_online);
    assert_eq!(store.get_messages(&conv.id).unwrap(), vec![]);
}

#[test]
fn test_duplicate_student_rejected() {
    let store = ConversationStore::new();
    store.create_conversation("s-1", profile("Alice")).unwrap();

    let err = store
        .create_conversation("s-1", profile("Alice"))
        .unwrap_err();

    assert_eq!(err, StoreError::DuplicateConversation("s-1".to_string()));
    assert_eq!(store.conversations_count(), 1);
}

#[test]
fn test_append_to_unknown_conversation() {
    let store = ConversationStore::new();
    let err = store
        .append_message("missing", text(SenderType::Academy, "hi", t0()))
        .unwrap_err();

    assert_eq!(
        err,
        StoreError::ConversationNotFound("missing".to_string())
    );
}

#[test]
fn test_student_message_increments_unread() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    store
        .append_message(&conv.id, text(SenderType::Student, "hi?", t0()))
        .unwrap();
    store
        .append_message(
            &conv.id,
            text(SenderType::Student, "anyone?", t0() + Duration::seconds(5)),
        )
        .unwrap();

    let conv = store.get_conversation(&conv.id).unwrap();
    assert_eq!(conv.unread_count, 2);
}

#[test]
fn test_academy_message_does_not_increment_unread() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    store
        .append_message(&conv.id, text(SenderType::Academy, "welcome", t0()))
        .unwrap();

    let conv = store.get_conversation(&conv.id).unwrap();
    assert_eq!(conv.unread_count, 0);
}

#[test]
fn test_last_message_cache_follows_appends() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    store
        .append_message(&conv.id, text(SenderType::Student, "first", t0()))
        .unwrap();
    let second = store
        .append_message(
            &conv.id,
            text(SenderType::Academy, "second", t0() + Duration::seconds(1)),
        )
        .unwrap();

    let conv = store.get_conversation(&conv.id).unwrap();
    assert_eq!(conv.last_message, Some(second.clone()));
    assert_eq!(conv.updated_at, second.timestamp);
}

#[test]
fn test_message_order_is_timestamp_then_insertion() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    // Three drafts carrying the same timestamp must come back in
    // insertion order.
    for body in ["a", "b", "c"] {
        store
            .append_message(&conv.id, text(SenderType::Student, body, t0()))
            .unwrap();
    }

    let messages = store.get_messages(&conv.id).unwrap();
    let bodies: Vec<&str> = messages
        .iter()
        .filter_map(|m| m.body.as_text())
        .collect();
    assert_eq!(bodies, vec!["a", "b", "c"]);
    assert_eq!(
        messages.iter().map(|m| m.seq).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn test_backwards_timestamp_is_clamped() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    store
        .append_message(&conv.id, text(SenderType::Student, "late", t0()))
        .unwrap();
    let clamped = store
        .append_message(
            &conv.id,
            text(SenderType::Student, "early", t0() - Duration::seconds(30)),
        )
        .unwrap();

    assert_eq!(clamped.timestamp, t0());

    let messages = store.get_messages(&conv.id).unwrap();
    assert!(messages.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_mark_read_flips_all_and_resets_count() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    store
        .append_message(&conv.id, text(SenderType::Student, "one", t0()))
        .unwrap();
    store
        .append_message(
            &conv.id,
            text(SenderType::Student, "two", t0() + Duration::seconds(1)),
        )
        .unwrap();

    let newly_read = store.mark_conversation_read(&conv.id).unwrap();
    assert_eq!(newly_read, 2);

    let conv = store.get_conversation(&conv.id).unwrap();
    assert_eq!(conv.unread_count, 0);
    assert!(store
        .get_messages(&conv.id)
        .unwrap()
        .iter()
        .all(|m| m.is_read));
    // The cached last message reflects the flip too.
    assert!(conv.last_message.unwrap().is_read);
}

#[test]
fn test_mark_read_is_idempotent() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    store
        .append_message(&conv.id, text(SenderType::Student, "hello", t0()))
        .unwrap();

    assert_eq!(store.mark_conversation_read(&conv.id).unwrap(), 1);
    let after_first = store.get_conversation(&conv.id).unwrap();

    assert_eq!(store.mark_conversation_read(&conv.id).unwrap(), 0);
    let after_second = store.get_conversation(&conv.id).unwrap();

    assert_eq!(after_first, after_second);
}

#[test]
fn test_unread_invariant_over_mixed_traffic() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    let mut ts = t0();
    let traffic = [
        SenderType::Student,
        SenderType::Academy,
        SenderType::Student,
        SenderType::Student,
        SenderType::Academy,
    ];
    for sender in traffic {
        store
            .append_message(&conv.id, text(sender, "msg", ts))
            .unwrap();
        ts += Duration::seconds(1);
    }

    let conv = store.get_conversation(&conv.id).unwrap();
    let recount = store
        .get_messages(&conv.id)
        .unwrap()
        .iter()
        .filter(|m| m.sender == SenderType::Student && !m.is_read)
        .count() as u32;
    assert_eq!(conv.unread_count, 3);
    assert_eq!(conv.unread_count, recount);

    store.mark_conversation_read(&conv.id).unwrap();
    store
        .append_message(&conv.id, text(SenderType::Student, "more", ts))
        .unwrap();

    let conv = store.get_conversation(&conv.id).unwrap();
    assert_eq!(conv.unread_count, 1);
}

#[test]
fn test_list_orders_most_recently_updated_first() {
    let store = ConversationStore::new();
    let a = store.create_conversation("s-1", profile("Alice")).unwrap();
    let b = store.create_conversation("s-2", profile("Bob")).unwrap();

    store
        .append_message(&a.id, text(SenderType::Student, "old", t0()))
        .unwrap();
    store
        .append_message(
            &b.id,
            text(SenderType::Student, "new", t0() + Duration::minutes(5)),
        )
        .unwrap();

    let listed = store.list_conversations();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, b.id);
    assert_eq!(listed[1].id, a.id);
}

#[test]
fn test_presence_does_not_reorder_list() {
    let store = ConversationStore::new();
    let a = store.create_conversation("s-1", profile("Alice")).unwrap();
    let b = store.create_conversation("s-2", profile("Bob")).unwrap();

    store
        .append_message(&a.id, text(SenderType::Student, "older", t0()))
        .unwrap();
    store
        .append_message(
            &b.id,
            text(SenderType::Student, "latest", t0() + Duration::minutes(1)),
        )
        .unwrap();
    let before = store.get_conversation(&a.id).unwrap().updated_at;

    let updated = store.set_presence("s-1", true, t0()).unwrap();
    assert!(updated.is_online);
    assert_eq!(updated.last_seen, Some(t0()));
    assert_eq!(store.get_conversation(&a.id).unwrap().updated_at, before);
    assert_eq!(store.list_conversations()[0].id, b.id);
}

#[test]
fn test_presence_for_unknown_student() {
    let store = ConversationStore::new();
    let err = store.set_presence("ghost", true, t0()).unwrap_err();
    assert_eq!(err, StoreError::ConversationNotFound("ghost".to_string()));
}

#[test]
fn test_conversation_lookup_by_student() {
    let store = ConversationStore::new();
    let conv = store.create_conversation("s-1", profile("Alice")).unwrap();

    assert_eq!(
        store.conversation_for_student("s-1").map(|c| c.id),
        Some(conv.id)
    );
    assert!(store.conversation_for_student("s-2").is_none());
}
