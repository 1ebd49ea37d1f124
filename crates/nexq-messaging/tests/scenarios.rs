//! End-to-end session scenarios
//!
//! Drives a session seeded with the dashboard's trading roster through
//! selection, sends and simulated replies using a manual clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use nexq_messaging::{
    Attachment, Contact, ContactId, Direction, ManualClock, MessagingError, MessagingSession,
    NewMessage, RecordingNotifier, SessionEvent, SessionState, Snapshot, TradeRole,
    Unimplemented, ValidationError,
};

const SRI: ContactId = ContactId(1);
const VIJAY: ContactId = ContactId(2);
const RAVI: ContactId = ContactId(3);

const REPLY_DELAY: Duration = Duration::from_millis(5000);

fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, day, h, m, 0).unwrap()
}

/// Roster and history matching the dashboard's demo data
fn trading_snapshot() -> Snapshot {
    Snapshot::new(vec![
        Contact::new(SRI, "Sri Traders", TradeRole::Distributor)
            .with_avatar("/placeholder.svg")
            .with_last_message("Need 200 units of Smartphone X1.", at(10, 16, 0), 2),
        Contact::new(VIJAY, "Vijay Wholesalers", TradeRole::Wholesaler)
            .with_avatar("/placeholder.svg")
            .with_last_message("MOQ for Charger C1?", at(10, 15, 30), 1),
        Contact::new(RAVI, "Ravi Distributors", TradeRole::Distributor)
            .with_avatar("/placeholder.svg")
            .with_last_message("Order confirmed.", at(9, 12, 0), 0),
    ])
    .with_conversation(
        SRI,
        vec![
            NewMessage::inbound(
                "Sri Traders",
                "Hi ABC Electronics, can you send 500 units of Smartphone X1?",
                at(10, 14, 30),
            ),
            NewMessage::outbound(
                "ABC Electronics",
                "MOQ is 200, confirming 500 units. ETA 12-Apr-2025.",
                at(10, 14, 35),
            )
            .with_attachment(Attachment::qr("Order #123, 500 units")),
            NewMessage::inbound("Sri Traders", "Thanks! Attaching specs.", at(10, 15, 0))
                .with_attachment(Attachment::image("/placeholder.svg", "Smartphone X1.jpg")),
            NewMessage::inbound("Sri Traders", "Any discounts for 1000 units?", at(10, 16, 0))
                .marked_new(),
        ],
    )
    .with_conversation(
        VIJAY,
        vec![
            NewMessage::inbound(
                "Vijay Wholesalers",
                "Hello ABC Electronics. What is the MOQ for Charger C1?",
                at(10, 15, 30),
            )
            .marked_new(),
        ],
    )
    .with_conversation(
        RAVI,
        vec![NewMessage::inbound("Ravi Distributors", "Order confirmed.", at(9, 12, 0))],
    )
}

struct Harness {
    session: MessagingSession,
    clock: Arc<ManualClock>,
    notices: RecordingNotifier,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::starting_at(at(10, 17, 0)));
    let notices = RecordingNotifier::new();
    let session = MessagingSession::builder(trading_snapshot())
        .clock(clock.clone())
        .notifier(Arc::new(notices.clone()))
        .build()
        .expect("seed snapshot is valid");
    Harness {
        session,
        clock,
        notices,
    }
}

#[test]
fn test_list_contacts_in_roster_order() {
    let h = harness();
    let names: Vec<_> = h
        .session
        .list_contacts()
        .iter()
        .map(|c| c.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Sri Traders", "Vijay Wholesalers", "Ravi Distributors"]);
    assert_eq!(h.session.unread_total(), 3);
}

#[test]
fn test_select_clears_unread_for_every_contact() {
    let mut h = harness();
    for id in [SRI, VIJAY, RAVI] {
        h.session.select_contact(id).unwrap();
        assert_eq!(h.session.contact(id).unwrap().unread_count, 0);
    }
    assert_eq!(h.session.unread_total(), 0);
}

#[test]
fn test_scenario_a_select_keeps_new_highlight() {
    let mut h = harness();
    assert_eq!(h.session.contact(SRI).unwrap().unread_count, 2);

    let timeline = h.session.select_contact(SRI).unwrap();
    assert_eq!(timeline.len(), 4);
    assert!(timeline.last().unwrap().is_new);

    assert_eq!(h.session.contact(SRI).unwrap().unread_count, 0);
    assert_eq!(h.session.state(), SessionState::ContactActive(SRI));
    assert!(h.session.conversation(SRI).last().unwrap().is_new);
}

#[test]
fn test_empty_bodies_rejected_without_mutation() {
    let mut h = harness();
    h.session.select_contact(VIJAY).unwrap();

    for body in ["", "   ", "\n\t"] {
        let err = h.session.send_message(body).unwrap_err();
        assert_eq!(err, MessagingError::Validation(ValidationError::EmptyMessage));
    }

    assert_eq!(h.session.conversation(VIJAY).len(), 1);
    assert_eq!(h.session.timeline().len(), 1);
    assert_eq!(h.notices.notices().len(), 3);
}

#[test]
fn test_ids_have_no_gaps() {
    let mut h = harness();
    h.session.select_contact(SRI).unwrap();
    for i in 0..5 {
        h.session.send_message(&format!("Follow-up {}", i)).unwrap();
        h.clock.advance(REPLY_DELAY);
        h.session.run_due();
    }

    let ids: Vec<u64> = h.session.conversation(SRI).map(|m| m.id.0).collect();
    let expected: Vec<u64> = (1..=14).collect();
    assert_eq!(ids, expected);

    let timestamps: Vec<_> = h.session.conversation(SRI).map(|m| m.timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_send_appends_outbound_with_exact_body() {
    let mut h = harness();
    h.session.select_contact(RAVI).unwrap();

    let sent = h.session.send_message("Dispatching Monday.").unwrap();
    let last = h.session.conversation(RAVI).last().unwrap();

    assert_eq!(last, &sent);
    assert_eq!(last.direction, Direction::Outbound);
    assert_eq!(last.body, "Dispatching Monday.");
    assert_eq!(last.sender, "ABC Electronics");
    assert!(!last.is_new);
}

#[test]
fn test_scenario_b_unresponsive_contact_never_replies() {
    let mut h = harness();
    h.session.select_contact(VIJAY).unwrap();
    let before = h.session.conversation(VIJAY).len();

    h.session.send_message("Any discounts for 1000 units?").unwrap();
    assert_eq!(h.session.pending_replies().count(), 0);

    h.clock.advance(Duration::from_secs(3600));
    assert!(h.session.run_due().is_empty());
    assert_eq!(h.session.conversation(VIJAY).len(), before + 1);
}

#[test]
fn test_scenario_c_reply_lands_after_delay() {
    let mut h = harness();
    h.session.select_contact(SRI).unwrap();
    let before = h.session.conversation(SRI).len();

    h.session.send_message("Yes, 5% for 1000 units.").unwrap();

    h.clock.advance(REPLY_DELAY - Duration::from_millis(1));
    assert!(h.session.run_due().is_empty());
    assert_eq!(h.session.conversation(SRI).len(), before + 1);

    h.clock.advance(Duration::from_millis(1));
    let events = h.session.run_due();
    assert_eq!(events.len(), 1);

    assert_eq!(h.session.conversation(SRI).len(), before + 2);
    let reply = h.session.conversation(SRI).last().unwrap();
    assert_eq!(reply.direction, Direction::Inbound);
    assert!(reply.is_new);
    assert_eq!(
        reply.body,
        "Thanks for the information. I will place the order soon."
    );
    assert_eq!(h.session.timeline().last(), Some(reply));
    assert_eq!(h.session.contact(SRI).unwrap().unread_count, 0);

    // Fires once only
    h.clock.advance(Duration::from_secs(60));
    assert!(h.session.run_due().is_empty());
    assert_eq!(h.session.conversation(SRI).len(), before + 2);
}

#[test]
fn test_scenario_c_deselected_contact_gets_unread() {
    let mut h = harness();
    h.session.select_contact(SRI).unwrap();
    let before = h.session.conversation(SRI).len();
    h.session.send_message("Yes, 5% for 1000 units.").unwrap();

    h.session.select_contact(VIJAY).unwrap();
    h.clock.advance(REPLY_DELAY);
    let events = h.session.run_due();

    let [SessionEvent::ReplyDelivered {
        contact_id,
        visible,
        ..
    }] = events.as_slice()
    else {
        panic!("expected exactly one reply, got {:?}", events);
    };
    assert_eq!(*contact_id, SRI);
    assert!(!visible);

    let sri = h.session.contact(SRI).unwrap();
    assert_eq!(sri.unread_count, 1);
    assert_eq!(
        sri.last_message_preview,
        "Thanks for the information. I will place the order soon."
    );
    assert_eq!(h.session.conversation(SRI).len(), before + 2);

    // Vijay's visible timeline was not touched
    assert_eq!(h.session.timeline().len(), 1);
    assert_eq!(h.session.active_contact(), Some(VIJAY));
}

#[test]
fn test_each_send_schedules_its_own_reply() {
    let mut h = harness();
    h.session.select_contact(SRI).unwrap();

    let first = h.session.send_message("One").unwrap();
    h.clock.advance(Duration::from_secs(1));
    let second = h.session.send_message("Two").unwrap();

    let triggers: Vec<_> = h.session.pending_replies().map(|(_, _, p)| p.trigger).collect();
    assert_eq!(triggers, vec![first.id, second.id]);

    h.clock.advance(REPLY_DELAY);
    assert_eq!(h.session.run_due().len(), 2);
    assert_eq!(h.session.pending_replies().count(), 0);
}

#[test]
fn test_request_attachment_changes_nothing() {
    let mut h = harness();
    let contacts_before = h.session.list_contacts().to_vec();
    let convo_before: Vec<_> = h.session.conversation(SRI).cloned().collect();

    let err = h.session.request_attachment().unwrap_err();
    assert_eq!(err, MessagingError::NotImplemented(Unimplemented::Attachment));

    assert_eq!(h.session.list_contacts(), contacts_before.as_slice());
    assert_eq!(h.session.open_conversation(SRI).unwrap(), convo_before);
    assert_eq!(h.notices.notices()[0].title, "Feature coming soon");
}

#[test]
fn test_teardown_drops_pending_reply() {
    let mut h = harness();
    h.session.select_contact(SRI).unwrap();
    h.session.send_message("Bye").unwrap();
    assert_eq!(h.session.pending_replies().count(), 1);

    drop(h.session);
    h.clock.advance(REPLY_DELAY);
    assert!(h.notices.notices().is_empty());
}
