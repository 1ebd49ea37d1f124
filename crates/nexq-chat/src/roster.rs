//! Built-in demo roster used when no snapshot file is given

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use nexq_messaging::{Attachment, Contact, ContactId, NewMessage, Snapshot, TradeRole};

pub const SRI_TRADERS: ContactId = ContactId(1);
pub const VIJAY_WHOLESALERS: ContactId = ContactId(2);
pub const RAVI_DISTRIBUTORS: ContactId = ContactId(3);

const AVATAR: &str = "/placeholder.svg";

fn april(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, day, hour, minute, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Three trading partners with a short order history
pub fn demo_snapshot() -> Snapshot {
    Snapshot::new(vec![
        Contact::new(SRI_TRADERS, "Sri Traders", TradeRole::Distributor)
            .with_avatar(AVATAR)
            .with_last_message("Need 200 units of Smartphone X1.", april(10, 16, 0), 2),
        Contact::new(VIJAY_WHOLESALERS, "Vijay Wholesalers", TradeRole::Wholesaler)
            .with_avatar(AVATAR)
            .with_last_message("MOQ for Charger C1?", april(10, 15, 30), 1),
        Contact::new(RAVI_DISTRIBUTORS, "Ravi Distributors", TradeRole::Distributor)
            .with_avatar(AVATAR)
            .with_last_message("Order confirmed.", april(9, 12, 0), 0),
    ])
    .with_conversation(
        SRI_TRADERS,
        vec![
            NewMessage::inbound(
                "Sri Traders",
                "Hi ABC Electronics, can you send 500 units of Smartphone X1?",
                april(10, 14, 30),
            ),
            NewMessage::outbound(
                "ABC Electronics",
                "MOQ is 200, confirming 500 units. ETA 12-Apr-2025.",
                april(10, 14, 35),
            )
            .with_attachment(Attachment::qr("Order #123, 500 units of Smartphone X1")),
            NewMessage::inbound("Sri Traders", "Thanks! Attaching specs.", april(10, 15, 0))
                .with_attachment(Attachment::image(AVATAR, "Smartphone X1.jpg")),
            NewMessage::inbound(
                "Sri Traders",
                "Any discounts for 1000 units?",
                april(10, 16, 0),
            )
            .marked_new(),
        ],
    )
    .with_conversation(
        VIJAY_WHOLESALERS,
        vec![
            NewMessage::inbound(
                "Vijay Wholesalers",
                "Hello ABC Electronics. What is the MOQ for Charger C1?",
                april(10, 15, 30),
            )
            .marked_new(),
        ],
    )
    .with_conversation(
        RAVI_DISTRIBUTORS,
        vec![NewMessage::inbound(
            "Ravi Distributors",
            "Order confirmed.",
            april(9, 12, 0),
        )],
    )
}

/// Load the snapshot at `path`, or fall back to the demo roster
pub fn load_snapshot(path: Option<&Path>) -> Result<Snapshot> {
    let Some(path) = path else {
        return Ok(demo_snapshot());
    };

    let snapshot = Snapshot::load(path)
        .with_context(|| format!("Failed to load snapshot from {}", path.display()))?;
    snapshot
        .validate()
        .with_context(|| format!("Invalid snapshot in {}", path.display()))?;
    Ok(snapshot)
}
