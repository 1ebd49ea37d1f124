//! Terminal display utilities for the chat client

use chrono::{DateTime, Utc};
use colored::Colorize;
use nexq_messaging::{
    AttachmentKind, Contact, Message, Notice, NoticeLevel, Notifier, PendingReply, SessionEvent,
    TaskId, UserProfile, preview_text,
};

/// Characters of the last message shown under a roster entry
const PREVIEW_CHARS: usize = 48;

/// Print the application banner
pub fn print_banner(profile: &UserProfile) {
    println!();
    println!(
        "{}",
        "╔═══════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║        NexQ - Supply Chain Messaging              ║".cyan()
    );
    println!(
        "{}",
        "╚═══════════════════════════════════════════════════╝".cyan()
    );
    println!(
        "  {} {} {}",
        "Signed in as".dimmed(),
        profile.display_name.cyan().bold(),
        format!("({})", profile.role).dimmed()
    );
    println!();
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg.dimmed());
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("{} {}", "✗".red().bold(), msg.red());
}

/// Print a toast-style notice
pub fn print_notice(notice: &Notice) {
    let title = format!("{}:", notice.title);
    match notice.level {
        NoticeLevel::Info => println!("{} {} {}", "ℹ".blue(), title.blue().bold(), notice.description),
        NoticeLevel::Warning => println!(
            "{} {} {}",
            "⚠".yellow(),
            title.yellow().bold(),
            notice.description.yellow()
        ),
        NoticeLevel::Error => {
            println!("{} {} {}", "✗".red().bold(), title.red().bold(), notice.description.red())
        }
    }
}

/// Notifier that prints notices to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        print_notice(notice);
    }
}

/// Print the chat prompt
pub fn print_prompt(active: Option<&str>) {
    match active {
        Some(name) => print!("{} {} ", format!("[{}]", name).cyan(), ">".green()),
        None => print!("{} {} ", "[contacts]".dimmed(), ">".green()),
    }
}

/// Print interactive mode help
pub fn print_interactive_help() {
    println!();
    println!("{}", "Commands:".yellow().bold());
    println!("  {}       - Show the contact list", "contacts".cyan());
    println!("  {}      - Open a conversation", "open <id>".cyan());
    println!("  {} - Send a text message", "send <message>".cyan());
    println!(
        "  {}      - Send to the open conversation (just type)",
        "<message>".cyan()
    );
    println!("  {}         - Attach a file", "attach".cyan());
    println!("  {}        - Show the open conversation", "history".cyan());
    println!("  {}        - Show replies on the way", "pending".cyan());
    println!("  {}         - Show unread total", "unread".cyan());
    println!("  {}           - Show this help", "help".cyan());
    println!("  {}           - Exit", "quit".cyan());
    println!();
}

fn short_time(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format("%d-%b %H:%M").to_string())
        .unwrap_or_default()
}

/// Last message as shown under a roster entry
fn roster_preview(contact: &Contact) -> String {
    preview_text(&contact.last_message_preview, PREVIEW_CHARS)
}

/// Print the contact list with unread badges
pub fn print_contact_list(contacts: &[Contact], active: Option<nexq_messaging::ContactId>) {
    if contacts.is_empty() {
        println!("{}", "No contacts yet.".dimmed());
        return;
    }

    println!();
    println!("{}", "Contacts:".yellow().bold());
    println!("{}", "───────────────────────────────────────".dimmed());

    for contact in contacts {
        let marker = if Some(contact.id) == active {
            "▶".green().to_string()
        } else {
            " ".to_string()
        };
        let badge = if contact.has_unread() {
            format!(" {} ", contact.unread_count).on_red().white().bold().to_string()
        } else {
            String::new()
        };

        println!(
            "{} {} {} {} {} {}",
            marker,
            format!("{}.", contact.id).dimmed(),
            format!("[{}]", contact.initials()).blue(),
            contact.display_name.cyan().bold(),
            format!("({})", contact.role).dimmed(),
            badge
        );
        if !contact.last_message_preview.is_empty() {
            println!(
                "      {} {}",
                short_time(contact.last_message_at).dimmed(),
                roster_preview(contact).dimmed()
            );
        }
    }
    println!();
}

/// Print the header above a conversation
pub fn print_conversation_header(contact: &Contact, count: usize) {
    println!();
    println!(
        "{} {} {}",
        "─".repeat(10).dimmed(),
        format!("{} - {} ({} messages)", contact.display_name, contact.role, count)
            .yellow()
            .bold(),
        "─".repeat(10).dimmed()
    );
}

/// Print one chat message
pub fn print_message(message: &Message) {
    let time_str = message.display_time();
    let sender = format!("{}:", message.sender);
    let sender = if message.is_inbound() {
        sender.magenta().bold()
    } else {
        sender.cyan().bold()
    };
    let flag = if message.is_new {
        " NEW ".on_green().black().bold().to_string()
    } else {
        String::new()
    };

    println!("{} {} {} {}", time_str.dimmed(), sender, message.body, flag);

    if let Some(attachment) = &message.attachment {
        let line = match attachment.kind {
            AttachmentKind::Image => format!(
                "    [image] {}",
                attachment.name.as_deref().unwrap_or(&attachment.payload)
            ),
            AttachmentKind::Qr => format!("    [qr] {}", attachment.payload),
        };
        println!("{}", line.dimmed());
    }
}

/// Print a whole conversation
pub fn print_conversation(contact: &Contact, messages: &[Message]) {
    print_conversation_header(contact, messages.len());
    if messages.is_empty() {
        println!("{}", "    No messages yet. Say hello!".dimmed());
    }
    for message in messages {
        print_message(message);
    }
    println!();
}

/// Print the replies still waiting to fire
pub fn print_pending(pending: &[(TaskId, DateTime<Utc>, PendingReply)]) {
    if pending.is_empty() {
        print_info("No replies on the way.");
        return;
    }
    println!();
    println!("{}", "Replies on the way:".yellow().bold());
    for (task_id, due, reply) in pending {
        println!(
            "  {} {} {} {}",
            format!("{}", task_id).dimmed(),
            format!("contact {}", reply.contact_id).cyan(),
            format!("after {}", reply.trigger).dimmed(),
            format!("due {}", due.format("%H:%M:%S")).dimmed()
        );
    }
    println!();
}

/// Print the outcome of a fired deferred task
pub fn print_event(event: &SessionEvent, contact_name: &str) {
    match event {
        SessionEvent::ReplyDelivered {
            message, visible, ..
        } => {
            if *visible {
                print_message(message);
            } else {
                println!(
                    "{} {} {}",
                    "✉".magenta(),
                    format!("New message from {}:", contact_name).magenta().bold(),
                    message.preview(PREVIEW_CHARS).dimmed()
                );
            }
        }
    }
}

/// Print the demo mode banner
pub fn print_demo_mode(fast: bool) {
    let line = if fast {
        "  DEMO mode - manual clock, replies arrive instantly "
    } else {
        "  DEMO mode - replies arrive after the real delay   "
    };
    println!();
    println!(
        "{}",
        "════════════════════════════════════════════════════".yellow()
    );
    println!("{}", line.yellow());
    println!(
        "{}",
        "════════════════════════════════════════════════════".yellow()
    );
    println!();
}

/// Print a demo step heading
pub fn print_step(number: usize, title: &str) {
    println!();
    println!("{} {}", format!("Step {}:", number).yellow().bold(), title.bold());
}
