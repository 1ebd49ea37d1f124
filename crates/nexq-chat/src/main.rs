//! NexQ Chat - supply-chain messaging in the terminal
//!
//! A command-line client for the NexQ messaging session: browse the
//! contact list, open conversations, send messages and watch simulated
//! replies arrive.
//!
//! ## Usage
//!
//! ```bash
//! # Show the contact list with unread badges
//! nexq-chat contacts
//!
//! # Print one conversation
//! nexq-chat open 1
//!
//! # Interactive session
//! nexq-chat --role retailer --name "Kumar Mart" chat
//!
//! # Scripted walkthrough, replies after the real five seconds
//! nexq-chat demo
//!
//! # Same walkthrough on a manual clock
//! nexq-chat demo --fast
//! ```

mod display;
mod pump;
mod roster;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use nexq_logging::{LogConfig, NexqSubscriberBuilder, SessionContextGuard, session_span};
use nexq_messaging::{
    ContactId, ManualClock, MessagingSession, SessionConfig, SessionEvent, TradeRole, UserProfile,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Instrument, debug, info};

use display::*;
use pump::{ReplyPump, TokioClock};
use roster::{RAVI_DISTRIBUTORS, SRI_TRADERS, VIJAY_WHOLESALERS};

/// NexQ Chat - supply-chain messaging
#[derive(Parser)]
#[command(name = "nexq-chat")]
#[command(about = "Message your trading partners from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Your role in the supply chain
    #[arg(short, long, value_enum, default_value_t = RoleArg::Manufacturer, global = true)]
    role: RoleArg,

    /// Your company name (defaults to a placeholder for the role)
    #[arg(short, long, global = true)]
    name: Option<String>,

    /// Roster and history to start from (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Session settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Human-readable log output instead of JSONL
    #[arg(long, global = true)]
    pretty: bool,

    /// Also write JSONL logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the contact list
    Contacts,
    /// Open a conversation and print it
    Open {
        /// Contact id from the contact list
        id: u64,
    },
    /// Interactive chat session
    Chat,
    /// Demo mode: walk through a scripted negotiation
    Demo {
        /// Skip the reply delay using a manual clock
        #[arg(long)]
        fast: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    Manufacturer,
    Distributor,
    Wholesaler,
    Retailer,
}

impl From<RoleArg> for TradeRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Manufacturer => TradeRole::Manufacturer,
            RoleArg::Distributor => TradeRole::Distributor,
            RoleArg::Wholesaler => TradeRole::Wholesaler,
            RoleArg::Retailer => TradeRole::Retailer,
        }
    }
}

fn build_profile(role: RoleArg, name: Option<&str>) -> UserProfile {
    match name {
        Some(name) => UserProfile::new(name, role.into()),
        None => UserProfile::for_role(role.into()),
    }
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load session config from {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn log_config(cli: &Cli) -> LogConfig {
    let config = LogConfig::for_terminal(cli.log_level.as_str(), cli.pretty);
    match &cli.log_dir {
        Some(dir) => config.with_log_dir(dir.clone()),
        None => config,
    }
}

fn build_session(cli: &Cli, pump: &ReplyPump) -> Result<MessagingSession> {
    let snapshot = roster::load_snapshot(cli.snapshot.as_deref())?;
    let config = load_config(cli.config.as_deref())?;
    let profile = build_profile(cli.role, cli.name.as_deref());

    MessagingSession::builder(snapshot)
        .profile(profile)
        .config(config)
        .clock(pump.clock())
        .notifier(Arc::new(ConsoleNotifier))
        .build()
        .context("Failed to start messaging session")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = NexqSubscriberBuilder::new()
        .with_config(log_config(&cli))
        .init();

    let profile = build_profile(cli.role, cli.name.as_deref());
    let _ctx = SessionContextGuard::new(profile.display_name.clone(), profile.role.to_string());

    run(cli).instrument(session_span()).await
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Contacts => {
            let pump = ReplyPump::timer(Arc::new(TokioClock::new()));
            let session = build_session(&cli, &pump)?;
            cmd_contacts(&session)
        }
        Commands::Open { id } => {
            let pump = ReplyPump::timer(Arc::new(TokioClock::new()));
            let mut session = build_session(&cli, &pump)?;
            cmd_open(&mut session, ContactId(id))
        }
        Commands::Chat => {
            let pump = ReplyPump::timer(Arc::new(TokioClock::new()));
            let mut session = build_session(&cli, &pump)?;
            cmd_chat(&mut session, &pump).await
        }
        Commands::Demo { fast } => {
            let pump = if fast {
                ReplyPump::manual(Arc::new(ManualClock::starting_at(Utc::now())))
            } else {
                ReplyPump::timer(Arc::new(TokioClock::new()))
            };
            let mut session = build_session(&cli, &pump)?;
            cmd_demo(&mut session, &pump, fast).await
        }
    }
}

fn cmd_contacts(session: &MessagingSession) -> Result<()> {
    print_banner(session.profile());
    print_contact_list(session.list_contacts(), session.active_contact());
    print_info(&format!("{} unread in total", session.unread_total()));
    Ok(())
}

fn cmd_open(session: &mut MessagingSession, id: ContactId) -> Result<()> {
    let messages = session
        .open_conversation(id)
        .with_context(|| format!("Cannot open conversation {}", id))?;
    let contact = session
        .contact(id)
        .ok_or_else(|| anyhow::anyhow!("Contact not found: {}", id))?;
    print_conversation(contact, &messages);
    Ok(())
}

fn active_name(session: &MessagingSession) -> Option<String> {
    let id = session.active_contact()?;
    session.contact(id).map(|c| c.display_name.clone())
}

fn show_events(session: &MessagingSession, events: &[SessionEvent]) {
    for event in events {
        let SessionEvent::ReplyDelivered { contact_id, .. } = event;
        let name = session
            .contact(*contact_id)
            .map(|c| c.display_name.as_str())
            .unwrap_or("Unknown contact");
        print_event(event, name);
    }
}

/// Outcome of one line of interactive input
#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Quit,
}

/// Apply one line of interactive input to the session
///
/// Rejected operations are already reported through the session's
/// notifier, so their errors are dropped here.
fn handle_line(session: &mut MessagingSession, input: &str) -> LineOutcome {
    let input = input.trim();
    if input.is_empty() {
        return LineOutcome::Continue;
    }

    let (cmd, rest) = match input.split_once(' ') {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest),
        None => (input.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "quit" | "exit" | "q" | "/quit" | "/exit" => {
            print_info("Goodbye!");
            return LineOutcome::Quit;
        }
        "help" | "?" | "/help" => print_interactive_help(),
        "contacts" | "/contacts" => {
            print_contact_list(session.list_contacts(), session.active_contact())
        }
        "open" | "/open" => match rest.trim().parse::<u64>() {
            Ok(id) => {
                let id = ContactId(id);
                if let Ok(messages) = session.open_conversation(id)
                    && let Some(contact) = session.contact(id)
                {
                    print_conversation(contact, &messages);
                }
            }
            Err(_) => print_error("Usage: open <id>"),
        },
        "history" | "/history" => match session.active_contact().and_then(|id| session.contact(id)) {
            Some(contact) => print_conversation(contact, session.timeline()),
            None => print_info("No conversation open. Use 'open <id>'."),
        },
        "attach" | "/attach" => {
            // Already shown by the console notifier
            if let Err(e) = session.request_attachment() {
                debug!(error = %e, "Attachment not sent");
            }
        }
        "pending" | "/pending" => {
            let pending: Vec<_> = session
                .pending_replies()
                .map(|(task_id, due, reply)| (task_id, due, *reply))
                .collect();
            print_pending(&pending);
        }
        "unread" | "/unread" => {
            print_info(&format!("{} unread in total", session.unread_total()))
        }
        "send" | "/send" => {
            let mut draft = rest.to_string();
            if let Ok(message) = session.send_compose(&mut draft) {
                print_message(&message);
            }
        }
        _ => {
            let mut draft = input.to_string();
            if let Ok(message) = session.send_compose(&mut draft) {
                print_message(&message);
            }
        }
    }

    LineOutcome::Continue
}

async fn cmd_chat(session: &mut MessagingSession, pump: &ReplyPump) -> Result<()> {
    print_banner(session.profile());
    print_contact_list(session.list_contacts(), session.active_contact());
    print_interactive_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        print_prompt(active_name(session).as_deref());
        stdout.flush()?;

        // Keep firing replies while waiting for the next line
        let line = loop {
            let delay = pump.delay_until_next(session);
            tokio::select! {
                line = lines.next_line() => break line.context("Failed to read input")?,
                _ = pump.wait(delay.unwrap_or(Duration::MAX)), if delay.is_some() => {
                    let events = session.run_due();
                    if !events.is_empty() {
                        println!();
                        show_events(session, &events);
                        print_prompt(active_name(session).as_deref());
                        stdout.flush()?;
                    }
                }
            }
        };

        let Some(line) = line else {
            info!("Input closed");
            break;
        };

        if handle_line(session, &line) == LineOutcome::Quit {
            break;
        }
    }

    Ok(())
}

async fn cmd_demo(session: &mut MessagingSession, pump: &ReplyPump, fast: bool) -> Result<()> {
    print_banner(session.profile());
    print_demo_mode(fast);

    let pause = Duration::from_millis(600);

    print_step(1, "The contact list, with unread badges");
    print_contact_list(session.list_contacts(), session.active_contact());
    print_info(&format!("{} unread in total", session.unread_total()));
    pump.wait(pause).await;

    print_step(2, "Open Sri Traders: the badge clears, NEW highlights stay");
    let messages = session.open_conversation(SRI_TRADERS)?;
    if let Some(contact) = session.contact(SRI_TRADERS) {
        print_conversation(contact, &messages);
    }
    print_contact_list(session.list_contacts(), session.active_contact());
    pump.wait(pause).await;

    print_step(3, "Send a reply and wait for the answer");
    let sent = session.send_message("We can offer 5% off on 1000 units.")?;
    print_message(&sent);
    if let Some(delay) = pump.delay_until_next(session) {
        print_info(&format!("Sri Traders is typing... ({}s)", delay.as_secs()));
    }
    let events = pump.deliver_next(session).await;
    show_events(session, &events);
    pump.wait(pause).await;

    print_step(4, "Send again, then switch away before the answer lands");
    let sent = session.send_message("Dispatch can start on Monday.")?;
    print_message(&sent);
    let messages = session.open_conversation(VIJAY_WHOLESALERS)?;
    if let Some(contact) = session.contact(VIJAY_WHOLESALERS) {
        print_conversation(contact, &messages);
    }
    let events = pump.deliver_next(session).await;
    show_events(session, &events);
    print_contact_list(session.list_contacts(), session.active_contact());
    pump.wait(pause).await;

    print_step(5, "Only Sri Traders answers in this build");
    session.open_conversation(RAVI_DISTRIBUTORS)?;
    let sent = session.send_message("Your next order ships Friday.")?;
    print_message(&sent);
    let pending: Vec<_> = session
        .pending_replies()
        .map(|(task_id, due, reply)| (task_id, due, *reply))
        .collect();
    print_pending(&pending);
    pump.wait(pause).await;

    print_step(6, "Things that are not possible yet");
    // Both are rejected and reported through the console notifier
    if let Err(e) = session.request_attachment() {
        debug!(error = %e, "Attachment not sent");
    }
    if let Err(e) = session.send_message("   ") {
        debug!(error = %e, "Blank message not sent");
    }

    println!();
    print_success("Demo complete!");
    println!();
    println!("{}", "To chat yourself:".dimmed());
    println!("  {} {}", "nexq-chat chat".green(), "--role manufacturer".dimmed());
    println!();

    Ok(())
}
