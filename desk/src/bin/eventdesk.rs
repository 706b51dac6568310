//! eventdesk command line.
//!
//! Talks to a live backend: lists approved events, shows attendance sheets,
//! toggles attendance and unregisters from events after confirmation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eventdesk::{
    display_name, AttendanceBook, AttendeeQuery, ConfirmationAction, DeskEnvironment, DeskIntent,
    DeskPerformer, LedgerHandle, RegistrationEnvironment, RegistrationLedger, RegistrationStatus,
    SortKey,
};
use eventdesk_client::{ClientConfig, EnvToken, HttpEventsApi, StaticToken};
use eventdesk_core::environment::{EventsApi, NotificationKind, Notifier, TokenSource};
use eventdesk_core::types::{EventId, UserId};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// eventdesk - event registration and attendance from the terminal
#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(about = "Browse events, manage registrations and keep attendance", long_about = None)]
struct Cli {
    /// Backend base URL (overrides EVENTDESK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides EVENTDESK_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Bearer token (overrides EVENTDESK_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Signed-in user id
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List approved events and your registration status
    Events,
    /// Show the attendance sheet of an event
    Attendees {
        /// Event id
        event_id: String,

        /// Case-insensitive search over name, username and student code
        #[arg(long, default_value = "")]
        search: String,

        /// Sort order
        #[arg(long, value_enum, default_value_t = Order::Az)]
        sort: Order,
    },
    /// Flip the attendance flag of one attendee
    Attend {
        /// Event id
        event_id: String,

        /// Attendee user id
        user_id: String,
    },
    /// Unregister from one or more events
    Unregister {
        /// Event ids
        #[arg(required = true)]
        event_ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    /// Name, A to Z
    Az,
    /// Name, Z to A
    Za,
    /// Attending first
    Status,
}

impl From<Order> for SortKey {
    fn from(order: Order) -> Self {
        match order {
            Order::Az => Self::Az,
            Order::Za => Self::Za,
            Order::Status => Self::Status,
        }
    }
}

/// Prints notifications to stderr
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NotificationKind, text: &str) {
        eprintln!("[{kind}] {text}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.api_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env().context("Invalid client configuration")?,
    };
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "Configuration loaded");

    let tokens: Arc<dyn TokenSource> = match cli.token.clone() {
        Some(token) => Arc::new(StaticToken::new(token)),
        None => Arc::new(EnvToken),
    };
    let api: Arc<dyn EventsApi> = Arc::new(HttpEventsApi::new(&config, tokens)?);
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let user_id = cli.user.map(UserId::new);

    match cli.command {
        Commands::Events => events_command(api, notifier, user_id).await,
        Commands::Attendees { event_id, search, sort } => {
            let query = AttendeeQuery::new(sort.into()).with_search(search);
            attendees_command(DeskEnvironment::new(api, notifier), event_id.into(), &query).await
        },
        Commands::Attend { event_id, user_id: attendee } => {
            attend_command(DeskEnvironment::new(api, notifier), event_id.into(), attendee.into())
                .await
        },
        Commands::Unregister { event_ids, yes } => {
            let Some(user_id) = user_id else {
                bail!("--user is required to unregister");
            };
            let event_ids = event_ids.into_iter().map(EventId::new).collect();
            unregister_command(api, notifier, user_id, event_ids, yes).await
        },
    }
}

fn ledger_for(user_id: Option<UserId>) -> LedgerHandle {
    user_id.map_or_else(LedgerHandle::default, |user_id| {
        LedgerHandle::new(RegistrationLedger::new(user_id))
    })
}

async fn events_command(
    api: Arc<dyn EventsApi>,
    notifier: Arc<dyn Notifier>,
    user_id: Option<UserId>,
) -> Result<()> {
    let env = RegistrationEnvironment::new(api, notifier, ledger_for(user_id));
    let events = env.load_events().await?;

    for event in &events {
        let status = match env.ledger.status(&event.id).await {
            RegistrationStatus::Created => "created",
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::NotRegistered => "-",
        };
        let start = event
            .start_time
            .map(|start| start.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:<12} {:<16} {:<10} {}", event.id, start, status, event.title);
    }
    Ok(())
}

async fn attendees_command(env: DeskEnvironment, event_id: EventId, query: &AttendeeQuery) -> Result<()> {
    let book = AttendanceBook::load(env, event_id).await?;

    for attendee in book.view(query) {
        let mark = if attendee.is_attending { "x" } else { " " };
        println!(
            "[{mark}] {:<32} {:<12} {}",
            display_name(attendee),
            attendee.student_code.as_deref().unwrap_or("-"),
            attendee.user_id
        );
    }
    Ok(())
}

async fn attend_command(env: DeskEnvironment, event_id: EventId, user_id: UserId) -> Result<()> {
    let mut book = AttendanceBook::load(env, event_id).await?;
    let attending = book.toggle(&user_id).await?;
    println!("{user_id}: {}", if attending { "attending" } else { "absent" });
    Ok(())
}

async fn unregister_command(
    api: Arc<dyn EventsApi>,
    notifier: Arc<dyn Notifier>,
    user_id: UserId,
    event_ids: Vec<EventId>,
    yes: bool,
) -> Result<()> {
    let env = RegistrationEnvironment::new(api, notifier, ledger_for(Some(user_id)));
    env.load_events().await?;

    let intent = match event_ids.as_slice() {
        [single] => DeskIntent::Unregister(single.clone()),
        _ => DeskIntent::UnregisterMany(event_ids),
    };

    let store = DeskPerformer::new(env).into_store();
    store.send(ConfirmationAction::Request(intent.confirmation())).await.wait().await;

    let answer = match store.state(|state| state.pending().cloned()).await {
        Some(request) if !yes => ask(&request.title, &request.message, &request.confirm_label)?,
        Some(_) => true,
        None => false,
    };

    let action = if answer { ConfirmationAction::Confirm } else { ConfirmationAction::Cancel };
    store.send(action).await.wait().await;
    Ok(())
}

fn ask(title: &str, message: &str, confirm_label: &str) -> Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{title}: {message} [{confirm_label}? y/N] ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
