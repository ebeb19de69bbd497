//! Main entrypoint for the RELINK terminal client.
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging (to stderr, so log lines stay out of the chat log).
//! 3. Running the login loop: collect an identity, start a session.
//! 4. Running the chat loop: bridge stdin lines and session events.
//! 5. Optionally writing the HTML transcript on exit.

mod config;
mod ui;

use anyhow::{Context, Result, bail};
use clap::Parser;
use relink_client::{ChatSession, ClientError, InboundEvent, SessionEvent};
use std::{io::Write as _, path::PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};

use crate::{config::Config, ui::Ui};

type StdinLines = Lines<BufReader<Stdin>>;

#[derive(Parser, Debug)]
#[command(
    name = "relink",
    version,
    about = "Terminal client for the RELINK chat backend"
)]
struct Args {
    /// Display name to join as. Prompted for when omitted.
    username: Option<String>,

    /// Room to join; omitted means the global channel.
    #[arg(long)]
    room: Option<String>,

    /// Backend WebSocket base URL, overriding RELINK_WS_URL.
    #[arg(long)]
    url: Option<String>,

    /// Write an HTML transcript of the session to this file on exit.
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Disable per-user colors in terminal output.
    #[arg(long)]
    no_color: bool,
}

/// How a chat loop ended.
enum Outcome {
    /// `/leave`: back to the login prompt.
    Leave,
    /// `/quit` or stdin EOF: exit the program.
    Quit,
    /// The connection closed or errored out underneath us.
    Disconnected,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let base_url = args.url.clone().unwrap_or(config.ws_base);
    let mut ui = Ui::new(!args.no_color);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut session = ChatSession::new(&base_url);

    loop {
        // EOF at the login prompt means the user is done.
        let Some((username, room)) = credentials(&args, &mut stdin).await? else {
            break;
        };
        let mut events = match session.start(&username, room.as_deref()).await {
            Ok(events) => events,
            Err(ClientError::MissingField(field)) => {
                if args.username.is_some() {
                    bail!("a non-empty {field} is required");
                }
                println!("Enter a {field}");
                continue;
            }
            Err(e) => return Err(e).context("Failed to open the chat session"),
        };

        if let Some(identity) = session.identity() {
            println!("You: {}", identity.username);
            if let Some(room) = &identity.room {
                println!("Room: {room}");
            }
        }
        println!("Type to chat. /leave returns to login, /quit exits.");

        let outcome = chat_loop(&session, &mut events, &mut stdin, &mut ui).await?;
        session.stop().await;
        match outcome {
            Outcome::Quit => break,
            Outcome::Leave | Outcome::Disconnected => {
                // Leaving a room drops its log, matching the room-scoped UI.
                if room.is_some() {
                    ui.clear();
                }
                if args.username.is_some() {
                    // Identity came from the command line; nothing to re-prompt for.
                    break;
                }
            }
        }
    }

    if let Some(path) = &args.transcript {
        ui.write_transcript(path)
            .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
        info!(lines = ui.len(), path = %path.display(), "transcript written");
    }
    Ok(())
}

/// Resolves the identity to join with, prompting on stdin for anything the
/// command line did not provide. `None` means EOF.
async fn credentials(
    args: &Args,
    stdin: &mut StdinLines,
) -> Result<Option<(String, Option<String>)>> {
    if let Some(username) = &args.username {
        return Ok(Some((username.clone(), args.room.clone())));
    }

    prompt("username: ")?;
    let Some(username) = stdin.next_line().await? else {
        return Ok(None);
    };

    let room = match &args.room {
        Some(room) => Some(room.clone()),
        None => {
            prompt("room (blank for the global channel): ")?;
            match stdin.next_line().await? {
                Some(line) if !line.trim().is_empty() => Some(line.trim().to_string()),
                Some(_) => None,
                None => return Ok(None),
            }
        }
    };
    Ok(Some((username, room)))
}

fn prompt(label: &str) -> Result<()> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(())
}

/// Bridges stdin lines and session events until the user leaves or the
/// connection goes away.
async fn chat_loop(
    session: &ChatSession,
    events: &mut tokio::sync::mpsc::Receiver<SessionEvent>,
    stdin: &mut StdinLines,
    ui: &mut Ui,
) -> Result<Outcome> {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Opened) => {
                    ui.show(&InboundEvent::system("Connected to RELINK"));
                }
                Some(SessionEvent::Received(event)) => ui.show(&event),
                Some(SessionEvent::Closed) => {
                    ui.show(&InboundEvent::system("Disconnected from server"));
                    return Ok(Outcome::Disconnected);
                }
                Some(SessionEvent::Errored(detail)) => {
                    error!(%detail, "socket transport error");
                    ui.show(&InboundEvent::system("Connection error"));
                }
                None => return Ok(Outcome::Disconnected),
            },
            line = stdin.next_line() => match line? {
                Some(line) => match line.trim() {
                    "/leave" => return Ok(Outcome::Leave),
                    "/quit" => return Ok(Outcome::Quit),
                    _ => {
                        session.send(&line).await?;
                    }
                },
                None => return Ok(Outcome::Quit),
            },
        }
    }
}
