use anyhow::Result;
use chrono::{Local, TimeZone};

use crate::{
    api::{client::ApiClient, error::ApiError},
    domain::{
        chat::{ChatRole, ChatTranscript, ChatTurn, APOLOGY},
        status::SessionStatus,
    },
    ui::{render, terminal::Terminal},
    usecases::dashboard::{given_location, profile_location},
};

const CHAT_TURN_FAILED: &str = "CHAT_TURN_FAILED";
const EXIT_WORDS: [&str; 3] = ["/quit", "/exit", "/q"];

/// Location sent with every chat message: the given one, else the profile's
/// when signed in. Without either the advisor answers generically.
pub async fn chat_location(client: &ApiClient, location: Option<&str>) -> Option<String> {
    if let Some(location) = given_location(location) {
        return Some(location);
    }
    if client.session_status() != SessionStatus::Authenticated {
        return None;
    }

    match profile_location(client).await {
        Ok(location) => location,
        Err(error) => {
            tracing::debug!(cause = error.code(), "profile location unavailable for chat");
            None
        }
    }
}

/// Interactive advisory chat. Each message is sent on its own; the
/// transcript only lives here and is handed back when the session ends.
pub async fn run_chat(
    client: &ApiClient,
    terminal: &mut dyn Terminal,
    location: Option<&str>,
) -> Result<ChatTranscript> {
    let mut transcript = ChatTranscript::with_greeting();
    for turn in transcript.turns() {
        terminal.print_line(&render::chat_turn(turn))?;
    }
    terminal.print_line("Type /quit or press Ctrl-D to leave.")?;

    while let Some(line) = terminal.prompt_line("you> ")? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&message) {
            break;
        }

        transcript.push(ChatTurn::now(ChatRole::User, message));

        let reply = match client.advisory().chat(message, location).await {
            Ok(reply) => {
                let timestamp = reply
                    .sent_at()
                    .and_then(|sent| Local.from_local_datetime(&sent).single())
                    .unwrap_or_else(Local::now);
                ChatTurn {
                    role: ChatRole::Bot,
                    content: reply.response,
                    timestamp,
                }
            }
            Err(error) => {
                tracing::warn!(
                    code = CHAT_TURN_FAILED,
                    cause = error.code(),
                    "chat turn failed"
                );
                let session_lost = matches!(error, ApiError::Unauthorized);
                let turn = transcript.push(ChatTurn::now(ChatRole::Bot, APOLOGY));
                terminal.print_line(&render::chat_turn(turn))?;
                if session_lost {
                    break;
                }
                continue;
            }
        };

        let turn = transcript.push(reply);
        terminal.print_line(&render::chat_turn(turn))?;
    }

    tracing::debug!(turns = transcript.len(), "chat session ended");
    Ok(transcript)
}
