//! Plain stdin/stdout chat surfaces

use std::io::{self, Write};

use anyhow::Context;
use futures::StreamExt;
use tracing::debug;

use concourse_ai::{Message, Role};
use concourse_chat::session::HistoryEntry;
use concourse_chat::{ChatTurn, SessionHandle, SessionStore};

/// Read one line of user input; `None` means EOF or an exit request.
fn read_input() -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    let input = input.trim();
    if input.eq_ignore_ascii_case("exit") {
        return Ok(None);
    }
    Ok(Some(input.to_string()))
}

fn rendered_message(entry: &HistoryEntry) -> Option<Message> {
    match entry.role {
        Role::User => Some(Message::user(&entry.content)),
        Role::Assistant => Some(Message::assistant(&entry.content)),
        _ => None,
    }
}

/// The airline assistant surface: tool-augmented, non-streaming turns.
pub async fn run_airline(
    turn: &ChatTurn,
    handle: &SessionHandle,
    store: &SessionStore,
) -> anyhow::Result<()> {
    println!("FlightAI — airline assistant (type 'exit' to quit, '/clear' to clear)\n");

    let mut history: Vec<Message> = Vec::new();

    loop {
        let Some(input) = read_input()? else { break };
        if input.is_empty() {
            continue;
        }

        // The clear affordance discards in-memory history only.
        if input == "/clear" {
            history.clear();
            handle.clear_history();
            println!("Cleared conversation.");
            continue;
        }

        let answer = turn
            .respond(&input, &history)
            .await
            .context("chat turn failed")?;
        println!("\n{}\n", answer);

        history.push(Message::user(&input));
        history.push(Message::assistant(&answer));
        handle.push_history(Role::User, &input);
        handle.push_history(Role::Assistant, &answer);

        // load_conversation swapped the session; repopulate visible history
        // from the store for the turns that follow.
        if handle.take_reload_request() {
            let session_id = handle.state().id.to_string();
            let rows = store
                .load_messages(&session_id)
                .context("failed to reload conversation")?;
            debug!(count = rows.len(), "repopulating history from store");

            let entries: Vec<HistoryEntry> = rows
                .iter()
                .map(|m| HistoryEntry {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect();
            history = entries.iter().filter_map(rendered_message).collect();
            handle.replace_history(entries);
            println!("(restored {} messages)\n", history.len());
        }
    }

    Ok(())
}

/// The literary companion surface: streaming turns, no tools.
pub async fn run_companion(turn: &ChatTurn) -> anyhow::Result<()> {
    println!("White Nights — Second Night Analyzer (type 'exit' to quit, '/clear' to clear)\n");

    let mut history: Vec<Message> = Vec::new();

    loop {
        let Some(input) = read_input()? else { break };
        if input.is_empty() {
            continue;
        }

        if input == "/clear" {
            history.clear();
            println!("Cleared conversation.");
            continue;
        }

        let mut snapshots = turn
            .stream_response(&input, &history)
            .await
            .context("chat turn failed")?;

        println!();
        let mut printed = 0usize;
        let mut answer = String::new();
        while let Some(item) = snapshots.next().await {
            let snapshot = item.context("stream failed")?;
            print!("{}", &snapshot[printed..]);
            io::stdout().flush()?;
            printed = snapshot.len();
            answer = snapshot;
        }
        println!("\n");

        history.push(Message::user(&input));
        history.push(Message::assistant(&answer));
    }

    Ok(())
}
