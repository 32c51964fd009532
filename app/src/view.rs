//! Terminal view and input handler.
//!
//! A thin translation layer: it renders whatever state the store
//! publishes and turns input lines into actions. It holds no state of
//! its own.
//!
//! Input protocol (the terminal equivalent of the per-task controls):
//! - `done <n>` toggles the task at list position `n`
//! - `rm <n>` deletes the task at list position `n`
//! - `quit` (or closing stdin) exits
//! - anything else, submitted with Enter, becomes a new task

use std::fmt::Write as _;
use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::TodoStore;
use crate::reducer::TodoAction;
use crate::types::{TaskId, TodoState};

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// Blank line, nothing to do
    Empty,
    /// Leave the application
    Quit,
    /// Submit the line as a new task
    Submit(String),
    /// Toggle the task at a 1-based list position
    Toggle(usize),
    /// Delete the task at a 1-based list position
    Delete(usize),
}

fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Input::Quit;
    }

    let mut words = trimmed.split_whitespace();
    if let (Some(verb), Some(arg), None) = (words.next(), words.next(), words.next()) {
        if let Ok(position) = arg.parse::<usize>() {
            match verb {
                "done" => return Input::Toggle(position),
                "rm" => return Input::Delete(position),
                _ => {},
            }
        }
    }

    // Everything else is draft text. Deliberately untrimmed: trimming is
    // the store's precondition, not the view's.
    Input::Submit(line.to_string())
}

/// Renders the task list, the summary line, or the empty state
fn render(state: &TodoState) -> String {
    let mut out = String::new();
    out.push('\n');

    if state.tasks.is_empty() {
        out.push_str("  No tasks yet. Type a task and press Enter.\n");
        return out;
    }

    for (index, task) in state.tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        let _ = writeln!(out, "  {}. [{mark}] {}", index + 1, task.text);
    }
    let _ = writeln!(
        out,
        "Done: {} of {}",
        state.completed_count(),
        state.total_count()
    );

    out
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

async fn target_id(store: &TodoStore, position: usize) -> Option<TaskId> {
    if position == 0 {
        return None;
    }
    store.state(|s| s.id_at(position - 1)).await
}

/// Runs the interactive loop until `quit` or end of input
///
/// Every dispatched action is followed by a re-render from the store's
/// state subscription, so the screen always reflects the store, never a
/// local copy.
///
/// # Errors
///
/// Returns an error only if the terminal itself fails (reading stdin or
/// writing the prompt).
pub async fn run(store: &TodoStore) -> std::io::Result<()> {
    let mut states = store.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("taskbook: type a task and press Enter. 'done <n>' toggles, 'rm <n>' deletes, 'quit' exits.");
    print!("{}", render(&states.borrow_and_update()));
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Input::Quit => break,
            Input::Empty => {},
            Input::Submit(text) => {
                // The draft round-trips through the store: the add
                // consumes whatever draft the store holds, then clears it.
                store.send(TodoAction::DraftChanged { text }).await;
                let draft = store.state(|s| s.draft.clone()).await;
                store.send(TodoAction::Add { text: draft }).await;
            },
            Input::Toggle(position) => match target_id(store, position).await {
                Some(id) => store.send(TodoAction::Toggle { id }).await,
                None => println!("no task at position {position}"),
            },
            Input::Delete(position) => match target_id(store, position).await {
                Some(id) => store.send(TodoAction::Delete { id }).await,
                None => println!("no task at position {position}"),
            },
        }

        print!("{}", render(&states.borrow_and_update()));
        prompt()?;
    }

    Ok(())
}
